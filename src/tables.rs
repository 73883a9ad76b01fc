//! Translation tables: type maps, library-call rewrites, and
//! format-specifier helpers.
//!
//! Everything here is a side-effect-free lookup. Library rewrites are
//! arity-checked: a rule only fires when the call site's argument count
//! matches, otherwise the call passes through unchanged.

use crate::ast::AstNode;

/// C type name to Java type name.
pub fn java_type(ty: &str) -> &str {
    match ty {
        "unsigned" => "int",
        "bool" => "boolean",
        "char*" => "String",
        _ => ty,
    }
}

/// Java type name to C type name.
pub fn c_type(ty: &str) -> &str {
    match ty {
        "boolean" => "int",
        "String" => "char*",
        "Integer" => "int",
        "Double" => "double",
        "Float" => "float",
        "Character" => "char",
        _ => ty,
    }
}

/// C type name to C++ type name.
pub fn cpp_type(ty: &str) -> &str {
    match ty {
        "char*" => "string",
        "String" => "string",
        "boolean" => "bool",
        "unsigned" => "unsigned",
        _ => ty,
    }
}

/// A library-call rewrite rule of fixed arity.
enum Rewrite {
    Zero(&'static str),
    One(fn(&str) -> String),
    Two(fn(&str, &str) -> String),
}

fn java_rewrite(name: &str) -> Option<Rewrite> {
    let rule = match name {
        "rand" => Rewrite::Zero("(int)(Math.random() * 32767)"),
        "strlen" => Rewrite::One(|s| format!("{}.length()", s)),
        "atoi" => Rewrite::One(|s| format!("Integer.parseInt({})", s)),
        "atof" => Rewrite::One(|s| format!("Double.parseDouble({})", s)),
        "toupper" => Rewrite::One(|s| format!("Character.toUpperCase({})", s)),
        "tolower" => Rewrite::One(|s| format!("Character.toLowerCase({})", s)),
        "sqrt" => Rewrite::One(|s| format!("Math.sqrt({})", s)),
        "fabs" => Rewrite::One(|s| format!("Math.abs({})", s)),
        "abs" => Rewrite::One(|s| format!("Math.abs({})", s)),
        "floor" => Rewrite::One(|s| format!("Math.floor({})", s)),
        "ceil" => Rewrite::One(|s| format!("Math.ceil({})", s)),
        "strcmp" => Rewrite::Two(|a, b| format!("{}.compareTo({})", a, b)),
        "strcat" => Rewrite::Two(|a, b| format!("{} + {}", a, b)),
        "strchr" => Rewrite::Two(|a, b| format!("{}.indexOf({}) >= 0", a, b)),
        "strstr" => Rewrite::Two(|a, b| format!("{}.contains({})", a, b)),
        "strcpy" => Rewrite::Two(|_, b| b.to_string()),
        "pow" => Rewrite::Two(|a, b| format!("Math.pow({}, {})", a, b)),
        _ => return None,
    };
    Some(rule)
}

fn cpp_rewrite(name: &str) -> Option<Rewrite> {
    let rule = match name {
        "strlen" => Rewrite::One(|s| format!("{}.length()", s)),
        "atoi" => Rewrite::One(|s| format!("stoi({})", s)),
        "atof" => Rewrite::One(|s| format!("stof({})", s)),
        "strcmp" => Rewrite::Two(|a, b| format!("{}.compare({})", a, b)),
        "strcat" => Rewrite::Two(|a, b| format!("{} + {}", a, b)),
        _ => return None,
    };
    Some(rule)
}

fn c_rewrite(name: &str) -> Option<Rewrite> {
    let rule = match name {
        "Math.sqrt" => Rewrite::One(|s| format!("sqrt({})", s)),
        "Math.abs" => Rewrite::One(|s| format!("abs({})", s)),
        "Math.floor" => Rewrite::One(|s| format!("floor({})", s)),
        "Math.ceil" => Rewrite::One(|s| format!("ceil({})", s)),
        "Integer.parseInt" => Rewrite::One(|s| format!("atoi({})", s)),
        "Double.parseDouble" => Rewrite::One(|s| format!("atof({})", s)),
        "Character.toUpperCase" => Rewrite::One(|s| format!("toupper({})", s)),
        "Character.toLowerCase" => Rewrite::One(|s| format!("tolower({})", s)),
        "Math.pow" => Rewrite::Two(|a, b| format!("pow({}, {})", a, b)),
        _ => return None,
    };
    Some(rule)
}

fn apply(rule: Option<Rewrite>, name: &str, args: &[String]) -> String {
    match rule {
        Some(Rewrite::Zero(text)) if args.is_empty() => text.to_string(),
        Some(Rewrite::One(f)) if args.len() == 1 => f(&args[0]),
        Some(Rewrite::Two(f)) if args.len() == 2 => f(&args[0], &args[1]),
        _ => format!("{}({})", name, args.join(", ")),
    }
}

/// Rewrite a C library call for the Java target, passing unknown callees
/// and mismatched arities through unchanged.
pub fn java_call(name: &str, args: &[String]) -> String {
    apply(java_rewrite(name), name, args)
}

/// Rewrite a C library call for the C++ target.
pub fn cpp_call(name: &str, args: &[String]) -> String {
    apply(cpp_rewrite(name), name, args)
}

/// Rewrite a Java library call for the C target. Unknown callees pass
/// through unchanged, matching the permissive call handling elsewhere.
pub fn c_call(name: &str, args: &[String]) -> String {
    apply(c_rewrite(name), name, args)
}

/// Callees that should pull in the math import/include.
pub fn is_math_call(name: &str) -> bool {
    matches!(
        name,
        "sqrt" | "pow" | "fabs" | "floor" | "ceil" | "sin" | "cos" | "tan"
            | "log" | "exp"
    ) || name.starts_with("Math.")
}

/// The conversions println-style lowering recognizes as a bare specifier.
pub const BARE_SPECS: [&str; 5] = ["%d", "%f", "%lf", "%c", "%s"];

/// Rewrite a printf format string for Java: literal `\n` becomes `%n`.
/// The format text still carries source escapes verbatim, so the newline
/// is the two characters `\` `n`.
pub fn to_java_format(fmt: &str) -> String {
    fmt.replace("\\n", "%n")
}

/// Rewrite a Java format string for C: `%n` becomes `\n`.
pub fn to_c_format(fmt: &str) -> String {
    fmt.replace("%n", "\\n")
}

/// If the whole format is a single bare specifier, optionally followed by a
/// newline, return the specifier and whether the newline was present.
pub fn bare_spec(fmt: &str) -> Option<(&'static str, bool)> {
    for spec in BARE_SPECS {
        if fmt == spec {
            return Some((spec, false));
        }
        if fmt.len() == spec.len() + 2 && fmt.starts_with(spec) && fmt.ends_with("\\n") {
            return Some((spec, true));
        }
    }
    None
}

/// The `Scanner` call that reads one value of the given specifier.
pub fn scanner_method(spec: &str) -> Option<&'static str> {
    let method = match spec {
        "%d" => "nextInt()",
        "%f" => "nextFloat()",
        "%lf" => "nextDouble()",
        "%s" => "next()",
        "%c" => "next().charAt(0)",
        _ => return None,
    };
    Some(method)
}

/// Extract the conversions from a format string, in order.
pub fn format_specs(fmt: &str) -> Vec<String> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut specs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() {
            match chars[i + 1] {
                '%' | 'n' => i += 1,
                'l' if i + 2 < chars.len() && chars[i + 2] == 'f' => {
                    specs.push("%lf".to_string());
                    i += 2;
                }
                'd' | 'f' | 'c' | 's' => {
                    specs.push(format!("%{}", chars[i + 1]));
                    i += 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    specs
}

/// Default C conversion for a bare printed value, chosen by the argument's
/// syntactic type: strings print their text directly, chars use `%c`,
/// float literals `%f`, everything else `%d`.
pub fn default_c_spec(arg: &AstNode) -> &'static str {
    match arg {
        AstNode::CharLit(_) => "%c",
        AstNode::FloatLit(_) => "%f",
        _ => "%d",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_maps() {
        assert_eq!(java_type("unsigned"), "int");
        assert_eq!(java_type("bool"), "boolean");
        assert_eq!(java_type("float"), "float");
        assert_eq!(c_type("boolean"), "int");
        assert_eq!(c_type("String"), "char*");
        assert_eq!(cpp_type("char*"), "string");
    }

    #[test]
    fn test_rewrite_arity_checked() {
        assert_eq!(java_call("strlen", &["s".to_string()]), "s.length()");
        // wrong arity passes through unchanged
        assert_eq!(
            java_call("strlen", &["a".to_string(), "b".to_string()]),
            "strlen(a, b)"
        );
        // unknown callee passes through unchanged
        assert_eq!(java_call("frobnicate", &["x".to_string()]), "frobnicate(x)");
    }

    #[test]
    fn test_two_arg_rewrites() {
        assert_eq!(
            java_call("strcmp", &["a".to_string(), "b".to_string()]),
            "a.compareTo(b)"
        );
        assert_eq!(
            java_call("pow", &["x".to_string(), "2".to_string()]),
            "Math.pow(x, 2)"
        );
        assert_eq!(
            cpp_call("strcmp", &["a".to_string(), "b".to_string()]),
            "a.compare(b)"
        );
    }

    #[test]
    fn test_java_to_c_rewrites() {
        assert_eq!(c_call("Math.sqrt", &["x".to_string()]), "sqrt(x)");
        assert_eq!(
            c_call("Integer.parseInt", &["s".to_string()]),
            "atoi(s)"
        );
        assert_eq!(
            c_call("Math.pow", &["x".to_string(), "2".to_string()]),
            "pow(x, 2)"
        );
    }

    #[test]
    fn test_format_rewrites() {
        assert_eq!(to_java_format(r"x=%d\n"), "x=%d%n");
        assert_eq!(to_c_format("x=%d%n"), r"x=%d\n");
    }

    #[test]
    fn test_bare_spec() {
        assert_eq!(bare_spec("%d"), Some(("%d", false)));
        assert_eq!(bare_spec(r"%lf\n"), Some(("%lf", true)));
        assert_eq!(bare_spec(r"x=%d\n"), None);
    }

    #[test]
    fn test_format_specs_extraction() {
        assert_eq!(format_specs(r"%d %lf %s\n"), vec!["%d", "%lf", "%s"]);
        // %% and %n are not conversions
        assert_eq!(format_specs("100%% done%n"), Vec::<String>::new());
    }
}
