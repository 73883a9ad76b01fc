//! AST to Java source.
//!
//! Emits a single `public class Main` wrapper of static methods. Imports
//! and the `Scanner` declaration are driven by a prescan over the whole
//! program, so they appear only when the code actually needs them.

use crate::ast::*;
use crate::error::UnsupportedError;
use crate::gen::{self, Emitter, GenMode};
use crate::tables;

pub struct JavaGen {
    out: Emitter,
    mode: GenMode,
    uses_scanner: bool,
    in_entry: bool,
}

impl JavaGen {
    pub fn new(mode: GenMode) -> Self {
        Self {
            out: Emitter::new(),
            mode,
            uses_scanner: false,
            in_entry: false,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String, UnsupportedError> {
        let mut uses_scanner = false;
        let mut uses_map = false;
        let mut uses_math = false;
        gen::walk(&program.items, &mut |node| match node {
            AstNode::Scan { .. } => uses_scanner = true,
            AstNode::MapDecl { .. }
            | AstNode::MapPut { .. }
            | AstNode::MapGet { .. }
            | AstNode::MapContains { .. } => uses_map = true,
            AstNode::Call { name, .. } | AstNode::CallStmt { name, .. } => {
                if tables::is_math_call(name) {
                    uses_math = true;
                }
            }
            _ => {}
        });
        self.uses_scanner = uses_scanner;

        if uses_scanner {
            self.out.emit("import java.util.Scanner;");
        }
        if uses_map {
            self.out.emit("import java.util.HashMap;");
        }
        if uses_math {
            self.out.emit("import java.lang.Math;");
        }
        if uses_scanner || uses_map || uses_math {
            self.out.blank();
        }

        self.out.emit("public class Main {");
        self.out.indent();

        let mut first = true;
        for item in &program.items {
            if !first {
                self.out.blank();
            }
            first = false;

            match item {
                AstNode::Function { .. } => self.function(item)?,
                AstNode::Define { name, value } => self.define(name, value),
                other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
            }
        }

        self.out.dedent();
        self.out.emit("}");
        Ok(self.out.finish())
    }

    /// `#define` becomes a class constant when the value is a plain number,
    /// otherwise it survives only as a comment.
    fn define(&mut self, name: &str, value: &str) {
        if value.parse::<i64>().is_ok() {
            self.out.emit(format!("static final int {} = {};", name, value));
        } else if value.parse::<f64>().is_ok() {
            self.out.emit(format!("static final double {} = {};", name, value));
        } else {
            self.out.emit(format!("// #define {} {}", name, value));
        }
    }

    fn function(&mut self, node: &AstNode) -> Result<(), UnsupportedError> {
        let AstNode::Function {
            return_type,
            name,
            params,
            body,
            is_entry,
        } = node
        else {
            return Err(UnsupportedError {
                node_kind: node.kind(),
            });
        };

        if *is_entry {
            self.out.emit("public static void main(String[] args) {");
        } else {
            let params: Vec<String> = params
                .iter()
                .map(|p| {
                    let ty = tables::java_type(&p.ty);
                    if p.is_array {
                        format!("{}[] {}", ty, p.name)
                    } else {
                        format!("{} {}", ty, p.name)
                    }
                })
                .collect();
            self.out.emit(format!(
                "public static {} {}({}) {{",
                tables::java_type(return_type),
                name,
                params.join(", ")
            ));
        }

        self.out.indent();
        self.in_entry = *is_entry;
        if *is_entry && self.uses_scanner {
            self.out.emit("Scanner sc = new Scanner(System.in);");
        }
        for stmt in body {
            self.stmt(stmt)?;
        }
        self.in_entry = false;
        self.out.dedent();
        self.out.emit("}");
        Ok(())
    }

    fn block(&mut self, body: &[AstNode]) -> Result<(), UnsupportedError> {
        self.out.indent();
        for stmt in body {
            self.stmt(stmt)?;
        }
        self.out.dedent();
        Ok(())
    }

    fn stmt(&mut self, node: &AstNode) -> Result<(), UnsupportedError> {
        match node {
            AstNode::VarDecl { ty, name, init } => {
                let ty = tables::java_type(ty);
                match init {
                    Some(init) => {
                        let value = self.expr(init)?;
                        self.out.emit(format!("{} {} = {};", ty, name, value));
                    }
                    None => self.out.emit(format!("{} {};", ty, name)),
                }
            }
            AstNode::ArrayDecl {
                ty,
                name,
                size,
                init,
            } => {
                let ty = tables::java_type(ty);
                if let Some(size) = size {
                    let size = self.expr(size)?;
                    self.out.emit(format!(
                        "{}[] {} = new {}[{}];",
                        ty, name, ty, size
                    ));
                } else if let Some(init) = init {
                    let values: Vec<String> =
                        init.iter().map(|v| self.expr(v)).collect::<Result<_, _>>()?;
                    self.out.emit(format!(
                        "{}[] {} = {{{}}};",
                        ty,
                        name,
                        values.join(", ")
                    ));
                }
            }
            AstNode::ArrayDecl2D {
                ty,
                name,
                rows,
                cols,
            } => {
                let ty = tables::java_type(ty);
                let rows = self.expr(rows)?;
                let cols = self.expr(cols)?;
                self.out.emit(format!(
                    "{}[][] {} = new {}[{}][{}];",
                    ty, name, ty, rows, cols
                ));
            }
            AstNode::Assign { name, value } => {
                let value = self.expr(value)?;
                self.out.emit(format!("{} = {};", name, value));
            }
            AstNode::CompoundAssign { name, op, value } => {
                let value = self.expr(value)?;
                self.out.emit(format!("{} {}= {};", name, op, value));
            }
            AstNode::ArrayAssign { name, index, value } => {
                let index = self.expr(index)?;
                let value = self.expr(value)?;
                self.out.emit(format!("{}[{}] = {};", name, index, value));
            }
            AstNode::ArrayAssign2D {
                name,
                row,
                col,
                value,
            } => {
                let row = self.expr(row)?;
                let col = self.expr(col)?;
                let value = self.expr(value)?;
                self.out
                    .emit(format!("{}[{}][{}] = {};", name, row, col, value));
            }
            AstNode::If {
                branches,
                else_block,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let cond = self.expr(&branch.cond)?;
                    if i == 0 {
                        self.out.emit(format!("if ({}) {{", cond));
                    } else {
                        self.out.emit(format!("}} else if ({}) {{", cond));
                    }
                    self.block(&branch.body)?;
                }
                if let Some(block) = else_block {
                    self.out.emit("} else {");
                    self.block(block)?;
                }
                self.out.emit("}");
            }
            AstNode::For {
                init,
                cond,
                update,
                body,
            } => {
                let init = self.inline_stmt(init)?;
                let cond = self.expr(cond)?;
                let update = self.inline_stmt(update)?;
                self.out
                    .emit(format!("for ({}; {}; {}) {{", init, cond, update));
                self.block(body)?;
                self.out.emit("}");
            }
            AstNode::Update { .. } => {
                let text = self.inline_stmt(node)?;
                self.out.emit(format!("{};", text));
            }
            AstNode::While { cond, body } => {
                let cond = self.expr(cond)?;
                self.out.emit(format!("while ({}) {{", cond));
                self.block(body)?;
                self.out.emit("}");
            }
            AstNode::DoWhile { body, cond } => {
                self.out.emit("do {");
                self.block(body)?;
                let cond = self.expr(cond)?;
                self.out.emit(format!("}} while ({});", cond));
            }
            AstNode::Switch { expr, cases } => {
                let expr = self.expr(expr)?;
                self.out.emit(format!("switch ({}) {{", expr));
                self.out.indent();
                for case in cases {
                    match case {
                        SwitchCase::Case { value, body } => {
                            let value = self.expr(value)?;
                            self.out.emit(format!("case {}:", value));
                            self.block(body)?;
                        }
                        SwitchCase::Default { body } => {
                            self.out.emit("default:");
                            self.block(body)?;
                        }
                    }
                }
                self.out.dedent();
                self.out.emit("}");
            }
            AstNode::Break => self.out.emit("break;"),
            AstNode::Continue => self.out.emit("continue;"),
            AstNode::Return { value } => match value {
                Some(v) if self.in_entry && v.as_ref() == &AstNode::IntLit("0".to_string()) => {
                    self.out.emit("return;");
                }
                Some(v) => {
                    let value = self.expr(v)?;
                    self.out.emit(format!("return {};", value));
                }
                None => self.out.emit("return;"),
            },
            AstNode::Print {
                format,
                args,
                newline,
            } => self.print(format.as_deref(), args, *newline)?,
            AstNode::Scan { format, targets } => {
                let specs = tables::format_specs(format);
                for (spec, target) in specs.iter().zip(targets) {
                    match tables::scanner_method(spec) {
                        Some(method) => self
                            .out
                            .emit(format!("{} = sc.{};", target, method)),
                        None => gen::unsupported(&mut self.out, self.mode, "Scan")?,
                    }
                }
            }
            AstNode::CallStmt { name, args } => {
                let args: Vec<String> =
                    args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
                self.out.emit(format!("{};", tables::java_call(name, &args)));
            }
            AstNode::MapDecl {
                key_ty,
                val_ty,
                name,
            } => {
                self.out.emit(format!(
                    "HashMap<{}, {}> {} = new HashMap<>();",
                    boxed(key_ty),
                    boxed(val_ty),
                    name
                ));
            }
            AstNode::MapPut { map, key, value } => {
                let key = self.expr(key)?;
                let value = self.expr(value)?;
                self.out.emit(format!("{}.put({}, {});", map, key, value));
            }
            other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
        }
        Ok(())
    }

    /// Print lowering: a format with no arguments becomes `println`/`print`
    /// of the literal text; a single argument with a bare specifier format
    /// becomes `println(arg)`; everything else is `printf` with `\n`
    /// rewritten to `%n`.
    fn print(
        &mut self,
        format: Option<&str>,
        args: &[AstNode],
        newline: bool,
    ) -> Result<(), UnsupportedError> {
        let Some(fmt) = format else {
            // bare value
            let arg = match args.first() {
                Some(arg) => self.expr(arg)?,
                None => String::new(),
            };
            let method = if newline { "println" } else { "print" };
            self.out.emit(format!("System.out.{}({});", method, arg));
            return Ok(());
        };

        if args.is_empty() {
            if newline {
                self.out.emit(format!("System.out.println(\"{}\");", fmt));
            } else if let Some(stripped) = fmt.strip_suffix("\\n") {
                self.out
                    .emit(format!("System.out.println(\"{}\");", stripped));
            } else {
                self.out.emit(format!("System.out.print(\"{}\");", fmt));
            }
            return Ok(());
        }

        if args.len() == 1 {
            if let Some((_, had_newline)) = tables::bare_spec(fmt) {
                let arg = self.expr(&args[0])?;
                let method = if had_newline || newline {
                    "println"
                } else {
                    "print"
                };
                self.out.emit(format!("System.out.{}({});", method, arg));
                return Ok(());
            }
        }

        let rendered: Vec<String> =
            args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
        self.out.emit(format!(
            "System.out.printf(\"{}\", {});",
            tables::to_java_format(fmt),
            rendered.join(", ")
        ));
        Ok(())
    }

    /// Render a loop initializer or update without the trailing semicolon.
    fn inline_stmt(&mut self, node: &AstNode) -> Result<String, UnsupportedError> {
        match node {
            AstNode::VarDecl {
                ty,
                name,
                init: Some(init),
            } => {
                let value = self.expr(init)?;
                Ok(format!("{} {} = {}", tables::java_type(ty), name, value))
            }
            AstNode::Assign { name, value } => {
                let value = self.expr(value)?;
                Ok(format!("{} = {}", name, value))
            }
            AstNode::Update { name, op, value } => match op {
                UpdateOp::Inc => Ok(format!("{}++", name)),
                UpdateOp::Dec => Ok(format!("{}--", name)),
                UpdateOp::AddAssign => {
                    let value = self.value_of(value)?;
                    Ok(format!("{} += {}", name, value))
                }
                UpdateOp::SubAssign => {
                    let value = self.value_of(value)?;
                    Ok(format!("{} -= {}", name, value))
                }
                UpdateOp::Set => {
                    let value = self.value_of(value)?;
                    Ok(format!("{} = {}", name, value))
                }
            },
            other => Err(UnsupportedError {
                node_kind: other.kind(),
            }),
        }
    }

    fn value_of(
        &mut self,
        value: &Option<Box<AstNode>>,
    ) -> Result<String, UnsupportedError> {
        match value {
            Some(v) => self.expr(v),
            None => Err(UnsupportedError {
                node_kind: "Update",
            }),
        }
    }

    fn expr(&mut self, node: &AstNode) -> Result<String, UnsupportedError> {
        match node {
            AstNode::IntLit(s) => Ok(s.clone()),
            AstNode::FloatLit(s) => Ok(format!("{}f", s)),
            AstNode::CharLit(s) | AstNode::StrLit(s) => Ok(s.clone()),
            AstNode::BoolLit(b) => Ok(b.to_string()),
            AstNode::Ident(name) => Ok(name.clone()),
            AstNode::Binary { op, lhs, rhs } => {
                let lhs = self.operand(lhs)?;
                let rhs = self.operand(rhs)?;
                Ok(format!("{} {} {}", lhs, op, rhs))
            }
            AstNode::Unary { op, operand } => {
                let operand = self.operand(operand)?;
                Ok(format!("{}{}", op, operand))
            }
            AstNode::Ternary {
                cond,
                then_val,
                else_val,
            } => {
                let cond = self.operand(cond)?;
                let then_val = self.operand(then_val)?;
                let else_val = self.operand(else_val)?;
                Ok(format!("{} ? {} : {}", cond, then_val, else_val))
            }
            AstNode::ArrayAccess { name, index } => {
                let index = self.expr(index)?;
                Ok(format!("{}[{}]", name, index))
            }
            AstNode::ArrayAccess2D { name, row, col } => {
                let row = self.expr(row)?;
                let col = self.expr(col)?;
                Ok(format!("{}[{}][{}]", name, row, col))
            }
            AstNode::Call { name, args } => {
                let args: Vec<String> =
                    args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
                Ok(tables::java_call(name, &args))
            }
            AstNode::MapGet { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("{}.get({})", map, key))
            }
            AstNode::MapContains { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("{}.containsKey({})", map, key))
            }
            other => Err(UnsupportedError {
                node_kind: other.kind(),
            }),
        }
    }

    /// Parenthesize compound operands so nesting survives re-rendering.
    fn operand(&mut self, node: &AstNode) -> Result<String, UnsupportedError> {
        let text = self.expr(node)?;
        match node {
            AstNode::Binary { .. } | AstNode::Ternary { .. } => {
                Ok(format!("({})", text))
            }
            _ => Ok(text),
        }
    }
}

/// Java boxed type name for map type arguments.
fn boxed(ty: &str) -> &str {
    match ty {
        "int" => "Integer",
        "double" => "Double",
        "float" => "Float",
        "char" => "Character",
        "boolean" => "Boolean",
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c::Parser;

    fn translate(source: &str) -> String {
        let program = Parser::new(source)
            .expect("lexing should succeed")
            .parse_program()
            .expect("parsing should succeed");
        JavaGen::new(GenMode::Strict)
            .generate(&program)
            .expect("generation should succeed")
    }

    #[test]
    fn test_main_wrapper() {
        let out = translate("int main() { return 0; }");
        assert!(out.contains("public class Main {"));
        assert!(out.contains("public static void main(String[] args) {"));
        // `return 0` in main becomes a bare return
        assert!(out.contains("        return;"));
    }

    #[test]
    fn test_printf_trailing_newline_becomes_println() {
        let out = translate(r#"int main() { printf("hello\n"); return 0; }"#);
        assert!(out.contains(r#"System.out.println("hello");"#));
    }

    #[test]
    fn test_printf_bare_spec_becomes_println_of_value() {
        let out = translate(r#"int main() { int x = 3; printf("%d\n", x); return 0; }"#);
        assert!(out.contains("System.out.println(x);"));
    }

    #[test]
    fn test_printf_mixed_format_uses_percent_n() {
        let out = translate(r#"int main() { int x = 3; printf("x=%d\n", x); return 0; }"#);
        assert!(out.contains(r#"System.out.printf("x=%d%n", x);"#));
    }

    #[test]
    fn test_scanf_becomes_scanner() {
        let out = translate(r#"int main() { int x; scanf("%d", &x); return 0; }"#);
        assert!(out.contains("import java.util.Scanner;"));
        assert!(out.contains("Scanner sc = new Scanner(System.in);"));
        assert!(out.contains("x = sc.nextInt();"));
    }

    #[test]
    fn test_else_if_chain_stays_flat() {
        let out = translate(
            "int main() { int x = 1; int y = 0; if (x > 0) { y = 1; } else if (x < 0) { y = 2; } else { y = 3; } return 0; }",
        );
        assert!(out.contains("} else if (x < 0) {"));
        assert!(out.contains("} else {"));
    }

    #[test]
    fn test_library_call_rewrites() {
        let out = translate(
            "int main() { int n = strlen(s); int c = strcmp(a, b); return 0; }",
        );
        assert!(out.contains("int n = s.length();"));
        assert!(out.contains("int c = a.compareTo(b);"));
    }

    #[test]
    fn test_float_literal_gets_suffix() {
        let out = translate("int main() { float f = 2.5; return 0; }");
        assert!(out.contains("float f = 2.5f;"));
    }

    #[test]
    fn test_array_declarations() {
        let out = translate("int main() { int a[5]; int b[] = {1, 2, 3}; return 0; }");
        assert!(out.contains("int[] a = new int[5];"));
        assert!(out.contains("int[] b = {1, 2, 3};"));
    }

    #[test]
    fn test_define_becomes_constant() {
        let out = translate("#define SIZE 100\nint main() { return 0; }");
        assert!(out.contains("static final int SIZE = 100;"));
    }

    #[test]
    fn test_nested_expression_keeps_grouping() {
        let out = translate("int main() { int x = (1 + 2) * 3; return 0; }");
        assert!(out.contains("int x = (1 + 2) * 3;"));
    }

    #[test]
    fn test_class_node_strict_vs_lenient() {
        let mut program = Program::new();
        program.items.push(AstNode::ClassDecl {
            name: "Point".to_string(),
            base: None,
            fields: Vec::new(),
            ctor: None,
            dtor: None,
            methods: Vec::new(),
        });

        let err = JavaGen::new(GenMode::Strict).generate(&program).unwrap_err();
        assert_eq!(err.node_kind, "ClassDecl");

        let out = JavaGen::new(GenMode::Lenient).generate(&program).unwrap();
        assert!(out.contains("/* unsupported: ClassDecl */"));
    }
}
