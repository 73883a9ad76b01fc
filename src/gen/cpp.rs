//! AST to C++ source.
//!
//! Print statements become `cout` chains built by walking the format
//! string, scans become `cin` extractions, and maps go straight to
//! `std::map`.

use crate::ast::*;
use crate::error::UnsupportedError;
use crate::gen::{self, Emitter, GenMode};
use crate::tables;

pub struct CppGen {
    out: Emitter,
    mode: GenMode,
}

impl CppGen {
    pub fn new(mode: GenMode) -> Self {
        Self {
            out: Emitter::new(),
            mode,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String, UnsupportedError> {
        let mut uses_io = false;
        let mut uses_string = false;
        let mut uses_map = false;
        let mut uses_math = false;
        gen::walk(&program.items, &mut |node| match node {
            AstNode::Print { .. } | AstNode::Scan { .. } => uses_io = true,
            AstNode::MapDecl { .. }
            | AstNode::MapPut { .. }
            | AstNode::MapGet { .. }
            | AstNode::MapContains { .. } => uses_map = true,
            AstNode::VarDecl { ty, .. } => {
                if is_string_type(ty) {
                    uses_string = true;
                }
            }
            AstNode::Function {
                return_type,
                params,
                ..
            } => {
                if is_string_type(return_type)
                    || params.iter().any(|p| is_string_type(&p.ty))
                {
                    uses_string = true;
                }
            }
            AstNode::Call { name, .. } | AstNode::CallStmt { name, .. } => {
                if tables::is_math_call(name) {
                    uses_math = true;
                }
            }
            _ => {}
        });

        if uses_io {
            self.out.emit("#include <iostream>");
        }
        if uses_string {
            self.out.emit("#include <string>");
        }
        if uses_map {
            self.out.emit("#include <map>");
        }
        if uses_math {
            self.out.emit("#include <cmath>");
        }
        self.out.blank();
        self.out.emit("using namespace std;");
        self.out.blank();

        let mut prototypes = Vec::new();
        for item in &program.items {
            if let AstNode::Function {
                return_type,
                name,
                params,
                is_entry: false,
                ..
            } = item
            {
                prototypes.push(format!(
                    "{} {}({});",
                    tables::cpp_type(return_type),
                    name,
                    param_list(params)
                ));
            }
        }
        if !prototypes.is_empty() {
            for proto in prototypes {
                self.out.emit(proto);
            }
            self.out.blank();
        }

        let mut first = true;
        for item in &program.items {
            if !first {
                self.out.blank();
            }
            first = false;

            match item {
                AstNode::Function { .. } => self.function(item)?,
                AstNode::Define { name, value } => {
                    self.out.emit(format!("#define {} {}", name, value));
                }
                other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
            }
        }

        Ok(self.out.finish())
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
            self.out.emit("int main(int argc, char* argv[]) {");
        } else {
            self.out.emit(format!(
                "{} {}({}) {{",
                tables::cpp_type(return_type),
                name,
                param_list(params)
            ));
        }
        self.out.indent();
        for stmt in body {
            self.stmt(stmt)?;
        }
        if *is_entry && !matches!(body.last(), Some(AstNode::Return { .. })) {
            self.out.emit("return 0;");
        }
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
                let ty = tables::cpp_type(ty);
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
                let ty = tables::cpp_type(ty);
                if let Some(size) = size {
                    let size = self.expr(size)?;
                    self.out.emit(format!("{} {}[{}];", ty, name, size));
                } else if let Some(init) = init {
                    let values: Vec<String> =
                        init.iter().map(|v| self.expr(v)).collect::<Result<_, _>>()?;
                    self.out.emit(format!(
                        "{} {}[] = {{{}}};",
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
                let ty = tables::cpp_type(ty);
                let rows = self.expr(rows)?;
                let cols = self.expr(cols)?;
                self.out
                    .emit(format!("{} {}[{}][{}];", ty, name, rows, cols));
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
            AstNode::Scan { targets, .. } => {
                self.out.emit(format!("cin >> {};", targets.join(" >> ")));
            }
            AstNode::CallStmt { name, args } => {
                let args: Vec<String> =
                    args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
                self.out.emit(format!("{};", tables::cpp_call(name, &args)));
            }
            AstNode::MapDecl {
                key_ty,
                val_ty,
                name,
            } => {
                self.out.emit(format!(
                    "map<{}, {}> {};",
                    tables::cpp_type(key_ty),
                    tables::cpp_type(val_ty),
                    name
                ));
            }
            AstNode::MapPut { map, key, value } => {
                let key = self.expr(key)?;
                let value = self.expr(value)?;
                self.out.emit(format!("{}[{}] = {};", map, key, value));
            }
            other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
        }
        Ok(())
    }

    /// Build a `cout` chain from the format string. Literal runs become
    /// quoted segments, each specifier consumes the next argument, and
    /// newlines become `endl`. Specifiers beyond the argument list are
    /// dropped.
    fn print(
        &mut self,
        format: Option<&str>,
        args: &[AstNode],
        newline: bool,
    ) -> Result<(), UnsupportedError> {
        let Some(fmt) = format else {
            let mut parts = Vec::new();
            if let Some(arg) = args.first() {
                parts.push(self.expr(arg)?);
            }
            if newline {
                parts.push("endl".to_string());
            }
            self.out.emit(format!("cout << {};", parts.join(" << ")));
            return Ok(());
        };

        let mut parts: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut next_arg = 0;
        let chars: Vec<char> = fmt.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '%' && i + 1 < chars.len() {
                if chars[i + 1] == '%' {
                    literal.push('%');
                    i += 2;
                    continue;
                }
                if chars[i + 1] == 'n' {
                    flush_literal(&mut parts, &mut literal);
                    parts.push("endl".to_string());
                    i += 2;
                    continue;
                }
                let spec_len = if chars[i + 1] == 'l' && i + 2 < chars.len() {
                    3
                } else {
                    2
                };
                flush_literal(&mut parts, &mut literal);
                if next_arg < args.len() {
                    parts.push(self.expr(&args[next_arg])?);
                }
                next_arg += 1;
                i += spec_len;
                continue;
            }
            if c == '\\' && i + 1 < chars.len() && chars[i + 1] == 'n' {
                flush_literal(&mut parts, &mut literal);
                parts.push("endl".to_string());
                i += 2;
                continue;
            }
            literal.push(c);
            i += 1;
        }
        flush_literal(&mut parts, &mut literal);
        if newline && parts.last().map(String::as_str) != Some("endl") {
            parts.push("endl".to_string());
        }
        if parts.is_empty() {
            parts.push("\"\"".to_string());
        }
        self.out.emit(format!("cout << {};", parts.join(" << ")));
        Ok(())
    }

    fn inline_stmt(&mut self, node: &AstNode) -> Result<String, UnsupportedError> {
        match node {
            AstNode::VarDecl {
                ty,
                name,
                init: Some(init),
            } => {
                let value = self.expr(init)?;
                Ok(format!("{} {} = {}", tables::cpp_type(ty), name, value))
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
            AstNode::IntLit(s) | AstNode::FloatLit(s) => Ok(s.clone()),
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
                Ok(tables::cpp_call(name, &args))
            }
            AstNode::MapGet { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("{}[{}]", map, key))
            }
            AstNode::MapContains { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("{}.count({})", map, key))
            }
            other => Err(UnsupportedError {
                node_kind: other.kind(),
            }),
        }
    }

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

fn flush_literal(parts: &mut Vec<String>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(format!("\"{}\"", literal));
        literal.clear();
    }
}

fn param_list(params: &[Param]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            let ty = tables::cpp_type(&p.ty);
            if p.is_array {
                format!("{} {}[]", ty, p.name)
            } else {
                format!("{} {}", ty, p.name)
            }
        })
        .collect();
    rendered.join(", ")
}

fn is_string_type(ty: &str) -> bool {
    ty == "char*" || ty == "String"
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
        CppGen::new(GenMode::Strict)
            .generate(&program)
            .expect("generation should succeed")
    }

    #[test]
    fn test_main_signature_and_namespace() {
        let out = translate("int main() { return 0; }");
        assert!(out.contains("using namespace std;"));
        assert!(out.contains("int main(int argc, char* argv[]) {"));
    }

    #[test]
    fn test_printf_becomes_cout_chain() {
        let out = translate(r#"int main() { int x = 3; printf("x=%d\n", x); return 0; }"#);
        assert!(out.contains(r#"cout << "x=" << x << endl;"#));
    }

    #[test]
    fn test_printf_literal_only() {
        let out = translate(r#"int main() { printf("hello\n"); return 0; }"#);
        assert!(out.contains(r#"cout << "hello" << endl;"#));
    }

    #[test]
    fn test_excess_specifiers_are_dropped() {
        let out = translate(r#"int main() { int x = 3; printf("%d %d\n", x); return 0; }"#);
        assert!(out.contains(r#"cout << x << " " << endl;"#));
    }

    #[test]
    fn test_scanf_becomes_cin() {
        let out = translate(r#"int main() { int a; int b; scanf("%d %d", &a, &b); return 0; }"#);
        assert!(out.contains("#include <iostream>"));
        assert!(out.contains("cin >> a >> b;"));
    }

    #[test]
    fn test_string_type_and_include() {
        let out = translate("int main() { char* s = \"hi\"; return 0; }");
        assert!(out.contains("#include <string>"));
        assert!(out.contains("string s = \"hi\";"));
    }

    #[test]
    fn test_library_rewrites() {
        let out = translate("int main() { int n = strlen(s); int v = atoi(t); return 0; }");
        assert!(out.contains("int n = s.length();"));
        assert!(out.contains("int v = stoi(t);"));
    }

    #[test]
    fn test_define_passes_through() {
        let out = translate("#define SIZE 100\nint main() { return 0; }");
        assert!(out.contains("#define SIZE 100"));
    }

    #[test]
    fn test_map_nodes_use_std_map() {
        let mut program = Program::new();
        program.items.push(AstNode::Function {
            return_type: "int".to_string(),
            name: "main".to_string(),
            params: Vec::new(),
            body: vec![
                AstNode::MapDecl {
                    key_ty: "int".to_string(),
                    val_ty: "int".to_string(),
                    name: "m".to_string(),
                },
                AstNode::MapPut {
                    map: "m".to_string(),
                    key: Box::new(AstNode::IntLit("1".to_string())),
                    value: Box::new(AstNode::IntLit("2".to_string())),
                },
                AstNode::VarDecl {
                    ty: "int".to_string(),
                    name: "v".to_string(),
                    init: Some(Box::new(AstNode::MapGet {
                        map: "m".to_string(),
                        key: Box::new(AstNode::IntLit("1".to_string())),
                    })),
                },
            ],
            is_entry: true,
        });
        let out = CppGen::new(GenMode::Strict).generate(&program).unwrap();
        assert!(out.contains("#include <map>"));
        assert!(out.contains("map<int, int> m;"));
        assert!(out.contains("m[1] = 2;"));
        assert!(out.contains("int v = m[1];"));
    }

    #[test]
    fn test_class_node_rejected() {
        let mut program = Program::new();
        program.items.push(AstNode::ClassDecl {
            name: "Point".to_string(),
            base: None,
            fields: Vec::new(),
            ctor: None,
            dtor: None,
            methods: Vec::new(),
        });
        let err = CppGen::new(GenMode::Strict).generate(&program).unwrap_err();
        assert_eq!(err.node_kind, "ClassDecl");
    }
}
