//! AST to C source.
//!
//! Covers the whole neutral AST: maps lower onto a fixed-size linear-scan
//! hashmap emitted once per program, classes lower to structs with init
//! and destroy functions, and function templates become macros where the
//! body allows it.

use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::error::UnsupportedError;
use crate::gen::{self, Emitter, GenMode};
use crate::tables;

/// Runtime support for map nodes. Linear scan over a fixed table; `put`
/// updates an existing key in place, `get` answers -1 on a miss.
const HASHMAP_RUNTIME: &str = "\
#define HASHMAP_SIZE 100

typedef struct {
    int keys[HASHMAP_SIZE];
    int values[HASHMAP_SIZE];
    int size;
} HashMap;

HashMap hashmap_create() {
    HashMap m;
    m.size = 0;
    return m;
}

void hashmap_put(HashMap* m, int key, int value) {
    for (int i = 0; i < m->size; i++) {
        if (m->keys[i] == key) {
            m->values[i] = value;
            return;
        }
    }
    if (m->size < HASHMAP_SIZE) {
        m->keys[m->size] = key;
        m->values[m->size] = value;
        m->size++;
    }
}

int hashmap_get(HashMap* m, int key) {
    for (int i = 0; i < m->size; i++) {
        if (m->keys[i] == key) {
            return m->values[i];
        }
    }
    return -1;
}

int hashmap_contains(HashMap* m, int key) {
    for (int i = 0; i < m->size; i++) {
        if (m->keys[i] == key) {
            return 1;
        }
    }
    return 0;
}";

pub struct CGen {
    out: Emitter,
    mode: GenMode,
    // When lowering a class method, the names that must print as self->name.
    field_scope: Option<FxHashSet<String>>,
}

impl CGen {
    pub fn new(mode: GenMode) -> Self {
        Self {
            out: Emitter::new(),
            mode,
            field_scope: None,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String, UnsupportedError> {
        let mut uses_io = false;
        let mut uses_map = false;
        let mut uses_math = false;
        gen::walk(&program.items, &mut |node| match node {
            AstNode::Print { .. } | AstNode::Scan { .. } => uses_io = true,
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

        if uses_io {
            self.out.emit("#include <stdio.h>");
        }
        self.out.emit("#include <stdlib.h>");
        if uses_map {
            self.out.emit("#include <string.h>");
        }
        if uses_math {
            self.out.emit("#include <math.h>");
        }
        self.out.blank();

        if uses_map {
            for line in HASHMAP_RUNTIME.lines() {
                self.out.emit(line);
            }
            self.out.blank();
        }

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
                    tables::c_type(return_type),
                    name,
                    self.param_list(params)
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
                AstNode::ClassDecl { .. } => self.class_decl(item)?,
                AstNode::GenericFn { .. } => self.generic_fn(item)?,
                other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
            }
        }

        Ok(self.out.finish())
    }

    fn param_list(&self, params: &[Param]) -> String {
        let rendered: Vec<String> = params
            .iter()
            .map(|p| {
                let ty = tables::c_type(&p.ty);
                if p.is_array {
                    format!("{} {}[]", ty, p.name)
                } else {
                    format!("{} {}", ty, p.name)
                }
            })
            .collect();
        rendered.join(", ")
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
            self.out.emit("int main() {");
        } else {
            self.out.emit(format!(
                "{} {}({}) {{",
                tables::c_type(return_type),
                name,
                self.param_list(params)
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
                let ty = tables::c_type(ty);
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
                let ty = tables::c_type(ty);
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
                let ty = tables::c_type(ty);
                let rows = self.expr(rows)?;
                let cols = self.expr(cols)?;
                self.out
                    .emit(format!("{} {}[{}][{}];", ty, name, rows, cols));
            }
            AstNode::Assign { name, value } => {
                let name = self.scoped(name);
                let value = self.expr(value)?;
                self.out.emit(format!("{} = {};", name, value));
            }
            AstNode::CompoundAssign { name, op, value } => {
                let name = self.scoped(name);
                let value = self.expr(value)?;
                self.out.emit(format!("{} {}= {};", name, op, value));
            }
            AstNode::ArrayAssign { name, index, value } => {
                let name = self.scoped(name);
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
                let name = self.scoped(name);
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
            AstNode::Scan { format, targets } => {
                let refs: Vec<String> =
                    targets.iter().map(|t| format!("&{}", t)).collect();
                self.out.emit(format!(
                    "scanf(\"{}\", {});",
                    format,
                    refs.join(", ")
                ));
            }
            AstNode::CallStmt { name, args } => {
                let args: Vec<String> =
                    args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
                self.out.emit(format!("{};", tables::c_call(name, &args)));
            }
            AstNode::MapDecl { name, .. } => {
                self.out
                    .emit(format!("HashMap {} = hashmap_create();", name));
            }
            AstNode::MapPut { map, key, value } => {
                let key = self.expr(key)?;
                let value = self.expr(value)?;
                self.out
                    .emit(format!("hashmap_put(&{}, {}, {});", map, key, value));
            }
            other => gen::unsupported(&mut self.out, self.mode, other.kind())?,
        }
        Ok(())
    }

    fn print(
        &mut self,
        format: Option<&str>,
        args: &[AstNode],
        newline: bool,
    ) -> Result<(), UnsupportedError> {
        let nl = if newline { "\\n" } else { "" };

        let Some(fmt) = format else {
            // bare value: pick a default specifier from the argument shape
            let Some(arg) = args.first() else {
                self.out.emit(format!("printf(\"{}\");", nl));
                return Ok(());
            };
            if let AstNode::StrLit(text) = arg {
                let inner = text.trim_matches('"');
                self.out.emit(format!("printf(\"{}{}\");", inner, nl));
            } else {
                let spec = tables::default_c_spec(arg);
                let value = self.expr(arg)?;
                self.out
                    .emit(format!("printf(\"{}{}\", {});", spec, nl, value));
            }
            return Ok(());
        };

        let mut fmt = tables::to_c_format(fmt);
        if newline && !fmt.ends_with("\\n") {
            fmt.push_str("\\n");
        }
        if args.is_empty() {
            self.out.emit(format!("printf(\"{}\");", fmt));
        } else {
            let rendered: Vec<String> =
                args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
            self.out
                .emit(format!("printf(\"{}\", {});", fmt, rendered.join(", ")));
        }
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
                Ok(format!("{} {} = {}", tables::c_type(ty), name, value))
            }
            AstNode::Assign { name, value } => {
                let name = self.scoped(name);
                let value = self.expr(value)?;
                Ok(format!("{} = {}", name, value))
            }
            AstNode::Update { name, op, value } => {
                let name = self.scoped(name);
                match op {
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
                }
            }
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
            AstNode::BoolLit(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            AstNode::Ident(name) => Ok(self.scoped(name)),
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
                let name = self.scoped(name);
                let index = self.expr(index)?;
                Ok(format!("{}[{}]", name, index))
            }
            AstNode::ArrayAccess2D { name, row, col } => {
                let name = self.scoped(name);
                let row = self.expr(row)?;
                let col = self.expr(col)?;
                Ok(format!("{}[{}][{}]", name, row, col))
            }
            AstNode::Call { name, args } => {
                let args: Vec<String> =
                    args.iter().map(|a| self.expr(a)).collect::<Result<_, _>>()?;
                Ok(tables::c_call(name, &args))
            }
            AstNode::MapGet { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("hashmap_get(&{}, {})", map, key))
            }
            AstNode::MapContains { map, key } => {
                let key = self.expr(key)?;
                Ok(format!("hashmap_contains(&{}, {})", map, key))
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

    fn scoped(&self, name: &str) -> String {
        match &self.field_scope {
            Some(fields) if fields.contains(name) => format!("self->{}", name),
            _ => name.to_string(),
        }
    }

    /// Lower a class to a struct plus free functions. Inheritance becomes
    /// an embedded base field, virtual methods become function-pointer
    /// fields wired up in `Name_init`.
    fn class_decl(&mut self, node: &AstNode) -> Result<(), UnsupportedError> {
        let AstNode::ClassDecl {
            name,
            base,
            fields,
            ctor,
            dtor,
            methods,
        } = node
        else {
            return Err(UnsupportedError {
                node_kind: node.kind(),
            });
        };

        let virtuals: Vec<&Method> = methods.iter().filter(|m| m.is_virtual).collect();
        let regulars: Vec<&Method> = methods.iter().filter(|m| !m.is_virtual).collect();

        // forward typedef so the function-pointer fields can name the struct
        self.out.emit(format!("typedef struct {0} {0};", name));
        self.out.blank();
        self.out.emit(format!("struct {} {{", name));
        self.out.indent();
        if let Some(base) = base {
            self.out
                .emit(format!("{0} base; /* inherits from {0} */", base));
        }
        for method in &virtuals {
            self.out.emit(format!(
                "{} (*{})({}); /* virtual */",
                tables::c_type(&method.return_type),
                method.name,
                self.method_params(name, &method.params)
            ));
        }
        for field in fields {
            self.out
                .emit(format!("{} {};", tables::c_type(&field.ty), field.name));
        }
        self.out.dedent();
        self.out.emit("};");

        if !virtuals.is_empty() {
            self.out.blank();
            for method in &virtuals {
                self.out.emit(format!(
                    "{} {}_{}_impl({});",
                    tables::c_type(&method.return_type),
                    name,
                    method.name,
                    self.method_params(name, &method.params)
                ));
            }
        }

        let field_names: FxHashSet<String> =
            fields.iter().map(|f| f.name.clone()).collect();

        if ctor.is_some() || !virtuals.is_empty() {
            self.out.blank();
            let ctor_params = ctor.as_ref().map(|c| c.params.as_slice()).unwrap_or(&[]);
            self.out.emit(format!(
                "void {}_init({}) {{",
                name,
                self.method_params(name, ctor_params)
            ));
            self.out.indent();
            if let Some(ctor) = ctor {
                for (field, value) in &ctor.field_inits {
                    let value = self.expr(value)?;
                    if Some(field) == base.as_ref() {
                        self.out.emit(format!(
                            "{0}_init(({0}*)self, {1});",
                            field, value
                        ));
                    } else {
                        self.out.emit(format!("self->{} = {};", field, value));
                    }
                }
            }
            for method in &virtuals {
                self.out.emit(format!(
                    "self->{1} = {0}_{1}_impl;",
                    name, method.name
                ));
            }
            if let Some(ctor) = ctor {
                self.field_scope = Some(field_names.clone());
                for stmt in &ctor.body {
                    self.stmt(stmt)?;
                }
                self.field_scope = None;
            }
            self.out.dedent();
            self.out.emit("}");
        }

        if let Some(body) = dtor {
            self.out.blank();
            self.out.emit(format!("void {0}_destroy({0}* self) {{", name));
            self.out.indent();
            self.field_scope = Some(field_names.clone());
            for stmt in body {
                self.stmt(stmt)?;
            }
            self.field_scope = None;
            self.out.dedent();
            self.out.emit("}");
        }

        for method in &regulars {
            self.out.blank();
            self.method(name, method, &field_names, "")?;
        }
        for method in &virtuals {
            self.out.blank();
            self.method(name, method, &field_names, "_impl")?;
        }
        Ok(())
    }

    fn method(
        &mut self,
        class: &str,
        method: &Method,
        field_names: &FxHashSet<String>,
        suffix: &str,
    ) -> Result<(), UnsupportedError> {
        self.out.emit(format!(
            "{} {}_{}{}({}) {{",
            tables::c_type(&method.return_type),
            class,
            method.name,
            suffix,
            self.method_params(class, &method.params)
        ));
        self.out.indent();
        self.field_scope = Some(field_names.clone());
        for stmt in &method.body {
            self.stmt(stmt)?;
        }
        self.field_scope = None;
        self.out.dedent();
        self.out.emit("}");
        Ok(())
    }

    fn method_params(&self, class: &str, params: &[Param]) -> String {
        let rest = self.param_list(params);
        if rest.is_empty() {
            format!("{}* self", class)
        } else {
            format!("{}* self, {}", class, rest)
        }
    }

    /// A single-expression template becomes a macro; anything more gets a
    /// plain `int` instantiation.
    fn generic_fn(&mut self, node: &AstNode) -> Result<(), UnsupportedError> {
        let AstNode::GenericFn {
            name, params, body, ..
        } = node
        else {
            return Err(UnsupportedError {
                node_kind: node.kind(),
            });
        };

        if let [AstNode::Return { value: Some(expr) }] = body.as_slice() {
            let expr = self.expr(expr)?;
            let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
            self.out.emit(format!(
                "#define {}({}) ({})",
                name.to_uppercase(),
                names.join(", "),
                expr
            ));
            return Ok(());
        }

        self.out.emit("/* template instantiated for int */");
        let rendered: Vec<String> = params
            .iter()
            .map(|p| format!("int {}", p.name))
            .collect();
        self.out
            .emit(format!("int {}({}) {{", name, rendered.join(", ")));
        self.out.indent();
        for stmt in body {
            self.stmt(stmt)?;
        }
        self.out.dedent();
        self.out.emit("}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::Parser;

    fn translate(source: &str) -> String {
        let program = Parser::new(source)
            .expect("lexing should succeed")
            .parse_program()
            .expect("parsing should succeed");
        CGen::new(GenMode::Strict)
            .generate(&program)
            .expect("generation should succeed")
    }

    fn in_main(body: &str) -> String {
        format!(
            "public class Main {{ public static void main(String[] args) {{ {} }} }}",
            body
        )
    }

    #[test]
    fn test_main_gets_return_zero() {
        let out = translate(&in_main("int x = 1;"));
        assert!(out.contains("int main() {"));
        assert!(out.contains("    return 0;"));
    }

    #[test]
    fn test_println_string_prints_text() {
        let out = translate(&in_main("System.out.println(\"hello\");"));
        assert!(out.contains(r#"printf("hello\n");"#));
        assert!(!out.contains("%s"));
    }

    #[test]
    fn test_println_value_uses_default_spec() {
        let out = translate(&in_main("int x = 3;\nSystem.out.println(x);"));
        assert!(out.contains(r#"printf("%d\n", x);"#));
    }

    #[test]
    fn test_map_lowering_and_single_runtime_block() {
        let source = in_main(
            "HashMap<Integer, Integer> a = new HashMap<>();\n\
             HashMap<Integer, Integer> b = new HashMap<>();\n\
             a.put(1, 2);\n\
             int v = a.get(1);",
        );
        let out = translate(&source);
        assert_eq!(out.matches("typedef struct {").count(), 1);
        assert_eq!(out.matches("int hashmap_get(HashMap* m, int key)").count(), 1);
        assert!(out.contains("HashMap a = hashmap_create();"));
        assert!(out.contains("HashMap b = hashmap_create();"));
        assert!(out.contains("hashmap_put(&a, 1, 2);"));
        assert!(out.contains("int v = hashmap_get(&a, 1);"));
    }

    #[test]
    fn test_map_put_updates_existing_key_in_emitted_runtime() {
        let out = translate(&in_main(
            "HashMap<Integer, Integer> m = new HashMap<>();\nm.put(1, 2);",
        ));
        // the update-in-place branch precedes the append branch
        let update = out.find("m->values[i] = value;").unwrap();
        let append = out.find("m->keys[m->size] = key;").unwrap();
        assert!(update < append);
    }

    #[test]
    fn test_math_call_rewrites_and_include() {
        let out = translate(&in_main("double r = Math.sqrt(2.0);"));
        assert!(out.contains("#include <math.h>"));
        assert!(out.contains("double r = sqrt(2.0);"));
    }

    #[test]
    fn test_forward_declarations_for_helpers() {
        let source = r#"
public class Main {
    public static int add(int a, int b) {
        return a + b;
    }
    public static void main(String[] args) {
        int x = add(1, 2);
    }
}
"#;
        let out = translate(source);
        assert!(out.contains("int add(int a, int b);"));
        assert!(out.contains("int add(int a, int b) {"));
    }

    #[test]
    fn test_boolean_lowering() {
        let out = translate(&in_main("boolean ok = true;"));
        assert!(out.contains("int ok = 1;"));
    }

    fn sample_class() -> AstNode {
        AstNode::ClassDecl {
            name: "Circle".to_string(),
            base: Some("Shape".to_string()),
            fields: vec![Field {
                ty: "double".to_string(),
                name: "radius".to_string(),
            }],
            ctor: Some(Ctor {
                params: vec![Param {
                    ty: "double".to_string(),
                    name: "r".to_string(),
                    is_array: false,
                }],
                field_inits: vec![
                    ("Shape".to_string(), AstNode::IntLit("1".to_string())),
                    ("radius".to_string(), AstNode::Ident("r".to_string())),
                ],
                body: Vec::new(),
            }),
            dtor: Some(Vec::new()),
            methods: vec![Method {
                return_type: "double".to_string(),
                name: "area".to_string(),
                params: Vec::new(),
                body: vec![AstNode::Return {
                    value: Some(Box::new(AstNode::Binary {
                        op: BinOp::Mul,
                        lhs: Box::new(AstNode::Ident("radius".to_string())),
                        rhs: Box::new(AstNode::Ident("radius".to_string())),
                    })),
                }],
                is_virtual: true,
            }],
        }
    }

    #[test]
    fn test_class_lowering() {
        let mut program = Program::new();
        program.items.push(sample_class());
        let out = CGen::new(GenMode::Strict).generate(&program).unwrap();

        assert!(out.contains("typedef struct Circle Circle;"));
        assert!(out.contains("Shape base; /* inherits from Shape */"));
        assert!(out.contains("double (*area)(Circle* self); /* virtual */"));
        assert!(out.contains("double radius;"));
        assert!(out.contains("void Circle_init(Circle* self, double r) {"));
        assert!(out.contains("Shape_init((Shape*)self, 1);"));
        assert!(out.contains("self->radius = r;"));
        assert!(out.contains("self->area = Circle_area_impl;"));
        assert!(out.contains("void Circle_destroy(Circle* self) {"));
        assert!(out.contains("double Circle_area_impl(Circle* self) {"));
        assert!(out.contains("return self->radius * self->radius;"));
    }

    #[test]
    fn test_generic_fn_single_return_becomes_macro() {
        let mut program = Program::new();
        program.items.push(AstNode::GenericFn {
            name: "max".to_string(),
            type_params: vec!["T".to_string()],
            params: vec![
                Param {
                    ty: "T".to_string(),
                    name: "a".to_string(),
                    is_array: false,
                },
                Param {
                    ty: "T".to_string(),
                    name: "b".to_string(),
                    is_array: false,
                },
            ],
            body: vec![AstNode::Return {
                value: Some(Box::new(AstNode::Ternary {
                    cond: Box::new(AstNode::Binary {
                        op: BinOp::Gt,
                        lhs: Box::new(AstNode::Ident("a".to_string())),
                        rhs: Box::new(AstNode::Ident("b".to_string())),
                    }),
                    then_val: Box::new(AstNode::Ident("a".to_string())),
                    else_val: Box::new(AstNode::Ident("b".to_string())),
                })),
            }],
        });
        let out = CGen::new(GenMode::Strict).generate(&program).unwrap();
        assert!(out.contains("#define MAX(a, b) ((a > b) ? a : b)"));
    }
}
