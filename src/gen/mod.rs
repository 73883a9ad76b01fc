//! Code generation: shared mode, line-builder, and AST walking.
//!
//! Each target-language generator walks the AST exactly once with an
//! exhaustive match, accumulating output in an [`Emitter`]. Indentation is
//! four spaces per level with braces opening on the same line; else-if
//! chains are emitted structurally from the flattened branch list, never by
//! patching earlier lines.

pub mod c;
pub mod cpp;
pub mod java;

use crate::ast::{AstNode, SwitchCase};
use crate::error::UnsupportedError;

/// How a generator reacts to a node the target has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenMode {
    /// Fail with [`UnsupportedError`].
    Strict,
    /// Emit a placeholder comment and keep going.
    Lenient,
}

/// Line buffer plus indent counter; the only accumulator the generators
/// use.
pub struct Emitter {
    lines: Vec<String>,
    indent: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            indent: 0,
        }
    }

    pub fn emit(&mut self, line: impl AsRef<str>) {
        let mut text = "    ".repeat(self.indent);
        text.push_str(line.as_ref());
        self.lines.push(text);
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict mode surfaces the unsupported node; lenient mode leaves a marker
/// in the output and continues.
pub(crate) fn unsupported(
    out: &mut Emitter,
    mode: GenMode,
    node_kind: &'static str,
) -> Result<(), UnsupportedError> {
    match mode {
        GenMode::Strict => Err(UnsupportedError { node_kind }),
        GenMode::Lenient => {
            out.emit(format!("/* unsupported: {} */", node_kind));
            Ok(())
        }
    }
}

/// Depth-first visit of every node, used by the generators' feature-flag
/// prescans.
pub(crate) fn walk(nodes: &[AstNode], f: &mut dyn FnMut(&AstNode)) {
    for node in nodes {
        walk_node(node, f);
    }
}

fn walk_node(node: &AstNode, f: &mut dyn FnMut(&AstNode)) {
    f(node);
    match node {
        AstNode::Function { body, .. } => walk(body, f),
        AstNode::VarDecl { init, .. } => {
            if let Some(init) = init {
                walk_node(init, f);
            }
        }
        AstNode::ArrayDecl { size, init, .. } => {
            if let Some(size) = size {
                walk_node(size, f);
            }
            if let Some(init) = init {
                walk(init, f);
            }
        }
        AstNode::ArrayDecl2D { rows, cols, .. } => {
            walk_node(rows, f);
            walk_node(cols, f);
        }
        AstNode::Assign { value, .. } | AstNode::CompoundAssign { value, .. } => {
            walk_node(value, f);
        }
        AstNode::ArrayAssign { index, value, .. } => {
            walk_node(index, f);
            walk_node(value, f);
        }
        AstNode::ArrayAssign2D {
            row, col, value, ..
        } => {
            walk_node(row, f);
            walk_node(col, f);
            walk_node(value, f);
        }
        AstNode::If {
            branches,
            else_block,
        } => {
            for branch in branches {
                walk_node(&branch.cond, f);
                walk(&branch.body, f);
            }
            if let Some(block) = else_block {
                walk(block, f);
            }
        }
        AstNode::For {
            init,
            cond,
            update,
            body,
        } => {
            walk_node(init, f);
            walk_node(cond, f);
            walk_node(update, f);
            walk(body, f);
        }
        AstNode::Update { value, .. } => {
            if let Some(value) = value {
                walk_node(value, f);
            }
        }
        AstNode::While { cond, body } => {
            walk_node(cond, f);
            walk(body, f);
        }
        AstNode::DoWhile { body, cond } => {
            walk(body, f);
            walk_node(cond, f);
        }
        AstNode::Switch { expr, cases } => {
            walk_node(expr, f);
            for case in cases {
                match case {
                    SwitchCase::Case { value, body } => {
                        walk_node(value, f);
                        walk(body, f);
                    }
                    SwitchCase::Default { body } => walk(body, f),
                }
            }
        }
        AstNode::Return { value } => {
            if let Some(value) = value {
                walk_node(value, f);
            }
        }
        AstNode::Print { args, .. } => walk(args, f),
        AstNode::CallStmt { args, .. } | AstNode::Call { args, .. } => {
            walk(args, f);
        }
        AstNode::MapPut { key, value, .. } => {
            walk_node(key, f);
            walk_node(value, f);
        }
        AstNode::MapGet { key, .. } | AstNode::MapContains { key, .. } => {
            walk_node(key, f);
        }
        AstNode::Ternary {
            cond,
            then_val,
            else_val,
        } => {
            walk_node(cond, f);
            walk_node(then_val, f);
            walk_node(else_val, f);
        }
        AstNode::Binary { lhs, rhs, .. } => {
            walk_node(lhs, f);
            walk_node(rhs, f);
        }
        AstNode::Unary { operand, .. } => walk_node(operand, f),
        AstNode::ArrayAccess { index, .. } => walk_node(index, f),
        AstNode::ArrayAccess2D { row, col, .. } => {
            walk_node(row, f);
            walk_node(col, f);
        }
        AstNode::ClassDecl {
            ctor,
            dtor,
            methods,
            ..
        } => {
            if let Some(ctor) = ctor {
                for (_, value) in &ctor.field_inits {
                    walk_node(value, f);
                }
                walk(&ctor.body, f);
            }
            if let Some(dtor) = dtor {
                walk(dtor, f);
            }
            for method in methods {
                walk(&method.body, f);
            }
        }
        AstNode::GenericFn { body, .. } => walk(body, f),
        AstNode::Scan { .. }
        | AstNode::MapDecl { .. }
        | AstNode::Define { .. }
        | AstNode::Break
        | AstNode::Continue
        | AstNode::IntLit(_)
        | AstNode::FloatLit(_)
        | AstNode::CharLit(_)
        | AstNode::StrLit(_)
        | AstNode::BoolLit(_)
        | AstNode::Ident(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_indentation() {
        let mut out = Emitter::new();
        out.emit("int main() {");
        out.indent();
        out.emit("return 0;");
        out.dedent();
        out.emit("}");
        assert_eq!(out.finish(), "int main() {\n    return 0;\n}\n");
    }

    #[test]
    fn test_unsupported_modes() {
        let mut out = Emitter::new();
        assert!(unsupported(&mut out, GenMode::Strict, "ClassDecl").is_err());
        unsupported(&mut out, GenMode::Lenient, "ClassDecl").unwrap();
        assert!(out.finish().contains("/* unsupported: ClassDecl */"));
    }
}
