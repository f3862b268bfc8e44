//! Source-like rendering of trees, for logs and test expectations.

use crate::base::{NameTable, SymbolTable};

use super::tree::{ClassDefKind, Expr, LiteralValue};

/// Renders trees with names and symbols spelled out.
pub struct TreePrinter<'a> {
    names: &'a NameTable,
    symbols: &'a SymbolTable,
    out: String,
    indent: usize,
}

impl<'a> TreePrinter<'a> {
    pub fn new(names: &'a NameTable, symbols: &'a SymbolTable) -> Self {
        Self {
            names,
            symbols,
            out: String::new(),
            indent: 0,
        }
    }

    /// Render `expr` as a multi-line listing.
    ///
    /// The root definition is transparent: its statements are printed at the
    /// top level.
    pub fn print(mut self, expr: &Expr) -> String {
        match expr {
            Expr::ClassDef(def) if def.symbol.is_root() && def.name.is_empty_tree() => {
                for stat in &def.body {
                    self.stat(stat);
                }
            }
            _ => self.stat(expr),
        }
        self.out
    }

    /// Render an expression on a single line.
    pub fn inline(mut self, expr: &Expr) -> String {
        self.expr(expr);
        self.out
    }

    fn line(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn stat(&mut self, expr: &Expr) {
        match expr {
            Expr::ClassDef(def) => {
                self.line();
                self.out.push_str(match def.kind {
                    ClassDefKind::Module => "module ",
                    ClassDefKind::Class => "class ",
                });
                if def.name.is_empty_tree() {
                    self.out.push_str(&self.symbols.show(def.symbol, self.names));
                } else {
                    self.expr(&def.name);
                }
                for (i, ancestor) in def.ancestors.iter().enumerate() {
                    self.out.push_str(if i == 0 { " < " } else { ", " });
                    self.expr(ancestor);
                }
                self.out.push('\n');
                self.block(&def.body);
            }
            Expr::MethodDef(def) => {
                self.line();
                self.out.push_str("def ");
                self.out.push_str(&self.names.show(def.name));
                self.out.push('\n');
                self.block(std::slice::from_ref(&def.body));
            }
            Expr::Seq(seq) => {
                for stat in &seq.stats {
                    self.stat(stat);
                }
                self.stat(&seq.expr);
            }
            Expr::EmptyTree => {}
            _ => {
                self.line();
                self.expr(expr);
                self.out.push('\n');
            }
        }
    }

    fn block(&mut self, body: &[Expr]) {
        self.indent += 1;
        for stat in body {
            self.stat(stat);
        }
        self.indent -= 1;
        self.line();
        self.out.push_str("end\n");
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::EmptyTree => {}
            Expr::ConstantRef(node) => {
                if !node.scope.is_empty_tree() {
                    self.expr(&node.scope);
                    self.out.push_str("::");
                }
                self.out.push_str(&self.names.show(node.name));
            }
            Expr::Constant(node) => {
                self.out.push_str(&self.symbols.show(node.symbol, self.names));
            }
            Expr::Call(call) => {
                if !call.receiver.is_empty_tree() {
                    self.expr(&call.receiver);
                    self.out.push('.');
                }
                self.out.push_str(&self.names.show(call.method));
                self.out.push('(');
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.out.push(')');
            }
            Expr::Assign(assign) => {
                self.expr(&assign.lhs);
                self.out.push_str(" = ");
                self.expr(&assign.rhs);
            }
            Expr::Literal(literal) => match &literal.value {
                LiteralValue::Nil => self.out.push_str("nil"),
                LiteralValue::Bool(value) => self.out.push_str(&value.to_string()),
                LiteralValue::Integer(value) => self.out.push_str(&value.to_string()),
                LiteralValue::String(value) => {
                    self.out.push('"');
                    self.out.push_str(value);
                    self.out.push('"');
                }
            },
            Expr::Local(local) => self.out.push_str(&self.names.show(local.name)),
            Expr::ClassDef(_) | Expr::MethodDef(_) | Expr::Seq(_) => {
                // Definitions and sequences in expression position: render
                // them as a parenthesized block.
                self.out.push_str("(\n");
                self.indent += 1;
                self.stat(expr);
                self.indent -= 1;
                self.line();
                self.out.push(')');
            }
        }
    }
}

impl Expr {
    /// Multi-line rendering, see [`TreePrinter::print`].
    pub fn show(&self, names: &NameTable, symbols: &SymbolTable) -> String {
        TreePrinter::new(names, symbols).print(self)
    }

    /// Single-line rendering, see [`TreePrinter::inline`].
    pub fn show_inline(&self, names: &NameTable, symbols: &SymbolTable) -> String {
        TreePrinter::new(names, symbols).inline(self)
    }
}
