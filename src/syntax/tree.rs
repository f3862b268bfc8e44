//! Desugared expression trees.
//!
//! Trees arrive from the parser and namer already desugared: every file is a
//! single root [`ClassDef`] whose body holds the file's statements, class and
//! module names are resolved [`Expr::Constant`] nodes, and every other
//! constant mention is an unresolved [`ConstantRef`] chain linked through its
//! `scope` field (`A::B::C` is `C` with scope `B` with scope `A` with scope
//! [`Expr::EmptyTree`]).

use smol_str::SmolStr;

use crate::base::{Loc, NameRef, SymbolRef};

/// A tree node. Children are owned, so a tree is rewritten by moving nodes
/// out and putting replacements back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expr {
    /// Absence of an expression (no scope, no receiver, no body).
    #[default]
    EmptyTree,
    ConstantRef(Box<ConstantRef>),
    Constant(Box<ResolvedConstant>),
    ClassDef(Box<ClassDef>),
    MethodDef(Box<MethodDef>),
    Call(Box<Call>),
    Assign(Box<Assign>),
    Seq(Box<Seq>),
    Literal(Literal),
    Local(Local),
}

/// An unresolved constant reference: `scope::name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantRef {
    pub loc: Loc,
    pub name: NameRef,
    pub scope: Expr,
}

/// A constant the namer already bound to a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConstant {
    pub loc: Loc,
    pub symbol: SymbolRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassDefKind {
    Module,
    Class,
}

/// A class or module definition.
///
/// `name` is an [`Expr::Constant`] for every definition written in source.
/// Only the synthetic root definition has no name ([`Expr::EmptyTree`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub loc: Loc,
    pub kind: ClassDefKind,
    pub name: Expr,
    pub symbol: SymbolRef,
    pub ancestors: Vec<Expr>,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub loc: Loc,
    pub name: NameRef,
    pub body: Expr,
}

/// A method call. `receiver` is [`Expr::EmptyTree`] for self-calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub loc: Loc,
    pub receiver: Expr,
    pub method: NameRef,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub loc: Loc,
    pub lhs: Expr,
    pub rhs: Expr,
}

/// A statement sequence whose value is `expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq {
    pub loc: Loc,
    pub stats: Vec<Expr>,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub loc: Loc,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Nil,
    Bool(bool),
    Integer(i64),
    String(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub loc: Loc,
    pub name: NameRef,
}

impl Expr {
    pub fn constant_ref(loc: Loc, name: NameRef, scope: Expr) -> Self {
        Expr::ConstantRef(Box::new(ConstantRef { loc, name, scope }))
    }

    /// Build the chain for `segments[0]::segments[1]::...`, rooted at
    /// [`Expr::EmptyTree`]. Every node gets `loc`.
    pub fn constant_path(loc: Loc, segments: &[NameRef]) -> Self {
        Self::constant_path_from(loc, Expr::EmptyTree, segments)
    }

    /// Like [`Expr::constant_path`], but rooted at `root`.
    pub fn constant_path_from(loc: Loc, root: Expr, segments: &[NameRef]) -> Self {
        segments
            .iter()
            .fold(root, |scope, name| Expr::constant_ref(loc, *name, scope))
    }

    pub fn constant(loc: Loc, symbol: SymbolRef) -> Self {
        Expr::Constant(Box::new(ResolvedConstant { loc, symbol }))
    }

    pub fn class_def(
        loc: Loc,
        kind: ClassDefKind,
        symbol: SymbolRef,
        ancestors: Vec<Expr>,
        body: Vec<Expr>,
    ) -> Self {
        Expr::ClassDef(Box::new(ClassDef {
            loc,
            kind,
            name: Expr::constant(loc, symbol),
            symbol,
            ancestors,
            body,
        }))
    }

    /// The synthetic top-level definition wrapping a file's statements.
    pub fn root(loc: Loc, body: Vec<Expr>) -> Self {
        Expr::ClassDef(Box::new(ClassDef {
            loc,
            kind: ClassDefKind::Class,
            name: Expr::EmptyTree,
            symbol: SymbolRef::ROOT,
            ancestors: Vec::new(),
            body,
        }))
    }

    pub fn method_def(loc: Loc, name: NameRef, body: Expr) -> Self {
        Expr::MethodDef(Box::new(MethodDef { loc, name, body }))
    }

    pub fn call(loc: Loc, receiver: Expr, method: NameRef, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(Call {
            loc,
            receiver,
            method,
            args,
        }))
    }

    pub fn assign(loc: Loc, lhs: Expr, rhs: Expr) -> Self {
        Expr::Assign(Box::new(Assign { loc, lhs, rhs }))
    }

    pub fn seq(loc: Loc, stats: Vec<Expr>, expr: Expr) -> Self {
        Expr::Seq(Box::new(Seq { loc, stats, expr }))
    }

    pub fn literal(loc: Loc, value: LiteralValue) -> Self {
        Expr::Literal(Literal { loc, value })
    }

    pub fn local(loc: Loc, name: NameRef) -> Self {
        Expr::Local(Local { loc, name })
    }

    /// Source location of this node, if it has one.
    pub fn loc(&self) -> Option<Loc> {
        match self {
            Expr::EmptyTree => None,
            Expr::ConstantRef(node) => Some(node.loc),
            Expr::Constant(node) => Some(node.loc),
            Expr::ClassDef(node) => Some(node.loc),
            Expr::MethodDef(node) => Some(node.loc),
            Expr::Call(node) => Some(node.loc),
            Expr::Assign(node) => Some(node.loc),
            Expr::Seq(node) => Some(node.loc),
            Expr::Literal(node) => Some(node.loc),
            Expr::Local(node) => Some(node.loc),
        }
    }

    pub fn is_empty_tree(&self) -> bool {
        matches!(self, Expr::EmptyTree)
    }

    pub fn as_constant_ref(&self) -> Option<&ConstantRef> {
        match self {
            Expr::ConstantRef(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_class_def(&self) -> Option<&ClassDef> {
        match self {
            Expr::ClassDef(node) => Some(node),
            _ => None,
        }
    }
}

impl ClassDef {
    /// Whether the namer resolved this definition's name to a constant.
    pub fn has_resolved_name(&self) -> bool {
        matches!(self.name, Expr::Constant(_))
    }
}
