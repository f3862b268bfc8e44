//! Depth-first tree rewriting.
//!
//! Implement [`TreeMap`] and override the hooks you care about. Each hook
//! takes ownership of a node and returns its replacement; the default hooks
//! call the matching `walk_*` function, which transforms the node's children
//! in source order and hands the node back. Overriding a hook and calling
//! `walk_*` first gives a post-order hook; doing work before the `walk_*`
//! call gives a pre-order one.
//!
//! ```rust
//! use packager::syntax::{ConstantRef, Expr, TreeMap, walk_constant_ref};
//!
//! struct CountConstants(usize);
//!
//! impl TreeMap for CountConstants {
//!     type Error = std::convert::Infallible;
//!
//!     fn transform_constant_ref(&mut self, node: Box<ConstantRef>) -> Result<Expr, Self::Error> {
//!         self.0 += 1;
//!         Ok(Expr::ConstantRef(walk_constant_ref(self, node)?))
//!     }
//! }
//! ```

use std::mem;

use super::tree::{Assign, Call, ClassDef, ConstantRef, Expr, MethodDef, Seq};

pub trait TreeMap {
    type Error;

    fn transform_expr(&mut self, expr: Expr) -> Result<Expr, Self::Error> {
        walk_expr(self, expr)
    }

    fn transform_constant_ref(&mut self, node: Box<ConstantRef>) -> Result<Expr, Self::Error> {
        Ok(Expr::ConstantRef(walk_constant_ref(self, node)?))
    }

    fn transform_class_def(&mut self, node: Box<ClassDef>) -> Result<Expr, Self::Error> {
        Ok(Expr::ClassDef(walk_class_def(self, node)?))
    }

    fn transform_method_def(&mut self, node: Box<MethodDef>) -> Result<Expr, Self::Error> {
        Ok(Expr::MethodDef(walk_method_def(self, node)?))
    }

    fn transform_call(&mut self, node: Box<Call>) -> Result<Expr, Self::Error> {
        Ok(Expr::Call(walk_call(self, node)?))
    }
}

/// Run `map` over a whole tree.
pub fn apply<M: TreeMap + ?Sized>(map: &mut M, tree: Expr) -> Result<Expr, M::Error> {
    map.transform_expr(tree)
}

/// Dispatch on the node kind. Leaves come back untouched.
pub fn walk_expr<M: TreeMap + ?Sized>(map: &mut M, expr: Expr) -> Result<Expr, M::Error> {
    match expr {
        Expr::EmptyTree | Expr::Constant(_) | Expr::Literal(_) | Expr::Local(_) => Ok(expr),
        Expr::ConstantRef(node) => map.transform_constant_ref(node),
        Expr::ClassDef(node) => map.transform_class_def(node),
        Expr::MethodDef(node) => map.transform_method_def(node),
        Expr::Call(node) => map.transform_call(node),
        Expr::Assign(node) => Ok(Expr::Assign(walk_assign(map, node)?)),
        Expr::Seq(node) => Ok(Expr::Seq(walk_seq(map, node)?)),
    }
}

/// Transform the edge in place, leaving the replacement behind.
fn map_edge<M: TreeMap + ?Sized>(map: &mut M, edge: &mut Expr) -> Result<(), M::Error> {
    *edge = map.transform_expr(mem::take(edge))?;
    Ok(())
}

fn map_edges<M: TreeMap + ?Sized>(map: &mut M, edges: &mut [Expr]) -> Result<(), M::Error> {
    edges.iter_mut().try_for_each(|edge| map_edge(map, edge))
}

pub fn walk_constant_ref<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<ConstantRef>,
) -> Result<Box<ConstantRef>, M::Error> {
    map_edge(map, &mut node.scope)?;
    Ok(node)
}

pub fn walk_class_def<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<ClassDef>,
) -> Result<Box<ClassDef>, M::Error> {
    map_edge(map, &mut node.name)?;
    map_edges(map, &mut node.ancestors)?;
    map_edges(map, &mut node.body)?;
    Ok(node)
}

pub fn walk_method_def<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<MethodDef>,
) -> Result<Box<MethodDef>, M::Error> {
    map_edge(map, &mut node.body)?;
    Ok(node)
}

pub fn walk_call<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<Call>,
) -> Result<Box<Call>, M::Error> {
    map_edge(map, &mut node.receiver)?;
    map_edges(map, &mut node.args)?;
    Ok(node)
}

pub fn walk_assign<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<Assign>,
) -> Result<Box<Assign>, M::Error> {
    map_edge(map, &mut node.lhs)?;
    map_edge(map, &mut node.rhs)?;
    Ok(node)
}

pub fn walk_seq<M: TreeMap + ?Sized>(
    map: &mut M,
    mut node: Box<Seq>,
) -> Result<Box<Seq>, M::Error> {
    map_edges(map, &mut node.stats)?;
    map_edge(map, &mut node.expr)?;
    Ok(node)
}
