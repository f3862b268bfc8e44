//! Syntax: desugared trees, per-file containers and tree rewriting.

pub mod file;
mod print;
mod tree;
pub mod tree_map;

pub use file::ParsedFile;
pub use print::TreePrinter;
pub use tree::{
    Assign, Call, ClassDef, ClassDefKind, ConstantRef, Expr, Literal, LiteralValue, Local,
    MethodDef, ResolvedConstant, Seq,
};
pub use tree_map::{
    TreeMap, apply, walk_assign, walk_call, walk_class_def, walk_constant_ref, walk_expr,
    walk_method_def, walk_seq,
};
