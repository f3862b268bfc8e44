//! Per-file trees handed between compiler phases.

use crate::base::FileId;

use super::Expr;

/// One file's tree, as produced by the parser and namer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub file: FileId,
    pub tree: Expr,
}

impl ParsedFile {
    pub fn new(file: FileId, tree: Expr) -> Self {
        Self { file, tree }
    }
}
