use derive_more::Display;
use snafu::Snafu;

use crate::filesystem::NodeId;

/// Command name an error is reported under.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    #[display("ls")]
    List,
    #[display("touch")]
    Touch,
    #[display("mkdir")]
    MakeDir,
    #[display("ln")]
    Link,
    #[display("rm")]
    Remove,
    #[display("cd")]
    ChangeDir,
    #[display("pwd")]
    PrintWorkingDir,
    #[display("read")]
    Read,
    #[display("write")]
    Write,
    #[display("truncate")]
    Truncate,
}

#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum NodeError {
    #[snafu(display("{path}: No such file or directory"))]
    NotFound { path: String },
    #[snafu(display("{path}: Not a directory"))]
    NotADirectory { path: String },
    #[snafu(display("{path}: File exists"))]
    AlreadyExists { path: String },
    #[snafu(display("{path}: Invalid argument"))]
    InvalidPath { path: String },
    #[snafu(display("{path}: Device or resource busy"))]
    Busy { path: String },
    #[snafu(display("{path}: Cannot read a directory"))]
    CannotReadDirectory { path: String },
    #[snafu(display("{path}: Cannot write a directory"))]
    CannotWriteDirectory { path: String },
    #[snafu(display("{path}: Cannot truncate a directory"))]
    CannotTruncateDirectory { path: String },
    #[snafu(display("{path}: Cannot link a directory"))]
    CannotLinkDirectory { path: String },
    #[snafu(display("Internal error: could not find name for {node} in parent {parent}"))]
    InternalInconsistency { node: NodeId, parent: NodeId },
    #[snafu(display("Internal error: node {node} is referenced but missing"))]
    DanglingNode { node: NodeId },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), display("{operation}: {source}"))]
pub struct TreeError {
    operation: Operation,
    source: NodeError,
}

impl TreeError {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> &NodeError {
        &self.source
    }

    /// True when the error points at a bug in the tree rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.source,
            NodeError::InternalInconsistency { .. } | NodeError::DanglingNode { .. }
        )
    }
}
