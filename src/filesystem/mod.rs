//! In-memory filesystem tree with hard links and block-based file contents.
//!
//! Directories and files live in an arena owned by [`Tree`]. Directory
//! entries refer to nodes by [`NodeId`], which lets several entries alias one
//! file and lets the root be its own parent.

mod block;
mod error;
mod node;
mod path;
pub mod projection;
mod tree;

pub use block::{BLOCK_SIZE, Block, FileContents};
pub use error::{NodeError, Operation, TreeError};
pub use node::{Entries, Node, NodeData, NodeId, NodeKind};
pub use path::SEPARATOR;
pub use tree::{Listing, Resolved, Tree};
