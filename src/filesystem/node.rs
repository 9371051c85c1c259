use derive_more::{Display, From};
use hashlink::LinkedHashMap;

use crate::filesystem::block::FileContents;

/// Stable handle of a node inside the tree's arena.
#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct NodeId(u64);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn next(self) -> NodeId {
        NodeId(self.0 + 1)
    }
}

/// Kind of a node as seen by callers of the tree.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

pub type Entries = LinkedHashMap<String, NodeId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Directory { children: Entries },
    File { contents: FileContents },
}

/// A directory or file stored in the arena.
///
/// `parent` is the directory the node was created in and is only used for
/// `..` traversal and working directory reconstruction. Lifetime is governed
/// by `links`, the number of directory entries referencing the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub parent: NodeId,
    pub links: usize,
    pub data: NodeData,
}

impl Node {
    pub fn directory(parent: NodeId) -> Self {
        Node {
            parent,
            links: 1,
            data: NodeData::Directory {
                children: Entries::new(),
            },
        }
    }

    pub fn file(parent: NodeId) -> Self {
        Node {
            parent,
            links: 1,
            data: NodeData::File {
                contents: FileContents::default(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Directory { .. } => NodeKind::Directory,
            NodeData::File { .. } => NodeKind::File,
        }
    }

    pub fn children(&self) -> Option<&Entries> {
        match &self.data {
            NodeData::Directory { children } => Some(children),
            NodeData::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Entries> {
        match &mut self.data {
            NodeData::Directory { children } => Some(children),
            NodeData::File { .. } => None,
        }
    }

    pub fn contents(&self) -> Option<&FileContents> {
        match &self.data {
            NodeData::File { contents } => Some(contents),
            NodeData::Directory { .. } => None,
        }
    }

    pub fn contents_mut(&mut self) -> Option<&mut FileContents> {
        match &mut self.data {
            NodeData::File { contents } => Some(contents),
            NodeData::Directory { .. } => None,
        }
    }
}
