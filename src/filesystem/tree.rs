use std::collections::HashMap;

use hashlink::LinkedHashMap;
use snafu::{OptionExt, ResultExt};
use tracing::{debug, error, warn};

use crate::filesystem::error::*;
use crate::filesystem::node::{Entries, Node, NodeData, NodeId, NodeKind};
use crate::filesystem::path::{self, Component, SEPARATOR};

/// Entries returned by [`Tree::list`], keyed by name.
pub type Listing = LinkedHashMap<String, NodeKind>;

/// Outcome of resolving a path: the node it names and the last name walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub node: NodeId,
    pub name: String,
}

/// In-memory directory tree with hard links and a working directory.
///
/// Nodes live in an arena keyed by [`NodeId`]; directories hold ids of their
/// children so a file may be referenced from several entries. The root is its
/// own parent.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    next_id: NodeId,
    root: NodeId,
    cwd: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let root = NodeId::ROOT;
        let nodes = HashMap::from([(root, Node::directory(root))]);
        Tree {
            nodes,
            next_id: root.next(),
            root,
            cwd: root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn list(&self, path: &str) -> Result<Listing, TreeError> {
        self.try_list(path).context(TreeSnafu {
            operation: Operation::List,
        })
    }

    pub fn touch(&mut self, path: &str) -> Result<(), TreeError> {
        self.try_touch(path).context(TreeSnafu {
            operation: Operation::Touch,
        })
    }

    pub fn make_dir(&mut self, path: &str) -> Result<(), TreeError> {
        self.try_make_dir(path).context(TreeSnafu {
            operation: Operation::MakeDir,
        })
    }

    pub fn link(&mut self, src: &str, dst: &str) -> Result<(), TreeError> {
        self.try_link(src, dst).context(TreeSnafu {
            operation: Operation::Link,
        })
    }

    pub fn remove(&mut self, path: &str) -> Result<(), TreeError> {
        self.try_remove(path).context(TreeSnafu {
            operation: Operation::Remove,
        })
    }

    pub fn change_dir(&mut self, path: &str) -> Result<(), TreeError> {
        self.try_change_dir(path).context(TreeSnafu {
            operation: Operation::ChangeDir,
        })
    }

    pub fn print_working_dir(&self) -> Result<String, TreeError> {
        self.try_print_working_dir().context(TreeSnafu {
            operation: Operation::PrintWorkingDir,
        })
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, TreeError> {
        self.try_read(path).context(TreeSnafu {
            operation: Operation::Read,
        })
    }

    pub fn write(&mut self, path: &str, data: &[u8]) -> Result<(), TreeError> {
        self.try_write(path, data).context(TreeSnafu {
            operation: Operation::Write,
        })
    }

    pub fn truncate(&mut self, path: &str) -> Result<(), TreeError> {
        self.try_truncate(path).context(TreeSnafu {
            operation: Operation::Truncate,
        })
    }

    /// Walks `path` from the root or the working directory.
    pub fn resolve(&self, path: &str) -> Result<Resolved, NodeError> {
        let (node, name) = self.walk(self.start(path), path::components(path), path)?;
        Ok(Resolved {
            node,
            name: name.unwrap_or(SEPARATOR).to_string(),
        })
    }

    fn try_list(&self, path: &str) -> Result<Listing, NodeError> {
        let resolved = self.resolve(path)?;
        let node = self.node(resolved.node)?;
        match node.children() {
            Some(children) => children
                .iter()
                .map(|(name, id)| -> Result<_, NodeError> {
                    Ok((name.clone(), self.node(*id)?.kind()))
                })
                .collect(),
            None => Ok(Listing::from_iter([(resolved.name, NodeKind::File)])),
        }
    }

    fn try_touch(&mut self, path: &str) -> Result<(), NodeError> {
        let (parent, name) = self.resolve_parent(path)?;
        if self.directory(parent, path)?.contains_key(name) {
            debug!("'{}' already exists, leaving it untouched", path);
            return Ok(());
        }

        let id = self.insert(Node::file(parent));
        self.directory_mut(parent, path)?.insert(name.to_string(), id);
        debug!("Created file {} as '{}' under {}", id, name, parent);
        Ok(())
    }

    fn try_make_dir(&mut self, path: &str) -> Result<(), NodeError> {
        match path::split_last(path) {
            Some((_, Component::Name(_))) => {}
            _ => return AlreadyExistsSnafu { path }.fail(),
        }

        let mut current = self.start(path);
        let mut components = path::components(path).peekable();
        while let Some(component) = components.next() {
            let is_last = components.peek().is_none();
            let name = match component {
                Component::Parent => {
                    current = self.parent_of(current, path)?;
                    continue;
                }
                Component::Name(name) => name,
            };

            let existing = self.directory(current, path)?.get(name).copied();
            match existing {
                Some(_) if is_last => return AlreadyExistsSnafu { path }.fail(),
                Some(existing) => current = existing,
                None => {
                    let id = self.insert(Node::directory(current));
                    self.directory_mut(current, path)?
                        .insert(name.to_string(), id);
                    debug!("Created directory {} as '{}' under {}", id, name, current);
                    current = id;
                }
            }
        }
        Ok(())
    }

    fn try_link(&mut self, src: &str, dst: &str) -> Result<(), NodeError> {
        let source = self.resolve(src)?.node;
        if self.node(source)?.kind() == NodeKind::Directory {
            return CannotLinkDirectorySnafu { path: src }.fail();
        }

        let (parent, name) = self.resolve_parent(dst)?;
        if self.directory(parent, dst)?.contains_key(name) {
            return AlreadyExistsSnafu { path: dst }.fail();
        }

        self.directory_mut(parent, dst)?
            .insert(name.to_string(), source);
        let node = self.node_mut(source)?;
        node.links += 1;
        debug!("Linked {} as '{}' ({} links)", source, dst, node.links);
        Ok(())
    }

    fn try_remove(&mut self, path: &str) -> Result<(), NodeError> {
        let (parent, name) = self.resolve_parent(path)?;
        let target = *self
            .directory(parent, path)?
            .get(name)
            .context(NotFoundSnafu { path })?;

        if self.node(target)?.kind() == NodeKind::Directory && self.contains_cwd(target)? {
            return BusySnafu { path }.fail();
        }

        self.directory_mut(parent, path)?.remove(name);
        debug!("Detached '{}' ({}) from {}", name, target, parent);
        self.release(target);
        Ok(())
    }

    fn try_change_dir(&mut self, path: &str) -> Result<(), NodeError> {
        let target = self.resolve(path)?.node;
        if self.node(target)?.kind() != NodeKind::Directory {
            return NotADirectorySnafu { path }.fail();
        }
        self.cwd = target;
        debug!("Working directory is now {}", target);
        Ok(())
    }

    fn try_print_working_dir(&self) -> Result<String, NodeError> {
        let mut names = Vec::new();
        let mut current = self.cwd;
        loop {
            let parent = self.node(current)?.parent;
            if parent == current {
                break;
            }

            // The name is re-derived from the parent on every call.
            let name = self
                .node(parent)?
                .children()
                .and_then(|children| {
                    children
                        .iter()
                        .find(|(_, child)| **child == current)
                        .map(|(name, _)| name.clone())
                })
                .context(InternalInconsistencySnafu {
                    node: current,
                    parent,
                })
                .inspect_err(|e| error!("Working directory reconstruction failed: {}", e))?;

            names.push(name);
            current = parent;
        }

        names.reverse();
        Ok(format!("{SEPARATOR}{}", names.join(SEPARATOR)))
    }

    fn try_read(&self, path: &str) -> Result<Vec<u8>, NodeError> {
        let target = self.resolve(path)?.node;
        let contents = self
            .node(target)?
            .contents()
            .context(CannotReadDirectorySnafu { path })?;
        Ok(contents.read())
    }

    fn try_write(&mut self, path: &str, data: &[u8]) -> Result<(), NodeError> {
        let target = self.resolve(path)?.node;
        let contents = self
            .node_mut(target)?
            .contents_mut()
            .context(CannotWriteDirectorySnafu { path })?;
        contents.append(data);
        debug!(
            "Appended {} bytes to {} ({} blocks)",
            data.len(),
            target,
            contents.block_count()
        );
        Ok(())
    }

    fn try_truncate(&mut self, path: &str) -> Result<(), NodeError> {
        let target = self.resolve(path)?.node;
        self.node_mut(target)?
            .contents_mut()
            .context(CannotTruncateDirectorySnafu { path })?
            .clear();
        debug!("Truncated {}", target);
        Ok(())
    }

    fn start(&self, path: &str) -> NodeId {
        if path::is_absolute(path) {
            self.root
        } else {
            self.cwd
        }
    }

    fn walk<'p>(
        &self,
        start: NodeId,
        components: impl IntoIterator<Item = Component<'p>>,
        path: &str,
    ) -> Result<(NodeId, Option<&'p str>), NodeError> {
        let mut current = start;
        let mut last_name = None;
        for component in components {
            match component {
                Component::Parent => current = self.parent_of(current, path)?,
                Component::Name(name) => {
                    current = *self
                        .directory(current, path)?
                        .get(name)
                        .context(NotFoundSnafu { path })?;
                    last_name = Some(name);
                }
            }
        }
        Ok((current, last_name))
    }

    /// Resolves the directory that holds the last component of `path`.
    fn resolve_parent<'p>(&self, path: &'p str) -> Result<(NodeId, &'p str), NodeError> {
        let Some((init, Component::Name(name))) = path::split_last(path) else {
            return InvalidPathSnafu { path }.fail();
        };
        let (parent, _) = self.walk(self.start(path), init, path)?;
        self.directory(parent, path)?;
        Ok((parent, name))
    }

    fn parent_of(&self, id: NodeId, path: &str) -> Result<NodeId, NodeError> {
        let parent = self.node(id)?.parent;
        // A file can outlive the directory it was created in through a link.
        if !self.nodes.contains_key(&parent) {
            return NotFoundSnafu { path }.fail();
        }
        Ok(parent)
    }

    /// True if `dir` is the working directory or one of its ancestors.
    fn contains_cwd(&self, dir: NodeId) -> Result<bool, NodeError> {
        let mut current = self.cwd;
        loop {
            if current == dir {
                return Ok(true);
            }
            let parent = self.node(current)?.parent;
            if parent == current {
                return Ok(false);
            }
            current = parent;
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, NodeError> {
        self.nodes.get(&id).context(DanglingNodeSnafu { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, NodeError> {
        self.nodes.get_mut(&id).context(DanglingNodeSnafu { node: id })
    }

    fn directory(&self, id: NodeId, path: &str) -> Result<&Entries, NodeError> {
        self.node(id)?
            .children()
            .context(NotADirectorySnafu { path })
    }

    fn directory_mut(&mut self, id: NodeId, path: &str) -> Result<&mut Entries, NodeError> {
        self.node_mut(id)?
            .children_mut()
            .context(NotADirectorySnafu { path })
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        self.nodes.insert(id, node);
        id
    }

    /// Drops one reference to `id`, collecting it and its subtree once unreferenced.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                warn!("Released node {} is not in the arena", id);
                continue;
            };
            node.links = node.links.saturating_sub(1);
            if node.links > 0 {
                debug!("{} still has {} links", id, node.links);
                continue;
            }

            if let Some(node) = self.nodes.remove(&id) {
                debug!("Collected {}", id);
                if let NodeData::Directory { children } = node.data {
                    pending.extend(children.values().copied());
                }
            }
        }
    }
}
