//! Read-only YAML view of the tree, rooted at the working directory.

use std::borrow::Cow;

use hashlink::LinkedHashMap;
use saphyr::{EmitError, Scalar, Yaml, YamlEmitter};
use snafu::{ResultExt, Snafu};

use crate::filesystem::{NodeData, NodeId, Tree};

fn string(value: impl Into<String>) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Owned(value.into())))
}

fn integer(value: usize) -> Yaml<'static> {
    Yaml::Value(Scalar::Integer(value as i64))
}

/// Builds the YAML document describing `id` and everything below it.
///
/// The root's self-parent is never followed; directories cannot be linked, so
/// the walk always terminates.
pub fn project(tree: &Tree, id: NodeId) -> Yaml<'static> {
    let Some(node) = tree.get(id) else {
        return Yaml::Value(Scalar::Null);
    };

    let mut mapping = LinkedHashMap::new();
    mapping.insert(string("type"), string(node.kind().to_string()));
    match &node.data {
        NodeData::Directory { children } => {
            let children = children
                .iter()
                .map(|(name, child)| (string(name.as_str()), project(tree, *child)))
                .collect::<LinkedHashMap<_, _>>();
            mapping.insert(string("children"), Yaml::Mapping(children));
        }
        NodeData::File { contents } => {
            mapping.insert(string("size"), integer(contents.len()));
            mapping.insert(string("blocks"), integer(contents.block_count()));
        }
    }
    Yaml::Mapping(mapping)
}

/// Renders the working directory subtree as YAML text.
pub fn render(tree: &Tree) -> Result<String, ProjectionError> {
    let document = project(tree, tree.cwd());
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&document)
        .context(EmitSnafu)?;
    Ok(out)
}

#[derive(Debug, Snafu)]
pub enum ProjectionError {
    #[snafu(display("Failed to render the tree"))]
    EmitError { source: EmitError },
}
