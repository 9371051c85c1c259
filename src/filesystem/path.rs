pub const SEPARATOR: &str = "/";
pub const PARENT: &str = "..";

/// A single non-empty segment of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component<'a> {
    Parent,
    Name(&'a str),
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Splits `path` into components, skipping empty segments.
pub fn components(path: &str) -> impl Iterator<Item = Component<'_>> {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            PARENT => Component::Parent,
            name => Component::Name(name),
        })
}

/// Splits off the last component of `path`.
///
/// Returns every preceding component and the final one, or `None` when the
/// path has no components at all.
pub fn split_last(path: &str) -> Option<(Vec<Component<'_>>, Component<'_>)> {
    let mut all: Vec<Component<'_>> = components(path).collect();
    let last = all.pop()?;
    Some((all, last))
}
