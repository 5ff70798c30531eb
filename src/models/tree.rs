use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// =============================================================================
// Cached Tree Node
// =============================================================================

/// A node of the cached document tree.
///
/// Every node except the root carries a `path` that is unique across the
/// whole tree. Directories whose subtree has not been fetched yet have no
/// children and `is_loaded == false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocNode {
    /// Display name (last path segment)
    pub name: String,
    /// Unique path from the content root (None only for the root)
    pub path: Option<String>,
    /// Ordered children, owned by this node
    pub children: Vec<DocNode>,
    pub is_directory: bool,
    /// Whether `children` reflects the backend (always true for files)
    pub is_loaded: bool,
}

impl DocNode {
    /// Create a directory whose children have not been fetched.
    pub fn directory(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Some(path.to_string()),
            children: Vec::new(),
            is_directory: true,
            is_loaded: false,
        }
    }

    /// Create a document leaf.
    pub fn file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Some(path.to_string()),
            children: Vec::new(),
            is_directory: false,
            is_loaded: true,
        }
    }

    /// Path as a string slice (empty for the root).
    #[inline]
    pub fn path_str(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    /// Whether expanding this node would issue a subtree fetch.
    pub fn needs_fetch(&self) -> bool {
        self.is_directory && !self.is_loaded
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Tree node as returned by `/docs/tree` and `/docs/subtree/{path}`.
///
/// The backend is loose about which fields it sends: directory nodes of the
/// full tree have no `path`, files are tagged with `type: "file"`, and lazy
/// listings may send `has_children` instead of `children`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WireNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<WireNode>>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_dir: Option<bool>,
    #[serde(default)]
    pub is_file: Option<bool>,
    #[serde(default)]
    pub has_children: Option<bool>,
}

/// Body of `/docs/subtree/{path}`.
///
/// Accepts both `{ "children": [...] }` and a full node, whose extra fields
/// are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubtreeResponse {
    #[serde(default)]
    pub children: Vec<WireNode>,
}

impl WireNode {
    fn is_directory(&self) -> bool {
        if let Some(is_dir) = self.is_dir {
            return is_dir;
        }
        if let Some(is_file) = self.is_file {
            return !is_file;
        }
        match self.kind.as_deref() {
            Some("file") => false,
            Some("dir" | "directory" | "folder") => true,
            _ => self.children.is_some() || self.has_children == Some(true),
        }
    }

    /// Whether the children sent with this node are the complete listing.
    fn is_loaded(&self) -> bool {
        match (&self.children, self.has_children) {
            (Some(children), _) if !children.is_empty() => true,
            (Some(_), Some(true)) => false,
            (Some(_), _) => true,
            (None, Some(false)) => true,
            (None, _) => false,
        }
    }

    /// Convert into a cached node below `parent`.
    ///
    /// Missing paths are derived from the parent path and the node name.
    /// Returns `None` if the resulting path is empty or already in `seen`.
    pub(crate) fn into_node(
        self,
        parent: Option<&str>,
        seen: &mut HashSet<String>,
    ) -> Option<DocNode> {
        let path = match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => path.trim_matches('/').to_string(),
            None => match parent.filter(|p| !p.is_empty()) {
                Some(parent) => format!("{}/{}", parent, self.name),
                None => self.name.clone(),
            },
        };
        if path.is_empty() {
            tracing::warn!("dropping tree node without name or path");
            return None;
        }
        if !seen.insert(path.clone()) {
            tracing::warn!(path = %path, "dropping tree node with duplicate path");
            return None;
        }

        let is_directory = self.is_directory();
        let is_loaded = !is_directory || self.is_loaded();
        let name = if self.name.is_empty() {
            path.rsplit('/').next().unwrap_or_default().to_string()
        } else {
            self.name
        };
        let children = if is_directory {
            normalize_children(self.children.unwrap_or_default(), Some(&path), seen)
        } else {
            Vec::new()
        };

        Some(DocNode {
            name,
            path: Some(path),
            children,
            is_directory,
            is_loaded,
        })
    }

    /// Convert a full snapshot into the root node.
    ///
    /// The root never carries a path.
    pub(crate) fn into_root(self, seen: &mut HashSet<String>) -> DocNode {
        let is_loaded = self.is_loaded();
        let name = if self.name.is_empty() {
            "root".to_string()
        } else {
            self.name
        };
        DocNode {
            name,
            path: None,
            children: normalize_children(self.children.unwrap_or_default(), None, seen),
            is_directory: true,
            is_loaded,
        }
    }
}

/// Convert a wire listing, dropping nodes whose path is already taken.
pub(crate) fn normalize_children(
    nodes: Vec<WireNode>,
    parent: Option<&str>,
    seen: &mut HashSet<String>,
) -> Vec<DocNode> {
    nodes
        .into_iter()
        .filter_map(|node| node.into_node(parent, seen))
        .collect()
}
