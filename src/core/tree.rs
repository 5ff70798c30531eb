use std::collections::HashSet;

use crate::models::{DocNode, WireNode, normalize_children};

/// Result of merging a fetched listing into the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeResult {
    /// Children were replaced at the target node.
    Merged { children: usize },
    /// The target path is no longer part of the tree.
    TargetMissing,
}

/// Cached document tree.
///
/// Nodes are owned by their parent and addressed by path. All traversals use
/// an explicit stack so deep trees never grow the call stack.
///
/// # Path Convention
///
/// - Root: no path (`DocNode::path == None`)
/// - Top-level entry: `"guides"`
/// - Nested entry: `"guides/rust/ownership.md"`
/// - No leading or trailing slashes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocTree {
    root: DocNode,
}

impl DocTree {
    /// Build a tree from a `/docs/tree` snapshot.
    ///
    /// Nodes whose path repeats an earlier one are dropped.
    pub fn from_snapshot(snapshot: WireNode) -> Self {
        let mut seen = HashSet::new();
        Self {
            root: snapshot.into_root(&mut seen),
        }
    }

    /// Wrap an already normalized root node.
    pub fn from_root(root: DocNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &DocNode {
        &self.root
    }

    /// Find a node by path (depth-first, pre-order).
    pub fn find(&self, path: &str) -> Option<&DocNode> {
        let mut stack: Vec<&DocNode> = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.path.as_deref() == Some(path) {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut DocNode> {
        let mut stack: Vec<&mut DocNode> = vec![&mut self.root];
        while let Some(node) = stack.pop() {
            if node.path.as_deref() == Some(path) {
                return Some(node);
            }
            stack.extend(node.children.iter_mut().rev());
        }
        None
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// All node paths in depth-first pre-order (root excluded).
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let Some(path) = &node.path {
                paths.push(path.clone());
            }
            stack.extend(node.children.iter().rev());
        }
        paths
    }

    /// Paths of every node outside the subtree rooted at `target`.
    ///
    /// Returns `None` if `target` is not in the tree.
    fn paths_outside(&self, target: &str) -> Option<HashSet<String>> {
        let mut found = false;
        let mut paths = HashSet::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.path.as_deref() == Some(target) {
                found = true;
                continue;
            }
            if let Some(path) = &node.path {
                paths.insert(path.clone());
            }
            stack.extend(node.children.iter());
        }
        found.then_some(paths)
    }

    /// Replace the children of the node at `path` with a fetched listing.
    ///
    /// The first node matching `path` receives the children and is marked
    /// loaded; the search does not descend below it. Fetched entries whose
    /// path already exists elsewhere in the tree are dropped.
    pub fn merge_children(&mut self, path: &str, incoming: Vec<WireNode>) -> MergeResult {
        let Some(mut seen) = self.paths_outside(path) else {
            return MergeResult::TargetMissing;
        };
        seen.insert(path.to_string());
        let children = normalize_children(incoming, Some(path), &mut seen);
        let count = children.len();

        match self.find_mut(path) {
            Some(node) => {
                node.children = children;
                node.is_loaded = true;
                MergeResult::Merged { children: count }
            }
            None => MergeResult::TargetMissing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> WireNode {
        serde_json::from_value(value).expect("valid wire node")
    }

    fn wires(value: serde_json::Value) -> Vec<WireNode> {
        serde_json::from_value(value).expect("valid wire nodes")
    }

    fn create_test_tree() -> DocTree {
        DocTree::from_snapshot(wire(json!({
            "name": "root",
            "children": [
                { "name": "a", "path": "a", "is_dir": true },
                {
                    "name": "guides",
                    "children": [
                        { "name": "intro.md", "path": "guides/intro.md", "type": "file" },
                        { "name": "deep", "path": "guides/deep", "is_dir": true }
                    ]
                },
                { "name": "readme.md", "path": "readme.md", "type": "file" }
            ]
        })))
    }

    #[test]
    fn test_from_snapshot() {
        let tree = create_test_tree();
        assert_eq!(tree.root().path, None);
        assert_eq!(tree.node_count(), 6);
        assert!(tree.find("a").unwrap().needs_fetch());
        assert!(tree.find("guides").unwrap().is_loaded);
        assert!(tree.contains("guides/deep"));
        assert!(!tree.contains("missing"));
    }

    #[test]
    fn test_paths_pre_order() {
        let tree = create_test_tree();
        assert_eq!(
            tree.paths(),
            vec!["a", "guides", "guides/intro.md", "guides/deep", "readme.md"]
        );
    }

    #[test]
    fn test_merge_children_example() {
        let mut tree = DocTree::from_root(DocNode {
            name: "root".into(),
            children: vec![DocNode::directory("a", "a")],
            is_directory: true,
            is_loaded: true,
            ..Default::default()
        });

        let result = tree.merge_children("a", wires(json!([{ "name": "1", "path": "a/1", "type": "file" }])));
        assert_eq!(result, MergeResult::Merged { children: 1 });

        let a = tree.find("a").unwrap();
        assert_eq!(
            a,
            &DocNode {
                name: "a".into(),
                path: Some("a".into()),
                children: vec![DocNode::file("1", "a/1")],
                is_directory: true,
                is_loaded: true,
            }
        );
    }

    #[test]
    fn test_merge_nested_target() {
        let mut tree = create_test_tree();
        let result = tree.merge_children(
            "guides/deep",
            wires(json!([
                { "name": "x.md", "type": "file" },
                { "name": "sub", "is_dir": true }
            ])),
        );
        assert_eq!(result, MergeResult::Merged { children: 2 });
        assert!(tree.contains("guides/deep/x.md"));
        assert!(tree.find("guides/deep/sub").unwrap().needs_fetch());
    }

    #[test]
    fn test_merge_missing_target() {
        let mut tree = create_test_tree();
        let before = tree.clone();
        let result = tree.merge_children("gone", wires(json!([{ "name": "z", "path": "gone/z" }])));
        assert_eq!(result, MergeResult::TargetMissing);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let listing = json!([
            { "name": "1.md", "path": "a/1.md", "type": "file" },
            { "name": "2", "path": "a/2", "is_dir": true }
        ]);
        let mut tree = create_test_tree();
        tree.merge_children("a", wires(listing.clone()));
        let once = tree.clone();
        tree.merge_children("a", wires(listing));
        assert_eq!(tree, once);
    }

    #[test]
    fn test_merge_drops_paths_taken_elsewhere() {
        let mut tree = create_test_tree();
        tree.merge_children(
            "a",
            wires(json!([
                { "name": "readme.md", "path": "readme.md", "type": "file" },
                { "name": "a", "path": "a", "type": "file" },
                { "name": "ok.md", "path": "a/ok.md", "type": "file" }
            ])),
        );

        let a = tree.find("a").unwrap();
        assert_eq!(a.children, vec![DocNode::file("ok.md", "a/ok.md")]);

        let paths = tree.paths();
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(paths.len(), unique.len());
    }

    #[test]
    fn test_merge_replaces_previous_children() {
        let mut tree = create_test_tree();
        tree.merge_children("guides", wires(json!([{ "name": "new.md", "path": "guides/new.md", "type": "file" }])));
        assert!(!tree.contains("guides/intro.md"));
        assert!(tree.contains("guides/new.md"));
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut node = DocNode::file("leaf.md", "leaf.md");
        for depth in (0..2_000).rev() {
            let path = format!("d{}", depth);
            node = DocNode {
                name: path.clone(),
                path: Some(path),
                children: vec![node],
                is_directory: true,
                is_loaded: true,
            };
        }
        let tree = DocTree::from_root(DocNode {
            name: "root".into(),
            children: vec![node],
            is_directory: true,
            is_loaded: true,
            ..Default::default()
        });
        assert!(tree.contains("leaf.md"));
        assert_eq!(tree.node_count(), 2_002);
    }
}
