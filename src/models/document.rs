use serde::{Deserialize, Serialize};

/// Rendering family of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Markdown,
    Pdf,
}

/// Body of `/docs/content/{path}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocContent {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: Option<DocKind>,
    #[serde(default)]
    pub page_count: Option<u32>,
    /// Estimated reading time in minutes
    #[serde(default)]
    pub estimated_reading_time: Option<u32>,
}

impl DocContent {
    /// Display name, falling back to the last path segment.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.path.rsplit('/').next().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

/// One ancestor in the breadcrumb trail of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub name: String,
    pub path: String,
}

impl BreadcrumbItem {
    /// Derive the trail from the path alone, one item per segment.
    pub fn trail(path: &str) -> Vec<Self> {
        let mut current = String::new();
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                if !current.is_empty() {
                    current.push('/');
                }
                current.push_str(segment);
                Self {
                    name: segment.to_string(),
                    path: current.clone(),
                }
            })
            .collect()
    }
}

/// Entry of `/docs/recent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentDoc {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_breadcrumb_trail() {
        let trail = BreadcrumbItem::trail("guides/rust/ownership.md");
        let paths: Vec<_> = trail.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["guides", "guides/rust", "guides/rust/ownership.md"]);
        assert_eq!(trail[2].name, "ownership.md");
        assert!(BreadcrumbItem::trail("").is_empty());
    }

    #[test]
    fn test_content_minimal_body() {
        let doc: DocContent = serde_json::from_value(json!({
            "path": "notes/a.md",
            "content": "# A",
            "last_modified": "2024-03-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(doc.display_name(), "a.md");
        assert_eq!(doc.kind, None);

        let pdf: DocContent =
            serde_json::from_value(json!({ "path": "b.pdf", "type": "pdf", "page_count": 3 }))
                .unwrap();
        assert_eq!(pdf.kind, Some(DocKind::Pdf));
    }
}
