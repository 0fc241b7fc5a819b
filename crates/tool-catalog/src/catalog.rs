/// Immutable tool catalog.
///
/// Loaded once at startup (bundled JSON or `TOOL_CATALOG_PATH`), validated, and then shared
/// read-only for the lifetime of the process.
use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::model::{CategoryRecord, ToolRecord};
use crate::query::compare_names;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryRecord>,
    tools: Vec<ToolRecord>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<ToolRecord>,
    categories: Vec<CategoryRecord>,
}

impl Catalog {
    /// Build a catalog, enforcing slug uniqueness and category references.
    pub fn new(tools: Vec<ToolRecord>, categories: Vec<CategoryRecord>) -> Result<Self, AppError> {
        let mut category_slugs = HashSet::new();
        for category in &categories {
            if !category_slugs.insert(category.slug.as_str()) {
                return Err(AppError::DuplicateSlug {
                    kind: "category",
                    slug: category.slug.clone(),
                });
            }
        }

        let mut tool_slugs = HashSet::new();
        for tool in &tools {
            if !tool_slugs.insert(tool.slug.as_str()) {
                return Err(AppError::DuplicateSlug {
                    kind: "tool",
                    slug: tool.slug.clone(),
                });
            }
            if !category_slugs.contains(tool.category.as_str()) {
                return Err(AppError::UnknownCategory {
                    tool: tool.slug.clone(),
                    category: tool.category.clone(),
                });
            }
        }

        Ok(Self { tools, categories })
    }

    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::new(file.tools, file.categories)
    }

    pub fn tools(&self) -> &[ToolRecord] {
        &self.tools
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    /// Case-insensitive slug lookup.
    pub fn tool(&self, slug: &str) -> Option<&ToolRecord> {
        self.tools.iter().find(|t| t.slug.eq_ignore_ascii_case(slug))
    }

    pub fn category(&self, slug: &str) -> Option<&CategoryRecord> {
        self.categories
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(slug))
    }

    pub fn tools_in_category<'a>(
        &'a self,
        slug: &'a str,
    ) -> impl Iterator<Item = &'a ToolRecord> + 'a {
        self.tools.iter().filter(move |t| t.category == slug)
    }

    pub fn category_tool_count(&self, slug: &str) -> usize {
        self.tools_in_category(slug).count()
    }

    /// Featured tools ordered by name.
    pub fn featured_tools(&self) -> Vec<&ToolRecord> {
        let mut featured: Vec<&ToolRecord> = self.tools.iter().filter(|t| t.is_featured).collect();
        featured.sort_by(|a, b| compare_names(&a.name, &b.name));
        featured
    }

    /// Other tools in the same category: featured first, then by name.
    pub fn related_tools(&self, slug: &str, limit: usize) -> Vec<&ToolRecord> {
        let Some(tool) = self.tool(slug) else {
            return Vec::new();
        };
        let mut related: Vec<&ToolRecord> = self
            .tools_in_category(&tool.category)
            .filter(|t| t.slug != tool.slug)
            .collect();
        related.sort_by(|a, b| {
            b.is_featured
                .cmp(&a.is_featured)
                .then_with(|| compare_names(&a.name, &b.name))
        });
        related.truncate(limit);
        related
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::icon::Icon;
    use crate::model::{CategoryRecord, Difficulty, ToolRecord};

    pub fn tool(slug: &str, name: &str, category: &str) -> ToolRecord {
        ToolRecord {
            slug: slug.to_string(),
            name: name.to_string(),
            short_description: format!("{name} description"),
            category: category.to_string(),
            tags: Vec::new(),
            is_featured: false,
            is_premium: false,
            difficulty: Difficulty::Beginner,
        }
    }

    pub fn category(slug: &str, name: &str) -> CategoryRecord {
        CategoryRecord {
            slug: slug.to_string(),
            name: name.to_string(),
            description: format!("{name} tools"),
            icon: Icon::Code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{category, tool};
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().expect("bundled catalog loads");
        assert!(catalog.tools().len() >= 20);
        assert!(catalog.categories().len() >= 5);
        assert!(catalog.tool("json-formatter").is_some());
        assert!(catalog.tool("JSON-Formatter").is_some());
        assert!(!catalog.featured_tools().is_empty());
    }

    #[test]
    fn duplicate_tool_slug_is_rejected() {
        let err = Catalog::new(
            vec![tool("a", "A", "dev"), tool("a", "Again", "dev")],
            vec![category("dev", "Dev")],
        )
        .expect_err("duplicate slug");
        assert!(matches!(err, AppError::DuplicateSlug { kind: "tool", .. }));
    }

    #[test]
    fn duplicate_category_slug_is_rejected() {
        let err = Catalog::new(Vec::new(), vec![category("dev", "Dev"), category("dev", "Dev 2")])
            .expect_err("duplicate slug");
        assert!(matches!(err, AppError::DuplicateSlug { kind: "category", .. }));
    }

    #[test]
    fn dangling_category_reference_is_rejected() {
        let err = Catalog::new(vec![tool("a", "A", "missing")], vec![category("dev", "Dev")])
            .expect_err("unknown category");
        assert!(matches!(err, AppError::UnknownCategory { .. }));
    }

    #[test]
    fn unknown_icon_fails_to_load() {
        let json = r#"{
            "categories": [{"slug": "dev", "name": "Dev", "description": "", "icon": "rocket"}],
            "tools": []
        }"#;
        assert!(matches!(Catalog::from_json(json), Err(AppError::Parse(_))));
    }

    #[test]
    fn related_tools_prefer_featured_then_name() {
        let mut featured = tool("c", "Charlie", "dev");
        featured.is_featured = true;
        let catalog = Catalog::new(
            vec![
                tool("a", "Alpha", "dev"),
                tool("b", "bravo", "dev"),
                featured,
                tool("x", "Other", "text"),
            ],
            vec![category("dev", "Dev"), category("text", "Text")],
        )
        .expect("valid catalog");

        let related: Vec<&str> = catalog
            .related_tools("a", 5)
            .iter()
            .map(|t| t.slug.as_str())
            .collect();
        assert_eq!(related, ["c", "b"]);
        assert_eq!(catalog.related_tools("a", 1).len(), 1);
        assert!(catalog.related_tools("missing", 5).is_empty());
        assert_eq!(catalog.category_tool_count("dev"), 3);
    }
}
