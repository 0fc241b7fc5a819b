/// Catalog query engine.
///
/// Pure functions from (catalog slice, query) to an ordered subset. Nothing here allocates
/// new records or can fail: an empty result is simply an empty `Vec`.
use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::model::{CategoryRecord, Difficulty, ToolRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumFilter {
    Free,
    Premium,
}

impl PremiumFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }

    fn accepts(self, tool: &ToolRecord) -> bool {
        match self {
            Self::Free => !tool.is_premium,
            Self::Premium => tool.is_premium,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Category,
    Featured,
    /// There is no creation timestamp on `ToolRecord`, so this orders exactly like `Name`.
    Newest,
}

impl SortKey {
    /// Unknown keys fall back to `Name`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" => Self::Category,
            "featured" => Self::Featured,
            "newest" => Self::Newest,
            _ => Self::Name,
        }
    }
}

/// Query parameters. `None` on a filter means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolQuery {
    pub text: String,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub premium: Option<PremiumFilter>,
    pub sort: SortKey,
}

impl ToolQuery {
    /// Build a query from raw string inputs. "all", blank and unrecognised values (including
    /// category slugs the catalog does not know) all mean "no filter". The text is kept
    /// verbatim.
    pub fn from_raw(
        catalog: &Catalog,
        text: Option<&str>,
        category: Option<&str>,
        difficulty: Option<&str>,
        premium: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            text: text.unwrap_or_default().to_string(),
            category: category
                .and_then(|slug| catalog.category(slug.trim()))
                .map(|c| c.slug.clone()),
            difficulty: difficulty.and_then(Difficulty::parse),
            premium: premium.and_then(PremiumFilter::parse),
            sort: sort.map(SortKey::parse).unwrap_or_default(),
        }
    }
}

/// Case-insensitive substring match against name, short description and tags.
/// Only the empty query matches every tool; whitespace is part of the needle.
pub fn matches_text(tool: &ToolRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    tool.name.to_lowercase().contains(&needle)
        || tool.short_description.to_lowercase().contains(&needle)
        || tool.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

fn matches_filters(tool: &ToolRecord, query: &ToolQuery) -> bool {
    query.category.as_deref().map_or(true, |c| tool.category == c)
        && query.difficulty.map_or(true, |d| tool.difficulty == d)
        && query.premium.map_or(true, |p| p.accepts(tool))
}

/// Tools satisfying every active filter and the text match, in catalog order.
pub fn filter_tools<'a>(tools: &'a [ToolRecord], query: &ToolQuery) -> Vec<&'a ToolRecord> {
    tools
        .iter()
        .filter(|tool| matches_filters(tool, query) && matches_text(tool, &query.text))
        .collect()
}

/// Stable in-place sort.
pub fn sort_tools(tools: &mut [&ToolRecord], key: SortKey) {
    match key {
        SortKey::Name | SortKey::Newest => tools.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Category => tools.sort_by(|a, b| a.category.cmp(&b.category)),
        SortKey::Featured => tools.sort_by(|a, b| {
            b.is_featured
                .cmp(&a.is_featured)
                .then_with(|| compare_names(&a.name, &b.name))
        }),
    }
}

pub fn query_tools<'a>(tools: &'a [ToolRecord], query: &ToolQuery) -> Vec<&'a ToolRecord> {
    let mut results = filter_tools(tools, query);
    sort_tools(&mut results, query.sort);
    results
}

/// Categories whose name or description contains the query, or that own at least one tool
/// matching it. Source order is kept.
pub fn filter_categories<'a>(
    categories: &'a [CategoryRecord],
    tools: &[ToolRecord],
    query: &str,
) -> Vec<&'a CategoryRecord> {
    if query.is_empty() {
        return categories.iter().collect();
    }
    let needle = query.to_lowercase();
    categories
        .iter()
        .filter(|category| {
            category.name.to_lowercase().contains(&needle)
                || category.description.to_lowercase().contains(&needle)
                || tools
                    .iter()
                    .any(|t| t.category == category.slug && matches_text(t, query))
        })
        .collect()
}

/// Display-name ordering: case-insensitive first, exact comparison as the tie-break so the
/// order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
