//! # Record Queries
//!
//! A [`RecordQuery`] combines free-text search, a tag filter, a category filter and
//! a sort key. Filters are conjunctive: a record is listed only if it passes all
//! three.
//!
//! | Filter | Passes when |
//! |--------|-------------|
//! | text | search text is blank, or it is a case-insensitive substring of the title, the body, or any tag |
//! | tag | [`TagFilter::All`], or the record's tags contain the name exactly |
//! | category | [`CategoryFilter::All`], or the record's category equals it |
//!
//! The search text is matched as given: it is only trimmed to decide whether it is
//! blank.
//!
//! Titles sort by [`title_sort_key`] (accents dropped, katakana folded onto
//! hiragana, case folded), so kana follow the gojūon table across both scripts.
//! Sorting is always stable: records with equal keys keep the order they have in
//! the working set (most recently created first).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Category, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Title => "title",
        };
        f.write_str(s)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "new" => Ok(SortKey::Newest),
            "oldest" | "old" => Ok(SortKey::Oldest),
            "title" | "name" => Ok(SortKey::Title),
            other => Err(format!(
                "unknown sort order '{}' (expected newest, oldest or title)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl From<Option<String>> for TagFilter {
    fn from(tag: Option<String>) -> Self {
        match tag {
            Some(name) => TagFilter::Tag(name),
            None => TagFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl From<Option<Category>> for CategoryFilter {
    fn from(category: Option<Category>) -> Self {
        match category {
            Some(c) => CategoryFilter::Only(c),
            None => CategoryFilter::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub search_text: String,
    pub tag: TagFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<TagFilter>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        matches_text(record, &self.search_text)
            && matches_tag(record, &self.tag)
            && matches_category(record, self.category)
    }
}

impl From<&str> for TagFilter {
    fn from(name: &str) -> Self {
        TagFilter::Tag(name.to_string())
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// Filters and sorts `records` into a new vector. The input is left untouched.
pub fn run(records: &[Record], query: &RecordQuery) -> Vec<Record> {
    let mut listed: Vec<Record> = records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect();
    sort_records(&mut listed, query.sort);
    listed
}

pub fn sort_records(records: &mut [Record], sort: SortKey) {
    match sort {
        SortKey::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Title => records.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
}

fn matches_text(record: &Record, search_text: &str) -> bool {
    if search_text.trim().is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    record.title.to_lowercase().contains(&needle)
        || record.body.to_lowercase().contains(&needle)
        || record
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

fn matches_tag(record: &Record, filter: &TagFilter) -> bool {
    match filter {
        TagFilter::All => true,
        TagFilter::Tag(name) => record.has_tag(name),
    }
}

fn matches_category(record: &Record, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(category) => record.category == Some(category),
    }
}

/// Compares titles by [`title_sort_key`], then by the raw strings.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_sort_key(a)
        .cmp(&title_sort_key(b))
        .then_with(|| a.cmp(b))
}

/// Primary collation key for titles: NFD with combining marks dropped, katakana
/// folded onto hiragana, lowercased.
///
/// Hiragana code points follow the gojūon table, so once katakana is folded both
/// kana scripts interleave in gojūon order. Voiced kana (が) share a key with their
/// unvoiced base (か) and fall back to the raw comparison, which puts か first.
pub fn title_sort_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_katakana)
        .collect::<String>()
        .to_lowercase()
}

fn fold_katakana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}
