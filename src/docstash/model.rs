//! # Domain Model
//!
//! This module defines the record side of docstash: [`Record`], the unvalidated
//! [`RecordDraft`] it is built from, the [`Category`] discriminator and the
//! [`QaBody`] composite body format. Tags live in [`crate::tags`].
//!
//! ## Records Are Append-Only
//!
//! A record is created once and never edited. The only way to "change" one is to
//! delete it and register a new one, which is why there is no `update` anywhere in
//! the store or provider APIs (cascading tag deletion is the one exception, see
//! [`crate::store`]).
//!
//! ## Categories
//!
//! Records and tags can be scoped to an input mode ("document" vs "knowledge").
//! The category is an explicit field. Tag strings never carry a hidden `type:`
//! prefix, so every entry in [`Record::tags`] is a user-facing label.
//!
//! ## Q&A Bodies
//!
//! Knowledge notes are often written as a question and its answer. They are stored
//! in the plain `body` field as delimited lines:
//!
//! ```text
//! Q: How do I rotate the API key?
//! A: Open the console, then Settings > Keys.
//!    Old keys stay valid for 24h.
//! ```
//!
//! Only the first line of each part carries the prefix. [`QaBody::parse`] returns
//! `None` for bodies that are not in this shape, so free text and Q&A bodies can
//! live side by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DocstashError, Result};

const QUESTION_PREFIX: &str = "Q: ";
const ANSWER_PREFIX: &str = "A: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Document,
    Knowledge,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Document => "document",
            Category::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" | "doc" => Ok(Category::Document),
            "knowledge" | "note" => Ok(Category::Knowledge),
            other => Err(format!(
                "unknown category '{}' (expected 'document' or 'knowledge')",
                other
            )),
        }
    }
}

/// A stored document or knowledge note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// External reference, empty when absent.
    #[serde(default)]
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Record {
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// The body split back into question and answer, if it was composed that way.
    pub fn qa(&self) -> Option<QaBody> {
        QaBody::parse(&self.body)
    }
}

/// Input for creating a [`Record`]. Nothing is validated until [`RecordDraft::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub url: String,
    pub category: Option<Category>,
}

impl RecordDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Validates the draft and stamps a fresh id and creation time.
    ///
    /// Tags are trimmed, blank entries dropped and exact repeats collapsed while
    /// keeping the first occurrence. A draft with a blank title or no remaining
    /// tag is rejected with a [`DocstashError::Validation`].
    pub fn build(&self) -> Result<Record> {
        let title = self.title.trim();

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        if title.is_empty() || tags.is_empty() {
            return Err(DocstashError::Validation(
                "title and tag are required".to_string(),
            ));
        }

        Ok(Record {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: self.body.trim_end().to_string(),
            tags,
            url: self.url.trim().to_string(),
            created_at: Utc::now(),
            category: self.category,
        })
    }
}

/// A question/answer pair stored in a record body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaBody {
    pub question: String,
    pub answer: String,
}

impl QaBody {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Serializes into the `Q: ...` / `A: ...` line format.
    pub fn compose(&self) -> String {
        format!(
            "{}{}\n{}{}",
            QUESTION_PREFIX,
            self.question.trim(),
            ANSWER_PREFIX,
            self.answer.trim()
        )
    }

    pub fn parse(body: &str) -> Option<Self> {
        let rest = body.trim_start().strip_prefix(QUESTION_PREFIX)?;

        let mut question = Vec::new();
        let mut answer: Option<Vec<&str>> = None;
        for line in rest.lines() {
            match answer.as_mut() {
                Some(lines) => lines.push(line),
                None => match line.strip_prefix(ANSWER_PREFIX) {
                    Some(first) => answer = Some(vec![first]),
                    None => question.push(line),
                },
            }
        }

        Some(Self {
            question: question.join("\n").trim().to_string(),
            answer: answer?.join("\n").trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_trims_and_stamps() {
        let record = RecordDraft::new("  Spec A ")
            .with_tags(["infra", " urgent "])
            .with_url(" https://example.com ")
            .build()
            .unwrap();

        assert_eq!(record.title, "Spec A");
        assert_eq!(record.tags, vec!["infra", "urgent"]);
        assert_eq!(record.url, "https://example.com");
        assert!(record.category.is_none());
    }

    #[test]
    fn build_rejects_blank_title() {
        let err = RecordDraft::new("   ")
            .with_tags(["infra"])
            .build()
            .unwrap_err();
        assert!(matches!(err, DocstashError::Validation(_)));
        assert_eq!(err.to_string(), "title and tag are required");
    }

    #[test]
    fn build_rejects_empty_tag_selection() {
        assert!(RecordDraft::new("Title").build().is_err());
        assert!(RecordDraft::new("Title")
            .with_tags(["", "  "])
            .build()
            .is_err());
    }

    #[test]
    fn build_collapses_repeated_tags() {
        let record = RecordDraft::new("Title")
            .with_tags(["a", "b", "a"])
            .build()
            .unwrap();
        assert_eq!(record.tags, vec!["a", "b"]);
    }

    #[test]
    fn build_assigns_unique_ids() {
        let draft = RecordDraft::new("Title").with_tags(["a"]);
        let a = draft.build().unwrap();
        let b = draft.build().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn category_parsing() {
        assert_eq!("document".parse::<Category>(), Ok(Category::Document));
        assert_eq!("Knowledge".parse::<Category>(), Ok(Category::Knowledge));
        assert!("memo".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Knowledge).unwrap();
        assert_eq!(json, "\"knowledge\"");
    }

    #[test]
    fn qa_compose_format() {
        let qa = QaBody::new("What is it?", "A depository.");
        assert_eq!(qa.compose(), "Q: What is it?\nA: A depository.");
    }

    #[test]
    fn qa_parse_multiline_answer() {
        let body = "Q: How do I rotate the key?\nA: Open settings.\nOld keys stay valid.";
        let qa = QaBody::parse(body).unwrap();
        assert_eq!(qa.question, "How do I rotate the key?");
        assert_eq!(qa.answer, "Open settings.\nOld keys stay valid.");
    }

    #[test]
    fn qa_parse_rejects_free_text() {
        assert!(QaBody::parse("just a design doc").is_none());
        assert!(QaBody::parse("Q: question without answer").is_none());
    }

    #[test]
    fn record_exposes_qa() {
        let record = RecordDraft::new("FAQ")
            .with_tags(["faq"])
            .with_body(QaBody::new("Why?", "Because.").compose())
            .with_category(Some(Category::Knowledge))
            .build()
            .unwrap();
        assert_eq!(record.qa(), Some(QaBody::new("Why?", "Because.")));
    }

    #[test]
    fn record_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "6b1f4c1e-0c57-4a43-9a5e-0e4c1b9a7f10",
            "title": "Legacy",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.tags.is_empty());
        assert_eq!(record.url, "");
        assert!(record.category.is_none());
    }
}
