use crate::commands::sync::refresh;
use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::providers::PersistenceProvider;
use crate::query::{RecordQuery, TagFilter};
use crate::store::RecordStore;

/// Refetches, then lists the records matching `query` in its sort order.
pub fn run<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    query: &RecordQuery,
) -> Result<CmdResult> {
    refresh(working, provider)?;
    let listed = working.query(query);

    let mut result = CmdResult::default();
    if listed.is_empty() && !working.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No records match ({} hidden by filters)",
            plural(working.len(), "record")
        )));
    }
    if let TagFilter::Tag(name) = &query.tag {
        if !working.tags().iter().any(|t| &t.name == name) {
            result.add_message(CmdMessage::warning(format!(
                "'{}' is not a registered tag",
                name
            )));
        }
    }
    Ok(result.with_listed_records(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, RecordDraft};
    use crate::providers::mem_backend::MemProvider;
    use crate::query::SortKey;
    use crate::tags::Tag;

    fn provider() -> MemProvider {
        let provider = MemProvider::new();
        provider.seed_tag(Tag::new("infra", None));
        for (title, tags, category) in [
            ("Runbook", vec!["infra"], Some(Category::Knowledge)),
            ("Budget", vec!["finance"], Some(Category::Document)),
            ("Spec", vec!["infra", "urgent"], Some(Category::Document)),
        ] {
            provider.seed_record(
                RecordDraft::new(title)
                    .with_tags(tags)
                    .with_category(category)
                    .build()
                    .unwrap(),
            );
        }
        provider
    }

    fn titles(result: &CmdResult) -> Vec<&str> {
        result
            .listed_records
            .iter()
            .map(|r| r.title.as_str())
            .collect()
    }

    #[test]
    fn lists_everything_by_default() {
        let mut working = RecordStore::new();
        let result = run(&mut working, &provider(), &RecordQuery::new()).unwrap();
        assert_eq!(result.listed_records.len(), 3);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn combines_filters_and_sort() {
        let mut working = RecordStore::new();
        let query = RecordQuery::new()
            .tag("infra")
            .category(Category::Document)
            .sort(SortKey::Title);
        let result = run(&mut working, &provider(), &query).unwrap();
        assert_eq!(titles(&result), vec!["Spec"]);
    }

    #[test]
    fn reports_hidden_records() {
        let mut working = RecordStore::new();
        let result = run(&mut working, &provider(), &RecordQuery::new().search("zzz")).unwrap();
        assert!(result.listed_records.is_empty());
        assert!(result.messages[0].content.contains("3 records hidden"));
    }

    #[test]
    fn warns_about_unregistered_tag_filter() {
        let mut working = RecordStore::new();
        let result = run(&mut working, &provider(), &RecordQuery::new().tag("finance")).unwrap();
        assert_eq!(titles(&result), vec!["Budget"]);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "'finance' is not a registered tag"));
    }
}
