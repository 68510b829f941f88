use chrono::{DateTime, Utc};
use colored::Colorize;
use docstash::api::{CmdMessage, MessageLevel};
use docstash::config::{DocstashConfig, CONFIG_KEYS};
use docstash::model::{Category, Record};
use docstash::providers::Session;
use docstash::tags::Tag;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const SHORT_ID_LEN: usize = 8;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    for record in records {
        let full_id = record.id.to_string();
        let id = short_id(&full_id);
        let marker = category_marker(record.category);
        let left = format!("  {} {}  ", id, marker);

        let tags: Vec<String> = record.tags.iter().map(|t| format!("#{}", t)).collect();
        let text = format!("{}  {}", record.title, tags.join(" "));

        let available = LINE_WIDTH.saturating_sub(left.width() + TIME_WIDTH + 2);
        let shown = truncate_to_width(text.trim_end(), available);
        let padding = available.saturating_sub(shown.width());

        println!(
            "  {} {}  {}{}  {}",
            id.yellow(),
            marker,
            shown,
            " ".repeat(padding),
            format_time_ago(record.created_at).dimmed()
        );
    }
}

pub(super) fn print_full_record(record: &Record) {
    println!("{}", record.title.bold());
    println!("--------------------------------");
    println!("{:<10}{}", "id", record.id.to_string().yellow());
    if let Some(category) = record.category {
        println!("{:<10}{}", "category", category);
    }
    println!("{:<10}{}", "tags", record.tags.join(", "));
    if !record.url.is_empty() {
        println!("{:<10}{}", "url", record.url.underline());
    }
    println!(
        "{:<10}{}",
        "created",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    match record.qa() {
        Some(qa) => {
            println!();
            println!("{} {}", "Q:".cyan().bold(), qa.question);
            println!("{} {}", "A:".green().bold(), qa.answer);
        }
        None if !record.body.is_empty() => {
            println!();
            println!("{}", record.body);
        }
        None => {}
    }
}

pub(super) fn print_tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags registered.");
        return;
    }
    for tag in tags {
        let scope = match tag.scope {
            Some(category) => category.to_string(),
            None => "any".to_string(),
        };
        println!(
            "  {}  {:<24} {}",
            short_id(&tag.id.to_string()).yellow(),
            tag.name,
            scope.dimmed()
        );
    }
}

pub(super) fn print_session(session: Option<&Session>) {
    match session {
        Some(session) => println!(
            "{} {}",
            session.identifier.bold(),
            format!("(signed in {})", format_time_ago(session.signed_in_at).trim()).dimmed()
        ),
        None => println!("{}", "Not signed in".dimmed()),
    }
}

pub(super) fn print_config(config: &DocstashConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn short_id(id: &str) -> &str {
    &id[..SHORT_ID_LEN.min(id.len())]
}

fn category_marker(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Document) => "D",
        Some(Category::Knowledge) => "K",
        None => " ",
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_fitting_text() {
        assert_eq!(truncate_to_width("Spec A", 6), "Spec A");
        assert_eq!(truncate_to_width("Specification", 6), "Speci…");
    }

    #[test]
    fn truncation_counts_wide_characters() {
        // Each kana is two columns wide.
        assert_eq!(truncate_to_width("あいうえお", 5), "あい…");
    }

    #[test]
    fn short_id_handles_short_input() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }
}
