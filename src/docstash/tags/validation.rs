//! Tag name validation for docstash.
//!
//! Tags are a free-form folk taxonomy: any script, spaces and punctuation are
//! fine, and names are case-sensitive. The only rules are:
//! - The name must not be empty once surrounding whitespace is trimmed
//! - The name must not contain control characters (newlines, tabs, ...)

/// Validates a tag name and returns it trimmed.
///
/// # Examples
/// ```
/// use docstash::tags::validation::validate_tag_name;
///
/// assert_eq!(validate_tag_name("  infra ").unwrap(), "infra");
/// assert_eq!(validate_tag_name("決定事項").unwrap(), "決定事項");
/// assert!(validate_tag_name("   ").is_err());
/// assert!(validate_tag_name("two\nlines").is_err());
/// ```
pub fn validate_tag_name(name: &str) -> Result<&str, TagValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TagValidationError::Empty);
    }

    if let Some(ch) = trimmed.chars().find(|c| c.is_control()) {
        return Err(TagValidationError::ControlCharacter(ch));
    }

    Ok(trimmed)
}

/// Error type for tag name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    /// Tag name is empty after trimming
    Empty,
    /// Tag name contains a control character
    ControlCharacter(char),
}

impl std::fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValidationError::Empty => write!(f, "tag name is required"),
            TagValidationError::ControlCharacter(ch) => {
                write!(
                    f,
                    "tag name contains a control character ({:?})",
                    ch
                )
            }
        }
    }
}

impl std::error::Error for TagValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_free_form_names() {
        assert_eq!(validate_tag_name("infra"), Ok("infra"));
        assert_eq!(validate_tag_name("Design Doc"), Ok("Design Doc"));
        assert_eq!(validate_tag_name("LINE"), Ok("LINE"));
        assert_eq!(validate_tag_name("設計"), Ok("設計"));
        assert_eq!(validate_tag_name("v2.0/beta"), Ok("v2.0/beta"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_tag_name("  urgent\t"), Ok("urgent"));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_tag_name(""), Err(TagValidationError::Empty));
        assert_eq!(validate_tag_name("  \n "), Err(TagValidationError::Empty));
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            validate_tag_name("foo\nbar"),
            Err(TagValidationError::ControlCharacter('\n'))
        );
        assert_eq!(
            validate_tag_name("a\u{7}b"),
            Err(TagValidationError::ControlCharacter('\u{7}'))
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(TagValidationError::Empty.to_string(), "tag name is required");
        assert_eq!(
            TagValidationError::ControlCharacter('\n').to_string(),
            "tag name contains a control character ('\\n')"
        );
    }
}
