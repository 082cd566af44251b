//! Multi-value text fields.
//!
//! Category and country attributes arrive as free text where several values
//! are joined with `;` (for example `"Training; Arms control"`). Every
//! consumer that needs the individual values goes through [`parse_list`] so
//! tokenization (trimming, empty-token handling) is identical everywhere.

/// Separator between values of a multi-value field.
pub const LIST_SEPARATOR: char = ';';

/// Splits a multi-value field into trimmed, non-empty tokens.
///
/// Source order is preserved and duplicates are kept. A missing or empty
/// field yields an empty list.
pub fn parse_list(input: Option<&str>) -> Vec<&str> {
    match input {
        Some(s) => list_tokens(s).collect(),
        None => Vec::new(),
    }
}

/// Lazy form of [`parse_list`] for a present field.
pub fn list_tokens(input: &str) -> impl Iterator<Item = &str> + '_ {
    input
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Parses `input` and joins the tokens with `sep`.
///
/// Returns `None` when the field has no tokens, so callers can pick their own
/// placeholder ("Unknown", "Unknown Category", ...).
pub fn join_list(input: Option<&str>, sep: &str) -> Option<String> {
    let tokens = parse_list(input);
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.join(sep))
}

#[cfg(test)]
mod tests {
    use super::{join_list, parse_list};

    #[test]
    fn trims_and_drops_empty_tokens() {
        assert_eq!(parse_list(Some("A; B ;;C")), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_and_missing_are_empty() {
        assert!(parse_list(Some("")).is_empty());
        assert!(parse_list(None).is_empty());
        assert!(parse_list(Some(" ; ;  ")).is_empty());
    }

    #[test]
    fn keeps_order_and_duplicates() {
        assert_eq!(
            parse_list(Some("Training;Arms control;Training")),
            vec!["Training", "Arms control", "Training"]
        );
    }

    #[test]
    fn join_uses_parsed_tokens() {
        assert_eq!(
            join_list(Some(" Fiji ;Australia;"), ", ").as_deref(),
            Some("Fiji, Australia")
        );
        assert_eq!(join_list(Some(";;"), ", "), None);
    }
}
