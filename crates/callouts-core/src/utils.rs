/// Treats absent and whitespace-only strings alike.
///
/// Returns the trimmed value, or `None` when nothing is left.
pub fn null_if_empty(value: Option<&str>) -> Option<&str> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Upper-cases the first character and leaves the rest untouched.
///
/// Only the first `char` is considered; grapheme clusters are not.
pub fn capitalize_first_letter(value: Option<&str>) -> Option<String> {
    let value = value?;
    let mut chars = value.chars();
    let first = chars.next()?;
    let mut out = String::with_capacity(value.len());
    out.extend(first.to_uppercase());
    out.push_str(chars.as_str());
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_if_empty_trims_and_drops_blank_values() {
        assert_eq!(null_if_empty(None), None);
        assert_eq!(null_if_empty(Some("")), None);
        assert_eq!(null_if_empty(Some("  \t\n")), None);
        assert_eq!(null_if_empty(Some("  My Title ")), Some("My Title"));
    }

    #[test]
    fn capitalize_first_letter_matches_title_fallback() {
        assert_eq!(capitalize_first_letter(Some("note")).as_deref(), Some("Note"));
        assert_eq!(capitalize_first_letter(Some("n")).as_deref(), Some("N"));
        assert_eq!(
            capitalize_first_letter(Some("custom warning")).as_deref(),
            Some("Custom warning")
        );
        assert_eq!(capitalize_first_letter(Some("")), None);
        assert_eq!(capitalize_first_letter(None), None);
        assert_eq!(capitalize_first_letter(Some("éclair")).as_deref(), Some("Éclair"));
        assert_eq!(capitalize_first_letter(Some("1st")).as_deref(), Some("1st"));
    }

    #[test]
    fn capitalize_first_letter_is_idempotent() {
        for s in ["note", "Warning", "hINT", "x"] {
            let once = capitalize_first_letter(Some(s));
            let twice = capitalize_first_letter(once.as_deref());
            assert_eq!(once, twice);
        }
    }
}
