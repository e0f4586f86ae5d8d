/// What: Remove a trailing `#` or `//` comment from a config value.
///
/// Inputs:
/// - `s`: Raw value text after the `=`
///
/// Output:
/// - Trimmed value without the comment.
///
/// Details:
/// - A marker only starts a comment at the beginning of the value or after
///   whitespace, so URLs such as `http://host/#x` survive intact.
pub(super) fn strip_inline_comment(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with('#') || s.starts_with("//") {
        return "";
    }
    let cut = s
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .find(|&i| {
            let rest = s[i..].trim_start();
            rest.starts_with('#') || rest.starts_with("//")
        })
        .unwrap_or(s.len());
    s[..cut].trim()
}

/// What: Interpret common truthy spellings.
///
/// Inputs:
/// - `val`: Value text
///
/// Output:
/// - `true` for `true`, `1`, `yes` or `on` in any case.
pub(super) fn parse_bool(val: &str) -> bool {
    let lv = val.to_ascii_lowercase();
    lv == "true" || lv == "1" || lv == "yes" || lv == "on"
}

/// What: Split one config line into a normalized key and its value.
///
/// Inputs:
/// - `line`: Raw line from `settings.conf`
///
/// Output:
/// - `Some((key, value))` for assignments; `None` for blanks, comments and junk.
///
/// Details:
/// - Keys are lowercased and `.`, `-` and spaces become `_`.
pub(super) fn split_assignment(line: &str) -> Option<(String, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return None;
    }
    let (raw_key, raw_val) = trimmed.split_once('=')?;
    let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
    Some((key, strip_inline_comment(raw_val.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Inline comments are dropped and keys normalized.
    fn split_assignment_normalizes_and_strips() {
        assert_eq!(
            split_assignment("Max-Concurrent.Requests = 12 # tuned"),
            Some(("max_concurrent_requests".to_string(), "12"))
        );
        assert_eq!(split_assignment("# comment"), None);
        assert_eq!(split_assignment("no equals sign"), None);
        assert_eq!(split_assignment("cache_server = # unset"), Some(("cache_server".to_string(), "")));
        assert_eq!(
            split_assignment("catalog_url = http://cat.lan/api // local"),
            Some(("catalog_url".to_string(), "http://cat.lan/api"))
        );
    }

    #[test]
    /// What: Truthy spellings parse, others do not.
    fn parse_bool_accepts_common_spellings() {
        for v in ["true", "ON", "1", "Yes"] {
            assert!(parse_bool(v));
        }
        for v in ["false", "0", "off", ""] {
            assert!(!parse_bool(v));
        }
    }
}
