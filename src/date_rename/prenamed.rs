//! Detection of a date prefix left behind by an earlier run.

/// Characters accepted between the date and the title, independent of the configured delimiter.
const SEPARATOR_CHARS: [char; 4] = ['-', '=', ':', '_'];

/// Number of dot separated digit groups in a date prefix.
const DATE_GROUPS: usize = 3;

/// Strip a previous date prefix from a file name without extension.
///
/// The whole name must have the shape
/// `<digits>.<digits>.<digits><whitespace><separators><whitespace><title>`,
/// where the separator run has at least one of `-`, `=`, `:` or `_`.
/// Returns the remaining title, which may be empty,
/// or `None` if the name does not start with a date prefix.
///
/// ```rust
/// use dater::date_rename::strip_date_prefix;
///
/// assert_eq!(strip_date_prefix("2024.03.05 -- report"), Some("report"));
/// assert_eq!(strip_date_prefix("2021.1.9_=_notes"), Some("notes"));
/// assert_eq!(strip_date_prefix("report -- 2024.03.05"), None);
/// ```
#[must_use]
pub fn strip_date_prefix(base_name: &str) -> Option<&str> {
    // The date is ASCII so the length is always a char boundary
    let rest = &base_name[date_prefix_len(base_name.as_bytes())?..];

    let rest = rest.trim_start_matches(char::is_whitespace);
    let title = rest.trim_start_matches(SEPARATOR_CHARS);
    if title.len() == rest.len() {
        return None;
    }

    Some(title.trim_start_matches(char::is_whitespace))
}

/// Strip a previous date prefix from a file name that is not valid Unicode.
///
/// Same shape as [`strip_date_prefix`], with only ASCII whitespace around the separators.
#[cfg(unix)]
pub(crate) fn strip_date_prefix_bytes(base_name: &[u8]) -> Option<&[u8]> {
    let rest = base_name[date_prefix_len(base_name)?..].trim_ascii_start();
    let separators = rest
        .iter()
        .take_while(|&&byte| SEPARATOR_CHARS.contains(&char::from(byte)))
        .count();
    if separators == 0 {
        return None;
    }

    Some(rest[separators..].trim_ascii_start())
}

/// Length of the leading `<digits>.<digits>.<digits>` date.
fn date_prefix_len(bytes: &[u8]) -> Option<usize> {
    let mut position = 0;
    for group in 0..DATE_GROUPS {
        let digits = bytes[position..].iter().take_while(|byte| byte.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        position += digits;
        if group + 1 < DATE_GROUPS {
            if bytes.get(position) != Some(&b'.') {
                return None;
            }
            position += 1;
        }
    }
    Some(position)
}
