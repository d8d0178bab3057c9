//! Text cleanup for extracted page content.
//!
//! Applied to every candidate block before it is scored:
//! - zero-width and BOM characters are removed
//! - whitespace runs (including newlines) collapse to a single space
//! - immediately repeated punctuation collapses to one occurrence
//! - leading/trailing whitespace is trimmed

/// Zero-width space, non-joiner, joiner and the byte-order mark.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Punctuation whose immediate repetitions are collapsed.
///
/// `.` is deliberately absent so ellipses survive.
const COLLAPSIBLE_PUNCTUATION: &[char] = &['。', '！', '？', '；', '，', ',', '!', '?', ';'];

/// Normalize raw extracted text.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    let mut last: Option<char> = None;

    for c in raw.chars().filter(|c| !INVISIBLE.contains(c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
            last = Some(' ');
        }

        if last == Some(c) && COLLAPSIBLE_PUNCTUATION.contains(&c) {
            continue;
        }

        out.push(c);
        last = Some(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_text("  hello \n\n\t world  "), "hello world");
    }

    #[test]
    fn test_strips_invisible_characters() {
        assert_eq!(clean_text("\u{FEFF}zero\u{200B}width\u{200D}"), "zerowidth");
    }

    #[test]
    fn test_invisible_between_spaces_leaves_single_space() {
        assert_eq!(clean_text("a \u{200B} b"), "a b");
    }

    #[test]
    fn test_collapses_repeated_punctuation() {
        assert_eq!(clean_text("真的嗎？？？好！！"), "真的嗎？好！");
        assert_eq!(clean_text("wait,,, what!!"), "wait, what!");
    }

    #[test]
    fn test_keeps_ellipsis_and_mixed_punctuation() {
        assert_eq!(clean_text("well... ok?!"), "well... ok?!");
    }

    #[test]
    fn test_repetition_across_space_is_kept() {
        assert_eq!(clean_text("one! ! two"), "one! ! two");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = clean_text("  A   b,,  c\u{200B}！！ ");
        assert_eq!(clean_text(&once), once);
    }
}
