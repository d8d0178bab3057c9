//! Email and phone scraping over raw HTML.
//!
//! These are regular-expression scans, not validation: anything email-shaped
//! or digit-dense enough is reported, up to a per-kind cap.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("invalid email regex"));

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+?[0-9\s()\-]{8,15}").expect("invalid phone regex"));

/// A phone candidate must contain a run of at least this many digits.
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4,}").expect("invalid digit regex"));

/// Contact details found on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

/// Scan raw HTML for up to `limit` distinct emails and `limit` distinct phones.
pub fn extract_contacts(html: &str, limit: usize) -> ContactInfo {
    let emails = distinct(EMAIL.find_iter(html).map(|m| m.as_str().to_string()), limit);

    let phones = distinct(
        PHONE
            .find_iter(html)
            .map(|m| m.as_str().trim().to_string())
            .filter(|candidate| DIGIT_RUN.is_match(candidate)),
        limit,
    );

    ContactInfo { emails, phones }
}

fn distinct(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_emails() {
        let html = r#"<p>Mail <a href="mailto:jane@studio.example.com">jane@studio.example.com</a>
            or bookings+hk@example.org</p>"#;
        let info = extract_contacts(html, 5);

        assert_eq!(info.emails, vec!["jane@studio.example.com", "bookings+hk@example.org"]);
    }

    #[test]
    fn test_extract_phones_requires_digit_run() {
        let html = "<p>Call +852 2345 6789 or 9123-4567. Ref (12) 34 56 78</p>";
        let info = extract_contacts(html, 5);

        assert!(info.phones.iter().any(|p| p.contains("2345")));
        assert!(info.phones.iter().any(|p| p == "9123-4567"));
        assert!(info.phones.iter().all(|p| DIGIT_RUN.is_match(p)));
        assert!(!info.phones.iter().any(|p| p.contains("(12)")));
    }

    #[test]
    fn test_phones_are_trimmed() {
        let info = extract_contacts("<td>   98765432   </td>", 5);
        assert_eq!(info.phones, vec!["98765432"]);
    }

    #[test]
    fn test_caps_each_kind() {
        let html: String = (0..20).map(|i| format!("<li>user{i}@example.com tel 5555{i:04}</li>")).collect();
        let info = extract_contacts(&html, 5);

        assert_eq!(info.emails.len(), 5);
        assert_eq!(info.phones.len(), 5);
        assert_eq!(info.emails[0], "user0@example.com");
    }

    #[test]
    fn test_duplicates_collapsed() {
        let info = extract_contacts("a@b.io a@b.io a@b.io", 5);
        assert_eq!(info.emails, vec!["a@b.io"]);
    }

    #[test]
    fn test_nothing_found() {
        let info = extract_contacts("<p>No contact details at all</p>", 5);
        assert!(info.is_empty());
    }
}
