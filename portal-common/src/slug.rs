//! Slug and record-filename derivation
//!
//! Record files are named `<slug>_<YYYYMMDD_HHMMSS>.csv` where the slug is
//! a filesystem-safe rendering of the record title. Two submissions with
//! the same title in the same second would collide; the intake volume this
//! portal sees makes that acceptable.

use chrono::NaiveDateTime;

/// Maximum slug length before the timestamp suffix
const MAX_SLUG_LEN: usize = 80;

/// Placeholder used when a title reduces to nothing
const EMPTY_SLUG: &str = "record";

/// Derive a filesystem-safe slug from a record title.
///
/// Spaces become underscores, then everything outside the allow-list of
/// ASCII letters, digits, hyphen and underscore is stripped. The result is
/// truncated to 80 characters and falls back to `"record"` when empty.
pub fn safe_slug(title: &str) -> String {
    let slug: String = title
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Build the CSV file name for a record created at `now`
pub fn record_filename(title: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.csv", safe_slug(title), now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(safe_slug("Fix Fence"), "Fix_Fence");
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        assert_eq!(safe_slug("Repair: sidewalk (urgent!)"), "Repair_sidewalk_urgent");
        assert_eq!(safe_slug("Praça & Jardim"), "Praa__Jardim");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(200);
        assert_eq!(safe_slug(&long).len(), 80);
    }

    #[test]
    fn empty_title_gets_placeholder() {
        assert_eq!(safe_slug(""), "record");
        assert_eq!(safe_slug("!!!"), "record");
    }

    #[test]
    fn filename_includes_timestamp() {
        assert_eq!(
            record_filename("Fix Fence", at()),
            "Fix_Fence_20251103_143005.csv"
        );
    }
}
