//! Working branch name generation
//!
//! Every save attempt commits on its own generated branch. Names embed a
//! second-resolution UTC timestamp, so a retried save never collides with
//! its own prior attempt.

use chrono::{DateTime, Utc};

/// Default purpose prefix for generated branch names
pub const DEFAULT_BRANCH_PURPOSE: &str = "content-update";

/// Generate the working branch name for one save attempt
///
/// Form: `<purpose>-<sanitized-target>-<timestamp>`, timestamp truncated
/// to second resolution with colons and dots stripped (refs reject
/// colons). A name collision means another actor generated the same name
/// in the same second; the orchestrator treats that as a hard failure
/// rather than retrying with a suffix.
#[must_use]
pub fn generate_branch_name(purpose: &str, target_path: &str, at: DateTime<Utc>) -> String {
    let target = sanitize_identifier(target_path);
    let timestamp = at.format("%Y%m%dT%H%M%S");
    if target.is_empty() {
        format!("{purpose}-{timestamp}")
    } else {
        format!("{purpose}-{target}-{timestamp}")
    }
}

/// Collapse a path into a ref-safe identifier
///
/// ASCII alphanumerics pass through lowercased; every other run of
/// characters becomes a single dash, with no leading or trailing dash.
fn sanitize_identifier(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut pending_dash = false;
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn name_embeds_purpose_target_and_timestamp() {
        let name = generate_branch_name("content-update", "pages/about.seo.json", at(1_700_000_000));
        assert_eq!(name, "content-update-pages-about-seo-json-20231114T221320");
    }

    #[test]
    fn name_has_no_colons_or_dots() {
        let name = generate_branch_name("content-update", "a.b/c.d", at(1_700_000_000));
        assert!(!name.contains(':'));
        assert!(!name.contains('.'));
    }

    #[test]
    fn distinct_seconds_give_distinct_names() {
        let first = generate_branch_name("content-update", "x.json", at(1_700_000_000));
        let second = generate_branch_name("content-update", "x.json", at(1_700_000_001));
        assert_ne!(first, second);
    }

    #[test]
    fn same_second_collides() {
        // The known limit of timestamp uniqueness; collisions fail hard
        let first = generate_branch_name("content-update", "x.json", at(1_700_000_000));
        let second = generate_branch_name("content-update", "x.json", at(1_700_000_000));
        assert_eq!(first, second);
    }

    #[test]
    fn sanitize_collapses_symbol_runs() {
        let name = generate_branch_name("p", "a//--b..c", at(0));
        assert_eq!(name, "p-a-b-c-19700101T000000");
    }

    #[test]
    fn sanitize_handles_all_symbol_target() {
        let name = generate_branch_name("p", "///", at(0));
        assert_eq!(name, "p-19700101T000000");
    }
}
