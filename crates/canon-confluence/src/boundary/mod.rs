//! Chapter regions inside Confluence storage markup.
//!
//! A page embeds any number of chapters, each delimited by boundary markers
//! that survive round trips through the editor. Two marker generations are
//! recognized, tried in [`BoundaryScheme::ORDER`]:
//!
//! - [`BoundaryScheme::Hidden`]: hidden start/end marker macros (written today)
//! - [`BoundaryScheme::LegacyContainer`]: one wrapping container macro
//!
//! Every function here is a read-only scan of the input string; [`replace`]
//! and [`remove`] return a new string and leave the input untouched.
//!
//! # Example
//!
//! ```
//! use canon_confluence::boundary;
//!
//! let page = format!("<p>Intro</p>{}", boundary::wrap_chapter("c1", "<p>v1</p>"));
//! let page = boundary::replace(&page, "c1", &boundary::wrap_chapter("c1", "<p>v2</p>")).unwrap();
//! assert!(page.contains("<p>v2</p>"));
//! assert_eq!(boundary::enumerate(&page), vec!["c1"]);
//! ```

mod hidden;
mod legacy;

use std::sync::LazyLock;

use regex::Regex;

pub use legacy::LEGACY_MACRO_NAME;

/// Opening literal shared by every storage-format macro.
const MACRO_OPEN: &str = "<ac:structured-macro";
/// Closing literal shared by every storage-format macro.
const MACRO_CLOSE: &str = "</ac:structured-macro>";

static START_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(hidden::START_ID_PATTERN).expect("invalid start marker regex"));

static LEGACY_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(legacy::LOCAL_ID_PATTERN).expect("invalid legacy marker regex"));

/// How a chapter region is delimited in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryScheme {
    /// Hidden start/end marker macros.
    Hidden,
    /// Wrapping container macro carrying `chapter_id` and `local_id`.
    LegacyContainer,
}

impl BoundaryScheme {
    /// Lookup order: current markers first, then the legacy container.
    pub const ORDER: [Self; 2] = [Self::Hidden, Self::LegacyContainer];

    fn locate(self, body: &str, local_id: &str) -> Option<(usize, usize)> {
        match self {
            Self::Hidden => hidden::locate(body, local_id),
            Self::LegacyContainer => legacy::locate(body, local_id),
        }
    }
}

/// A located chapter region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRegion {
    /// Chapter identity within the page.
    pub local_id: String,
    /// Marker generation the region was found with.
    pub scheme: BoundaryScheme,
    /// Byte offset of the first byte of the region.
    pub start_offset: usize,
    /// Byte offset one past the last byte of the region.
    pub end_offset: usize,
    /// Markup of the region, markers included.
    pub raw_text: String,
}

impl ChapterRegion {
    /// Whether the region is an unpublished stub from [`placeholder_region`].
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        hidden::has_placeholder_marker(&self.raw_text, &self.local_id)
    }
}

/// Find the region of chapter `local_id`, if present.
#[must_use]
pub fn locate(body: &str, local_id: &str) -> Option<ChapterRegion> {
    BoundaryScheme::ORDER.into_iter().find_map(|scheme| {
        let (start, end) = scheme.locate(body, local_id)?;
        Some(ChapterRegion {
            local_id: local_id.to_owned(),
            scheme,
            start_offset: start,
            end_offset: end,
            raw_text: body[start..end].to_owned(),
        })
    })
}

/// Whether chapter `local_id` has a region in `body`.
#[must_use]
pub fn exists(body: &str, local_id: &str) -> bool {
    BoundaryScheme::ORDER
        .into_iter()
        .any(|scheme| scheme.locate(body, local_id).is_some())
}

/// Replace the region of `local_id` with `new_html`.
///
/// `new_html` should carry its own markers (see [`wrap_chapter`]), otherwise
/// the chapter can no longer be located afterwards. Returns `None` when the
/// region does not exist.
#[must_use]
pub fn replace(body: &str, local_id: &str, new_html: &str) -> Option<String> {
    let region = locate(body, local_id)?;
    let mut out = String::with_capacity(body.len() - region.raw_text.len() + new_html.len());
    out.push_str(&body[..region.start_offset]);
    out.push_str(new_html);
    out.push_str(&body[region.end_offset..]);
    Some(out)
}

/// Cut the region of `local_id` out of `body`.
///
/// Whitespace left at the junction collapses to at most one blank line.
/// Returns `None` when the region does not exist.
#[must_use]
pub fn remove(body: &str, local_id: &str) -> Option<String> {
    let region = locate(body, local_id)?;
    let head = body[..region.start_offset].trim_end();
    let tail = body[region.end_offset..].trim_start();
    let gap = &body[head.len()..region.start_offset];
    let gap_after = &body[region.end_offset..body.len() - tail.len()];

    let mut out = String::with_capacity(head.len() + tail.len() + 2);
    out.push_str(head);
    if !head.is_empty() && !tail.is_empty() {
        let newlines = gap.matches('\n').count() + gap_after.matches('\n').count();
        if newlines > 0 {
            out.push_str(&"\n".repeat(newlines.min(2)));
        } else if !gap.is_empty() || !gap_after.is_empty() {
            out.push(' ');
        }
    }
    out.push_str(tail);
    Some(out)
}

/// Local ids of every chapter region in `body`, in document order.
///
/// Both marker schemes are scanned; each id is listed once. Candidates that
/// [`locate`] cannot resolve (an orphan start marker, a `local_id` parameter
/// outside a chapter container) are skipped.
#[must_use]
pub fn enumerate(body: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = START_ID_PATTERN
        .captures_iter(body)
        .chain(LEGACY_ID_PATTERN.captures_iter(body))
        .filter_map(|caps| {
            let id = caps.get(1)?;
            Some((id.start(), id.as_str()))
        })
        .collect();
    found.sort_by_key(|(offset, _)| *offset);

    let mut ids: Vec<String> = Vec::with_capacity(found.len());
    for (_, id) in found {
        if !ids.iter().any(|seen| seen == id) && exists(body, id) {
            ids.push(id.to_owned());
        }
    }
    ids
}

/// Surround converted chapter markup with start and end markers.
#[must_use]
pub fn wrap_chapter(local_id: &str, storage_html: &str) -> String {
    format!(
        "{}{storage_html}{}",
        hidden::start_marker(local_id),
        hidden::end_marker(local_id)
    )
}

/// Unpublished stub for a chapter: markers around an info panel.
#[must_use]
pub fn placeholder_region(local_id: &str, heading: &str) -> String {
    let panel = format!(
        r#"{MACRO_OPEN} ac:name="info" ac:schema-version="1"><ac:parameter ac:name="title">{}</ac:parameter><ac:rich-text-body><p>This chapter has not been published yet.</p></ac:rich-text-body>{MACRO_CLOSE}"#,
        escape_text(heading)
    );
    wrap_chapter(
        local_id,
        &format!("{}{panel}", hidden::placeholder_marker(local_id)),
    )
}

/// Append a region to the end of the page body.
#[must_use]
pub fn append(body: &str, region_html: &str) -> String {
    let head = body.trim_end();
    if head.is_empty() {
        return region_html.to_owned();
    }
    format!("{head}\n{region_html}")
}

/// Whether `local_id` can be embedded in marker parameters verbatim.
///
/// Ids are restricted to ASCII letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_local_id(local_id: &str) -> bool {
    !local_id.is_empty()
        && local_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page_with(regions: &[String]) -> String {
        let mut body = String::from("<h1>Policy</h1>\n");
        for region in regions {
            body.push_str(region);
            body.push('\n');
        }
        body.push_str("<p>Footer</p>");
        body
    }

    #[test]
    fn test_locate_prefers_hidden_markers() {
        let body = page_with(&[wrap_chapter("a", "<p>A</p>")]);
        let region = locate(&body, "a").unwrap();
        assert_eq!(region.scheme, BoundaryScheme::Hidden);
        assert!(region.raw_text.contains("<p>A</p>"));
        assert_eq!(&body[region.start_offset..region.end_offset], region.raw_text);
    }

    #[test]
    fn test_locate_falls_back_to_legacy() {
        let body = page_with(&[legacy::container("a", "<p>old</p>")]);
        let region = locate(&body, "a").unwrap();
        assert_eq!(region.scheme, BoundaryScheme::LegacyContainer);
        assert!(exists(&body, "a"));
        assert!(!exists(&body, "b"));
    }

    #[test]
    fn test_replace_round_trip_finds_exactly_one_region() {
        let nested = r#"<ac:structured-macro ac:name="expand"><ac:rich-text-body><p>n</p></ac:rich-text-body></ac:structured-macro>"#;
        let body = page_with(&[wrap_chapter("a", "<p>v1</p>"), wrap_chapter("b", "<p>B</p>")]);
        let new_html = wrap_chapter("a", &format!("<p>v2</p>{nested}"));
        let updated = replace(&body, "a", &new_html).unwrap();

        let region = locate(&updated, "a").unwrap();
        assert_eq!(region.raw_text, new_html);
        assert_eq!(enumerate(&updated), vec!["a", "b"]);
        assert!(updated.contains("<p>B</p>"));
        assert!(!updated.contains("<p>v1</p>"));
    }

    #[test]
    fn test_replace_migrates_legacy_region() {
        let body = page_with(&[legacy::container("a", "<p>old</p>")]);
        let updated = replace(&body, "a", &wrap_chapter("a", "<p>new</p>")).unwrap();
        assert_eq!(locate(&updated, "a").unwrap().scheme, BoundaryScheme::Hidden);
        assert!(!updated.contains(LEGACY_MACRO_NAME));
    }

    #[test]
    fn test_replace_missing_region() {
        assert_eq!(replace("<p>x</p>", "a", "<p>y</p>"), None);
    }

    #[test]
    fn test_remove_collapses_blank_lines() {
        let body = format!(
            "<p>before</p>\n\n\n{}\n\n\n<p>after</p>",
            wrap_chapter("a", "<p>A</p>")
        );
        assert_eq!(remove(&body, "a").unwrap(), "<p>before</p>\n\n<p>after</p>");
    }

    #[test]
    fn test_remove_at_page_edges() {
        let body = format!("{}\n<p>after</p>", wrap_chapter("a", "<p>A</p>"));
        assert_eq!(remove(&body, "a").unwrap(), "<p>after</p>");
        assert_eq!(remove(&wrap_chapter("a", ""), "a").unwrap(), "");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let body = page_with(&[wrap_chapter("a", "<p>A</p>")]);
        let once = remove(&body, "a").unwrap();
        assert_eq!(remove(&once, "a"), None);
        assert!(!exists(&once, "a"));
    }

    #[test]
    fn test_enumerate_mixed_schemes_in_document_order() {
        let body = page_with(&[
            legacy::container("old", "<p>1</p>"),
            wrap_chapter("new", "<p>2</p>"),
            legacy::container("old", "<p>dup</p>"),
        ]);
        assert_eq!(enumerate(&body), vec!["old", "new"]);
    }

    #[test]
    fn test_placeholder_region_detected() {
        let body = page_with(&[placeholder_region("a", "Access <control>")]);
        let region = locate(&body, "a").unwrap();
        assert!(region.is_placeholder());
        assert!(region.raw_text.contains("Access &lt;control&gt;"));

        let published = page_with(&[wrap_chapter("a", "<p>A</p>")]);
        assert!(!locate(&published, "a").unwrap().is_placeholder());
    }

    #[test]
    fn test_append_to_page() {
        assert_eq!(append("<p>x</p>\n\n", "<p>r</p>"), "<p>x</p>\n<p>r</p>");
        assert_eq!(append("  ", "<p>r</p>"), "<p>r</p>");
    }

    #[test]
    fn test_valid_local_ids() {
        assert!(is_valid_local_id("3f2a-bc_01"));
        assert!(!is_valid_local_id(""));
        assert!(!is_valid_local_id("a<b"));
    }

    #[test]
    fn test_enumerate_skips_unresolvable_candidates() {
        let orphan = hidden::start_marker("orphan");
        let foreign = r#"<ac:structured-macro ac:name="jira"><ac:parameter ac:name="local_id">foreign</ac:parameter></ac:structured-macro>"#;
        let body = page_with(&[orphan, foreign.to_owned(), wrap_chapter("real", "<p>R</p>")]);

        let ids = enumerate(&body);
        assert_eq!(ids, vec!["real"]);
        assert!(ids.iter().all(|id| exists(&body, id)));
    }
}
