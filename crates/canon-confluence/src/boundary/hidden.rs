//! Current boundary scheme: hidden `details` macros as start/end anchors.
//!
//! A chapter region is
//!
//! ```text
//! <ac:structured-macro ac:name="details">…boundary-start-{id}…</ac:structured-macro>
//! …chapter content…
//! <ac:structured-macro ac:name="details">…boundary-end-{id}…</ac:structured-macro>
//! ```
//!
//! The markers render as nothing on the page. Each one is found by searching
//! for its `id` parameter literally, then widening to the enclosing macro.

use super::{MACRO_CLOSE, MACRO_OPEN};

const START_PREFIX: &str = "boundary-start-";
const END_PREFIX: &str = "boundary-end-";
const PLACEHOLDER_PREFIX: &str = "boundary-placeholder-";

/// `id` parameter of a marker, as serialized in storage format.
fn id_param(id: &str) -> String {
    format!(r#"<ac:parameter ac:name="id">{id}</ac:parameter>"#)
}

/// Full hidden marker macro carrying `id`.
fn marker(id: &str) -> String {
    format!(
        r#"{MACRO_OPEN} ac:name="details" ac:schema-version="1"><ac:parameter ac:name="hidden">true</ac:parameter>{}<ac:rich-text-body></ac:rich-text-body>{MACRO_CLOSE}"#,
        id_param(id)
    )
}

pub(super) fn start_marker(local_id: &str) -> String {
    marker(&format!("{START_PREFIX}{local_id}"))
}

pub(super) fn end_marker(local_id: &str) -> String {
    marker(&format!("{END_PREFIX}{local_id}"))
}

/// Marker placed inside a region that has not been published yet.
pub(super) fn placeholder_marker(local_id: &str) -> String {
    marker(&format!("{PLACEHOLDER_PREFIX}{local_id}"))
}

pub(super) fn has_placeholder_marker(raw: &str, local_id: &str) -> bool {
    raw.contains(&id_param(&format!("{PLACEHOLDER_PREFIX}{local_id}")))
}

/// Byte span of the marker macro whose `id` is exactly `id`.
fn marker_span(body: &str, id: &str) -> Option<(usize, usize)> {
    let param = id_param(id);
    let at = body.find(&param)?;
    let open = body[..at].rfind(MACRO_OPEN)?;
    let close = at + param.len() + body[at + param.len()..].find(MACRO_CLOSE)?;
    Some((open, close + MACRO_CLOSE.len()))
}

/// Locate the region between the start and end markers of `local_id`.
///
/// Both markers must be present and the end marker must follow the start one.
pub(super) fn locate(body: &str, local_id: &str) -> Option<(usize, usize)> {
    let (start, start_end) = marker_span(body, &format!("{START_PREFIX}{local_id}"))?;
    let (end_start, end) = marker_span(body, &format!("{END_PREFIX}{local_id}"))?;
    (end_start >= start_end).then_some((start, end))
}

/// Regex source matching a start marker's `id` parameter, capturing the local id.
pub(super) const START_ID_PATTERN: &str =
    r#"<ac:parameter ac:name="id">boundary-start-([^<]+)</ac:parameter>"#;
