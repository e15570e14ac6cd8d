//! Legacy boundary scheme: one wrapping container macro per chapter.
//!
//! ```text
//! <ac:structured-macro ac:name="standard-chapter">
//!   <ac:parameter ac:name="chapter_id">…</ac:parameter>
//!   <ac:parameter ac:name="local_id">{id}</ac:parameter>
//!   <ac:rich-text-body>…</ac:rich-text-body>
//! </ac:structured-macro>
//! ```
//!
//! Pages written before the hidden markers were introduced still carry these.
//! They are only read and replaced, never written.
//!
//! The matching close tag is found with a depth counter over the generic
//! macro open/close literals. Any macro nested in the body balances itself, so
//! this is correct as long as the markup is well formed. Markup whose macros
//! are not properly nested cannot be disambiguated and is reported as not
//! found.

use tracing::debug;

use super::{MACRO_CLOSE, MACRO_OPEN};

/// Macro name of the legacy chapter container.
pub const LEGACY_MACRO_NAME: &str = "standard-chapter";

/// Regex source matching the `local_id` parameter, capturing its value.
pub(super) const LOCAL_ID_PATTERN: &str =
    r#"<ac:parameter ac:name="local_id">([^<]+)</ac:parameter>"#;

fn local_id_param(local_id: &str) -> String {
    format!(r#"<ac:parameter ac:name="local_id">{local_id}</ac:parameter>"#)
}

/// Locate the legacy container macro carrying `local_id`.
pub(super) fn locate(body: &str, local_id: &str) -> Option<(usize, usize)> {
    let param = local_id_param(local_id);
    let mut from = 0;
    while let Some(rel) = body[from..].find(&param) {
        let at = from + rel;
        if let Some(span) = container_at(body, at) {
            return Some(span);
        }
        from = at + param.len();
    }
    None
}

/// Span of the chapter container whose parameter starts at `param_at`.
fn container_at(body: &str, param_at: usize) -> Option<(usize, usize)> {
    let open = body[..param_at].rfind(MACRO_OPEN)?;
    let tag_end = open + body[open..].find('>')? + 1;
    if !is_chapter_tag(&body[open..tag_end]) {
        return None;
    }
    let close = matching_close(body, tag_end)?;
    Some((open, close))
}

fn is_chapter_tag(tag: &str) -> bool {
    tag.contains(&format!(r#"ac:name="{LEGACY_MACRO_NAME}""#))
}

/// End offset of the close tag balancing an open tag that ended at `from`.
fn matching_close(body: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    loop {
        let next_open = body[pos..].find(MACRO_OPEN).map(|i| pos + i);
        let next_close = body[pos..].find(MACRO_CLOSE).map(|i| pos + i);
        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                let tag_end = open + body[open..].find('>')? + 1;
                // Self-closing macros do not nest
                if !body[..tag_end].ends_with("/>") {
                    depth += 1;
                }
                pos = tag_end;
            }
            (_, Some(close)) => {
                depth -= 1;
                pos = close + MACRO_CLOSE.len();
                if depth == 0 {
                    return Some(pos);
                }
            }
            (_, None) => {
                debug!(depth, "unbalanced chapter container");
                return None;
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn container(local_id: &str, inner: &str) -> String {
    format!(
        r#"<ac:structured-macro ac:name="{LEGACY_MACRO_NAME}"><ac:parameter ac:name="chapter_id">c-{local_id}</ac:parameter>{}<ac:rich-text-body>{inner}</ac:rich-text-body></ac:structured-macro>"#,
        local_id_param(local_id)
    )
}
