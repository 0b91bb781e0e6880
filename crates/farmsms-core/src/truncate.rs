//! Single-segment SMS length budget.

use std::borrow::Cow;

/// Character budget of a single non-concatenated GSM segment.
pub const DEFAULT_SEGMENT_LEN: usize = 160;

const ELLIPSIS: &str = "...";

/// Cap `text` at `max_len` characters.
///
/// Text within the budget is returned unchanged. Longer text is cut to
/// `max_len - 3` characters and terminated with `"..."`, so the result is
/// exactly `max_len` characters long. Cuts happen on char boundaries, which
/// keeps multi-byte text valid UTF-8.
pub fn truncate(text: &str, max_len: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }

    if max_len <= ELLIPSIS.len() {
        return Cow::Owned(text.chars().take(max_len).collect());
    }

    let mut out: String = text.chars().take(max_len - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}
