//! Preview text generation.
//!
//! List responses carry a bounded preview instead of the full article body.
//! Truncation is sentence-aware: it prefers cutting after the last full
//! sentence that fits, falls back to a word boundary, and only hard-cuts
//! when a single word exceeds the whole budget. Inline markup markers left
//! unpaired by the cut are closed so the preview renders cleanly.

/// Preview length applied when the caller does not specify one.
pub const DEFAULT_PREVIEW_LENGTH: usize = 300;

const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];
const INLINE_MARKERS: [char; 3] = ['`', '*', '_'];

/// Truncate rich text to at most `max_len` characters, appending an
/// ellipsis when anything was removed. Multi-byte characters are never
/// split.
#[must_use]
pub fn truncate(text: &str, max_len: usize) -> String {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    if chars.len() <= max_len {
        return text.to_owned();
    }
    if max_len == 0 {
        return "\u{2026}".to_owned();
    }

    let window_end = chars
        .get(max_len)
        .map_or(text.len(), |&(byte_idx, _)| byte_idx);
    let window = &chars[..max_len];

    let cut = sentence_cut(text, window)
        .or_else(|| word_cut(text, window))
        .unwrap_or(window_end);

    let mut preview = text[..cut].trim_end().to_owned();
    close_markers(&mut preview);
    preview.push('\u{2026}');
    preview
}

/// Byte offset just after the last sentence that fits, if any.
fn sentence_cut(text: &str, window: &[(usize, char)]) -> Option<usize> {
    window
        .iter()
        .enumerate()
        .rev()
        .find(|&(pos, &(_, ch))| {
            SENTENCE_ENDINGS.contains(&ch)
                && window
                    .get(pos + 1)
                    .is_none_or(|&(_, next)| next.is_whitespace())
        })
        .map(|(_, &(byte_idx, ch))| byte_idx + ch.len_utf8())
        .filter(|&cut| !text[..cut].trim_end().is_empty())
}

/// Byte offset of the last whitespace gap inside the window, if any.
fn word_cut(text: &str, window: &[(usize, char)]) -> Option<usize> {
    window
        .iter()
        .rev()
        .find(|&&(_, ch)| ch.is_whitespace())
        .map(|&(byte_idx, _)| byte_idx)
        .filter(|&cut| !text[..cut].trim_end().is_empty())
}

/// Append closing markers for inline markup left unbalanced by the cut.
fn close_markers(preview: &mut String) {
    for marker in INLINE_MARKERS {
        let count = preview.chars().filter(|&c| c == marker).count();
        if count % 2 == 1 {
            preview.push(marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate("Short note.", 300), "Short note.");
    }

    #[test]
    fn cuts_after_last_full_sentence() {
        let text = "First sentence. Second sentence is longer. Third one.";
        assert_eq!(truncate(text, 30), "First sentence.\u{2026}");
    }

    #[test]
    fn falls_back_to_word_boundary() {
        let text = "no sentence endings here just a stream of words going on";
        let preview = truncate(text, 20);
        assert!(preview.ends_with('\u{2026}'));
        assert!(!preview.contains("str\u{2026}"), "must not split a word: {preview}");
        assert_eq!(preview, "no sentence endings\u{2026}");
    }

    #[test]
    fn hard_cut_when_one_word_exceeds_budget() {
        let text = "Supercalifragilisticexpialidocious";
        assert_eq!(truncate(text, 5), "Super\u{2026}");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "Первое предложение. Второе предложение подлиннее.";
        assert_eq!(truncate(text, 25), "Первое предложение.\u{2026}");
    }

    #[test]
    fn unbalanced_inline_marker_is_closed() {
        let text = "An *emphasised stretch of text that keeps going on and on*";
        let preview = truncate(text, 20);
        assert_eq!(preview.chars().filter(|&c| c == '*').count() % 2, 0);
    }

    #[test]
    fn zero_budget_yields_bare_ellipsis() {
        assert_eq!(truncate("anything", 0), "\u{2026}");
    }

    proptest! {
        #[test]
        fn never_exceeds_budget_by_more_than_closers(text in ".{0,400}", max_len in 1usize..64) {
            let preview = truncate(&text, max_len);
            // budget + up to three closing markers + the ellipsis
            prop_assert!(preview.chars().count() <= max_len.max(text.chars().count()) + 4);
            prop_assert!(preview.is_char_boundary(preview.len()));
        }
    }
}
