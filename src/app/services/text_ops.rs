//! Pure text edits on char offsets.
//!
//! Offsets count `char`s. Callers get back the new content together with
//! the caret offset the edit leaves behind; nothing here knows about
//! buffers or history.

use crate::app::domain::focus::SelectionRange;

/// Byte index of the char at `offset`, or `text.len()` past the end.
pub fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Replace `range` with `insert`. The range is clamped to the text first.
/// Returns the new text and the collapsed caret after the inserted text.
pub fn replace_range(text: &str, range: SelectionRange, insert: &str) -> (String, usize) {
    let len = text.chars().count();
    let range = range.clamp_to(len);
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end);

    let mut result = String::with_capacity(text.len() - (end - start) + insert.len());
    result.push_str(&text[..start]);
    result.push_str(insert);
    result.push_str(&text[end..]);

    (result, range.start + insert.chars().count())
}

/// Delete the char before `offset`. `None` at the start of the text.
pub fn delete_char_before(text: &str, offset: usize) -> Option<(String, usize)> {
    let offset = offset.min(text.chars().count());
    if offset == 0 {
        return None;
    }
    Some(replace_range(text, SelectionRange::new(offset - 1, offset), ""))
}

/// Where a backward word scan from `offset` stops: just after the nearest
/// preceding ASCII space, or 0. Tabs and newlines are not boundaries.
pub fn word_start(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut start = offset.min(chars.len());
    while start > 0 && chars[start - 1] != ' ' {
        start -= 1;
    }
    start
}

/// Delete from the word start up to `offset`. `None` when the scan stops
/// where it began (offset 0, or right after a space).
pub fn delete_word_before(text: &str, offset: usize) -> Option<(String, usize)> {
    let offset = offset.min(text.chars().count());
    let start = word_start(text, offset);
    if start == offset {
        return None;
    }
    Some(replace_range(text, SelectionRange::new(start, offset), ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte() {
        let text = "aé世b";
        assert_eq!(char_to_byte(text, 0), 0);
        assert_eq!(char_to_byte(text, 1), 1);
        assert_eq!(char_to_byte(text, 2), 3);
        assert_eq!(char_to_byte(text, 3), 6);
        assert_eq!(char_to_byte(text, 4), 7);
        assert_eq!(char_to_byte(text, 99), 7);
    }

    #[test]
    fn test_replace_selection() {
        let (text, caret) = replace_range("abcdef", SelectionRange::new(1, 4), "XY");
        assert_eq!(text, "aXYef");
        assert_eq!(caret, 3);
    }

    #[test]
    fn test_insert_at_caret() {
        let (text, caret) = replace_range("helo", SelectionRange::caret(3), "l");
        assert_eq!(text, "hello");
        assert_eq!(caret, 4);
    }

    #[test]
    fn test_replace_clamps_out_of_range() {
        let (text, caret) = replace_range("abc", SelectionRange::new(2, 50), "!");
        assert_eq!(text, "ab!");
        assert_eq!(caret, 3);
    }

    #[test]
    fn test_replace_multibyte() {
        let (text, caret) = replace_range("日本語", SelectionRange::new(1, 2), "ü");
        assert_eq!(text, "日ü語");
        assert_eq!(caret, 2);
    }

    #[test]
    fn test_delete_char_before() {
        assert_eq!(delete_char_before("abc", 2), Some(("ac".to_string(), 1)));
        assert_eq!(delete_char_before("abc", 0), None);
        assert_eq!(delete_char_before("", 5), None);
        assert_eq!(delete_char_before("a世", 2), Some(("a".to_string(), 1)));
    }

    #[test]
    fn test_delete_word_before() {
        assert_eq!(
            delete_word_before("Hello world", 11),
            Some(("Hello ".to_string(), 6))
        );
        assert_eq!(delete_word_before("Hello", 3), Some(("lo".to_string(), 0)));
    }

    #[test]
    fn test_delete_word_right_after_space_is_noop() {
        assert_eq!(delete_word_before("Hello ", 6), None);
        assert_eq!(delete_word_before("", 0), None);
    }

    #[test]
    fn test_word_boundary_is_ascii_space_only() {
        assert_eq!(word_start("one\ttwo\nthree", 13), 0);
        assert_eq!(word_start("one two\tthree", 13), 4);
    }
}
