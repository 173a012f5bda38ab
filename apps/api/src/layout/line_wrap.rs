//! Line-wrap estimation for body text.
//!
//! The rasterizer does the real glyph shaping downstream; this estimate only
//! sizes the canvas before rendering. `CHARS_PER_LINE` is a calibrated
//! average glyph advance at the 28 px body font on a 1000 px canvas — an
//! intentional approximation, absorbed by the extra-buffer term in the
//! height formula.

/// Average characters per wrapped display line at the body font size.
pub const CHARS_PER_LINE: usize = 72;

/// Estimates how many visual lines `text` occupies when wrapped at
/// `CHARS_PER_LINE`.
///
/// Each newline-separated segment contributes `max(1, ceil(chars / 72))`
/// lines; a blank segment still takes one line. Fully blank text is the
/// exception and contributes 0 — that suppresses the content block entirely
/// downstream, which is a different outcome than one empty line.
pub fn estimate_lines(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    text.split('\n')
        .map(|segment| {
            if segment.trim().is_empty() {
                1
            } else {
                segment.chars().count().div_ceil(CHARS_PER_LINE).max(1)
            }
        })
        .sum()
}

/// Wraps `text` into concrete display lines for the markup builder.
///
/// Greedy word wrap against the same `CHARS_PER_LINE` budget the estimator
/// uses; a word longer than a full line is hard-split on character
/// boundaries. Returns an empty vec for blank text (no content block at all).
pub fn wrap_lines(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for segment in text.split('\n') {
        if segment.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;
        for word in segment.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > CHARS_PER_LINE {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(CHARS_PER_LINE) {
                    if chunk.len() == CHARS_PER_LINE {
                        lines.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len > CHARS_PER_LINE {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            } else {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            }
        }
        if current_len > 0 {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_zero_lines() {
        assert_eq!(estimate_lines(""), 0);
    }

    #[test]
    fn test_whitespace_only_text_is_zero_lines() {
        assert_eq!(estimate_lines("   \n \t \n  "), 0);
    }

    #[test]
    fn test_short_single_line() {
        assert_eq!(estimate_lines("hello world"), 1);
    }

    #[test]
    fn test_exactly_72_chars_is_one_line() {
        let text = "a".repeat(72);
        assert_eq!(estimate_lines(&text), 1);
    }

    #[test]
    fn test_73_chars_wraps_to_two_lines() {
        let text = "a".repeat(73);
        assert_eq!(estimate_lines(&text), 2);
    }

    #[test]
    fn test_single_line_length_formula() {
        // max(1, ceil(L / 72)) for a handful of lengths
        for (len, expected) in [(1, 1), (71, 1), (72, 1), (144, 2), (145, 3), (500, 7)] {
            let text = "x".repeat(len);
            assert_eq!(estimate_lines(&text), expected, "len={len}");
        }
    }

    #[test]
    fn test_newline_segments_each_count_once() {
        // 4 segments each under 72 chars → 4 lines
        assert_eq!(estimate_lines("one\ntwo\nthree\nfour"), 4);
    }

    #[test]
    fn test_interior_blank_line_counts() {
        // "a", blank, "b" → 3 lines; the blank segment still takes space
        assert_eq!(estimate_lines("a\n\nb"), 3);
    }

    #[test]
    fn test_mixed_long_and_short_segments() {
        let long = "y".repeat(100); // 2 wrapped lines
        let text = format!("short\n{long}");
        assert_eq!(estimate_lines(&text), 3);
    }

    #[test]
    fn test_multibyte_chars_counted_as_chars() {
        // 72 multibyte chars fit on one line even though the byte length is larger
        let text = "é".repeat(72);
        assert_eq!(estimate_lines(&text), 1);
    }

    #[test]
    fn test_wrap_blank_text_is_empty() {
        assert!(wrap_lines("").is_empty());
        assert!(wrap_lines("  \n ").is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_single_line() {
        assert_eq!(wrap_lines("hello world"), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_respects_budget() {
        let text = "word ".repeat(40);
        for line in wrap_lines(&text) {
            assert!(
                line.chars().count() <= CHARS_PER_LINE,
                "line over budget: {line:?}"
            );
        }
    }

    #[test]
    fn test_wrap_preserves_blank_interior_lines() {
        let lines = wrap_lines("a\n\nb");
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_hard_splits_oversized_word() {
        let word = "z".repeat(150);
        let lines = wrap_lines(&word);
        assert_eq!(lines.len(), 3); // 72 + 72 + 6
        assert_eq!(lines[0].chars().count(), 72);
        assert_eq!(lines[2].chars().count(), 6);
    }
}
