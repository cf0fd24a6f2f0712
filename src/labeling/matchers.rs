//! Span matchers used by the label aligner.
//!
//! Every strategy is a pure function from `(haystack, value)` to the byte
//! range of the value inside the haystack, or `None`. The aligner walks an
//! ordered ladder of strategies and keeps the first hit, so each rung can be
//! tested on its own.

use std::ops::Range;

use regex::Regex;
use serde::Serialize;

/// Byte range of a match inside the whitespace-normalised document.
pub type Span = Range<usize>;

/// One rung of an alignment ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Value after a `TOTAL` marker and before a later `ROUND` marker.
    TotalBeforeRound,
    /// Value anywhere after a `TOTAL` marker.
    AfterTotal,
    /// Value delimited by word boundaries, no context.
    WordBounded,
    /// Bare first occurrence, no boundaries.
    Substring,
    /// Verbatim first occurrence. Same search as `Substring`; kept separate so
    /// non-total fields report which ladder accepted them.
    Exact,
    /// Word-bounded window within `max_edits` Levenshtein edits of the value.
    Fuzzy { max_edits: usize },
}

impl MatchStrategy {
    /// Ladder for the distinguished total field, most contextual first.
    pub const TOTAL_LADDER: [MatchStrategy; 4] = [
        MatchStrategy::TotalBeforeRound,
        MatchStrategy::AfterTotal,
        MatchStrategy::WordBounded,
        MatchStrategy::Substring,
    ];

    /// Ladder for every other field: exact, then growing edit budgets.
    pub const FIELD_LADDER: [MatchStrategy; 4] = [
        MatchStrategy::Exact,
        MatchStrategy::Fuzzy { max_edits: 1 },
        MatchStrategy::Fuzzy { max_edits: 2 },
        MatchStrategy::Fuzzy { max_edits: 3 },
    ];

    /// Runs this strategy.
    ///
    /// # Errors
    ///
    /// Only the regex-backed strategies can fail, and only if the escaped
    /// value pushes the compiled pattern over the regex size limit.
    pub fn find(&self, haystack: &str, value: &str) -> Result<Option<Span>, regex::Error> {
        match *self {
            MatchStrategy::TotalBeforeRound => {
                find_group(haystack, &format!(r"(\bTOTAL[^C]*?)({})(\b[^C]*ROUND)", regex::escape(value)))
            }
            MatchStrategy::AfterTotal => {
                find_group(haystack, &format!(r"(\bTOTAL[^C]*)({})(\b)", regex::escape(value)))
            }
            MatchStrategy::WordBounded => {
                find_group(haystack, &format!(r"(\b)({})(\b)", regex::escape(value)))
            }
            MatchStrategy::Substring | MatchStrategy::Exact => Ok(find_substring(haystack, value)),
            MatchStrategy::Fuzzy { max_edits } => Ok(find_fuzzy(haystack, value, max_edits)),
        }
    }
}

/// Compiles a three-group pattern and returns the span of the middle group
/// in the leftmost match.
fn find_group(haystack: &str, pattern: &str) -> Result<Option<Span>, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(regex
        .captures(haystack)
        .and_then(|caps| caps.get(2))
        .map(|m| m.range()))
}

/// First verbatim occurrence of `value`.
#[must_use]
pub fn find_substring(haystack: &str, value: &str) -> Option<Span> {
    haystack
        .find(value)
        .map(|start| start..start + value.len())
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets where a `\b` assertion holds: the characters on either side
/// differ in word-ness, with the ends of the text counting as non-word.
fn word_boundaries(haystack: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut prev_word = false;
    for (offset, c) in haystack.char_indices() {
        let word = is_word_char(c);
        if word != prev_word {
            boundaries.push(offset);
        }
        prev_word = word;
    }
    if prev_word {
        boundaries.push(haystack.len());
    }
    boundaries
}

/// Approximate, word-bounded search.
///
/// Candidate windows start and end on word boundaries and differ from the
/// value's length by at most `max_edits` characters. A window matches when
/// its Levenshtein distance to `value` is within budget. The leftmost start
/// wins; among windows sharing that start the lowest distance wins, then the
/// length closest to the value's.
#[must_use]
pub fn find_fuzzy(haystack: &str, value: &str, max_edits: usize) -> Option<Span> {
    let value_len = value.chars().count();
    if value_len == 0 {
        return None;
    }
    let min_len = value_len.saturating_sub(max_edits).max(1);
    let max_len = value_len + max_edits;

    let boundaries = word_boundaries(haystack);
    for (i, &start) in boundaries.iter().enumerate() {
        let mut best: Option<(usize, usize, Span)> = None;
        for &end in &boundaries[i + 1..] {
            let window = &haystack[start..end];
            let window_len = window.chars().count();
            if window_len > max_len {
                break;
            }
            if window_len < min_len {
                continue;
            }
            let distance = strsim::levenshtein(window, value);
            if distance > max_edits {
                continue;
            }
            let length_gap = window_len.abs_diff(value_len);
            let better = match &best {
                None => true,
                Some((d, gap, _)) => (distance, length_gap) < (*d, *gap),
            };
            if better {
                best = Some((distance, length_gap, start..end));
            }
        }
        if let Some((_, _, span)) = best {
            return Some(span);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        assert_eq!(word_boundaries("AB C"), vec![0, 2, 3, 4]);
        assert_eq!(word_boundaries(" $5"), vec![2, 3]);
        assert!(word_boundaries("").is_empty());
    }

    #[test]
    fn test_fuzzy_respects_budget() {
        let text = "SHOP KEDAI MAKAN";
        assert_eq!(find_fuzzy(text, "KEDAY", 0), None);
        assert_eq!(find_fuzzy(text, "KEDAY", 1), Some(5..10));
    }

    #[test]
    fn test_fuzzy_does_not_match_inside_word() {
        // "OTAL" would be one deletion from "TOTAL" but starts mid-word.
        assert_eq!(find_fuzzy("SUBTOTAL", "OTAL", 0), None);
    }

    #[test]
    fn test_fuzzy_can_span_words() {
        let text = "NO 12 JALAN  BESAR";
        assert_eq!(find_fuzzy(text, "JALAN BESAR", 1), Some(6..18));
    }

    #[test]
    fn test_fuzzy_empty_value() {
        assert_eq!(find_fuzzy("ANY TEXT", "", 3), None);
    }

    #[test]
    fn test_total_pattern_escapes_value() {
        // An unescaped "." would match the "X".
        let text = "TOTAL 12X00 ROUND 12.00";
        let span = MatchStrategy::TotalBeforeRound.find(text, "12.00").unwrap();
        assert_eq!(span, None);
        let span = MatchStrategy::AfterTotal.find(text, "12.00").unwrap();
        assert_eq!(span, Some(18..23));
    }
}
