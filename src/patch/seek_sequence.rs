//! Fuzzy context location for update hunks.
//!
//! Attempts to find the sequence of `context` lines within `lines`,
//! beginning at or after `start`, and reports how loose the match had to be.
//! Matches are attempted with decreasing strictness: exact equality first,
//! then ignoring trailing whitespace, then ignoring leading and trailing
//! whitespace on both sides. Within a tier the earliest position wins; the
//! first tier that yields any match wins overall.
//!
//! When `eof` is set the context is expected to sit at the end of the file,
//! so the suffix position is tried first under the same ladder. A forward
//! search is still attempted as a fallback, but carries a large penalty so
//! that callers watching the fuzz total can spot a misanchored
//! end-of-file hunk that nevertheless applied.

/// Fuzz charged when a tier-2 (trailing-whitespace) match was needed.
const TRAILING_WS_FUZZ: u64 = 1;
/// Fuzz charged when a tier-3 (full-trim) match was needed.
const TRIM_FUZZ: u64 = 100;
/// Penalty added when an end-of-file context only matched away from the end.
const EOF_FALLBACK_FUZZ: u64 = 10_000;

/// Locate `context` in `lines`, honoring the `eof` placement hint.
///
/// Returns the matched start position and the fuzz the match cost, or
/// `None` when no tier matched anywhere.
pub(crate) fn find_context(
    lines: &[String],
    context: &[String],
    start: usize,
    eof: bool,
) -> Option<(usize, u64)> {
    if eof {
        let suffix_start = lines.len().saturating_sub(context.len());
        if let Some(hit) = find_context_core(lines, context, suffix_start) {
            return Some(hit);
        }
        return find_context_core(lines, context, start)
            .map(|(index, fuzz)| (index, fuzz + EOF_FALLBACK_FUZZ));
    }
    find_context_core(lines, context, start)
}

fn find_context_core(lines: &[String], context: &[String], start: usize) -> Option<(usize, u64)> {
    if context.is_empty() {
        return Some((start, 0));
    }
    // A context longer than the remaining input cannot match; bail before
    // the window arithmetic below underflows.
    if context.len() > lines.len() {
        return None;
    }
    let last = lines.len() - context.len();

    // Exact match first.
    for i in start..=last {
        if lines[i..i + context.len()] == *context {
            return Some((i, 0));
        }
    }
    // Then retry ignoring trailing whitespace on both sides.
    for i in start..=last {
        let mut ok = true;
        for (offset, ctx) in context.iter().enumerate() {
            if lines[i + offset].trim_end() != ctx.trim_end() {
                ok = false;
                break;
            }
        }
        if ok {
            return Some((i, TRAILING_WS_FUZZ));
        }
    }
    // Finally trim both ends for the loosest acceptable match.
    for i in start..=last {
        let mut ok = true;
        for (offset, ctx) in context.iter().enumerate() {
            if lines[i + offset].trim() != ctx.trim() {
                ok = false;
                break;
            }
        }
        if ok {
            return Some((i, TRIM_FUZZ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::find_context;

    fn to_vec(strings: &[&str]) -> Vec<String> {
        strings.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exact_match_costs_no_fuzz() {
        let lines = to_vec(&["foo", "bar", "baz"]);
        let context = to_vec(&["bar", "baz"]);
        assert_eq!(find_context(&lines, &context, 0, false), Some((1, 0)));
    }

    #[test]
    fn test_earliest_position_wins_within_a_tier() {
        let lines = to_vec(&["x", "dup", "y", "dup"]);
        let context = to_vec(&["dup"]);
        assert_eq!(find_context(&lines, &context, 0, false), Some((1, 0)));
    }

    #[test]
    fn test_start_offset_skips_earlier_occurrences() {
        let lines = to_vec(&["dup", "x", "dup"]);
        let context = to_vec(&["dup"]);
        assert_eq!(find_context(&lines, &context, 1, false), Some((2, 0)));
    }

    #[test]
    fn test_trailing_whitespace_match_costs_one() {
        let lines = to_vec(&["foo   ", "bar\t"]);
        let context = to_vec(&["foo", "bar"]);
        assert_eq!(find_context(&lines, &context, 0, false), Some((0, 1)));
    }

    #[test]
    fn test_full_trim_match_costs_one_hundred() {
        let lines = to_vec(&["  name: \"Section 25\",", "}"]);
        let context = to_vec(&["   name: \"Section 25\",", "}"]);
        assert_eq!(find_context(&lines, &context, 0, false), Some((0, 100)));
    }

    #[test]
    fn test_exact_beats_looser_tiers_even_when_later() {
        // The trim tier would match at 0, but the exact hit at 2 wins
        // because tiers are exhausted in order.
        let lines = to_vec(&["  key  ", "x", "key"]);
        let context = to_vec(&["key"]);
        assert_eq!(find_context(&lines, &context, 0, false), Some((2, 0)));
    }

    #[test]
    fn test_empty_context_matches_at_start() {
        let lines = to_vec(&["a", "b"]);
        assert_eq!(find_context(&lines, &[], 1, false), Some((1, 0)));
    }

    #[test]
    fn test_context_longer_than_input_is_not_found() {
        let lines = to_vec(&["only line"]);
        let context = to_vec(&["too", "many", "lines"]);
        assert_eq!(find_context(&lines, &context, 0, false), None);
    }

    #[test]
    fn test_not_found_anywhere() {
        let lines = to_vec(&["a", "b", "c"]);
        let context = to_vec(&["z"]);
        assert_eq!(find_context(&lines, &context, 0, false), None);
    }

    #[test]
    fn test_eof_prefers_suffix_position() {
        let lines = to_vec(&["tail", "x", "tail", ""]);
        let context = to_vec(&["tail", ""]);
        assert_eq!(find_context(&lines, &context, 0, true), Some((2, 0)));
    }

    #[test]
    fn test_eof_fallback_adds_large_penalty() {
        let lines = to_vec(&["marker", "x", "y"]);
        let context = to_vec(&["marker"]);
        assert_eq!(find_context(&lines, &context, 0, true), Some((0, 10_000)));
    }
}
