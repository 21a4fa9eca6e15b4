//! Deterministic ordering of an item's chapter feed.

use crate::domain::FeedEntry;

/// Numeric value of a chapter number for ordering purposes
///
/// Parses the longest leading decimal prefix (`"12a"` is 12). Anything
/// absent, unparseable or non-finite counts as 0.
pub fn chapter_value(chapter: Option<&str>) -> f64 {
    chapter
        .and_then(parse_leading_float)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let end = float_prefix_len(trimmed.as_bytes())?;
    trimmed[..end].parse::<f64>().ok()
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` run
///
/// Returns `None` when the mantissa has no digit at all.
fn float_prefix_len(bytes: &[u8]) -> Option<usize> {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }

    if integer == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    Some(end)
}

/// Return the feed ordered by descending chapter number
///
/// The sort is stable, so entries with equal values keep their relative
/// order and sorting an already sorted feed changes nothing. Each chapter
/// number is parsed once.
pub fn sort_feed(feed: &[FeedEntry]) -> Vec<FeedEntry> {
    let mut keyed: Vec<(f64, &FeedEntry)> = feed
        .iter()
        .map(|entry| (chapter_value(entry.chapter.as_deref()), entry))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
}
