//! Display-field resolution with fixed placeholder values.
//!
//! Every field shown on the detail view goes through one of these
//! functions; nothing else substitutes placeholders.

use super::item::ItemRecord;

pub const NO_TITLE: &str = "No title available";
pub const NO_ALT_TITLE: &str = "No alt title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_GENRES: &str = "No genres available";
pub const UNKNOWN_YEAR: &str = "Unknown year";
pub const UNKNOWN_STATUS: &str = "Unknown status";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Preferred-locale title
pub fn title(item: &ItemRecord) -> String {
    item.attributes
        .title
        .preferred()
        .unwrap_or(NO_TITLE)
        .to_string()
}

/// First alternate title that has a preferred-locale variant
///
/// Returns `None` rather than the placeholder so callers can hide it.
pub fn alt_title(item: &ItemRecord) -> Option<String> {
    item.attributes
        .alt_titles
        .iter()
        .find_map(|alt| alt.preferred())
        .map(str::to_string)
}

pub fn description(item: &ItemRecord) -> String {
    item.attributes
        .description
        .preferred()
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}

/// Comma-joined tag names, skipping tags without a preferred-locale name
pub fn genres(item: &ItemRecord) -> String {
    let names: Vec<&str> = item
        .attributes
        .tags
        .iter()
        .filter_map(|tag| tag.attributes.name.preferred())
        .collect();

    if names.is_empty() {
        NO_GENRES.to_string()
    } else {
        names.join(", ")
    }
}

/// Publication year; zero counts as missing
pub fn year(item: &ItemRecord) -> String {
    item.attributes
        .year
        .filter(|year| *year != 0)
        .map(|year| year.to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

pub fn status(item: &ItemRecord) -> String {
    item.attributes
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_STATUS)
        .to_string()
}

/// Creator name, never empty
pub fn creator(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}
