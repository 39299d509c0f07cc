#![deny(clippy::unwrap_used)]

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

pub mod client;
pub mod cruise_catalog;
pub mod destination;
pub mod query;
pub mod recipient;
pub mod reference;
pub mod region;
pub mod region_catalog;
pub mod related_terms;
pub mod search;
pub mod theme;

pub use mall_types as types;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_INVENTORY_LIMIT: usize = 1000;

pub static API_BASE: Lazy<String> = Lazy::new(|| {
    envmnt::get_or("MALL_API_BASE", DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
});

/// Delay between the last keystroke in a search box and the query it triggers.
pub fn search_debounce() -> Duration {
    Duration::from_millis(envmnt::get_parse("SEARCH_DEBOUNCE_MS").unwrap_or(DEFAULT_DEBOUNCE_MS))
}

/// Number of products fetched to derive related search terms.
pub fn inventory_limit() -> usize {
    envmnt::get_parse("INVENTORY_LIMIT")
        .ok()
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_INVENTORY_LIMIT)
}

pub fn reference_data_dir() -> Option<PathBuf> {
    let dir = envmnt::get_or("REFERENCE_DATA_DIR", "");
    let dir = dir.trim();
    (!dir.is_empty()).then(|| PathBuf::from(dir))
}
