use crate::destination::{named_destinations, resolve_destinations};
use crate::region::COUNTRY_NAMES;
use itertools::Itertools;
use mall_types::catalog::CruiseOption;
use mall_types::product::Product;
use mall_types::search::RelatedSearchTerm;
use mall_types::{english_name, korean_name, Region, ALL};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

const MAX_REGION_TERMS: usize = 5;
const MAX_CRUISE_LINE_TERMS: usize = 5;
const MAX_KEYWORD_TERMS: usize = 10;
const MAX_COUNTRY_TERMS: usize = 8;
const MAX_TERMS: usize = 20;

const CRUISE_SUFFIX: &str = "크루즈";

/// Counter that remembers the order keys were first seen in.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: vec![],
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Tally<K> {
    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: &K) -> usize {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest counts first, ties in first-seen order, at most `limit` entries.
    pub fn top(&self, limit: usize) -> Vec<(K, usize)> {
        self.entries
            .iter()
            .filter(|(_, count)| *count > 0)
            .cloned()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(limit)
            .collect()
    }
}

struct RankedTerm {
    term: RelatedSearchTerm,
    count: usize,
}

#[derive(Default)]
struct TermList {
    terms: Vec<RankedTerm>,
    seen: HashSet<String>,
}

impl TermList {
    fn push(&mut self, term: RelatedSearchTerm, count: usize) {
        if self.seen.insert(term.label.clone()) {
            self.terms.push(RankedTerm { term, count });
        }
    }

    /// Keyword chips first, then by count; at most [`MAX_TERMS`].
    fn finish(self) -> Vec<RelatedSearchTerm> {
        self.terms
            .into_iter()
            .sorted_by(|a, b| {
                b.term
                    .keyword
                    .is_some()
                    .cmp(&a.term.keyword.is_some())
                    .then(b.count.cmp(&a.count))
            })
            .take(MAX_TERMS)
            .map(|r| r.term)
            .collect()
    }
}

/// Suggestion chips derived from what the mall currently sells: regions,
/// cruise lines, recommended keywords and individual countries.
pub fn compute_related_search_terms(
    products: &[Product],
    cruise_options: &[CruiseOption],
) -> Vec<RelatedSearchTerm> {
    if products.is_empty() {
        return vec![];
    }

    let regions = region_tally(products);
    let cruise_lines = cruise_line_tally(products);
    let keywords = keyword_tally(products);
    let countries = country_tally(products);

    let mut list = TermList::default();
    for (region, count) in regions.top(MAX_REGION_TERMS) {
        list.push(
            RelatedSearchTerm {
                label: region.chip_label().to_string(),
                cruise_line: ALL.to_string(),
                region: region.code().to_string(),
                keyword: None,
            },
            count,
        );
    }
    for (key, count) in cruise_lines.top(MAX_CRUISE_LINE_TERMS) {
        let (label, value) = cruise_line_chip(&key, cruise_options);
        if label == crate::cruise_catalog::ALL_CRUISES_LABEL {
            continue;
        }
        list.push(
            RelatedSearchTerm {
                label,
                cruise_line: value,
                region: ALL.to_string(),
                keyword: None,
            },
            count,
        );
    }
    for (keyword, count) in keywords.top(MAX_KEYWORD_TERMS) {
        list.push(
            RelatedSearchTerm {
                label: keyword.clone(),
                cruise_line: ALL.to_string(),
                region: ALL.to_string(),
                keyword: Some(keyword),
            },
            count,
        );
    }
    for ((country, region), count) in countries.top(MAX_COUNTRY_TERMS) {
        list.push(
            RelatedSearchTerm {
                label: format!("{country} {CRUISE_SUFFIX}"),
                cruise_line: ALL.to_string(),
                region: region.code().to_string(),
                keyword: None,
            },
            count,
        );
    }
    list.finish()
}

pub fn region_tally(products: &[Product]) -> Tally<Region> {
    let mut tally = Tally::default();
    for region in products
        .iter()
        .filter_map(resolve_destinations)
        .flat_map(|d| d.regions())
    {
        tally.add(region);
    }
    tally
}

/// Line names are counted in every spelling the admin may have stored; ship
/// names are counted too since some products have the two fields swapped.
pub fn cruise_line_tally(products: &[Product]) -> Tally<String> {
    let mut tally = Tally::default();
    for product in products {
        let line = product.cruise_line.trim();
        if !line.is_empty() {
            add_bilingual(&mut tally, line);
            tally.add(line.to_string());
        }
        let ship = product.ship_name.trim();
        if !ship.is_empty() {
            add_bilingual(&mut tally, ship);
        }
    }
    tally
}

fn add_bilingual(tally: &mut Tally<String>, name: &str) {
    let korean = korean_name(name);
    if !korean.is_empty() {
        tally.add(korean.to_string());
    }
    if let Some(english) = english_name(name) {
        tally.add(english.to_string());
    }
}

pub fn keyword_tally(products: &[Product]) -> Tally<String> {
    let mut tally = Tally::default();
    for keyword in products.iter().flat_map(recommended_keywords) {
        tally.add(keyword);
    }
    tally
}

/// Country part of each named destination paired with its region.
/// Names no region claims are left out.
pub fn country_tally(products: &[Product]) -> Tally<(String, Region)> {
    let mut tally = Tally::default();
    for destination in products.iter().flat_map(named_destinations) {
        let destination = destination.trim();
        let country = destination.split('-').next().unwrap_or_default().trim();
        if country.is_empty() {
            continue;
        }
        if let Some(region) = COUNTRY_NAMES.classify(country) {
            tally.add((country.to_string(), region));
        }
    }
    tally
}

/// Layout keywords when the layout has any, the product field otherwise.
pub fn recommended_keywords(product: &Product) -> Vec<String> {
    product
        .layout()
        .and_then(|l| l.get("recommendedKeywords").and_then(keyword_list))
        .or_else(|| keyword_list(&product.recommended_keywords))
        .unwrap_or_default()
}

/// Trimmed, non-blank keywords. A string that is not JSON is one keyword;
/// JSON that is not an array yields none.
fn keyword_list(value: &Value) -> Option<Vec<String>> {
    let decoded;
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => {
                decoded = v;
                decoded.as_array().map(Vec::as_slice).unwrap_or_default()
            }
            Err(_) => std::slice::from_ref(value),
        },
        _ => return None,
    };
    let keywords = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    (!keywords.is_empty()).then_some(keywords)
}

/// Label and filter value of a cruise line chip.
fn cruise_line_chip(key: &str, cruise_options: &[CruiseOption]) -> (String, String) {
    let key_lower = key.to_lowercase();
    let option = cruise_options.iter().find(|o| {
        let line = o.cruise_line.to_lowercase();
        !line.is_empty() && (line.contains(&key_lower) || key_lower.contains(&line))
    });
    match option {
        Some(option) => {
            let base = korean_name(&option.label);
            let label = if base.contains(CRUISE_SUFFIX) {
                base.to_string()
            } else {
                format!("{base} {CRUISE_SUFFIX}")
            };
            (label, option.value.clone())
        }
        None => {
            let label = if key_lower.contains("cruise") || key.contains(CRUISE_SUFFIX) {
                key.to_string()
            } else {
                format!("{key} {CRUISE_SUFFIX}")
            };
            (label, format!("line:{key}"))
        }
    }
}
