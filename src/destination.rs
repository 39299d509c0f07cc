use crate::region::{DESTINATIONS, ITINERARY_COUNTRIES};
use mall_types::product::Product;
use mall_types::Region;
use serde_json::{Map, Value};

/// Where a product sails, taken from the first source that has anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destinations {
    /// Picker values such as `"일본 - 후쿠오카"`.
    Named(Vec<String>),
    /// Country fields of the itinerary stops.
    Countries(Vec<String>),
}

impl Destinations {
    /// One region per classified entry, repeats included.
    pub fn regions(&self) -> Vec<Region> {
        match self {
            Self::Named(names) => names.iter().filter_map(|n| DESTINATIONS.classify(n)).collect(),
            Self::Countries(codes) => codes
                .iter()
                .filter_map(|c| ITINERARY_COUNTRIES.classify(c))
                .collect(),
        }
    }
}

type Strategy = fn(&Product, Option<&Map<String, Value>>) -> Option<Destinations>;

const STRATEGIES: [Strategy; 3] = [layout_destinations, product_destinations, itinerary_countries];

/// Layout destinations, then the product field, then itinerary countries.
pub fn resolve_destinations(product: &Product) -> Option<Destinations> {
    let layout = product.layout();
    STRATEGIES.iter().find_map(|s| s(product, layout.as_ref()))
}

/// Named destinations only; itinerary codes do not carry country names.
pub fn named_destinations(product: &Product) -> Vec<String> {
    let layout = product.layout();
    STRATEGIES[..2]
        .iter()
        .find_map(|s| s(product, layout.as_ref()))
        .map(|d| match d {
            Destinations::Named(names) => names,
            Destinations::Countries(_) => vec![],
        })
        .unwrap_or_default()
}

fn layout_destinations(_: &Product, layout: Option<&Map<String, Value>>) -> Option<Destinations> {
    layout
        .and_then(|l| l.get("destination"))
        .and_then(string_list)
        .map(Destinations::Named)
}

fn product_destinations(product: &Product, _: Option<&Map<String, Value>>) -> Option<Destinations> {
    string_list(&product.destination).map(Destinations::Named)
}

fn itinerary_countries(product: &Product, _: Option<&Map<String, Value>>) -> Option<Destinations> {
    let countries = product
        .itinerary()
        .into_iter()
        .filter_map(|stop| stop.country)
        .collect::<Vec<_>>();
    (!countries.is_empty()).then_some(Destinations::Countries(countries))
}

/// Non-empty list of strings, from an array or a JSON encoded array.
/// Entries that are not strings are skipped.
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    let decoded;
    let items = match value {
        Value::Array(items) => items,
        Value::String(raw) => {
            decoded = serde_json::from_str::<Value>(raw).ok()?;
            decoded.as_array()?
        }
        _ => return None,
    };
    let list = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect::<Vec<_>>();
    (!list.is_empty()).then_some(list)
}
