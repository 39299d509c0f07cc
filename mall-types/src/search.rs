use crate::ALL;
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    #[display("all")]
    All,
    #[display("popular")]
    Popular,
    #[display("recommended")]
    Recommended,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    #[display("newest")]
    Newest,
    #[display("price_asc")]
    PriceAsc,
    #[display("price_desc")]
    PriceDesc,
    #[display("popular")]
    Popular,
}

/// Currently applied catalog query. `"all"` disables a filter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub region: String,
    #[serde(rename = "type", default)]
    pub kind: ProductKind,
    #[serde(default)]
    pub sort: SortOrder,
    pub cruise_line: String,
    pub ship_name: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            region: ALL.to_string(),
            kind: ProductKind::All,
            sort: SortOrder::Newest,
            cruise_line: ALL.to_string(),
            ship_name: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// Neither a region nor a cruise line is selected.
    pub fn is_unfiltered(&self) -> bool {
        crate::is_all(&self.region) && crate::is_all(&self.cruise_line)
    }
}

/// Text typed into the search dropdowns without picking an option.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSearchTerms {
    pub cruise: String,
    pub region: String,
}

impl RawSearchTerms {
    pub fn is_blank(&self) -> bool {
        self.cruise.trim().is_empty() && self.region.trim().is_empty()
    }
}

/// Clickable search suggestion derived from the current inventory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSearchTerm {
    pub label: String,
    pub cruise_line: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_state_uses_wire_names() {
        let state = FilterState {
            kind: ProductKind::Popular,
            sort: SortOrder::PriceAsc,
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!("popular", json["type"]);
        assert_eq!("price_asc", json["sort"]);
        assert_eq!("all", json["cruiseLine"]);
        assert_eq!(SortOrder::PriceAsc.to_string(), "price_asc");
        assert!(state.is_unfiltered());
    }

    #[test]
    fn related_term_omits_missing_keyword() {
        let term = RelatedSearchTerm {
            label: "일본 크루즈".to_string(),
            cruise_line: ALL.to_string(),
            region: "japan".to_string(),
            keyword: None,
        };
        let json = serde_json::to_string(&term).unwrap();
        assert!(!json.contains("keyword"));
    }
}
