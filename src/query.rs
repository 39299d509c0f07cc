use crate::destination::string_list;
use crate::region::{city_region, convert_region_to_api_format};
use derive_more::Deref;
use mall_types::catalog::CruiseSelection;
use mall_types::product::{Classification, Product};
use mall_types::search::{FilterState, ProductKind, RawSearchTerms, RelatedSearchTerm, SortOrder};
use mall_types::settings::{BelowSectionType, RecommendedBelowSettings, ThemeSectionConfig};
use mall_types::is_all;
use serde::Serialize;

pub const PAGE_SIZE: u32 = 12;
pub const DEFAULT_THEME_LIMIT: u32 = 8;
pub const DEFAULT_BELOW_COUNT: u32 = 4;

/// Ordered query string pairs. Keys may repeat (`keyword` often does).
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq, Deref)]
#[serde(transparent)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    pub fn append<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(&self.0).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Cruise dropdown value → `cruiseLine` / `shipName`.
fn append_cruise(params: &mut SearchParams, value: &str) {
    match CruiseSelection::parse(value) {
        CruiseSelection::All => {}
        CruiseSelection::Line(line) | CruiseSelection::Literal(line) => {
            params.append("cruiseLine", line);
        }
        CruiseSelection::Ship { line, ship } => {
            params.append("cruiseLine", line);
            params.append("shipName", ship);
        }
        CruiseSelection::MalformedShip => {
            log::debug!("Ignoring malformed ship selection {value}");
        }
    }
}

/// Region dropdown value → `region`, plus the city as `keyword` so ports
/// shared by several itineraries still narrow the result.
fn append_region(params: &mut SearchParams, value: &str) {
    if is_all(value) {
        return;
    }
    params.append("region", convert_region_to_api_format(value));
    if value.contains(" - ") {
        if let Some(city) = value.split(" - ").nth(1).map(str::trim) {
            if !city.is_empty() {
                params.append("keyword", city);
            }
        }
    } else if city_region(value).is_some() {
        params.append("keyword", value);
    }
}

/// Query of the search block: picked options first, typed text when the
/// matching dropdown was left at `all`.
pub fn build_search_params(filter: &FilterState, raw: &RawSearchTerms) -> SearchParams {
    let mut params = SearchParams::default();

    if is_all(&filter.cruise_line) {
        let text = raw.cruise.trim();
        if !text.is_empty() {
            params.append("keyword", text);
        }
    } else {
        append_cruise(&mut params, &filter.cruise_line);
    }

    if is_all(&filter.region) {
        let text = raw.region.trim();
        if !text.is_empty() {
            if let Some(region) = city_region(text) {
                params.append("region", region.code());
            }
            params.append("keyword", text);
        }
    } else {
        append_region(&mut params, &filter.region);
    }
    params
}

pub fn build_related_term_params(term: &RelatedSearchTerm) -> SearchParams {
    let mut params = SearchParams::default();
    append_cruise(&mut params, &term.cruise_line);
    append_region(&mut params, &term.region);
    if let Some(keyword) = term.keyword.as_deref().filter(|k| !k.is_empty()) {
        params.append("keyword", keyword);
    }
    params
}

/// Paged product list query; filter values are passed through as they are.
pub fn build_listing_params(filter: &FilterState, page: u32) -> SearchParams {
    let mut params = SearchParams::default();
    params.append("page", page.max(1).to_string());
    params.append("limit", PAGE_SIZE.to_string());
    params.append("sort", filter.sort.to_string());
    for (key, value) in [
        ("region", &filter.region),
        ("cruiseLine", &filter.cruise_line),
        ("shipName", &filter.ship_name),
    ] {
        if !is_all(value) {
            params.append(key, value.as_str());
        }
    }
    params
}

pub fn build_theme_params(section: &ThemeSectionConfig) -> SearchParams {
    let limit = match section.limit {
        0 => DEFAULT_THEME_LIMIT,
        l => l,
    };
    SearchParams::from_iter([
        ("themeType", section.theme_type.as_str().to_string()),
        ("themeValue", section.theme_value.clone()),
        ("themeLimit", limit.to_string()),
    ])
}

/// Products shown under the recommended section, when configured.
pub fn build_below_params(below: &RecommendedBelowSettings) -> Option<SearchParams> {
    if below.kind != BelowSectionType::Products {
        return None;
    }
    let count = match below.products.count {
        0 => DEFAULT_BELOW_COUNT,
        c => c,
    };
    let mut params = SearchParams::default();
    params.append("limit", count.to_string());
    params.append("sort", SortOrder::Popular.to_string());
    if !below.products.category.is_empty() {
        params.append("region", below.products.category.as_str());
    }
    Some(params)
}

pub fn build_inventory_params(limit: usize) -> SearchParams {
    SearchParams::from_iter([("limit", limit.to_string())])
}

/// Products whose own `recommendedKeywords` contain `keyword` verbatim.
pub fn filter_by_exact_keyword(products: Vec<Product>, keyword: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| {
            string_list(&p.recommended_keywords)
                .unwrap_or_default()
                .iter()
                .any(|k| k == keyword)
        })
        .collect()
}

pub fn filter_by_kind(products: Vec<Product>, kind: ProductKind) -> Vec<Product> {
    let classification = match kind {
        ProductKind::All => return products,
        ProductKind::Popular => Classification::Popular,
        ProductKind::Recommended => Classification::Recommended,
    };
    products
        .into_iter()
        .filter(|p| p.has_classification(classification))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mall_types::settings::{BelowProducts, DisplayType, ThemeType};
    use serde_json::json;

    fn filter(region: &str, cruise: &str) -> FilterState {
        FilterState {
            region: region.to_string(),
            cruise_line: cruise.to_string(),
            ..Default::default()
        }
    }

    fn pairs(params: &SearchParams) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn builds_ship_and_city_query() {
        let params = build_search_params(
            &filter("미국 - 시애틀", "ship:MSC Cruises:MSC Bellissima"),
            &RawSearchTerms::default(),
        );
        assert_eq!(
            vec![
                ("cruiseLine", "MSC Cruises"),
                ("shipName", "MSC Bellissima"),
                ("region", "usa"),
                ("keyword", "시애틀"),
            ],
            pairs(&params)
        );
        assert_eq!(
            "cruiseLine=MSC+Cruises&shipName=MSC+Bellissima&region=usa&keyword=%EC%8B%9C%EC%95%A0%ED%8B%80",
            params.to_query_string()
        );
    }

    #[test]
    fn uses_raw_text_when_nothing_picked() {
        let raw = RawSearchTerms {
            cruise: " 벨리시마 ".to_string(),
            region: "시애틀".to_string(),
        };
        let params = build_search_params(&FilterState::default(), &raw);
        assert_eq!(
            vec![("keyword", "벨리시마"), ("region", "usa"), ("keyword", "시애틀")],
            pairs(&params)
        );
        assert_eq!(vec!["벨리시마", "시애틀"], params.get_all("keyword").collect::<Vec<_>>());

        let raw = RawSearchTerms {
            cruise: String::new(),
            region: "하와이".to_string(),
        };
        let params = build_search_params(&FilterState::default(), &raw);
        assert_eq!(vec![("keyword", "하와이")], pairs(&params));
    }

    #[test]
    fn ignores_raw_text_once_picked() {
        let raw = RawSearchTerms {
            cruise: "무시".to_string(),
            region: "무시".to_string(),
        };
        let params = build_search_params(&filter("일본", "line:Costa Cruises"), &raw);
        assert_eq!(
            vec![("cruiseLine", "Costa Cruises"), ("region", "japan")],
            pairs(&params)
        );
    }

    #[test]
    fn city_value_becomes_keyword() {
        let params = build_search_params(&filter("Seattle", "all"), &RawSearchTerms::default());
        assert_eq!(
            vec![("region", "usa"), ("keyword", "Seattle")],
            pairs(&params)
        );
    }

    #[test]
    fn drops_malformed_ship_values() {
        let params = build_search_params(
            &filter("all", "ship:MSC Cruises"),
            &RawSearchTerms::default(),
        );
        assert!(params.is_empty());
        let params = build_search_params(&filter("all", "Costa Cruises"), &RawSearchTerms::default());
        assert_eq!(Some("Costa Cruises"), params.get("cruiseLine"));
    }

    #[test]
    fn builds_chip_query() {
        let term = RelatedSearchTerm {
            label: "가족여행".to_string(),
            cruise_line: "all".to_string(),
            region: "all".to_string(),
            keyword: Some("가족여행".to_string()),
        };
        assert_eq!(
            vec![("keyword", "가족여행")],
            pairs(&build_related_term_params(&term))
        );
        let term = RelatedSearchTerm {
            label: "일본 크루즈".to_string(),
            cruise_line: "line:MSC Cruises".to_string(),
            region: "japan".to_string(),
            keyword: None,
        };
        assert_eq!(
            vec![("cruiseLine", "MSC Cruises"), ("region", "japan")],
            pairs(&build_related_term_params(&term))
        );
    }

    #[test]
    fn builds_listing_query() {
        let state = FilterState {
            region: "japan".to_string(),
            sort: SortOrder::PriceDesc,
            ship_name: "MSC 벨리시마".to_string(),
            ..Default::default()
        };
        assert_eq!(
            vec![
                ("page", "2"),
                ("limit", "12"),
                ("sort", "price_desc"),
                ("region", "japan"),
                ("shipName", "MSC 벨리시마"),
            ],
            pairs(&build_listing_params(&state, 2))
        );
    }

    #[test]
    fn builds_theme_and_below_queries() {
        let section = ThemeSectionConfig {
            id: "s1".to_string(),
            enabled: true,
            title: String::new(),
            subtitle: None,
            display_type: DisplayType::Carousel,
            theme_type: ThemeType::CruiseLine,
            theme_value: "MSC".to_string(),
            limit: 0,
            link_text: None,
            link_url: None,
        };
        assert_eq!(
            "themeType=cruiseLine&themeValue=MSC&themeLimit=8",
            build_theme_params(&section).to_query_string()
        );

        let mut below = RecommendedBelowSettings::default();
        assert_eq!(None, build_below_params(&below));
        below.kind = BelowSectionType::Products;
        below.products = BelowProducts {
            count: 0,
            category: "japan".to_string(),
        };
        assert_eq!(
            Some("limit=4&sort=popular&region=japan".to_string()),
            build_below_params(&below).map(|p| p.to_query_string())
        );
    }

    #[test]
    fn filters_by_exact_keyword() {
        let products = vec![
            Product {
                id: 1,
                recommended_keywords: json!(["가족여행", "허니문"]),
                ..Default::default()
            },
            Product {
                id: 2,
                recommended_keywords: json!("[\"가족여행 \"]"),
                ..Default::default()
            },
            Product {
                id: 3,
                recommended_keywords: json!("가족여행"),
                ..Default::default()
            },
            Product {
                id: 4,
                recommended_keywords: json!("[\"가족여행\"]"),
                ..Default::default()
            },
        ];
        let ids = filter_by_exact_keyword(products, "가족여행")
            .iter()
            .map(|p| p.id)
            .collect::<Vec<_>>();
        assert_eq!(vec![1, 4], ids);
    }

    #[test]
    fn filters_by_kind() {
        let products = vec![
            Product {
                id: 1,
                is_popular: true,
                ..Default::default()
            },
            Product {
                id: 2,
                product_code: "REC-7".to_string(),
                ..Default::default()
            },
        ];
        let ids = |kind| {
            filter_by_kind(products.clone(), kind)
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(vec![1, 2], ids(ProductKind::All));
        assert_eq!(vec![1], ids(ProductKind::Popular));
        assert_eq!(vec![2], ids(ProductKind::Recommended));
    }
}
