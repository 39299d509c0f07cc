use mall_types::product::Product;
use mall_types::{Region, ALL};
use std::collections::BTreeSet;

/// Port cities the backend files under a country code of their own.
static CITY_REGIONS: [(&str, Region); 14] = [
    ("시애틀", Region::Usa),
    ("주노", Region::Usa),
    ("스캐그웨이", Region::Usa),
    ("싯카", Region::Usa),
    ("앵커리지", Region::Usa),
    ("빅토리아", Region::Usa),
    ("밴쿠버", Region::Usa),
    ("Seattle", Region::Usa),
    ("Juneau", Region::Usa),
    ("Skagway", Region::Usa),
    ("Sitka", Region::Usa),
    ("Anchorage", Region::Usa),
    ("Victoria", Region::Usa),
    ("Vancouver", Region::Usa),
];

/// Korean region names as typed into the destination picker.
static COUNTRY_REGIONS: [(&str, Region); 7] = [
    ("일본", Region::Japan),
    ("알래스카", Region::Alaska),
    ("미국", Region::Usa),
    ("동남아", Region::SoutheastAsia),
    ("서부지중해", Region::WesternMediterranean),
    ("동부지중해", Region::EasternMediterranean),
    ("싱가포르", Region::Singapore),
];

/// Ordered keyword table; the first region with a keyword contained in the
/// lowercased text wins. Keywords are lowercase.
pub struct KeywordTable(&'static [(Region, &'static [&'static str])]);

impl KeywordTable {
    pub fn classify(&self, text: &str) -> Option<Region> {
        let text = text.to_lowercase();
        self.0
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(region, _)| *region)
    }
}

/// Country field of itinerary stops (`"JP"`, `"Japan"`, `"일본"`).
pub static ITINERARY_COUNTRIES: KeywordTable = KeywordTable(&[
    (Region::Japan, &["jp", "japan", "일본"]),
    (Region::Alaska, &["alaska", "알래스카"]),
    (Region::Usa, &["us", "usa", "미국", "united states", "america"]),
    (
        Region::SoutheastAsia,
        &["th", "thailand", "태국", "vn", "vietnam", "베트남", "my", "malaysia", "말레이시아"],
    ),
    (Region::Singapore, &["sg", "singapore", "싱가포르"]),
    (
        Region::WesternMediterranean,
        &["es", "spain", "스페인", "fr", "france", "프랑스", "it", "italy", "이탈리아"],
    ),
    (
        Region::EasternMediterranean,
        &["gr", "greece", "그리스", "tr", "turkey", "터키"],
    ),
]);

/// Destination strings such as `"일본 - 후쿠오카"`.
pub static DESTINATIONS: KeywordTable = KeywordTable(&[
    (Region::Japan, &["일본", "japan", "jp"]),
    (Region::Alaska, &["알래스카", "alaska"]),
    (Region::Usa, &["미국", "usa", "united states", "america", "us "]),
    (
        Region::SoutheastAsia,
        &["태국", "thailand", "베트남", "vietnam", "말레이시아", "malaysia"],
    ),
    (Region::Singapore, &["싱가포르", "singapore"]),
    (
        Region::WesternMediterranean,
        &["스페인", "spain", "프랑스", "france", "이탈리아", "italy"],
    ),
    (
        Region::EasternMediterranean,
        &["그리스", "greece", "터키", "turkey"],
    ),
]);

/// Country part of a destination string. `usa` is checked before `alaska`.
pub static COUNTRY_NAMES: KeywordTable = KeywordTable(&[
    (Region::Japan, &["일본", "japan", "jp"]),
    (Region::Usa, &["미국", "usa", "united states", "america"]),
    (Region::Alaska, &["알래스카", "alaska"]),
    (
        Region::SoutheastAsia,
        &["태국", "thailand", "th", "베트남", "vietnam", "vn", "말레이시아", "malaysia", "my"],
    ),
    (Region::Singapore, &["싱가포르", "singapore", "sg"]),
    (
        Region::WesternMediterranean,
        &["스페인", "spain", "es", "프랑스", "france", "fr", "이탈리아", "italy", "it"],
    ),
    (
        Region::EasternMediterranean,
        &["그리스", "greece", "gr", "터키", "turkey", "tr"],
    ),
]);

/// Regions offered as menu filters and the itinerary country markers that
/// make them available. Unlike the tables above every region is checked.
static AVAILABILITY: [(Region, &[&str]); 6] = [
    (Region::Japan, &["JP", "JAPAN", "일본"]),
    (
        Region::SoutheastAsia,
        &["TH", "THAILAND", "태국", "VN", "VIETNAM", "베트남", "MY", "MALAYSIA", "말레이시아"],
    ),
    (Region::Singapore, &["SG", "SINGAPORE", "싱가포르"]),
    (
        Region::WesternMediterranean,
        &["ES", "SPAIN", "스페인", "FR", "FRANCE", "프랑스", "IT", "ITALY", "이탈리아"],
    ),
    (
        Region::EasternMediterranean,
        &["GR", "GREECE", "그리스", "TR", "TURKEY", "터키"],
    ),
    (Region::Alaska, &["US", "USA", "미국", "ALASKA", "알래스카"]),
];

/// Region of a known port city, ignoring case.
pub fn city_region(name: &str) -> Option<Region> {
    let name = name.trim();
    CITY_REGIONS
        .iter()
        .find(|(city, _)| *city == name)
        .or_else(|| {
            let lower = name.to_lowercase();
            CITY_REGIONS
                .iter()
                .find(|(city, _)| city.to_lowercase() == lower)
        })
        .map(|(_, region)| *region)
}

/// Converts a destination picker value (`"미국 - 시애틀"`, `"일본"`, `"Seattle"`)
/// into the backend region code. Unknown input is returned unchanged.
pub fn convert_region_to_api_format(region: &str) -> String {
    resolve_region(region)
        .map(|r| r.code().to_string())
        .unwrap_or_else(|| region.to_string())
}

pub fn resolve_region(region: &str) -> Option<Region> {
    let mut parts = region.split(" - ");
    let country = parts.next().unwrap_or_default().trim();
    let city = parts.next().unwrap_or_default().trim();

    if country.is_empty() && !city.is_empty() {
        if let Some(r) = city_region(city) {
            return Some(r);
        }
    }
    if let Some((_, r)) = COUNTRY_REGIONS.iter().find(|(name, _)| *name == country) {
        return Some(*r);
    }
    if !country.is_empty() {
        if let Some((_, r)) = COUNTRY_REGIONS
            .iter()
            .find(|(name, _)| country.contains(name) || name.contains(country))
        {
            return Some(*r);
        }
    }
    if region.contains("미국") {
        return Some(Region::Usa);
    }
    if !city.is_empty() {
        if let Some(r) = city_region(city) {
            return Some(r);
        }
    }
    let lower = region.to_lowercase();
    CITY_REGIONS
        .iter()
        .find(|(city, _)| lower.contains(&city.to_lowercase()))
        .map(|(_, r)| *r)
}

/// Menu filter values with at least one itinerary stop in the region.
/// Always contains `all`.
pub fn available_regions(products: &[Product]) -> BTreeSet<String> {
    let mut regions = BTreeSet::from([ALL.to_string()]);
    for product in products {
        let countries = product
            .itinerary()
            .into_iter()
            .filter_map(|stop| stop.country)
            .map(|c| c.to_uppercase())
            .collect::<Vec<_>>();
        if countries.is_empty() {
            continue;
        }
        for (region, keywords) in &AVAILABILITY {
            if countries
                .iter()
                .any(|c| keywords.iter().any(|k| c.contains(k)))
            {
                regions.insert(region.code().to_string());
            }
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_country_and_city_values() {
        assert_eq!("usa", convert_region_to_api_format("미국 - 시애틀"));
        assert_eq!("japan", convert_region_to_api_format("일본"));
        assert_eq!("japan", convert_region_to_api_format("일본 - 후쿠오카"));
        assert_eq!("alaska", convert_region_to_api_format("알래스카 - 주노"));
        assert_eq!("usa", convert_region_to_api_format("Seattle"));
        assert_eq!("usa", convert_region_to_api_format(" - 밴쿠버"));
        assert_eq!(
            "eastern-mediterranean",
            convert_region_to_api_format("동부지중해")
        );
    }

    #[test]
    fn matches_partial_country_names() {
        assert_eq!("southeast-asia", convert_region_to_api_format("동남아시아"));
        assert_eq!("japan", convert_region_to_api_format("일"));
    }

    #[test]
    fn finds_cities_anywhere() {
        assert_eq!("usa", convert_region_to_api_format("캐나다 - 밴쿠버"));
        assert_eq!("usa", convert_region_to_api_format("캐나다 빅토리아 경유"));
        assert_eq!("usa", convert_region_to_api_format("seattle round trip"));
    }

    #[test]
    fn keeps_unknown_values() {
        assert_eq!("하와이", convert_region_to_api_format("하와이"));
        assert_eq!("호주 - 시드니", convert_region_to_api_format("호주 - 시드니"));
        assert_eq!("", convert_region_to_api_format(""));
    }

    #[test]
    fn looks_up_cities_ignoring_case() {
        assert_eq!(Some(Region::Usa), city_region("시애틀"));
        assert_eq!(Some(Region::Usa), city_region("JUNEAU"));
        assert_eq!(None, city_region("부산"));
    }

    #[test]
    fn keyword_tables_respect_order() {
        assert_eq!(Some(Region::Japan), ITINERARY_COUNTRIES.classify("JP"));
        assert_eq!(Some(Region::Alaska), ITINERARY_COUNTRIES.classify("US-Alaska"));
        assert_eq!(Some(Region::Usa), ITINERARY_COUNTRIES.classify("US"));
        assert_eq!(None, ITINERARY_COUNTRIES.classify("KR"));
        assert_eq!(Some(Region::Usa), DESTINATIONS.classify("US Virgin"));
        assert_eq!(None, DESTINATIONS.classify("US"));
        assert_eq!(Some(Region::Usa), COUNTRY_NAMES.classify("미국 알래스카"));
        assert_eq!(Some(Region::Alaska), DESTINATIONS.classify("미국 알래스카"));
        assert_eq!(Some(Region::SoutheastAsia), COUNTRY_NAMES.classify("Thailand"));
    }

    #[test]
    fn collects_available_regions() {
        let products = vec![
            Product {
                itinerary_pattern: json!([{"country": "jp"}, {"country": "US"}]),
                ..Default::default()
            },
            Product {
                itinerary_pattern: json!("[{\"country\": \"Greece\"}]"),
                ..Default::default()
            },
            Product::default(),
        ];
        let regions = available_regions(&products);
        assert_eq!(
            BTreeSet::from([
                "all".to_string(),
                "alaska".to_string(),
                "eastern-mediterranean".to_string(),
                "japan".to_string(),
            ]),
            regions
        );
        assert_eq!(BTreeSet::from([ALL.to_string()]), available_regions(&[]));
    }
}
