use crate::null_as_default;
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cruise package as served by `/api/public/products`.
///
/// `destination`, `itinerary_pattern` and `recommended_keywords` are stored by
/// the admin editors in several shapes (array, JSON encoded string, absent),
/// so they are kept as raw JSON and interpreted by the catalog resolvers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cruise_line: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ship_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package_name: String,
    #[serde(default)]
    pub nights: Option<u32>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub destination: Value,
    #[serde(default)]
    pub itinerary_pattern: Value,
    #[serde(default)]
    pub recommended_keywords: Value,
    #[serde(default, alias = "MallProductContent")]
    pub mall_product_content: Option<MallProductContent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_popular: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_recommended: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_genie_pack: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_domestic: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_japan: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_budget: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MallProductContent {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub layout: Value,
}

impl MallProductContent {
    /// Layout object, decoding it first when it was stored as a JSON string.
    pub fn layout(&self) -> Option<Map<String, Value>> {
        match &self.layout {
            Value::Object(map) => Some(map.clone()),
            Value::String(raw) => match serde_json::from_str(raw) {
                Ok(Value::Object(map)) => Some(map),
                Ok(_) => None,
                Err(err) => {
                    log::debug!("Discarding malformed product layout: {err}");
                    None
                }
            },
            _ => None,
        }
    }
}

impl Product {
    pub fn layout(&self) -> Option<Map<String, Value>> {
        self.mall_product_content.as_ref().and_then(|c| c.layout())
    }

    pub fn rating(&self) -> Option<f64> {
        self.layout()
            .and_then(|l| l.get("rating").and_then(Value::as_f64))
            .filter(|r| *r > 0.0)
    }

    pub fn review_count(&self) -> Option<u64> {
        self.layout()
            .and_then(|l| l.get("reviewCount").and_then(Value::as_u64))
            .filter(|c| *c > 0)
    }

    /// Stops of the itinerary pattern; entries that are not objects are skipped.
    pub fn itinerary(&self) -> Vec<ItineraryStop> {
        let decoded;
        let pattern = match &self.itinerary_pattern {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(v) => {
                    decoded = v;
                    &decoded
                }
                Err(err) => {
                    log::debug!("Discarding malformed itinerary of {}: {err}", self.product_code);
                    return vec![];
                }
            },
            v => v,
        };
        pattern
            .as_array()
            .map(|items| items.iter().filter_map(ItineraryStop::from_value).collect())
            .unwrap_or_default()
    }

    pub fn has_classification(&self, classification: Classification) -> bool {
        match classification {
            Classification::Popular => self.is_popular || self.product_code.starts_with("POP-"),
            Classification::Recommended => {
                self.is_recommended || self.product_code.starts_with("REC-")
            }
            Classification::Premium => self.is_premium,
            Classification::Genie => self.is_genie_pack,
            Classification::Domestic => self.is_domestic,
            Classification::Japan => self.is_japan,
            Classification::Budget => self.is_budget,
        }
    }

    /// `"1,290,000원"`, or `"가격 문의"` when the package has no base price.
    pub fn price_label(&self) -> String {
        match self.base_price {
            Some(price) => format!("{}원", group_thousands(&price.round().to_string())),
            None => "가격 문의".to_string(),
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let len = digits.len();
    let grouped: String = digits
        .chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let sep = (i > 0 && (len - i) % 3 == 0).then_some(',');
            sep.into_iter().chain(std::iter::once(c))
        })
        .collect();
    format!("{sign}{grouped}")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItineraryStop {
    pub kind: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub day: Option<u32>,
}

impl ItineraryStop {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| match obj.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Some(Self {
            kind: text("type"),
            location: text("location"),
            country: text("country").filter(|c| !c.is_empty()),
            day: obj
                .get("day")
                .and_then(Value::as_u64)
                .and_then(|d| u32::try_from(d).ok()),
        })
    }
}

/// Storefront classification flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    #[display("인기 크루즈")]
    Popular,
    #[display("추천 크루즈")]
    Recommended,
    #[display("프리미엄 크루즈")]
    Premium,
    #[display("지니패키지 크루즈")]
    Genie,
    #[display("국내출발 크루즈")]
    Domestic,
    #[display("일본 크루즈")]
    Japan,
    #[display("알뜰 크루즈")]
    Budget,
}

impl Classification {
    pub const VARIANTS: [Classification; 7] = [
        Self::Popular,
        Self::Recommended,
        Self::Premium,
        Self::Genie,
        Self::Domestic,
        Self::Japan,
        Self::Budget,
    ];

    pub fn from_value<S: AsRef<str>>(value: S) -> Option<Self> {
        match value.as_ref() {
            "popular" => Some(Self::Popular),
            "recommended" => Some(Self::Recommended),
            "premium" => Some(Self::Premium),
            "genie" => Some(Self::Genie),
            "domestic" => Some(Self::Domestic),
            "japan" => Some(Self::Japan),
            "budget" => Some(Self::Budget),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "one")]
    pub total_pages: u32,
}

fn one() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ProductsResponse {
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ProductsResponse {
    pub fn total_pages(&self) -> u32 {
        self.pagination.map(|p| p.total_pages).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_loose_product_payload() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "productCode": "POP-001",
            "cruiseLine": "MSC 크루즈 (MSC Cruises)",
            "shipName": null,
            "basePrice": 1290000,
            "destination": "[\"일본 - 후쿠오카\"]",
            "MallProductContent": {
                "layout": "{\"rating\": 4.7, \"reviewCount\": 120}"
            },
            "isPremium": null
        }))
        .unwrap();
        assert_eq!("", product.ship_name);
        assert!(!product.is_premium);
        assert!(product.has_classification(Classification::Popular));
        assert_eq!(Some(4.7), product.rating());
        assert_eq!(Some(120), product.review_count());
        assert_eq!("1,290,000원", product.price_label());
    }

    #[test]
    fn parses_itinerary_from_string_and_skips_garbage() {
        let product = Product {
            itinerary_pattern: json!(
                "[{\"type\":\"PortVisit\",\"location\":\"Fukuoka\",\"country\":\"JP\",\"day\":2}, 3, {\"country\":\"\"}]"
            ),
            ..Default::default()
        };
        let stops = product.itinerary();
        assert_eq!(2, stops.len());
        assert_eq!(Some("JP".to_string()), stops[0].country);
        assert_eq!(Some(2), stops[0].day);
        assert_eq!(None, stops[1].country);

        let broken = Product {
            itinerary_pattern: json!("[{"),
            ..Default::default()
        };
        assert!(broken.itinerary().is_empty());
    }

    #[test]
    fn formats_price_groups() {
        assert_eq!("999", group_thousands("999"));
        assert_eq!("1,000", group_thousands("1000"));
        assert_eq!("-12,345", group_thousands("-12345"));
        assert_eq!("가격 문의", Product::default().price_label());
    }
}
