use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    pub value: String,
    pub label: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuBarSettings {
    #[serde(default)]
    pub filters: Vec<MenuFilter>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDisplaySettings {
    pub popular_rows: u32,
    pub recommended_rows: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BelowSectionType {
    #[default]
    None,
    Banner,
    Products,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct BelowBanner {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct BelowProducts {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub category: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RecommendedBelowSettings {
    #[serde(rename = "type", default)]
    pub kind: BelowSectionType,
    #[serde(default)]
    pub banner: BelowBanner,
    #[serde(default)]
    pub products: BelowProducts,
}

/// Storefront configuration edited in the admin visual editor. Only the
/// sections the catalog reads are typed; the rest is kept verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MallSettings {
    #[serde(rename = "menu-bar-settings", default)]
    pub menu_bar: Option<MenuBarSettings>,
    #[serde(rename = "product-display-settings", default)]
    pub product_display: Option<ProductDisplaySettings>,
    #[serde(rename = "recommended-below-settings", default)]
    pub recommended_below: Option<RecommendedBelowSettings>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MallSettingsResponse {
    pub ok: bool,
    #[serde(default)]
    pub settings: Option<MallSettings>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Main page layout served by `/api/public/page-config`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub theme_sections: Vec<ThemeSectionConfig>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl PageConfig {
    pub fn enabled_theme_sections(&self) -> impl Iterator<Item = &ThemeSectionConfig> {
        self.theme_sections.iter().filter(|s| s.enabled)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PageConfigResponse {
    pub ok: bool,
    #[serde(default)]
    pub config: Option<PageConfig>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Carousel,
    Grid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ThemeType {
    Classification,
    CruiseLine,
    Category,
    Tag,
}

impl ThemeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::CruiseLine => "cruiseLine",
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSectionConfig {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub display_type: DisplayType,
    pub theme_type: ThemeType,
    pub theme_value: String,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub link_text: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
}
