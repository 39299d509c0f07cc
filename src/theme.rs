use crate::client::ProductSource;
use crate::query::{build_below_params, build_theme_params};
use log_error::LogError;
use mall_types::product::{Classification, Product};
use mall_types::settings::{
    DisplayType, MallSettings, MenuFilter, RecommendedBelowSettings, ThemeSectionConfig, ThemeType,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeSet;

pub const DEFAULT_SECTION_TITLE: &str = "추천 크루즈 모음";

/// Region filters of the menu bar when the mall settings have none.
pub static DEFAULT_REGION_FILTERS: Lazy<Vec<MenuFilter>> = Lazy::new(|| {
    [
        ("all", "전체"),
        ("japan", "일본"),
        ("southeast-asia", "동남아"),
        ("singapore", "싱가포르"),
        ("western-mediterranean", "서부지중해"),
        ("eastern-mediterranean", "동부지중해"),
        ("alaska", "알래스카"),
    ]
    .into_iter()
    .map(|(value, label)| MenuFilter {
        value: value.to_string(),
        label: label.to_string(),
        enabled: true,
    })
    .collect()
});

pub fn classification_label(value: &str) -> Option<String> {
    Classification::from_value(value).map(|c| c.to_string())
}

/// `가족` and `#가족` both become `#가족`.
fn hashtag(value: &str) -> String {
    format!("#{}", value.strip_prefix('#').unwrap_or(value))
}

pub fn section_title(section: &ThemeSectionConfig) -> String {
    if !section.title.is_empty() {
        return section.title.clone();
    }
    let value = &section.theme_value;
    match section.theme_type {
        ThemeType::Classification => {
            classification_label(value).unwrap_or_else(|| DEFAULT_SECTION_TITLE.to_string())
        }
        ThemeType::CruiseLine => format!("{value} 선사 추천"),
        ThemeType::Category => format!("{value} 상품 모음"),
        ThemeType::Tag => format!("{} 테마 추천", hashtag(value)),
    }
}

pub fn section_description(section: &ThemeSectionConfig) -> String {
    if let Some(subtitle) = section.subtitle.as_deref().filter(|s| !s.is_empty()) {
        return subtitle.to_string();
    }
    let value = &section.theme_value;
    match section.theme_type {
        ThemeType::Classification => format!(
            "{} 상품을 모아봤어요.",
            classification_label(value).unwrap_or_else(|| value.clone())
        ),
        ThemeType::CruiseLine => format!("{value} 선사 상품을 한눈에 확인하세요."),
        ThemeType::Category => format!("{value} 테마의 상품을 소개합니다."),
        ThemeType::Tag => format!("{} 태그가 포함된 상품을 모았습니다.", hashtag(value)),
    }
}

/// Theme section ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub display_type: DisplayType,
    pub link_text: Option<String>,
    pub link_url: Option<String>,
    pub products: Vec<Product>,
}

/// Fetches the products of one configured section. A failed fetch renders
/// the section empty.
pub async fn load_theme_section(
    source: &dyn ProductSource,
    section: &ThemeSectionConfig,
) -> ThemeSection {
    let products = source
        .search_products(&build_theme_params(section))
        .await
        .log_error(&format!("Unable to load theme section {}", section.id))
        .map(|res| res.products)
        .unwrap_or_default();
    ThemeSection {
        id: section.id.clone(),
        title: section_title(section),
        description: section_description(section),
        display_type: section.display_type,
        link_text: section.link_text.clone(),
        link_url: section.link_url.clone(),
        products,
    }
}

/// Products block under the recommended list, when configured as one.
pub async fn load_below_products(
    source: &dyn ProductSource,
    below: &RecommendedBelowSettings,
) -> Vec<Product> {
    let Some(params) = build_below_params(below) else {
        return vec![];
    };
    source
        .search_products(&params)
        .await
        .log_error("Unable to load products below the recommended list")
        .map(|res| res.products)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedSection {
    pub classification: Classification,
    pub title: String,
    pub products: Vec<Product>,
}

/// Buckets products by classification flag. A product lands in every
/// bucket it qualifies for; empty buckets are left out.
pub fn classify(products: &[Product]) -> Vec<ClassifiedSection> {
    Classification::VARIANTS
        .into_iter()
        .filter_map(|classification| {
            let products = products
                .iter()
                .filter(|p| p.has_classification(classification))
                .cloned()
                .collect::<Vec<_>>();
            (!products.is_empty()).then(|| ClassifiedSection {
                classification,
                title: classification.to_string(),
                products,
            })
        })
        .collect()
}

/// Enabled menu filters (or the defaults) that have products on sale.
pub fn region_menu_filters(settings: &MallSettings, available: &BTreeSet<String>) -> Vec<MenuFilter> {
    let configured = settings
        .menu_bar
        .as_ref()
        .map(|m| &m.filters)
        .filter(|f| !f.is_empty())
        .unwrap_or(&*DEFAULT_REGION_FILTERS);
    configured
        .iter()
        .filter(|f| f.enabled && available.contains(&f.value))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::query::SearchParams;
    use async_trait::async_trait;
    use mall_types::product::ProductsResponse;
    use mall_types::settings::{BelowProducts, BelowSectionType, MenuBarSettings};

    fn section(theme_type: ThemeType, value: &str) -> ThemeSectionConfig {
        ThemeSectionConfig {
            id: "s1".to_string(),
            enabled: true,
            title: String::new(),
            subtitle: None,
            display_type: DisplayType::Carousel,
            theme_type,
            theme_value: value.to_string(),
            limit: 0,
            link_text: None,
            link_url: None,
        }
    }

    #[test]
    fn derives_default_titles() {
        assert_eq!(
            "프리미엄 크루즈",
            section_title(&section(ThemeType::Classification, "premium"))
        );
        assert_eq!(
            DEFAULT_SECTION_TITLE,
            section_title(&section(ThemeType::Classification, "unknown"))
        );
        assert_eq!("MSC 선사 추천", section_title(&section(ThemeType::CruiseLine, "MSC")));
        assert_eq!("지중해 상품 모음", section_title(&section(ThemeType::Category, "지중해")));
        assert_eq!("#가족 테마 추천", section_title(&section(ThemeType::Tag, "#가족")));

        let mut titled = section(ThemeType::Tag, "가족");
        titled.title = "가족 여행".to_string();
        assert_eq!("가족 여행", section_title(&titled));
    }

    #[test]
    fn derives_descriptions() {
        assert_eq!(
            "알뜰 크루즈 상품을 모아봤어요.",
            section_description(&section(ThemeType::Classification, "budget"))
        );
        assert_eq!(
            "luxury 상품을 모아봤어요.",
            section_description(&section(ThemeType::Classification, "luxury"))
        );
        assert_eq!(
            "코스타 선사 상품을 한눈에 확인하세요.",
            section_description(&section(ThemeType::CruiseLine, "코스타"))
        );
        assert_eq!(
            "#허니문 태그가 포함된 상품을 모았습니다.",
            section_description(&section(ThemeType::Tag, "허니문"))
        );

        let mut with_subtitle = section(ThemeType::Category, "지중해");
        with_subtitle.subtitle = Some(String::new());
        assert_eq!(
            "지중해 테마의 상품을 소개합니다.",
            section_description(&with_subtitle)
        );
        with_subtitle.subtitle = Some("여름 한정".to_string());
        assert_eq!("여름 한정", section_description(&with_subtitle));
    }

    #[test]
    fn buckets_by_classification() {
        let products = vec![
            Product {
                id: 1,
                is_popular: true,
                is_japan: true,
                ..Default::default()
            },
            Product {
                id: 2,
                product_code: "REC-002".to_string(),
                ..Default::default()
            },
        ];
        let sections = classify(&products);
        let summary = sections
            .iter()
            .map(|s| (s.classification, s.products.iter().map(|p| p.id).collect::<Vec<_>>()))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                (Classification::Popular, vec![1]),
                (Classification::Recommended, vec![2]),
                (Classification::Japan, vec![1]),
            ],
            summary
        );
        assert_eq!("일본 크루즈", sections[2].title);
    }

    #[test]
    fn menu_filters_follow_availability() {
        let available = BTreeSet::from(["all".to_string(), "japan".to_string()]);
        let values = |filters: Vec<MenuFilter>| {
            filters.into_iter().map(|f| f.value).collect::<Vec<_>>()
        };
        assert_eq!(
            vec!["all", "japan"],
            values(region_menu_filters(&MallSettings::default(), &available))
        );

        let settings = MallSettings {
            menu_bar: Some(MenuBarSettings {
                filters: vec![
                    MenuFilter {
                        value: "japan".to_string(),
                        label: "일본".to_string(),
                        enabled: false,
                    },
                    MenuFilter {
                        value: "all".to_string(),
                        label: "전체".to_string(),
                        enabled: true,
                    },
                    MenuFilter {
                        value: "alaska".to_string(),
                        label: "알래스카".to_string(),
                        enabled: true,
                    },
                ],
            }),
            ..Default::default()
        };
        assert_eq!(vec!["all"], values(region_menu_filters(&settings, &available)));
    }

    struct Unavailable;

    #[async_trait]
    impl ProductSource for Unavailable {
        async fn search_products(&self, _: &SearchParams) -> Result<ProductsResponse, ClientError> {
            Err(ClientError::Api("down".to_string()))
        }
    }

    #[actix_rt::test]
    async fn failed_sections_render_empty() {
        let mut config = section(ThemeType::CruiseLine, "MSC");
        config.link_url = Some("/products?cruiseLine=MSC".to_string());
        let loaded = load_theme_section(&Unavailable, &config).await;
        assert!(loaded.products.is_empty());
        assert_eq!("MSC 선사 추천", loaded.title);
        assert_eq!(config.link_url, loaded.link_url);

        let below = RecommendedBelowSettings {
            kind: BelowSectionType::Products,
            products: BelowProducts {
                count: 4,
                category: "japan".to_string(),
            },
            ..Default::default()
        };
        assert!(load_below_products(&Unavailable, &below).await.is_empty());
    }
}
