#![deny(clippy::unwrap_used)]

use derive_more::Display;
use lazy_regex::regex;
use serde::{Deserialize, Deserializer, Serialize};

pub mod catalog;
pub mod product;
pub mod recipient;
pub mod search;
pub mod settings;

/// Filter value meaning "no restriction".
pub const ALL: &str = "all";

pub fn is_all<S: AsRef<str>>(value: S) -> bool {
    value.as_ref() == ALL
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[display("japan")]
    Japan,
    #[display("alaska")]
    Alaska,
    #[display("usa")]
    Usa,
    #[display("southeast-asia")]
    SoutheastAsia,
    #[display("singapore")]
    Singapore,
    #[display("western-mediterranean")]
    WesternMediterranean,
    #[display("eastern-mediterranean")]
    EasternMediterranean,
}

impl Region {
    pub const VARIANTS: [Region; 7] = [
        Self::Japan,
        Self::Alaska,
        Self::Usa,
        Self::SoutheastAsia,
        Self::Singapore,
        Self::WesternMediterranean,
        Self::EasternMediterranean,
    ];

    /// Backend region code, as accepted by the `region` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Japan => "japan",
            Self::Alaska => "alaska",
            Self::Usa => "usa",
            Self::SoutheastAsia => "southeast-asia",
            Self::Singapore => "singapore",
            Self::WesternMediterranean => "western-mediterranean",
            Self::EasternMediterranean => "eastern-mediterranean",
        }
    }

    /// Label of the related search chip for this region.
    pub fn chip_label(&self) -> &'static str {
        match self {
            Self::Japan => "일본 크루즈",
            Self::Alaska => "알래스카 크루즈",
            Self::Usa => "미국 크루즈",
            Self::SoutheastAsia => "동남아 크루즈",
            Self::Singapore => "싱가포르 크루즈",
            Self::WesternMediterranean => "지중해 크루즈",
            Self::EasternMediterranean => "동부지중해 크루즈",
        }
    }

    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        Self::VARIANTS
            .into_iter()
            .find(|r| r.code() == code.as_ref())
    }
}

/// Text before the first `(`, trimmed: `"일본 (Japan)"` → `"일본"`.
pub fn korean_name(name: &str) -> &str {
    name.split('(').next().unwrap_or_default().trim()
}

/// Text inside the first pair of parentheses, trimmed: `"일본 (Japan)"` → `"Japan"`.
pub fn english_name(name: &str) -> Option<&str> {
    regex!(r"\(([^)]+)\)")
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Deserializes `null` into `T::default()`.
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_bilingual_names() {
        assert_eq!("MSC 크루즈", korean_name("MSC 크루즈 (MSC Cruises)"));
        assert_eq!(Some("MSC Cruises"), english_name("MSC 크루즈 (MSC Cruises)"));
        assert_eq!("코스타 세레나", korean_name("코스타 세레나"));
        assert_eq!(None, english_name("코스타 세레나"));
        assert_eq!(None, english_name("이상한 ()"));
    }

    #[test]
    fn region_codes_round_trip() {
        for region in Region::VARIANTS {
            assert_eq!(Some(region), Region::from_code(region.code()));
            assert_eq!(region.code(), region.to_string());
        }
        assert_eq!(None, Region::from_code("antarctica"));
    }
}
