use crate::reference::REFERENCE;
use mall_types::catalog::{ContinentData, RegionOption};
use mall_types::{korean_name, ALL};
use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const ALL_REGIONS_LABEL: &str = "전체 지역";

pub static REGION_OPTIONS: Lazy<Vec<RegionOption>> =
    Lazy::new(|| build_region_options_from(&REFERENCE.countries));

/// Destination dropdown options built from the bundled country table.
pub fn build_region_options() -> Vec<RegionOption> {
    REGION_OPTIONS.clone()
}

/// `all` first, then every country followed by its `"<country> - <region>"`
/// entries. The first option with a given value wins.
pub fn build_region_options_from(continents: &[ContinentData]) -> Vec<RegionOption> {
    let mut seen = HashSet::new();
    let mut options = vec![RegionOption::new(ALL, ALL_REGIONS_LABEL)];
    seen.insert(ALL.to_string());

    let mut push = |value: String| {
        if seen.insert(value.clone()) {
            options.push(RegionOption::new(value.clone(), value));
        }
    };

    for country in continents.iter().flat_map(|c| &c.countries) {
        let country_name = korean_name(&country.name);
        push(country_name.to_string());
        for region in &country.regions {
            push(format!("{country_name} - {}", korean_name(region)));
        }
    }
    options
}

/// Options whose label contains `term`, ignoring case. A blank term keeps all.
pub fn filter_region_options<'a>(options: &'a [RegionOption], term: &str) -> Vec<&'a RegionOption> {
    let term = term.trim().to_lowercase();
    options
        .iter()
        .filter(|o| term.is_empty() || o.label.to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mall_types::catalog::CountryData;

    fn continent(countries: &[(&str, &[&str])]) -> ContinentData {
        ContinentData {
            continent: "아시아 (Asia)".to_string(),
            countries: countries
                .iter()
                .map(|(name, regions)| CountryData {
                    name: name.to_string(),
                    regions: regions.iter().map(|r| r.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn lists_countries_then_regions() {
        let options = build_region_options_from(&[continent(&[
            ("일본 (Japan)", &["도쿄 (Tokyo)", "오사카"]),
            ("싱가포르 (Singapore)", &[]),
        ])]);
        let values = options.iter().map(|o| o.value.as_str()).collect::<Vec<_>>();
        assert_eq!(
            vec!["all", "일본", "일본 - 도쿄", "일본 - 오사카", "싱가포르"],
            values
        );
        assert_eq!(RegionOption::new("all", "전체 지역"), options[0]);
        assert_eq!("일본 - 도쿄", options[2].label);
    }

    #[test]
    fn drops_duplicate_values() {
        let options = build_region_options_from(&[
            continent(&[("일본 (Japan)", &["도쿄 (Tokyo)", "도쿄"])]),
            continent(&[("일본", &["도쿄"]), ("all", &[])]),
        ]);
        let values = options.iter().map(|o| o.value.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["all", "일본", "일본 - 도쿄"], values);
        assert_eq!(ALL_REGIONS_LABEL, options[0].label);
    }

    #[test]
    fn bundled_options_are_unique() {
        let options = build_region_options();
        assert_eq!(RegionOption::new(ALL, ALL_REGIONS_LABEL), options[0]);
        let unique = options.iter().map(|o| &o.value).collect::<HashSet<_>>();
        assert_eq!(options.len(), unique.len());
        assert!(options.iter().any(|o| o.value == "미국 - 시애틀"));
    }

    #[test]
    fn filters_by_label() {
        let options = build_region_options_from(&[continent(&[(
            "미국 (USA)",
            &["시애틀 (Seattle)", "마이애미 (Miami)"],
        )])]);
        let found = filter_region_options(&options, "시애틀");
        assert_eq!(1, found.len());
        assert_eq!("미국 - 시애틀", found[0].value);
        assert_eq!(options.len(), filter_region_options(&options, "  ").len());
    }
}
