use crate::reference::REFERENCE;
use mall_types::catalog::{CruiseLineData, CruiseOption, ShipOption};
use mall_types::{english_name, korean_name, ALL};
use once_cell::sync::Lazy;

pub const ALL_CRUISES_LABEL: &str = "전체 크루즈";

pub static CRUISE_OPTIONS: Lazy<Vec<CruiseOption>> =
    Lazy::new(|| build_cruise_options_from(&REFERENCE.cruise_lines));

/// Cruise line and ship options built from the bundled ship table.
pub fn build_cruise_options() -> Vec<CruiseOption> {
    CRUISE_OPTIONS.clone()
}

/// Head entry of the cruise dropdown. Not part of the catalog itself: its
/// empty `cruise_line` would otherwise match every inventory key.
pub fn all_cruises_option() -> CruiseOption {
    CruiseOption {
        value: ALL.to_string(),
        label: ALL_CRUISES_LABEL.to_string(),
        cruise_line: String::new(),
        ship_name: String::new(),
    }
}

/// English name when the entry carries one, Korean name otherwise.
fn api_name(name: &str) -> &str {
    english_name(name).unwrap_or_else(|| korean_name(name))
}

pub fn build_cruise_options_from(lines: &[CruiseLineData]) -> Vec<CruiseOption> {
    let mut options = vec![];
    for line in lines {
        let line_short = korean_name(&line.cruise_line);
        let line_value = api_name(&line.cruise_line);
        options.push(CruiseOption {
            value: format!("line:{line_value}"),
            label: format!("{line_short} (전체)"),
            cruise_line: line_value.to_string(),
            ship_name: String::new(),
        });
        for ship in &line.ships {
            let ship_value = api_name(ship);
            options.push(CruiseOption {
                value: format!("ship:{line_value}:{ship_value}"),
                label: ship_label(line_short, korean_name(ship)),
                cruise_line: line_value.to_string(),
                ship_name: ship_value.to_string(),
            });
        }
    }
    options
}

/// `"MSC 크루즈"` + `"MSC 벨리시마"` → `"MSC 벨리시마"`,
/// `"로얄 캐리비안"` + `"스펙트럼 오브 더 시즈"` → `"로얄 스펙트럼 오브 더 시즈"`.
pub fn ship_label(line_short: &str, ship_short: &str) -> String {
    let keywords = line_short
        .split(' ')
        .filter(|w| w.chars().count() > 1)
        .collect::<Vec<_>>();
    if keywords.iter().any(|k| ship_short.contains(k)) {
        return ship_short.to_string();
    }
    let prefix = keywords.first().copied().unwrap_or(line_short);
    format!("{prefix} {ship_short}")
}

pub fn filter_cruise_options<'a>(options: &'a [CruiseOption], term: &str) -> Vec<&'a CruiseOption> {
    let term = term.trim().to_lowercase();
    options
        .iter()
        .filter(|o| term.is_empty() || o.label.to_lowercase().contains(&term))
        .collect()
}

/// Korean short names of all cruise lines, for the listing page line picker.
pub fn cruise_line_names() -> Vec<String> {
    REFERENCE
        .cruise_lines
        .iter()
        .map(|l| korean_name(&l.cruise_line).to_string())
        .collect()
}

/// Ships of the line whose Korean short name is `line_short`. Values are the
/// ship short names, labels follow [`ship_label`].
pub fn ship_names_for_line(line_short: &str) -> Vec<ShipOption> {
    ships_for_line(&REFERENCE.cruise_lines, line_short)
}

fn ships_for_line(lines: &[CruiseLineData], line_short: &str) -> Vec<ShipOption> {
    lines
        .iter()
        .find(|l| korean_name(&l.cruise_line) == line_short)
        .map(|line| {
            line.ships
                .iter()
                .map(|ship| {
                    let ship_short = korean_name(ship);
                    ShipOption {
                        value: ship_short.to_string(),
                        label: ship_label(line_short, ship_short),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}
