use serde::{Deserialize, Serialize};

/// Continent entry of the bundled country reference data.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContinentData {
    pub continent: String,
    #[serde(default)]
    pub countries: Vec<CountryData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CountryData {
    pub name: String,
    #[serde(default)]
    pub regions: Vec<String>,
}

/// Cruise line entry of the bundled ship reference data.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CruiseLineData {
    pub cruise_line: String,
    #[serde(default)]
    pub ships: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegionOption {
    pub value: String,
    pub label: String,
}

impl RegionOption {
    pub fn new<V: Into<String>, L: Into<String>>(value: V, label: L) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ship entry of the listing page picker; `value` is the ship short name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShipOption {
    pub value: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CruiseOption {
    pub value: String,
    pub label: String,
    pub cruise_line: String,
    pub ship_name: String,
}

/// Decoded cruise filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CruiseSelection<'a> {
    All,
    /// `line:<cruise line>`
    Line(&'a str),
    /// `ship:<cruise line>:<ship>`
    Ship { line: &'a str, ship: &'a str },
    /// `ship:` value that does not split into exactly two parts.
    MalformedShip,
    /// Plain cruise line value.
    Literal(&'a str),
}

impl<'a> CruiseSelection<'a> {
    pub fn parse(value: &'a str) -> Self {
        if crate::is_all(value) {
            return Self::All;
        }
        if let Some(line) = value.strip_prefix("line:") {
            return Self::Line(line);
        }
        if let Some(rest) = value.strip_prefix("ship:") {
            let parts = rest.split(':').collect::<Vec<_>>();
            return match parts.as_slice() {
                [line, ship] => Self::Ship {
                    line: *line,
                    ship: *ship,
                },
                _ => Self::MalformedShip,
            };
        }
        Self::Literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cruise_selection() {
        assert_eq!(CruiseSelection::All, CruiseSelection::parse("all"));
        assert_eq!(
            CruiseSelection::Line("MSC Cruises"),
            CruiseSelection::parse("line:MSC Cruises")
        );
        assert_eq!(
            CruiseSelection::Ship {
                line: "MSC Cruises",
                ship: "MSC Bellissima"
            },
            CruiseSelection::parse("ship:MSC Cruises:MSC Bellissima")
        );
        assert_eq!(
            CruiseSelection::MalformedShip,
            CruiseSelection::parse("ship:a:b:c")
        );
        assert_eq!(
            CruiseSelection::Literal("Costa Cruises"),
            CruiseSelection::parse("Costa Cruises")
        );
    }
}
