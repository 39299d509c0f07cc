use anyhow::Context;
use log_error::LogError;
use mall_types::catalog::{ContinentData, CruiseLineData};
use once_cell::sync::Lazy;
use std::path::Path;

const COUNTRIES_FILE: &str = "countries.json";
const CRUISE_SHIPS_FILE: &str = "cruise_ships.json";

static BUNDLED_COUNTRIES: &str = include_str!("../data/countries.json");
static BUNDLED_CRUISE_SHIPS: &str = include_str!("../data/cruise_ships.json");

/// Static country and cruise ship tables the catalogs are built from.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub countries: Vec<ContinentData>,
    pub cruise_lines: Vec<CruiseLineData>,
}

pub static REFERENCE: Lazy<ReferenceData> =
    Lazy::new(|| ReferenceData::load(crate::reference_data_dir().as_deref()));

impl ReferenceData {
    pub fn parse(countries: &str, cruise_ships: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            countries: serde_json::from_str(countries).context("Unable to parse countries")?,
            cruise_lines: serde_json::from_str(cruise_ships)
                .context("Unable to parse cruise ships")?,
        })
    }

    pub fn bundled() -> Result<Self, anyhow::Error> {
        Self::parse(BUNDLED_COUNTRIES, BUNDLED_CRUISE_SHIPS)
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, anyhow::Error> {
        let dir = dir.as_ref();
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Unable to read {}", path.display()))
        };
        Self::parse(&read(COUNTRIES_FILE)?, &read(CRUISE_SHIPS_FILE)?)
    }

    /// Override directory when given and readable, bundled tables otherwise.
    pub fn load(dir: Option<&Path>) -> Self {
        if let Some(dir) = dir {
            match Self::from_dir(dir) {
                Ok(data) => {
                    log::info!("Loaded reference data from {}", dir.display());
                    return data;
                }
                Err(err) => log::warn!("Falling back to bundled reference data: {err:#}"),
            }
        }
        Self::bundled()
            .log_error("Unable to parse bundled reference data")
            .unwrap_or_default()
    }
}
