use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{ConvertError, Result};
use crate::types::CanonicalField;

/// Everything the pipeline needs to know about the workbook layout and the
/// cleaning rules. A run is a pure function of the workbook and this value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub workbook: PathBuf,
    pub output_dir: PathBuf,
    /// Sheets to load, in merge order
    pub sheets: Vec<String>,
    /// Per-field header variant overrides keyed by canonical name (`orderNo`,
    /// `itemBrand`, ...); fields not listed keep the defaults
    pub columns: BTreeMap<String, Vec<String>>,
    pub cleaning: CleaningConfig,
    pub brand_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Uppercased spelling -> canonical state name
    pub state_aliases: BTreeMap<String, String>,
    pub text_null_tokens: Vec<String>,
    pub state_null_tokens: Vec<String>,
    pub state_null_substrings: Vec<String>,
    pub brand_excluded: Vec<String>,
    pub currency_markers: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(constants::DEFAULT_WORKBOOK),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            sheets: owned(constants::DATA_SHEETS),
            columns: BTreeMap::new(),
            cleaning: CleaningConfig::default(),
            brand_limit: constants::BRAND_LIMIT,
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            state_aliases: constants::STATE_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            text_null_tokens: owned(constants::TEXT_NULL_TOKENS),
            state_null_tokens: owned(constants::STATE_NULL_TOKENS),
            state_null_substrings: owned(constants::STATE_NULL_SUBSTRINGS),
            brand_excluded: owned(constants::BRAND_EXCLUDED),
            currency_markers: owned(constants::CURRENCY_MARKERS),
        }
    }
}

/// Built-in header variants for a canonical field, in match priority order
pub fn default_variants(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::OrderNo => constants::ORDER_NO_VARIANTS,
        CanonicalField::OrderDate => constants::ORDER_DATE_VARIANTS,
        CanonicalField::OrderTotal => constants::ORDER_TOTAL_VARIANTS,
        CanonicalField::CustomerName => constants::CUSTOMER_NAME_VARIANTS,
        CanonicalField::Email => constants::EMAIL_VARIANTS,
        CanonicalField::MobileNo => constants::MOBILE_NO_VARIANTS,
        CanonicalField::ShipTo => constants::SHIP_TO_VARIANTS,
        CanonicalField::State => constants::STATE_VARIANTS,
        CanonicalField::ItemName => constants::ITEM_NAME_VARIANTS,
        CanonicalField::ItemBrand => constants::ITEM_BRAND_VARIANTS,
    }
}

impl ConvertConfig {
    /// Load a TOML config file. Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ConvertConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(ConvertError::Config("at least one sheet name is required".to_string()));
        }
        for (name, variants) in &self.columns {
            if CanonicalField::from_name(name).is_none() {
                return Err(ConvertError::Config(format!("unknown column '{}'", name)));
            }
            if variants.is_empty() {
                return Err(ConvertError::Config(format!(
                    "column variants for '{}' must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// The ordered (field, variants) table the normalizer resolves headers against
    pub fn column_variants(&self) -> Vec<(CanonicalField, Vec<String>)> {
        CanonicalField::ALL
            .iter()
            .map(|&field| {
                let variants = self
                    .columns
                    .get(field.as_str())
                    .cloned()
                    .unwrap_or_else(|| owned(default_variants(field)));
                (field, variants)
            })
            .collect()
    }
}
