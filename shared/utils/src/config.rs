use config::{Config, ConfigError, Environment, File};
use matchwise_models::{Granularity, PredictionMethod};
use serde::{Deserialize, Serialize};
use std::env;

use crate::cbom::{Coordinates, DictionaryLoader};
use crate::error::MatchwiseResult;
use crate::validation::IdentifierGrammars;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cbom: CbomConfig,
    pub validation: ValidationConfig,
    pub analysis: AnalysisConfig,
    pub dictionary: DictionaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

/// Where the room × 12NC quantity matrix sits inside a CBOM sheet.
///
/// Columns are spreadsheet letters, rows are 1-based as shown in Excel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbomConfig {
    pub columns: CbomColumns,
    pub rows: CbomRows,
    pub target_sheet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbomColumns {
    pub room_start: String,
    #[serde(alias = "12nc")]
    pub part: String,
    #[serde(alias = "12nc_description")]
    pub part_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbomRows {
    pub room_numbers: i64,
    pub room_descriptions: i64,
    #[serde(alias = "12nc_start")]
    pub part_start: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub patterns: ValidationPatterns,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationPatterns {
    #[serde(alias = "12nc_normalized")]
    pub part_normalized: String,
    pub room_normalized: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub lookback_years: u32,
    pub granularity: Granularity,
    pub method: PredictionMethod,
    pub buffer_percentage: f64,
    pub horizon: usize,
}

/// 12NC dictionary workbook: the sheet to read and the shapes its keys
/// (`1234 567 89012`) and mapped item codes (`ABC123`) must have.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    pub sheet: String,
    pub key_pattern: String,
    pub item_pattern: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("MATCHWISE").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Check that the CBOM layout resolves and every pattern compiles.
    pub fn validate(&self) -> MatchwiseResult<()> {
        Coordinates::resolve(&self.cbom)?;
        IdentifierGrammars::from_config(&self.validation)?;
        DictionaryLoader::new(&self.dictionary)?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size: 32 * 1024 * 1024, // 32MB
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}

impl Default for CbomConfig {
    fn default() -> Self {
        Self {
            columns: CbomColumns::default(),
            rows: CbomRows::default(),
            target_sheet: "C-BoM 830234".to_string(),
        }
    }
}

impl Default for CbomColumns {
    fn default() -> Self {
        Self {
            room_start: "G".to_string(),
            part: "C".to_string(),
            part_description: "D".to_string(),
        }
    }
}

impl Default for CbomRows {
    fn default() -> Self {
        Self {
            room_numbers: 5,
            room_descriptions: 4,
            part_start: 9,
        }
    }
}

impl Default for ValidationPatterns {
    fn default() -> Self {
        Self {
            part_normalized: r"\d{12}".to_string(),
            room_normalized: r"[A-Za-z0-9]+".to_string(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            sheet: "12NC_Mapping".to_string(),
            key_pattern: r"\d{4} \d{3} \d{5}".to_string(),
            item_pattern: r"[A-Z]{3,4}\d+".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_years: 3,
            granularity: Granularity::Monthly,
            method: PredictionMethod::Average,
            buffer_percentage: 10.0,
            horizon: 3,
        }
    }
}
