use crate::config::{validate_columns, DEFAULT_ARCHIVE_NAME, DEFAULT_NULL_MARKER};
use crate::core::ConfigProvider;
use crate::domain::model::{FunctionKind, OutputFormat};
use crate::utils::error::{AstroError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobInfo,
    pub input: InputConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub delimiter: Option<String>,
    pub has_headers: Option<bool>,
    pub null_marker: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub function: FunctionKind,
    #[serde(default = "default_dob_column")]
    pub dob_column: String,
    #[serde(default = "default_output_column")]
    pub output_column: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            function: FunctionKind::default(),
            dob_column: default_dob_column(),
            output_column: default_output_column(),
        }
    }
}

fn default_dob_column() -> String {
    "dob".to_string()
}

fn default_output_column() -> String {
    "astro_sign".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<OutputFormat>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// "compact" 或 "json"
    pub log_format: Option<String>,
}

impl JobConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AstroError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AstroError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AstroError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_path("output.path", &self.output.path)?;
        validate_columns(&self.transform.dob_column, &self.transform.output_column)?;
        validation::validate_not_empty_list("output.formats", &self.output.formats)?;

        if let Some(delimiter) = &self.input.delimiter {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    validation::validate_delimiter("input.delimiter", c)?;
                }
                _ => {
                    return Err(AstroError::InvalidConfigValueError {
                        field: "input.delimiter".to_string(),
                        value: delimiter.clone(),
                        reason: "Delimiter must be exactly one character".to_string(),
                    });
                }
            }
        }

        if let Some(filename) = self
            .output
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
        {
            validation::validate_path("output.compression.filename", filename)?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for JobConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn dob_column(&self) -> &str {
        &self.transform.dob_column
    }

    fn output_column(&self) -> &str {
        &self.transform.output_column
    }

    fn function(&self) -> FunctionKind {
        self.transform.function
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.formats
    }

    fn delimiter(&self) -> u8 {
        self.input
            .delimiter
            .as_deref()
            .and_then(|d| d.bytes().next())
            .unwrap_or(b',')
    }

    fn has_headers(&self) -> bool {
        self.input.has_headers.unwrap_or(true)
    }

    fn null_marker(&self) -> &str {
        self.input
            .null_marker
            .as_deref()
            .unwrap_or(DEFAULT_NULL_MARKER)
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[job]
name = "people-signs"

[input]
path = "data/people.csv"

[output]
path = "./output"
formats = ["csv"]
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = JobConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.job.name, "people-signs");
        assert_eq!(config.function(), FunctionKind::AstroSign);
        assert_eq!(config.dob_column(), "dob");
        assert_eq!(config.output_column(), "astro_sign");
        assert_eq!(config.delimiter(), b',');
        assert!(config.has_headers());
        assert_eq!(config.null_marker(), "\\N");
        assert_eq!(config.archive_name(), None);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[job]
name = "hive-export"
description = "Signs for the customer export"
version = "1.0.0"

[input]
path = "export.tsv"
delimiter = "\t"
has_headers = false
null_marker = "NULL"

[transform]
function = "astro_month_day"
dob_column = "_c3"
output_column = "month_day"

[output]
path = "./out"
formats = ["tsv", "json"]

[output.compression]
enabled = true

[monitoring]
enabled = true
log_format = "json"
"#;

        let config = JobConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.function(), FunctionKind::AstroMonthDay);
        assert_eq!(config.delimiter(), b'\t');
        assert!(!config.has_headers());
        assert_eq!(config.null_marker(), "NULL");
        assert_eq!(config.output_formats(), &[OutputFormat::Tsv, OutputFormat::Json]);
        assert_eq!(config.archive_name(), Some(DEFAULT_ARCHIVE_NAME));
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ASTRO_TEST_DATA_DIR", "/data/landing");

        let toml_content = r#"
[job]
name = "env"

[input]
path = "${ASTRO_TEST_DATA_DIR}/people.csv"

[output]
path = "${ASTRO_TEST_UNSET_VAR}"
formats = ["csv"]
"#;

        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "/data/landing/people.csv");
        assert_eq!(config.output_path(), "${ASTRO_TEST_UNSET_VAR}");

        std::env::remove_var("ASTRO_TEST_DATA_DIR");
    }

    #[test]
    fn test_unknown_format_fails_to_parse() {
        let toml_content = MINIMAL.replace(r#"["csv"]"#, r#"["parquet"]"#);
        let result = JobConfig::from_toml_str(&toml_content);
        assert!(matches!(
            result,
            Err(AstroError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let no_formats = MINIMAL.replace(r#"["csv"]"#, "[]");
        let config = JobConfig::from_toml_str(&no_formats).unwrap();
        assert!(config.validate().is_err());

        let bad_delimiter = MINIMAL.replace(
            r#"path = "data/people.csv""#,
            "path = \"data/people.csv\"\ndelimiter = \"::\"",
        );
        let config = JobConfig::from_toml_str(&bad_delimiter).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "people-signs");
    }
}
