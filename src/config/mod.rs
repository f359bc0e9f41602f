pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation;

pub const DEFAULT_ARCHIVE_NAME: &str = "astro_output.zip";
pub const DEFAULT_NULL_MARKER: &str = "\\N";

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{FunctionKind, OutputFormat};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "astro-sign")]
#[command(about = "Resolve astrological signs for a column of birth dates")]
pub struct CliConfig {
    /// Delimited input file with one row per person
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "dob")]
    pub dob_column: String,

    #[arg(long, default_value = "astro_sign")]
    pub output_column: String,

    #[arg(long, value_enum, default_value_t = FunctionKind::AstroSign)]
    pub function: FunctionKind,

    #[arg(long, value_enum, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<OutputFormat>,

    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Input has no header row; columns are named _c0, _c1, ...
    #[arg(long)]
    pub no_headers: bool,

    #[arg(long, default_value = DEFAULT_NULL_MARKER)]
    pub null_marker: String,

    /// Bundle all outputs into one ZIP archive
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_ARCHIVE_NAME)]
    pub compress: Option<String>,

    /// Evaluate a single value and print the result
    #[arg(long)]
    pub dob: Option<String>,

    /// Print the function description and exit
    #[arg(long)]
    pub describe: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 不需要讀取輸入檔的模式
    pub fn is_single_shot(&self) -> bool {
        self.describe || self.dob.is_some()
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn dob_column(&self) -> &str {
        &self.dob_column
    }

    fn output_column(&self) -> &str {
        &self.output_column
    }

    fn function(&self) -> FunctionKind {
        self.function
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn delimiter(&self) -> u8 {
        // validate() 已確認為 ASCII
        self.delimiter as u8
    }

    fn has_headers(&self) -> bool {
        !self.no_headers
    }

    fn null_marker(&self) -> &str {
        &self.null_marker
    }

    fn archive_name(&self) -> Option<&str> {
        self.compress.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.is_single_shot() {
            return Ok(());
        }

        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validate_columns(&self.dob_column, &self.output_column)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_not_empty_list("formats", &self.formats)?;
        if let Some(archive) = &self.compress {
            validation::validate_non_empty_string("compress", archive)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_columns(dob_column: &str, output_column: &str) -> Result<()> {
    validation::validate_non_empty_string("dob_column", dob_column)?;
    validation::validate_non_empty_string("output_column", output_column)?;
    validation::validate_distinct("output_column", output_column, "dob_column", dob_column)
}
