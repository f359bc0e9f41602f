use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 無法解析的輸入（太短、格式錯誤或不落在任何區間）
pub const UNKNOWN_SIGN: &str = "_UNK_EXCEPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    /// Looks up the sign for an `MM-dd` slice by scanning [`SIGN_RANGES`] in order.
    ///
    /// Comparison is plain string ordering, which matches (month, day) ordering
    /// as long as both parts are zero padded.
    pub fn for_month_day(month_day: &str) -> Option<Sign> {
        SIGN_RANGES
            .iter()
            .find(|range| range.contains(month_day))
            .map(|range| range.sign)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive `MM-dd` bounds mapped to a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignRange {
    pub low: &'static str,
    pub high: &'static str,
    pub sign: Sign,
}

impl SignRange {
    const fn new(low: &'static str, high: &'static str, sign: Sign) -> Self {
        Self { low, high, sign }
    }

    pub fn contains(&self, month_day: &str) -> bool {
        self.low <= month_day && month_day <= self.high
    }
}

/// Priority order starts at Aries. Capricorn wraps the year end and therefore
/// appears twice. `10-22` falls between Libra and Scorpio and matches nothing.
pub static SIGN_RANGES: [SignRange; 13] = [
    SignRange::new("03-21", "04-19", Sign::Aries),
    SignRange::new("04-20", "05-20", Sign::Taurus),
    SignRange::new("05-21", "06-21", Sign::Gemini),
    SignRange::new("06-22", "07-22", Sign::Cancer),
    SignRange::new("07-23", "08-22", Sign::Leo),
    SignRange::new("08-23", "09-22", Sign::Virgo),
    SignRange::new("09-23", "10-21", Sign::Libra),
    SignRange::new("10-23", "11-21", Sign::Scorpio),
    SignRange::new("11-22", "12-21", Sign::Sagittarius),
    SignRange::new("12-22", "12-31", Sign::Capricorn),
    SignRange::new("01-01", "01-19", Sign::Capricorn),
    SignRange::new("01-20", "02-18", Sign::Aquarius),
    SignRange::new("02-19", "03-20", Sign::Pisces),
];

/// 一列資料，欄位順序與 [`Dataset::headers`] 對齊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub function: String,
    pub input_column: String,
    pub output_column: String,
    pub processed_at: DateTime<Utc>,
    pub total_rows: usize,
    pub null_rows: usize,
    pub unresolved_rows: usize,
    pub value_counts: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn new(function: &str, input_column: &str, output_column: &str) -> Self {
        Self {
            function: function.to_string(),
            input_column: input_column.to_string(),
            output_column: output_column.to_string(),
            processed_at: Utc::now(),
            total_rows: 0,
            null_rows: 0,
            unresolved_rows: 0,
            value_counts: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, input_was_null: bool, output: &str) {
        self.total_rows += 1;
        if input_was_null {
            self.null_rows += 1;
            return;
        }
        if output == UNKNOWN_SIGN {
            self.unresolved_rows += 1;
        }
        *self.value_counts.entry(output.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub dataset: Dataset,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn default_filename(self) -> &'static str {
        match self {
            OutputFormat::Csv => "output.csv",
            OutputFormat::Tsv => "output.tsv",
            OutputFormat::Json => "summary.json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// 可供批次作業選用的列函數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    AstroSign,
    AstroMonthDay,
}

/// Host-facing metadata for a row function, in the shape a query engine prints
/// for `DESCRIBE FUNCTION EXTENDED`. `_FUNC_` stands for the function name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescription {
    pub name: &'static str,
    pub usage: &'static str,
    pub extended: &'static str,
}

impl FunctionDescription {
    pub fn usage(&self) -> String {
        self.usage.replace("_FUNC_", self.name)
    }

    pub fn render_extended(&self) -> String {
        format!(
            "{}\n{}",
            self.usage(),
            self.extended.replace("_FUNC_", self.name)
        )
    }
}
