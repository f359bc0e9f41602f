use crate::core::resolver::row_function;
use crate::core::{ConfigProvider, Dataset, Pipeline, Record, RowFunction, Storage, TransformResult};
use crate::domain::model::{OutputFormat, RunSummary};
use crate::utils::error::{AstroError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Reads delimited rows, applies a row function to one column and writes the
/// enriched rows back out.
pub struct SignPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    function: Box<dyn RowFunction>,
}

impl<S: Storage, C: ConfigProvider> SignPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        let function = row_function(config.function());
        Self {
            source,
            sink,
            config,
            function,
        }
    }

    pub fn function(&self) -> &dyn RowFunction {
        self.function.as_ref()
    }

    fn render_delimited(&self, dataset: &Dataset, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(&dataset.headers)?;
        for record in &dataset.records {
            writer.write_record(&record.values)?;
        }

        writer
            .into_inner()
            .map_err(|e| AstroError::IoError(e.into_error()))
    }

    fn render(&self, format: OutputFormat, result: &TransformResult) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Csv => self.render_delimited(&result.dataset, b','),
            OutputFormat::Tsv => self.render_delimited(&result.dataset, b'\t'),
            OutputFormat::Json => Ok(serde_json::to_vec_pretty(&result.summary)?),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SignPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Reading input from: {}", self.config.input_path());
        let raw = self.source.read_file(self.config.input_path()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter())
            .has_headers(self.config.has_headers())
            .flexible(true)
            .from_reader(raw.as_slice());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(Record::new(row.iter().map(str::to_string).collect()));
        }

        let headers: Vec<String> = if self.config.has_headers() {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            // 無標題列時採用 _c0, _c1 ... 位置欄名
            let width = records.iter().map(|r| r.values.len()).max().unwrap_or(0);
            (0..width).map(|i| format!("_c{}", i)).collect()
        };

        tracing::debug!("Parsed {} columns, {} rows", headers.len(), records.len());
        Ok(Dataset { headers, records })
    }

    async fn transform(&self, data: Dataset) -> Result<TransformResult> {
        let dob_column = self.config.dob_column();
        let dob_index = data
            .column_index(dob_column)
            .ok_or_else(|| AstroError::MissingColumnError {
                column: dob_column.to_string(),
                available: data.headers.join(", "),
            })?;
        let null_marker = self.config.null_marker();

        let mut summary = RunSummary::new(
            self.function.name(),
            dob_column,
            self.config.output_column(),
        );

        let mut headers = data.headers;
        headers.push(self.config.output_column().to_string());
        let width = headers.len() - 1;

        let mut records = Vec::with_capacity(data.records.len());
        for mut record in data.records {
            let dob = record.get(dob_index).filter(|value| *value != null_marker);
            let output = self.function.evaluate(dob);
            summary.record(dob.is_none(), &output);

            // 短列補齊、長列的多餘欄位移到新欄位之後，讓新欄位對齊標題
            if record.values.len() < width {
                record.values.resize(width, String::new());
            }
            record.values.insert(width, output);
            records.push(record);
        }

        if summary.unresolved_rows > 0 {
            tracing::warn!(
                "⚠️ {} of {} rows could not be resolved",
                summary.unresolved_rows,
                summary.total_rows
            );
        }

        Ok(TransformResult {
            dataset: Dataset { headers, records },
            summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut files = Vec::new();
        for format in self.config.output_formats() {
            files.push((format.default_filename(), self.render(*format, &result)?));
        }

        match self.config.archive_name() {
            Some(archive_name) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = {
                    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                    for (name, data) in &files {
                        zip.start_file(*name, SimpleFileOptions::default())?;
                        zip.write_all(data)?;
                    }
                    zip.finish()?.into_inner()
                };

                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.sink.write_file(archive_name, &zip_data).await?;
                Ok(format!("{}/{}", self.config.output_path(), archive_name))
            }
            None => {
                for (name, data) in &files {
                    tracing::debug!("Writing {} ({} bytes)", name, data.len());
                    self.sink.write_file(name, data).await?;
                }
                Ok(self.config.output_path().to_string())
            }
        }
    }
}
