use crate::domain::model::{
    Dataset, FunctionDescription, FunctionKind, OutputFormat, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn dob_column(&self) -> &str;
    fn output_column(&self) -> &str;
    fn function(&self) -> FunctionKind;
    fn output_formats(&self) -> &[OutputFormat];
    fn delimiter(&self) -> u8;
    fn has_headers(&self) -> bool;
    fn null_marker(&self) -> &str;
    /// ZIP 檔名；`None` 表示逐一輸出檔案
    fn archive_name(&self) -> Option<&str>;
}

/// A per-row scalar function, the unit a query engine invokes once per row.
pub trait RowFunction: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> FunctionDescription;
    fn evaluate(&self, input: Option<&str>) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
