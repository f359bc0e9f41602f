pub mod etl;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{Dataset, Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RowFunction, Storage};
pub use crate::utils::error::Result;
