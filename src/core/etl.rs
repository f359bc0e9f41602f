use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct JobEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> JobEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting job...");

        let dataset = self.pipeline.extract().await?;
        let rows = dataset.len();
        tracing::info!("Extracted {} rows", rows);
        self.monitor.log_phase("extract", rows);

        let result = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Evaluated {} rows ({} null, {} unresolved)",
            result.summary.total_rows,
            result.summary.null_rows,
            result.summary.unresolved_rows
        );
        self.monitor.log_phase("transform", result.summary.total_rows);

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("load", rows);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
