use astro_sign::core::resolver::row_function;
use astro_sign::core::ConfigProvider;
use astro_sign::utils::{logger, validation::Validate};
use astro_sign::{JobConfig, JobEngine, LocalStorage, SignPipeline};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-job")]
#[command(about = "Run an astro-sign job described by a TOML file")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "astro-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match JobConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 日誌格式由配置決定
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loaded job '{}' from {}", config.job.name, args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No data will be read or written");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(".");
    let sink = LocalStorage::new(config.output_path());
    let pipeline = SignPipeline::new(source, sink, config);
    let engine = JobEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Job completed successfully!");
            println!("✅ Job completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Job failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &JobConfig) {
    println!("📋 Job Summary:");
    println!(
        "  Job: {} v{}",
        config.job.name,
        config.job.version.as_deref().unwrap_or("0")
    );
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!();
}

fn perform_dry_run(config: &JobConfig) {
    let function = row_function(config.function());

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📥 Input:");
    println!("  Path: {}", config.input_path());
    println!("  Delimiter: {:?}", config.delimiter() as char);
    println!("  Header row: {}", config.has_headers());
    println!("  Null marker: {}", config.null_marker());

    println!();
    println!("⚙️ Function:");
    println!("  {}", function.description().usage());
    println!(
        "  {} -> {}",
        config.dob_column(),
        config.output_column()
    );

    println!();
    println!("💾 Output:");
    let formats: Vec<String> = config.output_formats().iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formats.join(", "));
    match config.archive_name() {
        Some(archive) => println!("  Compression: {} (ZIP)", archive),
        None => println!("  Compression: disabled"),
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
