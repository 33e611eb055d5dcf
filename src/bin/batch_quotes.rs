use anyhow::Context;
use clap::Parser;
use mortgage_cost::core::{ConfigProvider, Pipeline};
use mortgage_cost::utils::{logger, validation::Validate};
use mortgage_cost::{BatchPipeline, CalculationEngine, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "batch-quotes")]
#[command(about = "Quote a CSV of loans using a TOML batch configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "mortgage-batch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines instead of compact text
    #[arg(long)]
    json_logs: bool,

    /// Dry run - read and validate the input without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting batch quote tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    let storage = LocalStorage::new(config.working_directory());
    let pipeline = BatchPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&pipeline).await?;
        return Ok(());
    }

    let engine = CalculationEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Batch completed successfully!");
            println!(
                "✅ Quoted {} loans ({} rejected)",
                summary.quoted, summary.rejected
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
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

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Batch: {}", config.batch_name());
    if let Some(description) = &config.batch.description {
        tracing::info!("📝 {}", description);
    }
    tracing::info!("📂 Working directory: {}", config.working_directory());
    if let Some(env) = &config.environment {
        let mut names: Vec<&str> = env.keys().map(String::as_str).collect();
        names.sort_unstable();
        tracing::info!("🔧 Declared variables: {}", names.join(", "));
    }
    tracing::info!("📥 Input: {}", config.input_file());
    tracing::info!(
        "📤 Output: {} ({})",
        config.output_path(),
        config.output_formats().join(", ")
    );
    tracing::info!(
        "⚙️  Schedule: {}, skip invalid rows: {}",
        config.include_schedule(),
        config.skip_invalid()
    );
}

async fn perform_dry_run(pipeline: &BatchPipeline<LocalStorage, TomlConfig>) -> anyhow::Result<()> {
    let records = pipeline
        .extract()
        .await
        .context("reading loan records")?;
    tracing::info!("🔍 Would quote {} loan records", records.len());

    let batch = pipeline
        .transform(records)
        .await
        .context("computing quotes")?;

    for quote in &batch.quotes {
        tracing::info!(
            "   {} -> total cost {:.2} (monthly {:.2})",
            quote.id,
            quote.total_cost,
            quote.monthly_payment
        );
    }
    for rejected in &batch.rejected {
        tracing::warn!("   {} rejected: {}", rejected.id, rejected.reason);
    }

    println!(
        "🔍 Dry run: {} loans would be quoted, {} rejected",
        batch.quotes.len(),
        batch.rejected.len()
    );
    Ok(())
}
