use clap::Parser;
use scribe_match::utils::logger;
use scribe_match::{AssignmentPipeline, AssignmentRunner, CliConfig, LocalStorage};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose, cli.quiet);
    } else {
        logger::init_cli_logger(cli.verbose, cli.quiet);
    }

    tracing::info!("🎓 Starting assign-scribes");
    tracing::debug!("CLI config: {:?}", cli);

    // 合併設定檔並驗證
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let storage = LocalStorage::new(".");
    let pipeline = AssignmentPipeline::new(storage, settings);
    let mut runner = AssignmentRunner::new(pipeline);

    match runner.run() {
        Ok(destination) => {
            tracing::info!("✅ Assignment completed, output: {}", destination);
        }
        Err(e) => {
            tracing::error!(
                "❌ Assignment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
