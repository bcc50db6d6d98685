use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool, quiet: bool) -> EnvFilter {
    let directives = if quiet {
        "warn"
    } else if verbose {
        "scribe_match=debug,info"
    } else {
        "scribe_match=info"
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_cli_logger(verbose: bool, quiet: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, quiet))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, quiet: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, quiet))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 機器可讀格式，方便交給 log 收集器
        )
        .init();
}
