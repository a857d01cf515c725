use clap::Parser;
use page_dump::CrawlConfig;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CrawlConfig::default(),
    };
    let config = args.apply(base);

    ::log::info!(
        "Dumping pages from {} into {}",
        config.seed_urls.join(", "),
        config.output_dir.display()
    );
    ::log::debug!("Using WebDriver at {}", config.webdriver_url);

    match page_dump::crawl(&config).await {
        Ok(summary) => {
            ::log::debug!("Final summary: {:?}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Failed to run crawler: {}", e);
            ExitCode::FAILURE
        }
    }
}
