use clap::Parser;
use gcs_drive_mover::app::render_status;
use gcs_drive_mover::utils::{logger, validation::Validate};
use gcs_drive_mover::{relocate, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting gcs-drive-mover CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let result = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => relocate(&config).await,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            Err(e)
        }
    };

    // 狀態一律輸出到 stdout，任何失敗行都以 1 結束
    let (status, failed) = render_status(result);
    println!("{}", status);
    if failed {
        std::process::exit(1);
    }

    Ok(())
}
