use clap::Parser;
use nyaya_gpt::cli::Cli;
use nyaya_gpt::commands;
use nyaya_gpt::core::context::AppCtx;
use nyaya_gpt::core::logging;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("• {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let ctx = AppCtx::init()?;
    logging::init(&ctx.config.logging.level);

    commands::dispatch(cli.command, &ctx).await
}
