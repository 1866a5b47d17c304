use anyhow::Result;
use clap::Parser;
use sales_rag::openai::API_KEY_ENV;
use sales_rag_cli::args::Args;
use sales_rag_cli::{console, logging, startup};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(&args.log_level);

    let api_key = startup::require_api_key(std::env::var(API_KEY_ENV).ok())?;
    let config = args.to_config()?;

    let assistant = startup::build_assistant(config, &api_key, &args.base_url).await?;
    console::run_console(&assistant).await?;
    Ok(())
}
