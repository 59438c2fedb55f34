use clap::Parser;
use dotenv::dotenv;
use log::error;
use solace_relay::cli::Args;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = solace_relay::run(args).await {
        error!("Relay stopped: {}", e);
        return Err(e);
    }

    Ok(())
}
