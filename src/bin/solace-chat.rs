use clap::Parser;
use dotenv::dotenv;
use solace_relay::cli::ChatArgs;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ChatArgs::parse();
    solace_relay::ui::terminal::run(args).await
}
