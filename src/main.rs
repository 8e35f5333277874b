use ip_whitelist::config::Config;
use ip_whitelist::logging::{init_logging, DEFAULT_CONFIG_FILE};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging(DEFAULT_CONFIG_FILE).expect("Error initializing log4rs");
    log::info!("#Start main()");

    let config = Config::from_env()?;
    ip_whitelist::run(config).await?;

    Ok(())
}
