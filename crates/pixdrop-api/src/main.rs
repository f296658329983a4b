use pixdrop_api::setup::{self, server::Server};
use pixdrop_core::Config;

// Use mimalloc as the global allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, transcoder, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    Server::bind(&config, router).await?.serve().await?;

    Ok(())
}
