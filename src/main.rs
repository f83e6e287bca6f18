use media_gateway::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    media_gateway::run(config).await;
    Ok(())
}
