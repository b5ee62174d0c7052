use missionchat_client::Config;
use missionchat_client::net::ClientRuntime;
use std::io::BufRead;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Default to warn so diagnostics don't interleave
    // with the transcript; raise with RUST_LOG=missionchat_client=debug.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "missionchat_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(url = %config.server_url, "loaded configuration");

    // Bridge stdin onto the runtime task. Reading stdin blocks, so it gets
    // its own thread; the channel closes when the player hits EOF.
    let (input_tx, input_rx) = tokio::sync::mpsc::channel::<String>(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    ClientRuntime::new(config, input_rx).run().await?;
    Ok(())
}
