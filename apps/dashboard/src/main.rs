mod config;
mod render;
mod session;

use tracing_subscriber::EnvFilter;

use partcount_stream::StreamClient;

use config::DashboardConfig;
use render::TerminalSink;
use session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,partcount=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = DashboardConfig::load()?;
    tracing::info!(
        endpoint = %cfg.endpoint,
        reconnect_delay_ms = cfg.reconnect_delay.as_millis() as u64,
        "starting dashboard"
    );

    let client = StreamClient::new(cfg.endpoint.clone(), cfg.reconnect_config())?;
    let mut session = Session::new(client, TerminalSink::new(std::io::stdout()));

    let client = session.client();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            client.shutdown();
        }
    });

    session.run().await
}
