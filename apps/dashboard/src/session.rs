//! Dashboard session: the stream client plus the chart state it feeds.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use partcount_charts::{ChartReconciler, RenderSink};
use partcount_stream::{ConnectionState, StreamClient, StreamEvent};

/// Everything that lives for the lifetime of the dashboard.
///
/// Built once at startup. The reconciler is owned here and only touched by
/// the session loop, one event at a time.
pub struct Session<S> {
    client: Arc<StreamClient>,
    reconciler: ChartReconciler<S>,
}

impl<S: RenderSink> Session<S> {
    pub fn new(client: StreamClient, sink: S) -> Self {
        Self {
            client: Arc::new(client),
            reconciler: ChartReconciler::new(sink),
        }
    }

    /// Handle for stopping the client from elsewhere (e.g. a signal task).
    pub fn client(&self) -> Arc<StreamClient> {
        self.client.clone()
    }

    pub fn reconciler(&self) -> &ChartReconciler<S> {
        &self.reconciler
    }

    /// Runs the client and applies its events until the client shuts down.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut events = self
            .client
            .take_events()
            .await
            .context("session already running")?;

        let client = self.client.clone();
        let mut runner = tokio::spawn(async move { client.run().await });

        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
                joined = &mut runner => {
                    joined.context("stream client task failed")?;
                    while let Ok(event) = events.try_recv() {
                        self.apply(event);
                    }
                    break;
                }
            }
        }

        info!(state = ?self.client.state(), "session finished");
        Ok(())
    }

    /// Applies one client event.
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Measurement(frame) => {
                debug!(event = ?frame.event, captured_at = ?frame.captured_at, "measurement");
                self.reconciler.handle_frame(&frame);
            }
            StreamEvent::StateChanged(ConnectionState::Open) => {
                info!(endpoint = %self.client.endpoint(), "station connected");
            }
            StreamEvent::StateChanged(ConnectionState::Closed) => {
                warn!(endpoint = %self.client.endpoint(), "station connection closed");
            }
            StreamEvent::StateChanged(ConnectionState::Connecting) => {
                debug!(endpoint = %self.client.endpoint(), "connecting");
            }
            StreamEvent::Reconnecting { attempt, delay } => {
                debug!(attempt, delay_ms = delay.as_millis() as u64, "reconnect scheduled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::SinkExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    use partcount_charts::palette;
    use partcount_protocol::decode_frame;
    use partcount_stream::ReconnectConfig;

    use super::*;
    use crate::render::TerminalSink;

    fn session(endpoint: &str) -> Session<TerminalSink<Vec<u8>>> {
        let client =
            StreamClient::new(endpoint, ReconnectConfig::with_delay(Duration::from_millis(50)))
                .unwrap();
        Session::new(client, TerminalSink::new(Vec::new()))
    }

    #[test]
    fn apply_routes_measurements_to_charts() {
        let mut s = session("ws://127.0.0.1:1");
        for text in [
            r#"{"tipo":"Grande","quantidade":3}"#,
            r#"{"tipo":"Media","quantidade":5}"#,
            r#"{"tipo":"Grande","quantidade":7}"#,
            r#"{"contagem":12}"#,
            r#"{"contagem":0}"#,
        ] {
            s.apply(StreamEvent::Measurement(decode_frame(text).unwrap()));
        }
        s.apply(StreamEvent::StateChanged(ConnectionState::Closed));

        let charts = s.reconciler();
        assert_eq!(charts.categories().labels(), vec!["Grande", "Media"]);
        assert_eq!(charts.categories().values(), vec![7.0, 5.0]);
        assert_eq!(
            charts.categories().colors(),
            vec![palette::LARGE, palette::MEDIUM]
        );
        assert_eq!(charts.scalar().value(), 0.0);
    }

    #[tokio::test]
    async fn run_applies_station_frames_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let mut s = session(&url);
        let client = s.client();

        let station = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            for text in [
                r#"{"tipo":"Grande","quantidade":3,"data":"07/11/2025","hora":"09:15:00"}"#,
                "not-json",
                r#"{"tipo":"Media","quantidade":5}"#,
                r#"{"contagem":4}"#,
            ] {
                ws.send(Message::Text(text.into())).await.unwrap();
            }
            // Hold the socket open until the dashboard goes away.
            tokio::time::sleep(Duration::from_millis(500)).await;
            client.shutdown();
            ws
        });

        tokio::time::timeout(Duration::from_secs(5), s.run())
            .await
            .expect("session stops after shutdown")
            .unwrap();
        let _ = station.await;

        let charts = s.reconciler();
        assert_eq!(charts.categories().labels(), vec!["Grande", "Media"]);
        assert_eq!(charts.scalar().value(), 4.0);
        assert!(charts.category_updated_at().is_some());

        let drawn = String::from_utf8(charts.sink().get_ref().clone()).unwrap();
        assert!(drawn.contains("Quantidade de Peças"));
        assert!(drawn.contains("Encoder"));
        assert!(drawn.contains("Quantidade de Peças  [07/11/2025 09:15:00]"));
        assert!(drawn.contains("(#0077ff)"));
    }

    #[tokio::test]
    async fn run_twice_is_an_error() {
        let mut s = session("ws://127.0.0.1:1");
        let client = s.client();
        client.shutdown();
        s.run().await.unwrap();
        assert!(s.run().await.is_err());
    }
}
