use tracing::Instrument;

use common::logger::{TraceId, init_logger, run_span};
use railway::app::{App, render_trains};
use railway::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_logger("railway", cfg.json_logs);

    let trace_id = TraceId::default();
    async move {
        tracing::info!("Starting railway reservation core...");

        let app = App::start(&cfg).await?;

        let trains = app.allocator.list_trains().await?;
        print!("{}", render_trains(&trains));

        app.shutdown().await;
        anyhow::Ok(())
    }
    .instrument(run_span("railway", &trace_id))
    .await
}
