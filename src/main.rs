use anyhow::{Context, Result};
use trigon::AppConfig;

const CONFIG_PATH: &str = "trigon.ron";

fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load_or_default(CONFIG_PATH)
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
    tracing::info!(target: "app", model = %config.assets.model.display(), "starting");

    trigon_view::run(config)
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
