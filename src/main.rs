use anyhow::Context;
use clap::Parser;
use scholarboard::{
    Dashboard, DashboardConfig, EmbeddedStore, HttpServer, MongoStore, MySqlStore, Neo4jStore,
    RankRange, RefreshTask,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scholarboard", version, about = "Research dashboard API server")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "SCHOLARBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Serve an in-memory JSON dataset instead of connecting to the stores
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Disable the periodic ranking refresh
    #[arg(long)]
    no_refresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = DashboardConfig::load(args.config.as_deref()).context("loading configuration")?;

    info!("Scholarboard v{}", scholarboard::version());

    let dashboard = match &args.dataset {
        Some(path) => {
            let store = EmbeddedStore::from_json_file(path)
                .with_context(|| format!("loading dataset {}", path.display()))?;
            info!("Serving embedded dataset {}", path.display());
            Dashboard::embedded(store)
        }
        None => {
            let relational = MySqlStore::new(&config.mysql);
            let graph = Neo4jStore::new(config.neo4j.clone());
            let documents = MongoStore::connect(&config.mongo)
                .await
                .context("creating MongoDB client")?;
            Dashboard::new(Arc::new(relational), Arc::new(graph), Arc::new(documents))
        }
    };

    let refresh = (!args.no_refresh).then(|| {
        Arc::new(RefreshTask::spawn(
            dashboard.clone(),
            RankRange::default(),
            config.refresh_interval(),
        ))
    });

    let server = HttpServer::new(dashboard, refresh, config.server.clone());
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))?;

    Ok(())
}
