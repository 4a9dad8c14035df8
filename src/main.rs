use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use codetally::config::{AppConfig, ColorTable};
use codetally::services::summary::PgSummaryLoader;
use codetally::services::users::PgPrincipalStore;
use codetally::templates::{ReloadPolicy, TemplateRegistry};
use codetally::AppState;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codetally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let colors = ColorTable::load(&config.colors_path)?;
    let templates =
        TemplateRegistry::load(&config.templates_dir, ReloadPolicy::from(config.run_mode))?;

    let pool = codetally::db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    codetally::db::run_migrations(&pool).await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid BACKEND_HOST/BACKEND_PORT")?;
    let tls = config.tls.clone();

    let state = AppState {
        config,
        colors: Arc::new(colors),
        templates: Arc::new(templates),
        summaries: Arc::new(PgSummaryLoader::new(pool.clone())),
        principals: Arc::new(PgPrincipalStore::new(pool)),
    };
    tracing::info!(
        host = %addr,
        base_path = %state.config.base_path,
        dev = state.config.is_dev(),
        tls = tls.is_some(),
        "Starting codetally server"
    );

    let app = codetally::routes::router(state);

    match tls {
        Some(tls) => {
            rustls::crypto::aws_lc_rs::default_provider()
                .install_default()
                .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;
            let rustls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await
                    .context("Failed to load TLS certificate")?;
            axum_server::bind_rustls(addr, rustls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
