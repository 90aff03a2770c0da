use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{http::Method, Router};
use camino::Utf8PathBuf as PathBuf;
use clap::Parser;
use eyre::{Context, Result};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

use app_core::{
    auth::IdentityToolkit,
    config::{read_config, Config},
    image::ImgbbHost,
    store::FirestoreStore,
};
use wayfarer::{
    app_state::{AppState, SharedState},
    routes,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: String,
}

fn app_state(config: &Config) -> SharedState {
    let store = FirestoreStore::new(
        config.store.base_url.clone(),
        config.store.project_id.clone(),
        config.store.api_key.clone(),
    );
    let images = ImgbbHost::new(
        config.image_host.base_url.clone(),
        config.image_host.api_key.clone(),
    );
    let identity = IdentityToolkit::new(config.auth.base_url.clone(), config.auth.api_key.clone());
    Arc::new(AppState {
        store: Arc::new(store),
        images: Arc::new(images),
        identity: Arc::new(identity),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1")
    }
    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "1");
    }
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_env("WAYFARER_LOG"))
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = PathBuf::from(args.config);
    let config = read_config(&config_path).await?;

    let addr: IpAddr = config
        .address
        .as_ref()
        .map(|a| a.parse().wrap_err("error parsing listening address"))
        .transpose()?
        .unwrap_or("127.0.0.1".parse().expect("is a valid address"));
    let port = config.port.unwrap_or(3000);

    info!("Starting up...");
    let shared_state = app_state(&config);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);
    let mut app = Router::new()
        .nest("/api/entries", routes::entries::router())
        .nest("/api/dashboard", routes::dashboard::router())
        .nest("/api/map", routes::map::router());
    if let Some(static_dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir.as_std_path()));
    }
    let app = app
        .layer(
            ServiceBuilder::new().set_x_request_id(MakeRequestUuid).layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            ),
        )
        .layer(cors)
        .with_state(shared_state);
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(addr, port))
        .await
        .wrap_err("Error binding socket")?;
    info!("Listening on {}:{}", addr, port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;
    info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("Unable to listen for shutdown signal: {}", err);
            std::process::exit(1);
            // we also shut down in case of error
        }
    }
}
