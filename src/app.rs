use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use crate::{
    config::Config,
    domain::events::AppEvent,
    repository::Db,
    routes::{
        auth::{login, register},
        event::stream,
        health,
        referral::refer,
        user::get_user,
    },
};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    db: Db,
    tx: broadcast::Sender<AppEvent>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Db, config: Config) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self { db, tx, config }
    }

    pub fn get_db(&self) -> Db {
        self.db.clone()
    }

    pub fn get_sender(&self) -> broadcast::Sender<AppEvent> {
        self.tx.clone()
    }

    /// Fire-and-forget: no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

pub struct Application;

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<()> {
        Self::setup_tracing(&config.application.debug_mode);

        let app_state = Arc::new(AppState::new(Db::default(), config.clone()));
        let app = Self::router(app_state);

        let ip = config.application.host.parse::<IpAddr>()?;
        let addr = SocketAddr::new(ip, config.application.port);
        tracing::info!("listening on {}", addr);
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }

    pub fn router(app_state: Arc<AppState>) -> Router {
        let cors = CorsLayer::permissive();
        Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/user/:id", get(get_user))
            .route("/api/refer", post(refer))
            .route("/api/stream", get(stream))
            .route("/health", get(health))
            .with_state(app_state)
            .layer(cors)
    }

    fn setup_tracing(debug_mode: &str) {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| debug_mode.into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
