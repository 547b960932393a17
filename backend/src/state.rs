use crate::config::Config;
use axum::extract::FromRef;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Shared state handed to every handler. Handlers extract the piece they need
/// (`State<PgPool>` or `State<Config>`) through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self { pool, config }
    }

    /// Builds state whose pool only connects on first use. Routes rejected
    /// before touching the database never open a connection.
    pub fn connect_lazy(config: Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(&config.database_url)?;
        Ok(Self::new(pool, config))
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
