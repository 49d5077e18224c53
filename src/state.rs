use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to Postgres. Returns the concrete store too so `main` can run migrations on it.
    pub async fn init() -> anyhow::Result<(Self, PgUserStore)> {
        let config = Arc::new(AppConfig::from_env()?);
        let pg = PgUserStore::connect(&config.database_url, config.max_connections).await?;
        let store = Arc::new(pg.clone()) as Arc<dyn UserStore>;
        Ok((Self { store, config }, pg))
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::repo::MemoryUserStore;

        let config = Arc::new(AppConfig {
            database_url: "postgres://localhost/auth".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
        });
        let store = Arc::new(MemoryUserStore::default()) as Arc<dyn UserStore>;
        Self { store, config }
    }
}
