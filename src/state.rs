use crate::config::AppConfig;
use crate::db::PgStore;
use crate::storage::{MemoryStore, SalaryStore, TagStore, TransactionStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub salaries: Arc<dyn SalaryStore>,
    pub tags: Arc<dyn TagStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.database_url.clone() {
            Some(url) => {
                let store = PgStore::connect(&url, &config).await?;
                store.migrate().await?;
                tracing::info!("using postgres store");
                Ok(Self::with_store(config, Arc::new(store)))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; data is kept in memory only");
                Ok(Self::with_store(config, Arc::new(MemoryStore::new())))
            }
        }
    }

    /// One backend serving every store role.
    pub fn with_store<T>(config: Arc<AppConfig>, store: Arc<T>) -> Self
    where
        T: UserStore + TransactionStore + SalaryStore + TagStore + 'static,
    {
        Self {
            config,
            users: store.clone(),
            transactions: store.clone(),
            salaries: store.clone(),
            tags: store,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_secret("test-secret")
    }

    #[cfg(test)]
    pub fn fake_with_secret(secret: &str) -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            db_max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: secret.into(),
                algorithm: jsonwebtoken::Algorithm::HS256,
                issuer: "test-issuer".into(),
                ttl_minutes: 5,
            },
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }
}
