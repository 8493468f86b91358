use common::prelude::{ContentId, FreshnessPolicy, Registry};
use url::Url;

use crate::config::Config;
use crate::database::{Database, DatabaseSetupError};

#[derive(Clone)]
pub struct ServiceState {
    database: Database,
    registry: Registry<Database>,
    public_url: Url,
}

impl ServiceState {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database_url = match &config.sqlite_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .map_err(StateSetupError::DatabaseDirectory)?;
                    }
                }

                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(StateSetupError::BadDatabaseUrl)?
            }
            None => {
                tracing::warn!("no sqlite path configured, registrations will not survive a restart");
                Url::parse("sqlite::memory:").map_err(StateSetupError::BadDatabaseUrl)?
            }
        };

        let database = Database::connect(&database_url).await?;

        let policy = FreshnessPolicy {
            touch_interval: config.touch_interval,
            expiry_interval: config.expiry_interval,
        };
        let registry = Registry::new(database.clone(), policy);

        let public_url = match &config.public_url {
            Some(url) => url.clone(),
            None => Url::parse(&format!("http://localhost:{}/", config.listen_addr.port()))
                .map_err(StateSetupError::BadPublicUrl)?,
        };

        Ok(Self {
            database,
            registry,
            public_url,
        })
    }

    pub fn database(&self) -> Database {
        self.database.clone()
    }

    pub fn registry(&self) -> &Registry<Database> {
        &self.registry
    }

    /// Base URL this instance is reachable under, as seen by clients.
    pub fn public_url(&self) -> &Url {
        &self.public_url
    }

    /// Fully qualified client id URL for a registered document.
    pub fn client_id_url(&self, id: &ContentId) -> Url {
        self.public_url
            .join(&format!("/clients/{id}"))
            .expect("client paths join onto any base url")
    }
}

impl axum::extract::FromRef<ServiceState> for Database {
    fn from_ref(state: &ServiceState) -> Self {
        state.database()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to prepare the database directory: {0}")]
    DatabaseDirectory(std::io::Error),

    #[error("constructed an invalid database url: {0}")]
    BadDatabaseUrl(url::ParseError),

    #[error("failed to set up the database: {0}")]
    DatabaseSetup(#[from] DatabaseSetupError),

    #[error("constructed an invalid public url: {0}")]
    BadPublicUrl(url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_state() -> ServiceState {
        ServiceState::from_config(&Config::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_client_id_url_targets_the_clients_route() {
        let state = memory_state().await;
        let id = ContentId::derive(b"\xa0");

        let url = state.client_id_url(&id);
        assert_eq!(url.as_str(), format!("http://localhost:3000/clients/{id}"));
    }

    #[tokio::test]
    async fn test_configured_public_url_wins() {
        let config = Config {
            public_url: Some(Url::parse("https://cimd.example.com/").unwrap()),
            ..Config::default()
        };
        let state = ServiceState::from_config(&config).await.unwrap();

        let id = ContentId::derive(b"\xa0");
        assert!(state
            .client_id_url(&id)
            .as_str()
            .starts_with("https://cimd.example.com/clients/"));
    }

    #[tokio::test]
    async fn test_sqlite_path_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            sqlite_path: Some(dir.path().join("nested/registry.db")),
            ..Config::default()
        };

        let state = ServiceState::from_config(&config).await.unwrap();
        assert!(dir.path().join("nested").is_dir());
        drop(state);
    }
}
