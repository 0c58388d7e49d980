use serde::Deserialize;
use snafu::{Location, ResultExt, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;

/// Persistence operations for the `video` table.
pub mod video;

pub use video::StoreError;

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

const SETUP: &str = include_str!("../../schema.surrealql");

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    Connect {
        url: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid login for database user '{username}' at {location}: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select {namespace}/{database} at {location}: {source}"))]
    SelectDatabase {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to apply the database schema at {location}: {source}"))]
    Schema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "database_url", default = "default_url")]
    pub url: String,
    #[serde(rename = "database_namespace", default = "default_name")]
    pub namespace: String,
    #[serde(rename = "database_name", default = "default_name")]
    pub database: String,
    #[serde(rename = "database_username", default)]
    pub username: Option<String>,
    #[serde(rename = "database_password", default)]
    pub password: Option<String>,
}

fn default_url() -> String {
    "mem://".to_string()
}

fn default_name() -> String {
    "videos".to_string()
}

impl Default for DatabaseConfig {
    /// An in-memory database, discarded when the last handle is dropped.
    fn default() -> Self {
        DatabaseConfig {
            url: default_url(),
            namespace: default_name(),
            database: default_name(),
            username: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    fn credentials(&self) -> Option<impl auth::Credentials<auth::Signin, auth::Jwt> + '_> {
        let username = self.username.as_deref()?;
        let password = self.password.as_deref()?;

        Some(auth::Database {
            namespace: &self.namespace,
            database: &self.database,
            username,
            password,
        })
    }
}

/// Handle to the video store.
///
/// Built once at start-up by [Database::connect] and cloned into every
/// request; all clones share the same connection, which closes when the
/// last one is dropped.
#[derive(Debug, Clone)]
pub struct Database {
    database: Surreal<Any>,
}

impl Database {
    /// Connects to the configured endpoint, signs in when credentials are
    /// present, selects the namespace/database and applies the schema.
    #[tracing::instrument(skip_all, fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(ConnectSnafu {
                url: config.url.clone(),
            })?;

        if let Some(credentials) = config.credentials() {
            database.signin(credentials).await.context(SignInSnafu {
                username: config.username.clone().unwrap_or_default(),
            })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(SelectDatabaseSnafu {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            })?;

        database
            .query(SETUP)
            .await
            .and_then(|response| response.check())
            .context(SchemaSnafu)?;

        tracing::info!(
            namespace = %config.namespace,
            database = %config.database,
            "connected to database"
        );

        Ok(Database { database })
    }
}

impl std::ops::Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}
