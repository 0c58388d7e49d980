use derive_new::new;

use crate::database::{Database, DatabaseConfig, DatabaseError};

/// Shared state handed to every request handler.
#[derive(Debug, Clone, new)]
pub struct App {
    pub database: Database,
}

impl<'a> From<&'a App> for &'a Database {
    fn from(app: &'a App) -> Self {
        &app.database
    }
}

pub async fn create_app(config: &DatabaseConfig) -> Result<App, DatabaseError> {
    let database = Database::connect(config).await?;
    Ok(App::new(database))
}
