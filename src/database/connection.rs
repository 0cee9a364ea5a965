use mongodb::bson::doc;
use mongodb::{Client, Database};

use crate::config::AppConfig;

/// One client per process, acquired at startup and held in `AppState`
/// for the lifetime of the server.
pub async fn connect(config: &AppConfig) -> Database {
    let client = Client::with_uri_str(&config.database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(&config.database_name);

    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => tracing::info!("Connected to database: {}", config.database_name),
        Err(e) => tracing::warn!(
            "Database '{}' may be inaccessible: {}",
            config.database_name,
            e
        ),
    }

    db
}
