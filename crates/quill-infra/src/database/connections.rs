use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use super::schema;

/// Configuration for the database pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Create missing tables from the entity definitions after connecting.
    pub create_schema: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 10,
            create_schema: false,
        }
    }
}

/// Database connection handle shared by the SQL repositories.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let posts = SqlPostRepository::new(db.main.clone());
/// ```
pub struct DatabaseConnections {
    /// Primary database - every repository runs against this pool.
    pub main: DbConn,
}

impl DatabaseConnections {
    /// Open the pool and, if configured, bootstrap the schema.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(
            "Database connected (pool: {})",
            config.max_connections
        );

        if config.create_schema {
            schema::create_tables(&main).await?;
        }

        Ok(Self { main })
    }
}
