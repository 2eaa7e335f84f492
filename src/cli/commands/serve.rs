//! Server and schema commands.

use tokio::runtime::Runtime;

use crate::app;
use crate::config::{PostgresConfig, ServerConfig};

/// Run the HTTP server until SIGINT/SIGTERM
pub fn cmd_serve(
    rt: &Runtime,
    server: &ServerConfig,
    database: &PostgresConfig,
) -> anyhow::Result<()> {
    rt.block_on(app::serve(server, database))?;
    Ok(())
}

/// Apply pending migrations and exit
pub fn cmd_migrate(rt: &Runtime, database: &PostgresConfig) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = app::prepare_database(database).await?;
        pool.close().await;
        println!("Migrations applied from {}", database.migration_source);
        Ok::<_, anyhow::Error>(())
    })
}
