//! Operator commands for single songs.

use tokio::runtime::Runtime;

use crate::app;
use crate::config::{PostgresConfig, ServerConfig};
use crate::service::SongService;

/// Open the database and run `f` against the song service.
fn with_service<F, Fut>(
    rt: &Runtime,
    server: &ServerConfig,
    database: &PostgresConfig,
    f: F,
) -> anyhow::Result<()>
where
    F: FnOnce(SongService) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    rt.block_on(async {
        let pool = app::prepare_database(database).await?;
        let result = f(app::song_service(pool.clone(), server)).await;
        pool.close().await;
        result
    })
}

/// Print a song, including soft-deleted ones
pub fn cmd_show(
    rt: &Runtime,
    server: &ServerConfig,
    database: &PostgresConfig,
    id: &str,
) -> anyhow::Result<()> {
    with_service(rt, server, database, |songs| async move {
        let Some(song) = songs.get_any(id).await? else {
            anyhow::bail!("No song with id {}", id);
        };

        println!("ID:       {}", song.id);
        println!("Title:    {}", song.title);
        println!("Group:    {}", song.group);
        println!("Released: {}", song.release_date.to_rfc3339());
        if let Some(ref link) = song.link {
            println!("Link:     {}", link);
        }
        println!("Created:  {}", song.created_at.to_rfc3339());
        println!("Updated:  {}", song.updated_at.to_rfc3339());
        match song.deleted_at {
            Some(at) => println!("Deleted:  {}", at.to_rfc3339()),
            None => println!("Deleted:  no"),
        }
        if let Some(ref text) = song.text {
            println!();
            println!("{}", text);
        }
        Ok(())
    })
}

/// Restore a soft-deleted song
pub fn cmd_restore(
    rt: &Runtime,
    server: &ServerConfig,
    database: &PostgresConfig,
    id: &str,
) -> anyhow::Result<()> {
    with_service(rt, server, database, |songs| async move {
        songs.restore(id).await?;
        println!("Restored song {}", id);
        Ok(())
    })
}

/// Permanently delete a song
pub fn cmd_purge(
    rt: &Runtime,
    server: &ServerConfig,
    database: &PostgresConfig,
    id: &str,
) -> anyhow::Result<()> {
    with_service(rt, server, database, |songs| async move {
        songs.delete_permanent(id).await?;
        println!("Permanently deleted song {}", id);
        Ok(())
    })
}
