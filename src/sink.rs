use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::info;

use crate::{db, Joke, Result};

/// Where every batch of jokes ends up. Chosen once, when the scraper is built.
#[derive(Debug)]
pub enum Sink {
    Json(JsonSink),
    Table(Connection),
}

/// How consecutive batches are laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonLayout {
    /// Every batch rewrites the same file, the last batch wins.
    #[default]
    Overwrite,
    /// Batch `i` goes to `<stem>_<i>.<ext>` next to the configured path.
    PerBatch,
}

#[derive(Debug, Clone)]
pub struct JsonSink {
    pub path: PathBuf,
    pub layout: JsonLayout,
}

impl JsonSink {
    /// The file batch number `batch_idx` is written to.
    pub fn batch_path(&self, batch_idx: usize) -> PathBuf {
        match self.layout {
            JsonLayout::Overwrite => self.path.clone(),
            JsonLayout::PerBatch => {
                let stem = self
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "jokes".to_string());
                let file_name = match self.path.extension() {
                    Some(ext) => format!("{stem}_{batch_idx}.{}", ext.to_string_lossy()),
                    None => format!("{stem}_{batch_idx}"),
                };
                self.path.with_file_name(file_name)
            }
        }
    }
}

impl Sink {
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Sink::Json(JsonSink {
            path: path.into(),
            layout: JsonLayout::default(),
        })
    }

    pub fn json_per_batch(path: impl Into<PathBuf>) -> Self {
        Sink::Json(JsonSink {
            path: path.into(),
            layout: JsonLayout::PerBatch,
        })
    }

    /// Opens (or creates) the SQLite database at `path` and makes sure the `jokes` table exists.
    pub fn table(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Sink::Table(db::connect(path)?))
    }

    /// Uses an already open connection, creating the `jokes` table if needed.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        db::create_table(&conn)?;
        Ok(Sink::Table(conn))
    }

    /// Persists one whole batch.
    pub async fn persist(&mut self, jokes: &[Joke], batch_idx: usize) -> Result<()> {
        match self {
            Sink::Json(sink) => save_jokes_json(jokes, &sink.batch_path(batch_idx)).await,
            Sink::Table(conn) => {
                info!("save {} jokes to sqlite", jokes.len());
                db::insert_jokes(conn, jokes)?;
                Ok(())
            }
        }
    }
}

/// Writes the jokes as a pretty printed JSON array, replacing whatever was at `path`.
pub async fn save_jokes_json(jokes: &[Joke], path: &Path) -> Result<()> {
    info!("save {} jokes to {}", jokes.len(), path.display());
    let bytes = serde_json::to_vec_pretty(jokes)?;
    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}
