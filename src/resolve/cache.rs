use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use crate::resolve::error::StoreError;
use crate::resolve::types::{Flavour, ResolutionOutcome};

/// A stored download URL for one (flavour, version) key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub flavour: Flavour,
    pub version: String,
    pub url: String,
}

/// Read side of the download store, used on the request path
///
/// Every lookup opens its own read-only connection and closes it before
/// returning, so no connection state is shared between requests.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    path: PathBuf,
}

impl CacheLookup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Look up the stored URL for `flavour`/`version`
    ///
    /// A missing key is `NotFound`. A store that cannot be opened is an
    /// `UpstreamError` carrying [`StoreError::Unavailable`].
    pub async fn lookup(&self, flavour: Flavour, version: &str) -> ResolutionOutcome {
        let path = self.path.clone();
        let version = version.to_string();

        let result =
            tokio::task::spawn_blocking(move || Self::read(&path, flavour, &version)).await;

        match result {
            Ok(Ok(Some(url))) => ResolutionOutcome::found(&url),
            Ok(Ok(None)) => ResolutionOutcome::NotFound,
            Ok(Err(e)) => e.into(),
            Err(e) => StoreError::Join(e).into(),
        }
    }

    fn read(path: &Path, flavour: Flavour, version: &str) -> Result<Option<String>, StoreError> {
        // Dropped at the end of this call on every path
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

        let url = conn
            .query_row(
                "SELECT url FROM downloads WHERE flavour = ?1 AND version = ?2",
                (flavour.as_str(), version),
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        debug!(
            "Store lookup {}/{}: {}",
            flavour,
            version,
            if url.is_some() { "hit" } else { "miss" }
        );
        Ok(url)
    }
}

/// Write side of the download store
///
/// Entries are written out-of-band (from the CLI), never by request handling.
pub struct DownloadStore {
    conn: Connection,
}

impl DownloadStore {
    /// Open or create the store at `path` and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening download store at {:?}", path);

        // Rollback journal rather than WAL: readers open the file read-only
        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS downloads (
                flavour TEXT NOT NULL,
                version TEXT NOT NULL,
                url TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (flavour, version)
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }

    /// Insert or replace the URL stored for `flavour`/`version`
    pub fn put(&self, flavour: Flavour, version: &str, url: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO downloads (flavour, version, url, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(flavour, version) DO UPDATE SET
                url = excluded.url,
                updated_at = excluded.updated_at
            "#,
            (flavour.as_str(), version, url, Self::current_timestamp_ms()),
        )?;

        debug!("Stored {}/{} -> {}", flavour, version, url);
        Ok(())
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&self, flavour: Flavour, version: &str) -> Result<bool, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM downloads WHERE flavour = ?1 AND version = ?2",
            (flavour.as_str(), version),
        )?;
        Ok(removed > 0)
    }

    /// All entries ordered by flavour then version
    pub fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT flavour, version, url FROM downloads ORDER BY flavour, version")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let entries = rows
            .into_iter()
            .filter_map(|(flavour, version, url)| match flavour.parse() {
                Ok(flavour) => Some(CacheEntry {
                    flavour,
                    version,
                    url,
                }),
                Err(()) => {
                    warn!("Skipping entry with unknown flavour {:?}", flavour);
                    None
                }
            })
            .collect();

        Ok(entries)
    }
}
