//! On-disk token cache
//!
//! A single JSON file (`auth.json`) in the application home directory holds
//! the current token. Writes replace the whole file via temp-file + rename
//! so a crash never leaves a half-written token behind. The temp file is
//! created 0600 up front and the directory 0700; both hold OAuth credentials.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::constants::TOKEN_CACHE_FILE;
use crate::error::{Error, Result};
use crate::token::Token;

/// Location of the cached token.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache file inside `home_dir`, creating the directory (0700) if needed.
    pub async fn in_dir(home_dir: &Path) -> Result<Self> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);
        builder.create(home_dir).await.map_err(|e| {
            Error::Io(format!(
                "creating token cache directory {}: {e}",
                home_dir.display()
            ))
        })?;

        Ok(Self::at(home_dir.join(TOKEN_CACHE_FILE)))
    }

    /// Cache at an explicit file path. The parent directory must exist.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token. A missing file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<Token>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cached token");
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(format!("reading token cache: {e}"))),
        };

        let token: Token = serde_json::from_str(&contents)
            .map_err(|e| Error::CredentialParse(format!("parsing token cache: {e}")))?;
        debug!(path = %self.path.display(), "loaded cached token");
        Ok(Some(token))
    }

    /// Persist `token`, replacing any previous cache contents.
    pub async fn save(&self, token: &Token) -> Result<()> {
        info!(path = %self.path.display(), "saving credential file");
        write_atomic(&self.path, token).await
    }

    /// Remove the cache file so the next start re-authorizes.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "removed cached token");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(format!("removing token cache: {e}"))),
        }
    }
}

/// Write the token to a temp file beside `path` (0600), then rename over it.
///
/// The temp file is removed again if anything fails after it was created.
async fn write_atomic(path: &Path, token: &Token) -> Result<()> {
    let json = serde_json::to_string_pretty(token)
        .map_err(|e| Error::CredentialParse(format!("serializing token: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("token cache path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".{TOKEN_CACHE_FILE}.tmp.{}", std::process::id()));

    // Left over from a crashed write; create_new would refuse it
    match tokio::fs::remove_file(&tmp_path).await {
        Ok(()) => debug!(path = %tmp_path.display(), "removed stale temp token file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::Io(format!("removing stale temp token file: {e}"))),
    }

    let result = async {
        write_private(&tmp_path, json.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| Error::Io(format!("renaming temp token file: {e}")))
    }
    .await;

    if let Err(e) = result {
        discard_temp(&tmp_path).await;
        return Err(e);
    }

    debug!(path = %path.display(), "persisted token");
    Ok(())
}

/// Create `path` owner-only and write `contents` to disk.
///
/// The mode is applied at creation, so the file is never readable by
/// anyone else, whatever the umask or directory permissions are.
async fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .map_err(|e| Error::Io(format!("creating temp token file: {e}")))?;
    file.write_all(contents)
        .await
        .map_err(|e| Error::Io(format!("writing temp token file: {e}")))?;
    file.sync_all()
        .await
        .map_err(|e| Error::Io(format!("syncing temp token file: {e}")))?;
    Ok(())
}

async fn discard_temp(tmp_path: &Path) {
    match tokio::fs::remove_file(tmp_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %tmp_path.display(), error = %e, "failed to remove temp token file");
        }
    }
}
