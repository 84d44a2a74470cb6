use crate::{AuthError, Result as AuthErrorResult};

use std::fs;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use error_location::ErrorLocation;
use log::{debug, info};

/// Well-known key the credential token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Local persistence for the single credential token.
pub trait TokenStore: Send + Sync {
    /// Returns `None` when nothing has been persisted.
    fn load(&self) -> AuthErrorResult<Option<String>>;
    fn save(&self, token: &str) -> AuthErrorResult<()>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> AuthErrorResult<()>;
}

/// Token persisted as a plain file, written atomically.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under [`TOKEN_KEY`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TOKEN_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn write_error(path: PathBuf, source: std::io::Error) -> AuthError {
        AuthError::StorageWrite {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    fn open_temp(path: &Path) -> std::io::Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        options.open(path)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AuthErrorResult<Option<String>> {
        if !self.path.exists() {
            debug!("No persisted token at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| AuthError::StorageRead {
            path: self.path.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let token = contents.trim();
        if token.is_empty() {
            return Ok(None);
        }

        Ok(Some(token.to_string()))
    }

    /// Write to a temp file, fsync, then rename over the final path so a
    /// crash mid-write never leaves a truncated token behind.
    fn save(&self, token: &str) -> AuthErrorResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| Self::write_error(dir.to_path_buf(), e))?;
        }

        let temp_path = self
            .path
            .with_extension(format!("tmp.{}", std::process::id()));

        {
            let mut file =
                Self::open_temp(&temp_path).map_err(|e| Self::write_error(temp_path.clone(), e))?;

            file.write_all(token.as_bytes())
                .map_err(|e| Self::write_error(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| Self::write_error(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Self::write_error(self.path.clone(), e)
        })?;

        info!("Persisted credential token to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> AuthErrorResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed persisted token at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::write_error(self.path.clone(), e)),
        }
    }
}

/// In-process token slot for tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AuthErrorResult<Option<String>> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> AuthErrorResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AuthErrorResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}
