//! Output path resolution and PNG persistence
//!
//! Generated images go to a caller-chosen path or to a timestamped file in
//! the default directory (`$LGTM_OUTPUT_DIR`, else `~/Downloads`, else
//! `$TEMP_DIR/lgtm-dog-mcp`). Files are kept; nothing here deletes them.
//!
//! # Examples
//!
//! ```
//! use lgtm_dog_mcp::util::output::OutputWriter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let writer = OutputWriter::new(dir.path());
//!
//!     let written = writer.write_png(&[137, 80, 78, 71], None).await.unwrap();
//!     assert!(written.path.starts_with(dir.path()));
//!     assert_eq!(written.size, 4);
//! }
//! ```

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    constants,
    error::{LgtmError, LgtmResult},
};

/// Attempts at finding a free default file name before giving up
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// A file written by [`OutputWriter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Where the file was written
    pub path: PathBuf,
    /// Number of bytes written
    pub size: u64,
}

/// Writes generated PNGs to disk
#[derive(Debug, Clone)]
pub struct OutputWriter {
    /// Directory for generated file names
    default_dir: PathBuf,
    /// Home directory used for `~/` expansion
    home_dir:    Option<PathBuf>,
}

impl OutputWriter {
    /// Creates a writer that stores generated names in `default_dir`
    ///
    /// `~/` in requested paths expands using `$HOME`.
    pub fn new(default_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_dir: default_dir.into(),
            home_dir:    home_dir(),
        }
    }

    /// Creates a writer using the `LGTM_OUTPUT_DIR`/`~/Downloads`/temp
    /// fallback chain for its default directory
    pub fn from_env() -> Self {
        let home = home_dir();
        let default_dir = constants::output_dir_override()
            .map(|dir| expand_home(&dir.to_string_lossy(), home.as_deref()))
            .or_else(|| home.as_ref().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| std::env::temp_dir().join("lgtm-dog-mcp"));

        Self {
            default_dir,
            home_dir: home,
        }
    }

    /// Overrides the home directory used for `~/` expansion
    pub fn with_home_dir(mut self, home: Option<PathBuf>) -> Self {
        self.home_dir = home;
        self
    }

    /// Directory used when no path is requested
    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    /// Resolves a caller-supplied path
    ///
    /// `~/` expands to the home directory; relative paths are taken relative
    /// to the default directory, since the server's working directory is
    /// whatever the MCP client launched it from.
    pub fn resolve_requested(&self, requested: &str) -> PathBuf {
        let expanded = expand_home(requested.trim(), self.home_dir.as_deref());
        if expanded.is_absolute() {
            expanded
        } else {
            self.default_dir.join(expanded)
        }
    }

    /// Path for a generated name, with an optional `-N` collision suffix
    pub fn generated_path(&self, millis: i64, suffix: u32) -> PathBuf {
        let name = if suffix == 0 {
            format!("{}-{}.png", constants::OUTPUT_FILE_PREFIX, millis)
        } else {
            format!("{}-{}-{}.png", constants::OUTPUT_FILE_PREFIX, millis, suffix)
        };
        self.default_dir.join(name)
    }

    /// Writes `png` to the requested path, or to a fresh generated name
    ///
    /// Parent directories are created as needed. A requested path is
    /// overwritten if it exists; a generated name never overwrites.
    pub async fn write_png(&self, png: &[u8], requested: Option<&str>) -> LgtmResult<WrittenFile> {
        let path = match requested.map(str::trim).filter(|path| !path.is_empty()) {
            Some(requested) => {
                let path = self.resolve_requested(requested);
                ensure_parent(&path).await?;
                fs::write(&path, png).await.map_err(|source| LgtmError::Output {
                    path: path.clone(),
                    source,
                })?;
                path
            }
            None => self.write_generated(png).await?,
        };

        info!("Wrote {} bytes to {}", png.len(), path.display());
        Ok(WrittenFile {
            path,
            size: png.len() as u64,
        })
    }

    async fn write_generated(&self, png: &[u8]) -> LgtmResult<PathBuf> {
        fs::create_dir_all(&self.default_dir)
            .await
            .map_err(|source| LgtmError::Output {
                path: self.default_dir.clone(),
                source,
            })?;

        let millis = Utc::now().timestamp_millis();
        for suffix in 0..MAX_NAME_ATTEMPTS {
            let path = self.generated_path(millis, suffix);
            let open = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match open {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next suffix", path.display());
                    continue;
                }
                Err(source) => return Err(LgtmError::Output { path, source }),
            };

            let written = async {
                file.write_all(png).await?;
                file.flush().await
            }
            .await;
            return match written {
                Ok(()) => Ok(path),
                Err(source) => Err(LgtmError::Output { path, source }),
            };
        }

        Err(LgtmError::Output {
            path:   self.generated_path(millis, MAX_NAME_ATTEMPTS),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "no free file name for generated output",
            ),
        })
    }
}

async fn ensure_parent(path: &Path) -> LgtmResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| LgtmError::Output {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"].iter().find_map(|var| {
        std::env::var(var).ok().and_then(|home| {
            let home = home.trim();
            if home.is_empty() {
                None
            } else {
                Some(PathBuf::from(home))
            }
        })
    })
}

fn expand_home(value: &str, home: Option<&Path>) -> PathBuf {
    match (value, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (value, Some(home)) if value.starts_with("~/") => home.join(&value[2..]),
        (value, _) => PathBuf::from(value),
    }
}
