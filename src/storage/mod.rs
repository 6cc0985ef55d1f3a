//! Jailed filesystem access for FTP sessions.
//!
//! Every authenticated session gets a [`Vfs`]: a view of the server's file
//! tree rooted at `<server-root>/<username>`. All client-supplied paths pass
//! through [`Vfs::resolve`] or [`Vfs::resolve_for_create`], which anchor the
//! request inside the jail and canonicalize it against the real filesystem
//! before any operation touches disk. Symlinks pointing out of the jail are
//! caught here, not by string inspection of the request.

mod error;

pub use error::{Error, ErrorKind, Result};

use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};

// Buffered chunk size for file and data-channel streaming.
const COPY_BUF_SIZE: usize = 4096;

/// A per-user jailed filesystem view.
///
/// The `root` is the canonical absolute path of the user's home directory;
/// operations take paths that were previously resolved by this `Vfs` and are
/// therefore guaranteed to live inside it.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: PathBuf,
    username: String,
}

impl Vfs {
    /// Opens the jail for `username` under `server_root`, creating the home
    /// directory on first login.
    pub async fn attach(server_root: &Path, username: &str) -> Result<Vfs> {
        let home = server_root.join(username);
        match tokio::fs::create_dir(&home).await {
            Ok(()) => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    tokio::fs::set_permissions(&home, std::fs::Permissions::from_mode(0o777))
                        .await
                        .map_err(|e| Error::new(ErrorKind::LocalError, e))?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(Error::new(ErrorKind::LocalError, e)),
        }
        let root = tokio::fs::canonicalize(home)
            .await
            .map_err(|e| Error::new(ErrorKind::LocalError, e))?;
        Ok(Vfs {
            root,
            username: username.to_string(),
        })
    }

    /// The canonical absolute path of the jail root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a client-supplied path to a canonical absolute path inside
    /// the jail. The full path must exist; symlinks are followed and the
    /// result is checked against the jail root afterwards.
    ///
    /// A leading `/` in the request is interpreted relative to the jail
    /// root; anything else is relative to `cwd`.
    #[tracing_attributes::instrument]
    pub async fn resolve(&self, cwd: &Path, request: &str) -> Result<PathBuf> {
        let candidate = self.candidate(cwd, request);
        let canonical = tokio::fs::canonicalize(candidate).await.map_err(Error::from)?;
        self.jail_check(canonical)
    }

    /// Like [`Vfs::resolve`], but tolerates a missing trailing component so
    /// that STOR, MKD and RNTO can name files that do not exist yet. The
    /// parent directory must exist and canonicalize into the jail.
    #[tracing_attributes::instrument]
    pub async fn resolve_for_create(&self, cwd: &Path, request: &str) -> Result<PathBuf> {
        let candidate = self.candidate(cwd, request);
        match tokio::fs::canonicalize(&candidate).await {
            Ok(canonical) => self.jail_check(canonical),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The leaf may not exist yet. `file_name` is None for
                // trailing `..`, which can never name a new entry.
                let name = candidate
                    .file_name()
                    .ok_or_else(|| Error::from(ErrorKind::SandboxViolation))?
                    .to_os_string();
                let parent = candidate
                    .parent()
                    .ok_or_else(|| Error::from(ErrorKind::SandboxViolation))?;
                let parent = tokio::fs::canonicalize(parent).await.map_err(Error::from)?;
                self.jail_check(parent.join(name))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn candidate(&self, cwd: &Path, request: &str) -> PathBuf {
        if let Some(stripped) = request.strip_prefix('/') {
            self.root.join(stripped)
        } else {
            cwd.join(request)
        }
    }

    fn jail_check(&self, canonical: PathBuf) -> Result<PathBuf> {
        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            Err(Error::from(ErrorKind::SandboxViolation))
        }
    }

    /// Renders a resolved path the way clients see it: relative to the jail
    /// root, rooted at `/<username>`.
    pub fn display_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        if rel.as_os_str().is_empty() {
            format!("/{}", self.username)
        } else {
            format!("/{}/{}", self.username, rel.display())
        }
    }

    /// Metadata for a resolved path.
    pub async fn metadata(&self, path: &Path) -> Result<std::fs::Metadata> {
        tokio::fs::metadata(path).await.map_err(Error::from)
    }

    /// The names of the entries of a resolved directory, sorted, with
    /// dot-prefixed entries excluded.
    #[tracing_attributes::instrument]
    pub async fn list_names(&self, dir: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir).await.map_err(Error::from)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(Error::from)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Opens a resolved path for buffered binary reading.
    pub async fn open_read(
        &self,
        path: &Path,
    ) -> Result<tokio::io::BufReader<tokio::fs::File>> {
        let file = tokio::fs::File::open(path).await.map_err(Error::from)?;
        Ok(tokio::io::BufReader::with_capacity(COPY_BUF_SIZE, file))
    }

    /// Streams `data` into the file named by the resolved path `dest`.
    ///
    /// The bytes are first written to a `tmp_<unix-seconds>_<name>` sibling;
    /// only a fully received stream is renamed over `dest`, so a partial
    /// upload is never observable under the final name. On any failure the
    /// temp file is removed.
    #[tracing_attributes::instrument(skip(data))]
    pub async fn store<R>(&self, dest: &Path, data: R) -> Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let dir = dest.parent().ok_or_else(|| Error::from(ErrorKind::LocalError))?;
        let name = dest
            .file_name()
            .ok_or_else(|| Error::from(ErrorKind::LocalError))?
            .to_string_lossy()
            .into_owned();
        let tmp = dir.join(format!("tmp_{}_{}", chrono::Utc::now().timestamp(), name));

        let mut file = tokio::fs::File::create(&tmp).await.map_err(Error::from)?;
        let mut reader = tokio::io::BufReader::with_capacity(COPY_BUF_SIZE, data);
        let copied = async {
            let bytes = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            Ok::<u64, std::io::Error>(bytes)
        }
        .await;

        match copied {
            Ok(bytes) => match tokio::fs::rename(&tmp, dest).await {
                Ok(()) => Ok(bytes),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&tmp).await;
                    Err(Error::from(e))
                }
            },
            Err(e) => {
                let _ = tokio::fs::remove_file(&tmp).await;
                Err(Error::from(e))
            }
        }
    }

    /// Creates a directory at the resolved path.
    pub async fn mkd(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir(path).await.map_err(Error::from)
    }

    /// Removes the directory at the resolved path.
    pub async fn rmd(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir(path).await.map_err(Error::from)
    }

    /// Removes the regular file at the resolved path.
    pub async fn del(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path).await.map_err(Error::from)
    }

    /// Renames `from` to `to`; both are resolved paths.
    pub async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await.map_err(Error::from)
    }
}
