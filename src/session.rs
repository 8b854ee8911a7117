//! Session cookie persistence.
//!
//! The session token issued by the SysAid login endpoint is a set of
//! cookies. To stay under the service's strict login-rate limit (two
//! attempts per five-minute window per account), the cookies are cached
//! in a per-username JSON file and reused across client constructions.
//!
//! The file holds a single JSON object mapping cookie names to values.
//! It is overwritten in full on every successful (re-)login so the
//! on-disk state always matches the in-memory state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SysaidError;

/// On-disk cache of the session cookies for one account.
///
/// A missing or malformed file is a cache miss, not an error: the client
/// logs in again and the next write replaces the file.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    cookies: BTreeMap<String, String>,
}

impl SessionStore {
    /// Opens the store at `path`, loading any previously persisted cookies.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::SessionStore` only for I/O failures other
    /// than the file not existing. A file that exists but does not parse
    /// is treated as absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SysaidError> {
        let path = path.into();
        let cookies = Self::load(&path)?.unwrap_or_default();
        Ok(Self { path, cookies })
    }

    /// Reads and parses the cookie file.
    fn load(path: &Path) -> Result<Option<BTreeMap<String, String>>, SysaidError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SysaidError::session_store(path, e)),
        };

        match serde_json::from_str(&contents) {
            Ok(cookies) => Ok(Some(cookies)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Cookie file is malformed, treating as absent"
                );
                Ok(None)
            }
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if any cookies are held.
    pub fn has_session(&self) -> bool {
        !self.cookies.is_empty()
    }

    /// Renders the stored cookies as a `Cookie` request header value.
    ///
    /// Returns `None` when no session is held.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Replaces the stored cookies and writes them through to disk.
    ///
    /// The parent directory is created if needed; any prior file content
    /// is overwritten.
    pub fn replace(&mut self, cookies: BTreeMap<String, String>) -> Result<(), SysaidError> {
        self.cookies = cookies;
        self.persist()
    }

    /// Drops the in-memory cookies and removes the backing file.
    pub fn clear(&mut self) -> Result<(), SysaidError> {
        self.cookies.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SysaidError::session_store(&self.path, e)),
        }
    }

    fn persist(&self) -> Result<(), SysaidError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                tracing::warn!(dir = %parent.display(), "Cookie directory not found, creating");
                std::fs::create_dir_all(parent)
                    .map_err(|e| SysaidError::session_store(&self.path, e))?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.cookies)?;
        std::fs::write(&self.path, contents)
            .map_err(|e| SysaidError::session_store(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cookies(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("alice_cookies.json")).unwrap();
        assert!(!store.has_session());
        assert_eq!(store.cookie_header(), None);
    }

    #[test]
    fn test_replace_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice_cookies.json");

        let mut store = SessionStore::open(&path).unwrap();
        store
            .replace(cookies(&[("JSESSIONID", "abc123"), ("serverid", "node2")]))
            .unwrap();
        assert!(path.exists());

        let reloaded = SessionStore::open(&path).unwrap();
        assert!(reloaded.has_session());
        assert_eq!(
            reloaded.cookie_header().unwrap(),
            "JSESSIONID=abc123; serverid=node2"
        );
    }

    #[test]
    fn test_replace_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice_cookies.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.replace(cookies(&[("JSESSIONID", "old")])).unwrap();
        store.replace(cookies(&[("JSESSIONID", "new")])).unwrap();

        let reloaded = SessionStore::open(&path).unwrap();
        assert_eq!(reloaded.cookie_header().unwrap(), "JSESSIONID=new");
    }

    #[test]
    fn test_malformed_file_is_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice_cookies.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(!store.has_session());
    }

    #[test]
    fn test_wrong_shape_is_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice_cookies.json");
        std::fs::write(&path, r#"["a", "b"]"#).unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(!store.has_session());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice_cookies.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.replace(cookies(&[("JSESSIONID", "abc")])).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!store.has_session());
        assert!(!path.exists());

        // Clearing again is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn test_persist_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("alice_cookies.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.replace(cookies(&[("JSESSIONID", "abc")])).unwrap();
        assert!(path.exists());
    }
}
