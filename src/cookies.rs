//! Cookie persistence for the `json` strategy: a flat JSON array of cookie
//! records in the config dir, read at window construction and written back
//! at window close. The `engine` strategy never touches this module.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie file {} is corrupt: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cookie {name:?} holds non-ascii text")]
    NonAscii { name: String },
    #[error("could not serialize cookies: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// One cookie as the session sees it. `expires == None` marks a session
/// cookie, which is valid until the window closes and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub expires: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
}

impl CookieRecord {
    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }
}

/// On-disk shape. Persisted records always carry an expiration; session
/// cookies are filtered out before they get here.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersistedCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    expires_unix_secs: i64,
}

fn ascii_checked(record: &CookieRecord) -> Result<(), CookieError> {
    if record.name.is_ascii() && record.value.is_ascii() {
        Ok(())
    } else {
        Err(CookieError::NonAscii {
            name: record.name.clone(),
        })
    }
}

/// Serialize `cookies` to the persisted JSON form. Session cookies are
/// skipped. A record with non-ascii name or value fails on its own: it is
/// dropped with a warning and the rest of the batch still saves.
pub fn encode(cookies: &[CookieRecord]) -> serde_json::Result<String> {
    let persisted: Vec<PersistedCookie> = cookies
        .iter()
        .filter_map(|c| {
            let expires = c.expires?;
            if let Err(err) = ascii_checked(c) {
                warn!(%err, "skipping cookie record");
                return None;
            }
            Some(PersistedCookie {
                name: c.name.clone(),
                value: c.value.clone(),
                domain: c.domain.clone(),
                path: c.path.clone(),
                secure: c.secure,
                http_only: c.http_only,
                expires_unix_secs: expires.unix_timestamp(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&persisted)
}

/// Parse the persisted JSON form, dropping records that expired before
/// `now`. A record expiring exactly at `now` is still restored. Expired or
/// non-ascii records are simply forgotten, not errors.
pub fn decode_at(raw: &str, now: OffsetDateTime) -> serde_json::Result<Vec<CookieRecord>> {
    let persisted: Vec<PersistedCookie> = serde_json::from_str(raw)?;
    let cookies = persisted
        .into_iter()
        .filter_map(|p| {
            let expires = OffsetDateTime::from_unix_timestamp(p.expires_unix_secs).ok()?;
            if expires < now {
                return None;
            }
            if !p.name.is_ascii() || !p.value.is_ascii() {
                warn!(name = %p.name, "skipping non-ascii cookie record");
                return None;
            }
            Some(CookieRecord {
                name: p.name,
                value: p.value,
                domain: p.domain,
                path: p.path,
                expires: Some(expires),
                secure: p.secure,
                http_only: p.http_only,
            })
        })
        .collect();
    Ok(cookies)
}

pub fn decode(raw: &str) -> serde_json::Result<Vec<CookieRecord>> {
    decode_at(raw, OffsetDateTime::now_utc())
}

/// The cookie file plus its live contents. Sibling windows each load the
/// same file at their own startup and write it back at their own close, so
/// the last writer wins; there is no locking.
#[derive(Debug)]
pub struct CookieStore {
    path: PathBuf,
    cookies: Vec<CookieRecord>,
}

impl CookieStore {
    pub fn load(path: &Path) -> Self {
        Self::load_at(path, OffsetDateTime::now_utc())
    }

    /// An absent file is an empty store. A corrupt file is also an empty
    /// store: the cookies are gone, the browser still starts.
    pub fn load_at(path: &Path, now: OffsetDateTime) -> Self {
        let cookies = match fs::read_to_string(path) {
            Ok(raw) => match decode_at(&raw, now) {
                Ok(cookies) => cookies,
                Err(source) => {
                    let err = CookieError::Decode {
                        path: path.to_path_buf(),
                        source,
                    };
                    warn!(%err, "starting with an empty cookie store");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read cookie file");
                Vec::new()
            }
        };
        CookieStore {
            path: path.to_path_buf(),
            cookies,
        }
    }

    pub fn cookies(&self) -> &[CookieRecord] {
        &self.cookies
    }

    pub fn set_cookies(&mut self, cookies: Vec<CookieRecord>) {
        self.cookies = cookies;
    }

    pub fn save(&self) -> Result<(), CookieError> {
        let json = encode(&self.cookies)?;
        fs::write(&self.path, json).map_err(|source| CookieError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, expires: Option<OffsetDateTime>) -> CookieRecord {
        CookieRecord {
            name: name.to_string(),
            value: "v".to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            expires,
            secure: true,
            http_only: false,
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let later = OffsetDateTime::from_unix_timestamp(1_800_000_000).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let mut store = CookieStore::load_at(&path, now);
        assert!(store.cookies().is_empty());
        store.set_cookies(vec![record("sid", Some(later))]);
        store.save().unwrap();

        let loaded = CookieStore::load_at(&path, now);
        assert_eq!(loaded.cookies(), store.cookies());
    }

    #[test]
    fn corrupt_file_is_an_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "{not json").unwrap();
        let store = CookieStore::load(&path);
        assert!(store.cookies().is_empty());
    }
}
