//! Everything a window needs, built once at startup and passed down
//! explicitly: the parsed settings, the compiled navigation gate, and the
//! cookie store when the json strategy is active.

use std::path::PathBuf;

use crate::config::{self, ConfigError, CookiePersistence, Settings};
use crate::cookies::CookieStore;
use crate::navigation::WhitelistGate;
use crate::whitelist::Whitelist;

pub struct AppContext {
    pub config_dir: PathBuf,
    pub settings: Settings,
    pub gate: WhitelistGate,
    pub cookie_store: Option<CookieStore>,
}

impl AppContext {
    pub fn new(config_dir: PathBuf, settings: Settings) -> Result<Self, ConfigError> {
        let whitelist = Whitelist::new(&settings.whitelist_regexes)?;
        let gate = WhitelistGate::new(whitelist);
        let cookie_store = match settings.cookie_persistence {
            CookiePersistence::Json => {
                Some(CookieStore::load(&config_dir.join(config::COOKIE_FILE)))
            }
            CookiePersistence::Engine => None,
        };
        Ok(AppContext {
            config_dir,
            settings,
            gate,
            cookie_store,
        })
    }

    /// The URL the window opens with: the command line one if given, the
    /// configured default otherwise.
    pub fn start_url(&self, cli_url: Option<String>) -> String {
        cli_url.unwrap_or_else(|| self.settings.default_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            default_url: "https://example.com/".to_string(),
            whitelist_regexes: vec![r"https://example\.com/.*".to_string()],
            cookie_persistence: CookiePersistence::Engine,
        }
    }

    #[test]
    fn cli_url_wins_over_default() {
        let ctx = AppContext::new(PathBuf::from("."), settings()).unwrap();
        assert_eq!(
            ctx.start_url(Some("https://example.com/x".to_string())),
            "https://example.com/x"
        );
        assert_eq!(ctx.start_url(None), "https://example.com/");
    }

    #[test]
    fn engine_persistence_has_no_store() {
        let ctx = AppContext::new(PathBuf::from("."), settings()).unwrap();
        assert!(ctx.cookie_store.is_none());
    }

    #[test]
    fn bad_whitelist_pattern_fails_construction() {
        let mut s = settings();
        s.whitelist_regexes = vec!["(".to_string()];
        assert!(AppContext::new(PathBuf::from("."), s).is_err());
    }
}
