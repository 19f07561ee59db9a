//! focusbrowser: a single-window kiosk browser. One URL, a whitelist of
//! full-match URL regexes guarding every top-level navigation, and cookie
//! persistence either delegated to the web view's own profile or kept in a
//! small JSON store.
//!
//! The rendering engine does all the hard work; this crate is the gate in
//! front of it. The logic core below builds and tests without any GUI
//! stack; the window glue sits behind the `gui` feature.

pub mod app;
pub mod config;
pub mod cookies;
pub mod navigation;
pub mod whitelist;

#[cfg(feature = "gui")]
pub mod window;

pub use app::AppContext;
pub use config::{load_settings, ConfigError, CookiePersistence, Settings};
pub use cookies::{CookieError, CookieRecord, CookieStore};
pub use navigation::{Activation, NavigationPolicy, PointerButton, WhitelistGate};
pub use whitelist::Whitelist;
