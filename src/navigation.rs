//! Navigation gating. Denied navigations are silently suppressed: the page
//! just stays where it is, no dialog, no error page.

use std::io;
use std::process::Command;

use tracing::debug;

use crate::whitelist::Whitelist;

/// The one capability the hosting view needs: may this navigation happen?
pub trait NavigationPolicy {
    fn decide(&self, url: &str, top_level: bool) -> bool;
}

/// Whitelist-backed gate. Sub-frame navigations (iframes, embedded
/// documents) are always allowed; only the top-level document is held to
/// the whitelist.
#[derive(Debug, Clone)]
pub struct WhitelistGate {
    whitelist: Whitelist,
}

impl WhitelistGate {
    pub fn new(whitelist: Whitelist) -> Self {
        WhitelistGate { whitelist }
    }
}

impl NavigationPolicy for WhitelistGate {
    fn decide(&self, url: &str, top_level: bool) -> bool {
        if !top_level {
            return true;
        }
        let allowed = self.whitelist.is_allowed(url);
        if !allowed {
            debug!(url, "navigation denied");
        }
        allowed
    }
}

/// Pointer buttons the view reports on link activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    /// The thumb "back" button (XButton1).
    Back,
    /// The thumb "forward" button (XButton2).
    Forward,
}

/// What a click turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Load the link in the current view.
    Load(String),
    /// Spawn a sibling window process on the link.
    OpenNewWindow(String),
    HistoryBack,
    HistoryForward,
    /// Nothing happens. Covers right clicks (the engine context menu could
    /// offer navigation outside the whitelist), clicks on nothing, and
    /// clicks on disallowed links.
    Ignore,
}

/// Classify a click. History buttons bypass the whitelist entirely: they
/// only revisit pages that were approved when first loaded.
pub fn classify_click(
    button: PointerButton,
    link_url: Option<&str>,
    policy: &dyn NavigationPolicy,
) -> Activation {
    match button {
        PointerButton::Right => Activation::Ignore,
        PointerButton::Back => Activation::HistoryBack,
        PointerButton::Forward => Activation::HistoryForward,
        PointerButton::Left | PointerButton::Middle => {
            let Some(url) = link_url else {
                return Activation::Ignore;
            };
            if !policy.decide(url, true) {
                return Activation::Ignore;
            }
            if button == PointerButton::Middle {
                Activation::OpenNewWindow(url.to_string())
            } else {
                Activation::Load(url.to_string())
            }
        }
    }
}

/// Launch another instance of this executable on `url` and forget about it.
/// The child loads its own settings and cookies; nothing is shared beyond
/// the file paths.
pub fn spawn_window(url: &str) -> io::Result<()> {
    let exe = std::env::current_exe()?;
    Command::new(exe).arg(url).spawn()?;
    Ok(())
}
