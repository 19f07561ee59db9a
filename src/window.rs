//! Window and web view glue. One tao window, one wry web view, the
//! navigation gate wired into the engine's navigation hook.

use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    window::WindowBuilder,
};
use time::OffsetDateTime;
use tracing::warn;
use wry::{WebContext, WebViewBuilder};

#[cfg(target_os = "linux")]
use tao::platform::unix::WindowExtUnix;
#[cfg(target_os = "linux")]
use wry::WebViewBuilderExtUnix;

use crate::app::AppContext;
use crate::config::{self, CookiePersistence};
use crate::cookies::CookieRecord;
use crate::navigation::{self, NavigationPolicy};

const STYLE_OVERRIDE: &str = include_str!("../assets/styleoverride.css");

#[derive(Debug, Clone)]
enum UserEvent {
    OpenWindow(String),
    HistoryBack,
    HistoryForward,
}

// ── Page init JS ──────────────────────────────────────────────────────────────

/// Script injected into every page before it runs:
/// - applies the bundled style override,
/// - suppresses the context menu (it could offer navigation outside the
///   whitelist),
/// - maps the pointer back/forward buttons onto session history,
/// - routes middle-clicks on links to the window spawner instead of the
///   engine's own new-window handling,
/// - seeds imported cookies when the json strategy is active.
fn page_init_js(seed: &str) -> String {
    format!(
        r#"(function() {{
    function ipc(m) {{ window.ipc.postMessage(m); }}
    window.addEventListener('contextmenu', e => e.preventDefault());
    window.addEventListener('mouseup', e => {{
        if (e.button === 3) {{ e.preventDefault(); ipc('back'); }}
        else if (e.button === 4) {{ e.preventDefault(); ipc('forward'); }}
    }});
    window.addEventListener('auxclick', e => {{
        if (e.button !== 1) return;
        const link = e.target.closest && e.target.closest('a[href]');
        if (!link) return;
        e.preventDefault();
        ipc('open:' + link.href);
    }});
    function applyStyle() {{
        const style = document.createElement('style');
        style.textContent = {css};
        document.head.appendChild(style);
    }}
    if (document.readyState === 'loading') document.addEventListener('DOMContentLoaded', applyStyle);
    else applyStyle();
    {seed}
}})();"#,
        css = js_string(STYLE_OVERRIDE),
        seed = seed,
    )
}

/// `document.cookie` statements re-seeding the records the store holds.
/// HttpOnly records cannot be set from script and stay behind; this is why
/// the engine strategy is the default.
fn cookie_seed_js(records: &[CookieRecord]) -> String {
    let now = OffsetDateTime::now_utc();
    let mut js = String::new();
    for c in records {
        if c.http_only {
            continue;
        }
        let Some(expires) = c.expires else { continue };
        let max_age = expires.unix_timestamp() - now.unix_timestamp();
        if max_age <= 0 {
            continue;
        }
        let mut cookie = format!(
            "{}={}; domain={}; path={}; max-age={}",
            c.name, c.value, c.domain, c.path, max_age
        );
        if c.secure {
            cookie.push_str("; secure");
        }
        js.push_str(&format!("document.cookie = {};\n", js_string(&cookie)));
    }
    js
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

// ── Window ────────────────────────────────────────────────────────────────────

pub fn run(ctx: AppContext, start_url: String) -> anyhow::Result<()> {
    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title("focusbrowser")
        .with_inner_size(tao::dpi::LogicalSize::new(1280, 800))
        .build(&event_loop)?;

    let mut web_context = match ctx.settings.cookie_persistence {
        CookiePersistence::Engine => WebContext::new(Some(config::webview_data_dir())),
        CookiePersistence::Json => WebContext::new(None),
    };

    let seed = ctx
        .cookie_store
        .as_ref()
        .map(|store| cookie_seed_js(store.cookies()))
        .unwrap_or_default();
    let init_js = page_init_js(&seed);

    let gate_nav = ctx.gate.clone();
    let gate_new = ctx.gate.clone();
    let proxy_ipc = proxy.clone();

    #[cfg(target_os = "linux")]
    let builder = {
        let vbox = window
            .default_vbox()
            .ok_or_else(|| anyhow::anyhow!("window has no gtk container"))?;
        WebViewBuilder::new_gtk(vbox)
    };
    #[cfg(not(target_os = "linux"))]
    let builder = WebViewBuilder::new(&window);

    let webview = builder
        .with_web_context(&mut web_context)
        .with_url(&start_url)
        .with_initialization_script(&init_js)
        // wry only reports top-level navigations here; sub-frame loads
        // never reach the handler. Returning false suppresses the
        // navigation with no further feedback.
        .with_navigation_handler(move |url| gate_nav.decide(&url, true))
        .with_new_window_req_handler(move |url| {
            // window.open / target=_blank: allowed targets get their own
            // process, the engine never opens a window of its own.
            if gate_new.decide(&url, true) {
                if let Err(err) = navigation::spawn_window(&url) {
                    warn!(%err, "could not spawn window");
                }
            }
            false
        })
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let body = msg.body().as_str();
            if body == "back" {
                let _ = proxy_ipc.send_event(UserEvent::HistoryBack);
            } else if body == "forward" {
                let _ = proxy_ipc.send_event(UserEvent::HistoryForward);
            } else if let Some(url) = body.strip_prefix("open:") {
                let _ = proxy_ipc.send_event(UserEvent::OpenWindow(url.to_string()));
            }
        })
        .build()?;

    // run() never returns, so the window and web context above live for
    // the rest of the process.
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Some(store) = &ctx.cookie_store {
                    if let Err(err) = store.save() {
                        warn!(%err, "could not save cookies");
                    }
                }
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(e) => match e {
                UserEvent::HistoryBack => {
                    let _ = webview.evaluate_script("history.back()");
                }
                UserEvent::HistoryForward => {
                    let _ = webview.evaluate_script("history.forward()");
                }
                UserEvent::OpenWindow(url) => {
                    // the message came from page script, so check again
                    if ctx.gate.decide(&url, true) {
                        if let Err(err) = navigation::spawn_window(&url) {
                            warn!(%err, "could not spawn window");
                        }
                    }
                }
            },
            _ => {}
        }
    });
}
