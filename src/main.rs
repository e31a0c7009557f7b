//! blogscroll: an infinitely scrolling blog feed for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tasks)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲   PageRequest         │  ▲
//!      └───────────────────────┘  │ handle_key_event()
//!                            ┌──────────┐
//!                            │ input.rs │
//!                            └──────────┘
//! ```
//!
//! * **`source/`**: the `BlogSource` trait and the HTTP implementation.
//! * **`feed`**: the pagination state machine (pure, no I/O).
//! * **`fetch`**: runs page requests as tokio tasks.
//! * **`identity`**: who is reading; resolved in the background.
//! * **`app`**: owns all application state and the scroll trigger.
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`**: CLI flags and environment.
//! * **`main`**: wires everything together.

mod app;
mod config;
mod feed;
mod fetch;
mod identity;
mod input;
mod source;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use fetch::{FetchMsg, Fetcher};
use identity::Identity;
use source::{BlogSource, HttpBlogSource};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before printing a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send diagnostics to `path`; stdout is owned by the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blogscroll=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!(e))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    init_logging(&config.log_file)?;
    tracing::info!(api = %config.api_url, category = %config.category, "starting blogscroll");

    // -- data source (injected into the fetcher) ------------------------------
    let source: Arc<dyn BlogSource> = Arc::new(HttpBlogSource::new(&config.api_url, config.timeout())?);
    let (fetcher, mut rx) = Fetcher::new(source);

    // -- identity resolves in the background; the feed waits for it -----------
    let identity_tx = fetcher.sender();
    let user_id = config.user_id.clone();
    tokio::spawn(async move {
        let identity = identity::resolve(user_id).await;
        let _ = identity_tx.send(FetchMsg::Identity(identity));
    });

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(&config.categories, &config.category, Identity::loading());
    app.start();

    // -- main event loop -----------------------------------------------------
    // Each ~100 ms tick:
    //   1. Dispatch queued page requests.
    //   2. Drain finished fetches into the app.
    //   3. Render.
    //   4. Poll for keyboard input.
    let tick_rate = Duration::from_millis(100);

    loop {
        for request in app.take_requests() {
            fetcher.spawn(request);
        }

        while let Ok(msg) = rx.try_recv() {
            app.handle_fetch_msg(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("shutting down");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
