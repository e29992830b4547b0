use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use sheetdash::access::{Role, UserContext};
use sheetdash::config::Config;
use sheetdash::core::DataSource;
use sheetdash::logging::LogLevel;
use sheetdash::tui::{App, LoadEvent};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Keyboard-first dashboard for regional business data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level for the log file; takes precedence over RUST_LOG
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Start signed in with this email instead of showing the login form
    #[arg(long = "user", value_name = "EMAIL")]
    user: Option<String>,
    /// Role for --user; defaults to the role the configuration grants the email
    #[arg(long = "role", value_name = "ROLE", requires = "user")]
    role: Option<String>,
    /// Path to open on startup, e.g. /explore
    #[arg(long = "route", value_name = "PATH", default_value = "/")]
    route: String,
    /// Override a page endpoint. Repeatable. Syntax: source=url
    /// Examples: --endpoint 'play=http://localhost:8080/api/play'
    ///           --endpoint 'market_lines=https://bi.example.com/lines'
    #[arg(long = "endpoint", value_name = "SOURCE=URL")]
    endpoint: Vec<String>,
}

const TICK: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Log to a file in the working directory; the terminal belongs to the UI
    let cwd = std::env::current_dir()?;
    let log_path = cwd.join(sheetdash::logging::LOG_FILE.clone());
    sheetdash::logging::init_with(Some(log_path), args.logging.map(Into::into))?;
    color_eyre::install()?;

    let mut config = Config::from_path(args.config.as_ref())?;
    for spec in &args.endpoint {
        let (source, url) = parse_endpoint(spec)?;
        config.sources.set(source, url);
    }
    let user = match &args.user {
        Some(email) => {
            let role = match &args.role {
                Some(r) => Role::from_str(r).map_err(|_| eyre!("unknown role '{}', expected admin or user", r))?,
                None => config.role_for(email),
            };
            Some(UserContext::new(email.trim(), role))
        }
        None => config.user.clone(),
    };

    let (load_tx, load_rx) = unbounded_channel();
    let cancel = CancellationToken::new();
    let mut app = App::new(config, user, load_tx, cancel)?;
    app.navigate(&args.route);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, load_rx).await;
    app.shutdown();

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut load_rx: UnboundedReceiver<LoadEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    loop {
        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick()?;
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => app.handle_key_event(key)?,
                    Some(Ok(Event::Resize(w, h))) => debug!("resized to {}x{}", w, h),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            Some(event) = load_rx.recv() => {
                app.handle_load_event(event);
            }
        }

        if app.should_quit() {
            info!("quit requested");
            break;
        }
    }
    Ok(())
}

fn parse_endpoint(spec: &str) -> Result<(DataSource, String)> {
    let (source, url) = spec
        .split_once('=')
        .ok_or_else(|| eyre!("invalid --endpoint '{}', expected source=url", spec))?;
    let source = DataSource::from_str(source.trim())
        .map_err(|e| eyre!("invalid --endpoint '{}': {}", spec, e))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(eyre!("invalid --endpoint '{}': empty url", spec));
    }
    Ok((source, url.to_string()))
}
