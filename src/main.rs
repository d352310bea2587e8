//! mockterm - a simulated shell in a terminal window
//!
//! mockterm draws a small window with a title bar onto the host terminal
//! and runs a pretend bash session inside it. Nothing is executed: every
//! command is an in-memory string transformation.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | pwd | Print the working directory |
//! | cd [dir] | Change directory (textual, no checks) |
//! | echo ... | Print the arguments |
//! | clear | Clear the window |
//! | history | List previous lines |
//! | help | List commands |
//! | mycommand | Enter a nested mode with `list`, `info`, `exit` |
//!
//! # Quick Start
//!
//! ```text
//! mockterm                      # Interactive window
//! mockterm --user alice         # Custom prompt user
//! echo pwd | mockterm --batch   # Run lines from stdin, print the transcript
//! ```

mod config;
mod core;
mod ui;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{ColorScheme, Config};
use crate::core::{Session, Transcript};
use crate::ui::clipboard;
use crate::ui::{Effect, InputAction, KeyMapper, Renderer, TerminalView};

/// Command line options
#[derive(Debug, Default)]
struct CliOptions {
    /// Prompt user override
    username: Option<String>,
    /// Prompt host override
    hostname: Option<String>,
    /// Color scheme override
    theme: Option<String>,
    /// Config file instead of ~/.mockterm/config.toml
    config_path: Option<PathBuf>,
    /// Read lines from stdin instead of opening the window
    batch: bool,
    /// Write the effective config and exit
    init_config: bool,
    /// Log filter, e.g. "debug"
    log_level: Option<String>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cursor blink period
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

fn print_version() {
    eprintln!("mockterm {}", VERSION);
}

fn print_help() {
    eprintln!("mockterm {} - A simulated shell in a terminal window", VERSION);
    eprintln!();
    eprintln!("Usage: mockterm [OPTIONS]");
    eprintln!();
    eprintln!("Prompt options:");
    eprintln!("  -u, --user <NAME>     User shown in the prompt (default: terminal)");
    eprintln!("  -H, --host <NAME>     Host shown in the prompt (default: terminal)");
    eprintln!();
    eprintln!("Display options:");
    eprintln!("  -t, --theme <NAME>    Color scheme");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -c, --config <PATH>   Config file (default: ~/.mockterm/config.toml)");
    eprintln!("  -b, --batch           Run lines from stdin and print the transcript");
    eprintln!("      --init-config     Write the effective config file and exit");
    eprintln!("      --log-level <LVL> Log filter (default: info, or RUST_LOG)");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run the line");
    eprintln!("  Backspace             Delete last character");
    eprintln!("  Ctrl+Shift+V          Paste from clipboard");
    eprintln!("  Shift+PageUp/PageDown Scroll output");
    eprintln!("  Shift+Home/End        Scroll to top/bottom");
    eprintln!("  Ctrl+C, Ctrl+D        Quit");
    eprintln!();
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
    eprintln!();
    eprintln!("Log file: ~/.mockterm/mockterm.log");
}

fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
        args.next().ok_or_else(|| format!("Missing value for {}", flag))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-u" | "--user" => options.username = Some(value(&mut args, &arg)?),
            "-H" | "--host" => options.hostname = Some(value(&mut args, &arg)?),
            "-t" | "--theme" => options.theme = Some(value(&mut args, &arg)?),
            "-c" | "--config" => options.config_path = Some(PathBuf::from(value(&mut args, &arg)?)),
            "-b" | "--batch" => options.batch = true,
            "--init-config" => options.init_config = true,
            "--log-level" => options.log_level = Some(value(&mut args, &arg)?),
            other => {
                return Err(format!("Unknown argument: {}. Use -h for help.", other));
            }
        }
    }

    Ok(options)
}

/// Load the config file and apply command line overrides
fn effective_config(options: &CliOptions) -> Config {
    let mut config = match &options.config_path {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    };

    if let Some(ref username) = options.username {
        config.username = username.clone();
    }
    if let Some(ref hostname) = options.hostname {
        config.hostname = hostname.clone();
    }
    if let Some(ref theme) = options.theme {
        config.color_scheme = theme.clone();
    }
    config
}

/// Log to ~/.mockterm/mockterm.log; the screen belongs to the window
fn init_logging(level: Option<&str>) {
    let log_path = config::config_dir()
        .map(|dir| dir.join("mockterm.log"))
        .unwrap_or_else(|| PathBuf::from("mockterm.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args(env::args().skip(1)) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging(options.log_level.as_deref());
    info!("mockterm {} starting...", VERSION);

    let config = effective_config(&options);

    if options.init_config {
        let path = match &options.config_path {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    if options.batch {
        let stdin = io::stdin();
        let stdout = io::stdout();
        return run_batch(&config, stdin.lock(), &mut stdout.lock());
    }

    run_interactive(&config)
}

/// Feed every input line through a session and write the final transcript
fn run_batch<R: BufRead, W: Write>(config: &Config, input: R, out: &mut W) -> anyhow::Result<()> {
    let mut session = Session::new(config.identity());
    let mut transcript = Transcript::new(session.prompt());

    for line in input.lines() {
        let line = line?;
        session.submit(&line, &mut transcript);
    }

    info!("Batch run finished after {} commands", session.history().len());
    writeln!(out, "{}", transcript.render())?;
    Ok(())
}

/// Open the window and run until the user quits
fn run_interactive(config: &Config) -> anyhow::Result<()> {
    let mut view = TerminalView::new(Session::new(config.identity()));
    let mut renderer = Renderer::new(
        config.get_color_scheme(),
        config.window.clone(),
        config.cursor.clone(),
    );

    renderer.init()?;
    let (cols, rows) = Renderer::size()?;
    info!("Terminal size: {}x{}", cols, rows);
    info!("Prompt: {:?}", view.session.prompt());

    // Run main loop, then restore the terminal whatever happened
    let result = run_main_loop(&mut view, &mut renderer);
    if let Err(e) = renderer.cleanup() {
        error!("Failed to restore terminal: {}", e);
    }

    info!("Session ended");
    result
}

/// Main event loop
fn run_main_loop(view: &mut TerminalView, renderer: &mut Renderer) -> anyhow::Result<()> {
    let poll_timeout = Duration::from_millis(50);
    let (paste_tx, paste_rx) = mpsc::channel::<clipboard::Result<String>>();
    let mut last_blink = Instant::now();

    renderer.render(view)?;

    loop {
        let mut dirty = false;
        let mut effects = Vec::new();

        // Clipboard results arrive from the reader thread
        while let Ok(result) = paste_rx.try_recv() {
            effects.push(view.paste_finished(result));
            dirty = true;
        }

        if event::poll(poll_timeout)? {
            let action = match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => KeyMapper::map(&key_event),
                Event::Mouse(mouse_event) => KeyMapper::map_mouse(&mouse_event),
                Event::Paste(text) => Some(InputAction::PasteText(text)),
                Event::Resize(cols, rows) => {
                    info!("Resize: {}x{}", cols, rows);
                    renderer.resize(cols, rows);
                    dirty = true;
                    None
                }
                _ => None,
            };

            if let Some(action) = action {
                effects.push(view.handle(action));
                dirty = true;
            }
        }

        for effect in effects {
            match effect {
                Effect::None => {}
                Effect::ReadClipboard => {
                    clipboard::spawn_read(paste_tx.clone());
                }
                Effect::Quit => return Ok(()),
            }
        }

        if last_blink.elapsed() >= BLINK_INTERVAL {
            view.toggle_cursor();
            last_blink = Instant::now();
            dirty = true;
        }

        if dirty {
            renderer.render(view)?;
        }
    }
}
