use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use pipewatch::{
    events, logging, ui, App, Command, DemoProducer, FileSource, Settings,
    StreamSource, Theme, ThemeChoice,
};

/// Width of the `--dump` rendering.
const DUMP_WIDTH: u16 = 140;

/// How long `--dump` waits for a first snapshot from a live source.
const DUMP_WAIT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "pipewatch")]
#[command(about = "Live terminal dashboard for pipeline element and pad metrics")]
struct Args {
    /// Path to the snapshot JSON file written by the pipeline
    #[arg(short, long, default_value = "pipeline.json", conflicts_with_all = ["connect", "demo"])]
    file: PathBuf,

    /// Connect to a TCP endpoint for live snapshots (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "demo"])]
    connect: Option<String>,

    /// Show a synthetic pipeline instead of reading a producer
    #[arg(long)]
    demo: bool,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base refresh period (e.g., "1s", "400ms"); frames are drawn four times per period
    #[arg(short, long)]
    time_scale: Option<String>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Render one frame as plain text to stdout and exit
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(&args)?;
    let _log_guard = logging::init(settings.log_file.as_deref())?;
    info!(
        time_scale = ?settings.time_scale,
        theme = ?settings.theme,
        "pipewatch starting"
    );

    let theme = Theme::from_choice(settings.theme);
    let frame_interval = settings.frame_interval();

    // Handle demo mode (synthetic producer)
    if args.demo {
        let cores = thread::available_parallelism().map_or(4, |n| n.get());
        let (producer, source) = DemoProducer::create(cores);
        producer.spawn(settings.time_scale);
        let app = App::new(Box::new(source), theme, frame_interval);
        return run(app, args.dump);
    }

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, theme, frame_interval, args.dump);
    }

    // Default: file-based mode
    let app = App::new(Box::new(FileSource::new(&args.file)), theme, frame_interval);
    run(app, args.dump)
}

/// Defaults, then the settings file, then environment, then command line.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ref value) = args.time_scale {
        settings.set_time_scale(value)?;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(ref path) = args.log_file {
        settings.log_file = Some(path.clone());
    }
    Ok(settings)
}

fn run(app: App, dump: bool) -> Result<()> {
    if dump {
        dump_frame(app)
    } else {
        run_tui(app)
    }
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, theme: Theme, frame_interval: Duration, dump: bool) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    // Progress goes to stderr so `--dump` output is only the frame
    let source = rt.block_on(connect_stream(addr, &mut io::stderr()))?;

    // The runtime keeps driving the reader task while the UI runs on this thread
    run(App::new(Box::new(source), theme, frame_interval), dump)
}

/// Connect to a snapshot stream, reporting progress to `progress`.
async fn connect_stream(addr: &str, progress: &mut impl Write) -> Result<StreamSource> {
    use tokio::net::TcpStream;

    writeln!(progress, "Connecting to {}...", addr)?;
    match TcpStream::connect(addr).await {
        Ok(stream) => {
            info!(addr, "connected");
            writeln!(progress, "Connected!")?;
            Ok(StreamSource::spawn(stream, addr))
        }
        Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
    }
}

/// Print one frame as plain text (non-interactive)
fn dump_frame(mut app: App) -> Result<()> {
    let deadline = Instant::now() + DUMP_WAIT;
    app.reload_data();
    while app.snapshot.is_empty() && app.load_error.is_none() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
        app.reload_data();
    }
    app.step(Command::Tick);

    let text = ui::dump_to_string(&app, DUMP_WIDTH)?;
    println!("{}", text);

    if let Some(ref err) = app.load_error {
        eprintln!("{}: {}", app.source_description(), err);
    }
    Ok(())
}

/// Run the TUI with the given app
fn run_tui(mut app: App) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        original_hook(panic);
    }));

    info!(source = app.source_description(), "dashboard running");
    let result = run_app(&mut terminal, &mut app);
    if let Err(ref e) = result {
        error!("dashboard loop failed: {:#}", e);
    }

    // Restore terminal
    restore_terminal();
    if let Err(e) = terminal.show_cursor() {
        error!("failed to show cursor: {}", e);
    }

    result
}

/// Acquire raw mode and the alternate screen, releasing whatever was acquired
/// if a later step fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to enter alternate screen");
    }

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        restore_terminal();
        anyhow::Error::new(e).context("Failed to initialize terminal")
    })
}

/// Best-effort release of terminal state; errors are ignored.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        let _ = app.reload_data();

        // At most one input event per iteration; none means a tick
        match events::poll_event(Duration::ZERO)? {
            Some(Event::Key(key)) => events::handle_key_event(app, key),
            Some(Event::Mouse(mouse)) => events::handle_mouse_event(app, mouse),
            _ => app.step(Command::Tick),
        }

        if !app.running {
            break;
        }

        terminal.draw(|frame| ui::render(frame, app))?;
        thread::sleep(app.frame_interval);
    }

    Ok(())
}
