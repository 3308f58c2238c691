// structviz: step-by-step data structure and algorithm visualizer

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use structviz::controller::Session;
use structviz::step::player::{PlayerConfig, StepPlayer, DEFAULT_INTERVAL_MS, MIN_INTERVAL_MS};
use structviz::ui::{App, JsonLines};

#[derive(Parser)]
#[command(name = "structviz")]
#[command(version, about = "Step-by-step data structure and algorithm visualizer", long_about = None)]
struct Cli {
    /// Milliseconds between played steps
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS,
          value_parser = clap::value_parser!(u64).range(MIN_INTERVAL_MS..))]
    interval_ms: u64,

    /// File of commands to run before the UI starts
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print every step as a JSON line instead of starting the UI
    /// (reads commands from stdin when no script is given)
    #[arg(long)]
    headless: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(cli: &Cli) -> io::Result<()> {
    let filter_layer = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let (writer, ansi) = match &cli.log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(fs::File::create(path)?)), false),
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .init();
    Ok(())
}

/// Run every line through the session; returns how many lines failed
fn run_lines<I>(
    session: &mut Session,
    lines: I,
    source: &str,
    mut output: Option<(&mut StepPlayer, &mut JsonLines<io::Stdout>)>,
) -> Result<usize, Box<dyn std::error::Error>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut failures = 0;
    for (n, line) in lines.enumerate() {
        let line = line?;
        match session.execute_line(&line) {
            Ok(Some(report)) => {
                if let Some((player, renderer)) = output.as_mut() {
                    renderer.set_label(report.steps.label());
                    player.play(report.steps, &mut **renderer)?;
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("{}:{}: {}", source, n + 1, e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    info!("structviz v{}", env!("CARGO_PKG_VERSION"));

    let mut player = StepPlayer::new(PlayerConfig::with_interval_ms(cli.interval_ms));
    let mut session = Session::new();

    if cli.headless {
        let mut renderer = JsonLines::new(io::stdout());
        let failures = match &cli.script {
            Some(path) => {
                let file = io::BufReader::new(fs::File::open(path)?);
                run_lines(
                    &mut session,
                    file.lines(),
                    &path.display().to_string(),
                    Some((&mut player, &mut renderer)),
                )?
            }
            None => run_lines(
                &mut session,
                io::stdin().lock().lines(),
                "<stdin>",
                Some((&mut player, &mut renderer)),
            )?,
        };
        if failures > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(path) = &cli.script {
        let file = io::BufReader::new(fs::File::open(path)?);
        let failures = run_lines(&mut session, file.lines(), &path.display().to_string(), None)?;
        info!(
            operations = session.history().len(),
            failures, "script executed"
        );
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session, player);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
