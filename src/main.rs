// src/main.rs

use clap::Parser;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tally_keeper::app_logic::{APP_NAME, HandlerError, Reply, TallySession, handle_line, handler};
use tally_keeper::core::{CoreConfigManager, CoreTallyFileManager, path_utils};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep named point totals and export ranked snapshots", long_about = None)]
struct Cli {
    /// Tally file to open instead of the one used last time
    file: Option<PathBuf>,

    /// Level for the log file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(file_level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset(time::UtcOffset::UTC)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(log_path) = path_utils::get_log_file_path(APP_NAME) {
        match File::create(&log_path) {
            Ok(file) => loggers.push(WriteLogger::new(file_level, config, file)),
            Err(e) => eprintln!("Could not create log file {log_path:?}: {e}"),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Logger initialization failed: {e}");
    }
}

fn print_reply(reply: &Reply) {
    if let Reply::Text(text) = reply {
        println!("{text}");
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    log::info!("Starting {APP_NAME} {}", env!("CARGO_PKG_VERSION"));

    let mut session = TallySession::new(
        Arc::new(CoreConfigManager::new()),
        Arc::new(CoreTallyFileManager::new()),
    );
    session.start_up();

    if let Some(path) = &cli.file
        && let Err(e) = session.open_file(path)
    {
        eprintln!("Failed to load file:\n{e}");
    }

    println!("{}", handler::render_list(&session));
    println!("Type 'help' for the list of commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        match handle_line(&mut session, &line?) {
            Ok(Reply::Quit) => break,
            Ok(reply) => print_reply(&reply),
            Err(HandlerError::Parse(e)) => {
                // Help output comes back through the parse path as well.
                let _ = e.print();
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    log::info!("Exiting {APP_NAME}.");
    Ok(())
}
