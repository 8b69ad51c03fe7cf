use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use texttracker::{
    cli::{Cli, OutputFormat},
    report::SessionReport,
    tui::{restore_terminal, setup_terminal, TuiApp},
    watcher::DirectoryWatcher,
    ChangeEvent, WatchUpdate,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let config = cli.load_config().context("Failed to load configuration")?;
    let watch_path = cli.get_watch_path();
    tracing::info!(
        "Starting TextTracker on: {} (diff: {})",
        watch_path.display(),
        config.diff.algorithm
    );

    let started_at = Utc::now();
    let watcher = DirectoryWatcher::new(config);

    let watcher = match cli.output {
        OutputFormat::Tui => run_tui_mode(&cli, watcher)?,
        OutputFormat::Json => run_stream_mode(&cli, watcher, print_json_event)?,
        OutputFormat::Text => run_stream_mode(&cli, watcher, print_text_event)?,
    };

    if let Some(ref report_path) = cli.report {
        write_report(&cli, &watcher, started_at, report_path)?;
    }

    Ok(())
}

fn run_tui_mode(cli: &Cli, watcher: DirectoryWatcher) -> Result<DirectoryWatcher> {
    let watch_path = cli.get_watch_path();

    // Setup terminal
    let mut terminal = setup_terminal()?;

    let app = TuiApp::new(watcher, watch_path);
    let res = app.run(&mut terminal);

    // Restore terminal
    if let Err(err) = restore_terminal(&mut terminal) {
        eprintln!("Failed to restore terminal: {}", err);
    }

    match res {
        Ok(watcher) => Ok(watcher),
        Err(err) => {
            eprintln!("Application error: {}", err);
            std::process::exit(1);
        }
    }
}

fn run_stream_mode(
    cli: &Cli,
    mut watcher: DirectoryWatcher,
    print: fn(&ChangeEvent, &Cli) -> Result<()>,
) -> Result<DirectoryWatcher> {
    let watch_path = cli.get_watch_path();
    watcher.start(&watch_path)?;

    if cli.output == OutputFormat::Text {
        println!("Watching: {}", watch_path.display());
        println!("Press Ctrl+C to quit");
        println!("---");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        match watcher.recv_timeout(Duration::from_millis(100)) {
            Ok(WatchUpdate::Changed { event, .. }) => print(&event, cli)?,
            Ok(WatchUpdate::Rejected { reason }) => tracing::warn!("{}", reason),
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    watcher.stop();
    Ok(watcher)
}

fn print_json_event(event: &ChangeEvent, _cli: &Cli) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn print_text_event(event: &ChangeEvent, cli: &Cli) -> Result<()> {
    let recorded: DateTime<Local> = event.recorded_at.into();
    let time_str = recorded.format("%H:%M:%S");

    if cli.no_color {
        println!("[{}] {}", time_str, event.summary());
    } else {
        println!(
            "[{}] \x1b[32m{} characters added\x1b[0m, \x1b[31m{} characters deleted\x1b[0m in {}",
            time_str,
            event.added_count,
            event.deleted_count,
            event.path.display()
        );
    }

    for finding in &event.misspellings {
        if cli.no_color {
            println!("  {}", finding);
        } else {
            println!("  \x1b[33m{}\x1b[0m", finding);
        }
    }

    Ok(())
}

fn write_report(
    cli: &Cli,
    watcher: &DirectoryWatcher,
    started_at: DateTime<Utc>,
    report_path: &std::path::Path,
) -> Result<()> {
    let root = watcher
        .root()
        .map(|root| root.to_path_buf())
        .unwrap_or_else(|| cli.get_watch_path());
    let report = SessionReport::new(root, started_at, &watcher.aggregate());
    report.write_to(report_path)
}
