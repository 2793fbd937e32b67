// src/main.rs
use bookmarks::cli::args::Cli;
use bookmarks::cli::execute_command;
use bookmarks::config::load_settings;
use bookmarks::exitcode;
use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

#[instrument]
fn main() {
    let cli = Cli::parse();
    let no_color = cli.no_color;

    setup_logging(cli.verbose, no_color);

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            report(&format!("Failed to load settings: {}", e), no_color);
            std::process::exit(exitcode::USAGE);
        }
    };

    if let Err(e) = execute_command(cli, &settings) {
        report(&format!("Error: {}", e), no_color);
        std::process::exit(e.exit_code());
    }
    std::process::exit(exitcode::SUCCESS);
}

// stdout carries the table only, so human messages go to stderr
fn report(message: &str, no_color: bool) {
    if no_color {
        eprintln!("{}", message);
    } else {
        eprintln!("{}", message.red());
    }
}

fn setup_logging(verbosity: u8, no_color: bool) {
    debug!("INIT: Attempting logger init from main.rs");

    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -v -v -v");
            LevelFilter::TRACE
        }
    };

    let noisy_modules = ["reqwest", "hyper", "hyper_util", "lol_html", "mio", "want"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
