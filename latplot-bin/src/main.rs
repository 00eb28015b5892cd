mod config;
mod error;

use crate::config::Config;
use crate::error::CliError;
use clap::{crate_version, App, Arg};
use latplot_chart::Renderer;
use latplot_report::LatencyReport;
use slog::{debug, info, o, Drain, Level};
use std::path::{Path, PathBuf};

fn root_logger(level: Level) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().stdout().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let async_drain = slog_async::Async::new(drain).build().fuse();
    let level_filter = slog::LevelFilter(async_drain, level).fuse();
    slog::Logger::root(level_filter, o!())
}

#[derive(Debug)]
struct Invocation {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Config,
    print_summary: bool,
}

fn run(logger: &slog::Logger, inv: Invocation) -> Result<PathBuf, CliError> {
    let input = inv.input;
    let output = inv.output.unwrap_or(inv.config.output);
    debug!(logger, "parsing report"; "input" => %input.display());
    let report = LatencyReport::from_path(&input)?;
    info!(logger, "parsed report"; "summary" => %report);
    if inv.print_summary {
        for line in report.summary_lines() {
            println!("{}", line);
        }
    }
    let renderer = Renderer::new(inv.config.style, logger.new(o!("output" => output.display().to_string())));
    Ok(renderer.render(&report, &output)?)
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    match path {
        Some(p) => Config::load(Path::new(p)).map_err(CliError::Config),
        None => Ok(Config::default()),
    }
}

/// The input is checked first; without it nothing else is read.
fn invocation(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<&str>,
    print_summary: bool,
) -> Result<Invocation, CliError> {
    let input = input.ok_or(CliError::MissingArgument)?;
    Ok(Invocation {
        input,
        output,
        config: load_config(config)?,
        print_summary,
    })
}

fn main() {
    let matches = App::new("latplot")
        .version(crate_version!())
        .author("Benn Sundsrud <benn.sundsrud@gmail.com>")
        .about("Plot latency percentiles from load test output")
        .arg(
            Arg::with_name("INPUT")
                .help("Load test report to read")
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Image to write (default: latency_plot.png)")
                .index(2),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Path to config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("summary")
                .long("summary")
                .help("Print the summary to stdout"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets verbosity level"),
        )
        .get_matches();
    let level = match matches.occurrences_of("v") {
        0 => Level::Warning,
        1 => Level::Info,
        2 => Level::Debug,
        3 => Level::Trace,
        _ => {
            eprintln!("WARNING: more than -vvv is ignored");
            Level::Trace
        }
    };
    let result = {
        let logger = root_logger(level);
        invocation(
            matches.value_of_os("INPUT").map(PathBuf::from),
            matches.value_of_os("OUTPUT").map(PathBuf::from),
            matches.value_of("config"),
            matches.is_present("summary"),
        )
        .and_then(|inv| run(&logger, inv))
    };
    match result {
        Ok(path) => println!("Latency plot saved to: {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
