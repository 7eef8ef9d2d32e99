//! metaflags - decode meta protocol response flags from the terminal
//!
//! Reads one line of response flag tokens per input line from stdin and
//! prints the decoded record (or the decode error) to stdout.

use metaflags::inspect::{inspect, InspectStats};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Command-line configuration
struct Config {
    /// Maximum log level written to stderr
    log_level: Level,
    /// Print session statistics on exit
    stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::WARN,
            stats: false,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--log-level" | "-l" => {
                    if i + 1 < args.len() {
                        config.log_level = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid log level: {}", args[i + 1]);
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --log-level requires a value");
                        std::process::exit(1);
                    }
                }
                "--stats" | "-s" => {
                    config.stats = true;
                    i += 1;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("metaflags version {}", metaflags::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }
}

fn print_help() {
    println!(
        r#"
metaflags - decode memcached meta response flags

USAGE:
    metaflags [OPTIONS] < flags.txt

OPTIONS:
    -l, --log-level <LEVEL>  Log level on stderr: error, warn, info, debug, trace (default: warn)
    -s, --stats              Print line statistics on exit
    -v, --version            Print version information
    -h, --help               Print this help message

INPUT:
    One response per line, flag tokens only (no status code):
    $ echo "c4821 t300 Oreq1" | metaflags
    OK won=false stale=false hit=false opaque=req1 cas=4821 flags=0 last_access=0 size=0 ttl=300
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    // Logs go to stderr so stdout carries only decoded lines
    FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let stats = Arc::new(InspectStats::new());
    info!(version = metaflags::VERSION, "metaflags starting");

    inspect(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        Arc::clone(&stats),
    )
    .await?;

    if config.stats {
        eprintln!(
            "lines={} decoded={} failed={} bytes={}",
            stats.lines_read.load(Ordering::Relaxed),
            stats.decoded.load(Ordering::Relaxed),
            stats.failed.load(Ordering::Relaxed),
            stats.bytes_read.load(Ordering::Relaxed),
        );
    }

    Ok(())
}
