use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` flags.
pub fn init(verbosity: u8) {
    let stderr = std::io::stderr();

    // stdout carries the report and stderr the error document; at the default
    // level nothing else reaches stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity, std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .with_ansi(stderr.is_terminal())
        .with_target(false)
        .try_init();
}

fn filter(verbosity: u8, env_directives: Option<String>) -> EnvFilter {
    let level = match verbosity {
        0 => "error",
        1 => "info",
        _ => "debug",
    };

    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}
