use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, Select, Text};
use qweather_core::{
    Config, Dispatcher, ForecastRange, HttpTransport, IndexKind, IndexSelector, Lang, Query,
    QWeatherError, Report, ReportKind, Transport, UnitSystem, config::API_KEY_ENV,
    dispatch_to_json,
};
use std::ffi::OsString;
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "qweather",
    version,
    about = "Query QWeather reports and print normalized JSON",
    arg_required_else_help = true,
    after_help = index_help()
)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current conditions.
    Now {
        /// Station id (e.g. 101010100) or lon,lat pair (e.g. 116.41,39.92).
        #[arg(allow_hyphen_values = true)]
        location: String,
    },

    /// Daily forecast.
    Forecast {
        /// Station id (e.g. 101010100) or lon,lat pair (e.g. 116.41,39.92).
        #[arg(allow_hyphen_values = true)]
        location: String,

        /// Forecast horizon in days: 3, 7, 10, 15 or 30.
        #[arg(long, default_value = "15")]
        days: ForecastRange,
    },

    /// Active severe-weather warnings.
    Warning {
        /// Station id (e.g. 101010100) or lon,lat pair (e.g. 116.41,39.92).
        #[arg(allow_hyphen_values = true)]
        location: String,
    },

    /// Air quality; a lon,lat pair also reports the US EPA scale.
    Air {
        /// Station id (e.g. 101010100) or lon,lat pair (e.g. 116.41,39.92).
        #[arg(allow_hyphen_values = true)]
        location: String,
    },

    /// Daily life indices.
    Indices {
        /// Station id (e.g. 101010100) or lon,lat pair (e.g. 116.41,39.92).
        #[arg(allow_hyphen_values = true)]
        location: String,

        /// Comma-separated index codes (default 1,2,3,5,9,16; 0 = all).
        #[arg(long = "type", value_name = "CODES")]
        selector: Option<String>,
    },

    /// Interactively store the API key, host, language and units.
    Configure,

    #[command(external_subcommand)]
    Other(Vec<String>),
}

impl Cli {
    /// Parse `args`, folding an upper- or mixed-case report token onto its subcommand.
    ///
    /// Usage errors after folding surface as clap errors, like any other usage error.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;

        let Command::Other(rest) = &cli.command else {
            return Ok(cli);
        };
        let Some(kind) = rest.first().and_then(|token| ReportKind::try_from(token.as_str()).ok())
        else {
            return Ok(cli);
        };

        let argv = ["qweather".to_string(), kind.to_string()]
            .into_iter()
            .chain(rest.iter().skip(1).cloned());
        let mut folded = Self::try_parse_from(argv)?;
        folded.verbose = folded.verbose.saturating_add(cli.verbose);

        Ok(folded)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.resolve()? {
            Action::Configure => configure(),
            Action::Report(query) => {
                let config = Config::load()?.with_env_overrides();
                let json = render_report(&query, &config, std::env::var(API_KEY_ENV).ok(), |config| {
                    HttpTransport::new(config.timeout())
                })
                .await?;

                println!("{json}");
                Ok(())
            }
        }
    }
}

/// Resolve the credential, then build the transport and dispatch once.
///
/// `connect` is only called once a key is known: no key, no request.
async fn render_report<T, F>(
    query: &Query,
    config: &Config,
    env_key: Option<String>,
    connect: F,
) -> Result<String, QWeatherError>
where
    T: Transport,
    F: FnOnce(&Config) -> Result<T, QWeatherError>,
{
    let credential = config.credential_from(env_key)?;
    debug!(key = %credential.masked(), host = %config.api_host, "credential resolved");

    if let Report::Indices(selector) = &query.report {
        let names: Vec<&str> = selector.kinds().iter().map(|kind| kind.name(Lang::En)).collect();
        debug!(selector = selector.as_str(), ?names, "life indices requested");
    }

    let dispatcher = Dispatcher::new(connect(config)?, credential, config);
    dispatch_to_json(&dispatcher, query).await
}

/// What a parsed command line asks for.
#[derive(Debug, PartialEq)]
pub enum Action {
    Report(Query),
    Configure,
}

impl Command {
    pub fn resolve(self) -> anyhow::Result<Action> {
        let (report, location) = match self {
            Command::Now { location } => (Report::Now, location),
            Command::Forecast { location, days } => (Report::Forecast(days), location),
            Command::Warning { location } => (Report::Warning, location),
            Command::Air { location } => (Report::Air, location),
            Command::Indices { location, selector } => {
                let selector = match selector {
                    Some(codes) => codes.parse::<IndexSelector>()?,
                    None => IndexSelector::default(),
                };
                (Report::Indices(selector), location)
            }
            Command::Configure => return Ok(Action::Configure),
            Command::Other(args) => return resolve_external(args),
        };

        Ok(Action::Report(Query::new(report, &location)?))
    }
}

/// Tokens that fold onto a report were already handled by [`Cli::parse_from_args`].
fn resolve_external(args: Vec<String>) -> anyhow::Result<Action> {
    let token = args.into_iter().next().unwrap_or_default();
    Err(QWeatherError::UnsupportedReport(token).into())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("QWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the stored key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    config.api_host = Text::new("API host:")
        .with_default(&config.api_host)
        .with_help_message("Your console-assigned host, e.g. abc123.re.qweatherapi.com")
        .prompt()
        .context("Failed to read API host")?;

    config.lang = Select::new("Response language:", Lang::all().to_vec())
        .prompt()
        .context("Failed to read language")?;

    config.unit = Select::new("Units (m = metric, i = imperial):", UnitSystem::all().to_vec())
        .prompt()
        .context("Failed to read units")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn index_help() -> String {
    let mut help = String::from("Life index codes:\n");
    for kind in IndexKind::all() {
        help.push_str(&format!(
            "  {:>2}: {} ({})\n",
            kind.code(),
            kind.name(Lang::En),
            kind.name(Lang::Zh)
        ));
    }
    help.push_str("\nEnvironment:\n  QWEATHER_API_KEY   API key (required unless stored via `qweather configure`)\n");
    help.push_str("  QWEATHER_API_HOST  API host override\n");
    help
}
