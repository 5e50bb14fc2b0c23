use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::Clock;
use services::{
    AppServices, ClientConfig, ProfileService, QuizSessionController, SessionStore, TopicService,
};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
    InvalidQuestionCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::InvalidQuestionCount { raw } => {
                write!(f, "invalid --questions value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn session_store(&self) -> Arc<SessionStore> {
        self.services.session_store()
    }

    fn quiz(&self) -> Arc<QuizSessionController> {
        self.services.quiz()
    }

    fn topics(&self) -> Arc<TopicService> {
        self.services.topics()
    }

    fn profile(&self) -> Arc<ProfileService> {
        self.services.profile()
    }
}

struct Args {
    db_url: String,
    config: ClientConfig,
    verbose: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui   [--db <sqlite_url>] [--api-url <url>] [--questions <n>] [--verbose]"
    );
    eprintln!("  cargo run -p app -- demo [--questions <n>] [--verbose]  # offline, built-in catalogue");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:studybot.sqlite3");
    eprintln!("  --api-url http://localhost:8000");
    eprintln!("  --questions 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDYBOT_DB_URL, STUDYBOT_API_URL, STUDYBOT_HTTP_TIMEOUT_SECS,");
    eprintln!("  STUDYBOT_QUESTION_COUNT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("STUDYBOT_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://studybot.sqlite3".into(), normalize_sqlite_url);
        let mut config = ClientConfig::from_env();
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    let trimmed = value.trim();
                    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    config = config.with_api_base_url(trimmed);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let parsed: u32 = value
                        .parse()
                        .ok()
                        .filter(|count| *count > 0)
                        .ok_or_else(|| ArgsError::InvalidQuestionCount { raw: value.clone() })?;
                    config = config.with_question_count(parsed);
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            config,
            verbose,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI against the configured API.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with('-') => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with('-') {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(parsed.verbose);

    let clock = Clock::system();
    let services = match cmd {
        Command::Ui => {
            prepare_sqlite_file(&parsed.db_url)?;
            tracing::info!(db = %parsed.db_url, "opening token store");
            AppServices::new_sqlite(&parsed.db_url, &parsed.config, clock).await?
        }
        Command::Demo => {
            tracing::info!("starting with the built-in demo server; sign in as demo@example.com / demo");
            AppServices::demo(clock, parsed.config.question_count)
        }
    };

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("LLM Learning Bot")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn memory_url_is_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }

    #[test]
    fn relative_path_becomes_absolute_url() {
        let url = normalize_sqlite_url("sqlite:data/bot.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/bot.sqlite3"), "{url}");
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&["--api-url", "https://quiz.example", "--questions", "5", "--verbose"])
            .expect("parse");
        assert_eq!(args.config.api_base_url, "https://quiz.example");
        assert_eq!(args.config.question_count, 5);
        assert!(args.verbose);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--questions", "0"]),
            Err(ArgsError::InvalidQuestionCount { .. })
        ));
        assert!(matches!(
            parse(&["--api-url", "ftp://x"]),
            Err(ArgsError::InvalidApiUrl { .. })
        ));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::MissingValue { flag: "--db" })));
        assert!(matches!(parse(&["--nope"]), Err(ArgsError::UnknownArg(_))));
    }
}
