use std::fmt;
use std::io;

use clap::Parser;
use services::{AppServices, Clock};

mod cli;
mod commands;
mod practice;
mod telemetry;

use cli::{Cli, Command};
use commands::{NewQuestion, PracticeOptions};

#[derive(Debug)]
pub enum ArgsError {
    UnknownSet { raw: String },
    InvalidCorrect { raw: usize },
    InvalidDbUrl { raw: String },
    ResetNotConfirmed,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::UnknownSet { raw } => write!(f, "no set named or identified by {raw:?}"),
            ArgsError::InvalidCorrect { raw } => {
                write!(f, "invalid --correct value: {raw} (options are numbered from 1)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::ResetNotConfirmed => {
                write!(f, "reset deletes every set; pass --yes to confirm")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn is_in_memory(db_url: &str) -> bool {
    db_url == "sqlite::memory:" || db_url.contains("mode=memory")
}

fn normalize_sqlite_url(raw: &str) -> Result<String, ArgsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    if is_in_memory(trimmed) || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if is_in_memory(db_url) {
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    telemetry::init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    let db_url = normalize_sqlite_url(&cli.db_url)?;
    prepare_sqlite_file(&db_url)?;
    let clock = Clock::default_clock();
    let mut services = AppServices::new_sqlite(&db_url, clock).await?;

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Sets => commands::list_sets(services.bank().bank(), &mut out),
        Command::Tags => commands::list_tags(services.bank().bank(), &mut out),
        Command::AddSet { name, description } => {
            commands::add_set(&mut services, &name, description, &mut out).await
        }
        Command::AddQuestion {
            set,
            prompt,
            options,
            correct,
            explanation,
            tags,
        } => {
            let question = NewQuestion {
                set,
                prompt,
                options,
                correct,
                explanation,
                tags,
            };
            commands::add_question(&mut services, question, &mut out).await
        }
        Command::RemoveSet { set } => commands::remove_set(&mut services, &set, &mut out).await,
        Command::Export { out: path } => commands::export(&services, path, &mut out),
        Command::Import { file } => commands::import(&mut services, &file, &mut out).await,
        Command::Practice {
            sets,
            tags,
            count,
            seed,
        } => {
            let options = PracticeOptions {
                sets,
                tags,
                count,
                seed,
            };
            let mut input = io::stdin().lock();
            commands::practice(&mut services, clock, options, &mut input, &mut out)
        }
        Command::Seed => commands::seed(&mut services, &mut out).await,
        Command::Reset { yes } => commands::reset(&mut services, yes, &mut out).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_full_and_in_memory_urls() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:file:quiz?mode=memory&cache=shared").unwrap(),
            "sqlite:file:quiz?mode=memory&cache=shared"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.sqlite3").unwrap(),
            "sqlite:///tmp/quiz.sqlite3"
        );
    }

    #[test]
    fn absolutizes_bare_paths() {
        assert_eq!(
            normalize_sqlite_url("/var/lib/quiz.db").unwrap(),
            "sqlite:///var/lib/quiz.db"
        );
        let relative = normalize_sqlite_url("sqlite:quiz.db").unwrap();
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("quiz.db"));
    }

    #[test]
    fn default_database_url_is_absolute() {
        let cli = Cli::try_parse_from(["quiz", "sets"]).unwrap();
        assert_eq!(cli.db_url, "sqlite:quiz.sqlite3");

        let url = normalize_sqlite_url(&cli.db_url).unwrap();
        assert!(url.starts_with("sqlite:///"), "not absolute: {url}");
        assert!(url.ends_with("/quiz.sqlite3"));
    }

    #[test]
    fn rejects_blank_url() {
        assert!(matches!(
            normalize_sqlite_url("   "),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
    }

    #[test]
    fn in_memory_needs_no_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
