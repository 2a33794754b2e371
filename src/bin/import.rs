use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use venturehub::{config::Config, csv_import::CsvKind, db, error::AppError, services};

struct Args {
    kind: CsvKind,
    file: PathBuf,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut kind = None;
    let mut file = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--entity" => {
                let value = iter.next().ok_or_else(|| anyhow!("--entity needs a value"))?;
                kind = Some(
                    CsvKind::parse(value)
                        .ok_or_else(|| anyhow!("unknown entity '{}'", value))?,
                );
            }
            "--file" => {
                let value = iter.next().ok_or_else(|| anyhow!("--file needs a value"))?;
                file = Some(PathBuf::from(value));
            }
            other => bail!("unexpected argument '{}'", other),
        }
    }
    match (kind, file) {
        (Some(kind), Some(file)) => Ok(Args { kind, file }),
        _ => bail!("usage: venturehub-import --entity <investors|startups|mentors|tools> --file <path>"),
    }
}

async fn run(args: Args) -> anyhow::Result<u64> {
    let input = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let config = Config::from_env()?;
    let db = db::connect(&config).await.context("failed to connect to database")?;

    match services::import_csv(&db, args.kind, &input).await {
        Ok(inserted) => Ok(inserted),
        Err(AppError::InvalidCsv(errors)) => {
            for line in &errors {
                error!("{}", line);
            }
            bail!("{} row error(s); nothing was imported", errors.len())
        }
        Err(other) => Err(other.into()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let entity = args.kind.as_str();
    match run(args).await {
        Ok(inserted) => {
            info!("imported {} {}", inserted, entity);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("import failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&argv(&["--entity", "mentors", "--file", "m.csv"])).unwrap();
        assert_eq!(args.kind, CsvKind::Mentors);
        assert_eq!(args.file, PathBuf::from("m.csv"));
    }

    #[test]
    fn test_parse_args_rejects_unknown_entity_and_missing_file() {
        assert!(parse_args(&argv(&["--entity", "founders", "--file", "f.csv"])).is_err());
        assert!(parse_args(&argv(&["--entity", "tools"])).is_err());
    }
}
