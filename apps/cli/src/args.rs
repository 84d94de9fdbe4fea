use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub db_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub stale_after: Option<u64>,
    pub json: bool,
    pub init_db: bool,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --db".to_string())?;
                parsed.db_path = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_string())?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--stale-after" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --stale-after".to_string())?;
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --stale-after value: {value}"))?;
                parsed.stale_after = Some(secs);
            }
            "--json" => {
                parsed.json = true;
            }
            "--init-db" => {
                parsed.init_db = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

pub fn print_help() {
    println!(
        "TReqS Monitor\n\n\
Usage:\n  treqs-monitor [--db <path>] [--config <path>] [--stale-after <secs>] [--json] [--init-db]\n\n\
Options:\n  --db <path>           Scheduler database to report on (overrides the config file)\n  --config <path>       Config file to use instead of the default location\n  --stale-after <secs>  Heartbeat age after which the scheduler is reported stale\n  --json                Print the report as JSON\n  --init-db             Create missing scheduler tables before reporting\n  -h, --help            Show this help message\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_overrides() {
        let parsed = parse_from(args(&["--db", "/tmp/s.sqlite", "--stale-after", "120", "--json"]))
            .expect("args");
        assert_eq!(parsed.db_path, Some(PathBuf::from("/tmp/s.sqlite")));
        assert_eq!(parsed.stale_after, Some(120));
        assert!(parsed.json);
        assert!(!parsed.init_db);
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = parse_from(args(&["--stale-after", "soon"])).expect_err("bad value");
        assert!(err.contains("soon"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_from(args(&["--port", "80"])).is_err());
        assert!(parse_from(args(&["--db"])).is_err());
    }
}
