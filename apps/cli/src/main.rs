mod args;
mod config;
mod render;

use std::io;

use monitor_app::{ApiError, AppConfig, AppState, ReportOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create(args.config_path.as_deref()).map_err(io::Error::other)?;
    if config.created {
        eprintln!("Created config at {}.", config.file.display());
    }

    let mut app_config = AppConfig::new(args.db_path.unwrap_or(config.config.db_path));
    app_config.stale_threshold_secs = config.config.stale_threshold_secs;
    tracing::debug!(db = %app_config.db_path.display(), "using scheduler database");
    let app_state = AppState::new(app_config);

    if args.init_db {
        app_state
            .setup_db()
            .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;
    }

    let options = ReportOptions {
        stale_threshold_secs: args.stale_after,
    };
    let report = match app_state.services.dashboard.report(&options) {
        Ok(report) => report,
        Err(err) => {
            if args.json {
                let api = ApiError::from(err);
                println!("{}", serde_json::to_string_pretty(&api)?);
                return Err(io::Error::other(api.message).into());
            }
            return Err(io::Error::other(format!("failed to build report: {}", err)).into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }

    Ok(())
}
