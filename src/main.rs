use std::fs::File;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use roadtrip::api::HttpTripsApi;
use roadtrip::core::config::{self, EnvOverrides, RoadtripConfig};
use roadtrip::core::credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use roadtrip::core::session::SessionState;
use roadtrip::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "roadtrip", about = "Terminal client for Roadtrip.ai trip plans")]
struct Args {
    /// Trip service base URL (overrides ROADTRIP_API_URL and config.toml)
    #[arg(long)]
    api_url: Option<String>,

    /// Use this credential token for this run only, without saving it
    #[arg(long)]
    token: Option<String>,

    /// Log at trace level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Save a credential token obtained from the web app
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the saved credential token
    Logout,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to roadtrip.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    if let Ok(log_file) = File::create("roadtrip.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Using default config: {}", e);
        RoadtripConfig::default()
    });
    let resolved = config::resolve(&file_config, &EnvOverrides::from_env(), args.api_url.as_deref());
    log::info!("Roadtrip starting up against {}", resolved.api_base_url);

    let store: Arc<dyn CredentialStore> = match (&args.token, resolved.credentials_file.clone()) {
        (Some(token), _) => Arc::new(MemoryCredentialStore::with_token(token)),
        (None, Some(path)) => Arc::new(FileCredentialStore::new(path)),
        (None, None) => match FileCredentialStore::default_path() {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => {
                log::warn!("No home directory; credentials will not be saved");
                Arc::new(MemoryCredentialStore::new())
            }
        },
    };
    let session = Arc::new(SessionState::restore(store));

    match args.command {
        Some(Command::Login { token }) => {
            let token = token.trim().to_string();
            if token.is_empty() {
                eprintln!("Token must not be empty.");
                std::process::exit(2);
            }
            session.login(token);
            println!("Logged in. Run `roadtrip` to see your trips.");
            Ok(())
        }
        Some(Command::Logout) => {
            session.logout();
            println!("Logged out.");
            Ok(())
        }
        None => {
            let api = Arc::new(HttpTripsApi::new(
                resolved.api_base_url.clone(),
                resolved.request_timeout,
            ));
            tui::run(resolved, session, api)
        }
    }
}
