use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    app::{get_config_dir, load_config, Config},
    cli::{connect, handle_command, print_upload, Cli, Commands},
    constants::UI_EVENT_CHANNEL_SIZE,
    tui::{run_ui, App},
    upload::{LinkNavigator, UploadController},
    utils::init_logger,
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        setup_logging(&cli)?;

        // Load configuration; only an explicitly named file is fatal
        let mut config = match load_config(cli.config.as_deref()) {
            Ok(cfg) => cfg,
            Err(e) if cli.config.is_some() => return Err(e),
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                eprintln!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        };
        apply_overrides(&mut config, &cli);

        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(()); // Command handled, exit
            }
        }

        let transport = connect(&self.config)?;
        let (tx, rx) = mpsc::channel(UI_EVENT_CHANNEL_SIZE);
        let controller =
            UploadController::new(LinkNavigator::default(), &self.config.ui.default_extension);
        let app = App::new(controller, transport, tx, self.config.server.base_url.clone());

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);
        if let Some(uploaded) = run_ui(app, rx, tick_rate).await? {
            info!(link = %uploaded.frontend_url, "leaving upload form");
            print_upload(&uploaded);
        }

        Ok(())
    }
}

/// Command-line flags win over every configuration source
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(token) = &cli.token {
        config.server.api_token = Some(token.clone());
    }
}

/// Logs go to `--log-file`; verbose TUI sessions fall back to a file in the config dir
fn setup_logging(cli: &Cli) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Commands::Ui));

    let target: Option<PathBuf> = match (&cli.log_file, cli.verbose, interactive) {
        (Some(path), _, _) => Some(path.clone()),
        (None, true, false) => return init_logger(None),
        (None, true, true) => {
            let dir = get_config_dir()?;
            std::fs::create_dir_all(&dir)?;
            Some(dir.join("tempfiles.log"))
        }
        (None, false, _) => None,
    };

    match target {
        Some(path) => init_logger(Some(&path)),
        None => Ok(()),
    }
}
