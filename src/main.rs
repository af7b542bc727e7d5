// WireGuard Bulk Lifecycle CLI

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use wg_fleet::{
    config,
    keygen::{self, StdinConfirm},
    peers, report,
    runner::SystemRunner,
    scanner, wg_controller,
};

#[derive(Parser)]
#[command(name = "wg-fleet")]
#[command(about = "Bulk lifecycle operations for WireGuard tunnels", long_about = None)]
struct Args {
    /// List all currently active tunnels
    #[arg(short, long)]
    list: bool,

    /// Start all tunnels that have a config file
    #[arg(short, long)]
    start: bool,

    /// Kill all active tunnels that have a config file
    #[arg(short, long)]
    kill: bool,

    /// List all parsed tunnel config files
    #[arg(short = 'c', long = "list-configs")]
    list_configs: bool,

    /// Generate a WireGuard keypair
    #[arg(short = 'g', long = "generate-keys")]
    generate_keys: bool,

    /// Print debug oriented output (parsed configs and the raw peer listing)
    #[arg(short, long)]
    debug: bool,

    /// Path to the settings file (default: wg-fleet.ini next to the executable)
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl Args {
    fn has_operation(&self) -> bool {
        self.list || self.start || self.kill || self.list_configs || self.generate_keys
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // A bare invocation prints the full usage text and exits unsuccessfully.
    if !args.has_operation() {
        eprintln!("{}", Args::command().render_help());
        std::process::exit(1);
    }

    let settings_path = match args.settings.clone() {
        Some(path) => path,
        None => config::default_settings_path()?,
    };
    let settings = config::load_settings(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    let filter = if args.debug {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    log::debug!("Settings loaded from {}", settings_path.display());
    log::debug!("Config directory: {}", settings.config_dir.display());
    log::debug!("Start exceptions: {:?}", settings.exceptions.start);
    log::debug!("Kill exceptions: {:?}", settings.exceptions.kill);

    let runner = SystemRunner;
    let active_peers = peers::query_active_peers(&runner)?;
    let configs = scanner::scan_config_dir(&settings.config_dir)?;

    // Operations run in a fixed order regardless of argv order.
    if args.list {
        print!("{}", report::render_active(&active_peers, &configs));
    }
    if args.start {
        wg_controller::start_all(&runner, &configs, &active_peers, &settings.exceptions.start)?;
    }
    if args.kill {
        wg_controller::kill_all(&runner, &configs, &active_peers, &settings.exceptions.kill)?;
    }
    if args.list_configs {
        print!("{}", report::render_configs(&configs));
    }
    if args.generate_keys {
        let mut confirm = StdinConfirm;
        keygen::generate_keys(&runner, &mut confirm, &settings)?;
    }

    Ok(())
}
