mod account_cmd;
mod app;
mod browse_cmd;
mod config;
mod favorites_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use countrydex::catalog;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "countrydex",
    version,
    about = "Browse countries and keep per-user favorites",
    long_about = "A country catalog browser backed by the REST Countries API. Favorites and recently viewed countries are kept per signed-in user in a local store."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in (any username and password are accepted)
    Login {
        username: String,

        /// Password (required but not checked)
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List countries, optionally filtered
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// Only show countries in this region
        #[arg(short, long)]
        region: Option<catalog::Region>,
    },

    /// Show country details (recorded in your history)
    Show {
        /// Country code (cca3), e.g. USA
        code: String,
    },

    /// Toggle a country in your favorites
    Fav {
        /// Country code (cca3)
        code: String,
    },

    /// List your favorite countries
    Favorites,

    /// List recently viewed countries
    Recent,

    /// Summary of the catalog and your activity
    Dashboard,

    /// Global population statistics
    Stats,

    /// Show or change the theme preference
    Theme {
        #[arg(value_enum)]
        action: Option<account_cmd::ThemeAction>,
    },

    /// Remove your favorites and history
    ClearData,

    /// Show configuration
    Config {
        /// Write the default config file
        #[arg(long)]
        create: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("countrydex={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Config { create } = cli.command {
        return config::show_config(create);
    }

    let app = app::App::open()?;

    match cli.command {
        Commands::Login { username, password } => {
            account_cmd::run_login(&app, &username, &password)?;
        }

        Commands::Logout => {
            account_cmd::run_logout(&app)?;
        }

        Commands::Whoami => {
            account_cmd::run_whoami(&app)?;
        }

        Commands::List { search, region } => {
            browse_cmd::run_list(&app, search.as_deref(), region, cli.verbose)?;
        }

        Commands::Show { code } => {
            browse_cmd::run_show(&app, &code)?;
        }

        Commands::Fav { code } => {
            favorites_cmd::run_toggle(&app, &code)?;
        }

        Commands::Favorites => {
            favorites_cmd::run_favorites(&app)?;
        }

        Commands::Recent => {
            favorites_cmd::run_recent(&app)?;
        }

        Commands::Dashboard => {
            browse_cmd::run_dashboard(&app)?;
        }

        Commands::Stats => {
            browse_cmd::run_stats(&app)?;
        }

        Commands::Theme { action } => {
            account_cmd::run_theme(&app, action)?;
        }

        Commands::ClearData => {
            account_cmd::run_clear_data(&app)?;
        }

        Commands::Config { create } => {
            config::show_config(create)?;
        }
    }

    Ok(())
}
