//! ansinv CLI tool.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ansinv")]
#[command(about = "Inspect INI inventories", long_about = None)]
struct Cli {
    /// Inventory file
    #[arg(short, long, env = "ANSINV_INVENTORY", default_value = "hosts")]
    inventory: String,

    /// Coercion policy file (KDL)
    #[arg(long, env = "ANSINV_POLICY")]
    policy: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the inventory
    Validate,
    /// List groups with their member counts
    Groups,
    /// List hosts
    Hosts {
        /// Only hosts of this group
        #[arg(long)]
        group: Option<String>,
    },
    /// Show one host
    Show {
        /// Group name
        group: String,
        /// Hostname
        host: String,
    },
    /// Dump resolved variables without coercion
    Vars {
        /// Only hosts of this group
        #[arg(long)]
        group: Option<String>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let ctx = commands::Context {
        inventory: cli.inventory,
        policy: cli.policy,
        json: cli.json,
    };

    match cli.command {
        Commands::Validate => commands::validate(&ctx)?,
        Commands::Groups => commands::hosts::groups(&ctx)?,
        Commands::Hosts { group } => commands::hosts::list(&ctx, group.as_deref())?,
        Commands::Show { group, host } => commands::hosts::show(&ctx, &group, &host)?,
        Commands::Vars { group } => commands::vars::dump(&ctx, group.as_deref())?,
    }

    Ok(())
}
