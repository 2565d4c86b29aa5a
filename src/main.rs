// Copyright 2026 Formfill Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use formfill::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "formfill",
    about = "formfill — semantic job-application form filler",
    version,
    after_help = "Run 'formfill <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a job-application form at the given URL
    Fill {
        /// Page URL to fill
        url: String,
        /// Profile name (defaults to the selected profile)
        #[arg(long)]
        profile: Option<String>,
        /// Navigation timeout in milliseconds
        #[arg(long, default_value = "30000")]
        timeout: u64,
    },
    /// Run the localhost REST API
    Serve {
        /// HTTP port to listen on
        #[arg(long, default_value = "7350")]
        port: u16,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Manage candidate profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List stored profiles
    List,
    /// Add or update a profile from a JSON file
    Add { name: String, file: PathBuf },
    /// Select the profile used by default
    Select { name: String },
    /// Remove a stored profile
    Remove { name: String },
    /// Print a profile in its normalised form
    Show { name: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Mirror global flags into environment variables so all modules can
    // check them without threading a config struct around.
    if cli.json {
        std::env::set_var("FORMFILL_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("FORMFILL_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("FORMFILL_VERBOSE", "1");
    }

    let default_level = if cli.verbose {
        "formfill=debug"
    } else {
        "formfill=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fill {
            url,
            profile,
            timeout,
        } => cli::fill_cmd::run(&url, profile.as_deref(), timeout).await,
        Commands::Serve { port } => cli::serve_cmd::run(port).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Profile { action } => match action {
            ProfileAction::List => cli::profile_cmd::run_list(),
            ProfileAction::Add { name, file } => cli::profile_cmd::run_add(&name, &file),
            ProfileAction::Select { name } => cli::profile_cmd::run_select(&name),
            ProfileAction::Remove { name } => cli::profile_cmd::run_remove(&name),
            ProfileAction::Show { name } => cli::profile_cmd::run_show(name.as_deref()),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "formfill", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
