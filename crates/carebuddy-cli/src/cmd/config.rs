use crate::cmd::Session;
use crate::output::{print_fields, print_json};
use anyhow::Context;
use carebuddy_core::config::{ConsoleConfig, WarnLevel};
use carebuddy_core::paths;
use clap::Subcommand;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a default .carebuddy/config.yaml under the console root
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(session: &Session, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init { force } => init(session, force),
        ConfigSubcommand::Show => show(session),
        ConfigSubcommand::Validate => validate(session),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(session: &Session, force: bool) -> anyhow::Result<()> {
    let path = paths::config_path(&session.root);
    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    let mut config = ConsoleConfig::default();
    if let Some(url) = &session.api_url {
        config.api_url = url.clone();
    }
    config
        .save(&session.root)
        .context("failed to write config")?;

    if session.json {
        let value = serde_json::json!({
            "path": path,
            "config": config,
        });
        return print_json(&value);
    }
    println!("Wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(session: &Session) -> anyhow::Result<()> {
    let config = session.config()?;

    if session.json {
        return print_json(&config);
    }
    print_fields(&[
        ("API URL", config.api_base().to_string()),
        ("Default period", config.default_period.to_string()),
        ("Documents", config.accepted_extensions.join(", ")),
    ]);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(session: &Session) -> anyhow::Result<()> {
    let config = session.config()?;
    let warnings = config.validate();

    if session.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
