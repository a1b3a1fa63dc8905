//! `docreg init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use crate::config::DocregConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Verifier principal to provision (repeatable).
    #[arg(long = "verifier")]
    pub verifiers: Vec<String>,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

/// Write a fresh config at `path`. `owner` comes from the global `--owner` flag.
pub fn run(args: &InitArgs, path: &Path, owner: Option<String>) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = DocregConfig::default();
    config.registry.owner = owner;
    config.registry.verifiers = args.verifiers.clone();
    config.save(path)?;

    tracing::info!(path = %path.display(), "wrote default config");
    println!("Wrote {}", path.display());
    Ok(())
}
