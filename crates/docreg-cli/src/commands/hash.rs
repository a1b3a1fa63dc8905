//! `docreg hash` — Print the content hash a document would be submitted with.

use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct HashArgs {
    /// File to hash.
    pub file: PathBuf,
}

/// Hex-encoded BLAKE3 digest of a file's contents.
pub fn content_hash(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
    Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
}

pub fn run(args: &HashArgs) -> anyhow::Result<()> {
    println!("{}", content_hash(&args.file)?);
    Ok(())
}
