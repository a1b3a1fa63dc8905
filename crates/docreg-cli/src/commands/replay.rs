//! `docreg replay` — Execute a JSON script of registry operations.
//!
//! The script is a JSON array of commands tagged by `op`, e.g.
//! `{"op": "verify_document", "caller": "0xv", "document_id": 1}`.
//! A `submit_document` step may name a `file` instead of a `content_hash`;
//! the file's BLAKE3 digest is used as the hash.

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use docreg_core::Address;
use docreg_registry::{CommandOutcome, RegistryCommand, RegistryService};

use crate::commands::hash::content_hash;
use crate::config::DocregConfig;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the JSON script.
    pub script: PathBuf,

    /// Write the final registry snapshot as JSON to this path.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Stop at the first failing step.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Result of one script step, printed as a JSON line.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CommandOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    fn failed(step: usize, op: String, error: String) -> Self {
        Self {
            step,
            op,
            ok: false,
            outcome: None,
            error: Some(error),
        }
    }
}

/// Install the configured owner and verifiers on a fresh registry.
pub fn provision(registry: &RegistryService, config: &DocregConfig) -> anyhow::Result<()> {
    let Some(owner) = config.registry.owner.as_deref() else {
        if !config.registry.verifiers.is_empty() {
            anyhow::bail!("registry.verifiers requires registry.owner to be set");
        }
        return Ok(());
    };

    let owner = Address::new(owner);
    registry.initialize(owner.clone())?;
    for verifier in &config.registry.verifiers {
        registry.add_verifier(&owner, &Address::new(verifier.as_str()))?;
    }
    tracing::info!(
        owner = %owner,
        verifiers = config.registry.verifiers.len(),
        "registry provisioned from config"
    );
    Ok(())
}

/// Replace a `file` field on a `submit_document` step with its content hash.
/// Relative paths resolve against `base_dir`.
fn resolve_file_hash(step: &mut serde_json::Value, base_dir: &Path) -> anyhow::Result<()> {
    let Some(fields) = step.as_object_mut() else {
        return Ok(());
    };
    if fields.get("op").and_then(|op| op.as_str()) != Some("submit_document")
        || fields.contains_key("content_hash")
    {
        return Ok(());
    }
    let Some(file) = fields.remove("file") else {
        return Ok(());
    };
    let file = file
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("`file` must be a string"))?;
    let path = base_dir.join(file);
    let digest = content_hash(&path)?;
    tracing::debug!(path = %path.display(), %digest, "hashed document file");
    fields.insert("content_hash".into(), serde_json::Value::String(digest));
    Ok(())
}

/// Execute every step in order, stopping early only when `fail_fast` is set.
pub fn replay_steps(
    registry: &RegistryService,
    steps: Vec<serde_json::Value>,
    base_dir: &Path,
    fail_fast: bool,
) -> Vec<StepReport> {
    let mut reports = Vec::with_capacity(steps.len());

    for (index, mut step) in steps.into_iter().enumerate() {
        let step_no = index + 1;
        let op = step
            .get("op")
            .and_then(|op| op.as_str())
            .unwrap_or("<missing>")
            .to_string();

        let parsed = resolve_file_hash(&mut step, base_dir).and_then(|()| {
            serde_json::from_value::<RegistryCommand>(step).map_err(anyhow::Error::from)
        });
        let report = match parsed {
            Err(e) => StepReport::failed(step_no, op, format!("invalid step: {}", e)),
            Ok(command) => match registry.execute(command) {
                Ok(outcome) => StepReport {
                    step: step_no,
                    op,
                    ok: true,
                    outcome: Some(outcome),
                    error: None,
                },
                Err(e) => StepReport::failed(step_no, op, e.to_string()),
            },
        };

        let stop = fail_fast && !report.ok;
        reports.push(report);
        if stop {
            break;
        }
    }

    reports
}

pub fn run(args: &ReplayArgs, config: &DocregConfig) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&args.script)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.script.display(), e))?;
    let steps: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("script must be a JSON array of steps: {}", e))?;
    let base_dir = args
        .script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let registry = RegistryService::with_system_clock();
    provision(&registry, config)?;

    let reports = replay_steps(&registry, steps, &base_dir, args.fail_fast);
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }

    let failures = reports.iter().filter(|r| !r.ok).count();
    tracing::info!(
        steps = reports.len(),
        failures,
        documents = registry.document_count(),
        "replay finished"
    );

    if let Some(path) = &args.snapshot {
        std::fs::write(path, registry.snapshot().to_json_pretty()?)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    if args.fail_fast && failures > 0 {
        anyhow::bail!("replay stopped at a failing step");
    }
    Ok(())
}
