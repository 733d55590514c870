//! `brief digest`: argument parsing and a single engine run over a snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use brief_core::{EngineConfig, SystemClock};
use brief_runtime::{DigestEngine, DigestReport, DigestRequest};
use chrono::{DateTime, Utc};
use tracing::info;

/// Config file read when `--config` is not given. Absent means defaults.
const DEFAULT_CONFIG_FILE: &str = "brief.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    pub snapshot: PathBuf,
    pub now: Option<DateTime<Utc>>,
    pub config: PathBuf,
}

impl ReplayArgs {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut snapshot = None;
        let mut now = None;
        let mut config = PathBuf::from(DEFAULT_CONFIG_FILE);

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--now" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--now needs a value"))?;
                    let parsed = DateTime::parse_from_rfc3339(value)
                        .with_context(|| format!("Invalid --now timestamp: {}", value))?;
                    now = Some(parsed.with_timezone(&Utc));
                }
                "--config" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--config needs a value"))?;
                    config = PathBuf::from(value);
                }
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                path => {
                    if snapshot.is_some() {
                        bail!("Unexpected argument: {}", path);
                    }
                    snapshot = Some(PathBuf::from(path));
                }
            }
        }

        let snapshot = snapshot.ok_or_else(|| anyhow!("Missing snapshot path"))?;
        Ok(Self {
            snapshot,
            now,
            config,
        })
    }
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<DigestRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let request: DigestRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    Ok(request)
}

pub fn run(args: &ReplayArgs) -> anyhow::Result<DigestReport> {
    let config = EngineConfig::load(&args.config)
        .map_err(|e| anyhow!("Failed to load config: {}", e))?;
    let request = load_snapshot(&args.snapshot)?;
    let now = args.now.unwrap_or_else(Utc::now);

    info!(
        "Replaying {} messages against {} topics from {}",
        request.messages.len(),
        request.topics.len(),
        args.snapshot.display()
    );

    let engine = DigestEngine::new(config, Arc::new(SystemClock));
    Ok(engine.run(&request, now))
}
