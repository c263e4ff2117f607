//! Correction records.
//!
//! Every artifact the CLI writes gets a `<stem>.record.json` beside it naming
//! the drawing and context files that produced it, the settings in force and
//! a short summary of what the correction did to the work-unit area.

use anyhow::{Context, Result};
use reshape::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Summary of a correction result against the polygon it started from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationType>,
    pub area_before: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_after: Option<f64>,
    pub added_pockets: usize,
    pub removed_pockets: usize,
    pub affected_stands: usize,
    pub partial_stands: usize,
}

impl Outcome {
    pub fn of(result: &CorrectionResult, before: &Polygon) -> Self {
        let mut out = Self {
            status: match result {
                CorrectionResult::Success(_) => "success",
                CorrectionResult::Failure { .. } => "failure",
                CorrectionResult::NeedsConfirmation { .. } => "needs_confirmation",
            },
            message: result.message().to_string(),
            operation: None,
            area_before: before.area(),
            area_after: None,
            added_pockets: 0,
            removed_pockets: 0,
            affected_stands: 0,
            partial_stands: 0,
        };
        if let Some(s) = result.success() {
            out.operation = Some(s.operation);
            out.area_after = Some(s.new_polygon.area());
            out.added_pockets = s.added_pockets.len();
            out.removed_pockets = s.removed_pockets.len();
            out.affected_stands = s.stands_affected.len();
            out.partial_stands = s.partial_stand_ids.len();
        }
        out
    }
}

/// One correction run: the drawing, its context files and the outcome.
#[derive(Clone, Debug, Serialize)]
pub struct Record {
    pub subcommand: &'static str,
    pub drawn: PathBuf,
    /// Polygon, work unit, stands and settings files actually passed.
    pub context: Vec<PathBuf>,
    pub cfg: CorrectionCfg,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<CorrectionChoice>,
    pub outcome: Outcome,
}

impl Record {
    pub fn new(subcommand: &'static str, drawn: &Path, cfg: CorrectionCfg, outcome: Outcome) -> Self {
        Self {
            subcommand,
            drawn: drawn.to_path_buf(),
            context: Vec::new(),
            cfg,
            choice: None,
            outcome,
        }
    }

    pub fn with_choice(mut self, choice: Option<CorrectionChoice>) -> Self {
        self.choice = choice;
        self
    }

    /// Add the context files that were given; absent flags are skipped.
    pub fn with_context<'a, I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a PathBuf>>,
    {
        self.context.extend(paths.into_iter().flatten().cloned());
        self
    }
}

#[derive(Serialize)]
struct Stamped<'a> {
    artifact: &'a Path,
    rev: String,
    version: &'static str,
    #[serde(flatten)]
    record: &'a Record,
}

/// Write the record for `artifact` beside it and return the record's path.
pub fn write_record(artifact: &Path, record: &Record) -> Result<PathBuf> {
    let path = record_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let doc = Stamped {
        artifact,
        rev: current_git_rev(),
        version: reshape::VERSION,
        record,
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "record written");
    Ok(path)
}

fn record_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "correction".to_string());
    artifact.with_file_name(format!("{stem}.record.json"))
}

/// `GIT_COMMIT` (build time, then runtime), else `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let baked = option_env!("GIT_COMMIT").map(str::to_string);
    baked
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .find(|s| !s.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
