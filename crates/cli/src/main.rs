use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use reshape::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod io;
mod record;
mod report;

use record::{write_record, Outcome, Record};

#[derive(Parser)]
#[command(name = "reshape-cli")]
#[command(about = "Work-unit boundary corrections from drawn lines and polygons")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Inputs and outputs shared by the correcting subcommands.
#[derive(Args, Debug, Clone)]
struct Common {
    /// Work-unit polygon (JSON rings); defaults to the work unit's own polygon
    #[arg(long)]
    polygon: Option<PathBuf>,
    /// Work unit with its held stands (JSON)
    #[arg(long)]
    work_unit: Option<PathBuf>,
    /// Stand inventory for the forest (JSON list of stands)
    #[arg(long)]
    stands: Option<PathBuf>,
    /// Correction settings (JSON); missing fields keep their defaults
    #[arg(long)]
    cfg: Option<PathBuf>,
    /// Correction result (JSON)
    #[arg(long)]
    out: PathBuf,
    /// Per-stand CSV report of a successful correction
    #[arg(long)]
    report: Option<PathBuf>,
    /// Stage and confirm a successful correction, writing the updated work unit
    #[arg(long)]
    confirmed: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Action {
    /// Correct the boundary with an open polyline
    Line {
        #[arg(long)]
        line: PathBuf,
        #[command(flatten)]
        common: Common,
    },
    /// Classify a drawn closed polygon against the work unit
    Analyze {
        #[arg(long)]
        polygon: PathBuf,
        #[arg(long)]
        drawn: PathBuf,
    },
    /// Correct the boundary with a drawn closed polygon
    Polygon {
        #[arg(long)]
        drawn: PathBuf,
        /// Required when the drawn polygon straddles the boundary
        #[arg(long, value_enum)]
        choice: Option<ChoiceArg>,
        #[command(flatten)]
        common: Common,
    },
    /// Print the build revision and default settings
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChoiceArg {
    Add,
    Remove,
}

impl From<ChoiceArg> for CorrectionChoice {
    fn from(c: ChoiceArg) -> Self {
        match c {
            ChoiceArg::Add => CorrectionChoice::Add,
            ChoiceArg::Remove => CorrectionChoice::Remove,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Line { line, common } => line_cmd(&line, &common).map(|_| ()),
        Action::Analyze { polygon, drawn } => {
            let class = analyze_cmd(&polygon, &drawn)?;
            println!("{}", serde_json::to_string_pretty(&json!({ "class": class }))?);
            Ok(())
        }
        Action::Polygon {
            drawn,
            choice,
            common,
        } => polygon_cmd(&drawn, choice.map(Into::into), &common).map(|_| ()),
        Action::Report => report(),
    }
}

/// Loaded correction context.
struct Inputs {
    polygon: Polygon,
    work_unit: WorkUnit,
    inventory: MemoryInventory,
    cfg: CorrectionCfg,
}

impl Inputs {
    fn load(common: &Common) -> Result<Self> {
        let mut work_unit: WorkUnit =
            io::read_json_or(common.work_unit.as_deref(), WorkUnit::default)?;
        let polygon = match (&common.polygon, &work_unit.polygon) {
            (Some(p), _) => io::read_json::<Polygon>(p)?,
            (None, Some(p)) => p.clone(),
            (None, None) => bail!("no work-unit polygon: pass --polygon or a work unit with one"),
        };
        if work_unit.polygon.is_none() {
            work_unit.polygon = Some(polygon.clone());
        }
        let stands: Vec<Stand> = io::read_json_or(common.stands.as_deref(), Vec::new)?;
        let cfg: CorrectionCfg = io::read_json_or(common.cfg.as_deref(), CorrectionCfg::default)?;
        tracing::debug!(
            stands = stands.len(),
            held = work_unit.stands.len(),
            forest = ?work_unit.forest,
            "inputs_loaded"
        );
        Ok(Self {
            polygon,
            work_unit,
            inventory: MemoryInventory::new(stands),
            cfg,
        })
    }

    fn corrector(&self) -> Corrector<'_, GeoEngine, &MemoryInventory> {
        Corrector::new(GeoEngine, &self.inventory, &self.work_unit).with_cfg(self.cfg)
    }
}

fn line_cmd(line: &Path, common: &Common) -> Result<CorrectionResult> {
    let inputs = Inputs::load(common)?;
    let drawn: Polyline = io::read_json(line)?;
    tracing::info!(points = drawn.pts.len(), "line");
    let result = inputs.corrector().apply_correction_line(&drawn, &inputs.polygon);
    let outcome = Outcome::of(&result, &inputs.polygon);
    let record = Record::new("line", line, inputs.cfg, outcome);
    write_outputs(inputs, &result, common, record)?;
    Ok(result)
}

fn analyze_cmd(polygon: &Path, drawn: &Path) -> Result<PolygonClass> {
    let polygon: Polygon = io::read_json(polygon)?;
    let drawn: Polygon = io::read_json(drawn)?;
    let unit = WorkUnit::new(None, Some(polygon.clone()));
    let class = Corrector::new(GeoEngine, MemoryInventory::new(Vec::new()), &unit)
        .analyze_drawn_polygon(&drawn, &polygon);
    tracing::info!(?class, "analyze");
    Ok(class)
}

fn polygon_cmd(
    drawn: &Path,
    choice: Option<CorrectionChoice>,
    common: &Common,
) -> Result<CorrectionResult> {
    let inputs = Inputs::load(common)?;
    let shape: Polygon = io::read_json(drawn)?;
    tracing::info!(rings = shape.rings.len(), ?choice, "polygon");
    let result = {
        let corrector = inputs.corrector();
        match choice {
            Some(c) => corrector.apply_correction_polygon_with_choice(&shape, &inputs.polygon, c),
            None => corrector.apply_correction_polygon(&shape, &inputs.polygon),
        }
    };
    let outcome = Outcome::of(&result, &inputs.polygon);
    let record = Record::new("polygon", drawn, inputs.cfg, outcome).with_choice(choice);
    write_outputs(inputs, &result, common, record)?;
    Ok(result)
}

/// Result JSON, then the optional report and confirmed work unit, each with
/// its correction record.
fn write_outputs(
    inputs: Inputs,
    result: &CorrectionResult,
    common: &Common,
    record: Record,
) -> Result<()> {
    let record = record.with_context([
        common.polygon.as_ref(),
        common.work_unit.as_ref(),
        common.stands.as_ref(),
        common.cfg.as_ref(),
    ]);
    io::write_json(&common.out, result)?;
    write_record(&common.out, &record)?;

    let Some(success) = result.success() else {
        tracing::warn!(message = result.message(), "no correction applied");
        return Ok(());
    };
    if let Some(path) = &common.report {
        report::write_stand_report(success, path)?;
        write_record(path, &record)?;
    }
    if let Some(path) = &common.confirmed {
        let mut unit = inputs.work_unit;
        unit.stage_result(result);
        let summary = unit.confirm_pending();
        tracing::info!(?summary, "confirmed");
        io::write_json(path, &unit)?;
        write_record(path, &record)?;
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": record::current_git_rev(),
        "version": reshape::VERSION,
        "defaults": CorrectionCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, body).unwrap();
        p
    }

    const SQUARE: &str = "[[[0,0],[100,0],[100,100],[0,100],[0,0]]]";

    fn common(dir: &TempDir) -> Common {
        Common {
            polygon: Some(write(dir, "polygon.json", SQUARE)),
            work_unit: None,
            stands: None,
            cfg: None,
            out: dir.path().join("out/result.json"),
            report: None,
            confirmed: None,
        }
    }

    #[test]
    fn line_writes_result_and_record() {
        let dir = tempdir().unwrap();
        let line = write(&dir, "line.json", "[[100,0],[110,0],[110,100],[100,100]]");
        let c = common(&dir);
        let result = line_cmd(&line, &c).unwrap();
        assert!(result.is_success());
        let written: CorrectionResult = io::read_json(&c.out).unwrap();
        assert_eq!(written, result);
        let rec: serde_json::Value = io::read_json(&dir.path().join("out/result.record.json")).unwrap();
        assert_eq!(rec["outcome"]["operation"], "add");
        assert!((rec["outcome"]["area_after"].as_f64().unwrap() - 11000.0).abs() < 1e-6);
        let raw: serde_json::Value = io::read_json(&c.out).unwrap();
        assert_eq!(raw["status"], "success");
        assert!(raw["stands_list_affected_by_reshape_line"].is_array());
        assert!(raw.get("stands_affected").is_none());
    }

    #[test]
    fn rejected_line_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        let line = write(&dir, "line.json", "[[150,0],[160,0],[160,10],[150,10]]");
        let result = line_cmd(&line, &common(&dir)).unwrap();
        assert_eq!(result.message(), "line does not intersect polygon");
    }

    #[test]
    fn straddling_polygon_asks_then_confirms() {
        let dir = tempdir().unwrap();
        let drawn = write(&dir, "drawn.json", "[[[90,40],[110,40],[110,60],[90,60],[90,40]]]");
        let stands = write(
            &dir,
            "stands.json",
            r#"[{"compartment":1,"stand":1,"forest":3,"geometry":[[[0,0],[100,0],[100,100],[0,100],[0,0]]]}]"#,
        );
        let unit = write(
            &dir,
            "wu.json",
            &format!(
                r#"{{"forest":3,"polygon":{SQUARE},"stands":[{{"compartment":1,"stand":1,"forest":3}}]}}"#
            ),
        );
        let mut c = common(&dir);
        c.polygon = None;
        c.work_unit = Some(unit);
        c.stands = Some(stands);
        let first = polygon_cmd(&drawn, None, &c).unwrap();
        assert!(matches!(first, CorrectionResult::NeedsConfirmation { .. }));

        c.report = Some(dir.path().join("stands.csv"));
        c.confirmed = Some(dir.path().join("wu-after.json"));
        let second = polygon_cmd(&drawn, Some(CorrectionChoice::Remove), &c).unwrap();
        let s = second.success().unwrap();
        assert!((s.new_polygon.area() - 9800.0).abs() < 1e-6);
        assert!(dir.path().join("stands.csv").exists());

        let after: WorkUnit = io::read_json(c.confirmed.as_ref().unwrap()).unwrap();
        assert!((after.polygon.as_ref().unwrap().area() - 9800.0).abs() < 1e-6);
        assert!(after.pending().is_none());
        assert!(after.stands[0].is_partial);
    }

    #[test]
    fn analyze_classifies_inside_polygon() {
        let dir = tempdir().unwrap();
        let polygon = write(&dir, "polygon.json", SQUARE);
        let drawn = write(&dir, "drawn.json", "[[[10,10],[20,10],[20,20],[10,20],[10,10]]]");
        assert_eq!(analyze_cmd(&polygon, &drawn).unwrap(), PolygonClass::WhollyInside);
    }

    #[test]
    fn missing_polygon_is_an_error() {
        let dir = tempdir().unwrap();
        let line = write(&dir, "line.json", "[[0,0],[1,1]]");
        let mut c = common(&dir);
        c.polygon = None;
        assert!(line_cmd(&line, &c).is_err());
    }
}
