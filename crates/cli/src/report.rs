//! Per-stand CSV report of a correction.

use anyhow::{Context, Result};
use polars::prelude::*;
use reshape::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// One row per affected stand, plus the area of each stand left inside the
/// corrected polygon.
pub fn stand_frame(success: &CorrectionSuccess) -> Result<DataFrame> {
    let engine = GeoEngine;
    let stands = &success.stands_affected;
    let keys: Vec<String> = stands.iter().map(|s| s.key.to_string()).collect();
    let compartment: Vec<u32> = stands.iter().map(|s| s.key.compartment).collect();
    let stand: Vec<u32> = stands.iter().map(|s| s.key.stand).collect();
    let object_id: Vec<Option<u64>> = stands.iter().map(|s| s.object_id).collect();
    let partial: Vec<bool> = stands.iter().map(|s| s.is_partial).collect();
    let removed: Vec<bool> = stands.iter().map(|s| s.is_removed).collect();
    let area: Vec<Option<f64>> = stands
        .iter()
        .map(|s| s.geometry.as_ref().map(|g| engine.area(g)))
        .collect();
    let inside: Vec<Option<f64>> = stands
        .iter()
        .map(|s| {
            s.geometry
                .as_ref()
                .map(|g| engine.area(&engine.intersection(g, &success.new_polygon)))
        })
        .collect();
    let df = df!(
        "key" => keys,
        "compartment" => compartment,
        "stand" => stand,
        "object_id" => object_id,
        "is_partial" => partial,
        "is_removed" => removed,
        "area" => area,
        "area_inside" => inside,
    )?;
    Ok(df)
}

/// Write the stand report to `out` as CSV; returns the row count.
pub fn write_stand_report(success: &CorrectionSuccess, out: &Path) -> Result<usize> {
    let mut df = stand_frame(success)?;
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(rows = df.height(), out = %out.display(), "stand_report");
    Ok(df.height())
}
