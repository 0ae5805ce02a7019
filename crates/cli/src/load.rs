//! Point loading and corner export.
//!
//! Inputs
//! - `.csv`: headerless rows `x,y`; extra columns are ignored.
//! - `.png`: every pixel with a non-zero red channel is a point `(column, row)`,
//!   scanned column by column.
//!
//! Outputs
//! - `.csv` (headerless `x,y`) or `.parquet` (columns `x`, `y`).

use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;
use polyfit::Vec2;
use std::fs::File;
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Load a point cloud from `.csv` or `.png`.
pub fn load_points(path: &Path) -> Result<Vec<Vec2<f64>>> {
    let points = match extension(path).as_str() {
        "csv" => load_csv(path),
        "png" => load_png(path),
        other => bail!(
            "unsupported input {} (extension {other:?}; expected csv or png)",
            path.display()
        ),
    }?;
    tracing::info!(input = %path.display(), points = points.len(), "loaded points");
    Ok(points)
}

fn load_csv(path: &Path) -> Result<Vec<Vec2<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    if df.width() < 2 {
        bail!(
            "{} has {} column(s); expected x,y rows",
            path.display(),
            df.width()
        );
    }
    let cols = df.get_columns();
    let xs = cols[0].cast(&DataType::Float64)?;
    let ys = cols[1].cast(&DataType::Float64)?;
    xs.f64()?
        .into_iter()
        .zip(ys.f64()?.into_iter())
        .enumerate()
        .map(|(row, xy)| match xy {
            (Some(x), Some(y)) => Ok(Vec2::new(x, y)),
            _ => Err(anyhow!("{} row {row}: missing coordinate", path.display())),
        })
        .collect()
}

fn load_png(path: &Path) -> Result<Vec<Vec2<f64>>> {
    let img = image::open(path)
        .with_context(|| format!("reading image {}", path.display()))?
        .into_rgb8();
    let (width, height) = img.dimensions();
    let mut points = Vec::new();
    for x in 0..width {
        for y in 0..height {
            if img.get_pixel(x, y)[0] > 0 {
                points.push(Vec2::new(x as f64, y as f64));
            }
        }
    }
    Ok(points)
}

/// Write corners as `.csv` (headerless) or `.parquet`.
pub fn write_corners(path: &Path, corners: &[Vec2<f64>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let xs: Vec<f64> = corners.iter().map(|c| c.x).collect();
    let ys: Vec<f64> = corners.iter().map(|c| c.y).collect();
    let mut df = df!("x" => xs, "y" => ys)?;
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match extension(path).as_str() {
        "parquet" => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
        _ => {
            CsvWriter::new(&mut file)
                .include_header(false)
                .finish(&mut df)?;
        }
    }
    tracing::info!(out = %path.display(), corners = corners.len(), "wrote corners");
    Ok(())
}
