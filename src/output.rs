use std::io::Write;

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::colorspace::{ColorSpace, Transform};
use crate::error::ColorResult;
use crate::matrix::Matrix3;
use crate::types::XYZ;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labeled fixed-point matrix blocks
    Text,
    Json,
    Yaml,
}

/// Fixed-point, never exponential. Values that round to zero lose their sign.
#[must_use]
pub fn format_value(value: f64, precision: usize) -> String {
    let res = format!("{value:.precision$}");
    match res.strip_prefix('-') {
        Some(abs) if abs.chars().all(|c| c == '0' || c == '.') => abs.to_string(),
        _ => res,
    }
}

/// Renders a matrix as an aligned block:
///
/// ```text
/// [[1.00 0.00 0.00]
///  [0.00 1.00 0.00]
///  [0.00 0.00 1.00]]
/// ```
#[must_use]
pub fn format_matrix(m: &Matrix3, precision: usize) -> String {
    let cells = m.0.map(|row| row.map(|v| format_value(v, precision)));
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    cells
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i == 2 { "]]" } else { "]" };
            let body = row.iter().map(|c| format!("{c:>width$}")).join(" ");
            format!("{open}{body}{close}")
        })
        .join("\n")
}

/// Reports that can be printed as plain text as well as serialized
pub trait TextReport {
    fn write_text(&self, out: &mut dyn Write, precision: usize) -> ColorResult<()>;
}

#[derive(Clone, Debug, Serialize)]
pub struct TransformReport {
    pub source: String,
    pub dest: String,
    #[serde(flatten)]
    pub transform: Transform,
}

impl TextReport for TransformReport {
    fn write_text(&self, out: &mut dyn Write, precision: usize) -> ColorResult<()> {
        writeln!(out, "{} -> {}", self.source, self.dest)?;
        writeln!(out, "M")?;
        writeln!(out, "{}", format_matrix(&self.transform.forward, precision))?;
        writeln!(out, "M-1")?;
        writeln!(out, "{}", format_matrix(&self.transform.inverse, precision))?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SpaceReport {
    #[serde(flatten)]
    pub space: ColorSpace,
    pub white_xyz: XYZ,
    pub rgb_to_xyz: Matrix3,
    pub xyz_to_rgb: Matrix3,
    pub luminance: [f64; 3],
}

impl SpaceReport {
    pub fn new(space: &ColorSpace) -> ColorResult<Self> {
        let rgb_to_xyz = space.rgb_to_xyz()?;
        Ok(Self {
            space: space.clone(),
            white_xyz: space.white_xyz()?,
            rgb_to_xyz,
            xyz_to_rgb: rgb_to_xyz.try_inverted(&format!("{} RGB to XYZ matrix", space.name))?,
            luminance: rgb_to_xyz.row(1),
        })
    }
}

impl TextReport for SpaceReport {
    fn write_text(&self, out: &mut dyn Write, precision: usize) -> ColorResult<()> {
        let fmt = |v: f64| format_value(v, precision);
        let XYZ { x, y, z } = self.white_xyz;

        writeln!(out, "{}", self.space)?;
        writeln!(out, "White XYZ: {} {} {}", fmt(x), fmt(y), fmt(z))?;
        writeln!(out, "RGB -> XYZ")?;
        writeln!(out, "{}", format_matrix(&self.rgb_to_xyz, precision))?;
        writeln!(out, "XYZ -> RGB")?;
        writeln!(out, "{}", format_matrix(&self.xyz_to_rgb, precision))?;
        writeln!(
            out,
            "Luminance: {}",
            self.luminance.iter().map(|&v| fmt(v)).join(" ")
        )?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ListEntry {
    pub key: String,
    #[serde(flatten)]
    pub space: ColorSpace,
}

#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct ListReport(pub Vec<ListEntry>);

impl TextReport for ListReport {
    fn write_text(&self, out: &mut dyn Write, _precision: usize) -> ColorResult<()> {
        let width = self.0.iter().map(|e| e.key.len()).max().unwrap_or(0);
        for entry in &self.0 {
            writeln!(out, "{:<width$}  {}", entry.key, entry.space)?;
        }
        Ok(())
    }
}

/// Writes `report` in the requested format. Serialized formats carry full
/// `f64` precision; `precision` only applies to text.
pub fn emit<T>(
    out: &mut dyn Write,
    report: &T,
    format: OutputFormat,
    precision: usize,
) -> ColorResult<()>
where
    T: TextReport + Serialize,
{
    match format {
        OutputFormat::Text => report.write_text(out, precision)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, report)?,
    }
    Ok(())
}
