//! CSV export and the display-to-original coordinate mapping.

use std::io::{self, Write};

use chrono::{Local, NaiveDate};

use crate::config::PointMapConfig;
use crate::data::points::{namespace_of, Point};

/// `point_type` reported for unprefixed points.
pub const UNPREFIXED_TYPE: &str = "POINT";

/// Dimensions of the display surface and the original image. Stateless;
/// only consulted at export time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub original_width: f64,
    pub original_height: f64,
}

impl SurfaceGeometry {
    /// Map display-surface coordinates back into the original image's
    /// coordinate space, rounding each axis.
    pub fn to_original(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x * self.original_width / self.display_width).round() as i64,
            (y * self.original_height / self.display_height).round() as i64,
        )
    }
}

/// Write the points as CSV: one header row and one row per point, columns
/// per configuration, `\n` line terminators.
pub fn write_points_csv<W: Write>(
    w: &mut W,
    points: &[Point],
    cfg: &PointMapConfig,
    geometry: &SurfaceGeometry,
) -> io::Result<()> {
    let delim = cfg.csv_delimiter.to_string();

    let mut header: Vec<&str> = vec!["point_id", "x", "y"];
    if cfg.include_point_type {
        header.push("point_type");
    }
    if cfg.include_original_coords {
        header.push("original_x");
        header.push("original_y");
    }
    writeln!(w, "{}", header.join(&delim))?;

    for p in points {
        let mut row: Vec<String> = vec![p.point_id.clone(), p.x.to_string(), p.y.to_string()];
        if cfg.include_point_type {
            row.push(
                namespace_of(&p.point_id)
                    .unwrap_or(UNPREFIXED_TYPE)
                    .to_string(),
            );
        }
        if cfg.include_original_coords {
            let (ox, oy) = geometry.to_original(p.x, p.y);
            row.push(ox.to_string());
            row.push(oy.to_string());
        }
        writeln!(w, "{}", row.join(&delim))?;
    }
    Ok(())
}

/// Export filename for a given date: `image_points_<ISO-date>.csv`.
pub fn export_filename_for(date: NaiveDate) -> String {
    format!("image_points_{}.csv", date.format("%Y-%m-%d"))
}

/// Export filename for today.
pub fn export_filename() -> String {
    export_filename_for(Local::now().date_naive())
}
