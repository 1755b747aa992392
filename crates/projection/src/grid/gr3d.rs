//! IGN `GR3D` geocentric translation grids (e.g. `gr3df97a.txt`).
//!
//! ```text
//! GR3D  002024 024 20370201
//! GR3D1   -5.5000  10.0000  41.0000  52.0000    .1000    .1000
//! GR3D2 INTERPOLATION BILINEAIRE
//! GR3D3 PREC CM 01:5 02:10 03:20 04:50 99>100
//! 00001   -5.500000000   41.000000000  -165.027  -67.100  315.813  99  -0158
//! ```
//!
//! `GR3D1` gives the extent and spacing in degrees. Each data line holds a
//! node index, longitude, latitude and the translations tx, ty, tz in metres,
//! followed by precision codes that are ignored.

use super::interpolation::bilinear_interpolate;
use super::{axis_nodes, node_count, GridError, Result, MAX_GRID_NODES};

/// Geocentric translations sampled on a regular longitude/latitude grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocentricGrid {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_step: f64,
    pub lat_step: f64,
    pub columns: usize,
    pub rows: usize,
    /// Row-major from the south-west corner; NaN where no node was given.
    pub tx: Vec<f64>,
    pub ty: Vec<f64>,
    pub tz: Vec<f64>,
}

impl GeocentricGrid {
    pub fn parse(text: &str) -> Result<Self> {
        let mut grid: Option<Self> = None;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("GR3D1") {
                grid = Some(Self::from_extent(rest, line_no)?);
                continue;
            }
            if trimmed.starts_with("GR3D") {
                continue;
            }
            let grid = grid
                .as_mut()
                .ok_or_else(|| GridError::invalid_header("data before GR3D1 extent line"))?;
            grid.insert_node(trimmed, line_no)?;
        }

        let grid = grid.ok_or_else(|| GridError::invalid_header("missing GR3D1 extent line"))?;
        if grid.tx.iter().all(|v| v.is_nan()) {
            return Err(GridError::invalid_header("grid has no nodes"));
        }
        Ok(grid)
    }

    fn from_extent(rest: &str, line_no: usize) -> Result<Self> {
        let values = parse_numbers(rest, line_no)?;
        let [lon_min, lon_max, lat_min, lat_max, lon_step, lat_step] = match values.as_slice() {
            [a, b, c, d, e, f, ..] => [*a, *b, *c, *d, *e, *f],
            _ => {
                return Err(GridError::invalid_header(
                    "GR3D1 needs lonmin lonmax latmin latmax dlon dlat",
                ))
            }
        };
        if !(lon_step > 0.0 && lat_step > 0.0) || !(lon_max >= lon_min) || !(lat_max >= lat_min) {
            return Err(GridError::invalid_header(format!(
                "invalid GR3D1 extent {:?}",
                values
            )));
        }
        let columns = axis_nodes(lon_max - lon_min, lon_step);
        let rows = axis_nodes(lat_max - lat_min, lat_step);
        let (columns, rows, len) = match (columns, rows) {
            (Some(c), Some(r)) => match node_count(c, r) {
                Some(len) => (c, r, len),
                None => return Err(Self::too_large(&values)),
            },
            _ => return Err(Self::too_large(&values)),
        };
        Ok(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
            lon_step,
            lat_step,
            columns,
            rows,
            tx: vec![f64::NAN; len],
            ty: vec![f64::NAN; len],
            tz: vec![f64::NAN; len],
        })
    }

    fn too_large(values: &[f64]) -> GridError {
        GridError::invalid_header(format!(
            "GR3D1 extent {:?} gives more than {} nodes",
            values, MAX_GRID_NODES
        ))
    }

    fn insert_node(&mut self, line: &str, line_no: usize) -> Result<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // Leading node index is optional
        let fields = if tokens.len() >= 7 && !tokens[0].contains('.') {
            &tokens[1..]
        } else {
            &tokens[..]
        };
        if fields.len() < 5 {
            return Err(GridError::invalid_record(
                format!("line {}", line_no),
                "expected lon lat tx ty tz",
            ));
        }
        let values = parse_numbers(&fields[..5].join(" "), line_no)?;
        let (lon, lat) = (values[0], values[1]);

        let col = ((lon - self.lon_min) / self.lon_step).round();
        let row = ((lat - self.lat_min) / self.lat_step).round();
        let inside = col >= 0.0 && row >= 0.0 && (col as usize) < self.columns && (row as usize) < self.rows;
        if !inside {
            return Err(GridError::invalid_record(
                format!("line {}", line_no),
                format!("node ({}, {}) outside the declared extent", lon, lat),
            ));
        }
        let i = row as usize * self.columns + col as usize;
        self.tx[i] = values[2];
        self.ty[i] = values[3];
        self.tz[i] = values[4];
        Ok(())
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }

    /// Interpolated translation `[tx, ty, tz]` in metres at a point in degrees.
    pub fn interpolate(&self, lon: f64, lat: f64) -> Option<[f64; 3]> {
        let x = (lon - self.lon_min) / self.lon_step;
        let y = (lat - self.lat_min) / self.lat_step;
        Some([
            bilinear_interpolate(&self.tx, self.columns, self.rows, x, y)?,
            bilinear_interpolate(&self.ty, self.columns, self.rows, x, y)?,
            bilinear_interpolate(&self.tz, self.columns, self.rows, x, y)?,
        ])
    }
}

fn parse_numbers(text: &str, line_no: usize) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|t| {
            t.parse::<f64>().map_err(|_| {
                GridError::invalid_record(format!("line {}", line_no), format!("'{}' is not a number", t))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
GR3D  002024 024 20370201
GR3D1   2.0000   3.0000  48.0000  49.0000   1.0000   1.0000
GR3D2 INTERPOLATION BILINEAIRE
GR3D3 PREC CM 01:5 02:10 03:20 04:50 99>100
00001    2.000000000   48.000000000  -168.000  -60.000  320.000  01  -0158
00002    2.000000000   49.000000000  -168.000  -60.000  322.000  01  -0158
00003    3.000000000   48.000000000  -166.000  -60.000  320.000  01  -0158
00004    3.000000000   49.000000000  -166.000  -60.000  322.000  01  -0158
";

    #[test]
    fn test_parse_extent() {
        let grid = GeocentricGrid::parse(SAMPLE).unwrap();
        assert_eq!((grid.columns, grid.rows), (2, 2));
        assert!(grid.contains(2.5, 48.5));
        assert!(!grid.contains(1.0, 48.5));
    }

    #[test]
    fn test_interpolate() {
        let grid = GeocentricGrid::parse(SAMPLE).unwrap();
        let t = grid.interpolate(2.5, 48.5).unwrap();
        assert!((t[0] + 167.0).abs() < 1e-9);
        assert!((t[1] + 60.0).abs() < 1e-9);
        assert!((t[2] - 321.0).abs() < 1e-9);
        assert!(grid.interpolate(4.0, 48.5).is_none());
    }

    #[test]
    fn test_missing_nodes_are_nan() {
        let text = SAMPLE.lines().take(6).collect::<Vec<_>>().join("\n");
        let grid = GeocentricGrid::parse(&text).unwrap();
        assert!(grid.interpolate(2.5, 48.5).is_none());
    }

    #[test]
    fn test_errors() {
        assert!(GeocentricGrid::parse("").is_err());
        assert!(GeocentricGrid::parse("00001 2.0 48.0 1 2 3 01").is_err());
        let bad = SAMPLE.replace("-166.000", "abc");
        assert!(matches!(
            GeocentricGrid::parse(&bad),
            Err(GridError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_oversized_extent_rejected() {
        let tiny = SAMPLE.replace("1.0000   1.0000", "1e-300 1e-300");
        let err = GeocentricGrid::parse(&tiny).unwrap_err();
        assert!(matches!(err, GridError::InvalidHeader(_)), "{:?}", err);

        let wide = "GR3D1 -180.0 180.0 -90.0 90.0 0.001 0.001\n";
        assert!(matches!(
            GeocentricGrid::parse(wide),
            Err(GridError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_nan_node_rejected() {
        let bad = SAMPLE.replace("00004    3.000000000", "00004    NaN");
        assert!(matches!(
            GeocentricGrid::parse(&bad),
            Err(GridError::InvalidRecord { .. })
        ));
    }
}
