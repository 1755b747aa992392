//! Synthetic datum-shift grid files.
//!
//! Generators write small but well-formed NTv2 (`.gsb`) and IGN GR3D files
//! so that grid loading can be exercised without the published data sets.
//! Shift values follow simple formulas, making interpolated results easy
//! to predict in assertions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Byte order of a generated NTv2 file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// One NTv2 sub-grid with shifts given per node.
///
/// Extents are in arc-seconds with longitude positive west, as in the file.
#[derive(Debug, Clone)]
pub struct Ntv2Spec {
    pub name: String,
    pub parent: String,
    pub south: f64,
    pub north: f64,
    pub east: f64,
    pub west: f64,
    pub lat_increment: f64,
    pub lon_increment: f64,
    /// `(lat_shift, lon_shift)` in arc-seconds for node `(row, column)`,
    /// rows from the south, columns from the east.
    pub shift: fn(usize, usize) -> (f32, f32),
}

impl Ntv2Spec {
    /// A single sub-grid covering the given degrees (longitude positive east)
    /// with constant shifts.
    pub fn constant(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64, step_deg: f64) -> Self {
        Self {
            name: "ALL".to_string(),
            parent: "NONE".to_string(),
            south: lat_min * 3600.0,
            north: lat_max * 3600.0,
            east: -lon_max * 3600.0,
            west: -lon_min * 3600.0,
            lat_increment: step_deg * 3600.0,
            lon_increment: step_deg * 3600.0,
            shift: |_, _| (CONSTANT_LAT_SHIFT, CONSTANT_LON_SHIFT),
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        let rows = ((self.north - self.south) / self.lat_increment).round() as usize + 1;
        let columns = ((self.west - self.east) / self.lon_increment).round() as usize + 1;
        (rows, columns)
    }
}

/// Latitude shift written by [`Ntv2Spec::constant`], arc-seconds.
pub const CONSTANT_LAT_SHIFT: f32 = 0.36;
/// Longitude shift (positive west) written by [`Ntv2Spec::constant`], arc-seconds.
pub const CONSTANT_LON_SHIFT: f32 = -1.8;

/// Encode an NTv2 file holding `sub_grids`.
pub fn ntv2_bytes(sub_grids: &[Ntv2Spec], endian: Endian) -> Vec<u8> {
    let mut out = Vec::new();
    let int = |v: i32| -> [u8; 8] {
        let mut b = [0u8; 8];
        match endian {
            Endian::Little => b[..4].copy_from_slice(&v.to_le_bytes()),
            Endian::Big => b[..4].copy_from_slice(&v.to_be_bytes()),
        }
        b
    };
    let double = |v: f64| -> [u8; 8] {
        match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        }
    };
    let float = |v: f32| -> [u8; 4] {
        match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        }
    };

    push_record(&mut out, "NUM_OREC", int(11));
    push_record(&mut out, "NUM_SREC", int(11));
    push_record(&mut out, "NUM_FILE", int(sub_grids.len() as i32));
    push_record(&mut out, "GS_TYPE", text("SECONDS"));
    push_record(&mut out, "VERSION", text("NTv2.0"));
    push_record(&mut out, "SYSTEM_F", text("SRC"));
    push_record(&mut out, "SYSTEM_T", text("TGT"));
    push_record(&mut out, "MAJOR_F", double(6378206.4));
    push_record(&mut out, "MINOR_F", double(6356583.8));
    push_record(&mut out, "MAJOR_T", double(6378137.0));
    push_record(&mut out, "MINOR_T", double(6356752.314));

    for spec in sub_grids {
        let (rows, columns) = spec.dimensions();
        push_record(&mut out, "SUB_NAME", text(&spec.name));
        push_record(&mut out, "PARENT", text(&spec.parent));
        push_record(&mut out, "CREATED", text("20240101"));
        push_record(&mut out, "UPDATED", text("20240101"));
        push_record(&mut out, "S_LAT", double(spec.south));
        push_record(&mut out, "N_LAT", double(spec.north));
        push_record(&mut out, "E_LONG", double(spec.east));
        push_record(&mut out, "W_LONG", double(spec.west));
        push_record(&mut out, "LAT_INC", double(spec.lat_increment));
        push_record(&mut out, "LONG_INC", double(spec.lon_increment));
        push_record(&mut out, "GS_COUNT", int((rows * columns) as i32));
        for row in 0..rows {
            for column in 0..columns {
                let (dlat, dlon) = (spec.shift)(row, column);
                for v in [dlat, dlon, 0.01, 0.01] {
                    out.extend_from_slice(&float(v));
                }
            }
        }
    }
    push_record(&mut out, "END", [0u8; 8]);
    out
}

fn push_record(out: &mut Vec<u8>, name: &str, value: [u8; 8]) {
    out.extend_from_slice(format!("{:<8}", name).as_bytes());
    out.extend_from_slice(&value);
}

fn text(v: &str) -> [u8; 8] {
    let mut b = [b' '; 8];
    let len = v.len().min(8);
    b[..len].copy_from_slice(&v.as_bytes()[..len]);
    b
}

/// Geocentric translation grid description for a GR3D file.
#[derive(Debug, Clone)]
pub struct Gr3dSpec {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub step: f64,
    /// `(tx, ty, tz)` in metres at a node `(lon, lat)`.
    pub translation: fn(f64, f64) -> (f64, f64, f64),
}

impl Gr3dSpec {
    /// Metropolitan France extent with translations close to the published
    /// grid, varying linearly with position.
    pub fn france() -> Self {
        Self {
            lon_min: -5.5,
            lon_max: 10.0,
            lat_min: 41.0,
            lat_max: 52.0,
            step: 0.5,
            translation: |lon, lat| (-168.0 + 0.2 * lon, -60.0 - 0.5 * (lat - 46.0), 320.0 + 0.1 * lat),
        }
    }
}

/// Render a GR3D text file.
pub fn gr3d_text(spec: &Gr3dSpec) -> String {
    let mut out = String::new();
    out.push_str("GR3D  002024 024 20370201\n");
    out.push_str(&format!(
        "GR3D1 {:9.4} {:9.4} {:9.4} {:9.4} {:9.4} {:9.4}\n",
        spec.lon_min, spec.lon_max, spec.lat_min, spec.lat_max, spec.step, spec.step
    ));
    out.push_str("GR3D2 INTERPOLATION BILINEAIRE\n");
    out.push_str("GR3D3 PREC CM 01:5 02:10 03:20 04:50 99>100\n");

    let columns = ((spec.lon_max - spec.lon_min) / spec.step).round() as usize + 1;
    let rows = ((spec.lat_max - spec.lat_min) / spec.step).round() as usize + 1;
    let mut index = 1;
    for c in 0..columns {
        for r in 0..rows {
            let lon = spec.lon_min + c as f64 * spec.step;
            let lat = spec.lat_min + r as f64 * spec.step;
            let (tx, ty, tz) = (spec.translation)(lon, lat);
            out.push_str(&format!(
                "{:05} {:14.9} {:14.9} {:9.3} {:9.3} {:9.3}  01  -0158\n",
                index, lon, lat, tx, ty, tz
            ));
            index += 1;
        }
    }
    out
}

pub fn write_ntv2(dir: &Path, name: &str, sub_grids: &[Ntv2Spec], endian: Endian) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, ntv2_bytes(sub_grids, endian))?;
    Ok(path)
}

pub fn write_gr3d(dir: &Path, name: &str, spec: &Gr3dSpec) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, gr3d_text(spec))?;
    Ok(path)
}

/// A temporary directory holding `gr3df97a.txt` (synthetic France grid) and
/// `ntv2_test.gsb` (constant shifts over 10°W–10°E, 40°N–60°N).
///
/// # Example
///
/// ```
/// let dir = test_utils::grid_directory().unwrap();
/// assert!(dir.path().join("gr3df97a.txt").is_file());
/// assert!(dir.path().join("ntv2_test.gsb").is_file());
/// ```
pub fn grid_directory() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_gr3d(dir.path(), "gr3df97a.txt", &Gr3dSpec::france())?;
    write_ntv2(
        dir.path(),
        "ntv2_test.gsb",
        &[Ntv2Spec::constant(-10.0, 10.0, 40.0, 60.0, 1.0)],
        Endian::Little,
    )?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntv2_record_layout() {
        let bytes = ntv2_bytes(&[Ntv2Spec::constant(0.0, 1.0, 0.0, 1.0, 1.0)], Endian::Little);
        // 11 overview + 11 sub-grid header + 4 nodes + END
        assert_eq!(bytes.len(), (11 + 11 + 4 + 1) * 16);
        assert_eq!(&bytes[..8], b"NUM_OREC");
        assert_eq!(&bytes[8..12], &11i32.to_le_bytes());
    }

    #[test]
    fn test_big_endian_header() {
        let bytes = ntv2_bytes(&[Ntv2Spec::constant(0.0, 1.0, 0.0, 1.0, 1.0)], Endian::Big);
        assert_eq!(&bytes[8..12], &11i32.to_be_bytes());
    }

    #[test]
    fn test_gr3d_node_count() {
        let text = gr3d_text(&Gr3dSpec::france());
        let nodes = text.lines().filter(|l| !l.starts_with("GR3D")).count();
        assert_eq!(nodes, 32 * 23);
    }
}
