//! NTv2 binary grid shift files (`.gsb`).
//!
//! A file is a sequence of 16-byte records: an 8-character name followed by
//! an 8-byte value. The overview header is followed by one header per
//! sub-grid and that sub-grid's shift nodes, then an `END` record.
//!
//! Angles are stored in arc-seconds with longitudes positive **west**. Nodes
//! run from south to north, and within a row from east to west. Each node
//! carries latitude shift, longitude shift and their two accuracies as `f32`.

use bytes::Buf;
use tracing::debug;

use super::interpolation::bilinear_interpolate;
use super::{axis_nodes, node_count, GridError, Result};

const RECORD_LEN: usize = 16;
const OVERVIEW_RECORDS: i32 = 11;
const SUB_GRID_RECORDS: i32 = 11;

/// One rectangular block of an NTv2 file.
#[derive(Debug, Clone, PartialEq)]
pub struct Ntv2SubGrid {
    pub name: String,
    pub parent: String,
    /// Southern limit, arc-seconds.
    pub south: f64,
    pub north: f64,
    /// Eastern limit, arc-seconds positive west.
    pub east: f64,
    pub west: f64,
    pub lat_increment: f64,
    pub lon_increment: f64,
    pub rows: usize,
    pub columns: usize,
    /// Latitude shifts in arc-seconds, row-major from the south-east corner.
    pub lat_shifts: Vec<f32>,
    /// Longitude shifts in arc-seconds, positive west.
    pub lon_shifts: Vec<f32>,
}

impl Ntv2SubGrid {
    /// Whether the point (arc-seconds, longitude positive west) lies inside.
    pub fn contains(&self, lat: f64, lon_west: f64) -> bool {
        lat >= self.south && lat <= self.north && lon_west >= self.east && lon_west <= self.west
    }

    fn cell_area(&self) -> f64 {
        self.lat_increment * self.lon_increment
    }

    /// Interpolated (latitude, longitude) shift in arc-seconds.
    pub fn shift(&self, lat: f64, lon_west: f64) -> Option<(f64, f64)> {
        let x = (lon_west - self.east) / self.lon_increment;
        let y = (lat - self.south) / self.lat_increment;
        let dlat = bilinear_interpolate(&self.lat_shifts, self.columns, self.rows, x, y)?;
        let dlon = bilinear_interpolate(&self.lon_shifts, self.columns, self.rows, x, y)?;
        Some((dlat, dlon))
    }
}

/// A parsed NTv2 file.
#[derive(Debug, Clone, PartialEq)]
pub struct Ntv2Grid {
    pub system_from: String,
    pub system_to: String,
    pub sub_grids: Vec<Ntv2SubGrid>,
}

impl Ntv2Grid {
    /// Decode an NTv2 file, detecting its byte order from the first record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = RecordReader::new(data)?;

        let overview = reader.header(OVERVIEW_RECORDS as usize)?;
        let sub_records = overview.int("NUM_SREC")?;
        let num_files = overview.int("NUM_FILE")?;
        if sub_records != SUB_GRID_RECORDS {
            return Err(GridError::invalid_header(format!(
                "NUM_SREC must be {}, got {}",
                SUB_GRID_RECORDS, sub_records
            )));
        }
        // Every sub-grid needs at least its header records
        let max_files = reader.remaining_records() / SUB_GRID_RECORDS as usize;
        if num_files <= 0 || num_files as usize > max_files {
            return Err(GridError::invalid_header(format!(
                "NUM_FILE = {} but only {} sub-grid headers fit in the file",
                num_files, max_files
            )));
        }

        let mut sub_grids = Vec::with_capacity(num_files as usize);
        for _ in 0..num_files {
            let header = reader.header(SUB_GRID_RECORDS as usize)?;
            let name = header.text("SUB_NAME")?;
            let south = header.double("S_LAT")?;
            let north = header.double("N_LAT")?;
            let east = header.double("E_LONG")?;
            let west = header.double("W_LONG")?;
            let lat_increment = header.double("LAT_INC")?;
            let lon_increment = header.double("LONG_INC")?;
            let count = header.int("GS_COUNT")?;

            if !(lat_increment > 0.0 && lon_increment > 0.0) || !(north >= south) || !(west >= east) {
                return Err(GridError::invalid_header(format!(
                    "sub-grid {} has an empty or inverted extent",
                    name
                )));
            }
            let (rows, columns) = match (
                axis_nodes(north - south, lat_increment),
                axis_nodes(west - east, lon_increment),
            ) {
                (Some(rows), Some(columns)) => (rows, columns),
                _ => {
                    return Err(GridError::invalid_header(format!(
                        "sub-grid {}: extent and increments give too many nodes",
                        name
                    )))
                }
            };
            let nodes = node_count(rows, columns).filter(|n| i64::from(count) == *n as i64);
            let Some(nodes) = nodes else {
                return Err(GridError::invalid_header(format!(
                    "sub-grid {}: GS_COUNT {} does not match {} x {} nodes",
                    name, count, rows, columns
                )));
            };
            if nodes > reader.remaining_records() {
                return Err(GridError::truncated(format!(
                    "sub-grid {} declares {} nodes but {} records remain",
                    name,
                    nodes,
                    reader.remaining_records()
                )));
            }

            let mut lat_shifts = Vec::with_capacity(nodes);
            let mut lon_shifts = Vec::with_capacity(nodes);
            for _ in 0..nodes {
                let [dlat, dlon, _, _] = reader.node()?;
                lat_shifts.push(dlat);
                lon_shifts.push(dlon);
            }

            debug!(sub_grid = %name, rows, columns, "Decoded NTv2 sub-grid");
            sub_grids.push(Ntv2SubGrid {
                name,
                parent: header.text("PARENT")?,
                south,
                north,
                east,
                west,
                lat_increment,
                lon_increment,
                rows,
                columns,
                lat_shifts,
                lon_shifts,
            });
        }

        Ok(Self {
            system_from: overview.text("SYSTEM_F")?,
            system_to: overview.text("SYSTEM_T")?,
            sub_grids,
        })
    }

    /// The finest sub-grid containing the point, if any.
    pub fn sub_grid_for(&self, lat: f64, lon_west: f64) -> Option<&Ntv2SubGrid> {
        self.sub_grids
            .iter()
            .filter(|g| g.contains(lat, lon_west))
            .min_by(|a, b| a.cell_area().total_cmp(&b.cell_area()))
    }

    /// Shift for a geographic point in degrees (longitude positive east).
    ///
    /// Returns `(dlat, dlon)` in arc-seconds, longitude positive west.
    pub fn shift(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lat_s = lat * 3600.0;
        let lon_w = -lon * 3600.0;
        self.sub_grid_for(lat_s, lon_w)?.shift(lat_s, lon_w)
    }
}

struct Header {
    records: Vec<(String, [u8; 8])>,
    big_endian: bool,
}

impl Header {
    fn value(&self, name: &str) -> Result<&[u8; 8]> {
        self.records
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
            .ok_or_else(|| GridError::invalid_header(format!("missing {} record", name)))
    }

    fn int(&self, name: &str) -> Result<i32> {
        let mut v = &self.value(name)?[..4];
        Ok(if self.big_endian { v.get_i32() } else { v.get_i32_le() })
    }

    fn double(&self, name: &str) -> Result<f64> {
        let mut v = &self.value(name)?[..];
        Ok(if self.big_endian { v.get_f64() } else { v.get_f64_le() })
    }

    fn text(&self, name: &str) -> Result<String> {
        let v = self.value(name)?;
        Ok(String::from_utf8_lossy(v).trim_end_matches(['\0', ' ']).to_string())
    }
}

struct RecordReader<'a> {
    buf: &'a [u8],
    offset: usize,
    big_endian: bool,
}

impl<'a> RecordReader<'a> {
    fn new(buf: &'a [u8]) -> Result<Self> {
        if buf.len() < RECORD_LEN {
            return Err(GridError::truncated("file shorter than one record"));
        }
        if !buf[..8].eq_ignore_ascii_case(b"NUM_OREC") {
            return Err(GridError::invalid_header("first record is not NUM_OREC"));
        }
        let mut value = &buf[8..12];
        let le = value.get_i32_le();
        let big_endian = if le == OVERVIEW_RECORDS {
            false
        } else {
            let mut value = &buf[8..12];
            if value.get_i32() == OVERVIEW_RECORDS {
                true
            } else {
                return Err(GridError::invalid_header(format!(
                    "NUM_OREC must be {}, got {}",
                    OVERVIEW_RECORDS, le
                )));
            }
        };
        Ok(Self {
            buf,
            offset: 0,
            big_endian,
        })
    }

    fn remaining_records(&self) -> usize {
        (self.buf.len() - self.offset) / RECORD_LEN
    }

    fn next_record(&mut self) -> Result<&'a [u8]> {
        let end = self.offset + RECORD_LEN;
        if end > self.buf.len() {
            return Err(GridError::truncated(format!(
                "record at byte {} runs past end of file ({} bytes)",
                self.offset,
                self.buf.len()
            )));
        }
        let record = &self.buf[self.offset..end];
        self.offset = end;
        Ok(record)
    }

    fn header(&mut self, count: usize) -> Result<Header> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let record = self.next_record()?;
            let name = String::from_utf8_lossy(&record[..8]).trim_end().to_string();
            let mut value = [0u8; 8];
            value.copy_from_slice(&record[8..]);
            records.push((name, value));
        }
        Ok(Header {
            records,
            big_endian: self.big_endian,
        })
    }

    fn node(&mut self) -> Result<[f32; 4]> {
        let offset = self.offset;
        let mut record = self.next_record()?;
        let mut node = [0f32; 4];
        for v in node.iter_mut() {
            *v = if self.big_endian { record.get_f32() } else { record.get_f32_le() };
        }
        if node[0].is_infinite() || node[1].is_infinite() {
            return Err(GridError::invalid_record(
                format!("byte {}", offset),
                "infinite shift value",
            ));
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, value: [u8; 8]) -> Vec<u8> {
        let mut r = format!("{:<8}", name).into_bytes();
        r.extend_from_slice(&value);
        r
    }

    fn int(v: i32) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&v.to_le_bytes());
        out
    }

    fn text(v: &str) -> [u8; 8] {
        let mut out = [b' '; 8];
        out[..v.len()].copy_from_slice(v.as_bytes());
        out
    }

    /// 2x2 nodes covering lat 0..3600", lon_w 0..3600" with constant shifts.
    fn tiny_file() -> Vec<u8> {
        let mut f = Vec::new();
        f.extend(record("NUM_OREC", int(11)));
        f.extend(record("NUM_SREC", int(11)));
        f.extend(record("NUM_FILE", int(1)));
        f.extend(record("GS_TYPE", text("SECONDS")));
        f.extend(record("VERSION", text("NTv2.0")));
        f.extend(record("SYSTEM_F", text("NAD27")));
        f.extend(record("SYSTEM_T", text("NAD83")));
        for name in ["MAJOR_F", "MINOR_F", "MAJOR_T", "MINOR_T"] {
            f.extend(record(name, 6378137.0f64.to_le_bytes()));
        }
        f.extend(record("SUB_NAME", text("ALL")));
        f.extend(record("PARENT", text("NONE")));
        f.extend(record("CREATED", text("")));
        f.extend(record("UPDATED", text("")));
        for (name, v) in [
            ("S_LAT", 0.0f64),
            ("N_LAT", 3600.0),
            ("E_LONG", 0.0),
            ("W_LONG", 3600.0),
            ("LAT_INC", 3600.0),
            ("LONG_INC", 3600.0),
        ] {
            f.extend(record(name, v.to_le_bytes()));
        }
        f.extend(record("GS_COUNT", int(4)));
        for _ in 0..4 {
            for v in [1.5f32, -2.0, 0.0, 0.0] {
                f.extend_from_slice(&v.to_le_bytes());
            }
        }
        f.extend(record("END", [0u8; 8]));
        f
    }

    /// Replace the value of the first record called `name`.
    fn patched(mut file: Vec<u8>, name: &str, value: [u8; 8]) -> Vec<u8> {
        let key = format!("{:<8}", name).into_bytes();
        let start = file
            .chunks(RECORD_LEN)
            .position(|r| r[..8] == key[..])
            .unwrap()
            * RECORD_LEN;
        file[start + 8..start + RECORD_LEN].copy_from_slice(&value);
        file
    }

    #[test]
    fn test_parse_little_endian() {
        let grid = Ntv2Grid::parse(&tiny_file()).unwrap();
        assert_eq!(grid.system_from, "NAD27");
        assert_eq!(grid.sub_grids.len(), 1);
        let sub = &grid.sub_grids[0];
        assert_eq!((sub.rows, sub.columns), (2, 2));
        assert_eq!(sub.parent, "NONE");
    }

    #[test]
    fn test_shift_inside_and_outside() {
        let grid = Ntv2Grid::parse(&tiny_file()).unwrap();
        // 0.5°W, 0.5°N
        let (dlat, dlon) = grid.shift(-0.5, 0.5).unwrap();
        assert!((dlat - 1.5).abs() < 1e-6);
        assert!((dlon + 2.0).abs() < 1e-6);
        assert!(grid.shift(0.5, 0.5).is_none());
    }

    #[test]
    fn test_truncated() {
        let file = tiny_file();
        let err = Ntv2Grid::parse(&file[..file.len() - 40]).unwrap_err();
        assert!(matches!(err, GridError::Truncated(_)), "{:?}", err);
    }

    #[test]
    fn test_not_ntv2() {
        assert!(matches!(
            Ntv2Grid::parse(&[0u8; 64]),
            Err(GridError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_tiny_increments_rejected() {
        let file = patched(tiny_file(), "LAT_INC", 1e-300f64.to_le_bytes());
        let file = patched(file, "LONG_INC", 1e-300f64.to_le_bytes());
        let err = Ntv2Grid::parse(&file).unwrap_err();
        assert!(matches!(err, GridError::InvalidHeader(_)), "{:?}", err);
    }

    #[test]
    fn test_nan_extent_rejected() {
        let file = patched(tiny_file(), "N_LAT", f64::NAN.to_le_bytes());
        assert!(matches!(
            Ntv2Grid::parse(&file),
            Err(GridError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_counts_bounded_by_file_size() {
        let file = patched(tiny_file(), "NUM_FILE", int(i32::MAX));
        let err = Ntv2Grid::parse(&file).unwrap_err();
        assert!(matches!(err, GridError::InvalidHeader(_)), "{:?}", err);

        let file = patched(tiny_file(), "NUM_SREC", int(1_000_000));
        let err = Ntv2Grid::parse(&file).unwrap_err();
        assert!(matches!(err, GridError::InvalidHeader(_)), "{:?}", err);
    }

    #[test]
    fn test_node_count_bounded_by_file_size() {
        // 11 x 2 nodes declared, only 4 present
        let file = patched(tiny_file(), "N_LAT", 36000.0f64.to_le_bytes());
        let file = patched(file, "GS_COUNT", int(22));
        let err = Ntv2Grid::parse(&file).unwrap_err();
        assert!(matches!(err, GridError::Truncated(_)), "{:?}", err);
    }
}
