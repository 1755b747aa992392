//! Loading grid files by name, with a bounded cache of parsed grids.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crs_common::{CrsError, CrsResult};
use lru::LruCache;
use tracing::{debug, info, warn};

use super::{GeocentricGrid, GridError, Ntv2Grid};

/// Source of datum shift grids.
///
/// Failures are reported as [`CrsError::ResourceUnavailable`].
pub trait GridLoader: Send + Sync + fmt::Debug {
    fn load_ntv2(&self, name: &str) -> CrsResult<Arc<Ntv2Grid>>;

    fn load_geocentric(&self, name: &str) -> CrsResult<Arc<GeocentricGrid>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GridKind {
    Ntv2,
    Geocentric,
}

#[derive(Clone)]
enum CachedGrid {
    Ntv2(Arc<Ntv2Grid>),
    Geocentric(Arc<GeocentricGrid>),
}

type CacheKey = (GridKind, PathBuf);

/// Reads grids from a list of directories.
///
/// Relative names are tried against each directory in order; absolute names
/// are used as given.
pub struct FileGridLoader {
    directories: Vec<PathBuf>,
    cache: Mutex<LruCache<CacheKey, CachedGrid>>,
}

impl FileGridLoader {
    pub fn new(directories: Vec<PathBuf>, cache_entries: NonZeroUsize) -> Self {
        Self {
            directories,
            cache: Mutex::new(LruCache::new(cache_entries)),
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Number of parsed grids currently cached.
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, CachedGrid>> {
        // A panic while holding the lock cannot leave the cache half-updated.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Locate `name` on disk.
    pub fn resolve(&self, name: &str) -> CrsResult<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
        } else if let Some(found) = self
            .directories
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
        {
            return Ok(found);
        }
        warn!(grid = name, directories = ?self.directories, "Grid file not found");
        Err(CrsError::resource_unavailable(
            name,
            format!("file not found in {:?}", self.directories),
        ))
    }

    fn load(&self, kind: GridKind, name: &str) -> CrsResult<CachedGrid> {
        let path = self.resolve(name)?;
        let key = (kind, path.clone());
        if let Some(grid) = self.lock().get(&key) {
            debug!(grid = %path.display(), "Grid cache hit");
            return Ok(grid.clone());
        }

        let grid = read_grid(kind, &path).map_err(|e| {
            warn!(grid = %path.display(), error = %e, "Failed to read grid");
            CrsError::resource_unavailable(name, e.to_string())
        })?;
        info!(grid = %path.display(), kind = ?kind, "Loaded grid file");

        self.lock().put(key, grid.clone());
        Ok(grid)
    }
}

fn read_grid(kind: GridKind, path: &Path) -> Result<CachedGrid, GridError> {
    match kind {
        GridKind::Ntv2 => {
            let data = std::fs::read(path)?;
            Ok(CachedGrid::Ntv2(Arc::new(Ntv2Grid::parse(&data)?)))
        }
        GridKind::Geocentric => {
            // Published IGN files are Latin-1; only ASCII matters for parsing.
            let data = std::fs::read(path)?;
            let text = String::from_utf8_lossy(&data);
            Ok(CachedGrid::Geocentric(Arc::new(GeocentricGrid::parse(&text)?)))
        }
    }
}

impl GridLoader for FileGridLoader {
    fn load_ntv2(&self, name: &str) -> CrsResult<Arc<Ntv2Grid>> {
        match self.load(GridKind::Ntv2, name)? {
            CachedGrid::Ntv2(grid) => Ok(grid),
            CachedGrid::Geocentric(_) => Err(CrsError::resource_unavailable(name, "not an NTv2 grid")),
        }
    }

    fn load_geocentric(&self, name: &str) -> CrsResult<Arc<GeocentricGrid>> {
        match self.load(GridKind::Geocentric, name)? {
            CachedGrid::Geocentric(grid) => Ok(grid),
            CachedGrid::Ntv2(_) => Err(CrsError::resource_unavailable(name, "not a GR3D grid")),
        }
    }
}

impl fmt::Debug for FileGridLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileGridLoader")
            .field("directories", &self.directories)
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "GR3D1 0 1 0 1 1 1\n1 0.0 0.0 1 2 3 0\n2 1.0 0.0 1 2 3 0\n3 0.0 1.0 1 2 3 0\n4 1.0 1.0 1 2 3 0\n";

    fn loader(dir: &Path, entries: usize) -> FileGridLoader {
        FileGridLoader::new(vec![dir.to_path_buf()], NonZeroUsize::new(entries).unwrap())
    }

    #[test]
    fn test_missing_file_is_resource_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader(dir.path(), 2).load_geocentric("nope.txt").unwrap_err();
        assert!(matches!(err, CrsError::ResourceUnavailable { ref resource, .. } if resource == "nope.txt"));
    }

    #[test]
    fn test_cache_returns_same_grid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("g.txt"), GRID).unwrap();
        let loader = loader(dir.path(), 2);
        let a = loader.load_geocentric("g.txt").unwrap();
        let b = loader.load_geocentric("g.txt").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loader.cached(), 1);
    }

    #[test]
    fn test_cache_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            std::fs::write(dir.path().join(name), GRID).unwrap();
        }
        let loader = loader(dir.path(), 2);
        for name in ["a.txt", "b.txt", "c.txt"] {
            loader.load_geocentric(name).unwrap();
        }
        assert_eq!(loader.cached(), 2);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.gsb"), b"garbage").unwrap();
        let err = loader(dir.path(), 1).load_ntv2("bad.gsb").unwrap_err();
        assert_eq!(err.code(), "ResourceUnavailable");
    }

    #[test]
    fn test_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.txt");
        std::fs::write(&path, GRID).unwrap();
        let loader = FileGridLoader::new(Vec::new(), NonZeroUsize::new(1).unwrap());
        assert!(loader.load_geocentric(path.to_str().unwrap()).is_ok());
    }
}
