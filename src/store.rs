//! Topology persistence
//!
//! One JSON document per profile, written pretty-printed so a profile can be
//! inspected by hand. Serialization is lossless and order-preserving for both
//! the path and mode sequences; a document that fails to parse yields
//! `Corrupt` and never a partial topology.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::errors::EngineError;
use crate::topology::Topology;

/// Serialize `topology` to `path`, creating parent directories as needed.
pub fn save(topology: &Topology, path: &Path) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| EngineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let contents = serde_json::to_string_pretty(topology).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(source),
    })?;
    fs::write(path, contents).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "saved display topology");
    Ok(())
}

/// Read a topology back from `path`.
///
/// A missing file is `NotFound`; unparsable contents are `Corrupt`.
pub fn load(path: &Path) -> Result<Topology, EngineError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(EngineError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(EngineError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&contents).map_err(|source| EngineError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::model::{
        AdapterId, DisplayMode, DisplayPath, ModeDetails, PathSourceInfo, PathTargetInfo, Point,
        Rational, SourceMode,
    };
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("monitor-switcher-test-{}-{name}", std::process::id()));
        path
    }

    fn sample_topology() -> Topology {
        Topology {
            paths: vec![DisplayPath {
                source: PathSourceInfo {
                    adapter_id: AdapterId {
                        low: 0xCAFE,
                        high: 3,
                    },
                    id: 0,
                    mode_info_idx: 0,
                    status_flags: 1,
                },
                target: PathTargetInfo {
                    adapter_id: AdapterId {
                        low: 0xCAFE,
                        high: 3,
                    },
                    id: 0x0001_0003,
                    mode_info_idx: 1,
                    output_technology: 10,
                    rotation: 1,
                    scaling: 2,
                    refresh_rate: Rational {
                        numerator: 60,
                        denominator: 1,
                    },
                    scan_line_ordering: 1,
                    target_available: 1,
                    status_flags: 1,
                },
                flags: 1,
            }],
            modes: vec![DisplayMode {
                id: 0,
                adapter_id: AdapterId {
                    low: 0xCAFE,
                    high: 3,
                },
                details: ModeDetails::Source(SourceMode {
                    width: 3840,
                    height: 2160,
                    pixel_format: 1,
                    position: Point { x: -1920, y: 0 },
                }),
            }],
        }
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let path = scratch_file("round-trip.json");
        let topology = sample_topology();

        save(&topology, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, topology);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let path = scratch_file("never-written.json");
        match load(&path) {
            Err(EngineError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let path = scratch_file("garbage.json");
        fs::write(&path, "not a topology {{{").unwrap();

        match load(&path) {
            Err(EngineError::Corrupt { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Corrupt, got {other:?}"),
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("monitor-switcher-test-dir-{}", std::process::id()));
        let path = dir.join("nested").join("profile.json");

        save(&sample_topology(), &path).unwrap();
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
