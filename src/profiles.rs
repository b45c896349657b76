//! Profile operations
//!
//! The caller-facing contracts: capture the live topology into a named
//! profile, or restore one (load, reconcile against the live system, apply).
//! Profiles are plain files in a directory, one per name; deleting them is
//! left to the user or an external manager.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::config::PROFILE_EXTENSION;
use crate::display::{apply_topology, query_topology, DisplayConfigApi, QueryScope};
use crate::errors::EngineError;
use crate::store;
use crate::topology::reconcile;

/// File backing a named profile inside `dir`.
pub fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{PROFILE_EXTENSION}"))
}

/// Capture the current topology (active paths only) into `path`.
pub fn capture_to(api: &impl DisplayConfigApi, path: &Path) -> Result<(), EngineError> {
    let topology = query_topology(api, QueryScope::ActiveOnly)?;
    store::save(&topology, path)?;
    info!(
        path = %path.display(),
        paths = topology.paths.len(),
        modes = topology.modes.len(),
        "captured display topology"
    );
    Ok(())
}

/// Load a stored topology from `path`, reconcile it against the live system
/// and apply it. A missing or unreadable profile aborts before any OS call.
pub fn restore_from(api: &impl DisplayConfigApi, path: &Path) -> Result<(), EngineError> {
    let stored = store::load(path)?;
    let live = query_topology(api, QueryScope::ActiveOnly)?;
    let patched = reconcile(stored, &live);
    apply_topology(api, &patched)?;
    info!(path = %path.display(), "restored display topology");
    Ok(())
}

pub fn capture_profile(
    api: &impl DisplayConfigApi,
    dir: &Path,
    name: &str,
) -> Result<(), EngineError> {
    capture_to(api, &profile_path(dir, name))
}

pub fn restore_profile(
    api: &impl DisplayConfigApi,
    dir: &Path,
    name: &str,
) -> Result<(), EngineError> {
    restore_from(api, &profile_path(dir, name))
}

/// Names of the profiles saved under `dir`, sorted. A missing directory is
/// just an empty list (nothing was ever captured).
pub fn list_profiles(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(PROFILE_EXTENSION)
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::MockApi;
    use crate::topology::model::{
        AdapterId, DisplayPath, PathSourceInfo, PathTargetInfo, Rational,
    };
    use crate::topology::Topology;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "monitor-switcher-profiles-{}-{name}",
            std::process::id()
        ));
        dir
    }

    fn live_topology() -> Topology {
        Topology {
            paths: vec![DisplayPath {
                source: PathSourceInfo {
                    adapter_id: AdapterId { low: 0xB0, high: 2 },
                    id: 0,
                    mode_info_idx: 0,
                    status_flags: 1,
                },
                target: PathTargetInfo {
                    adapter_id: AdapterId { low: 0xB0, high: 2 },
                    id: 0x0002_0003,
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
            modes: vec![],
        }
    }

    #[test]
    fn test_capture_then_restore_is_a_no_op() {
        let dir = scratch_dir("no-op");
        let api = MockApi::new(live_topology());

        capture_profile(&api, &dir, "office").unwrap();
        restore_profile(&api, &dir, "office").unwrap();

        // On an unchanged system the applied topology is exactly the live one.
        assert_eq!(api.applied.borrow().len(), 1);
        assert_eq!(api.applied.borrow()[0], api.live);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_restore_missing_profile_issues_no_os_call() {
        let dir = scratch_dir("missing");
        let api = MockApi::new(live_topology());

        match restore_profile(&api, &dir, "missing") {
            Err(EngineError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(*api.os_calls.borrow(), 0);
    }

    #[test]
    fn test_restore_corrupt_profile_issues_no_os_call() {
        let dir = scratch_dir("corrupt");
        let api = MockApi::new(live_topology());
        let path = profile_path(&dir, "broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "][").unwrap();

        match restore_profile(&api, &dir, "broken") {
            Err(EngineError::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {other:?}"),
        }
        assert_eq!(*api.os_calls.borrow(), 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_recapture_overwrites_profile() {
        let dir = scratch_dir("overwrite");
        let api = MockApi::new(live_topology());

        capture_profile(&api, &dir, "docked").unwrap();
        capture_profile(&api, &dir, "docked").unwrap();

        assert_eq!(list_profiles(&dir).unwrap(), vec!["docked".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_list_profiles_sorted_and_filtered() {
        let dir = scratch_dir("list");
        fs::create_dir_all(&dir).unwrap();
        fs::write(profile_path(&dir, "projector"), "{}").unwrap();
        fs::write(profile_path(&dir, "docked"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            list_profiles(&dir).unwrap(),
            vec!["docked".to_string(), "projector".to_string()]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_list_profiles_missing_dir_is_empty() {
        let dir = scratch_dir("absent");
        assert!(list_profiles(&dir).unwrap().is_empty());
    }
}
