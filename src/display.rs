//! Topology query and apply
//!
//! The OS display-configuration subsystem is reached through the
//! [`DisplayConfigApi`] trait: get buffer sizes, query, set, nothing else.
//! Keeping that surface behind a trait lets every engine operation run
//! against a mock in tests; the real Win32 adapter lives in `win32.rs`.

use tracing::{debug, info};

use crate::errors::{EngineError, OsStatus};
use crate::topology::Topology;

/// Which paths a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    /// Every path the OS knows about, including inactive ones.
    AllPaths,
    /// Only connected and enabled paths. Used for capture; only active paths
    /// carry meaningful adapter bindings worth saving.
    ActiveOnly,
}

/// The three OS display-configuration operations the engine uses.
pub trait DisplayConfigApi {
    /// Report how many path and mode records a query of `scope` will return.
    fn buffer_sizes(&self, scope: QueryScope) -> Result<(u32, u32), OsStatus>;

    /// Fill exactly `path_slots`/`mode_slots` records and return them.
    fn query(
        &self,
        scope: QueryScope,
        path_slots: u32,
        mode_slots: u32,
    ) -> Result<Topology, OsStatus>;

    /// Submit a full topology as the new configuration, atomically.
    fn set(&self, topology: &Topology) -> Result<(), OsStatus>;
}

/// Query the current display topology using the two-phase size-then-fill
/// protocol. Either phase failing fails the whole call; no partial or
/// best-effort topology is ever returned.
pub fn query_topology(
    api: &impl DisplayConfigApi,
    scope: QueryScope,
) -> Result<Topology, EngineError> {
    let (path_slots, mode_slots) = api.buffer_sizes(scope).map_err(EngineError::QuerySize)?;
    debug!(paths = path_slots, modes = mode_slots, scope = ?scope, "sized topology buffers");
    api.query(scope, path_slots, mode_slots)
        .map_err(EngineError::QueryFill)
}

/// Submit `topology` to the OS as the new configuration.
///
/// One atomic call; a non-zero status is surfaced verbatim and never retried,
/// since re-submitting a rejected configuration without user intervention
/// risks blanking the screen.
pub fn apply_topology(
    api: &impl DisplayConfigApi,
    topology: &Topology,
) -> Result<(), EngineError> {
    info!(
        paths = topology.paths.len(),
        modes = topology.modes.len(),
        "applying display topology"
    );
    api.set(topology).map_err(EngineError::Apply)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Canned display-configuration backend recording every call it sees.
    pub(crate) struct MockApi {
        pub live: Topology,
        pub size_status: Option<OsStatus>,
        pub fill_status: Option<OsStatus>,
        pub set_status: Option<OsStatus>,
        pub os_calls: RefCell<u32>,
        pub applied: RefCell<Vec<Topology>>,
    }

    impl MockApi {
        pub fn new(live: Topology) -> Self {
            Self {
                live,
                size_status: None,
                fill_status: None,
                set_status: None,
                os_calls: RefCell::new(0),
                applied: RefCell::new(Vec::new()),
            }
        }
    }

    impl DisplayConfigApi for MockApi {
        fn buffer_sizes(&self, _scope: QueryScope) -> Result<(u32, u32), OsStatus> {
            *self.os_calls.borrow_mut() += 1;
            if let Some(status) = self.size_status {
                return Err(status);
            }
            Ok((self.live.paths.len() as u32, self.live.modes.len() as u32))
        }

        fn query(
            &self,
            _scope: QueryScope,
            _path_slots: u32,
            _mode_slots: u32,
        ) -> Result<Topology, OsStatus> {
            *self.os_calls.borrow_mut() += 1;
            if let Some(status) = self.fill_status {
                return Err(status);
            }
            Ok(self.live.clone())
        }

        fn set(&self, topology: &Topology) -> Result<(), OsStatus> {
            *self.os_calls.borrow_mut() += 1;
            if let Some(status) = self.set_status {
                return Err(status);
            }
            self.applied.borrow_mut().push(topology.clone());
            Ok(())
        }
    }
}
