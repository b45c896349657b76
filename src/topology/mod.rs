//! Display topology: data model and reconciliation
//!
//! - **model**: serializable value types mirroring the OS display-configuration
//!   records (paths, modes, adapter handles)
//! - **reconcile**: the pure algorithm that rewrites volatile identifiers in a
//!   stored topology so it can be re-applied on the live system

pub mod model;
pub mod reconcile;

pub use model::{AdapterId, DisplayMode, DisplayPath, ModeDetails, Topology};
pub use reconcile::reconcile;
