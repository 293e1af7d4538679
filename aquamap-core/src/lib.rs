//! Field-data marker engine: per-category marker stores, validation, the
//! add/edit session and the glue that turns map events into store changes.

pub mod aggregation;
pub mod catalog;
pub mod error;
pub mod interaction;
pub mod logger;
pub mod map_port;
pub mod sampling;
pub mod session;
pub mod store;
pub mod validation;
pub mod workspace;

pub use error::{AquamapError, StoreError, ValidationError};
pub use workspace::{Workspace, WorkspaceBuilder};
