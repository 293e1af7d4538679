pub mod builder;
pub mod engine;
pub mod state;

pub use builder::WorkspaceBuilder;
pub use engine::Workspace;
pub use state::{ImportReport, WorkspaceEvent};
