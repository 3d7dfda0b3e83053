pub mod command;
pub mod connectivity;
pub mod creation;
pub mod document;
pub mod error;
pub mod math;
pub mod mesh;
pub mod query;
pub mod selection;
pub mod selector;
pub mod topology;
pub mod view;

pub use command::{Command, CommandGroup, CommandHistory, SelectionTarget};
pub use document::{Document, Scene};
pub use error::{MeshpickError, Result};
pub use selection::{EntityKind, EntityRef, SelectRegion, SelectionLevel, SelectionSettings};
pub use selector::Selector;
pub use view::{OrthographicView, PlaneCut, ViewSession, ViewTransform};
