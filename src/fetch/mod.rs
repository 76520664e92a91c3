//! Target resolution and resource loading

pub mod resource;
pub mod target;

pub use resource::load_resource;
pub use target::{Target, TargetKind};
