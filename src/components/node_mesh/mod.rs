mod component;
mod layout;
mod render;
mod state;
mod types;

pub use component::NodeMeshCanvas;
pub use types::Variant;
