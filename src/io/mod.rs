// Rendering and export of sheet snapshots

pub mod export;
pub mod render;

pub use export::*;
pub use render::*;
