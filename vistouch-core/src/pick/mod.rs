//! Color-indexed picking
//!
//! Each touchable object gets a stable pick color. The renderer paints the
//! active page in pick colors into an offscreen surface and reads back the
//! pixel under the finger.

pub mod colors;
pub mod renderer;

pub use colors::PickColorTable;
pub use renderer::PickRenderer;
