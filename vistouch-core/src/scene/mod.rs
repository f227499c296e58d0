//! Scene graph
//!
//! Named, numbered pages of z-ordered drawable objects, edited through a
//! staging copy and rendered with `embedded-graphics`.

pub mod page;
pub mod paint;
pub mod shape;
pub mod store;

pub use page::{make_name, Name, ObjectData, ObjectNum, Page, ZIndex};
pub use paint::{ImageLoader, Ink, NoImages};
pub use shape::*;
pub use store::{DrawError, Scene, SceneError};
