//! Scene module
//!
//! Entities grouped by the model they draw, and the projection used to
//! render them.

mod entity;
mod projection;
mod scene;

pub use entity::Entity;
pub use projection::Projection;
pub use scene::{Scene, EntityKey};
