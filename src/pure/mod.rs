//! Side effect free building blocks used by the client tracking logic
pub mod geometry;

#[doc(inline)]
pub use geometry::{Point, Rect};
