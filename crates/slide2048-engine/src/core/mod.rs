//! Grid representation and move resolution.
//!
//! - [`Grid`] - Square cell array holding tile values
//! - [`Direction`] - The four slide directions
//! - [`slide`] - Slide/merge resolution for one direction, without spawning

pub use self::{direction::*, grid::*, slide::*};

pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod slide;
