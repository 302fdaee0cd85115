//! Canned worlds shared by the examples, benchmarks and tests. Coordinates
//! are screen-style: x right, y down, world roughly 128 x 72.

use crate::space::Space;

pub mod fall;
pub mod orbit;
pub mod pendulum;
pub mod springs;
pub mod stack;

pub use fall::*;
pub use orbit::*;
pub use pendulum::*;
pub use springs::*;
pub use stack::*;

pub trait Scenario {
    fn name(&self) -> &str;

    fn create(&self) -> Space;

    fn update(&self, _space: &mut Space) {}
}
