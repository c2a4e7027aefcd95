//! Per-frame integrators for the rock's motion and wear.
//!
//! [`BounceSimulator`] handles the tap-to-bounce hop; [`ErosionSimulator`]
//! shrinks the rock's render scale over accelerated simulated time. Both are
//! plain synchronous state machines stepped once per simulation tick.

mod bounce;
mod erosion;

pub use bounce::{BounceSimulator, BounceState, ContactPolicy, PhysicsState, rest_offset_for};
pub use erosion::{ErosionSimulator, ErosionState};
