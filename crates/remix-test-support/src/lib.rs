//! Shared test clocks and fixtures for the Remix relay session engine.

mod clock;

pub use clock::{FixedClock, SteppingClock, fixed_now};
