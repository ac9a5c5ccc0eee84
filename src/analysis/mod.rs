// Derived analytics over the availability view.

pub mod board;
pub mod byes;
pub mod scarcity;
