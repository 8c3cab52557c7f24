//! Stock middleware and destinations

pub mod json;
pub mod middleware;

pub use middleware::{after, fail, guard, map, rescue, rewrite, tap};
