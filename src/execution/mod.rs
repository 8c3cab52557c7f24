//! Pipeline execution engine

pub mod engine;
pub mod events;
pub mod offer;
pub mod stack;

pub use engine::run;
pub use events::{EventBus, EventHandler, ExecutionEvent};
pub use offer::{OfferChain, OfferOutcome};
pub use stack::{ExecutionStack, Frame};
