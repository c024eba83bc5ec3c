#![deny(warnings)]

//! AI for computer-controlled countries.
//!
//! Each archetype ranks the five axes; the allocator spends the whole
//! development budget along that ranking with a little randomness, and the
//! planner can temporarily reorder priorities when the country is in crisis
//! or outgunned by a rival.

pub mod allocate;
pub mod planner;
pub mod strategy;

pub use allocate::allocate;
pub use planner::{choose_project, detect_reaction, effective_weights, take_turn, AiConfig, Outlook, Reaction, Turn};
pub use strategy::{by_priority, prioritize, Strategy, UnknownStrategy, Weights};
