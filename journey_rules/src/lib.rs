//! # Journey Rules
//!
//! The "Story Bible" crate - holds the twelve-stage journey, stage goals, player
//! knowledge, characters, and the world graph. This crate is the single source of
//! truth for story data and does not contain any narration or session logic.

pub mod entities;
pub mod journey;
pub mod story_elements;
pub mod world_state;

pub use entities::*;
pub use journey::*;
pub use story_elements::*;
pub use world_state::*;
