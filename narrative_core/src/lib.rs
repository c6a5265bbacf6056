//! # Narrative Core
//!
//! The engine of Hearthtale. This crate builds on `journey_rules` to move a
//! player through the twelve-stage journey, keeps track of who they have met
//! and what they have found, and assembles context for narration.
//!
//! ## Core Components
//!
//! - **roster**: Characters, relationships, arcs, and planned introductions
//! - **stage_machine**: Goal/knowledge checklist gating stage transitions
//! - **discoveries**: Tagged record of what the player has explored, met, found, or learned
//! - **context_assembler**: Builds the narration context and prompt for a turn
//! - **narration**: The text-generation seam, with timeouts and story-element generation
//! - **session**: Per-player orchestration and the session store
//!
//! ## Design Philosophy
//!
//! - **Session-Scoped**: Every game owns its own world, roster, and journey; nothing is global
//! - **Checklist-Driven**: Stages advance only when every goal's actions and knowledge are met
//! - **Never Broken**: Narration failures always degrade to deterministic fallback text

pub mod config;
pub mod context_assembler;
pub mod discoveries;
pub mod error;
pub mod narration;
pub mod roster;
pub mod session;
pub mod stage_machine;

pub use config::*;
pub use context_assembler::*;
pub use discoveries::*;
pub use error::*;
pub use narration::*;
pub use roster::*;
pub use session::*;
pub use stage_machine::*;
