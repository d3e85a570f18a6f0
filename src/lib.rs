//! Concept Worker: Puzzle Concept Generation
//!
//! Keeps a downstream riddle-generation queue stocked with puzzle concepts.
//! Each concept is a super-solution, a themed clue and a pool of related
//! words, produced through a generative text service and normalized into the
//! uppercase, placeholder-encoded form the consumer expects.

pub mod config;
pub mod error;
pub mod generation;
pub mod locale;
pub mod logging;
pub mod monitor;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod publisher;
pub mod queue;
