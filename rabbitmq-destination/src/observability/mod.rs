//! Structured logging vocabulary shared by the destination and broker adapters.

pub mod events;
pub mod fields;
