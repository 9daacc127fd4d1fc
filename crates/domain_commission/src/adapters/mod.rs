//! Port adapters shipped with the domain

pub mod memory;

pub use memory::InMemoryRuleStore;
