//! Storage backends for imported resource metadata.

pub mod memory;

pub use memory::MemoryResourceStore;
