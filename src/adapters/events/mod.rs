//! Event adapters - broadcast bus implementations.

mod in_memory;

pub use in_memory::InMemoryBroadcastBus;
