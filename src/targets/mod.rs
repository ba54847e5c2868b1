//! Target implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod network;

pub use console::ConsoleTarget;
pub use file::{FileTarget, DEFAULT_FLUSH_INTERVAL};
pub use memory::{MemoryTarget, SharedBuffer};
pub use network::NetworkTarget;

pub use crate::core::Target;
