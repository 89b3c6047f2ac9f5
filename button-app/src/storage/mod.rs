pub mod registry;

pub use registry::ActiveSessionRegistry;
