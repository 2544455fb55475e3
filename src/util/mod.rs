// Utilities
// Configuration shared by the library and the command line

pub mod config;

pub use config::EngineConfig;
