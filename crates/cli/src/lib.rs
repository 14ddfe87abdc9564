//! Public library modules for the CLI crate
pub mod browse;
pub mod export;
pub mod paths;
pub mod server;
