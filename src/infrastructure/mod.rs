// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod data_bridge;
pub mod snapshot_engine;
