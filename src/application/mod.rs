// Application layer - Use cases and ports
pub mod dashboard_service;
pub mod render_engine;
pub mod table_source;
