pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod geo;
pub mod notify;
pub mod server;
pub mod store;
pub mod task;
