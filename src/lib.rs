pub mod config;
pub mod filter;
pub mod icons;
pub mod market;
pub mod server;

pub use config::Config;
pub use server::AppState;
