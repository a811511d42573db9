pub mod auth;
pub mod errors;
pub mod routes;
mod server;
pub mod services;
pub mod state;

pub use server::{ServerConfig, serve};
