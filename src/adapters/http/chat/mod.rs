//! Chat HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ChatAppState;
pub use routes::routes as chat_routes;
