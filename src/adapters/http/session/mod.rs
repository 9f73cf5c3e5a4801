//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateSessionRequest, ListSessionsParams, SessionResponse, UpdateSessionRequest,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
