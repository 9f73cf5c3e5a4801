//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::session::{
    CreateSessionCommand, CreateSessionHandler, DeleteSessionCommand, DeleteSessionHandler,
    GetSessionHandler, GetSessionQuery, ListSessionsHandler, ListSessionsQuery,
    RegisterStudentCommand, RegisterStudentHandler, UnregisterStudentCommand,
    UnregisterStudentHandler, UpdateSessionCommand, UpdateSessionHandler,
};
