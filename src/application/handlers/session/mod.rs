//! Session command and query handlers.

mod create_session;
mod delete_session;
mod queries;
mod registration;
mod update_session;

pub use create_session::{CreateSessionCommand, CreateSessionHandler};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use queries::{GetSessionHandler, GetSessionQuery, ListSessionsHandler, ListSessionsQuery};
pub use registration::{
    RegisterStudentCommand, RegisterStudentHandler, UnregisterStudentCommand,
    UnregisterStudentHandler,
};
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler};
