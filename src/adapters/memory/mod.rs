//! In-memory adapters - guarded-map implementations of the storage ports.
//!
//! These back tests and demo mode. The session repository is a second,
//! fully conformant implementation of the scheduling core's atomicity
//! contract; the collaborator stores hold their module's records in
//! process.

mod conversation_store;
mod feedback_repository;
mod notification_store;
mod pairing_repository;
mod resource_store;
mod session_repository;
mod user_directory;

pub use conversation_store::InMemoryConversationStore;
pub use feedback_repository::InMemoryFeedbackRepository;
pub use notification_store::InMemoryNotificationStore;
pub use pairing_repository::InMemoryPairingRepository;
pub use resource_store::InMemoryResourceStore;
pub use session_repository::InMemorySessionRepository;
pub use user_directory::{InMemoryUserDirectory, DEMO_PASSWORD};
