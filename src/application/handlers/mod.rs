//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Only the
//! scheduling core carries this layer; the collaborator modules are plain
//! CRUD and their HTTP adapters talk to the ports directly.

pub mod session;
