//! Session scoping for the on-disk store
//!
//! In a browser the session is the tab. On the command line a session is a
//! directory under the sessions root, selected by id.

pub mod manager;
pub mod state;

pub use manager::SessionManager;
pub use state::{validate_id, Session, SessionInfo};
