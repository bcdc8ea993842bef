//! Map editor state
//!
//! Headless editing session used by the editor front end.

pub mod session;

pub use session::EditorSession;
