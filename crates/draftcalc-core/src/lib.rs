// Library root: the draft engine and the pieces it is built from. Front ends
// depend on `engine::DraftEngine`; the other modules are public so tests and
// tools can use them directly.

pub mod catalog;
pub mod draft;
pub mod engine;
pub mod error;
pub mod league;
pub mod player;
pub mod reasoning;
pub mod roster;
pub mod scorer;
pub mod scoring;
pub mod sources;

pub use engine::DraftEngine;
pub use error::{DraftError, Result};
