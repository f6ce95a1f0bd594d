// Library root: the WebSocket front end over `draftcalc_core`. Exposed as a
// library so integration tests can drive the server without the binary.

pub mod config;
pub mod handler;
pub mod protocol;
pub mod ws_server;
