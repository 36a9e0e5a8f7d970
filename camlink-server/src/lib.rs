mod app;
mod config;
mod directory;
mod error;
mod hub;
mod matchmaking;
mod registry;
mod room;
mod signaling;

pub use app::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use hub::*;
pub use matchmaking::*;
pub use registry::*;
pub use room::*;
pub use signaling::*;
