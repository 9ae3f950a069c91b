pub mod auth;
pub mod config;
pub mod error;
pub mod hub;
pub mod registry;
pub mod room;
pub mod signaling;
pub mod transport;

pub use auth::*;
pub use config::*;
pub use error::*;
pub use hub::*;
pub use registry::*;
pub use room::*;
pub use signaling::*;
pub use transport::*;
