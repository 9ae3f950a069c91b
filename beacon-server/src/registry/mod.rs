mod connection;
mod connection_registry;

pub use connection::*;
pub use connection_registry::*;
