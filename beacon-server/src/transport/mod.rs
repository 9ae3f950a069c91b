mod app;
mod tls;
mod ws_handler;
mod ws_sink;

pub use app::*;
pub use tls::*;
pub use ws_handler::*;
pub use ws_sink::*;
