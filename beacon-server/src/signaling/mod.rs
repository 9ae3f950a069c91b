mod message_router;
mod presence_notifier;

pub use message_router::*;
pub use presence_notifier::*;
