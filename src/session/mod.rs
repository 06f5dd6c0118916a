pub mod presence;
pub mod sync;

pub use presence::{PresenceTracker, TypingSignal};
pub use sync::{ChatSync, Incoming, OpenChat};
