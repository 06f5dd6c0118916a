pub mod commands;
pub mod events;
pub mod mentions;
pub mod types;

pub use commands::ClientCommand;
pub use events::ServerEvent;
pub use types::{Attachment, AttachmentKind, Chat, ChatKind, ChatMessage, ChatSummary, User};
