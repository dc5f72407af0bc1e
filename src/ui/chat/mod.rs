//! Chat widget components.
//!
//! Every control posts to the widget host through HTMX and swaps in the
//! fragment the host renders back.

mod directives;
mod header;
mod input_area;
mod message;
mod message_list;
mod shell;

pub use directives::{DirectiveQueue, payload};
pub use header::ChatHeader;
pub use input_area::{ChatInputArea, MicrophoneButton, SpeakerButton};
pub use message::{ChatMessage, FEEDBACK_THANKS, FeedbackRegion, TRANSLATE_LABEL, TypingIndicator};
pub use message_list::{ChatMessageList, ReplyTriggers};
pub use shell::ChatShell;
