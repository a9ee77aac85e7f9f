pub mod category;
pub mod conversation;
pub mod filter;
pub mod listing;

pub use category::ServiceCategory;
pub use conversation::{
    Conversation, ConversationMessage, ConversationSlots, DialogueState, SlotKey,
};
pub use filter::{CategoryQuery, SearchFilter};
pub use listing::{SearchResultSet, ServiceRecord};
