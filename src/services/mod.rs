pub mod ai;
pub mod alias;
pub mod catalog;
pub mod conversation;
pub mod intent;
pub mod search;
