//! Conversation types exchanged with the chat-completion service
//!
//! The wire format of every supported provider is the flat
//! `{"role": ..., "content": ...}` object, so the internal message maps onto it
//! directly and providers serialize it as is.
pub mod message;
pub mod role;
