//! Size-bounded chat histories
//!
//! Both containers keep messages in conversational order. When a capacity is
//! set, appending to a full history evicts one entry first: the oldest entry
//! for [`ChatHistory`], the oldest entry after the first for
//! [`FixedFirstChatHistory`], which keeps its persona message for the whole run.
use std::ops::Index;
use std::slice;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;

// Capacity is an upper bound, only the seed is allocated up front
fn seed_len(messages: &[Message], capacity: Option<usize>) -> usize {
    capacity.map_or(messages.len(), |capacity| capacity.min(messages.len()))
}

/// An ordered list of messages that drops its oldest entry when full
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistory {
    messages: Vec<Message>,
    capacity: Option<usize>,
}

impl ChatHistory {
    /// Create a history seeded with `messages`. `None` means unbounded.
    pub fn new(messages: Vec<Message>, capacity: Option<usize>) -> AgentResult<Self> {
        if capacity == Some(0) {
            return Err(AgentError::InvalidConfig(
                "chat history capacity must be at least 1".to_string(),
            ));
        }

        let mut history = Self {
            messages: Vec::with_capacity(seed_len(&messages, capacity)),
            capacity,
        };
        for message in messages {
            history.push(message);
        }
        Ok(history)
    }

    /// An unbounded history
    pub fn unbounded(messages: Vec<Message>) -> Self {
        Self {
            messages,
            capacity: None,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.evict_from(0);
        self.messages.push(message);
    }

    /// Remove entries at `index` until there is room for one more message.
    fn evict_from(&mut self, index: usize) {
        if let Some(capacity) = self.capacity {
            while self.messages.len() >= capacity && self.messages.len() > index {
                self.messages.remove(index);
            }
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

/// A [`ChatHistory`] that never evicts its first message
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFirstChatHistory {
    inner: ChatHistory,
}

impl FixedFirstChatHistory {
    /// Create a history whose first seed message is protected.
    ///
    /// A bounded history must hold the protected message plus at least one
    /// more, so capacities below 2 are rejected.
    pub fn new(messages: Vec<Message>, capacity: Option<usize>) -> AgentResult<Self> {
        if let Some(capacity) = capacity {
            if capacity < 2 {
                return Err(AgentError::InvalidConfig(format!(
                    "fixed-first chat history needs a capacity of at least 2, got {capacity}"
                )));
            }
        }

        let mut history = Self {
            inner: ChatHistory {
                messages: Vec::with_capacity(seed_len(&messages, capacity)),
                capacity,
            },
        };
        for message in messages {
            history.push(message);
        }
        Ok(history)
    }

    pub fn push(&mut self, message: Message) {
        self.inner.evict_from(1);
        self.inner.messages.push(message);
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        self.inner.as_slice()
    }
}

impl Index<usize> for ChatHistory {
    type Output = Message;

    fn index(&self, index: usize) -> &Message {
        &self.messages[index]
    }
}

impl Index<usize> for FixedFirstChatHistory {
    type Output = Message;

    fn index(&self, index: usize) -> &Message {
        &self.inner[index]
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a FixedFirstChatHistory {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(Message::content).collect()
    }

    #[test]
    fn test_unbounded_history_keeps_everything() -> Result<()> {
        let mut history = ChatHistory::new(Vec::new(), None)?;
        for i in 0..50 {
            history.push(Message::user(i.to_string()));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].content(), "0");
        assert_eq!(history.capacity(), None);
        Ok(())
    }

    #[test]
    fn test_bounded_history_is_fifo() -> Result<()> {
        let mut history = ChatHistory::new(vec![Message::system("persona")], Some(3))?;
        for i in 0..10 {
            history.push(Message::user(i.to_string()));
            assert!(history.len() <= 3);
        }
        assert_eq!(contents(history.as_slice()), vec!["7", "8", "9"]);
        Ok(())
    }

    #[test]
    fn test_bounded_history_trims_oversized_seed() -> Result<()> {
        let seed = (0..5).map(|i| Message::user(i.to_string())).collect();
        let history = ChatHistory::new(seed, Some(2))?;
        assert_eq!(contents(history.as_slice()), vec!["3", "4"]);
        Ok(())
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = ChatHistory::new(Vec::new(), Some(0));
        assert!(matches!(result, Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_fixed_first_keeps_system_prompt() -> Result<()> {
        let mut history =
            FixedFirstChatHistory::new(vec![Message::system("You are a helpful assistant")], Some(3))?;

        history.push(Message::user("Hello!"));
        history.push(Message::assistant("Hi there!"));
        assert_eq!(history.len(), 3);

        history.push(Message::user("How are you?"));
        assert_eq!(
            contents(history.as_slice()),
            vec!["You are a helpful assistant", "Hi there!", "How are you?"]
        );

        for i in 0..20 {
            history.push(Message::assistant(i.to_string()));
            assert_eq!(history.len(), 3);
            assert_eq!(history[0], Message::system("You are a helpful assistant"));
        }
        Ok(())
    }

    #[test]
    fn test_fixed_first_capacity_two() -> Result<()> {
        let mut history = FixedFirstChatHistory::new(vec![Message::system("persona")], Some(2))?;
        history.push(Message::user("a"));
        history.push(Message::user("b"));
        assert_eq!(contents(history.as_slice()), vec!["persona", "b"]);
        Ok(())
    }

    #[test]
    fn test_fixed_first_empty_protects_first_push() -> Result<()> {
        let mut history = FixedFirstChatHistory::new(Vec::new(), Some(2))?;
        assert!(history.is_empty());
        history.push(Message::system("first"));
        history.push(Message::user("a"));
        history.push(Message::user("b"));
        assert_eq!(contents(history.as_slice()), vec!["first", "b"]);
        Ok(())
    }

    #[test]
    fn test_fixed_first_small_capacity_rejected() {
        for capacity in [0, 1] {
            let result = FixedFirstChatHistory::new(vec![Message::system("s")], Some(capacity));
            assert!(matches!(result, Err(AgentError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_huge_capacity_allocates_only_what_is_pushed() -> Result<()> {
        let mut history = ChatHistory::new(vec![Message::system("s")], Some(usize::MAX))?;
        history.push(Message::user("u"));
        assert_eq!(contents(history.as_slice()), vec!["s", "u"]);
        assert_eq!(history.capacity(), Some(usize::MAX));

        let mut history =
            FixedFirstChatHistory::new(vec![Message::system("s")], Some(usize::MAX))?;
        for i in 0..5 {
            history.push(Message::user(i.to_string()));
        }
        assert_eq!(history.len(), 6);
        assert_eq!(history[0], Message::system("s"));
        Ok(())
    }

    #[test]
    fn test_iteration() -> Result<()> {
        let history = FixedFirstChatHistory::new(
            vec![Message::system("s"), Message::user("u")],
            None,
        )?;
        let roles: Vec<_> = (&history).into_iter().map(Message::role).collect();
        assert_eq!(
            roles,
            vec![
                crate::models::role::Role::System,
                crate::models::role::Role::User
            ]
        );
        Ok(())
    }
}
