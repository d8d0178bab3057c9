//! Append-only conversation history.

use crate::llm::ChatMessage;

/// Ordered message sequence sent to the model.
///
/// Messages can be appended and read but never edited or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Owned copy of the messages for a request.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::system("sys"));
        conversation.push(ChatMessage::user("hello"));

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.last().unwrap().content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::user("one"));
        let snapshot = conversation.snapshot();
        conversation.push(ChatMessage::user("two"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(conversation.len(), 2);
    }
}
