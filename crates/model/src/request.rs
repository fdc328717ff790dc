/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The input messages, in conversation order.
    pub messages: Vec<ModelMessage>,
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}

impl ModelMessage {
    /// Returns the text content of the message.
    #[inline]
    pub fn content(&self) -> &str {
        match self {
            ModelMessage::System(content)
            | ModelMessage::User(content)
            | ModelMessage::Assistant(content) => content,
        }
    }

    /// Returns `true` if this is a system message.
    #[inline]
    pub fn is_system(&self) -> bool {
        matches!(self, ModelMessage::System(_))
    }
}
