//! Prompt construction for the primary completion call.
//!
//! Pure: assembles the system instruction (parameterized by user class) and
//! the accumulated history into a [`CompletionRequest`]. No I/O.

use crate::ports::{CompletionRequest, Message, MessageRole};

use super::types::UserClass;

/// Base system instruction used when configuration does not override it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an intake assistant for a trades marketplace. \
Customers describe jobs they need done; tradespeople describe the services they offer. \
Ask focused follow-up questions to gather the details needed to match them: for customers \
the service type, urgency, location and budget; for tradespeople their skills, \
qualifications, availability and service areas. Be concise and friendly.";

/// Builds completion requests from the fixed instruction template,
/// the user class marker, and conversation history.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_message: String,
}

impl PromptBuilder {
    /// Creates a builder with the default system instruction.
    pub fn new() -> Self {
        Self {
            system_message: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Creates a builder with a custom base instruction.
    pub fn with_system_message(system_message: impl Into<String>) -> Self {
        Self {
            system_message: system_message.into(),
        }
    }

    /// System prompt for the given user class: base instruction plus the
    /// user-class marker.
    pub fn system_prompt_for(&self, user_class: UserClass) -> String {
        format!(
            "{}\n\nCurrent user type: {}",
            self.system_message,
            user_class.as_str()
        )
    }

    /// Assembles the full completion request: system prompt, prior history,
    /// then the new user message.
    pub fn build(
        &self,
        user_class: UserClass,
        prior_history: &[Message],
        user_text: &str,
    ) -> CompletionRequest {
        let mut request =
            CompletionRequest::new().with_system_prompt(self.system_prompt_for(user_class));
        request.messages.reserve(prior_history.len() + 1);
        request.messages.extend_from_slice(prior_history);
        request
            .messages
            .push(Message::new(MessageRole::User, user_text));
        request
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_user_class_marker() {
        let builder = PromptBuilder::new();

        let customer = builder.system_prompt_for(UserClass::Customer);
        assert!(customer.ends_with("Current user type: CUSTOMER"));

        let tradesperson = builder.system_prompt_for(UserClass::Tradesperson);
        assert!(tradesperson.ends_with("Current user type: TRADESPERSON"));
    }

    #[test]
    fn build_orders_history_before_new_message() {
        let builder = PromptBuilder::new();
        let history = vec![
            Message::user("I need help"),
            Message::assistant("What kind of help?"),
        ];

        let request = builder.build(UserClass::Customer, &history, "A leaking tap");

        assert!(request.system_prompt.is_some());
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].content, "I need help");
        assert_eq!(request.messages[1].content, "What kind of help?");
        assert_eq!(request.messages[2].content, "A leaking tap");
        assert_eq!(request.messages[2].role, MessageRole::User);
    }

    #[test]
    fn build_with_empty_history_has_single_message() {
        let builder = PromptBuilder::new();
        let request = builder.build(UserClass::Tradesperson, &[], "I'm a plumber");

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "I'm a plumber");
    }

    #[test]
    fn custom_system_message_is_used() {
        let builder = PromptBuilder::with_system_message("Short instruction.");
        let prompt = builder.system_prompt_for(UserClass::Customer);

        assert!(prompt.starts_with("Short instruction."));
        assert!(prompt.contains("Current user type: CUSTOMER"));
    }
}
