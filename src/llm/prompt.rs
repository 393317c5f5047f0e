// src/llm/prompt.rs

use crate::llm::message::ChatMessage;

/// Builds the canonical message sequence consumed by every provider adapter.
///
/// System turn first, then the caller-supplied history unmodified, then
/// exactly one user turn carrying the query (and the retrieved context when
/// it is non-blank). Pure; identical inputs produce identical output.
pub fn build_messages(
    query: &str,
    context: Option<&str>,
    history: &[ChatMessage],
    system_prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);

    let user_content = match context {
        Some(ctx) if !ctx.trim().is_empty() => format!(
            "Query: {query}\n\nRelevant Information:\n{ctx}\n\nPlease provide a direct and natural answer."
        ),
        _ => format!("Query: {query}\n\nPlease provide a helpful answer."),
    };
    messages.push(ChatMessage::user(user_content));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Role;

    #[test]
    fn system_turn_comes_first_verbatim() {
        let messages = build_messages("q", None, &[], "be helpful");
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "be helpful");
    }

    #[test]
    fn history_is_preserved_in_caller_order() {
        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("second"),
            ChatMessage::user("third"),
        ];
        let messages = build_messages("q", None, &history, "sys");
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1..4], history[..]);
    }

    #[test]
    fn context_lands_in_final_user_turn_only() {
        let messages = build_messages("visa rules?", Some("Japan waives visas."), &[], "sys");
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.contains("Query: visa rules?"));
        assert!(last.content.contains("Relevant Information:\nJapan waives visas."));
        assert!(!messages[0].content.contains("Japan"));
    }

    #[test]
    fn blank_context_is_treated_as_absent() {
        let with_blank = build_messages("q", Some("   \n"), &[], "sys");
        let without = build_messages("q", None, &[], "sys");
        assert_eq!(with_blank, without);
        assert!(with_blank.last().unwrap().content.contains("helpful answer"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let a = build_messages("q", Some("ctx"), &history, "sys");
        let b = build_messages("q", Some("ctx"), &history, "sys");
        assert_eq!(a, b);
    }
}
