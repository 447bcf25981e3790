// Prompt templates for the navigation responder.

pub struct NavigationPrompt;

impl NavigationPrompt {
    /// Render the full generation prompt from the current surroundings
    /// description and the user's question. Accepts any description string,
    /// including the empty-scene indicator.
    pub fn render(surroundings: &str, question: &str) -> String {
        format!(
            "You are an AI assistant designed to help visually impaired individuals \
navigate their surroundings.
Your task is to provide clear, concise, and helpful responses based on the following information:

Surroundings description: {surroundings}

User's question: {question}

Please provide a response that:
1. Directly addresses the user's question
2. Uses the surroundings description to give context-aware guidance
3. Prioritizes safety and clarity in your instructions
4. Avoids assumptions about the user's abilities or the environment beyond what's described

Response:"
        )
    }
}

pub struct SpokenNotices;

impl SpokenNotices {
    /// Spoken when the responder call fails; never a stale prior answer.
    pub fn responder_failure() -> &'static str {
        "I couldn't reach the assistant service. Please try again in a moment."
    }

    /// Spoken when no question was understood.
    pub fn no_question() -> &'static str {
        "I didn't catch a question."
    }
}
