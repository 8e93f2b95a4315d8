//! Prompt constants and retrieval-context formatting for the query pipeline.

use lectern_core::types::{ConversationMessage, QueryMatch};

/// Persona and output contract for the recommendation assistant.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in helping students find professors based on their specific needs and preferences. Your primary function is to use a Retrieval-Augmented Generation (RAG) system to provide the top 3 most relevant professor recommendations for each user query.

Your knowledge base consists of comprehensive professor reviews, ratings, and course information. When a student asks a question or provides criteria for a professor, you will:

1. Analyze the query to understand the student's requirements.
2. Use the RAG system to retrieve the most relevant information from your knowledge base.
3. Process and synthesize this information to identify the top 3 professors that best match the student's needs.
4. Present these recommendations in a clear, concise, and informative manner.

For each professor recommendation, provide:
- Professor's name
- Department/Subject area
- Overall rating (out of 5 stars)
- A brief summary of their strengths and any potential drawbacks
- Any specific comments or insights that are particularly relevant to the student's query

Remember to:
- Be objective and balanced in your recommendations.
- Highlight both positive and negative aspects of each professor when relevant.
- Tailor your responses to the specific needs expressed in the student's query.
- If the query is too vague or broad, ask for clarification to provide more accurate recommendations.
- If there aren't enough matches for 3 recommendations, explain this and provide as many relevant options as possible.

Your goal is to help students make informed decisions about their course selections by providing accurate, helpful, and personalized professor recommendations.";

/// Header prefixed to the retrieval context appended to the user's message.
const RESULTS_HEADER: &str = "\n\nReturned results from vector db (done automatically):";

/// Format retrieved matches into the context block appended to the query.
///
/// One fragment per match, blank-line separated. The Review line repeats the
/// stars value; that duplication is part of the established output contract.
/// Matches without metadata contribute nothing.
pub fn format_results(matches: &[QueryMatch]) -> String {
    let mut block = String::from(RESULTS_HEADER);
    for m in matches {
        let Some(meta) = &m.metadata else { continue };
        block.push_str(&format!(
            "\n\nProfessor: {}\nReview: {}\nSubject: {}\nStars: {}",
            m.id, meta.stars, meta.subject, meta.stars
        ));
    }
    block
}

/// Assemble the final message list sent to the generation service:
/// the system instruction, every prior message unmodified, then the
/// augmented last user turn.
pub fn assemble_messages(
    prior: &[ConversationMessage],
    augmented_last: String,
) -> Vec<ConversationMessage> {
    let mut assembled = Vec::with_capacity(prior.len() + 2);
    assembled.push(ConversationMessage::system(SYSTEM_PROMPT));
    assembled.extend_from_slice(prior);
    assembled.push(ConversationMessage::user(augmented_last));
    assembled
}
