//! Prompt templates for the placement assistant.

use crate::chat::UserPreferences;

pub const SYSTEM_PROMPT: &str = "\
You are Atlas SkillTech University's AI Placement Assistant. You provide
comprehensive, contextually aware assistance for placement preparation and
career guidance.

Core Capabilities:
1. Technical Preparation
   - DSA and coding guidance
   - System design concepts
   - Technology stack advice
   - Best practices and patterns

2. Interview Excellence
   - Technical interview strategies
   - HR interview preparation
   - Company-specific insights
   - Mock interview simulation

3. Career Strategy
   - Industry trends analysis
   - Career path planning
   - Skill gap assessment
   - Growth opportunity identification

4. Placement Support
   - Application strategies
   - Resume optimization
   - Company research
   - Salary negotiation tips

Communication Style:
- Professional yet approachable
- Clear and structured responses
- Examples and analogies when helpful
- Step-by-step explanations

Remember:
- Stay focused on placement and career
- Provide accurate technical information
- Be encouraging and supportive
- Acknowledge limitations when appropriate";

/// Assembles the full system prompt: instructions, user preferences,
/// conversation context, focus-dependent format hints, and the query.
pub fn build_chat_prompt(
    preferences: &UserPreferences,
    context: &str,
    current_focus: Option<&str>,
    query: &str,
) -> String {
    let mut prompt = SYSTEM_PROMPT.to_string();

    if !preferences.is_empty() {
        prompt.push_str("\nUser Preferences:");
        if let Some(industry) = &preferences.industry {
            prompt.push_str(&format!("\n- Industry: {}", industry));
        }
        if !preferences.skills.is_empty() {
            prompt.push_str(&format!("\n- Skills: {}", preferences.skills.join(", ")));
        }
    }

    if !context.is_empty() {
        prompt.push_str(&format!("\n\nConversation Context:\n{}", context));
    }

    prompt.push_str(&format!("\n\n{}", format_instructions(current_focus)));
    prompt.push_str(&format!("\n\nUser Query: {}", query));

    prompt
}

/// Response-shaping hints keyed on the current conversation focus.
fn format_instructions(current_focus: Option<&str>) -> String {
    let mut instructions = vec!["Response Instructions:"];

    match current_focus {
        Some("technical") => instructions.extend([
            "- Provide code examples in markdown format",
            "- Include best practices and patterns",
            "- Add relevant technical explanations",
            "- Suggest resources for further learning",
        ]),
        Some("conceptual") => instructions.extend([
            "- Explain the underlying concepts step by step",
            "- Use analogies and concrete examples",
            "- Define terms before using them",
            "- Summarize the key takeaways",
        ]),
        Some("career") => instructions.extend([
            "- Offer strategic career advice",
            "- Include industry insights",
            "- Suggest skill development paths",
            "- Provide actionable steps",
        ]),
        _ => instructions.extend([
            "- Structure response clearly",
            "- Include relevant examples",
            "- Add practical tips",
            "- Suggest next steps",
        ]),
    }

    instructions.join("\n")
}

pub fn resume_summary_prompt(resume_text: &str) -> String {
    format!(
        "Summarize the following resume in 1000 characters or less:\n\n{}\n\nSummary:",
        resume_text
    )
}

pub fn resume_critique_prompt(resume_text: &str) -> String {
    format!(
        "Analyze the following resume and provide suggestions for improvement:\n\n{}\n\nSuggestions:",
        resume_text
    )
}

pub fn interview_feedback_prompt(question: &str, answer: &str) -> String {
    format!(
        "Evaluate the following answer for correctness, completeness, and clarity. \
         Provide constructive feedback.\n\nQuestion: {}\nAnswer: {}\n\nFeedback:",
        question, answer
    )
}
