//! The chatbot orchestrator.
//!
//! Turns a user utterance into a streamed sequence of messages: routes
//! interview answers and trigger phrases, assembles the prompt for
//! general chat, re-emits model fragments as they arrive, and derives
//! follow-up suggestions. Any model-service failure surfaces as a
//! single error-typed message and ends the turn.

use crate::chat::interview::MockInterview;
use crate::chat::memory::ConversationMemory;
use crate::chat::message::{Message, MessageKind};
use crate::chat::prompts;
use crate::chat::suggest::generate_suggestions;
use crate::chat::UserPreferences;
use crate::config::Config;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::llm::{ChatOptions, LanguageModel};
use log::error;
use unicode_segmentation::UnicodeSegmentation;

const ERROR_REPLY: &str =
    "I'm sorry, but I encountered an error while processing your request. Please try again.";
const NO_RESUME_REPLY: &str =
    "I haven't received your resume yet. Please upload it, and then ask me to analyze it.";
const NO_MATCHES_REPLY: &str =
    "Sorry, I couldn't find any job opportunities that match your skills at the moment.";
const INTERVIEW_CLOSING: &str =
    "This concludes the mock interview. Great job! If you'd like to practice more, let me know.";

pub struct PlacementChatbot {
    model: Box<dyn LanguageModel>,
    options: ChatOptions,
    memory: ConversationMemory,
    knowledge: KnowledgeBase,
    preferences: UserPreferences,
    interview: MockInterview,
    resume_text: String,
    resume_uploaded: bool,
    summary_threshold: usize,
    max_suggestions: usize,
    summary_max_tokens: u32,
    critique_max_tokens: u32,
    feedback_max_tokens: u32,
}

impl PlacementChatbot {
    pub fn new(model: Box<dyn LanguageModel>, knowledge: KnowledgeBase, config: &Config) -> Self {
        Self {
            model,
            options: config.model.options.clone(),
            memory: ConversationMemory::new(config.chat.memory_capacity),
            knowledge,
            preferences: UserPreferences::default(),
            interview: MockInterview::default(),
            resume_text: String::new(),
            resume_uploaded: false,
            summary_threshold: config.chat.resume_summary_threshold,
            max_suggestions: config.chat.max_suggestions,
            summary_max_tokens: config.model.summary_max_tokens,
            critique_max_tokens: config.model.critique_max_tokens,
            feedback_max_tokens: config.model.feedback_max_tokens,
        }
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.preferences = preferences;
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Stores text extracted from an uploaded resume for later analysis.
    pub fn set_resume_text(&mut self, text: &str) {
        self.resume_text = text.to_string();
        self.resume_uploaded = !text.trim().is_empty();
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn is_interview_active(&self) -> bool {
        self.interview.is_active()
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    /// Responds to one user utterance, emitting messages as they are
    /// produced. Model failures are converted into an error message
    /// rather than propagated.
    pub fn respond(&mut self, query: &str, emit: &mut dyn FnMut(Message)) -> Result<()> {
        if self.interview.is_active() {
            return self.handle_interview_answer(query, emit);
        }

        let lowered = query.to_lowercase();
        if lowered.contains("start mock interview") {
            return self.start_interview(emit);
        }
        if lowered.contains("analyze my resume")
            || (lowered.contains("analyze") && lowered.contains("resume"))
        {
            return self.analyze_resume(emit);
        }
        if lowered.contains("find jobs") || lowered.contains("job matching") {
            return self.find_jobs(emit);
        }

        self.general_chat(query, emit)
    }

    fn general_chat(&mut self, query: &str, emit: &mut dyn FnMut(Message)) -> Result<()> {
        let system = prompts::build_chat_prompt(
            &self.preferences,
            &self.memory.format_context(),
            self.memory.context().current_focus.as_deref(),
            query,
        );

        self.memory.add(Message::user(query));

        let mut full_response = String::new();
        let outcome = self.model.chat_stream(&system, query, &self.options, &mut |fragment| {
            full_response.push_str(fragment);
            emit(Message::bot(fragment, MessageKind::Text));
        });

        if let Err(e) = outcome {
            error!("Error generating response: {}", e);
            emit(Message::bot(ERROR_REPLY, MessageKind::Error));
            return Ok(());
        }

        self.memory
            .add(Message::bot(&full_response, MessageKind::Text));

        let mut rng = rand::thread_rng();
        let suggestions =
            generate_suggestions(self.memory.context(), self.max_suggestions, &mut rng);
        if !suggestions.is_empty() {
            emit(Message::bot(&suggestions.join("\n"), MessageKind::Suggestion));
        }

        Ok(())
    }

    fn start_interview(&mut self, emit: &mut dyn FnMut(Message)) -> Result<()> {
        self.interview = MockInterview::default();
        match self.interview.start() {
            Some((number, question)) => {
                emit(Message::bot(
                    &format!(
                        "Let's begin the mock technical interview.\n\n**Question {}:** {}",
                        number, question
                    ),
                    MessageKind::Interview,
                ));
            }
            None => {
                emit(Message::bot(ERROR_REPLY, MessageKind::Error));
            }
        }
        Ok(())
    }

    fn handle_interview_answer(
        &mut self,
        answer: &str,
        emit: &mut dyn FnMut(Message),
    ) -> Result<()> {
        let Some((_, question)) = self.interview.current_question() else {
            emit(Message::bot(ERROR_REPLY, MessageKind::Error));
            return Ok(());
        };

        let prompt = prompts::interview_feedback_prompt(&question, answer);
        let feedback = match self.model.generate(&prompt, self.feedback_max_tokens) {
            Ok(feedback) => feedback,
            Err(e) => {
                error!("Error evaluating interview answer: {}", e);
                emit(Message::bot(ERROR_REPLY, MessageKind::Error));
                return Ok(());
            }
        };

        emit(Message::bot(
            &format!("**Feedback:** {}", feedback.trim()),
            MessageKind::Interview,
        ));

        match self.interview.advance() {
            Some((number, question)) => {
                emit(Message::bot(
                    &format!("**Question {}:** {}", number, question),
                    MessageKind::Interview,
                ));
            }
            None => {
                emit(Message::bot(INTERVIEW_CLOSING, MessageKind::Interview));
            }
        }

        Ok(())
    }

    fn analyze_resume(&mut self, emit: &mut dyn FnMut(Message)) -> Result<()> {
        if !self.resume_uploaded || self.resume_text.is_empty() {
            emit(Message::bot(NO_RESUME_REPLY, MessageKind::Error));
            return Ok(());
        }

        let mut resume_text = self.resume_text.clone();

        // Long resumes are summarized before the critique call.
        if resume_text.chars().count() > self.summary_threshold {
            let prompt = prompts::resume_summary_prompt(&resume_text);
            match self.model.generate(&prompt, self.summary_max_tokens) {
                Ok(summary) if !summary.trim().is_empty() => resume_text = summary,
                Ok(_) => resume_text = truncate_graphemes(&resume_text, self.summary_threshold),
                Err(e) => {
                    error!("Error summarizing resume: {}", e);
                    emit(Message::bot(ERROR_REPLY, MessageKind::Error));
                    return Ok(());
                }
            }
        }

        let prompt = prompts::resume_critique_prompt(&resume_text);
        match self.model.generate(&prompt, self.critique_max_tokens) {
            Ok(critique) => {
                emit(Message::bot(critique.trim(), MessageKind::ResumeFeedback));
            }
            Err(e) => {
                error!("Error analyzing resume: {}", e);
                emit(Message::bot(ERROR_REPLY, MessageKind::Error));
            }
        }

        Ok(())
    }

    fn find_jobs(&mut self, emit: &mut dyn FnMut(Message)) -> Result<()> {
        let user_skills: Vec<String> = self
            .preferences
            .skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        let matched: Vec<_> = self
            .knowledge
            .jobs
            .jobs
            .iter()
            .filter(|job| {
                job.required_skills
                    .iter()
                    .any(|required| user_skills.contains(&required.to_lowercase()))
            })
            .collect();

        if matched.is_empty() {
            emit(Message::bot(NO_MATCHES_REPLY, MessageKind::JobMatch));
            return Ok(());
        }

        let mut response =
            String::from("**Here are some job opportunities that match your skills:**\n");
        for job in matched {
            response.push_str(&format!(
                "- **{}** at **{}**\n  Skills Required: {}\n  Location: {}\n\n",
                job.title,
                job.company,
                job.required_skills.join(", "),
                job.location
            ));
        }
        emit(Message::bot(&response, MessageKind::JobMatch));

        Ok(())
    }
}

fn truncate_graphemes(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}
