//! Canned follow-up suggestions.
//!
//! A fixed rule table keyed on the detected topics plus the first
//! mentioned company and skill; deduplicated and randomly sampled down
//! to the configured maximum.

use crate::chat::memory::ConversationContext;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

const TECHNICAL_SUGGESTIONS: [&str; 3] = [
    "Can you provide more coding examples?",
    "What are the best practices for this?",
    "How can I practice these concepts?",
];

const INTERVIEW_SUGGESTIONS: [&str; 3] = [
    "What are common follow-up questions?",
    "How should I handle behavioral questions?",
    "Can we do a mock interview?",
];

const CAREER_SUGGESTIONS: [&str; 3] = [
    "What skills should I focus on next?",
    "How can I prepare for this role?",
    "What are the growth opportunities?",
];

pub fn generate_suggestions<R: Rng + ?Sized>(
    context: &ConversationContext,
    max_suggestions: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();

    if context.topics.contains("technical") {
        suggestions.extend(TECHNICAL_SUGGESTIONS.iter().map(|s| s.to_string()));
    }
    if context.topics.contains("interview") {
        suggestions.extend(INTERVIEW_SUGGESTIONS.iter().map(|s| s.to_string()));
    }
    if context.topics.contains("career") {
        suggestions.extend(CAREER_SUGGESTIONS.iter().map(|s| s.to_string()));
    }

    if let Some(company) = context.companies_mentioned.iter().next() {
        let company = title_case(company);
        suggestions.push(format!("What is {}'s interview process?", company));
        suggestions.push(format!("What skills does {} value?", company));
        suggestions.push(format!("How can I prepare for {}?", company));
    }

    if let Some(skill) = context.skills_mentioned.iter().next() {
        suggestions.push(format!("How can I master {}?", skill));
        suggestions.push(format!("What projects can I build with {}?", skill));
        suggestions.push(format!("Which companies value {}?", skill));
    }

    // Dedupe, then sample down to the cap.
    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.clone()));
    suggestions.shuffle(rng);
    suggestions.truncate(max_suggestions);
    suggestions
}

fn title_case(word: &str) -> String {
    word.split_whitespace()
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn context_with(
        topics: &[&str],
        skills: &[&str],
        companies: &[&str],
    ) -> ConversationContext {
        ConversationContext {
            topics: topics.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            skills_mentioned: skills.iter().map(|s| s.to_string()).collect(),
            companies_mentioned: companies.iter().map(|s| s.to_string()).collect(),
            current_focus: None,
        }
    }

    fn full_pool(context: &ConversationContext) -> HashSet<String> {
        let mut pool: HashSet<String> = HashSet::new();
        pool.extend(TECHNICAL_SUGGESTIONS.iter().map(|s| s.to_string()));
        pool.extend(INTERVIEW_SUGGESTIONS.iter().map(|s| s.to_string()));
        pool.extend(CAREER_SUGGESTIONS.iter().map(|s| s.to_string()));
        for company in &context.companies_mentioned {
            let company = title_case(company);
            pool.insert(format!("What is {}'s interview process?", company));
            pool.insert(format!("What skills does {} value?", company));
            pool.insert(format!("How can I prepare for {}?", company));
        }
        for skill in &context.skills_mentioned {
            pool.insert(format!("How can I master {}?", skill));
            pool.insert(format!("What projects can I build with {}?", skill));
            pool.insert(format!("Which companies value {}?", skill));
        }
        pool
    }

    #[test]
    fn test_at_most_three_unique_from_pool() {
        let context = context_with(
            &["technical", "interview", "career"],
            &["python"],
            &["google"],
        );
        let mut rng = StdRng::seed_from_u64(7);

        let suggestions = generate_suggestions(&context, 3, &mut rng);
        assert!(suggestions.len() <= 3);
        assert!(!suggestions.is_empty());

        let unique: HashSet<&String> = suggestions.iter().collect();
        assert_eq!(unique.len(), suggestions.len());

        let pool = full_pool(&context);
        assert!(suggestions.iter().all(|s| pool.contains(s)));
    }

    #[test]
    fn test_empty_context_yields_nothing() {
        let context = ConversationContext::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_suggestions(&context, 3, &mut rng).is_empty());
    }

    #[test]
    fn test_company_and_skill_templates() {
        let context = context_with(&[], &["sql"], &["amazon"]);
        let mut rng = StdRng::seed_from_u64(7);

        let suggestions = generate_suggestions(&context, 10, &mut rng);
        assert_eq!(suggestions.len(), 6);
        assert!(suggestions.iter().any(|s| s.contains("Amazon")));
        assert!(suggestions.iter().any(|s| s.contains("sql")));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("google"), "Google");
        assert_eq!(title_case("machine learning"), "Machine Learning");
    }
}
