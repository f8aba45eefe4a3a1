//! Integration tests for the placement portal

use placement_portal::auth::{AuthManager, NewUser, Role};
use placement_portal::chat::{MessageKind, PlacementChatbot, UserPreferences};
use placement_portal::config::Config;
use placement_portal::error::Result;
use placement_portal::extract::UploadExtractor;
use placement_portal::knowledge::KnowledgeBase;
use placement_portal::llm::{ChatOptions, LanguageModel};
use placement_portal::store::applications::{ApplicationManager, ApplicationStatus};
use placement_portal::store::jobs::{JobFilters, JobManager, NewJob};
use std::path::Path;

/// Minimal model double for flows that do not depend on reply content.
struct CannedModel;

impl LanguageModel for CannedModel {
    fn chat_stream(
        &self,
        _system: &str,
        _user: &str,
        _options: &ChatOptions,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let reply = "Practice coding interview questions daily.";
        on_fragment(reply);
        Ok(reply.to_string())
    }

    fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        Ok("canned feedback".to_string())
    }

    fn describe_image(&self, _prompt: &str, _image: &[u8], _max_tokens: u32) -> Result<String> {
        Ok("image text".to_string())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

fn new_job(title: &str, company: &str, skills: &str) -> NewJob {
    NewJob {
        title: title.to_string(),
        company: company.to_string(),
        location: "Bangalore".to_string(),
        salary_range: "20-40 LPA".to_string(),
        job_type: "Full-time".to_string(),
        deadline: "2026-12-31".to_string(),
        description: "Do the work.".to_string(),
        skills: skills.to_string(),
    }
}

#[test]
fn test_job_read_after_write_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let mut jobs = JobManager::open(dir.path()).unwrap();
        jobs.create(new_job("Software Engineer", "Google", "Python, SQL"))
            .unwrap()
            .id
    };

    // A fresh manager reads the same record back from disk.
    let jobs = JobManager::open(dir.path()).unwrap();
    let job = jobs.get(&id).unwrap();
    assert_eq!(job.title, "Software Engineer");
    assert_eq!(job.company, "Google");
    assert_eq!(job.skill_list(), vec!["Python", "SQL"]);
}

#[test]
fn test_application_lifecycle() {
    let dir = tempfile::tempdir().unwrap();

    let mut jobs = JobManager::open(dir.path()).unwrap();
    let job = jobs
        .create(new_job("Backend Engineer", "Initech", "Python"))
        .unwrap();

    let mut auth = AuthManager::open(dir.path()).unwrap();
    let user = auth
        .register(NewUser {
            email: "jane@atlas.edu".to_string(),
            password: "s3cret-pass".to_string(),
            name: "Jane Doe".to_string(),
            department: "CS".to_string(),
            year: "Final Year".to_string(),
        })
        .unwrap();

    let mut applications = ApplicationManager::open(dir.path()).unwrap();
    let application = applications
        .submit(&job.id, &user.user_id, None, Some("Hire me.".to_string()))
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);

    applications
        .update_status(&application.id, ApplicationStatus::Shortlisted)
        .unwrap();
    applications
        .withdraw(&application.id, Some("Found another offer"))
        .unwrap();

    // Everything survives a reload.
    let reloaded = ApplicationManager::open(dir.path()).unwrap();
    let stored = reloaded.get(&application.id).unwrap();
    assert_eq!(stored.status, ApplicationStatus::Withdrawn);
    assert_eq!(stored.withdrawal_reason.as_deref(), Some("Found another offer"));
    assert_eq!(stored.job_id, job.id);
    assert_eq!(stored.user_id, user.user_id);
}

#[test]
fn test_auth_roundtrip_and_default_accounts() {
    let dir = tempfile::tempdir().unwrap();

    let mut auth = AuthManager::open(dir.path()).unwrap();
    auth.bootstrap_defaults().unwrap();

    let admin = auth.authenticate("admin@atlas.edu", "admin123").unwrap();
    assert_eq!(admin.role, Role::Admin);

    // Stored credential is a salted hash, never the password itself.
    let stored = auth.find_by_email("admin@atlas.edu").unwrap();
    assert!(stored.password_hash.starts_with("$argon2"));
    assert_ne!(stored.password_hash, "admin123");

    assert!(auth.authenticate("admin@atlas.edu", "wrong").is_err());
}

#[test]
fn test_job_search_filters() {
    let dir = tempfile::tempdir().unwrap();
    let mut jobs = JobManager::open(dir.path()).unwrap();
    jobs.create(new_job("Data Engineer", "Globex", "Python, Spark"))
        .unwrap();
    jobs.create(new_job("Android Developer", "Initech", "Kotlin"))
        .unwrap();

    let filters = JobFilters {
        search_query: Some("spark".to_string()),
        ..Default::default()
    };
    let results = jobs.search(&filters);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Data Engineer");
}

#[test]
fn test_text_extraction_from_txt() {
    let mut extractor = UploadExtractor::new(500);
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = extractor.extract_file(path, None, &CannedModel).unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[test]
fn test_text_extraction_from_markdown() {
    let mut extractor = UploadExtractor::new(500);
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = extractor.extract_file(path, None, &CannedModel).unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Markdown formatting is stripped
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[test]
fn test_chat_session_over_seeded_knowledge() {
    let dir = tempfile::tempdir().unwrap();
    KnowledgeBase::seed(dir.path()).unwrap();
    let knowledge = KnowledgeBase::load(dir.path());

    let mut chatbot =
        PlacementChatbot::new(Box::new(CannedModel), knowledge, &Config::default());
    chatbot.set_preferences(UserPreferences {
        industry: Some("Technology".to_string()),
        skills: vec!["Python".to_string()],
    });

    // General chat streams the canned reply and follows up with
    // suggestions derived from it.
    let mut messages = Vec::new();
    chatbot
        .respond("How do I prepare for placements?", &mut |m| messages.push(m))
        .unwrap();
    assert!(messages
        .iter()
        .any(|m| m.kind == MessageKind::Text && m.content.contains("Practice coding")));
    assert_eq!(chatbot.memory().len(), 2);

    // The seeded posting catalog matches on the Python preference.
    let mut matches = Vec::new();
    chatbot
        .respond("find jobs", &mut |m| matches.push(m))
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind, MessageKind::JobMatch);
    assert!(matches[0].content.contains("Software Engineer"));
    assert!(matches[0].content.contains("Senior ML Engineer"));
    assert!(!matches[0].content.contains("Full Stack Developer"));
}

#[test]
fn test_mock_interview_end_to_end() {
    let mut chatbot = PlacementChatbot::new(
        Box::new(CannedModel),
        KnowledgeBase::default(),
        &Config::default(),
    );

    let mut opening = Vec::new();
    chatbot
        .respond("start mock interview", &mut |m| opening.push(m))
        .unwrap();
    assert!(opening[0].content.contains("**Question 1:**"));

    for turn in 0..3 {
        let mut replies = Vec::new();
        chatbot
            .respond("my answer", &mut |m| replies.push(m))
            .unwrap();
        assert!(replies[0].content.starts_with("**Feedback:**"));
        if turn < 2 {
            assert!(replies[1]
                .content
                .contains(&format!("**Question {}:**", turn + 2)));
        } else {
            assert!(replies[1].content.contains("concludes the mock interview"));
        }
    }

    assert!(!chatbot.is_interview_active());
}
