//! Placement portal: job listings, applications, admin console, and an
//! AI placement-assistant chatbot over flat-file storage.

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use placement_portal::auth::{require_admin, AuthManager, NewUser, Session};
use placement_portal::chat::{Message, MessageKind, PlacementChatbot, UserPreferences};
use placement_portal::cli::{AdminAction, ApplicationAction, Cli, Commands, JobAction};
use placement_portal::config::Config;
use placement_portal::error::{PortalError, Result};
use placement_portal::extract::UploadExtractor;
use placement_portal::knowledge::KnowledgeBase;
use placement_portal::llm::OllamaClient;
use placement_portal::output;
use placement_portal::store::applications::{ApplicationManager, ApplicationStatus};
use placement_portal::store::jobs::{JobFilters, JobManager, JobStatus, NewJob};
use std::io::{BufRead, Write};
use std::path::Path;
use std::process;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config) {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Init => cmd_init(&config),
        Commands::Register {
            email,
            name,
            department,
            year,
        } => cmd_register(&config, email, name, department, year),
        Commands::Login { email } => {
            let session = login(&config, &email)?;
            println!(
                "Welcome back, {}! You are logged in as {}.",
                session.name, session.role
            );
            Ok(())
        }
        Commands::Jobs { action } => cmd_jobs(&config, action),
        Commands::Apply {
            job_id,
            email,
            resume,
            cover_letter,
        } => cmd_apply(&config, &job_id, &email, resume.as_deref(), cover_letter),
        Commands::Applications { action } => cmd_applications(&config, action),
        Commands::Admin { email, action } => cmd_admin(&config, &email, action),
        Commands::Chat {
            email,
            resume,
            industry,
            skills,
        } => cmd_chat(&config, email, resume.as_deref(), industry, skills),
    }
}

fn cmd_init(config: &Config) -> Result<()> {
    config.ensure_data_dirs()?;

    let created = KnowledgeBase::seed(&config.storage.knowledge_dir)?;
    for name in &created {
        println!("Created knowledge file: {}", name);
    }

    let mut auth = AuthManager::open(&config.storage.data_dir)?;
    let accounts = auth.bootstrap_defaults()?;
    if accounts > 0 {
        println!("Seeded {} default accounts (admin@atlas.edu / student@atlas.edu).", accounts);
    }

    let mut jobs = JobManager::open(&config.storage.data_dir)?;
    if jobs.all().is_empty() {
        for job in sample_jobs() {
            jobs.create(job)?;
        }
        println!("Seeded 3 sample job postings.");
    }

    // Touch the applications table so the column set exists on disk.
    ApplicationManager::open(&config.storage.data_dir)?;

    println!(
        "Portal initialized at {}",
        config.storage.data_dir.display()
    );
    Ok(())
}

fn sample_jobs() -> Vec<NewJob> {
    vec![
        NewJob {
            title: "Software Engineer".to_string(),
            company: "Google".to_string(),
            location: "Bangalore".to_string(),
            salary_range: "30-60 LPA".to_string(),
            job_type: "Full-time".to_string(),
            deadline: "2026-12-31".to_string(),
            description: "Join our dynamic team to work on cutting-edge technology projects."
                .to_string(),
            skills: "Python, Distributed Systems, Algorithms, System Design".to_string(),
        },
        NewJob {
            title: "Senior ML Engineer".to_string(),
            company: "Microsoft".to_string(),
            location: "Hyderabad".to_string(),
            salary_range: "40-70 LPA".to_string(),
            job_type: "Full-time".to_string(),
            deadline: "2026-12-31".to_string(),
            description: "Lead ML initiatives and develop innovative AI solutions.".to_string(),
            skills: "Python, TensorFlow, PyTorch, MLOps".to_string(),
        },
        NewJob {
            title: "Full Stack Developer".to_string(),
            company: "Amazon".to_string(),
            location: "Bangalore".to_string(),
            salary_range: "25-45 LPA".to_string(),
            job_type: "Full-time".to_string(),
            deadline: "2026-12-31".to_string(),
            description: "Build scalable web applications and services.".to_string(),
            skills: "React, Node.js, AWS, MongoDB".to_string(),
        },
    ]
}

fn cmd_register(
    config: &Config,
    email: String,
    name: String,
    department: String,
    year: String,
) -> Result<()> {
    let password = prompt_password("Choose a password: ")?;
    if password.len() < 6 {
        return Err(PortalError::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let mut auth = AuthManager::open(&config.storage.data_dir)?;
    let user = auth.register(NewUser {
        email,
        password,
        name,
        department,
        year,
    })?;

    println!("Registered {} ({})", user.name, user.email);
    Ok(())
}

fn cmd_jobs(config: &Config, action: JobAction) -> Result<()> {
    let jobs = JobManager::open(&config.storage.data_dir)?;

    match action {
        JobAction::List {
            query,
            job_type,
            location,
            min_salary,
            max_salary,
            sort,
        } => {
            let sort_by = match sort {
                Some(s) => Some(
                    placement_portal::cli::parse_sort_order(&s)
                        .map_err(PortalError::InvalidInput)?,
                ),
                None => None,
            };
            let salary_range = match (min_salary, max_salary) {
                (None, None) => None,
                (min, max) => Some((min.unwrap_or(0.0), max.unwrap_or(f64::MAX))),
            };
            let filters = JobFilters {
                search_query: query,
                job_types: job_type.into_iter().collect(),
                locations: location.into_iter().collect(),
                salary_range,
                sort_by,
            };
            print!("{}", output::job_table(&jobs.search(&filters)));
        }
        JobAction::Show { id } => match jobs.get(&id) {
            Some(job) => print!("{}", output::job_details(job)),
            None => println!("Job {} not found.", id),
        },
        JobAction::Stats => {
            print!("{}", output::job_statistics(&jobs.statistics()));
        }
    }

    Ok(())
}

fn cmd_apply(
    config: &Config,
    job_id: &str,
    email: &str,
    resume: Option<&Path>,
    cover_letter: Option<String>,
) -> Result<()> {
    let session = login(config, email)?;

    let jobs = JobManager::open(&config.storage.data_dir)?;
    let job = jobs
        .get(job_id)
        .ok_or_else(|| PortalError::NotFound(format!("Job {} does not exist", job_id)))?;
    if job.status != JobStatus::Open {
        return Err(PortalError::InvalidInput(format!(
            "Job {} is closed to applications",
            job_id
        )));
    }

    let resume_path = match resume {
        Some(path) => {
            if !path.exists() {
                return Err(PortalError::InvalidInput(format!(
                    "Resume file does not exist: {}",
                    path.display()
                )));
            }
            Some(path.to_string_lossy().to_string())
        }
        None => None,
    };

    let mut applications = ApplicationManager::open(&config.storage.data_dir)?;
    let application = applications.submit(job_id, &session.user_id, resume_path, cover_letter)?;

    println!(
        "Application {} submitted for {} at {}.",
        application.id, job.title, job.company
    );
    Ok(())
}

fn cmd_applications(config: &Config, action: ApplicationAction) -> Result<()> {
    match action {
        ApplicationAction::List { email } => {
            let session = login(config, &email)?;
            let applications = ApplicationManager::open(&config.storage.data_dir)?;
            print!(
                "{}",
                output::application_table(&applications.for_user(&session.user_id))
            );
        }
        ApplicationAction::Withdraw { id, email, reason } => {
            let session = login(config, &email)?;
            let mut applications = ApplicationManager::open(&config.storage.data_dir)?;

            let owner = applications
                .get(&id)
                .map(|a| a.user_id.clone())
                .ok_or_else(|| PortalError::NotFound(format!("Application {} not found", id)))?;
            if owner != session.user_id {
                return Err(PortalError::Auth(
                    "You can only withdraw your own applications".to_string(),
                ));
            }

            applications.withdraw(&id, reason.as_deref())?;
            println!("Application {} withdrawn.", id);
        }
    }
    Ok(())
}

fn cmd_admin(config: &Config, email: &str, action: AdminAction) -> Result<()> {
    let session = login(config, email)?;
    require_admin(&session)?;

    match action {
        AdminAction::AddJob {
            title,
            company,
            location,
            salary,
            job_type,
            deadline,
            description,
            skills,
        } => {
            let mut jobs = JobManager::open(&config.storage.data_dir)?;
            let job = jobs.create(NewJob {
                title,
                company,
                location,
                salary_range: salary,
                job_type,
                deadline,
                description,
                skills,
            })?;
            println!("Posted job {} ({}).", job.id, job.title);
        }
        AdminAction::CloseJob { id } => {
            let mut jobs = JobManager::open(&config.storage.data_dir)?;
            if jobs.update_status(&id, JobStatus::Closed)? {
                println!("Job {} closed.", id);
            } else {
                println!("Job {} not found.", id);
            }
        }
        AdminAction::RemoveJob { id } => {
            let mut jobs = JobManager::open(&config.storage.data_dir)?;
            if jobs.delete(&id)? {
                println!("Job {} removed.", id);
            } else {
                println!("Job {} not found.", id);
            }
        }
        AdminAction::Applications => {
            let applications = ApplicationManager::open(&config.storage.data_dir)?;
            print!("{}", output::application_table(applications.all()));
        }
        AdminAction::ApplicationStats => {
            let applications = ApplicationManager::open(&config.storage.data_dir)?;
            print!(
                "{}",
                output::application_statistics(&applications.statistics(None))
            );
        }
        AdminAction::SetStatus { id, status } => {
            let status: ApplicationStatus =
                status.parse().map_err(PortalError::InvalidInput)?;
            let mut applications = ApplicationManager::open(&config.storage.data_dir)?;
            if applications.update_status(&id, status)? {
                println!("Application {} is now {}.", id, status);
            } else {
                println!("Application {} not found.", id);
            }
        }
        AdminAction::Users => {
            let auth = AuthManager::open(&config.storage.data_dir)?;
            print!("{}", output::user_table(auth.all()));
        }
        AdminAction::RemoveUser { id } => {
            let mut auth = AuthManager::open(&config.storage.data_dir)?;
            if auth.delete(&id)? {
                println!("User {} removed.", id);
            } else {
                println!("User {} not found.", id);
            }
        }
    }

    Ok(())
}

fn cmd_chat(
    config: &Config,
    email: Option<String>,
    resume: Option<&Path>,
    industry: Option<String>,
    skills: Option<String>,
) -> Result<()> {
    if let Some(email) = &email {
        let session = login(config, email)?;
        println!("Hello, {}!", session.name);
    }

    let knowledge = KnowledgeBase::load(&config.storage.knowledge_dir);
    let model = OllamaClient::new(
        &config.model.endpoint,
        &config.model.text_model,
        &config.model.vision_model,
    )?;
    info!("Using model {}", config.model.text_model);

    let mut chatbot = PlacementChatbot::new(Box::new(model), knowledge, config);
    chatbot.set_preferences(UserPreferences {
        industry,
        skills: skills
            .map(|s| {
                s.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    });

    let mut extractor = UploadExtractor::new(config.model.extraction_max_tokens);
    if let Some(path) = resume {
        upload_resume(&mut chatbot, &mut extractor, path)?;
    }

    println!("AI Placement Assistant. Type a message, or:");
    println!("  :upload <file>      attach a resume (PDF, DOCX, PNG/JPEG, TXT, MD)");
    println!("  :skills a, b, c     set your preferred skills");
    println!("  :industry <name>    set your preferred industry");
    println!("  :quit               leave the chat");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("{} ", "you>".bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if !handle_chat_command(command, &mut chatbot, &mut extractor)? {
                break;
            }
            continue;
        }

        chatbot.respond(line, &mut |m| print_chat_message(&m))?;
        println!();
    }

    Ok(())
}

fn print_chat_message(message: &Message) {
    match message.kind {
        MessageKind::Text => {
            print!("{}", message.content);
            let _ = std::io::stdout().flush();
        }
        MessageKind::Suggestion => {
            println!("\n\nYou could ask:");
            println!("{}", output::suggestions(&message.content));
        }
        MessageKind::Error => {
            println!("{}", message.content.red());
        }
        _ => {
            println!("{}", message.content);
        }
    }
}

/// Returns false when the session should end.
fn handle_chat_command(
    command: &str,
    chatbot: &mut PlacementChatbot,
    extractor: &mut UploadExtractor,
) -> Result<bool> {
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "q" | "exit" => return Ok(false),
        "upload" => {
            if rest.is_empty() {
                println!("Usage: :upload <file>");
            } else if upload_resume(chatbot, extractor, Path::new(rest))? {
                // An upload with no accompanying question is treated as
                // a request to analyze the resume.
                chatbot.respond("Please analyze my resume.", &mut |m| print_chat_message(&m))?;
                println!();
            }
        }
        "skills" => {
            let skills: Vec<String> = rest
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect();
            let mut preferences = chatbot.preferences().clone();
            preferences.skills = skills;
            chatbot.set_preferences(preferences);
            println!("Preferences saved.");
        }
        "industry" => {
            let mut preferences = chatbot.preferences().clone();
            preferences.industry = if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            };
            chatbot.set_preferences(preferences);
            println!("Preferences saved.");
        }
        _ => println!("Unknown command :{}", name),
    }

    Ok(true)
}

/// Returns true when resume text was extracted and stored.
fn upload_resume(
    chatbot: &mut PlacementChatbot,
    extractor: &mut UploadExtractor,
    path: &Path,
) -> Result<bool> {
    let spinner = spinner(&format!("Extracting text from {}...", path.display()));
    let text = extractor.extract_file(path, None, chatbot.model());
    spinner.finish_and_clear();

    match text {
        Ok(text) if text.trim().is_empty() => {
            warn!("No text extracted from {}", path.display());
            println!(
                "{}",
                "Could not extract text from the uploaded file.".yellow()
            );
            Ok(false)
        }
        Ok(text) => {
            println!("Resume stored ({} characters).", text.chars().count());
            chatbot.set_resume_text(&text);
            Ok(true)
        }
        Err(e) => {
            warn!("Extraction failed for {}: {}", path.display(), e);
            println!(
                "{}",
                "Could not extract text from the uploaded file.".yellow()
            );
            Ok(false)
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("Invalid spinner template"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn login(config: &Config, email: &str) -> Result<Session> {
    let password = prompt_password(&format!("Password for {}: ", email))?;
    let mut auth = AuthManager::open(&config.storage.data_dir)?;
    auth.authenticate(email, &password)
}

fn prompt_password(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    Ok(password.trim_end().to_string())
}
