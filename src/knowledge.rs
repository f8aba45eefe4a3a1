//! Static placement reference data.
//!
//! Companies, skills, courses, interview banks, and matchable postings
//! are loaded once from JSON documents. A missing or malformed file
//! degrades to an empty section so the chatbot keeps working without
//! reference data.

use crate::error::Result;
use log::error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub companies: CompanyCatalog,
    pub skills: SkillCatalog,
    pub courses: CourseCatalog,
    pub interviews: InterviewBank,
    pub jobs: PostingCatalog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyCatalog {
    #[serde(default)]
    pub companies: Vec<CompanyProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub info: CompanyInfo,
    #[serde(default)]
    pub interview_process: InterviewProcess,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub headquarters: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub founded: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewProcess {
    #[serde(default)]
    pub rounds: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillCatalog {
    #[serde(default)]
    pub technical_skills: TechnicalSkills,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default)]
    pub programming_languages: Vec<ProgrammingLanguage>,
    #[serde(default)]
    pub web_technologies: Vec<String>,
    #[serde(default)]
    pub databases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammingLanguage {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub preparation_courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewBank {
    #[serde(default)]
    pub technical_questions: Vec<TechnicalQuestion>,
    #[serde(default)]
    pub hr_questions: Vec<HrQuestion>,
    #[serde(default)]
    pub interview_tips: Vec<TipSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrQuestion {
    pub category: String,
    pub question: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipSet {
    pub phase: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingCatalog {
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

/// A matchable posting used by the chatbot's job-matching flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl KnowledgeBase {
    pub fn load(knowledge_dir: &Path) -> Self {
        Self {
            companies: load_json(&knowledge_dir.join("companies.json")),
            skills: load_json(&knowledge_dir.join("skills.json")),
            courses: load_json(&knowledge_dir.join("courses.json")),
            interviews: load_json(&knowledge_dir.join("interviews.json")),
            jobs: load_json(&knowledge_dir.join("jobs.json")),
        }
    }

    /// Writes the starter knowledge documents, skipping files that
    /// already exist. Returns the names of the files created.
    pub fn seed(knowledge_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(knowledge_dir)?;
        let mut created = Vec::new();
        for (name, content) in [
            ("companies.json", seed_data::COMPANIES),
            ("skills.json", seed_data::SKILLS),
            ("courses.json", seed_data::COURSES),
            ("interviews.json", seed_data::INTERVIEWS),
            ("jobs.json", seed_data::JOBS),
        ] {
            let path = knowledge_dir.join(name);
            if !path.exists() {
                std::fs::write(&path, content)?;
                created.push(name.to_string());
            }
        }
        Ok(created)
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            error!("Error parsing {}: {}", path.display(), e);
            T::default()
        }
    }
}

mod seed_data {
    pub const COMPANIES: &str = r#"{
  "companies": [
    {
      "name": "Google",
      "info": {
        "industry": "Technology",
        "headquarters": "Mountain View, CA",
        "website": "google.com",
        "founded": 1998
      },
      "interview_process": {
        "rounds": [
          "Online Assessment",
          "Technical Phone Screen",
          "Virtual Onsite (4-5 rounds)",
          "Team Matching"
        ],
        "focus_areas": ["Data Structures", "Algorithms", "System Design", "Coding"]
      },
      "tech_stack": ["Python", "Java", "Go", "C++", "Kubernetes", "TensorFlow"]
    }
  ]
}
"#;

    pub const SKILLS: &str = r#"{
  "technical_skills": {
    "programming_languages": [
      {
        "name": "Python",
        "topics": ["Data Structures", "OOP", "Web Frameworks", "Data Science"]
      },
      {
        "name": "Java",
        "topics": ["Core Java", "Spring Boot", "Microservices", "Multithreading"]
      }
    ],
    "web_technologies": ["React", "Angular", "Node.js", "Django"],
    "databases": ["MySQL", "MongoDB", "PostgreSQL", "Redis"]
  },
  "soft_skills": ["Communication", "Team Collaboration", "Problem Solving", "Leadership"]
}
"#;

    pub const COURSES: &str = r#"{
  "preparation_courses": [
    {
      "title": "DSA Masterclass",
      "duration": "8 weeks",
      "topics": ["Arrays and Strings", "Trees and Graphs", "Dynamic Programming", "System Design"],
      "resources": ["LeetCode Premium", "GeeksForGeeks", "System Design Primer"]
    },
    {
      "title": "Interview Preparation",
      "duration": "4 weeks",
      "topics": ["Resume Building", "Mock Interviews", "HR Interview Skills", "Communication"]
    }
  ]
}
"#;

    pub const INTERVIEWS: &str = r#"{
  "technical_questions": [
    {
      "type": "DSA",
      "difficulty": "Medium",
      "question": "Implement a balanced binary search tree",
      "topics": ["Trees", "BST", "Balancing"],
      "companies": ["Google", "Microsoft", "Amazon"]
    }
  ],
  "hr_questions": [
    {
      "category": "Leadership",
      "question": "Tell me about a time you led a difficult project",
      "tips": ["Use STAR method", "Focus on team collaboration", "Highlight results"]
    }
  ],
  "interview_tips": [
    {
      "phase": "Before Interview",
      "tips": ["Research the company", "Review job description", "Prepare STAR stories", "Practice coding"]
    }
  ]
}
"#;

    pub const JOBS: &str = r#"{
  "jobs": [
    {
      "title": "Software Engineer",
      "company": "Google",
      "location": "Bangalore",
      "required_skills": ["Python", "Distributed Systems", "Algorithms", "System Design"]
    },
    {
      "title": "Senior ML Engineer",
      "company": "Microsoft",
      "location": "Hyderabad",
      "required_skills": ["Python", "TensorFlow", "PyTorch", "MLOps"]
    },
    {
      "title": "Full Stack Developer",
      "company": "Amazon",
      "location": "Bangalore",
      "required_skills": ["React", "Node.js", "AWS", "MongoDB"]
    }
  ]
}
"#;
}
