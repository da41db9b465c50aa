// src/types/resume.rs
//! Resume record assembled from form input and handed to the document renderer

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ===== Resume Record Structure =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub personal: PersonalInfo,
    pub summary: String,
    pub educations: Vec<EducationEntry>,
    pub experiences: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub year: String,
    pub score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub stack: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub programming_languages: String,
    pub frameworks: String,
    pub databases: String,
    pub other_tools: String,
}

// ===== Entry Completeness =====

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

impl EducationEntry {
    /// Degree and school are both filled in.
    pub fn is_complete(&self) -> bool {
        present(&self.degree) && present(&self.school)
    }
}

impl ExperienceEntry {
    /// Either a role or a company is enough to keep the entry.
    pub fn is_complete(&self) -> bool {
        present(&self.role) || present(&self.company)
    }
}

impl ProjectEntry {
    pub fn is_complete(&self) -> bool {
        present(&self.title) && present(&self.summary)
    }
}

// ===== Rendering Helpers =====

impl ResumeRecord {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal.first_name.trim(),
            self.personal.last_name.trim()
        )
        .trim()
        .to_string()
    }

    /// Data handed to the document template. Personal fields are flattened to
    /// the top level and the phone is exposed as `phone_number`.
    pub fn template_context(&self) -> Value {
        json!({
            "first_name": self.personal.first_name,
            "last_name": self.personal.last_name,
            "full_name": self.full_name(),
            "email": self.personal.email,
            "phone_number": self.personal.phone,
            "linkedin": self.personal.linkedin,
            "github": self.personal.github,
            "summary": self.summary,
            "educations": self.educations,
            "experiences": self.experiences,
            "projects": self.projects,
            "skills": self.skills,
        })
    }

    /// `{first_name}_{last_name}_Resume.docx`, with characters that are unsafe
    /// in a download filename replaced.
    pub fn download_filename(&self) -> String {
        format!(
            "{}_{}_Resume.docx",
            sanitize_filename(&self.personal.first_name),
            sanitize_filename(&self.personal.last_name)
        )
    }
}

fn sanitize_filename(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '.' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ResumeRecord {
        ResumeRecord {
            personal: PersonalInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                phone: "+1 555 0100".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_completeness() {
        let edu = EducationEntry {
            degree: "BSc".to_string(),
            school: "  ".to_string(),
            ..Default::default()
        };
        assert!(!edu.is_complete());

        let exp = ExperienceEntry {
            company: "Acme".to_string(),
            ..Default::default()
        };
        assert!(exp.is_complete());
        assert!(!ExperienceEntry::default().is_complete());

        let project = ProjectEntry {
            title: "Compiler".to_string(),
            stack: "Rust".to_string(),
            summary: String::new(),
        };
        assert!(!project.is_complete());
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(jane().download_filename(), "Jane_Doe_Resume.docx");

        let mut record = jane();
        record.personal.last_name = "van der Berg/x".to_string();
        assert_eq!(record.download_filename(), "Jane_van_der_Berg_x_Resume.docx");
    }

    #[test]
    fn test_template_context_flattens_personal_fields() {
        let ctx = jane().template_context();
        assert_eq!(ctx["first_name"], "Jane");
        assert_eq!(ctx["full_name"], "Jane Doe");
        assert_eq!(ctx["phone_number"], "+1 555 0100");
        assert!(ctx["educations"].as_array().is_some());
        assert_eq!(ctx["skills"]["databases"], "");
    }
}
