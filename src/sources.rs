// src/sources.rs
//! Where a resume record comes from: the form, or the built-in sample

use crate::core::assembler::assemble;
use crate::types::{
    EducationEntry, ExperienceEntry, FormInput, PersonalInfo, ProjectEntry, ResumeRecord,
    SkillSet,
};

/// Produces a fresh record for one generation request.
pub trait ResumeSource {
    fn name(&self) -> &str;
    fn record(&self) -> ResumeRecord;
}

/// Record assembled from explicit form input.
#[derive(Debug, Clone)]
pub struct FormSource {
    input: FormInput,
}

impl FormSource {
    pub fn new(input: FormInput) -> Self {
        Self { input }
    }
}

impl ResumeSource for FormSource {
    fn name(&self) -> &str {
        "form"
    }

    fn record(&self) -> ResumeRecord {
        assemble(self.input.clone())
    }
}

/// Fixed demonstration data, for trying out a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl ResumeSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn record(&self) -> ResumeRecord {
        ResumeRecord {
            personal: PersonalInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                phone: "+1 555 010 2030".to_string(),
                linkedin: "linkedin.com/in/janedoe".to_string(),
                github: "github.com/janedoe".to_string(),
            },
            summary: "Backend engineer with six years of experience building reliable \
                      services and developer tooling."
                .to_string(),
            educations: vec![EducationEntry {
                degree: "B.Sc. Computer Science".to_string(),
                school: "State University".to_string(),
                year: "2018".to_string(),
                score: "3.8 GPA".to_string(),
            }],
            experiences: vec![
                ExperienceEntry {
                    role: "Senior Software Engineer".to_string(),
                    company: "Acme Corp".to_string(),
                    duration: "2021 - Present".to_string(),
                    desc: "Led the migration of billing services to an event-driven design."
                        .to_string(),
                },
                ExperienceEntry {
                    role: "Software Engineer".to_string(),
                    company: "Initech".to_string(),
                    duration: "2018 - 2021".to_string(),
                    desc: "Built internal APIs and the CI pipeline used by 40 engineers."
                        .to_string(),
                },
            ],
            projects: vec![ProjectEntry {
                title: "Resume Builder".to_string(),
                stack: "Rust, Rocket".to_string(),
                summary: "Generates DOCX resumes from structured form data.".to_string(),
            }],
            skills: SkillSet {
                programming_languages: "Rust, Python, TypeScript".to_string(),
                frameworks: "Rocket, Tokio, React".to_string(),
                databases: "PostgreSQL, SQLite, Redis".to_string(),
                other_tools: "Docker, Git, GitHub Actions".to_string(),
            },
        }
    }
}

impl ResumeSource for ResumeRecord {
    fn name(&self) -> &str {
        "record"
    }

    fn record(&self) -> ResumeRecord {
        self.clone()
    }
}
