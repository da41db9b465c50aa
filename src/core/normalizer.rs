// src/core/normalizer.rs
//! Pure clean-up pass applied to a validated record before rendering

use crate::types::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, ResumeRecord, SkillSet,
};

/// Trim, canonicalize profile URLs and drop incomplete list entries.
pub fn normalize(record: ResumeRecord) -> ResumeRecord {
    let mut record = trim(record);
    record.personal.linkedin = canonicalize_url(&record.personal.linkedin);
    record.personal.github = canonicalize_url(&record.personal.github);
    record.educations = filter_incomplete(record.educations, EducationEntry::is_complete);
    record.experiences = filter_incomplete(record.experiences, ExperienceEntry::is_complete);
    record.projects = filter_incomplete(record.projects, ProjectEntry::is_complete);
    record
}

/// Strip leading and trailing whitespace from every string leaf.
pub fn trim(record: ResumeRecord) -> ResumeRecord {
    let t = |s: String| s.trim().to_string();

    ResumeRecord {
        personal: PersonalInfo {
            first_name: t(record.personal.first_name),
            last_name: t(record.personal.last_name),
            email: t(record.personal.email),
            phone: t(record.personal.phone),
            linkedin: t(record.personal.linkedin),
            github: t(record.personal.github),
        },
        summary: t(record.summary),
        educations: record
            .educations
            .into_iter()
            .map(|e| EducationEntry {
                degree: t(e.degree),
                school: t(e.school),
                year: t(e.year),
                score: t(e.score),
            })
            .collect(),
        experiences: record
            .experiences
            .into_iter()
            .map(|e| ExperienceEntry {
                role: t(e.role),
                company: t(e.company),
                duration: t(e.duration),
                desc: t(e.desc),
            })
            .collect(),
        projects: record
            .projects
            .into_iter()
            .map(|p| ProjectEntry {
                title: t(p.title),
                stack: t(p.stack),
                summary: t(p.summary),
            })
            .collect(),
        skills: SkillSet {
            programming_languages: t(record.skills.programming_languages),
            frameworks: t(record.skills.frameworks),
            databases: t(record.skills.databases),
            other_tools: t(record.skills.other_tools),
        },
    }
}

/// Prefix `https://` onto a non-empty value that has no http(s) scheme.
pub fn canonicalize_url(value: &str) -> String {
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

/// Keep the entries accepted by `predicate`, in their original order.
pub fn filter_incomplete<T, F>(entries: Vec<T>, predicate: F) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    entries.into_iter().filter(|entry| predicate(entry)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_url() {
        assert_eq!(
            canonicalize_url("linkedin.com/in/janedoe"),
            "https://linkedin.com/in/janedoe"
        );
        assert_eq!(
            canonicalize_url("https://github.com/janedoe"),
            "https://github.com/janedoe"
        );
        assert_eq!(canonicalize_url("http://example.org"), "http://example.org");
        assert_eq!(canonicalize_url(""), "");
    }

    #[test]
    fn test_canonicalize_url_is_idempotent() {
        for value in ["", "github.com/jane", "https://x.dev", "http://y.dev", "www.z.io"] {
            let once = canonicalize_url(value);
            assert_eq!(canonicalize_url(&once), once);
        }
    }

    #[test]
    fn test_filter_incomplete_preserves_order() {
        let projects = vec![
            ProjectEntry {
                title: "A".to_string(),
                summary: "first".to_string(),
                ..Default::default()
            },
            ProjectEntry {
                title: "B".to_string(),
                ..Default::default()
            },
            ProjectEntry {
                title: "C".to_string(),
                summary: "third".to_string(),
                ..Default::default()
            },
        ];

        let kept = filter_incomplete(projects, ProjectEntry::is_complete);
        let titles: Vec<_> = kept.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_normalize_trims_and_filters() {
        let record = ResumeRecord {
            personal: PersonalInfo {
                first_name: " Jane ".to_string(),
                linkedin: " linkedin.com/in/janedoe ".to_string(),
                ..Default::default()
            },
            summary: "\tBuilds things\n".to_string(),
            educations: vec![
                EducationEntry {
                    degree: " ".to_string(),
                    school: "Nowhere".to_string(),
                    ..Default::default()
                },
                EducationEntry {
                    degree: "BSc".to_string(),
                    school: " MIT ".to_string(),
                    year: " 2019".to_string(),
                    score: String::new(),
                },
            ],
            experiences: vec![ExperienceEntry::default()],
            ..Default::default()
        };

        let normalized = normalize(record);
        assert_eq!(normalized.personal.first_name, "Jane");
        assert_eq!(normalized.personal.linkedin, "https://linkedin.com/in/janedoe");
        assert_eq!(normalized.personal.github, "");
        assert_eq!(normalized.summary, "Builds things");
        assert_eq!(normalized.educations.len(), 1);
        assert_eq!(normalized.educations[0].school, "MIT");
        assert_eq!(normalized.educations[0].year, "2019");
        assert!(normalized.experiences.is_empty());
    }
}
