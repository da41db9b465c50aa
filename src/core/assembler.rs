// src/core/assembler.rs
//! Shapes raw form fields into a nested resume record

use crate::types::{
    EducationEntry, ExperienceEntry, FormInput, PersonalInfo, ProjectEntry, ResumeRecord,
    SkillSet,
};

/// Build a record with one list entry per requested slot. Nothing is
/// validated or trimmed here; absent fields become empty strings.
pub fn assemble(input: FormInput) -> ResumeRecord {
    let counts = input.counts.clamped();

    let personal = PersonalInfo {
        first_name: input.text("first_name"),
        last_name: input.text("last_name"),
        email: input.text("email"),
        phone: input.text("phone"),
        linkedin: input.text("linkedin"),
        github: input.text("github"),
    };

    let educations = (0..counts.educations)
        .map(|i| EducationEntry {
            degree: input.indexed("degree", i),
            school: input.indexed("school", i),
            year: input.indexed("year", i),
            score: input.indexed("score", i),
        })
        .collect();

    let experiences = (0..counts.experiences)
        .map(|i| ExperienceEntry {
            role: input.indexed("role", i),
            company: input.indexed("company", i),
            duration: input.indexed("duration", i),
            desc: input.indexed("desc", i),
        })
        .collect();

    let projects = (0..counts.projects)
        .map(|i| ProjectEntry {
            title: input.indexed("proj_title", i),
            stack: input.indexed("stack", i),
            summary: input.indexed("proj_summary", i),
        })
        .collect();

    let skills = SkillSet {
        programming_languages: input.text("programming_languages"),
        frameworks: input.text("frameworks"),
        databases: input.text("databases"),
        other_tools: input.text("other_tools"),
    };

    ResumeRecord {
        personal,
        summary: input.text("summary"),
        educations,
        experiences,
        projects,
        skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionCounts;

    #[test]
    fn test_lists_sized_to_counts() {
        let input = FormInput::new(SectionCounts::new(3, 0, 2))
            .with_field("degree_1", "MSc")
            .with_field("proj_title_1", "Parser");

        let record = assemble(input);
        assert_eq!(record.educations.len(), 3);
        assert!(record.experiences.is_empty());
        assert_eq!(record.projects.len(), 2);
        assert_eq!(record.educations[1].degree, "MSc");
        assert_eq!(record.educations[0].degree, "");
        assert_eq!(record.projects[1].title, "Parser");
    }

    #[test]
    fn test_counts_out_of_bounds_are_clamped() {
        let record = assemble(FormInput::new(SectionCounts::new(0, 12, 0)));
        assert_eq!(record.educations.len(), 1);
        assert_eq!(record.experiences.len(), 5);
        assert_eq!(record.projects.len(), 1);
    }

    #[test]
    fn test_values_are_kept_verbatim() {
        let input = FormInput::default()
            .with_field("first_name", "  Jane ")
            .with_field("year_0", 2021_i64)
            .with_field("databases", "PostgreSQL");

        let record = assemble(input);
        assert_eq!(record.personal.first_name, "  Jane ");
        assert_eq!(record.educations[0].year, "2021");
        assert_eq!(record.skills.databases, "PostgreSQL");
        assert_eq!(record.personal.github, "");
    }
}
