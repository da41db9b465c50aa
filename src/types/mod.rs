// src/types/mod.rs
pub mod form;
pub mod resume;

pub use form::{FieldValue, FormInput, SectionCounts, MAX_SECTION_ENTRIES};
pub use resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, ResumeRecord, SkillSet,
};
