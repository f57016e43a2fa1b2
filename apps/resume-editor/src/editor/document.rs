//! The résumé aggregate: scalar fields plus one collection per entity kind.
//!
//! All writes go through the methods here so that every mutation bumps the
//! document revision. Rendering code reads collections through
//! [`ResumeDocument::section`] and the typed accessors.

use crate::editor::collection::{EntityCollection, EntityId};
use crate::editor::entities::{
    Achievement, Certification, Education, Experience, Language, Project, Skill,
};
use crate::editor::entity::{Entity, EntityKind, FieldValue};
use crate::errors::EditorError;
use crate::models::resume::{ResumePayload, ResumeSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Title,
    Summary,
    Objective,
    IsDefault,
    IsPublic,
}

impl ScalarField {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarField::Title => "title",
            ScalarField::Summary => "summary",
            ScalarField::Objective => "objective",
            ScalarField::IsDefault => "isDefault",
            ScalarField::IsPublic => "isPublic",
        }
    }
}

/// Links an entity kind to its collection inside the document.
pub trait Section: Entity + Sized {
    fn section(doc: &ResumeDocument) -> &EntityCollection<Self>;
    fn section_mut(doc: &mut ResumeDocument) -> &mut EntityCollection<Self>;
}

macro_rules! impl_section {
    ($entity:ty, $field:ident) => {
        impl Section for $entity {
            fn section(doc: &ResumeDocument) -> &EntityCollection<Self> {
                &doc.$field
            }

            fn section_mut(doc: &mut ResumeDocument) -> &mut EntityCollection<Self> {
                &mut doc.$field
            }
        }
    };
}

impl_section!(Skill, skills);
impl_section!(Experience, experiences);
impl_section!(Education, educations);
impl_section!(Project, projects);
impl_section!(Achievement, achievements);
impl_section!(Language, languages);
impl_section!(Certification, certifications);

#[derive(Debug, Clone, Default)]
pub struct ResumeDocument {
    title: String,
    summary: Option<String>,
    objective: Option<String>,
    is_default: bool,
    is_public: bool,
    skills: EntityCollection<Skill>,
    experiences: EntityCollection<Experience>,
    educations: EntityCollection<Education>,
    projects: EntityCollection<Project>,
    achievements: EntityCollection<Achievement>,
    languages: EntityCollection<Language>,
    certifications: EntityCollection<Certification>,
    revision: u64,
    saved_revision: u64,
}

impl ResumeDocument {
    /// An empty document for a résumé that does not exist on the server yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the editable form of a server record.
    pub fn hydrate(snapshot: &ResumeSnapshot) -> Self {
        Self::from_payload(&snapshot.resume)
    }

    /// Builds the editable form from the payload shape. Dates are
    /// reformatted for editing; unparseable dates come back empty.
    pub fn from_payload(payload: &ResumePayload) -> Self {
        Self::build(payload, None)
    }

    /// Replaces the contents with a server record. Entity ids keep counting
    /// from where this document left off, so ids issued before the reload
    /// never address the new records.
    pub fn reload(&mut self, snapshot: &ResumeSnapshot) {
        *self = Self::build(&snapshot.resume, Some(self));
    }

    fn build(payload: &ResumePayload, previous: Option<&Self>) -> Self {
        Self {
            title: payload.title.clone(),
            summary: payload.summary.clone(),
            objective: payload.objective.clone(),
            is_default: payload.is_default,
            is_public: payload.is_public,
            skills: hydrate_section(previous, &payload.skills),
            experiences: hydrate_section(previous, &payload.experiences),
            educations: hydrate_section(previous, &payload.educations),
            projects: hydrate_section(previous, &payload.projects),
            achievements: hydrate_section(previous, &payload.achievements),
            languages: hydrate_section(previous, &payload.languages),
            certifications: hydrate_section(previous, &payload.certifications),
            revision: 0,
            saved_revision: 0,
        }
    }

    /// The outgoing payload: dates normalized, end dates of current
    /// entities dropped, empty optional fields pruned, local ids gone.
    ///
    /// Callers are expected to have validated the document first.
    pub fn snapshot_for_save(&self) -> ResumePayload {
        ResumePayload {
            title: self.title.clone(),
            summary: non_empty(&self.summary),
            objective: non_empty(&self.objective),
            is_default: self.is_default,
            is_public: self.is_public,
            skills: self.skills.all().into_iter().map(Skill::to_dto).collect(),
            experiences: self.experiences.all().into_iter().map(Experience::to_dto).collect(),
            educations: self.educations.all().into_iter().map(Education::to_dto).collect(),
            projects: self.projects.all().into_iter().map(Project::to_dto).collect(),
            achievements: self.achievements.all().into_iter().map(Achievement::to_dto).collect(),
            languages: self.languages.all().into_iter().map(Language::to_dto).collect(),
            certifications: self
                .certifications
                .all()
                .into_iter()
                .map(Certification::to_dto)
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn objective(&self) -> Option<&str> {
        self.objective.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn set_scalar(&mut self, field: ScalarField, value: impl Into<FieldValue>) -> Result<(), EditorError> {
        let value = value.into();
        let name = field.name();
        let kind = EntityKind::Resume;
        match field {
            ScalarField::Title => self.title = value.into_text(kind, name)?,
            ScalarField::Summary => self.summary = value.into_optional_text(kind, name)?,
            ScalarField::Objective => self.objective = value.into_optional_text(kind, name)?,
            ScalarField::IsDefault => self.is_default = value.into_bool(kind, name)?,
            ScalarField::IsPublic => self.is_public = value.into_bool(kind, name)?,
        }
        self.touch();
        Ok(())
    }

    pub fn section<T: Section>(&self) -> &EntityCollection<T> {
        T::section(self)
    }

    pub fn skills(&self) -> &EntityCollection<Skill> {
        &self.skills
    }

    pub fn experiences(&self) -> &EntityCollection<Experience> {
        &self.experiences
    }

    pub fn educations(&self) -> &EntityCollection<Education> {
        &self.educations
    }

    pub fn projects(&self) -> &EntityCollection<Project> {
        &self.projects
    }

    pub fn achievements(&self) -> &EntityCollection<Achievement> {
        &self.achievements
    }

    pub fn languages(&self) -> &EntityCollection<Language> {
        &self.languages
    }

    pub fn certifications(&self) -> &EntityCollection<Certification> {
        &self.certifications
    }

    pub fn add<T: Section>(&mut self, record: T) -> EntityId<T> {
        let id = T::section_mut(self).add(record);
        self.touch();
        id
    }

    pub fn update<T: Section>(
        &mut self,
        id: EntityId<T>,
        field: T::Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), EditorError> {
        T::section_mut(self).update(id, field, value)?;
        self.touch();
        Ok(())
    }

    pub fn remove<T: Section>(&mut self, id: EntityId<T>) -> Result<T, EditorError> {
        let record = T::section_mut(self).remove(id)?;
        self.touch();
        Ok(record)
    }

    pub fn append_item<T: Section>(&mut self, parent: EntityId<T>, field: T::ListField) -> Result<usize, EditorError> {
        let index = T::section_mut(self).append_item(parent, field)?;
        self.touch();
        Ok(index)
    }

    pub fn update_item<T: Section>(
        &mut self,
        parent: EntityId<T>,
        field: T::ListField,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        T::section_mut(self).update_item(parent, field, index, value)?;
        self.touch();
        Ok(())
    }

    pub fn remove_item<T: Section>(
        &mut self,
        parent: EntityId<T>,
        field: T::ListField,
        index: usize,
    ) -> Result<String, EditorError> {
        let removed = T::section_mut(self).remove_item(parent, field, index)?;
        self.touch();
        Ok(removed)
    }

    /// Monotonic counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Records that the state at `revision` reached the server. Edits made
    /// after that revision keep the document dirty.
    pub fn mark_saved(&mut self, revision: u64) {
        if revision > self.saved_revision && revision <= self.revision {
            self.saved_revision = revision;
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn hydrate_section<T, D>(previous: Option<&ResumeDocument>, dtos: &[D]) -> EntityCollection<T>
where
    T: Section + for<'a> From<&'a D>,
{
    let mut section = match previous {
        Some(doc) => EntityCollection::continuing(T::section(doc)),
        None => EntityCollection::new(),
    };
    for dto in dtos {
        section.add(T::from(dto));
    }
    section
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::entities::{ExperienceField, ExperienceList, LanguageField, SkillField};
    use crate::models::resume::{
        AchievementDto, CertificationDto, EducationDto, ExperienceDto, LanguageDto, ProjectDto,
        SkillDto,
    };
    use chrono::Utc;

    fn server_snapshot() -> ResumeSnapshot {
        ResumeSnapshot {
            id: "17".into(),
            resume: ResumePayload {
                title: "Backend Engineer".into(),
                summary: Some("Ten years of distributed systems".into()),
                objective: None,
                is_default: true,
                is_public: false,
                skills: vec![SkillDto {
                    name: "Rust".into(),
                    level: 5,
                    category: Some("Languages".into()),
                }],
                experiences: vec![ExperienceDto {
                    company: "Acme".into(),
                    position: "Staff Engineer".into(),
                    start_date: "2019-04-01T00:00:00.000Z".into(),
                    end_date: Some("2023-06-30T00:00:00.000Z".into()),
                    is_current: false,
                    description: Some("Storage team".into()),
                    achievements: vec!["Shipped v2".into()],
                    technologies: vec!["Rust".into(), "Postgres".into()],
                }],
                educations: vec![EducationDto {
                    institution: "MIT".into(),
                    degree: "BSc".into(),
                    field: "CS".into(),
                    start_date: "2010-09-01".into(),
                    end_date: Some("2014-06-01".into()),
                    is_current: false,
                    gpa: Some(3.9),
                    description: None,
                }],
                projects: vec![ProjectDto {
                    name: "kvstore".into(),
                    description: "LSM tree".into(),
                    start_date: "2021-01-01".into(),
                    end_date: None,
                    is_current: true,
                    technologies: vec!["Rust".into()],
                    url: None,
                    github_url: Some("https://github.com/x/kvstore".into()),
                }],
                achievements: vec![AchievementDto {
                    title: "Hackathon".into(),
                    description: "First place".into(),
                    date: "2018-11-10".into(),
                    category: Some("Competition".into()),
                }],
                languages: vec![LanguageDto {
                    name: "German".into(),
                    level: "Upper-Intermediate".into(),
                    certification: Some("Goethe B2".into()),
                }],
                certifications: vec![CertificationDto {
                    name: "CKA".into(),
                    issuer: "CNCF".into(),
                    date: "2022-02-02".into(),
                    credential_id: Some("ABC-123".into()),
                    url: None,
                }],
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hydrate_reformats_dates() {
        let doc = ResumeDocument::hydrate(&server_snapshot());
        let exp = doc.experiences().all()[0];
        assert_eq!(exp.start_date, "2019-04-01");
        assert_eq!(exp.end_date, "2023-06-30");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_round_trip_without_edits() {
        let snapshot = server_snapshot();
        let payload = ResumeDocument::hydrate(&snapshot).snapshot_for_save();

        let mut expected = snapshot.resume.clone();
        expected.experiences[0].start_date = "2019-04-01".into();
        expected.experiences[0].end_date = Some("2023-06-30".into());
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_round_trip_keeps_text_as_entered() {
        let mut snapshot = server_snapshot();
        snapshot.resume.title = " Backend Engineer ".into();
        snapshot.resume.summary = Some("  Ten years  ".into());
        snapshot.resume.skills[0].name = "Rust ".into();
        snapshot.resume.experiences[0].achievements = vec![" Shipped v2".into()];
        snapshot.resume.languages[0].level = "fluent".into();
        snapshot.resume.languages[0].name = " german".into();

        let payload = ResumeDocument::hydrate(&snapshot).snapshot_for_save();

        let mut expected = snapshot.resume.clone();
        expected.experiences[0].start_date = "2019-04-01".into();
        expected.experiences[0].end_date = Some("2023-06-30".into());
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_reload_does_not_reuse_ids() {
        let mut doc = ResumeDocument::new();
        let stale = doc.add(Skill::default());
        doc.remove(stale).unwrap();

        doc.reload(&server_snapshot());

        assert_eq!(doc.skills().all()[0].name, "Rust");
        assert!(matches!(
            doc.update(stale, SkillField::Level, 1),
            Err(EditorError::EntityNotFound { .. })
        ));
        assert_eq!(doc.skills().all()[0].level, 5);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_hydrate_tolerates_missing_collections() {
        let payload = ResumePayload {
            title: "Empty".into(),
            ..Default::default()
        };
        let doc = ResumeDocument::from_payload(&payload);
        assert!(doc.skills().is_empty());
        assert!(doc.certifications().is_empty());
    }

    #[test]
    fn test_hydrate_corrupt_date_becomes_empty() {
        let mut snapshot = server_snapshot();
        snapshot.resume.achievements[0].date = "31/31/2018".into();
        let doc = ResumeDocument::hydrate(&snapshot);
        assert_eq!(doc.achievements().all()[0].date, "");
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let mut doc = ResumeDocument::hydrate(&server_snapshot());
        let id = doc.skills().ids()[0];
        doc.update(id, SkillField::Level, 4).unwrap();
        assert!(doc.is_dirty());
        assert_eq!(doc.revision(), 1);

        doc.mark_saved(doc.revision());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_failed_mutation_does_not_mark_dirty() {
        let mut doc = ResumeDocument::new();
        let id = doc.add(Skill::default());
        doc.mark_saved(doc.revision());
        assert!(doc.update(id, SkillField::Level, true).is_err());
        assert!(doc.set_scalar(ScalarField::IsPublic, "yes").is_err());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_edit_after_snapshot_stays_dirty() {
        let mut doc = ResumeDocument::new();
        doc.set_scalar(ScalarField::Title, "CV").unwrap();
        let sent = doc.revision();
        doc.set_scalar(ScalarField::Summary, "More").unwrap();
        doc.mark_saved(sent);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_snapshot_clears_end_date_of_current_entities() {
        let mut doc = ResumeDocument::new();
        let id = doc.add(Experience {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "2020-01-01".into(),
            end_date: "2021-01-01".into(),
            ..Default::default()
        });
        doc.update(id, ExperienceField::IsCurrent, true).unwrap();

        let payload = doc.snapshot_for_save();
        assert_eq!(payload.experiences[0].end_date, None);
        assert!(payload.experiences[0].is_current);
        // unchecking restores the previously entered end date
        doc.update(id, ExperienceField::IsCurrent, false).unwrap();
        assert_eq!(
            doc.snapshot_for_save().experiences[0].end_date.as_deref(),
            Some("2021-01-01")
        );
    }

    #[test]
    fn test_nested_edits_through_document() {
        let mut doc = ResumeDocument::new();
        let id = doc.add(Experience::default());
        let idx = doc.append_item(id, ExperienceList::Technologies).unwrap();
        doc.update_item(id, ExperienceList::Technologies, idx, "Kafka")
            .unwrap();
        assert_eq!(doc.experiences().get(id).unwrap().technologies, vec!["Kafka"]);
        assert_eq!(doc.revision(), 3);
    }

    #[test]
    fn test_edited_language_level_is_canonical() {
        let mut doc = ResumeDocument::new();
        let id = doc.add(Language::default());
        doc.update(id, LanguageField::Level, "fluent").unwrap();
        assert_eq!(doc.snapshot_for_save().languages[0].level, "Fluent");
    }

    #[test]
    fn test_section_accessor_is_typed() {
        let mut doc = ResumeDocument::new();
        doc.add(Project::default());
        assert_eq!(doc.section::<Project>().len(), 1);
        assert!(doc.section::<Skill>().is_empty());
    }
}
