//! The seven résumé sub-record kinds in their editable form.
//!
//! Dates are held as the strings the form shows (see
//! [`crate::editor::dates::to_editable`]); levels are held loosely so a
//! bad server value still hydrates and is reported by the validator
//! instead of failing the whole document.

use crate::editor::dates;
use crate::editor::entity::{
    DateSlot, Entity, EntityKind, FieldValue, NoListFields, Period, RangeIssue,
};
use crate::errors::EditorError;
use crate::models::resume::{
    AchievementDto, CertificationDto, EducationDto, ExperienceDto, LanguageDto, LanguageLevel,
    ProjectDto, SkillDto,
};

pub const SKILL_LEVEL_MIN: i64 = 1;
pub const SKILL_LEVEL_MAX: i64 = 5;
pub const GPA_MIN: f64 = 0.0;
pub const GPA_MAX: f64 = 5.0;

/// Optional text that is empty or whitespace is dropped from the payload;
/// anything else is sent as entered.
fn prune(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

fn prune_list(items: &[String]) -> Vec<String> {
    items.iter().filter(|s| !s.trim().is_empty()).cloned().collect()
}

fn end_for_save(end: &str, is_current: bool) -> Option<String> {
    if is_current {
        return None;
    }
    Some(dates::normalize(end)).filter(|s| !s.is_empty())
}

fn end_from_server(end: Option<&str>, is_current: bool) -> String {
    if is_current {
        String::new()
    } else {
        dates::to_editable(end)
    }
}

fn period_dates<'a>(start: &'a str, end: &'a str, is_current: bool) -> Vec<DateSlot<'a>> {
    let mut slots = vec![DateSlot {
        field: "startDate",
        value: start,
        required: true,
    }];
    if !is_current {
        slots.push(DateSlot {
            field: "endDate",
            value: end,
            required: false,
        });
    }
    slots
}

// ── Skill ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: i64,
    pub category: Option<String>,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: SKILL_LEVEL_MIN,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillField {
    Name,
    Level,
    Category,
}

impl Entity for Skill {
    const KIND: EntityKind = EntityKind::Skill;
    type Field = SkillField;
    type ListField = NoListFields;

    fn field_name(field: SkillField) -> &'static str {
        match field {
            SkillField::Name => "name",
            SkillField::Level => "level",
            SkillField::Category => "category",
        }
    }

    fn list_name(field: NoListFields) -> &'static str {
        match field {}
    }

    fn set_field(&mut self, field: SkillField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            SkillField::Name => self.name = value.into_text(Self::KIND, name)?,
            SkillField::Level => self.level = value.into_int(Self::KIND, name)?,
            SkillField::Category => self.category = value.into_optional_text(Self::KIND, name)?,
        }
        Ok(())
    }

    fn list(&self, field: NoListFields) -> &Vec<String> {
        match field {}
    }

    fn list_mut(&mut self, field: NoListFields) -> &mut Vec<String> {
        match field {}
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        Vec::new()
    }

    fn check_ranges(&self) -> Vec<RangeIssue> {
        if (SKILL_LEVEL_MIN..=SKILL_LEVEL_MAX).contains(&self.level) {
            return Vec::new();
        }
        vec![RangeIssue {
            field: "level",
            message: format!(
                "Skill level must be between {SKILL_LEVEL_MIN} and {SKILL_LEVEL_MAX}, got {}",
                self.level
            ),
        }]
    }
}

impl From<&SkillDto> for Skill {
    fn from(dto: &SkillDto) -> Self {
        Self {
            name: dto.name.clone(),
            level: dto.level,
            category: dto.category.clone(),
        }
    }
}

impl Skill {
    pub fn to_dto(&self) -> SkillDto {
        SkillDto {
            name: self.name.clone(),
            level: self.level,
            category: prune(&self.category),
        }
    }
}

// ── Experience ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Company,
    Position,
    StartDate,
    EndDate,
    IsCurrent,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceList {
    Achievements,
    Technologies,
}

impl Entity for Experience {
    const KIND: EntityKind = EntityKind::Experience;
    type Field = ExperienceField;
    type ListField = ExperienceList;

    fn field_name(field: ExperienceField) -> &'static str {
        match field {
            ExperienceField::Company => "company",
            ExperienceField::Position => "position",
            ExperienceField::StartDate => "startDate",
            ExperienceField::EndDate => "endDate",
            ExperienceField::IsCurrent => "isCurrent",
            ExperienceField::Description => "description",
        }
    }

    fn list_name(field: ExperienceList) -> &'static str {
        match field {
            ExperienceList::Achievements => "achievements",
            ExperienceList::Technologies => "technologies",
        }
    }

    fn set_field(&mut self, field: ExperienceField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            ExperienceField::Company => self.company = value.into_text(Self::KIND, name)?,
            ExperienceField::Position => self.position = value.into_text(Self::KIND, name)?,
            ExperienceField::StartDate => self.start_date = value.into_text(Self::KIND, name)?,
            ExperienceField::EndDate => self.end_date = value.into_text(Self::KIND, name)?,
            ExperienceField::IsCurrent => self.is_current = value.into_bool(Self::KIND, name)?,
            ExperienceField::Description => {
                self.description = value.into_optional_text(Self::KIND, name)?
            }
        }
        Ok(())
    }

    fn list(&self, field: ExperienceList) -> &Vec<String> {
        match field {
            ExperienceList::Achievements => &self.achievements,
            ExperienceList::Technologies => &self.technologies,
        }
    }

    fn list_mut(&mut self, field: ExperienceList) -> &mut Vec<String> {
        match field {
            ExperienceList::Achievements => &mut self.achievements,
            ExperienceList::Technologies => &mut self.technologies,
        }
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("company", self.company.as_str()), ("position", self.position.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        period_dates(&self.start_date, &self.end_date, self.is_current)
    }

    fn period(&self) -> Option<Period<'_>> {
        Some(Period {
            start: &self.start_date,
            end: &self.end_date,
            is_current: self.is_current,
        })
    }
}

impl From<&ExperienceDto> for Experience {
    fn from(dto: &ExperienceDto) -> Self {
        Self {
            company: dto.company.clone(),
            position: dto.position.clone(),
            start_date: dates::to_editable(Some(&dto.start_date)),
            end_date: end_from_server(dto.end_date.as_deref(), dto.is_current),
            is_current: dto.is_current,
            description: dto.description.clone(),
            achievements: dto.achievements.clone(),
            technologies: dto.technologies.clone(),
        }
    }
}

impl Experience {
    pub fn to_dto(&self) -> ExperienceDto {
        ExperienceDto {
            company: self.company.clone(),
            position: self.position.clone(),
            start_date: dates::normalize(&self.start_date),
            end_date: end_for_save(&self.end_date, self.is_current),
            is_current: self.is_current,
            description: prune(&self.description),
            achievements: prune_list(&self.achievements),
            technologies: prune_list(&self.technologies),
        }
    }
}

// ── Education ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub gpa: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Institution,
    Degree,
    Field,
    StartDate,
    EndDate,
    IsCurrent,
    Gpa,
    Description,
}

impl Entity for Education {
    const KIND: EntityKind = EntityKind::Education;
    type Field = EducationField;
    type ListField = NoListFields;

    fn field_name(field: EducationField) -> &'static str {
        match field {
            EducationField::Institution => "institution",
            EducationField::Degree => "degree",
            EducationField::Field => "field",
            EducationField::StartDate => "startDate",
            EducationField::EndDate => "endDate",
            EducationField::IsCurrent => "isCurrent",
            EducationField::Gpa => "gpa",
            EducationField::Description => "description",
        }
    }

    fn list_name(field: NoListFields) -> &'static str {
        match field {}
    }

    fn set_field(&mut self, field: EducationField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            EducationField::Institution => self.institution = value.into_text(Self::KIND, name)?,
            EducationField::Degree => self.degree = value.into_text(Self::KIND, name)?,
            EducationField::Field => self.field = value.into_text(Self::KIND, name)?,
            EducationField::StartDate => self.start_date = value.into_text(Self::KIND, name)?,
            EducationField::EndDate => self.end_date = value.into_text(Self::KIND, name)?,
            EducationField::IsCurrent => self.is_current = value.into_bool(Self::KIND, name)?,
            EducationField::Gpa => self.gpa = value.into_optional_number(Self::KIND, name)?,
            EducationField::Description => {
                self.description = value.into_optional_text(Self::KIND, name)?
            }
        }
        Ok(())
    }

    fn list(&self, field: NoListFields) -> &Vec<String> {
        match field {}
    }

    fn list_mut(&mut self, field: NoListFields) -> &mut Vec<String> {
        match field {}
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("institution", self.institution.as_str()),
            ("degree", self.degree.as_str()),
            ("field", self.field.as_str()),
        ]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        period_dates(&self.start_date, &self.end_date, self.is_current)
    }

    fn period(&self) -> Option<Period<'_>> {
        Some(Period {
            start: &self.start_date,
            end: &self.end_date,
            is_current: self.is_current,
        })
    }

    fn check_ranges(&self) -> Vec<RangeIssue> {
        match self.gpa {
            Some(gpa) if !(GPA_MIN..=GPA_MAX).contains(&gpa) => vec![RangeIssue {
                field: "gpa",
                message: format!("GPA must be between {GPA_MIN} and {GPA_MAX}, got {gpa}"),
            }],
            _ => Vec::new(),
        }
    }
}

impl From<&EducationDto> for Education {
    fn from(dto: &EducationDto) -> Self {
        Self {
            institution: dto.institution.clone(),
            degree: dto.degree.clone(),
            field: dto.field.clone(),
            start_date: dates::to_editable(Some(&dto.start_date)),
            end_date: end_from_server(dto.end_date.as_deref(), dto.is_current),
            is_current: dto.is_current,
            gpa: dto.gpa,
            description: dto.description.clone(),
        }
    }
}

impl Education {
    pub fn to_dto(&self) -> EducationDto {
        EducationDto {
            institution: self.institution.clone(),
            degree: self.degree.clone(),
            field: self.field.clone(),
            start_date: dates::normalize(&self.start_date),
            end_date: end_for_save(&self.end_date, self.is_current),
            is_current: self.is_current,
            gpa: self.gpa,
            description: prune(&self.description),
        }
    }
}

// ── Project ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Description,
    StartDate,
    EndDate,
    IsCurrent,
    Url,
    GithubUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectList {
    Technologies,
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Field = ProjectField;
    type ListField = ProjectList;

    fn field_name(field: ProjectField) -> &'static str {
        match field {
            ProjectField::Name => "name",
            ProjectField::Description => "description",
            ProjectField::StartDate => "startDate",
            ProjectField::EndDate => "endDate",
            ProjectField::IsCurrent => "isCurrent",
            ProjectField::Url => "url",
            ProjectField::GithubUrl => "githubUrl",
        }
    }

    fn list_name(field: ProjectList) -> &'static str {
        match field {
            ProjectList::Technologies => "technologies",
        }
    }

    fn set_field(&mut self, field: ProjectField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            ProjectField::Name => self.name = value.into_text(Self::KIND, name)?,
            ProjectField::Description => self.description = value.into_text(Self::KIND, name)?,
            ProjectField::StartDate => self.start_date = value.into_text(Self::KIND, name)?,
            ProjectField::EndDate => self.end_date = value.into_text(Self::KIND, name)?,
            ProjectField::IsCurrent => self.is_current = value.into_bool(Self::KIND, name)?,
            ProjectField::Url => self.url = value.into_optional_text(Self::KIND, name)?,
            ProjectField::GithubUrl => {
                self.github_url = value.into_optional_text(Self::KIND, name)?
            }
        }
        Ok(())
    }

    fn list(&self, field: ProjectList) -> &Vec<String> {
        match field {
            ProjectList::Technologies => &self.technologies,
        }
    }

    fn list_mut(&mut self, field: ProjectList) -> &mut Vec<String> {
        match field {
            ProjectList::Technologies => &mut self.technologies,
        }
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("description", self.description.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        period_dates(&self.start_date, &self.end_date, self.is_current)
    }

    fn period(&self) -> Option<Period<'_>> {
        Some(Period {
            start: &self.start_date,
            end: &self.end_date,
            is_current: self.is_current,
        })
    }
}

impl From<&ProjectDto> for Project {
    fn from(dto: &ProjectDto) -> Self {
        Self {
            name: dto.name.clone(),
            description: dto.description.clone(),
            start_date: dates::to_editable(Some(&dto.start_date)),
            end_date: end_from_server(dto.end_date.as_deref(), dto.is_current),
            is_current: dto.is_current,
            technologies: dto.technologies.clone(),
            url: dto.url.clone(),
            github_url: dto.github_url.clone(),
        }
    }
}

impl Project {
    pub fn to_dto(&self) -> ProjectDto {
        ProjectDto {
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: dates::normalize(&self.start_date),
            end_date: end_for_save(&self.end_date, self.is_current),
            is_current: self.is_current,
            technologies: prune_list(&self.technologies),
            url: prune(&self.url),
            github_url: prune(&self.github_url),
        }
    }
}

// ── Achievement ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub date: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementField {
    Title,
    Description,
    Date,
    Category,
}

impl Entity for Achievement {
    const KIND: EntityKind = EntityKind::Achievement;
    type Field = AchievementField;
    type ListField = NoListFields;

    fn field_name(field: AchievementField) -> &'static str {
        match field {
            AchievementField::Title => "title",
            AchievementField::Description => "description",
            AchievementField::Date => "date",
            AchievementField::Category => "category",
        }
    }

    fn list_name(field: NoListFields) -> &'static str {
        match field {}
    }

    fn set_field(&mut self, field: AchievementField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            AchievementField::Title => self.title = value.into_text(Self::KIND, name)?,
            AchievementField::Description => self.description = value.into_text(Self::KIND, name)?,
            AchievementField::Date => self.date = value.into_text(Self::KIND, name)?,
            AchievementField::Category => {
                self.category = value.into_optional_text(Self::KIND, name)?
            }
        }
        Ok(())
    }

    fn list(&self, field: NoListFields) -> &Vec<String> {
        match field {}
    }

    fn list_mut(&mut self, field: NoListFields) -> &mut Vec<String> {
        match field {}
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("title", self.title.as_str()), ("description", self.description.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        vec![DateSlot {
            field: "date",
            value: &self.date,
            required: true,
        }]
    }
}

impl From<&AchievementDto> for Achievement {
    fn from(dto: &AchievementDto) -> Self {
        Self {
            title: dto.title.clone(),
            description: dto.description.clone(),
            date: dates::to_editable(Some(&dto.date)),
            category: dto.category.clone(),
        }
    }
}

impl Achievement {
    pub fn to_dto(&self) -> AchievementDto {
        AchievementDto {
            title: self.title.clone(),
            description: self.description.clone(),
            date: dates::normalize(&self.date),
            category: prune(&self.category),
        }
    }
}

// ── Language ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub name: String,
    /// Raw level text; must name a [`LanguageLevel`] to be saved.
    pub level: String,
    pub certification: Option<String>,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: LanguageLevel::Basic.as_str().to_string(),
            certification: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageField {
    Name,
    Level,
    Certification,
}

impl Entity for Language {
    const KIND: EntityKind = EntityKind::Language;
    type Field = LanguageField;
    type ListField = NoListFields;

    fn field_name(field: LanguageField) -> &'static str {
        match field {
            LanguageField::Name => "name",
            LanguageField::Level => "level",
            LanguageField::Certification => "certification",
        }
    }

    fn list_name(field: NoListFields) -> &'static str {
        match field {}
    }

    fn set_field(&mut self, field: LanguageField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            LanguageField::Name => self.name = value.into_text(Self::KIND, name)?,
            LanguageField::Level => {
                // recognized spellings are stored canonically, anything else as typed
                let level = value.into_text(Self::KIND, name)?;
                self.level = match level.parse::<LanguageLevel>() {
                    Ok(known) => known.as_str().to_string(),
                    Err(_) => level,
                };
            }
            LanguageField::Certification => {
                self.certification = value.into_optional_text(Self::KIND, name)?
            }
        }
        Ok(())
    }

    fn list(&self, field: NoListFields) -> &Vec<String> {
        match field {}
    }

    fn list_mut(&mut self, field: NoListFields) -> &mut Vec<String> {
        match field {}
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        Vec::new()
    }

    fn check_ranges(&self) -> Vec<RangeIssue> {
        if self.level.parse::<LanguageLevel>().is_ok() {
            return Vec::new();
        }
        vec![RangeIssue {
            field: "level",
            message: format!(
                "Language level '{}' is not one of: {}",
                self.level,
                LanguageLevel::ALL
                    .iter()
                    .map(LanguageLevel::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }]
    }
}

impl From<&LanguageDto> for Language {
    fn from(dto: &LanguageDto) -> Self {
        Self {
            name: dto.name.clone(),
            level: dto.level.clone(),
            certification: dto.certification.clone(),
        }
    }
}

impl Language {
    pub fn to_dto(&self) -> LanguageDto {
        LanguageDto {
            name: self.name.clone(),
            level: self.level.clone(),
            certification: prune(&self.certification),
        }
    }
}

// ── Certification ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationField {
    Name,
    Issuer,
    Date,
    CredentialId,
    Url,
}

impl Entity for Certification {
    const KIND: EntityKind = EntityKind::Certification;
    type Field = CertificationField;
    type ListField = NoListFields;

    fn field_name(field: CertificationField) -> &'static str {
        match field {
            CertificationField::Name => "name",
            CertificationField::Issuer => "issuer",
            CertificationField::Date => "date",
            CertificationField::CredentialId => "credentialId",
            CertificationField::Url => "url",
        }
    }

    fn list_name(field: NoListFields) -> &'static str {
        match field {}
    }

    fn set_field(&mut self, field: CertificationField, value: FieldValue) -> Result<(), EditorError> {
        let name = Self::field_name(field);
        match field {
            CertificationField::Name => self.name = value.into_text(Self::KIND, name)?,
            CertificationField::Issuer => self.issuer = value.into_text(Self::KIND, name)?,
            CertificationField::Date => self.date = value.into_text(Self::KIND, name)?,
            CertificationField::CredentialId => {
                self.credential_id = value.into_optional_text(Self::KIND, name)?
            }
            CertificationField::Url => self.url = value.into_optional_text(Self::KIND, name)?,
        }
        Ok(())
    }

    fn list(&self, field: NoListFields) -> &Vec<String> {
        match field {}
    }

    fn list_mut(&mut self, field: NoListFields) -> &mut Vec<String> {
        match field {}
    }

    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("issuer", self.issuer.as_str())]
    }

    fn dates(&self) -> Vec<DateSlot<'_>> {
        vec![DateSlot {
            field: "date",
            value: &self.date,
            required: true,
        }]
    }
}

impl From<&CertificationDto> for Certification {
    fn from(dto: &CertificationDto) -> Self {
        Self {
            name: dto.name.clone(),
            issuer: dto.issuer.clone(),
            date: dates::to_editable(Some(&dto.date)),
            credential_id: dto.credential_id.clone(),
            url: dto.url.clone(),
        }
    }
}

impl Certification {
    pub fn to_dto(&self) -> CertificationDto {
        CertificationDto {
            name: self.name.clone(),
            issuer: self.issuer.clone(),
            date: dates::normalize(&self.date),
            credential_id: prune(&self.credential_id),
            url: prune(&self.url),
        }
    }
}
