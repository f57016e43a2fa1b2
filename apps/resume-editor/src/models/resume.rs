//! Wire shapes exchanged with the résumé persistence gateway.
//!
//! The same entity shapes are used for reading and writing; the read
//! side ([`ResumeSnapshot`]) adds the server-assigned id and timestamps.
//! Entity DTOs default every missing field so that older or partial
//! server records still hydrate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Body of a create or update call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experiences: Vec<ExperienceDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub educations: Vec<EducationDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<AchievementDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<CertificationDto>,
}

/// A résumé as returned by the gateway's read endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshot {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub resume: ResumePayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillDto {
    pub name: String,
    pub level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceDto {
    pub company: String,
    pub position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationDto {
    pub institution: String,
    pub degree: String,
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectDto {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub is_current: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AchievementDto {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageDto {
    pub name: String,
    /// One of the [`LanguageLevel`] names. Kept as text so that an unknown
    /// server value survives hydration and is reported by the validator.
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificationDto {
    pub name: String,
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LanguageLevel {
    Basic,
    Elementary,
    Intermediate,
    #[serde(rename = "Upper-Intermediate")]
    UpperIntermediate,
    Advanced,
    Fluent,
    Native,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 7] = [
        LanguageLevel::Basic,
        LanguageLevel::Elementary,
        LanguageLevel::Intermediate,
        LanguageLevel::UpperIntermediate,
        LanguageLevel::Advanced,
        LanguageLevel::Fluent,
        LanguageLevel::Native,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::Basic => "Basic",
            LanguageLevel::Elementary => "Elementary",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::UpperIntermediate => "Upper-Intermediate",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Fluent => "Fluent",
            LanguageLevel::Native => "Native",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown language level '{0}'")]
pub struct UnknownLanguageLevel(pub String);

impl FromStr for LanguageLevel {
    type Err = UnknownLanguageLevel;

    /// Case-insensitive; `Upper Intermediate` is accepted as a spelling of
    /// `Upper-Intermediate`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(' ', "-");
        LanguageLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownLanguageLevel(s.to_string()))
    }
}

/// `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Server ids arrive either as strings or as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
