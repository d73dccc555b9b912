//! Course model and its create payload

use crate::core::entity::Document;
use crate::core::query::SortSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Skill level a course expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

/// Accept `"8"` as well as `8` for the week count
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(weeks)| weeks))
}

/// A course offered by a bootcamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,

    #[validate(length(min = 1, message = "Please add a course title"))]
    pub title: String,

    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,

    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1, message = "Please add number of weeks"))]
    pub weeks: String,

    #[validate(range(min = 0.0, message = "Tuition can not be negative"))]
    pub tuition: f64,

    pub minimum_skill: MinimumSkill,

    #[serde(default)]
    pub scholarship_available: bool,

    pub created_at: DateTime<Utc>,

    /// Parent bootcamp
    pub bootcamp: Uuid,
}

impl Document for Course {
    fn resource_name() -> &'static str {
        "courses"
    }

    fn resource_name_singular() -> &'static str {
        "course"
    }

    fn default_sort() -> SortSpec {
        SortSpec::ascending("title")
    }

    fn immutable_fields() -> &'static [&'static str] {
        &["id", "createdAt", "bootcamp"]
    }

    fn before_save(&mut self) {
        let trimmed = self.title.trim();
        if trimmed.len() != self.title.len() {
            self.title = trimmed.to_string();
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /api/v1/bootcamps/{id}/courses`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    #[validate(required(message = "Please add a course title"))]
    pub title: Option<String>,

    #[validate(required(message = "Please add a description"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "optional_string_or_number")]
    #[validate(required(message = "Please add number of weeks"))]
    pub weeks: Option<String>,

    #[validate(required(message = "Please add a tuition cost"))]
    pub tuition: Option<f64>,

    #[validate(required(message = "Please add a minimum skill"))]
    pub minimum_skill: Option<MinimumSkill>,

    #[serde(default)]
    pub scholarship_available: bool,
}

impl CreateCourse {
    /// Build the stored model for a bootcamp
    ///
    /// Required fields are checked by `validate` first; missing ones fall back
    /// to values the model validation rejects again.
    pub fn into_course(self, bootcamp: Uuid) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            weeks: self.weeks.unwrap_or_default(),
            tuition: self.tuition.unwrap_or(-1.0),
            minimum_skill: self.minimum_skill.unwrap_or(MinimumSkill::Beginner),
            scholarship_available: self.scholarship_available,
            created_at: Utc::now(),
            bootcamp,
        }
    }
}
