//! Bootcamp model and its create payload

use crate::core::entity::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Photo used until one is uploaded
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Career tracks a bootcamp may offer
pub const CAREERS: [&str; 6] = [
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

fn validate_careers(careers: &[String]) -> Result<(), ValidationError> {
    if careers.iter().all(|c| CAREERS.contains(&c.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("careers")
            .with_message(format!("Careers must be among: {}", CAREERS.join(", ")).into()))
    }
}

fn default_photo() -> String {
    DEFAULT_PHOTO.to_string()
}

/// URL-friendly form of a name: lowercase alphanumeric runs joined by `-`
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// A bootcamp listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Name can not be more than 50 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Description can not be more than 500 characters"
    ))]
    pub description: String,

    #[serde(default)]
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_careers"))]
    pub careers: Vec<String>,

    #[serde(default)]
    #[validate(range(min = 1.0, max = 10.0, message = "Rating must be between 1 and 10"))]
    pub average_rating: Option<f64>,

    /// Mean tuition of the bootcamp's courses, maintained by the course service
    #[serde(default)]
    pub average_cost: Option<f64>,

    #[serde(default = "default_photo")]
    pub photo: String,

    #[serde(default)]
    pub housing: bool,

    #[serde(default)]
    pub job_assistance: bool,

    #[serde(default)]
    pub job_guarantee: bool,

    #[serde(default)]
    pub accept_gi: bool,

    pub created_at: DateTime<Utc>,
}

impl Document for Bootcamp {
    fn resource_name() -> &'static str {
        "bootcamps"
    }

    fn resource_name_singular() -> &'static str {
        "bootcamp"
    }

    fn before_save(&mut self) {
        let trimmed = self.name.trim();
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        self.slug = slugify(&self.name);
    }

    /// `averageCost` follows the courses and `photo` the upload route
    fn immutable_fields() -> &'static [&'static str] {
        &["id", "createdAt", "averageCost", "photo"]
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /api/v1/bootcamps`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcamp {
    #[validate(required(message = "Please add a name"))]
    pub name: Option<String>,

    #[validate(required(message = "Please add a description"))]
    pub description: Option<String>,

    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,

    #[serde(default)]
    pub careers: Vec<String>,

    pub average_rating: Option<f64>,

    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

impl CreateBootcamp {
    /// Build the stored model with a fresh id and defaults
    pub fn into_bootcamp(self) -> Bootcamp {
        Bootcamp {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default(),
            slug: String::new(),
            description: self.description.unwrap_or_default(),
            website: self.website,
            phone: self.phone,
            email: self.email,
            address: self.address,
            careers: self.careers,
            average_rating: self.average_rating,
            average_cost: None,
            photo: default_photo(),
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
            created_at: Utc::now(),
        }
    }
}
