//! Event (tenant) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::MissingFields;
use shared::validation::non_blank;

/// Event domain model. Every registration belongs to exactly one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    /// Free-text date as entered by the organiser.
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event as shown on the public landing page. Carries no internal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicEvent {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
}

impl From<Event> for PublicEvent {
    fn from(event: Event) -> Self {
        Self {
            slug: event.slug,
            name: event.name,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
        }
    }
}

/// Raw create/update body as sent by the admin console.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub is_public: Option<bool>,
}

impl EventRequest {
    /// Checks presence of `name` and `slug` and normalises the optional text fields.
    pub fn into_input(self) -> Result<EventInput, MissingFields> {
        MissingFields::check(&[("name", self.name.as_deref()), ("slug", self.slug.as_deref())])?;

        Ok(EventInput {
            name: self.name.unwrap_or_default().trim().to_string(),
            slug: self.slug.unwrap_or_default().trim().to_string(),
            description: non_blank(self.description),
            event_date: non_blank(self.event_date),
            location: non_blank(self.location),
            is_public: self.is_public,
        })
    }
}

/// Validated event fields ready for the store.
///
/// `is_public` stays optional: creation defaults it to `true`, updates keep
/// the stored flag when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct EventInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub is_public: Option<bool>,
}

impl EventInput {
    /// Visibility to use when inserting a new event.
    pub fn is_public_or_default(&self) -> bool {
        self.is_public.unwrap_or(true)
    }
}

/// Slugs are lowercase alphanumeric words joined by single hyphens.
fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("slug_format").with_message(
            std::borrow::Cow::Borrowed(
                "Slug must be lowercase letters and digits separated by single hyphens",
            ),
        ))
    }
}

lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}
