//! Presence checks shared by request DTOs.

use thiserror::Error;

/// One or more required request fields were absent or blank.
///
/// Field names are reported in their wire (camelCase) form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

impl MissingFields {
    /// Collects the names whose value is blank; `Ok(())` when none are.
    pub fn check(fields: &[(&'static str, Option<&str>)]) -> Result<(), Self> {
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| shared::validation::is_blank(*value))
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(missing))
        }
    }
}
