//! Person input model and validation.
//!
//! # Invariants
//! - `name` and `username` are non-empty.
//! - `student_id` is either absent or a non-empty string.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for new person input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    EmptyUsername,
    /// `Some("")` was supplied; absence is the only non-student marker.
    EmptyStudentId,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyStudentId => {
                write!(f, "student id must be absent or non-empty")
            }
        }
    }
}

impl Error for PersonValidationError {}

/// Input record for creating a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub username: String,
    pub student_id: Option<String>,
}

impl NewPerson {
    /// Builds and validates a new person record.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        student_id: Option<&str>,
    ) -> Result<Self, PersonValidationError> {
        let person = Self {
            name: name.into(),
            username: username.into(),
            student_id: student_id.map(str::to_owned),
        };
        person.validate()?;
        Ok(person)
    }

    /// Checks field invariants in declaration order.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if self.username.is_empty() {
            return Err(PersonValidationError::EmptyUsername);
        }
        if matches!(self.student_id.as_deref(), Some("")) {
            return Err(PersonValidationError::EmptyStudentId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewPerson, PersonValidationError};

    #[test]
    fn rejects_empty_fields_in_order() {
        assert_eq!(
            NewPerson::new("", "", Some("")).unwrap_err(),
            PersonValidationError::EmptyName
        );
        assert_eq!(
            NewPerson::new("Ann", "", None).unwrap_err(),
            PersonValidationError::EmptyUsername
        );
        assert_eq!(
            NewPerson::new("Ann", "ann", Some("")).unwrap_err(),
            PersonValidationError::EmptyStudentId
        );
    }

    #[test]
    fn accepts_absent_or_filled_student_id() {
        assert_eq!(NewPerson::new("Ann", "ann", None).unwrap().student_id, None);
        assert_eq!(
            NewPerson::new("Ann", "ann", Some("s123"))
                .unwrap()
                .student_id
                .as_deref(),
            Some("s123")
        );
    }
}
