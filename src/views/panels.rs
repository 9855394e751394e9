//! Display states of the search and update panels
//!
//! Every panel starts `Hidden`: the neutral state shown before the user has
//! pressed its button.

use serde::Serialize;

use crate::models::{
    ContactField, FacultyContact, InterestFaculty, InterestUniversity, PublicationCitations,
};

pub const NO_CONTACT_MESSAGE: &str =
    "No contact information found for the specified faculty member.";

pub const NO_PUBLICATIONS_MESSAGE: &str = "No publications found for the selected keyword.";

/// Shown in place of an unset contact attribute
pub const NOT_AVAILABLE: &str = "N/A";

/// Faculty contact panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContactView {
    Hidden,
    Found { contact: FacultyContact },
    NotFound { message: String },
}

impl ContactView {
    pub fn not_found() -> Self {
        ContactView::NotFound {
            message: NO_CONTACT_MESSAGE.to_string(),
        }
    }

    /// Text lines of the panel
    pub fn lines(&self) -> Vec<String> {
        match self {
            ContactView::Hidden => Vec::new(),
            ContactView::Found { contact } => vec![
                format!("Name: {}", contact.name),
                format!("Email: {}", contact.email.as_deref().unwrap_or(NOT_AVAILABLE)),
                format!("Phone: {}", contact.phone.as_deref().unwrap_or(NOT_AVAILABLE)),
                format!("Institute: {}", contact.institute),
            ],
            ContactView::NotFound { message } => vec![message.clone()],
        }
    }
}

/// Status line under an update form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UpdateStatus {
    Hidden,
    Updated { message: String },
    Failed { message: String },
}

impl UpdateStatus {
    pub fn updated(field: ContactField, name: &str, value: &str) -> Self {
        UpdateStatus::Updated {
            message: format!("Updated {} for {}: {}", field, name, value),
        }
    }

    pub fn failed(field: ContactField) -> Self {
        UpdateStatus::Failed {
            message: format!("Failed to update {}.", field),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            UpdateStatus::Hidden => None,
            UpdateStatus::Updated { message } | UpdateStatus::Failed { message } => Some(message),
        }
    }
}

/// Publications-by-keyword panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublicationsView {
    Hidden,
    Found { rows: Vec<PublicationCitations> },
    NoneFound { message: String },
}

impl PublicationsView {
    pub fn from_rows(rows: Vec<PublicationCitations>) -> Self {
        if rows.is_empty() {
            PublicationsView::NoneFound {
                message: NO_PUBLICATIONS_MESSAGE.to_string(),
            }
        } else {
            PublicationsView::Found { rows }
        }
    }
}

/// The two research-interest tables; both empty in the neutral state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterestTables {
    pub universities: Vec<InterestUniversity>,
    pub faculty: Vec<InterestFaculty>,
}

impl InterestTables {
    pub fn is_empty(&self) -> bool {
        self.universities.is_empty() && self.faculty.is_empty()
    }
}
