//! Data models shared by the accessors and the view layer
//!
//! Row types deserialize straight from store responses, so their field names
//! (or serde renames) match the column and document field names each query
//! returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A university ranked by how many publications its faculty produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityPublications {
    pub university_name: String,
    pub total_publications: i64,
}

/// A university ranked by the summed citations of its faculty's publications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityCitations {
    #[serde(rename = "name")]
    pub university_name: String,
    #[serde(default)]
    pub total_citations: i64,
}

/// Keyword share of one university's publications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchArea {
    pub research_area: String,
    pub publication_count: i64,
}

/// University row of the research-interest tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestUniversity {
    pub name: String,
    pub num_faculty: i64,
    pub num_publications: i64,
}

/// Faculty row of the research-interest tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestFaculty {
    pub name: String,
    pub num_publications: i64,
    #[serde(default)]
    pub num_citations: i64,
}

/// Contact details of a faculty member as stored in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub institute: String,
}

/// Mutable contact attribute of a Faculty node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Email,
    Phone,
}

impl ContactField {
    /// Property name on the Faculty node
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Email => "email",
            ContactField::Phone => "phone",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of setting a contact attribute: the node name and the stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub name: String,
    pub value: String,
}

/// Publication title with its citation count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationCitations {
    pub title: String,
    #[serde(rename = "numCitations", default)]
    pub num_citations: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_row_uses_sql_column_name() {
        let row: UniversityCitations =
            serde_json::from_value(serde_json::json!({"name": "MIT", "total_citations": 12}))
                .unwrap();
        assert_eq!(row.university_name, "MIT");
        assert_eq!(row.total_citations, 12);
    }

    #[test]
    fn test_publication_citations_default_to_zero() {
        let row: PublicationCitations =
            serde_json::from_value(serde_json::json!({"title": "Untitled"})).unwrap();
        assert_eq!(row.num_citations, 0);
    }

    #[test]
    fn test_contact_field_names() {
        assert_eq!(ContactField::Email.as_str(), "email");
        assert_eq!(ContactField::Phone.to_string(), "phone");
    }
}
