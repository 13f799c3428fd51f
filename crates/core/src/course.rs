//! Course references.
//!
//! The intake form historically smuggled a year tag through a single course
//! field by encoding `"{courseId}|year{N}"`. [`CourseRef`] replaces that
//! composite with an explicit tagged variant; [`CourseRef::parse`] still
//! accepts the legacy encoding so existing clients keep working.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A reference to a course in the class/course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CourseRef {
    /// A concrete course, selected directly.
    #[serde(rename_all = "camelCase")]
    Direct { course_id: String },
    /// A course whose class list must be filtered to one year level.
    #[serde(rename_all = "camelCase")]
    YearBucketed { course_id: String, year: u8 },
}

impl CourseRef {
    /// Parse a course reference from its wire form.
    ///
    /// Accepts either a bare course id (`"maths-advanced"`) or the legacy
    /// composite (`"maths-advanced|year9"`). Empty ids and malformed year
    /// tags are validation errors.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CoreError::Validation("Course id must not be empty".into()));
        }

        match raw.split_once('|') {
            None => Ok(Self::Direct {
                course_id: raw.to_string(),
            }),
            Some((course_id, tag)) => {
                if course_id.is_empty() {
                    return Err(CoreError::Validation("Course id must not be empty".into()));
                }
                let year: u8 = tag
                    .strip_prefix("year")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "Invalid year tag '{tag}'. Expected the form 'yearN'"
                        ))
                    })?;
                Ok(Self::YearBucketed {
                    course_id: course_id.to_string(),
                    year,
                })
            }
        }
    }

    /// The underlying catalog course id.
    pub fn course_id(&self) -> &str {
        match self {
            Self::Direct { course_id } | Self::YearBucketed { course_id, .. } => course_id,
        }
    }

    /// The year-bucket filter, if any.
    pub fn year(&self) -> Option<u8> {
        match self {
            Self::Direct { .. } => None,
            Self::YearBucketed { year, .. } => Some(*year),
        }
    }

    /// Re-encode in the legacy composite form for display strings.
    pub fn as_composite(&self) -> String {
        match self {
            Self::Direct { course_id } => course_id.clone(),
            Self::YearBucketed { course_id, year } => format!("{course_id}|year{year}"),
        }
    }
}
