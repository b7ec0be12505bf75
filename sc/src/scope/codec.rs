//! Scope string encoding and decoding
//!
//! A scope string is a slash-delimited path of one to three segments:
//!
//! ```text
//! 39          school
//! 39/2023     grade
//! 39/2023/1   class
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScopeError;

/// Separator between scope segments
pub const SEPARATOR: char = '/';

/// Level of a scope in the school → grade → class hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    School,
    Grade,
    Class,
    #[default]
    Unknown,
}

impl ScopeLevel {
    /// Level implied by a number of non-empty segments
    pub fn from_segment_count(count: usize) -> Self {
        match count {
            0 => Self::Unknown,
            1 => Self::School,
            2 => Self::Grade,
            _ => Self::Class,
        }
    }

    /// Level of an encoded scope string
    pub fn of(value: &str) -> Self {
        decode(value).level
    }
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::School => write!(f, "school"),
            Self::Grade => write!(f, "grade"),
            Self::Class => write!(f, "class"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for ScopeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "school" => Ok(Self::School),
            "grade" => Ok(Self::Grade),
            "class" => Ok(Self::Class),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown scope level: {}", s)),
        }
    }
}

/// A decoded scope string
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedScope {
    pub level: ScopeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl ParsedScope {
    /// `school/grade` key, present for grade and class scopes
    pub fn grade_key(&self) -> Option<String> {
        match (&self.school, &self.grade) {
            (Some(school), Some(grade)) => Some(format!("{}{}{}", school, SEPARATOR, grade)),
            _ => None,
        }
    }
}

/// Check that an identifier can be used as a single scope segment
pub fn validate_segment(segment: &str) -> Result<(), ScopeError> {
    if segment.is_empty() || segment.contains(SEPARATOR) {
        return Err(ScopeError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

fn required<'a>(level: ScopeLevel, segment: &'static str, value: Option<&'a str>) -> Result<&'a str, ScopeError> {
    let value = value.ok_or(ScopeError::MissingSegment { level, segment })?;
    validate_segment(value)?;
    Ok(value)
}

/// Encode identifiers into a scope string for the given level
///
/// Only the identifiers the level needs are used; extra ones are ignored.
pub fn encode(level: ScopeLevel, school: &str, grade: Option<&str>, class: Option<&str>) -> Result<String, ScopeError> {
    debug!(%level, %school, ?grade, ?class, "encode: called");
    match level {
        ScopeLevel::School => {
            validate_segment(school)?;
            Ok(school.to_string())
        }
        ScopeLevel::Grade => {
            validate_segment(school)?;
            let grade = required(level, "grade", grade)?;
            Ok(format!("{}{}{}", school, SEPARATOR, grade))
        }
        ScopeLevel::Class => {
            validate_segment(school)?;
            let grade = required(level, "grade", grade)?;
            let class = required(level, "class", class)?;
            Ok(format!("{}{}{}{}{}", school, SEPARATOR, grade, SEPARATOR, class))
        }
        ScopeLevel::Unknown => Err(ScopeError::UnknownLevel(level)),
    }
}

/// Decode a scope string. Never fails: malformed input yields `ScopeLevel::Unknown`.
pub fn decode(value: &str) -> ParsedScope {
    let parts: Vec<&str> = value.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
    let mut segments = parts.iter().map(|s| s.to_string());

    ParsedScope {
        level: ScopeLevel::from_segment_count(parts.len()),
        school: segments.next(),
        grade: segments.next(),
        class: segments.next(),
    }
}
