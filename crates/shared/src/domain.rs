use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

macro_rules! counter_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            pub fn next(self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// Marks each explain/retrieve request so a late settlement can be recognized as stale.
counter_newtype!(Generation);

// 1-based and inclusive; deserialization goes through `LineRange::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLineRange")]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Result<Self, SelectionError> {
        if start == 0 || end == 0 {
            return Err(SelectionError::ZeroLine);
        }
        if end < start {
            return Err(SelectionError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn wire_format(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

#[derive(Deserialize)]
struct RawLineRange {
    start: u32,
    end: u32,
}

impl TryFrom<RawLineRange> for LineRange {
    type Error = SelectionError;

    fn try_from(raw: RawLineRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl FromStr for LineRange {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (start, end) = match raw.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (raw, raw),
        };
        let parse = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| SelectionError::InvalidLineRange(raw.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub code: String,
    pub file_path: String,
    pub lines: LineRange,
}

impl Selection {
    pub fn new(code: impl Into<String>, file_path: impl Into<String>, lines: LineRange) -> Self {
        Self {
            code: code.into(),
            file_path: file_path.into(),
            lines,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceTag {
    Slack,
    Jira,
    Other(String),
}

impl SourceTag {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "slack" => Self::Slack,
            "jira" => Self::Jira,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Slack => "slack",
            Self::Jira => "jira",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SourceTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_range_parses_span_and_single_line() {
        assert_eq!("3-7".parse::<LineRange>().unwrap(), LineRange { start: 3, end: 7 });
        assert_eq!("12".parse::<LineRange>().unwrap(), LineRange { start: 12, end: 12 });
        assert_eq!(" 4 - 5 ".parse::<LineRange>().unwrap().wire_format(), "4-5");
    }

    #[test]
    fn line_range_rejects_zero_and_inverted_spans() {
        assert!(matches!(LineRange::new(0, 2), Err(SelectionError::ZeroLine)));
        assert!(matches!(
            LineRange::new(5, 2),
            Err(SelectionError::InvertedRange { start: 5, end: 2 })
        ));
        assert!("a-b".parse::<LineRange>().is_err());
    }

    #[test]
    fn deserialized_line_range_is_validated() {
        let range: LineRange = serde_json::from_str(r#"{"start":2,"end":4}"#).unwrap();
        assert_eq!(range.wire_format(), "2-4");
        assert!(serde_json::from_str::<LineRange>(r#"{"start":0,"end":0}"#).is_err());
        assert!(serde_json::from_str::<LineRange>(r#"{"start":5,"end":2}"#).is_err());
        let selection = r#"{"code":"x","file_path":"a.py","lines":{"start":0,"end":1}}"#;
        assert!(serde_json::from_str::<Selection>(selection).is_err());
    }

    #[test]
    fn whitespace_selection_is_blank() {
        let lines = LineRange::new(1, 1).unwrap();
        assert!(Selection::new(" \n\t ", "a.py", lines).is_blank());
        assert!(!Selection::new("def f(): pass", "a.py", lines).is_blank());
    }

    #[test]
    fn source_tag_is_case_insensitive_and_keeps_unknown_raw() {
        assert_eq!(SourceTag::parse("SLACK"), SourceTag::Slack);
        assert_eq!(SourceTag::parse("jira"), SourceTag::Jira);
        let other = SourceTag::parse("GitHub");
        assert!(matches!(other, SourceTag::Other(_)));
        assert_eq!(other.as_str(), "GitHub");
    }

    #[test]
    fn generation_advances_monotonically() {
        let first = Generation::default().next();
        assert!(first.next() > first);
    }
}
