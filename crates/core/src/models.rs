use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Display form; shown verbatim.
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
}

impl Document {
    /// The display date read as `YYYY-MM-DD`, when it has that shape.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub count: usize,
    #[serde(default)]
    pub color: Option<String>,
}
