use crate::models::Document;
use crate::routes::doc_href;

/// Clickable summary of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub tags: Vec<String>,
    pub href: String,
}

impl From<&Document> for DocumentCard {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            description: doc.description.clone().filter(|d| !d.is_empty()),
            date: doc.date.clone(),
            tags: doc.tags.clone(),
            href: doc_href(&doc.id),
        }
    }
}

impl DocumentCard {
    /// Description cut to `max_chars` characters, with an ellipsis when cut.
    pub fn excerpt(&self, max_chars: usize) -> Option<String> {
        let desc = self.description.as_deref()?;
        if desc.chars().count() <= max_chars {
            return Some(desc.to_string());
        }
        let mut cut: String = desc.chars().take(max_chars).collect();
        cut.push('…');
        Some(cut)
    }
}
