//! The static document catalog.
//!
//! A catalog is read once at startup, either from a TOML file or from the
//! copy compiled into the binary, and never changes afterwards.

use crate::config::{CatalogConfig, CountPolicy};
use crate::models::{Category, Document};
use anyhow::Context;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

const BUILTIN: &str = include_str!("../catalog/builtin.toml");

static INSTALLED: OnceCell<Arc<Catalog>> = OnceCell::new();

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate document id: {0}")]
    DuplicateId(String),
    #[error("catalog already installed for this process")]
    AlreadyInstalled,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    categories: Vec<Category>,
}

/// Mismatch between an authored category count and the documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountDrift {
    pub category: String,
    pub authored: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    documents: Vec<Document>,
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(documents: Vec<Document>, categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(CatalogError::DuplicateId(doc.id.clone()));
            }
        }
        Ok(Self {
            documents,
            categories,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.documents, file.categories)
    }

    /// The catalog shipped with the binary.
    pub fn try_builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN)
    }

    /// Like [`Catalog::try_builtin`], but an unreadable built-in catalog is
    /// logged and replaced by an empty one.
    pub fn builtin() -> Self {
        Self::try_builtin().unwrap_or_else(|e| {
            error!(error = %e, "built-in catalog is invalid");
            Self::default()
        })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parse catalog {}", path.display()))
    }

    /// The configured catalog exactly as authored.
    pub fn read(cfg: &CatalogConfig) -> anyhow::Result<Self> {
        match &cfg.path {
            Some(p) => Self::from_path(Path::new(p)),
            None => Ok(Self::try_builtin().context("parse built-in catalog")?),
        }
    }

    /// Loads the configured catalog and applies the count policy.
    pub fn load(cfg: &CatalogConfig) -> anyhow::Result<Self> {
        let catalog = Self::read(cfg)?;
        for drift in catalog.count_drift() {
            warn!(
                category = %drift.category,
                authored = drift.authored,
                actual = drift.actual,
                "category count does not match catalog documents"
            );
        }
        for doc in catalog.orphans() {
            warn!(id = %doc.id, category = %doc.category, "document category is not listed");
        }
        let catalog = catalog.with_count_policy(cfg.counts);
        info!(
            documents = catalog.documents.len(),
            categories = catalog.categories.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Number of documents per category name, including names no category lists.
    pub fn derived_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for doc in &self.documents {
            *counts.entry(doc.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_drift(&self) -> Vec<CountDrift> {
        let derived = self.derived_counts();
        self.categories
            .iter()
            .filter_map(|c| {
                let actual = derived.get(c.name.as_str()).copied().unwrap_or(0);
                (actual != c.count).then(|| CountDrift {
                    category: c.name.clone(),
                    authored: c.count,
                    actual,
                })
            })
            .collect()
    }

    /// Documents whose category matches no listed category.
    pub fn orphans(&self) -> Vec<&Document> {
        let names: HashSet<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
        self.documents
            .iter()
            .filter(|d| !names.contains(d.category.as_str()))
            .collect()
    }

    pub fn with_count_policy(mut self, policy: CountPolicy) -> Self {
        if policy == CountPolicy::Derived {
            let derived: BTreeMap<String, usize> = self
                .derived_counts()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            for category in &mut self.categories {
                category.count = derived.get(&category.name).copied().unwrap_or(0);
            }
        }
        self
    }
}

/// Stores the process-wide catalog. Only the first call succeeds.
pub fn install(catalog: Catalog) -> Result<Arc<Catalog>, CatalogError> {
    let shared = Arc::new(catalog);
    INSTALLED
        .set(shared.clone())
        .map_err(|_| CatalogError::AlreadyInstalled)?;
    Ok(shared)
}

pub fn installed() -> Option<Arc<Catalog>> {
    INSTALLED.get().cloned()
}
