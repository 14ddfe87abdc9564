//! Static export: writes every page the server renders as plain files.
//!
//! Layout under the output directory:
//! `index.html`, `category/{name}/index.html`, `docs/{id}/index.html`,
//! document attachments next to their page, and `assets/site.css`.

use crate::paths::{build_globset, doc_dir, is_excluded, should_descend};
use anyhow::Context;
use docshelf_core::html::{LinkStyle, STYLESHEET};
use docshelf_core::index::IndexState;
use docshelf_core::page::{ContentOrigin, PageState};
use docshelf_core::search::CategorySelection;
use docshelf_core::site::Site;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, Serialize)]
pub struct ExportSummary {
    pub pages: usize,
    pub documents: usize,
    pub placeholders: usize,
    pub attachments: usize,
    /// Documents whose content could not be fetched; their error page was written.
    pub failures: Vec<String>,
    /// Documents or categories whose name cannot be used as a directory.
    pub skipped: Vec<String>,
}

pub async fn export_site(site: &Site, out_dir: &Path) -> anyhow::Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    write_file(&out_dir.join("assets").join("site.css"), STYLESHEET).await?;

    if site.config.content.provider == "fs" {
        let root = PathBuf::from(&site.config.content.root);
        let docs_out = out_dir.join("docs");
        let excludes = site.config.export.exclude.clone();
        summary.attachments =
            tokio::task::spawn_blocking(move || copy_attachments(&root, &docs_out, &excludes))
                .await??;
    }

    let index = site.render_index(&IndexState::default(), LinkStyle::Static);
    write_file(&out_dir.join("index.html"), &index).await?;
    summary.pages += 1;

    for category in site.catalog.categories() {
        let Some(dir) = doc_dir(&out_dir.join("category"), &category.name) else {
            warn!(category = %category.name, "skipping category with unusable name");
            summary.skipped.push(category.name.clone());
            continue;
        };
        let state = IndexState::new("", CategorySelection::named(&category.name));
        let html = site.render_index(&state, LinkStyle::Static);
        write_file(&dir.join("index.html"), &html).await?;
        summary.pages += 1;
    }

    for doc in site.catalog.documents() {
        let Some(dir) = doc_dir(&out_dir.join("docs"), &doc.id) else {
            warn!(id = %doc.id, "skipping document with unusable id");
            summary.skipped.push(doc.id.clone());
            continue;
        };
        let page = site.load_page(Some(&doc.id)).await;
        match &page {
            PageState::Ready(content) if content.origin == ContentOrigin::Placeholder => {
                summary.placeholders += 1
            }
            PageState::Failed(_) => summary.failures.push(doc.id.clone()),
            _ => {}
        }
        write_file(&dir.join("index.html"), &site.render_page(&page)).await?;
        summary.pages += 1;
        summary.documents += 1;
    }

    info!(
        out = %out_dir.display(),
        pages = summary.pages,
        placeholders = summary.placeholders,
        attachments = summary.attachments,
        failures = summary.failures.len(),
        "export finished"
    );
    Ok(summary)
}

async fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("write {}", path.display()))
}

/// Mirrors the content tree under `dest`, minus excluded and hidden entries.
pub fn copy_attachments(root: &Path, dest: &Path, excludes: &[String]) -> anyhow::Result<usize> {
    if !root.is_dir() {
        warn!(root = %root.display(), "content root missing, no attachments copied");
        return Ok(0);
    }
    let exclude_set = build_globset(excludes)?;
    let mut copied = 0;
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.path()
            .strip_prefix(root)
            .map(|rel| should_descend(rel, &exclude_set))
            .unwrap_or(false)
    });
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root)?;
        if is_excluded(rel, &exclude_set) {
            continue;
        }
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("copy {}", entry.path().display()))?;
        copied += 1;
    }
    Ok(copied)
}
