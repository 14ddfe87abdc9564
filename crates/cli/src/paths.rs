use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

pub fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// `rel` is relative to the content root.
pub fn is_excluded(rel: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(rel)
}

pub fn should_descend(rel: &Path, excludes: &GlobSet) -> bool {
    rel.as_os_str().is_empty() || !(is_excluded(rel, excludes) || is_hidden(rel))
}

/// Joins a document id under `base`, refusing ids that would leave it.
pub fn doc_dir(base: &Path, id: &str) -> Option<PathBuf> {
    if !content::is_safe_segment(id) {
        return None;
    }
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(base.join(id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_and_excluded() {
        let set = build_globset(&["**/.*".to_string(), "**/*.tmp".to_string()]).unwrap();
        assert!(is_excluded(Path::new(".git"), &set));
        assert!(is_excluded(Path::new("lake/draft.tmp"), &set));
        assert!(!is_excluded(Path::new("lake/img/cover.png"), &set));
        assert!(is_hidden(Path::new("lake/.DS_Store")));
        assert!(should_descend(Path::new(""), &set));
        assert!(!should_descend(Path::new(".cache"), &set));
    }

    #[test]
    fn doc_dir_stays_under_base() {
        let base = Path::new("/out/docs");
        assert_eq!(doc_dir(base, "lake"), Some(base.join("lake")));
        assert_eq!(doc_dir(base, ".."), None);
        assert_eq!(doc_dir(base, "a/b"), None);
        assert_eq!(doc_dir(base, ""), None);
    }
}
