use cli::export::{copy_attachments, export_site};
use content::fs::FsContentStore;
use content::memory::MemoryContentStore;
use docshelf_core::catalog::Catalog;
use docshelf_core::config::AppConfig;
use docshelf_core::site::Site;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn exports_pages_and_attachments() {
    let content = tempfile::tempdir().unwrap();
    write(&content.path().join("lake/index.md"), "# 湖\n\n![cover](img/cover.png)\n".as_bytes());
    write(&content.path().join("lake/img/cover.png"), b"png");
    write(&content.path().join("lake/.draft.md"), b"secret");
    write(&content.path().join(".git/config"), b"[core]");

    let mut config = AppConfig::default();
    config.content.root = content.path().to_string_lossy().into_owned();
    let store = Arc::new(FsContentStore::new(content.path()));
    let site = Site::new(config, Arc::new(Catalog::builtin()), store);

    let out = tempfile::tempdir().unwrap();
    let summary = export_site(&site, out.path()).await.unwrap();

    assert_eq!(summary.documents, 10);
    assert_eq!(summary.pages, 13);
    assert_eq!(summary.placeholders, 9);
    assert_eq!(summary.attachments, 2);
    assert!(summary.failures.is_empty());

    let root = out.path();
    assert!(root.join("assets/site.css").is_file());
    let index = fs::read_to_string(root.join("index.html")).unwrap();
    assert!(index.contains("href=\"/category/%E8%AF%BB%E7%89%A9/\""));
    assert!(!index.contains("<form"));

    let category = fs::read_to_string(root.join("category/读物/index.html")).unwrap();
    assert!(category.contains("href=\"/docs/lake\""));
    assert!(!category.contains("<article class=\"card\"><h3><a href=\"/docs/rust-nom\""));

    let lake = fs::read_to_string(root.join("docs/lake/index.html")).unwrap();
    assert!(lake.contains("<h1 class=\"doc-h1\">湖</h1>"));
    assert!(lake.contains("src=\"/docs/lake/img/cover.png\""));
    assert!(root.join("docs/lake/img/cover.png").is_file());
    assert!(root.join("docs/lake/index.md").is_file());
    assert!(!root.join("docs/lake/.draft.md").exists());
    assert!(!root.join("docs/.git").exists());

    let openmcp = fs::read_to_string(root.join("docs/openmcp/index.html")).unwrap();
    assert!(openmcp.contains("Coming Soon"));
}

#[tokio::test]
async fn failed_documents_are_reported_and_still_written() {
    let mut config = AppConfig::default();
    config.content.provider = "memory".to_string();
    let store = Arc::new(MemoryContentStore::new().with_failure("torchood"));
    let site = Site::new(config, Arc::new(Catalog::builtin()), store);

    let out = tempfile::tempdir().unwrap();
    let summary = export_site(&site, out.path()).await.unwrap();
    assert_eq!(summary.failures, vec!["torchood".to_string()]);
    assert_eq!(summary.attachments, 0);
    let page = fs::read_to_string(out.path().join("docs/torchood/index.html")).unwrap();
    assert!(page.contains("加载失败"));
}

#[test]
fn attachment_copy_honours_excludes() {
    let content = tempfile::tempdir().unwrap();
    write(&content.path().join("a/index.md"), b"# a");
    write(&content.path().join("a/notes.tmp"), b"x");
    let out = tempfile::tempdir().unwrap();
    let copied =
        copy_attachments(content.path(), out.path(), &["**/*.tmp".to_string()]).unwrap();
    assert_eq!(copied, 1);
    assert!(!out.path().join("a/notes.tmp").exists());

    let missing = content.path().join("nope");
    assert_eq!(copy_attachments(&missing, out.path(), &[]).unwrap(), 0);
}
