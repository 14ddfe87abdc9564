use docshelf_core::catalog::{self, Catalog, CatalogError, CountDrift};
use docshelf_core::config::{CatalogConfig, CountPolicy};

const DRIFTING: &str = r#"
[[documents]]
id = "a"
title = "Alpha"
date = "2024-01-01"
tags = ["rust"]
category = "技术"

[[documents]]
id = "b"
title = "Beta"
date = "2024-02-01"
category = "杂项"

[[categories]]
name = "技术"
count = 3

[[categories]]
name = "读物"
count = 1
"#;

#[test]
fn builtin_catalog_matches_published_site() {
    let catalog = Catalog::try_builtin().unwrap();
    assert_eq!(catalog.documents().len(), 10);
    assert_eq!(catalog.categories().len(), 2);
    assert_eq!(catalog.documents()[0].id, "openmcp");
    assert!(catalog.count_drift().is_empty());
    assert!(catalog.orphans().is_empty());
    assert_eq!(catalog.find("lake").unwrap().title, "湖");
    assert!(catalog.find("missing").is_none());
}

#[test]
fn authored_counts_are_kept_and_drift_is_reported() {
    let catalog = Catalog::from_toml_str(DRIFTING).unwrap();
    assert_eq!(catalog.categories()[0].count, 3);
    assert_eq!(
        catalog.count_drift(),
        vec![
            CountDrift {
                category: "技术".into(),
                authored: 3,
                actual: 1
            },
            CountDrift {
                category: "读物".into(),
                authored: 1,
                actual: 0
            },
        ]
    );
    let orphans: Vec<_> = catalog.orphans().iter().map(|d| d.id.clone()).collect();
    assert_eq!(orphans, vec!["b"]);
}

#[test]
fn derived_policy_recounts_from_documents() {
    let catalog = Catalog::from_toml_str(DRIFTING)
        .unwrap()
        .with_count_policy(CountPolicy::Derived);
    let counts: Vec<_> = catalog.categories().iter().map(|c| c.count).collect();
    assert_eq!(counts, vec![1, 0]);
    assert!(catalog.count_drift().is_empty());
}

#[test]
fn duplicate_ids_are_rejected() {
    let raw = r#"
[[documents]]
id = "a"
title = "One"
date = "x"
category = "c"

[[documents]]
id = "a"
title = "Two"
date = "y"
category = "c"
"#;
    assert!(matches!(
        Catalog::from_toml_str(raw),
        Err(CatalogError::DuplicateId(id)) if id == "a"
    ));
}

#[test]
fn load_reads_configured_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("catalog.toml");
    std::fs::write(&path, DRIFTING).unwrap();

    let cfg = CatalogConfig {
        path: Some(path.to_string_lossy().into_owned()),
        counts: CountPolicy::Derived,
    };
    let catalog = Catalog::load(&cfg).unwrap();
    assert_eq!(catalog.documents().len(), 2);
    assert_eq!(catalog.categories()[0].count, 1);

    // read ignores the policy so drift stays visible
    let authored = Catalog::read(&cfg).unwrap();
    assert_eq!(authored.categories()[0].count, 3);
    assert_eq!(authored.count_drift().len(), 2);
}

#[test]
fn load_reports_missing_file() {
    let cfg = CatalogConfig {
        path: Some("/definitely/not/here.toml".into()),
        counts: CountPolicy::Authored,
    };
    assert!(Catalog::load(&cfg).is_err());
}

#[test]
fn catalog_installs_once_per_process() {
    let first = catalog::install(Catalog::builtin()).unwrap();
    assert_eq!(catalog::installed().unwrap().documents().len(), first.documents().len());
    assert!(matches!(
        catalog::install(Catalog::default()),
        Err(CatalogError::AlreadyInstalled)
    ));
}

#[test]
fn default_config_reads_the_builtin_catalog() {
    let catalog = Catalog::read(&CatalogConfig::default()).unwrap();
    assert_eq!(catalog.documents().len(), 10);
    assert!(catalog.count_drift().is_empty());
}
