use docshelf_core::catalog::Catalog;
use docshelf_core::config::SiteConfig;
use docshelf_core::hero::HeroView;
use docshelf_core::html::{self, LinkStyle};
use docshelf_core::index::{IndexController, IndexState, IndexView, Intent, ALL_HEADING, EMPTY_TITLE};
use docshelf_core::models::{Category, Document};
use docshelf_core::search::CategorySelection;
use docshelf_core::sidebar::{recent_documents, SidebarView, ALL_LABEL};
use docshelf_core::card::DocumentCard;
use std::sync::Arc;

fn controller() -> IndexController {
    IndexController::new(Arc::new(Catalog::builtin()), 3)
}

#[test]
fn sidebar_all_count_is_sum_regardless_of_selection() {
    let categories = vec![
        Category { name: "技术".into(), count: 8, color: None },
        Category { name: "读物".into(), count: 2, color: Some("#f00".into()) },
    ];
    for selected in [
        CategorySelection::All,
        CategorySelection::named("读物"),
        CategorySelection::named("nope"),
    ] {
        let view = SidebarView::build(&categories, &selected, vec![]);
        assert_eq!(view.all_count(), 10);
        assert_eq!(view.entries[0].label, ALL_LABEL);
    }
}

#[test]
fn sidebar_marks_exactly_one_entry_and_emits_intents() {
    let catalog = Catalog::builtin();
    let view = SidebarView::build(catalog.categories(), &CategorySelection::named("读物"), vec![]);
    let selected: Vec<_> = view.entries.iter().filter(|e| e.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label, "读物");
    assert_eq!(
        view.entries[0].intent(),
        Intent::SelectCategory(CategorySelection::All)
    );
}

#[test]
fn unknown_category_falls_back_to_highlighting_all() {
    let catalog = Catalog::builtin();
    let view = SidebarView::build(catalog.categories(), &CategorySelection::named("小说"), vec![]);
    let selected: Vec<_> = view.entries.iter().filter(|e| e.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label, ALL_LABEL);
    assert_eq!(view.selected().map(|e| e.count), Some(10));
}

#[test]
fn selecting_reading_then_all_restores_full_list() {
    let mut ctl = controller();
    let full = ctl.view();
    assert_eq!(full.result_count, 10);
    assert_eq!(full.heading, ALL_HEADING);

    let reading = ctl.dispatch(Intent::SelectCategory(CategorySelection::named("读物")));
    assert_eq!(reading.result_count, 2);
    assert_eq!(reading.heading, "读物");

    let sidebar_all = reading.sidebar.entries[0].intent();
    let restored = ctl.dispatch(sidebar_all);
    assert_eq!(restored.cards, full.cards);
    assert_eq!(restored.heading, ALL_HEADING);
}

#[test]
fn empty_results_carry_empty_state() {
    let mut ctl = controller();
    let view = ctl.dispatch(Intent::SetQuery("no such words anywhere".into()));
    assert_eq!(view.result_count, 0);
    assert_eq!(view.empty.as_ref().unwrap().title, EMPTY_TITLE);

    let cleared = ctl.dispatch(Intent::ClearFilters);
    assert!(cleared.empty.is_none());
    assert_eq!(ctl.state(), &IndexState::default());
}

#[tokio::test]
async fn subscribers_see_each_recomputed_view() {
    let mut ctl = controller();
    let mut rx = ctl.subscribe();
    ctl.dispatch(Intent::SetQuery("rust".into()));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().result_count, 2);

    // Re-applying the same query is not a change.
    ctl.dispatch(Intent::SetQuery("rust".into()));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn recent_block_orders_by_date_and_keeps_undated_last() {
    let doc = |id: &str, date: &str| Document {
        id: id.into(),
        title: id.to_uppercase(),
        description: None,
        date: date.into(),
        tags: vec![],
        category: "技术".into(),
    };
    let docs = vec![
        doc("old", "2023-01-01"),
        doc("undated", "someday"),
        doc("new", "2025-04-22"),
        doc("mid", "2024-06-01"),
    ];
    let recent = recent_documents(&docs, 3);
    let titles: Vec<_> = recent.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["NEW", "MID", "OLD"]);
    assert_eq!(recent_documents(&docs, 10).last().unwrap().date, "someday");
}

#[test]
fn builtin_recent_block_matches_published_sidebar() {
    let catalog = Catalog::builtin();
    let recent = recent_documents(catalog.documents(), 3);
    let dates: Vec<_> = recent.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-04-22", "2024-12-16", "2024-11-28"]);
}

#[test]
fn card_links_to_detail_and_truncates_excerpt() {
    let catalog = Catalog::builtin();
    let card = DocumentCard::from(catalog.find("lake").unwrap());
    assert_eq!(card.href, "/docs/lake");
    let excerpt = card.excerpt(4).unwrap();
    assert_eq!(excerpt.chars().count(), 5);
    assert!(excerpt.ends_with('…'));
    assert_eq!(card.excerpt(1000), card.description);
}

#[test]
fn index_html_lists_cards_and_escapes_query() {
    let catalog = Catalog::builtin();
    let state = IndexState::new("<rust>", CategorySelection::All);
    let view = IndexView::derive(&catalog, &state, 3);
    let page = html::render_index(&HeroView::from(&SiteConfig::default()), &view, LinkStyle::Dynamic);
    assert!(page.contains("锦恢 | 文档库"));
    assert!(page.contains("value=\"&lt;rust&gt;\""));
    assert!(page.contains(EMPTY_TITLE));

    let view = IndexView::derive(&catalog, &IndexState::default(), 3);
    let page = html::render_index(&HeroView::from(&SiteConfig::default()), &view, LinkStyle::Dynamic);
    assert!(page.contains("href=\"/docs/rust-nom\""));
    assert!(page.contains("(10)"));
    assert!(page.contains("entry selected"));
}

#[test]
fn static_index_links_to_category_pages() {
    let catalog = Catalog::builtin();
    let view = IndexView::derive(&catalog, &IndexState::default(), 3);
    let page = html::render_index(&HeroView::from(&SiteConfig::default()), &view, LinkStyle::Static);
    assert!(page.contains("href=\"/category/%E6%8A%80%E6%9C%AF/\""));
    assert!(!page.contains("<form"));
}
