//! Server-side HTML for the index and detail pages.

use crate::card::DocumentCard;
use crate::hero::HeroView;
use crate::index::IndexView;
use crate::markdown::MarkdownRenderer;
use crate::page::{PageContent, PageError, PageState};
use crate::routes::{category_page_href, doc_base, Route, ROOT};
use crate::sidebar::SidebarView;

pub const STYLESHEET: &str = include_str!("../assets/site.css");
pub const STYLESHEET_HREF: &str = "/assets/site.css";

pub const BACK_TO_LIBRARY: &str = "返回文档库";
pub const BACK_HOME: &str = "返回首页";
pub const LOAD_FAILED: &str = "加载失败";

/// How index links are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Filters travel in the query string; needs the server.
    #[default]
    Dynamic,
    /// One pre-rendered page per category; no search form.
    Static,
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"{STYLESHEET_HREF}\" />\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

fn hero(view: &HeroView) -> String {
    let mut out = String::from("<header class=\"hero\"><div class=\"container\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape(&view.title)));
    out.push_str(&format!("<p class=\"tagline\">{}</p>\n", escape(&view.tagline)));
    if !view.stats.is_empty() {
        out.push_str("<div class=\"stats\">");
        for stat in &view.stats {
            out.push_str(&format!(
                "<div><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>",
                escape(&stat.value),
                escape(&stat.label)
            ));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div></header>\n");
    out
}

fn search_bar(view: &IndexView) -> String {
    let mut out = format!(
        "<form class=\"search\" method=\"get\" action=\"{ROOT}\" role=\"search\">\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"搜索文档、标签...\" />",
        escape(&view.state.query)
    );
    if !view.state.selected.is_all() {
        out.push_str(&format!(
            "<input type=\"hidden\" name=\"category\" value=\"{}\" />",
            escape(view.state.selected.as_str())
        ));
    }
    out.push_str("<button type=\"submit\">搜索</button></form>\n");
    out
}

fn tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("<span class=\"badge\">{}</span>", escape(t)))
        .collect()
}

pub fn card(card: &DocumentCard) -> String {
    let mut out = format!(
        "<article class=\"card\"><h3><a href=\"{}\">{}</a></h3>\n",
        escape(&card.href),
        escape(&card.title)
    );
    if let Some(desc) = &card.description {
        out.push_str(&format!("<p class=\"description\">{}</p>\n", escape(desc)));
    }
    out.push_str(&format!(
        "<div class=\"meta\"><span class=\"date\">{}</span><span class=\"tags\">{}</span></div></article>\n",
        escape(&card.date),
        tags(&card.tags)
    ));
    out
}

fn sidebar(view: &SidebarView, query: &str, style: LinkStyle) -> String {
    let mut out = String::from("<aside class=\"sidebar\"><section class=\"panel\"><h2>分类目录</h2>\n");
    for entry in &view.entries {
        let href = match style {
            LinkStyle::Dynamic => Route::Index {
                query: query.to_string(),
                category: entry.selection.clone(),
            }
            .href(),
            LinkStyle::Static => category_page_href(&entry.selection),
        };
        let class = if entry.selected { "entry selected" } else { "entry" };
        let style = entry
            .color
            .as_deref()
            .map(|c| format!(" style=\"border-left: 3px solid {}\"", escape(c)))
            .unwrap_or_default();
        out.push_str(&format!(
            "<a class=\"{class}\" href=\"{}\"{style}><span>{}</span><span class=\"badge\">{}</span></a>\n",
            escape(&href),
            escape(&entry.label),
            entry.count
        ));
    }
    out.push_str("</section>\n");
    if !view.recent.is_empty() {
        out.push_str("<section class=\"panel\"><h2>最近更新</h2>\n");
        for recent in &view.recent {
            out.push_str(&format!(
                "<div class=\"recent\"><a href=\"{}\">{}</a><div class=\"date\">{}</div></div>\n",
                escape(&recent.href),
                escape(&recent.title),
                escape(&recent.date)
            ));
        }
        out.push_str("</section>\n");
    }
    out.push_str("</aside>\n");
    out
}

pub fn render_index(hero_view: &HeroView, view: &IndexView, style: LinkStyle) -> String {
    let mut body = hero(hero_view);
    body.push_str("<main class=\"container layout\"><section class=\"results\">\n");
    if style == LinkStyle::Dynamic {
        body.push_str(&search_bar(view));
    }
    body.push_str(&format!(
        "<h2 class=\"results-heading\">{}<span class=\"count\">({})</span></h2>\n",
        escape(&view.heading),
        view.result_count
    ));
    for c in &view.cards {
        body.push_str(&card(c));
    }
    if let Some(empty) = &view.empty {
        body.push_str(&format!(
            "<div class=\"empty\"><div>{}</div><div class=\"hint\">{}</div></div>\n",
            escape(&empty.title),
            escape(&empty.hint)
        ));
    }
    body.push_str("</section>\n");
    body.push_str(&sidebar(&view.sidebar, &view.state.query, style));
    body.push_str("</main>\n");
    layout(&hero_view.title, &body)
}

fn loading_body() -> String {
    "<main class=\"container\"><div class=\"skeleton doc-body\">\
     <div style=\"width:25%;height:2rem\"></div><div style=\"width:50%\"></div>\
     <div></div><div style=\"width:75%\"></div><div style=\"width:50%\"></div>\
     </div></main>\n"
        .to_string()
}

fn ready_body(content: &PageContent, renderer: &MarkdownRenderer) -> String {
    let mut body = String::from("<header class=\"doc-header\"><div class=\"container\">");
    body.push_str(&format!(
        "<a class=\"back\" href=\"{ROOT}\">← {BACK_TO_LIBRARY}</a>"
    ));
    if let Some(meta) = &content.meta {
        body.push_str(&format!(
            "<div class=\"meta\"><span class=\"date\">{}</span> {}</div>",
            escape(&meta.date),
            tags(&meta.tags)
        ));
    }
    body.push_str("</div></header>\n<main><article class=\"doc-body\">\n");
    body.push_str(&renderer.render_with_base(&content.markdown, Some(&doc_base(&content.id))));
    body.push_str("</article></main>\n");
    body
}

fn failed_body(err: &PageError, retreat: &str) -> String {
    format!(
        "<main class=\"container\"><div class=\"error-card\"><h1>{LOAD_FAILED}</h1>\
         <p>{}</p><a class=\"back\" href=\"{}\">← {BACK_HOME}</a></div></main>\n",
        escape(&err.to_string()),
        escape(retreat)
    )
}

pub fn render_document(state: &PageState, renderer: &MarkdownRenderer, site_title: &str) -> String {
    match state {
        PageState::Loading { .. } => layout(site_title, &loading_body()),
        PageState::Ready(content) => {
            let title = content
                .meta
                .as_ref()
                .map(|m| m.title.as_str())
                .unwrap_or(content.id.as_str());
            layout(
                &format!("{title} - {site_title}"),
                &ready_body(content, renderer),
            )
        }
        PageState::Failed(err) => layout(
            &format!("{LOAD_FAILED} - {site_title}"),
            &failed_body(err, state.retreat_href().unwrap_or(ROOT)),
        ),
    }
}
