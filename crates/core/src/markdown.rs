//! Markdown to HTML with the site's style hooks.
//!
//! comrak parses (GitHub flavoured: tables, strikethrough, autolinks, task
//! lists); the HTML is written here so every element gets its class:
//!
//! | element | class |
//! |---|---|
//! | `h1`..`h3` | `doc-h1`..`doc-h3` (deeper levels share `doc-h4`) |
//! | block quote | `doc-blockquote` |
//! | inline code | `doc-code-inline` |
//! | code block | `doc-pre` + `doc-code-block language-*` |
//! | link | `doc-link`, plus `doc-link-external` and a marker for http(s) targets |
//! | table | `doc-table-wrap` / `doc-table` / `doc-th` / `doc-td` |

use crate::html::escape;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use url::Url;

pub const EXTERNAL_MARKER: &str = r#"<span class="doc-link-external-icon" aria-hidden="true">↗</span>"#;

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    allow_raw_html: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Absolute http(s) URL; such links open in a new tab.
pub fn is_external(href: &str) -> bool {
    Url::parse(href)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn is_relative(href: &str) -> bool {
    !href.is_empty()
        && !href.starts_with('/')
        && !href.starts_with('#')
        && !href.starts_with('?')
        && Url::parse(href).is_err()
}

struct Ctx<'b> {
    base: Option<&'b str>,
    out: String,
}

impl<'b> Ctx<'b> {
    fn resolve(&self, href: &str) -> String {
        match self.base {
            Some(base) if is_relative(href) => format!("{base}{}", href.trim_start_matches("./")),
            _ => href.to_string(),
        }
    }
}

impl MarkdownRenderer {
    pub fn new(allow_raw_html: bool) -> Self {
        Self { allow_raw_html }
    }

    pub fn render(&self, markdown: &str) -> String {
        self.render_with_base(markdown, None)
    }

    /// Renders with relative link and image targets rewritten under `base`
    /// (e.g. `/docs/lake/`), so attachments next to the body resolve.
    pub fn render_with_base(&self, markdown: &str, base: Option<&str>) -> String {
        let arena = Arena::new();
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        let root = parse_document(&arena, markdown, &options);
        let mut ctx = Ctx {
            base,
            out: String::with_capacity(markdown.len() * 2),
        };
        self.render_children(root, &mut ctx);
        ctx.out
    }

    fn render_children<'a>(&self, node: &'a AstNode<'a>, ctx: &mut Ctx<'_>) {
        for child in node.children() {
            self.render_node(child, ctx);
        }
    }

    fn render_node<'a>(&self, node: &'a AstNode<'a>, ctx: &mut Ctx<'_>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Document => self.render_children(node, ctx),
            NodeValue::Heading(heading) => {
                let level = heading.level.clamp(1, 6);
                let tier = level.min(4);
                ctx.out.push_str(&format!("<h{level} class=\"doc-h{tier}\">"));
                self.render_children(node, ctx);
                ctx.out.push_str(&format!("</h{level}>\n"));
            }
            NodeValue::Paragraph => {
                let tight = in_tight_list(node);
                if !tight {
                    ctx.out.push_str("<p>");
                }
                self.render_children(node, ctx);
                if !tight {
                    ctx.out.push_str("</p>\n");
                }
            }
            NodeValue::BlockQuote => {
                ctx.out.push_str("<blockquote class=\"doc-blockquote\">\n");
                self.render_children(node, ctx);
                ctx.out.push_str("</blockquote>\n");
            }
            NodeValue::List(list) => {
                let tag = match list.list_type {
                    ListType::Bullet => "ul".to_string(),
                    ListType::Ordered if list.start != 1 => {
                        format!("ol start=\"{}\"", list.start)
                    }
                    ListType::Ordered => "ol".to_string(),
                };
                ctx.out.push_str(&format!("<{tag} class=\"doc-list\">\n"));
                self.render_children(node, ctx);
                let close = if list.list_type == ListType::Bullet { "ul" } else { "ol" };
                ctx.out.push_str(&format!("</{close}>\n"));
            }
            NodeValue::Item(_) => {
                ctx.out.push_str("<li>");
                self.render_children(node, ctx);
                ctx.out.push_str("</li>\n");
            }
            NodeValue::TaskItem(checked) => {
                let mark = if checked.is_some() { " checked" } else { "" };
                ctx.out.push_str(&format!(
                    "<li class=\"doc-task\"><input type=\"checkbox\" disabled{mark} /> "
                ));
                self.render_children(node, ctx);
                ctx.out.push_str("</li>\n");
            }
            NodeValue::CodeBlock(block) => {
                let lang = block.info.split_whitespace().next().unwrap_or("");
                ctx.out.push_str("<pre class=\"doc-pre\"><code class=\"doc-code-block");
                if !lang.is_empty() {
                    ctx.out.push_str(&format!(" language-{}", escape(lang)));
                }
                ctx.out.push_str("\">");
                ctx.out.push_str(&escape(&block.literal));
                ctx.out.push_str("</code></pre>\n");
            }
            NodeValue::Code(code) => {
                ctx.out.push_str("<code class=\"doc-code-inline\">");
                ctx.out.push_str(&escape(&code.literal));
                ctx.out.push_str("</code>");
            }
            NodeValue::HtmlBlock(block) => {
                if self.allow_raw_html {
                    ctx.out.push_str(&block.literal);
                } else {
                    ctx.out.push_str(&escape(&block.literal));
                }
            }
            NodeValue::HtmlInline(raw) => {
                if self.allow_raw_html {
                    ctx.out.push_str(&raw);
                } else {
                    ctx.out.push_str(&escape(&raw));
                }
            }
            NodeValue::ThematicBreak => ctx.out.push_str("<hr class=\"doc-hr\" />\n"),
            NodeValue::Text(text) => ctx.out.push_str(&escape(&text)),
            NodeValue::SoftBreak => ctx.out.push('\n'),
            NodeValue::LineBreak => ctx.out.push_str("<br />\n"),
            NodeValue::Emph => self.wrap(node, ctx, "em"),
            NodeValue::Strong => self.wrap(node, ctx, "strong"),
            NodeValue::Strikethrough => self.wrap(node, ctx, "del"),
            NodeValue::Link(link) => {
                let href = ctx.resolve(&link.url);
                let external = is_external(&href);
                ctx.out.push_str(&format!("<a href=\"{}\"", escape(&href)));
                if !link.title.is_empty() {
                    ctx.out.push_str(&format!(" title=\"{}\"", escape(&link.title)));
                }
                if external {
                    ctx.out.push_str(
                        " class=\"doc-link doc-link-external\" target=\"_blank\" rel=\"noopener noreferrer\">",
                    );
                } else {
                    ctx.out.push_str(" class=\"doc-link\">");
                }
                self.render_children(node, ctx);
                if external {
                    ctx.out.push_str(EXTERNAL_MARKER);
                }
                ctx.out.push_str("</a>");
            }
            NodeValue::Image(link) => {
                let src = ctx.resolve(&link.url);
                let alt = plain_text(node);
                ctx.out.push_str(&format!(
                    "<img class=\"doc-img\" src=\"{}\" alt=\"{}\"",
                    escape(&src),
                    escape(&alt)
                ));
                if !link.title.is_empty() {
                    ctx.out.push_str(&format!(" title=\"{}\"", escape(&link.title)));
                }
                ctx.out.push_str(" />");
            }
            NodeValue::Table(..) => {
                ctx.out
                    .push_str("<div class=\"doc-table-wrap\"><table class=\"doc-table\">\n");
                let mut body_open = false;
                for row in node.children() {
                    let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                    if header {
                        ctx.out.push_str("<thead>\n");
                        self.render_node(row, ctx);
                        ctx.out.push_str("</thead>\n");
                    } else {
                        if !body_open {
                            ctx.out.push_str("<tbody>\n");
                            body_open = true;
                        }
                        self.render_node(row, ctx);
                    }
                }
                if body_open {
                    ctx.out.push_str("</tbody>\n");
                }
                ctx.out.push_str("</table></div>\n");
            }
            NodeValue::TableRow(header) => {
                let (tag, class) = if header { ("th", "doc-th") } else { ("td", "doc-td") };
                ctx.out.push_str("<tr>");
                for cell in node.children() {
                    ctx.out.push_str(&format!("<{tag} class=\"{class}\">"));
                    self.render_children(cell, ctx);
                    ctx.out.push_str(&format!("</{tag}>"));
                }
                ctx.out.push_str("</tr>\n");
            }
            _ => self.render_children(node, ctx),
        }
    }

    fn wrap<'a>(&self, node: &'a AstNode<'a>, ctx: &mut Ctx<'_>, tag: &str) {
        ctx.out.push_str(&format!("<{tag}>"));
        self.render_children(node, ctx);
        ctx.out.push_str(&format!("</{tag}>"));
    }
}

fn in_tight_list<'a>(node: &'a AstNode<'a>) -> bool {
    let Some(item) = node.parent() else {
        return false;
    };
    if !matches!(
        item.data.borrow().value,
        NodeValue::Item(_) | NodeValue::TaskItem(_)
    ) {
        return false;
    }
    item.parent()
        .map(|list| matches!(list.data.borrow().value, NodeValue::List(ref l) if l.tight))
        .unwrap_or(false)
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.descendants().skip(1) {
        match &child.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(c) => text.push_str(&c.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text
}
