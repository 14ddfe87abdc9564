//! Line-driven terminal browser over the same index and page state as the site.
//!
//! Plain text sets the search query; commands start with `/`.

use docshelf_core::html::{BACK_HOME, LOAD_FAILED};
use docshelf_core::index::{IndexView, Intent};
use docshelf_core::page::PageState;
use docshelf_core::search::CategorySelection;
use docshelf_core::site::Site;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::debug;

const EXCERPT_CHARS: usize = 60;

pub const HELP: &str = "\
  <text>          search titles, descriptions and tags
  /q <text>       same; `/q` alone clears the search
  /cat <name>     show one category (`/all` for everything)
  /clear          reset search and category
  /open <n|id>    open the n-th result or a document id
  /back           return to the list
  /quit           leave at once; end of input waits for an open page
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Category(CategorySelection),
    Clear,
    Open(String),
    Back,
    Help,
    Quit,
}

/// `None` for blank lines and unknown commands.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Query(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name {
        "q" | "search" => Command::Query(arg.to_string()),
        "cat" | "c" if arg.is_empty() => Command::Category(CategorySelection::All),
        "cat" | "c" => Command::Category(CategorySelection::from(arg)),
        "all" => Command::Category(CategorySelection::All),
        "clear" => Command::Clear,
        "open" | "o" if !arg.is_empty() => Command::Open(arg.to_string()),
        "back" | "b" => Command::Back,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// A 1-based result number picks from the current list; anything else is an id.
pub fn resolve_target(view: &IndexView, target: &str) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| view.cards.get(i))
        .map(|card| card.id.clone())
        .unwrap_or_else(|| target.to_string())
}

pub fn render_index_text(view: &IndexView) -> String {
    let mut out = format!("== {} ({}) ==\n", view.heading, view.result_count);
    if !view.state.query.is_empty() {
        out.push_str(&format!("搜索: {}\n", view.state.query));
    }
    for (i, card) in view.cards.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}  [{}]\n", i + 1, card.title, card.id));
        if let Some(excerpt) = card.excerpt(EXCERPT_CHARS) {
            out.push_str(&format!("     {excerpt}\n"));
        }
        out.push_str(&format!("     {}  {}\n", card.date, card.tags.join(", ")));
    }
    if let Some(empty) = &view.empty {
        out.push_str(&format!("{}\n{}\n", empty.title, empty.hint));
    }
    let categories: Vec<String> = view
        .sidebar
        .entries
        .iter()
        .map(|e| {
            let mark = if e.selected { "*" } else { "" };
            format!("{mark}{} ({})", e.label, e.count)
        })
        .collect();
    out.push_str(&format!("分类: {}\n", categories.join("  ")));
    if !view.sidebar.recent.is_empty() {
        let recent: Vec<String> = view
            .sidebar
            .recent
            .iter()
            .map(|r| format!("{} {}", r.date, r.title))
            .collect();
        out.push_str(&format!("最近更新: {}\n", recent.join(" · ")));
    }
    out
}

pub fn render_page_text(state: &PageState) -> String {
    match state {
        PageState::Loading { id } => format!("加载中 {}…\n", id.as_deref().unwrap_or("")),
        PageState::Ready(content) => {
            let mut out = String::new();
            if let Some(meta) = &content.meta {
                out.push_str(&format!("-- {} --\n{}  {}\n\n", meta.title, meta.date, meta.tags.join(", ")));
            }
            out.push_str(&content.markdown);
            if !content.markdown.ends_with('\n') {
                out.push('\n');
            }
            out
        }
        PageState::Failed(err) => format!("{LOAD_FAILED}: {err}\n/back {BACK_HOME}\n"),
    }
}

pub async fn run<R, W>(site: &Site, input: R, mut out: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut controller = site.index_controller();
    let loader = Arc::new(site.page_loader());
    let mut pages = loader.subscribe();
    let mut lines = input.lines();
    let mut pending: Option<JoinHandle<()>> = None;
    let mut quit = false;

    out.write_all(render_index_text(&controller.view()).as_bytes()).await?;
    out.flush().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(command) = parse_command(&line) else {
                    if !line.trim().is_empty() {
                        out.write_all(b"unknown command, /help lists them\n").await?;
                    }
                    continue;
                };
                debug!(?command, "browse command");
                let text = match command {
                    Command::Quit => {
                        quit = true;
                        break;
                    }
                    Command::Help => HELP.to_string(),
                    Command::Back => {
                        loader.leave();
                        render_index_text(&controller.view())
                    }
                    Command::Query(query) => render_index_text(&controller.dispatch(Intent::SetQuery(query))),
                    Command::Category(selection) => {
                        render_index_text(&controller.dispatch(Intent::SelectCategory(selection)))
                    }
                    Command::Clear => render_index_text(&controller.dispatch(Intent::ClearFilters)),
                    Command::Open(target) => {
                        let id = resolve_target(&controller.view(), &target);
                        let ticket = loader.begin(Some(&id));
                        let loader = loader.clone();
                        pending = Some(tokio::spawn(async move {
                            let state = loader.fetch(&ticket).await;
                            loader.finish(&ticket, state);
                        }));
                        render_page_text(&PageState::Loading { id: Some(id) })
                    }
                };
                out.write_all(text.as_bytes()).await?;
                out.flush().await?;
            }
            changed = pages.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = pages.borrow_and_update().clone();
                if snapshot.state.is_terminal() {
                    out.write_all(render_page_text(&snapshot.state).as_bytes()).await?;
                    out.flush().await?;
                }
            }
        }
    }

    if quit {
        if let Some(task) = pending.take() {
            task.abort();
        }
        out.flush().await?;
        return Ok(());
    }
    if let Some(task) = pending.take() {
        task.await?;
    }
    if pages.has_changed()? {
        let snapshot = pages.borrow_and_update().clone();
        if snapshot.state.is_terminal() {
            out.write_all(render_page_text(&snapshot.state).as_bytes()).await?;
        }
    }
    out.flush().await?;
    Ok(())
}
