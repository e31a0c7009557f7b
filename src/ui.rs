//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: category tabs, the scrollable blog list
//!   (optionally next to a detail pane), and a one-line status bar.
//! * While a page is loading, placeholder rows are drawn below the list.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::feed::Phase;
use crate::source::BlogSummary;

/// Placeholder rows shown while a page is in flight.
const LOADER_ROWS: usize = 3;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_category_tabs(app, frame, tabs_area);

    if app.show_detail {
        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(main_area);
        draw_blog_list(app, frame, list_area);
        draw_detail(app, frame, detail_area);
    } else {
        draw_blog_list(app, frame, main_area);
    }

    draw_status_bar(app, frame, status_area);
}

fn draw_category_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let tabs = Tabs::new(app.categories.iter().map(String::as_str))
        .select(app.category_index)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn blog_row(blog: &BlogSummary) -> ListItem<'_> {
    let mut spans = vec![
        Span::styled(
            format!("{:<11}", blog.display_date()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(&blog.title, Style::default().fg(Color::White)),
    ];
    if let Some(author) = &blog.author {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("by {author}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Render the scrollable blog list, plus loader rows while fetching.
fn draw_blog_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let mut rows: Vec<ListItem> = app.feed.items().iter().map(blog_row).collect();

    if app.feed.is_loading() {
        rows.extend((0..LOADER_ROWS).map(|_| {
            ListItem::new(Line::from(Span::styled(
                "░░░░░░░░░░ ░░░░░░░░░░░░░░░░░░░░░░░░",
                Style::default().fg(Color::DarkGray),
            )))
        }));
    } else if app.feed.items().is_empty() && app.feed.phase() == Phase::Exhausted {
        rows.push(ListItem::new(Line::from(Span::styled(
            "No blogs here yet.",
            Style::default().fg(Color::DarkGray),
        ))));
    }

    let title = format!(" Blogs: {} ", app.active_category());
    let list = List::new(rows)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let Some(blog) = app.selected_blog() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            blog.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                blog.author.as_deref().unwrap_or("anonymous"),
                blog.category.as_deref().unwrap_or("uncategorised"),
                blog.display_date()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
    ];
    if let Some(description) = &blog.description {
        lines.push(Line::raw(description.as_str()));
    }
    if let Some(image) = &blog.image {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("cover: {image}"),
            Style::default().fg(Color::Blue),
        )));
    }

    let detail = Paragraph::new(lines)
        .block(Block::default().title(" Details ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let more = if app.feed.has_more() {
        Span::styled(
            format!("page {}", app.feed.page()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled("end of feed", Style::default().fg(Color::Magenta))
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} blogs", app.feed.items().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        more,
        Span::raw("  "),
        Span::styled(app.feed.identity().label(), Style::default().fg(Color::Cyan)),
        Span::raw("  q: quit  ↑/↓: scroll  ←/→: category  r: refresh  ⏎: details"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
