//! Rendering for the review dialog.
//!
//! Left column: the checklist of suggested tags above the tags the note
//! already has. Right column: a Markdown preview of the note body.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::ReviewApp;

/// Draws the whole dialog.
pub fn draw(frame: &mut Frame, app: &ReviewApp) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(content_chunks[0]);

    render_checklist(frame, app, left_chunks[0]);
    render_existing_tags(frame, app, left_chunks[1]);
    render_preview(frame, app, content_chunks[1]);
    render_shortcut_bar(frame, main_chunks[1]);
}

fn render_checklist(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let title = format!(
        "Suggested tags ({}/{})",
        app.selected_count(),
        app.candidates().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    if app.candidates().is_empty() {
        let paragraph = Paragraph::new("No tags suggested").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .candidates()
        .iter()
        .map(|candidate| {
            let (mark, style) = if candidate.selected {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::raw(candidate.tag.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListState::default();
    list_state.select(app.cursor());

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_existing_tags(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Current tags");

    let line = if app.existing().is_empty() {
        Line::from(Span::styled(
            "(none)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(app.existing().join(", "))
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_preview(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.path().to_string());

    let text = tui_markdown::from_str(app.preview());
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let spans = vec![
        Span::styled("Space", key_style),
        Span::raw(": toggle"),
        Span::styled(" | ", sep_style),
        Span::styled("j/k", key_style),
        Span::raw(": navigate"),
        Span::styled(" | ", sep_style),
        Span::styled("a", key_style),
        Span::raw(": all/none"),
        Span::styled(" | ", sep_style),
        Span::styled("Enter", key_style),
        Span::raw(": apply"),
        Span::styled(" | ", sep_style),
        Span::styled("q/Esc", key_style),
        Span::raw(": cancel"),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotePath;
    use crate::service::Suggestion;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &ReviewApp) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut screen = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    fn app_with(tags: &[&str], existing: &[&str]) -> ReviewApp {
        ReviewApp::new(&Suggestion {
            path: NotePath::from("daily.md"),
            content: "---\ntags: []\n---\nToday I read about lifetimes.".to_string(),
            existing: existing.iter().map(|t| t.to_string()).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    #[test]
    fn checklist_shows_selection_marks_and_count() {
        let mut app = app_with(&["rust", "lifetimes"], &[]);
        app.select_next();
        app.toggle_current();

        let screen = render(&app);

        assert!(screen.contains("Suggested tags (1/2)"));
        assert!(screen.contains("[x] rust"));
        assert!(screen.contains("[ ] lifetimes"));
    }

    #[test]
    fn preview_shows_note_path_and_body() {
        let screen = render(&app_with(&["rust"], &[]));

        assert!(screen.contains("daily.md"));
        assert!(screen.contains("Today I read about lifetimes."));
    }

    #[test]
    fn existing_tags_are_listed() {
        let screen = render(&app_with(&["rust"], &["reading", "journal"]));
        assert!(screen.contains("reading, journal"));

        let screen = render(&app_with(&["rust"], &[]));
        assert!(screen.contains("(none)"));
    }

    #[test]
    fn empty_suggestion_renders_placeholder() {
        let screen = render(&app_with(&[], &[]));

        assert!(screen.contains("Suggested tags (0/0)"));
        assert!(screen.contains("No tags suggested"));
    }

    #[test]
    fn shortcut_bar_lists_keys() {
        let screen = render(&app_with(&["rust"], &[]));

        assert!(screen.contains("Space: toggle"));
        assert!(screen.contains("Enter: apply"));
        assert!(screen.contains("q/Esc: cancel"));
    }
}
