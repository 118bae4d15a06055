//! Keyboard event handling for the review dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::ReviewApp;

/// Handles a keyboard event and updates the dialog state accordingly.
///
/// Returns `true` once the dialog is finished, `false` otherwise.
///
/// # Event Handling
///
/// - `Space`: toggle the highlighted tag
/// - `j`/`Down`, `k`/`Up`: move the highlight
/// - `a`: select all, or clear all when everything is selected
/// - `Enter`: confirm the selection
/// - `q`, `Esc`, `Ctrl+C`: cancel
///
/// # Examples
///
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use tagsmith::models::NotePath;
/// use tagsmith::review::{ReviewApp, ReviewOutcome, event::handle_key_event};
/// use tagsmith::service::Suggestion;
///
/// let mut app = ReviewApp::new(&Suggestion {
///     path: NotePath::from("a.md"),
///     content: String::new(),
///     existing: Vec::new(),
///     tags: vec!["rust".to_string()],
/// });
///
/// let done = handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
/// assert!(done);
/// assert_eq!(app.into_outcome(), ReviewOutcome::Confirmed(vec!["rust".to_string()]));
/// ```
pub fn handle_key_event(app: &mut ReviewApp, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.cancel();
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.cancel();
            return true;
        }
        KeyCode::Enter => {
            app.confirm();
            return true;
        }
        KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('a') => app.toggle_all(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotePath;
    use crate::review::ReviewOutcome;
    use crate::service::Suggestion;

    fn app() -> ReviewApp {
        ReviewApp::new(&Suggestion {
            path: NotePath::from("a.md"),
            content: "Body".to_string(),
            existing: Vec::new(),
            tags: vec!["rust".to_string(), "async".to_string(), "tokio".to_string()],
        })
    }

    fn press(app: &mut ReviewApp, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn enter_confirms_full_selection_by_default() {
        let mut app = app();

        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(
            app.into_outcome(),
            ReviewOutcome::Confirmed(vec![
                "rust".to_string(),
                "async".to_string(),
                "tokio".to_string()
            ])
        );
    }

    #[test]
    fn space_toggles_and_enter_applies_subset() {
        let mut app = app();

        assert!(!press(&mut app, KeyCode::Char('j')));
        assert!(!press(&mut app, KeyCode::Char(' ')));
        assert!(press(&mut app, KeyCode::Enter));

        assert_eq!(
            app.into_outcome(),
            ReviewOutcome::Confirmed(vec!["rust".to_string(), "tokio".to_string()])
        );
    }

    #[test]
    fn arrow_keys_move_like_j_and_k() {
        let mut app = app();

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor(), Some(2));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor(), Some(1));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor(), Some(0));
    }

    #[test]
    fn quit_and_escape_cancel() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            assert!(press(&mut app, code));
            assert_eq!(app.into_outcome(), ReviewOutcome::Cancelled);
        }
    }

    #[test]
    fn ctrl_c_cancels() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert!(handle_key_event(&mut app, key));
        assert_eq!(app.into_outcome(), ReviewOutcome::Cancelled);
    }

    #[test]
    fn a_toggles_every_tag() {
        let mut app = app();

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.selected_count(), 0);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.selected_count(), 3);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut app = app();

        assert!(!press(&mut app, KeyCode::Char('x')));
        assert!(!press(&mut app, KeyCode::Tab));
        assert_eq!(app.selected_count(), 3);
        assert!(app.outcome().is_none());
    }
}
