use crate::application::{App, AppMode, Route};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('1') => app.navigate(Route::Registry),
            KeyCode::Char('2') => app.navigate(Route::Directory),
            KeyCode::Char('3') => app.navigate(Route::Message),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => match app.route {
                Route::Registry => Self::handle_registry_view(app, key),
                Route::Directory => Self::handle_directory_view(app, key),
                Route::DirectoryDetail(id) => Self::handle_detail_view(app, key, id),
                Route::Message => {}
            },
        }
    }

    fn handle_registry_view(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('i') => app.start_editing(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_record(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_record(),
            KeyCode::Delete | KeyCode::Char('d') => app.remove_selected_record(),
            _ => {}
        }
    }

    fn handle_directory_view(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_user(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_user(),
            KeyCode::Enter => app.open_selected_user(),
            KeyCode::Char('r') => app.navigate(Route::Directory),
            _ => {}
        }
    }

    fn handle_detail_view(app: &mut App, key: KeyCode, id: u64) {
        match key {
            KeyCode::Esc | KeyCode::Backspace => app.navigate(Route::Directory),
            KeyCode::Char('r') => app.navigate(Route::DirectoryDetail(id)),
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Enter => {
                app.submit_form();
            }
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::DirectoryRequest;
    use crate::domain::{Field, EMAIL_INVALID};

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_number_keys_switch_views() {
        let mut app = App::default();

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.route, Route::Directory);
        assert_eq!(app.take_pending_requests()[0].1, DirectoryRequest::Collection);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.route, Route::Message);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.route, Route::Registry);
    }

    #[test]
    fn test_register_through_keyboard() {
        let mut app = App::default();

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, AppMode::Editing);

        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ana@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "300 123");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.registry.len(), 1);
        assert_eq!(app.registry.records()[0].phone, "300 123");
    }

    #[test]
    fn test_digits_in_form_are_text_not_navigation() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Field::Phone);

        type_text(&mut app, "123");
        assert_eq!(app.route, Route::Registry);
        assert_eq!(app.form.phone, "123");
    }

    #[test]
    fn test_rejected_submit_stays_in_form() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "bad-email");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "123");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Editing);
        assert_eq!(app.errors.get(Field::Email), Some(EMAIL_INVALID));
        assert_eq!(app.focus, Field::Email);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form.email, "bad-email");
    }

    #[test]
    fn test_delete_key_removes_record() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "Ana");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ana@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.registry.is_empty());
    }

    #[test]
    fn test_detail_back_returns_to_list() {
        let mut app = App::default();
        app.navigate(Route::DirectoryDetail(4));
        app.take_pending_requests();

        press(&mut app, KeyCode::Esc);

        assert_eq!(app.route, Route::Directory);
        assert_eq!(app.take_pending_requests()[0].1, DirectoryRequest::Collection);
    }

    #[test]
    fn test_control_chars_are_not_typed() {
        let mut app = App::default();
        app.start_editing();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.form.name.is_empty());
    }
}
