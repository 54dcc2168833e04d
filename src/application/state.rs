//! Application state for the terminal shell.
//!
//! This module holds the current route, the registration form, the registry
//! and the directory fetch state the views render from.

use super::directory::{Directory, DirectoryRequest, FetchCompletion, RequestToken};
use super::registry::Registry;
use super::routes::Route;
use crate::domain::{Candidate, Field, ValidationErrors};
use crate::infrastructure::{MemoryStore, MessageConfig};

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation mode - view switching and list shortcuts are available
    Normal,
    /// Form editing mode - the user is typing into the registration form
    Editing,
}

/// Main application state containing the workflows and UI state.
///
/// # Examples
///
/// ```
/// use primera_pagina::application::{App, Route};
///
/// let app = App::default();
/// assert_eq!(app.route, Route::Registry);
/// assert!(app.registry.is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    /// Route currently shown
    pub route: Route,
    /// Current input mode
    pub mode: AppMode,
    /// Locally registered users
    pub registry: Registry,
    /// Registration form content
    pub form: Candidate,
    /// Form field receiving key presses
    pub focus: Field,
    /// Cursor position within the focused field, in characters
    pub cursor_position: usize,
    /// Messages from the last rejected submit
    pub errors: ValidationErrors,
    /// Highlighted row in the registered users list
    pub selected_record: usize,
    /// Remote list and detail state
    pub directory: Directory,
    /// Highlighted card in the directory list
    pub selected_user: usize,
    /// Content of the message view
    pub message: MessageConfig,
    /// Temporary status message to display
    pub status_message: Option<String>,
    pending: Vec<(RequestToken, DirectoryRequest)>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            Registry::open(Box::new(MemoryStore::new())),
            MessageConfig::default(),
        )
    }
}

impl App {
    pub fn new(registry: Registry, message: MessageConfig) -> Self {
        Self {
            route: Route::Registry,
            mode: AppMode::Normal,
            registry,
            form: Candidate::default(),
            focus: Field::Name,
            cursor_position: 0,
            errors: ValidationErrors::new(),
            selected_record: 0,
            directory: Directory::new(),
            selected_user: 0,
            message,
            status_message: None,
            pending: Vec::new(),
        }
    }

    /// Switches to `route`, starting the fetch the route needs.
    ///
    /// The directory list is refetched on every visit and a detail route
    /// always fetches its user, so views never show data from a previous visit.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = %self.route, to = %route, "navigate");
        self.route = route;
        self.mode = AppMode::Normal;
        self.status_message = None;
        match route {
            Route::Directory => {
                self.selected_user = 0;
                self.request(DirectoryRequest::Collection);
            }
            Route::DirectoryDetail(id) => self.request(DirectoryRequest::Item(id)),
            Route::Registry | Route::Message => {}
        }
    }

    fn request(&mut self, request: DirectoryRequest) {
        let token = self.directory.begin(request);
        self.pending.push((token, request));
    }

    /// Drains the fetches started since the last call, for the caller to run.
    pub fn take_pending_requests(&mut self) -> Vec<(RequestToken, DirectoryRequest)> {
        std::mem::take(&mut self.pending)
    }

    /// Hands a finished fetch to the directory. Stale results are dropped there.
    pub fn apply_fetch(&mut self, completion: FetchCompletion) {
        if self.directory.complete(completion) {
            if let Some(users) = self.directory.list().data() {
                self.selected_user = self.selected_user.min(users.len().saturating_sub(1));
            }
        }
    }

    /// Starts editing the registration form on the first field with an error,
    /// or on the name field.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.focus = self.errors.fields().next().unwrap_or(Field::Name);
        self.cursor_position = self.field_len();
        self.status_message = None;
    }

    /// Leaves the form without clearing what was typed.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Submits the form to the registry.
    ///
    /// On success the form is cleared and editing ends; on failure the
    /// messages are kept for display and the form stays open.
    pub fn submit_form(&mut self) -> bool {
        match self.registry.register(&self.form) {
            Ok(record) => {
                self.errors = ValidationErrors::new();
                self.form = Candidate::default();
                self.focus = Field::Name;
                self.cursor_position = 0;
                self.mode = AppMode::Normal;
                self.selected_record = self.registry.len().saturating_sub(1);
                self.status_message = Some(format!("Usuario {} registrado", record.name));
                self.report_persist_error();
                true
            }
            Err(errors) => {
                self.errors = errors;
                if let Some(field) = self.errors.fields().next() {
                    self.focus = field;
                    self.cursor_position = self.field_len();
                }
                false
            }
        }
    }

    /// Removes the highlighted user from the registry.
    pub fn remove_selected_record(&mut self) {
        let Some(id) = self
            .registry
            .records()
            .get(self.selected_record)
            .map(|record| record.id.clone())
        else {
            return;
        };
        self.registry.remove(&id);
        self.selected_record = self.selected_record.min(self.registry.len().saturating_sub(1));
        self.status_message = Some("Usuario eliminado".to_string());
        self.report_persist_error();
    }

    fn report_persist_error(&mut self) {
        if let Some(e) = self.registry.take_persist_error() {
            self.status_message = Some(format!("No se pudo guardar: {}", e));
        }
    }

    pub fn select_next_record(&mut self) {
        if self.selected_record + 1 < self.registry.len() {
            self.selected_record += 1;
        }
    }

    pub fn select_previous_record(&mut self) {
        self.selected_record = self.selected_record.saturating_sub(1);
    }

    pub fn select_next_user(&mut self) {
        let count = self.directory.list().data().map_or(0, Vec::len);
        if self.selected_user + 1 < count {
            self.selected_user += 1;
        }
    }

    pub fn select_previous_user(&mut self) {
        self.selected_user = self.selected_user.saturating_sub(1);
    }

    /// Opens the detail route for the highlighted directory card.
    pub fn open_selected_user(&mut self) {
        let id = self
            .directory
            .list()
            .data()
            .and_then(|users| users.get(self.selected_user))
            .map(|user| user.id);
        if let Some(id) = id {
            self.navigate(Route::DirectoryDetail(id));
        }
    }

    /// Moves focus to the next form field.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.cursor_position = self.field_len();
    }

    /// Moves focus to the previous form field.
    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
        self.cursor_position = self.field_len();
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.form.name,
            Field::Email => &self.form.email,
            Field::Phone => &self.form.phone,
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.form.name,
            Field::Email => &mut self.form.email,
            Field::Phone => &mut self.form.phone,
        }
    }

    fn field_len(&self) -> usize {
        self.field_value(self.focus).chars().count()
    }

    /// Inserts a character at the cursor in the focused field.
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        let value = self.focused_value_mut();
        let at = byte_index(value, cursor);
        value.insert(at, c);
        self.cursor_position += 1;
    }

    /// Deletes the character before the cursor.
    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor = self.cursor_position - 1;
        let value = self.focused_value_mut();
        let at = byte_index(value, cursor);
        value.remove(at);
        self.cursor_position = cursor;
    }

    /// Deletes the character under the cursor.
    pub fn delete_char_at_cursor(&mut self) {
        if self.cursor_position >= self.field_len() {
            return;
        }
        let cursor = self.cursor_position;
        let value = self.focused_value_mut();
        let at = byte_index(value, cursor);
        value.remove(at);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.field_len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.field_len();
    }
}

fn byte_index(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{FetchOutcome, FetchState};
    use crate::domain::{RemoteUser, NAME_REQUIRED};
    use crate::infrastructure::DirectoryError;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    fn fill_form(app: &mut App, name: &str, email: &str, phone: &str) {
        app.start_editing();
        app.focus = Field::Name;
        app.cursor_position = 0;
        type_text(app, name);
        app.focus_next();
        type_text(app, email);
        app.focus_next();
        type_text(app, phone);
    }

    fn remote(id: u64, name: &str) -> RemoteUser {
        RemoteUser {
            id,
            name: name.to_string(),
            email: "x@example.com".to_string(),
            phone: "1".to_string(),
        }
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.route, Route::Registry);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.focus, Field::Name);
        assert_eq!(app.cursor_position, 0);
        assert!(app.errors.is_empty());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_submit_valid_form_registers_and_clears() {
        let mut app = App::default();
        fill_form(&mut app, "Ana", "ana@example.com", "123");

        assert!(app.submit_form());

        assert_eq!(app.registry.len(), 1);
        assert_eq!(app.form, Candidate::default());
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.errors.is_empty());
        assert!(app.status_message.as_deref().unwrap().contains("Ana"));
    }

    #[test]
    fn test_submit_invalid_form_keeps_input_and_focuses_error() {
        let mut app = App::default();
        fill_form(&mut app, "", "a@b.co", "123");

        assert!(!app.submit_form());

        assert_eq!(app.errors.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(app.focus, Field::Name);
        assert_eq!(app.form.email, "a@b.co");
        assert_eq!(app.mode, AppMode::Editing);
        assert!(app.registry.is_empty());
    }

    #[test]
    fn test_successful_submit_clears_previous_errors() {
        let mut app = App::default();
        fill_form(&mut app, "", "ana@example.com", "123");
        assert!(!app.submit_form());

        type_text(&mut app, "Ana");
        assert!(app.submit_form());
        assert!(app.errors.is_empty());
    }

    #[test]
    fn test_editing_handles_multibyte_characters() {
        let mut app = App::default();
        app.start_editing();
        type_text(&mut app, "Zoé");
        app.move_cursor_left();
        app.delete_char_before_cursor();
        assert_eq!(app.form.name, "Zé");

        app.move_cursor_home();
        app.delete_char_at_cursor();
        assert_eq!(app.form.name, "é");

        app.move_cursor_end();
        app.insert_char('ñ');
        assert_eq!(app.form.name, "éñ");
        assert_eq!(app.cursor_position, 2);
    }

    #[test]
    fn test_remove_selected_record() {
        let mut app = App::default();
        fill_form(&mut app, "Ana", "ana@example.com", "1");
        app.submit_form();
        fill_form(&mut app, "Luis", "luis@example.com", "2");
        app.submit_form();

        app.selected_record = 1;
        app.remove_selected_record();

        assert_eq!(app.registry.len(), 1);
        assert_eq!(app.registry.records()[0].name, "Ana");
        assert_eq!(app.selected_record, 0);

        app.remove_selected_record();
        app.remove_selected_record();
        assert!(app.registry.is_empty());
    }

    #[test]
    fn test_navigate_to_directory_queues_collection_fetch() {
        let mut app = App::default();
        app.navigate(Route::Directory);

        let pending = app.take_pending_requests();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1, DirectoryRequest::Collection);
        assert!(app.directory.list().is_loading());
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_navigate_to_static_views_does_not_fetch() {
        let mut app = App::default();
        app.navigate(Route::Message);
        app.navigate(Route::Registry);
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_open_selected_user_fetches_detail() {
        let mut app = App::default();
        app.navigate(Route::Directory);
        let (token, _) = app.take_pending_requests()[0];
        app.apply_fetch(FetchCompletion {
            token,
            outcome: FetchOutcome::Collection(Ok(vec![remote(1, "Ana"), remote(2, "Luis")])),
        });

        app.select_next_user();
        app.select_next_user();
        assert_eq!(app.selected_user, 1);

        app.open_selected_user();
        assert_eq!(app.route, Route::DirectoryDetail(2));
        let pending = app.take_pending_requests();
        assert_eq!(pending[0].1, DirectoryRequest::Item(2));
        assert!(app.directory.detail().is_loading());
    }

    #[test]
    fn test_switching_detail_discards_stale_response() {
        let mut app = App::default();
        app.navigate(Route::DirectoryDetail(1));
        app.navigate(Route::DirectoryDetail(2));
        let pending = app.take_pending_requests();

        app.apply_fetch(FetchCompletion {
            token: pending[1].0,
            outcome: FetchOutcome::Item(Ok(remote(2, "Luis"))),
        });
        app.apply_fetch(FetchCompletion {
            token: pending[0].0,
            outcome: FetchOutcome::Item(Ok(remote(1, "Ana"))),
        });

        assert_eq!(app.directory.detail().data().map(|u| u.id), Some(2));
    }

    #[test]
    fn test_missing_detail_shows_failure() {
        let mut app = App::default();
        app.navigate(Route::DirectoryDetail(404));
        let (token, _) = app.take_pending_requests()[0];
        app.apply_fetch(FetchCompletion {
            token,
            outcome: FetchOutcome::Item(Err(DirectoryError::ItemStatus(404))),
        });

        assert!(matches!(app.directory.detail(), FetchState::Failure(_)));
    }
}
