use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tui_textarea::TextArea;

use crate::api::Transport;
use crate::upload::{
    load_file_preview, parse_dropped_paths, perform_upload, LinkNavigator, PreviewLoaded,
    PreviewRequest, SubmissionResult, UploadController, UploadMode, Uploaded,
};

/// Completions of background work, delivered back to the UI loop
#[derive(Debug)]
pub enum UiEvent {
    PreviewLoaded(PreviewLoaded),
    UploadFinished { id: u64, result: SubmissionResult },
}

/// Which input receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// File path field on the file tab
    Path,
    /// Text body on the text tab
    Body,
    /// Custom file name on the text tab
    Name,
}

/// Application state
pub struct App {
    /// The upload form
    pub controller: UploadController<LinkNavigator>,
    /// Text tab editor
    pub body: TextArea<'static>,
    /// File tab path field
    pub path_input: String,
    pub focus: Focus,
    /// Is the app running?
    pub running: bool,
    /// Server shown in the header
    pub server: String,
    transport: Arc<dyn Transport>,
    events: mpsc::Sender<UiEvent>,
    preview_task: Option<JoinHandle<()>>,
    upload_task: Option<JoinHandle<()>>,
    upload_seq: u64,
}

impl App {
    pub fn new(
        controller: UploadController<LinkNavigator>,
        transport: Arc<dyn Transport>,
        events: mpsc::Sender<UiEvent>,
        server: impl Into<String>,
    ) -> Self {
        let mut body = TextArea::default();
        body.set_placeholder_text("Type or paste the text to upload");
        body.set_cursor_line_style(Style::default());
        let focus = focus_for(controller.mode());

        let mut app = Self {
            controller,
            body,
            path_input: String::new(),
            focus,
            running: true,
            server: server.into(),
            transport,
            events,
            preview_task: None,
            upload_task: None,
            upload_seq: 0,
        };
        app.style_body();
        app
    }

    /// Link the app navigated to, if an upload finished
    pub fn destination(&self) -> Option<&str> {
        self.controller.navigator().destination()
    }

    /// The finished upload, once the app navigated to its link
    pub fn uploaded(&self) -> Option<&Uploaded> {
        self.destination().and(self.controller.uploaded())
    }

    pub fn quit(&mut self) {
        self.abort_tasks();
        self.running = false;
    }

    /// Process a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        // Chords never type into the single-line fields
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return self.quit(),
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Tab => return self.switch_tab(),
            KeyCode::BackTab => return self.cycle_focus(),
            KeyCode::Esc => {
                self.cancel_upload();
                return;
            }
            KeyCode::PageDown if self.controller.mode() == UploadMode::Text => {
                return self.controller.next_extension();
            }
            KeyCode::PageUp if self.controller.mode() == UploadMode::Text => {
                return self.controller.previous_extension();
            }
            _ => {}
        }

        match self.focus {
            Focus::Path => match key.code {
                KeyCode::Enter => self.select_typed_path(),
                KeyCode::Char(c) if plain => self.path_input.push(c),
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                _ => {}
            },
            Focus::Name => match key.code {
                KeyCode::Enter => self.submit(),
                KeyCode::Char(c) if plain => {
                    let mut name = self.controller.custom_name().to_string();
                    name.push(c);
                    self.controller.set_custom_name(name);
                }
                KeyCode::Backspace => {
                    let mut name = self.controller.custom_name().to_string();
                    name.pop();
                    self.controller.set_custom_name(name);
                }
                _ => {}
            },
            Focus::Body => {
                if self.body.input(key) {
                    self.sync_text();
                }
            }
        }
    }

    /// Bracketed paste; a paste made only of existing files counts as a drop
    pub fn handle_paste(&mut self, pasted: &str) {
        if let Some(paths) = parse_dropped_paths(pasted) {
            self.path_input = display_paths(&paths);
            let request = self.controller.handle_drop(paths);
            self.focus = Focus::Path;
            self.style_body();
            self.start_preview(request);
            return;
        }

        match self.focus {
            Focus::Path => self.path_input.push_str(pasted.trim_end_matches(['\r', '\n'])),
            Focus::Name => {
                let name = format!("{}{}", self.controller.custom_name(), pasted.trim());
                self.controller.set_custom_name(name);
            }
            Focus::Body => {
                self.body.insert_str(pasted);
                self.sync_text();
            }
        }
    }

    /// Apply a completion sent by a background task
    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PreviewLoaded(loaded) => {
                self.controller.apply_file_preview(loaded);
            }
            UiEvent::UploadFinished { id, result } => {
                // Cancelled or superseded attempts may still report in
                if id != self.upload_seq || !self.controller.is_submitting() {
                    return;
                }
                self.upload_task = None;
                self.controller.finish_submit(&result);
                if self.destination().is_some() {
                    self.running = false;
                }
            }
        }
    }

    fn switch_tab(&mut self) {
        self.controller.toggle_mode();
        self.focus = focus_for(self.controller.mode());
        self.style_body();
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Path => Focus::Path,
            Focus::Body => Focus::Name,
            Focus::Name => Focus::Body,
        };
        self.style_body();
    }

    fn select_typed_path(&mut self) {
        let typed = self.path_input.trim();
        let paths = if typed.is_empty() {
            Vec::new()
        } else {
            parse_dropped_paths(typed).unwrap_or_else(|| vec![PathBuf::from(typed)])
        };
        let request = self.controller.select_files(paths);
        self.start_preview(request);
    }

    fn sync_text(&mut self) {
        self.controller.set_text(self.body.lines().join("\n"));
    }

    fn start_preview(&mut self, request: Option<PreviewRequest>) {
        if let Some(task) = self.preview_task.take() {
            task.abort();
        }
        let Some(request) = request else {
            return;
        };

        let events = self.events.clone();
        self.preview_task = Some(tokio::spawn(async move {
            let loaded = load_file_preview(request).await;
            let _ = events.send(UiEvent::PreviewLoaded(loaded)).await;
        }));
    }

    fn submit(&mut self) {
        let Some(pending) = self.controller.begin_submit() else {
            return;
        };
        self.upload_seq += 1;
        let id = self.upload_seq;

        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        self.upload_task = Some(tokio::spawn(async move {
            let result = perform_upload(transport.as_ref(), pending).await;
            let _ = events.send(UiEvent::UploadFinished { id, result }).await;
        }));
    }

    fn cancel_upload(&mut self) {
        if let Some(task) = self.upload_task.take() {
            task.abort();
        }
        self.controller.cancel_submit();
    }

    fn abort_tasks(&mut self) {
        for task in [self.preview_task.take(), self.upload_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }

    fn style_body(&mut self) {
        let color = if self.focus == Focus::Body {
            UploadMode::Text.color()
        } else {
            Color::DarkGray
        };
        self.body.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" Text "),
        );
    }
}

fn focus_for(mode: UploadMode) -> Focus {
    match mode {
        UploadMode::File => Focus::Path,
        UploadMode::Text => Focus::Body,
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpReply, MockTransport};
    use crate::upload::Preview;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn app_with(transport: MockTransport) -> (App, mpsc::Receiver<UiEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let controller = UploadController::new(LinkNavigator::default(), "txt");
        (
            App::new(controller, Arc::new(transport), tx, "http://localhost:8080"),
            rx,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn success(url: &'static str) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_upload_file()
            .times(1)
            .returning(move |_| Ok(HttpReply::json(200, &json!({ "url_frontend": url }))));
        transport
    }

    #[tokio::test]
    async fn test_drop_activates_file_tab_and_previews() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let (mut app, mut rx) = app_with(MockTransport::new());
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.controller.mode(), UploadMode::Text);

        app.handle_paste(&path.display().to_string());
        assert_eq!(app.controller.mode(), UploadMode::File);
        assert_eq!(app.focus, Focus::Path);
        // the drop is not typed into the editor
        assert_eq!(app.body.lines().join(""), "");

        app.handle_event(rx.recv().await.unwrap());
        assert_eq!(
            app.controller.file_preview().get().map(Preview::body).as_deref(),
            Some("No preview for this file type")
        );
    }

    #[tokio::test]
    async fn test_plain_paste_goes_into_editor() {
        let (mut app, _rx) = app_with(MockTransport::new());
        app.handle_key(key(KeyCode::Tab));
        app.handle_paste("fn main() {}\nprintln!");

        assert_eq!(app.controller.text(), "fn main() {}\nprintln!");
        assert_eq!(
            app.controller.text_preview().get().unwrap().header(),
            "Preview: paste.txt (21 characters)"
        );
    }

    #[tokio::test]
    async fn test_text_upload_navigates_and_stops() {
        let (mut app, mut rx) = app_with(success("https://t.example/f/1/notes.md"));
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "hello");
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Name);
        type_str(&mut app, "notes");
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.controller.synthesized_filename(), "notes.md");

        app.handle_key(ctrl('s'));
        assert!(app.controller.is_submitting());
        // second trigger while in flight is ignored
        app.handle_key(ctrl('s'));

        app.handle_event(rx.recv().await.unwrap());
        assert!(!app.running);
        assert_eq!(app.destination(), Some("https://t.example/f/1/notes.md"));
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_running() {
        let mut transport = MockTransport::new();
        transport.expect_upload_file().never();
        let (mut app, _rx) = app_with(transport);

        app.handle_key(ctrl('s'));
        assert_eq!(app.controller.status(), Some("Please select a file to upload."));
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_cancel_discards_late_completion() {
        let (mut app, mut rx) = app_with(success("https://t/f"));
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "x");
        app.handle_key(ctrl('s'));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.controller.status(), Some("Upload cancelled."));

        // the aborted task may or may not have reported before dying
        if let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
        assert!(app.running);
        assert_eq!(app.destination(), None);
        assert_eq!(app.controller.status(), Some("Upload cancelled."));
    }

    #[tokio::test]
    async fn test_typed_path_is_selected_on_enter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hi").unwrap();

        let (mut app, mut rx) = app_with(MockTransport::new());
        type_str(&mut app, &path.display().to_string());
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.files().len(), 1);
        assert_eq!(app.controller.files()[0].name, "a.txt");

        app.handle_event(rx.recv().await.unwrap());
        assert_eq!(app.controller.file_preview().len(), 1);
    }

    #[tokio::test]
    async fn test_relative_name_paste_stays_text() {
        // Cargo.toml exists in the working directory of the test run
        assert!(std::path::Path::new("Cargo.toml").is_file());

        let (mut app, _rx) = app_with(MockTransport::new());
        app.handle_key(key(KeyCode::Tab));
        app.handle_paste("Cargo.toml");

        assert_eq!(app.controller.mode(), UploadMode::Text);
        assert_eq!(app.focus, Focus::Body);
        assert_eq!(app.controller.text(), "Cargo.toml");
        assert!(app.controller.files().is_empty());
    }

    #[tokio::test]
    async fn test_chords_do_not_type_into_fields() {
        let alt = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT);
        let (mut app, _rx) = app_with(MockTransport::new());
        type_str(&mut app, "/tmp");
        app.handle_key(ctrl('v'));
        app.handle_key(alt('x'));
        assert_eq!(app.path_input, "/tmp");

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Name);
        type_str(&mut app, "ab");
        app.handle_key(ctrl('v'));
        app.handle_key(alt('b'));
        app.handle_key(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert_eq!(app.controller.custom_name(), "abC");
    }

    #[tokio::test]
    async fn test_finished_upload_is_exposed_with_extras() {
        let mut transport = MockTransport::new();
        transport.expect_upload_file().times(1).returning(|_| {
            Ok(HttpReply::json(
                200,
                &json!({"url_frontend": "https://t/f/3", "url_raw": "https://t/raw/3"}),
            ))
        });
        let (mut app, mut rx) = app_with(transport);
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "x");
        assert!(app.uploaded().is_none());

        app.handle_key(ctrl('s'));
        app.handle_event(rx.recv().await.unwrap());
        let uploaded = app.uploaded().unwrap();
        assert_eq!(uploaded.frontend_url, "https://t/f/3");
        assert_eq!(uploaded.info.url_raw.as_deref(), Some("https://t/raw/3"));
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, _rx) = app_with(MockTransport::new());
        app.handle_key(ctrl('c'));
        assert!(!app.running);
    }
}
