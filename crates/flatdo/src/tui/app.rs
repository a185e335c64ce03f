use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use flatdo_app::{OpOutcome, ServiceError, TaskRow, TaskService, TaskStore};

const MESSAGE_TTL_SECS: u64 = 5;

/// What the main panel is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Mode {
    /// Browsing the task list.
    List,
    /// Raw file contents, `None` when the file is absent.
    Raw {
        /// Unparsed file lines.
        lines: Option<Vec<String>>,
    },
    /// Capturing text for a new task.
    AddInput,
    /// Capturing replacement text for the numbered task.
    EditInput {
        /// Display number being edited.
        number: usize,
    },
    /// Waiting for y/n before clearing all task data.
    ConfirmClear,
}

/// Transient status line with a time-to-live.
pub(super) struct Message {
    pub(super) text: String,
    at: Instant,
}

/// TUI state: the service, the rows on screen, and the input machinery.
pub(super) struct App<S: TaskStore> {
    service: TaskService<S>,
    pub(super) rows: Vec<TaskRow>,
    pub(super) show_done: bool,
    pub(super) selected: usize,
    pub(super) mode: Mode,
    pub(super) input: String,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
}

impl<S: TaskStore> App<S> {
    pub(super) fn new(service: TaskService<S>, show_done: bool) -> Result<Self, ServiceError> {
        let mut app = Self {
            service,
            rows: Vec::new(),
            show_done,
            selected: 0,
            mode: Mode::List,
            input: String::new(),
            message: None,
            should_quit: false,
        };
        app.refresh()?;
        app.set_message("Ready");
        Ok(app)
    }

    /// Re-read the rows from disk. Every operation goes through here after
    /// its save, so the screen always reflects the last successful write.
    fn refresh(&mut self) -> Result<(), ServiceError> {
        self.rows = self.service.current_view(self.show_done)?;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(super) fn tick(&mut self) {
        if let Some(message) = &self.message
            && message.at.elapsed() >= Duration::from_secs(MESSAGE_TTL_SECS)
        {
            self.message = None;
        }
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            at: Instant::now(),
        });
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match &self.mode {
            Mode::List | Mode::Raw { .. } => self.handle_list_key(key.code),
            Mode::AddInput | Mode::EditInput { .. } => self.handle_input_key(key.code),
            Mode::ConfirmClear => self.handle_confirm_key(key.code),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        if matches!(self.mode, Mode::Raw { .. }) {
            if matches!(code, KeyCode::Char('q' | 'r') | KeyCode::Esc) {
                self.mode = Mode::List;
            }
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = Mode::AddInput;
            }
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('c' | ' ') => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(false),
            KeyCode::Char('D') => self.delete_selected(true),
            KeyCode::Char('v') => {
                self.show_done = !self.show_done;
                if let Err(err) = self.refresh() {
                    self.set_message(err.to_string());
                }
            }
            KeyCode::Char('r') => self.open_raw(),
            KeyCode::Char('x') => self.mode = Mode::ConfirmClear,
            _ => {}
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::List;
                self.set_message("Cancelled");
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        self.mode = Mode::List;
        if matches!(code, KeyCode::Char('y' | 'Y')) {
            let result = self.service.clear_all();
            self.report(result);
        } else {
            self.set_message("Clear cancelled");
        }
    }

    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        let result = match &self.mode {
            Mode::AddInput => self.service.add(&text),
            Mode::EditInput { number } => self.service.edit(*number, &text),
            _ => return,
        };
        self.mode = Mode::List;
        self.report(result);
    }

    fn start_edit(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            self.set_message("No task selected");
            return;
        };
        self.input = row.text.clone();
        self.mode = Mode::EditInput { number: row.number };
    }

    fn toggle_selected(&mut self) {
        let Some(number) = self.selected_number() else {
            self.set_message("No task selected");
            return;
        };
        let result = self.service.toggle(number);
        self.report(result);
    }

    fn delete_selected(&mut self, hard: bool) {
        let Some(number) = self.selected_number() else {
            self.set_message("No task selected");
            return;
        };
        let result = if hard {
            self.service.hard_delete(number)
        } else {
            self.service.soft_delete(number)
        };
        self.report(result);
    }

    fn open_raw(&mut self) {
        match self.service.raw_view() {
            Ok(lines) => {
                self.mode = Mode::Raw { lines };
                self.set_message("Raw file view");
            }
            Err(err) => self.set_message(err.to_string()),
        }
    }

    // On-screen numbers are valid mutation addresses in either view mode:
    // the default view is an order-preserving prefix of the include-done
    // index the service resolves against.
    fn selected_number(&self) -> Option<usize> {
        self.rows.get(self.selected).map(|row| row.number)
    }

    fn select_next(&mut self) {
        if !self.rows.is_empty() && self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn report(&mut self, result: Result<OpOutcome, ServiceError>) {
        match result {
            Ok(outcome) => {
                self.set_message(outcome.to_string());
                if let Err(err) = self.refresh() {
                    self.set_message(err.to_string());
                }
            }
            Err(err) => self.set_message(err.to_string()),
        }
    }
}
