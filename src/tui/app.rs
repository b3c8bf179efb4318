//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Running the inference pipeline on submit

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::InferencePipeline;
use crate::PredictError;

use super::ui::{
    form::{render_measurement_form, MeasurementFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    pipeline: InferencePipeline,
    form_state: MeasurementFormState,
    result_state: ResultState,
}

impl App {
    /// Create the application around an already-loaded pipeline.
    ///
    /// Artifacts are loaded before the UI starts, so a load failure never
    /// reaches this point.
    #[must_use]
    pub fn new(pipeline: InferencePipeline) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            pipeline,
            form_state: MeasurementFormState::default(),
            result_state: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Form => render_measurement_form(f, chunks[0], &self.form_state),
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key, modifiers),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.form_state.reset();
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.result_state = ResultState::Empty;
                self.form_state.reset();
                self.screen = Screen::Form;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let inputs = match self.form_state.to_inputs() {
            Ok(inputs) => inputs,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        let outcome = self
            .pipeline
            .infer(&inputs)
            .and_then(|result| Ok((result, self.pipeline.rank_importances()?)));

        match outcome {
            Ok((result, ranking)) => {
                self.result_state = ResultState::Complete { result, ranking };
            }
            // Entry errors stay on the form so the user can correct them.
            Err(PredictError::Validation(e)) => {
                self.form_state.error_message = Some(e.to_string());
                return;
            }
            Err(e) => {
                tracing::error!("Inference failed: {}", e);
                self.result_state = ResultState::Error {
                    message: e.to_string(),
                };
            }
        }

        self.form_state.clear_sensitive();
        self.screen = Screen::Result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ArtifactStore;
    use crate::domain::Label;
    use std::path::Path;
    use std::sync::Arc;

    fn app() -> App {
        let store = ArtifactStore::load(
            Path::new("models/best_rf_model.json"),
            Path::new("models/scaler.json"),
        )
        .expect("bundled artifacts load");
        App::new(InferencePipeline::new(Arc::new(store)))
    }

    fn type_into_field(app: &mut App, text: &str) {
        app.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_submit_defaults_shows_result() {
        let mut app = app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.screen, Screen::Result);
        match &app.result_state {
            ResultState::Complete { result, ranking } => {
                assert_eq!(result.label, Label::Negative);
                assert_eq!(ranking.len(), 4);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(app.form_state.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_negative_value_stays_on_form() {
        let mut app = app();
        type_into_field(&mut app, "-2");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.screen, Screen::Form);
        let message = app.form_state.error_message.clone().expect("error shown");
        assert!(message.contains("beta_HCG_I"));
        assert_eq!(app.form_state.fields[0].value, "-2");
    }

    #[test]
    fn test_unparseable_value_stays_on_form() {
        let mut app = app();
        type_into_field(&mut app, "..");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Form);
        assert!(app.form_state.error_message.is_some());
    }

    #[test]
    fn test_new_prediction_resets_form() {
        let mut app = app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);

        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.form_state.fields[0].value, "1.0");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
