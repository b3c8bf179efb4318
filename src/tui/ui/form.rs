//! Hormone measurement entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{HormoneInputs, DEFAULT_MEASUREMENT};
use crate::tui::styles::ClinicTheme;

/// One numeric input box.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub unit: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, unit: &'static str) -> Self {
        Self {
            label,
            unit,
            value: format!("{DEFAULT_MEASUREMENT:.1}"),
        }
    }

    fn parse(&self) -> Result<f64, String> {
        self.value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{}: Invalid number", self.label))
    }
}

/// Measurement form state
pub struct MeasurementFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for MeasurementFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::new("Beta HCG I", "mIU/mL"),
                FormField::new("Beta HCG II", "mIU/mL"),
                FormField::new("AMH", "ng/mL"),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl MeasurementFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Append a character to the focused field. Only number characters are kept.
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.fields[self.selected_field].value.push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
    }

    /// Put every field back to its default value.
    pub fn reset(&mut self) {
        self.clear_sensitive();
        *self = Self::default();
    }

    /// Wipe the field buffers.
    ///
    /// Called once a submission has been parsed so measurements do not
    /// linger in UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse the fields into raw inputs.
    ///
    /// Range checks are left to the pipeline, which reports them as
    /// validation errors.
    pub fn to_inputs(&self) -> Result<HormoneInputs, String> {
        let values = self
            .fields
            .iter()
            .map(FormField::parse)
            .collect::<Result<Vec<f64>, String>>()?;

        match values.as_slice() {
            [beta_hcg_i, beta_hcg_ii, amh] => Ok(HormoneInputs::new(*beta_hcg_i, *beta_hcg_ii, *amh)),
            _ => Err(format!("Expected 3 measurements, got {}", values.len())),
        }
    }
}

/// Render the form with an instructions sidebar.
pub fn render_measurement_form(f: &mut Frame, area: Rect, state: &MeasurementFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(chunks[1]);

    render_instructions(f, body[0]);
    render_form_fields(f, body[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("PCOS Prediction", ClinicTheme::title()),
        Span::styled(
            " │ Predict the probability of PCOS based on hormone levels",
            ClinicTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_instructions(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("- Enter the patient's hormone levels.", ClinicTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("- Press ", ClinicTheme::text()),
            Span::styled("Enter", ClinicTheme::key_hint()),
            Span::styled(" to predict.", ClinicTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "- Use realistic medical values for meaningful predictions.",
            ClinicTheme::text(),
        )),
    ];

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Instructions ", ClinicTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        );

    f.render_widget(panel, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &MeasurementFormState) {
    let constraints: Vec<Constraint> = state
        .fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(2)
        .split(area);

    for (i, field) in state.fields.iter().enumerate() {
        let is_selected = i == state.selected_field;
        let (border_style, title_style) = if is_selected {
            (ClinicTheme::border_focused(), ClinicTheme::focused())
        } else {
            (ClinicTheme::border(), ClinicTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ({}) ", field.label, field.unit),
                title_style,
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = if field.value.is_empty() {
            Span::styled("0.0 or more", ClinicTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), ClinicTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value,
            if is_selected {
                Span::styled("▌", ClinicTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, rows[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &MeasurementFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(err.as_str(), ClinicTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Navigate ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Predict ", ClinicTheme::key_desc()),
            Span::styled("[Del] ", ClinicTheme::key_hint()),
            Span::styled("Clear ", ClinicTheme::key_desc()),
            Span::styled("[Ctrl+R] ", ClinicTheme::key_hint()),
            Span::styled("Reset ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_to_default_inputs() {
        let state = MeasurementFormState::default();
        assert_eq!(state.fields[0].value, "1.0");
        assert_eq!(state.to_inputs().expect("parse"), HormoneInputs::default());
    }

    #[test]
    fn test_editing_fields() {
        let mut state = MeasurementFormState::default();
        state.clear_field();
        for c in "12.5x".chars() {
            state.input_char(c);
        }
        state.next_field();
        for _ in 0..3 {
            state.delete_char();
        }
        state.input_char('3');

        let inputs = state.to_inputs().expect("parse");
        assert_eq!(inputs, HormoneInputs::new(12.5, 3.0, 1.0));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = MeasurementFormState::default();
        state.prev_field();
        assert_eq!(state.selected_field, 2);
        state.next_field();
        assert_eq!(state.selected_field, 0);
    }

    #[test]
    fn test_empty_field_is_error() {
        let mut state = MeasurementFormState::default();
        state.next_field();
        state.next_field();
        state.clear_field();
        let err = state.to_inputs().expect_err("must fail");
        assert!(err.starts_with("AMH"));
    }

    #[test]
    fn test_clear_sensitive_wipes_values() {
        let mut state = MeasurementFormState::default();
        state.error_message = Some("x".into());
        state.clear_sensitive();
        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert!(state.error_message.is_none());

        state.reset();
        assert_eq!(state.fields[2].value, "1.0");
    }
}
