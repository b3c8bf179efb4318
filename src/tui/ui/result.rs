//! Prediction result view: headline, probability gauge and importance chart.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{ImportanceRanking, PredictionResult, TOP_IMPORTANCES};
use crate::tui::styles::ClinicTheme;

/// Bar values are integers; scores in [0, 1] are scaled by this factor.
const BAR_SCALE: f64 = 1000.0;

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Empty,
    Complete {
        result: PredictionResult,
        ranking: ImportanceRanking,
    },
    Error {
        message: String,
    },
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Complete { result, ranking } => {
            render_prediction(f, chunks[1], result, ranking);
        }
        ResultState::Error { message } => render_error(f, chunks[1], message),
        ResultState::Empty => {}
    }
    render_result_footer(f, chunks[2]);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Prediction Result", ClinicTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_prediction(
    f: &mut Frame,
    area: Rect,
    result: &PredictionResult,
    ranking: &ImportanceRanking,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Headline
            Constraint::Length(3), // Probability
            Constraint::Min(6),    // Importances
        ])
        .margin(1)
        .split(area);

    let headline = Paragraph::new(Line::from(Span::styled(
        result.headline(),
        ClinicTheme::label(result.label),
    )))
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    // `Gauge::ratio` panics outside [0, 1].
    let probability = if result.probability.is_nan() {
        0.0
    } else {
        result.probability.clamp(0.0, 1.0)
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Positive-class Probability ",
                    ClinicTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::label(result.label))
        .ratio(probability)
        .label(format!("{:.1}%", probability * 100.0));
    f.render_widget(gauge, chunks[1]);

    render_importances(f, chunks[2], ranking);
}

fn importance_bars(ranking: &ImportanceRanking) -> Vec<Bar<'_>> {
    ranking
        .iter()
        .map(|entry| {
            Bar::default()
                .label(Line::from(entry.feature.as_str()))
                .value((entry.score.max(0.0) * BAR_SCALE).round() as u64)
                .text_value(format!("{:.3}", entry.score))
                .style(ClinicTheme::bar())
                .value_style(ClinicTheme::title())
        })
        .collect()
}

fn render_importances(f: &mut Frame, area: Rect, ranking: &ImportanceRanking) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Top {TOP_IMPORTANCES} Feature Importances "),
            ClinicTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border_focused());

    let bars = importance_bars(ranking);
    let max = (ranking.max_score().max(0.0) * BAR_SCALE).round().max(1.0) as u64;

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(max)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", ClinicTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClinicTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[Enter/N] ", ClinicTheme::key_hint()),
        Span::styled("New Prediction ", ClinicTheme::key_desc()),
        Span::styled("[Q] ", ClinicTheme::key_hint()),
        Span::styled("Quit", ClinicTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
