//! Tab view: six-string grid of the active measure with the live cursor.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tabsync::engine::PlaybackState;
use tabsync::timing::POSITIONS_PER_MEASURE;
use tabsync::tuning;

use super::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], app);
    render_tab(frame, chunks[1], app);
    render_help(frame, chunks[2]);
}

fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let result = app.result();
    let state = match app.state() {
        PlaybackState::Idle => "stopped",
        PlaybackState::PlayingSynth => "▶ synth",
        PlaybackState::PlayingOriginal => "▶ original",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", result.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {:.0} BPM ", result.tempo_bpm()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(" {} ", result.tuning_name())),
        Span::styled(
            format!(" {state} "),
            Style::default().fg(Color::Green),
        ),
        Span::raw(if app.metronome() { " [metronome] " } else { "" }),
        Span::styled(
            format!(" {}", app.status()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_tab(frame: &mut Frame, area: Rect, app: &App) {
    let result = app.result();
    let cursor = app.cursor();
    let section_idx = cursor.map(|c| c.section).unwrap_or(0);
    let measure_idx = cursor.map(|c| c.measure).unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();

    match result.sections.get(section_idx) {
        Some(section) => {
            lines.push(Line::from(Span::styled(
                format!("Section: {}", section.title),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(measure_strip(section.measures.len(), measure_idx));
            lines.push(Line::default());

            if let Some(measure) = section.measures.get(measure_idx) {
                if !measure.chords.is_empty() {
                    lines.push(Line::from(format!("Chords: {}", measure.chords.join("  "))));
                    lines.push(Line::default());
                }
                let names = tuning::lookup(result.tuning_name()).string_names;
                for string in 1..=6u8 {
                    lines.push(string_line(measure, string, names, cursor.map(|c| c.position)));
                }
            }
        }
        None => lines.push(Line::from("(empty transcription)")),
    }

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" tab "));
    frame.render_widget(widget, area);
}

fn measure_strip(count: usize, active: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("Measure: ")];
    for i in 0..count {
        let text = format!("{} ", i + 1);
        if i == active {
            spans.push(Span::styled(
                text,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(text));
        }
    }
    Line::from(spans)
}

fn string_line(
    measure: &tabsync::transcription::Measure,
    string: u8,
    names: [&'static str; 6],
    active_position: Option<usize>,
) -> Line<'static> {
    // names run low to high; string 1 is the highest.
    let label = names[(6 - string) as usize];
    let mut spans = vec![Span::raw(format!("{label:>3} |"))];

    for position in 0..POSITIONS_PER_MEASURE as usize {
        let cell = measure
            .notes
            .iter()
            .find(|n| n.string == string && n.position as usize == position)
            .map(|n| format!("{:>2}", n.fret))
            .unwrap_or_else(|| "--".to_owned());

        let style = if active_position == Some(position) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{cell} "), style));
    }

    Line::from(spans)
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::raw(" space: play/stop synth  "),
        Span::raw("o: play/stop original  "),
        Span::raw("m: metronome  "),
        Span::raw("q: quit"),
    ]);
    let widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}
