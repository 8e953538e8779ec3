//! Player application: owns the controller and runs the frame loop.
//!
//! The loop redraws at roughly display rate and polls the controller every
//! frame. The poll is what moves the cursor; the frame cadence itself never
//! enters the timing math, which always reads the audio clock.

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use tabsync::engine::{CursorPosition, PlaybackController, PlaybackState};
use tabsync::output::CpalSink;
use tabsync::transcription::TranscriptionResult;

use super::ui;

/// One redraw roughly every 16ms (~60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    controller: PlaybackController<CpalSink>,
    result: TranscriptionResult,
    metronome: bool,
    cursor: Option<CursorPosition>,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(controller: PlaybackController<CpalSink>, result: TranscriptionResult) -> Self {
        Self {
            controller,
            result,
            metronome: false,
            cursor: None,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.cursor = self.controller.poll();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.controller.stop();
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.toggle_synth(),
            KeyCode::Char('o') => self.toggle_original(),
            KeyCode::Char('m') => {
                self.metronome = !self.metronome;
                // Takes effect on the next playback start.
                self.status = if self.metronome {
                    "metronome on".to_owned()
                } else {
                    "metronome off".to_owned()
                };
            }
            _ => {}
        }
    }

    fn toggle_synth(&mut self) {
        if self.controller.state() == PlaybackState::PlayingSynth {
            self.controller.stop();
            self.status = "stopped".to_owned();
        } else {
            let tuning = self.result.tuning_name().to_owned();
            self.controller
                .start_synth(&self.result, &tuning, self.metronome);
            self.status = "playing".to_owned();
        }
    }

    fn toggle_original(&mut self) {
        if self.controller.state() == PlaybackState::PlayingOriginal {
            self.controller.stop();
            self.status = "stopped".to_owned();
            return;
        }

        match self.controller.start_original() {
            Ok(()) => self.status = "playing original".to_owned(),
            Err(err) => self.status = err.to_string(),
        }
    }

    pub fn result(&self) -> &TranscriptionResult {
        &self.result
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn metronome(&self) -> bool {
        self.metronome
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}
