use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::MolpropError;
use crate::stats::RunCounters;
use crate::style::{BLUE, YELLOW, paint};

/// Cancellation flag raised by Ctrl-C and polled by the run loop at safe points.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT to this signal. Can only be installed once per process.
    pub fn install(&self) -> Result<(), MolpropError> {
        let flag = self.flag.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .map_err(|err| MolpropError::InterruptHandler(err.to_string()))
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns whether an interrupt is pending and clears it.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

/// Asks whether a pending interrupt should end the run.
pub trait AbortPrompt {
    fn confirm_quit(&mut self, counters: RunCounters) -> Result<bool, MolpropError>;
}

/// Every interrupt quits. Used when nobody is around to answer.
pub struct QuitImmediately;

impl AbortPrompt for QuitImmediately {
    fn confirm_quit(&mut self, _counters: RunCounters) -> Result<bool, MolpropError> {
        Ok(true)
    }
}

/// Single-keystroke prompt on the controlling terminal: `q` quits, anything else resumes.
pub struct TerminalAbortPrompt {
    color: bool,
}

impl TerminalAbortPrompt {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl AbortPrompt for TerminalAbortPrompt {
    fn confirm_quit(&mut self, counters: RunCounters) -> Result<bool, MolpropError> {
        let message = format!(
            "\nCtrl-C was pressed ({} processed, {} errors so far). Type \"q\" to quit or press any other key to continue: ",
            counters.processed, counters.errors
        );
        let mut stdout = io::stdout();
        write!(stdout, "{}", paint(self.color, YELLOW, &message))
            .and_then(|_| stdout.flush())
            .map_err(|err| MolpropError::Terminal(err.to_string()))?;

        let quit = read_key()?.is_some_and(|ch| ch.eq_ignore_ascii_case(&'q'));
        if !quit {
            writeln!(stdout, "\n{}\n", paint(self.color, BLUE, "Resuming process..."))
                .map_err(|err| MolpropError::Terminal(err.to_string()))?;
        }
        Ok(quit)
    }
}

fn read_key() -> Result<Option<char>, MolpropError> {
    if enable_raw_mode().is_err() {
        return read_line_key();
    }
    let key = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                break Ok(match key.code {
                    KeyCode::Char(ch) => Some(ch),
                    _ => None,
                });
            }
            Ok(_) => continue,
            Err(err) => break Err(MolpropError::Terminal(err.to_string())),
        }
    };
    disable_raw_mode().map_err(|err| MolpropError::Terminal(err.to_string()))?;
    key
}

fn read_line_key() -> Result<Option<char>, MolpropError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| MolpropError::Terminal(err.to_string()))?;
    Ok(line.trim().chars().next())
}
