use std::io::{self, Read as _, Write as _};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
    tty::IsTty,
};

/// Host console capability.
///
/// The memory-mapped keyboard registers and the trap routines interact with
/// the host exclusively through these three operations, so the runtime can be
/// driven by a scripted console in tests.
pub trait Console {
    /// Non-blocking check for a waiting key.
    fn poll_ready(&mut self) -> bool;
    /// Blocking read of a single byte.
    fn read_byte(&mut self) -> u8;
    /// Write a single byte to the host output and flush.
    fn write_byte(&mut self, byte: u8);
}

/// Console backed by the host terminal.
///
/// When stdin is a terminal, keys are taken from raw-mode events. When stdin
/// is piped, bytes are read from it directly so images can be driven from
/// files and pipelines.
pub struct TermConsole {
    interactive: bool,
    pending: Option<u8>,
}

pub fn enable_raw_mode() {
    if !io::stdin().is_tty() {
        return;
    }
    debug_assert!(
        !terminal::is_raw_mode_enabled().is_ok_and(|is| is),
        "terminal should not be in raw mode at this point",
    );
    terminal::enable_raw_mode().expect("failed to enable raw terminal");
}

pub fn disable_raw_mode() {
    if !io::stdin().is_tty() {
        return;
    }
    debug_assert!(
        terminal::is_raw_mode_enabled().is_ok_and(|is| is),
        "terminal should be in raw mode at this point",
    );
    terminal::disable_raw_mode().expect("failed to disable raw terminal");
}

impl TermConsole {
    pub fn new() -> Self {
        TermConsole {
            interactive: io::stdin().is_tty(),
            pending: None,
        }
    }

    /// Read terminal events until one translates to a key byte.
    ///
    /// Caller must ensure terminal is in raw mode.
    fn read_key() -> u8 {
        loop {
            let event = event::read().expect("failed to read terminal event");
            if let Some(byte) = key_byte(event) {
                break byte;
            }
        }
    }

    /// A read at end-of-file yields NUL.
    fn read_stdin() -> u8 {
        let mut buffer = [0u8; 1];
        match io::stdin().read(&mut buffer) {
            Ok(1) => buffer[0],
            _ => b'\0',
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn poll_ready(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        if self.interactive {
            while event::poll(Duration::ZERO).expect("failed to poll terminal") {
                let event = event::read().expect("failed to read terminal event");
                if let Some(byte) = key_byte(event) {
                    self.pending = Some(byte);
                    return true;
                }
            }
            false
        } else {
            // A pipe cannot be polled without consuming, so a status check
            // waits for the next byte and holds onto it. End-of-file reads
            // as "no key".
            let mut buffer = [0u8; 1];
            match io::stdin().read(&mut buffer) {
                Ok(1) => {
                    self.pending = Some(buffer[0]);
                    true
                }
                _ => false,
            }
        }
    }

    fn read_byte(&mut self) -> u8 {
        if let Some(byte) = self.pending.take() {
            return byte;
        }
        if self.interactive {
            Self::read_key()
        } else {
            Self::read_stdin()
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut stdout = io::stdout();
        // Raw mode disables output post-processing, so line feeds need an
        // explicit carriage return to land in column one
        if byte == b'\n' && self.interactive {
            stdout.write_all(b"\r\n").expect("failed to write to stdout");
        } else {
            stdout.write_all(&[byte]).expect("failed to write to stdout");
        }
        stdout.flush().expect("failed to flush stdout");
    }
}

/// Translate a terminal event to the byte a program receives.
///
/// Release events and keys with no byte representation are discarded.
fn key_byte(event: Event) -> Option<u8> {
    let Event::Key(event) = event else {
        return None;
    };
    key_event_byte(event)
}

fn key_event_byte(event: KeyEvent) -> Option<u8> {
    if matches!(event.kind, KeyEventKind::Release) {
        return None;
    }

    match (event.modifiers, event.code) {
        // Ctrl+C restores the terminal and aborts
        (m, KeyCode::Char('c')) if m == KeyModifiers::CONTROL => {
            disable_raw_mode();
            println!();
            std::process::exit(-2);
        }

        (_, KeyCode::Enter) | (_, KeyCode::Char('\n')) => Some(b'\n'),
        (_, KeyCode::Backspace) => Some(0x08),
        (_, KeyCode::Tab) => Some(b'\t'),
        (_, KeyCode::Esc) => Some(0x1B),

        // Normal character, ASCII only
        (m, KeyCode::Char(ch)) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
            u8::try_from(ch).ok()
        }

        _ => None,
    }
}
