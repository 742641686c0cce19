//! Interactive terminal prompter.
//!
//! Raw-mode line input via crossterm (editing, arrow-key history, Ctrl+C),
//! one interpreter turn per submitted line, and region-tagged printing of the
//! resulting display intents. Typed intents render progressively unless
//! animation is disabled; the delay is cosmetic and nothing waits on it.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::api::AuthorSearchApi;
use crate::display::{DisplayIntent, DisplayRouter, IntentKind, Region};
use crate::interpreter::Interpreter;
use crate::session::SessionMode;

use super::history::InputHistory;

const MAX_HISTORY: usize = 200;
const TYPE_DELAY_MS: u64 = 6;

/// Line under edit. The cursor is a char position, not a byte offset, so
/// insertion and deletion always land on char boundaries.
struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
        }
    }

    fn text(&self) -> &str {
        &self.buffer
    }

    fn into_text(self) -> String {
        self.buffer
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Chars between the cursor and the end of the line.
    fn tail_len(&self) -> usize {
        self.char_count() - self.cursor
    }

    fn at_end(&self) -> bool {
        self.cursor == self.char_count()
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(offset, _)| offset)
            .unwrap_or(self.buffer.len())
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.buffer.remove(at);
        self.cursor -= 1;
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Replace the whole line (history recall); cursor goes to the end.
    fn set_text(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.buffer = text;
    }
}

/// The interactive front-end: input loop + intent printing.
pub struct Prompter<G> {
    interpreter: Interpreter<G>,
    router: DisplayRouter,
    history: InputHistory,
    animate: bool,
    should_exit: bool,
}

impl<G: AuthorSearchApi> Prompter<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            interpreter: Interpreter::new(gateway),
            router: DisplayRouter::new(),
            history: InputHistory::new(MAX_HISTORY),
            animate: true,
            should_exit: false,
        }
    }

    /// Disable the typed-output animation (pipes, tests).
    pub fn without_animation(mut self) -> Self {
        self.animate = false;
        self
    }

    fn prompt_label(&self) -> &'static str {
        match self.interpreter.mode() {
            SessionMode::Idle => "search> ",
            SessionMode::AwaitingAuthorSelection => "select> ",
            SessionMode::WorksMode => "works> ",
        }
    }

    fn show_welcome(&self) {
        println!("scholar-term: author search terminal");
        println!("Type an author name to begin, 'help' for commands, Ctrl+C to leave.");
        println!();
    }

    /// Run the session until `quit` or Ctrl+C.
    pub async fn run(&mut self) -> io::Result<()> {
        self.show_welcome();

        while !self.should_exit {
            let line = match self.read_line()? {
                Some(line) => line,
                None => break, // Ctrl+C
            };

            if !line.trim().is_empty() {
                self.history.push(&line);
                // Mirror the submitted line into the terminal log.
                self.router.route(&DisplayIntent::echo(line.trim()));
            }

            let turn = self.interpreter.handle_line(&line).await;
            for intent in &turn.intents {
                self.router.route(intent);
                self.print_intent(intent).await?;
            }
            if turn.exit_requested {
                self.should_exit = true;
            }
        }
        Ok(())
    }

    /// Read one line in raw mode with editing and history recall.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let prompt = self.prompt_label();
        print!("{}", prompt);
        io::stdout().flush()?;

        enable_raw_mode().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let result = self.read_line_raw(prompt);
        let _ = disable_raw_mode();
        println!();
        result
    }

    fn read_line_raw(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut editor = LineEditor::new();

        loop {
            if !event::poll(Duration::from_millis(100))
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
            {
                continue;
            }
            let Event::Key(key_event) =
                event::read().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
            else {
                continue;
            };

            match key_event {
                KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    ..
                } => return Ok(None),

                KeyEvent {
                    code: KeyCode::Enter,
                    ..
                } => return Ok(Some(editor.into_text())),

                KeyEvent {
                    code: KeyCode::Backspace,
                    ..
                } => {
                    if editor.backspace() {
                        self.redraw(prompt, &editor)?;
                    }
                }

                KeyEvent {
                    code: KeyCode::Left,
                    ..
                } => {
                    if editor.move_left() {
                        print!("\x1B[D");
                        io::stdout().flush()?;
                    }
                }

                KeyEvent {
                    code: KeyCode::Right,
                    ..
                } => {
                    if editor.move_right() {
                        print!("\x1B[C");
                        io::stdout().flush()?;
                    }
                }

                KeyEvent {
                    code: KeyCode::Up, ..
                } => {
                    if let Some(recalled) = self.history.previous(editor.text()) {
                        editor.set_text(recalled);
                        self.redraw(prompt, &editor)?;
                    }
                }

                KeyEvent {
                    code: KeyCode::Down,
                    ..
                } => {
                    if let Some(recalled) = self.history.next() {
                        editor.set_text(recalled);
                        self.redraw(prompt, &editor)?;
                    }
                }

                KeyEvent {
                    code: KeyCode::Char(c),
                    modifiers,
                    ..
                } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                    editor.insert(c);
                    if editor.at_end() {
                        print!("{}", c);
                        io::stdout().flush()?;
                    } else {
                        self.redraw(prompt, &editor)?;
                    }
                }

                _ => {}
            }
        }
    }

    /// Redraw the input line with the cursor at the editor's position.
    fn redraw(&self, prompt: &str, editor: &LineEditor) -> io::Result<()> {
        print!("\r{}\x1B[K{}", prompt, editor.text());
        let tail = editor.tail_len();
        if tail > 0 {
            print!("\x1B[{}D", tail);
        }
        io::stdout().flush()
    }

    /// Print one routed intent, honoring the typed flag.
    async fn print_intent(&self, intent: &DisplayIntent) -> io::Result<()> {
        if intent.kind == IntentKind::Clear {
            if intent.region != Region::Terminal {
                println!("[{}] (cleared)", intent.region);
            }
            return Ok(());
        }

        for line in intent.content.lines() {
            let rendered = match intent.region {
                Region::Terminal => format!("{} {}", intent.style.prefix(), line),
                region => format!("[{}] {}", region, line),
            };
            if intent.typed && self.animate {
                for c in rendered.chars() {
                    print!("{}", c);
                    io::stdout().flush()?;
                    tokio::time::sleep(Duration::from_millis(TYPE_DELAY_MS)).await;
                }
                println!();
            } else {
                println!("{}", rendered);
            }
        }
        Ok(())
    }

    pub fn router(&self) -> &DisplayRouter {
        &self.router
    }
}
