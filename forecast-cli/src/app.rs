//! Interactive terminal screen.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};
use forecast_core::ScreenController;
use futures::StreamExt;

use crate::render::{InputView, render_screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Restores the terminal even when the loop exits with an error.
struct RawTerminal {
    out: Stdout,
}

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to prepare terminal")?;
        Ok(Self { out })
    }

    fn draw(&mut self, lines: &[String]) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for line in lines {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub async fn run(mut screen: ScreenController) -> Result<()> {
    let mut term = RawTerminal::enter()?;
    let mut keys = EventStream::new();
    let mut input = InputView::default();

    screen.mount();

    loop {
        term.draw(&render_screen(screen.state(), &input))?;

        tokio::select! {
            maybe_event = keys.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                    if handle_key(&mut screen, &mut input, key) == Flow::Quit {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("Failed to read terminal input"),
                None => break,
            },
            _ = screen.step(), if !screen.is_idle() => {
                clamp_highlight(&screen, &mut input);
            }
        }
    }

    Ok(())
}

fn handle_key(screen: &mut ScreenController, input: &mut InputView, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    let state = screen.state();

    if state.is_loading() {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('r') => {
                screen.retry();
            }
            _ => {}
        }
        return Flow::Continue;
    }

    if !state.search_open() {
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('/') | KeyCode::Char('s') => {
                *input = InputView::default();
                screen.toggle_search();
            }
            _ => {}
        }
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            *input = InputView::default();
            screen.toggle_search();
        }
        KeyCode::Up => input.highlighted = input.highlighted.saturating_sub(1),
        KeyCode::Down => {
            let last = screen.state().visible_candidates().len().saturating_sub(1);
            input.highlighted = (input.highlighted + 1).min(last);
        }
        KeyCode::Enter => {
            if screen.select_candidate(input.highlighted) {
                *input = InputView::default();
            }
        }
        KeyCode::Backspace => {
            input.query.pop();
            screen.input_changed(input.query.clone());
        }
        KeyCode::Char(c) => {
            input.query.push(c);
            screen.input_changed(input.query.clone());
        }
        _ => {}
    }

    Flow::Continue
}

fn clamp_highlight(screen: &ScreenController, input: &mut InputView) {
    let count = screen.state().visible_candidates().len();
    if input.highlighted >= count {
        input.highlighted = count.saturating_sub(1);
    }
}
