//! Keyboard input processing

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::DashboardState;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    SimulateError,
    Reset,
    RefreshExports,
    Quit,
    None,
}

/// Map a key event to an action. Run is phase-aware: it only re-enters
/// when no timeline is currently executing.
pub fn handle_key_event(key: KeyEvent, state: &DashboardState) -> Action {
    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Char('q')) => Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Action::Quit,

        (KeyModifiers::NONE, KeyCode::Char('r')) => {
            if state.phase.is_executing() {
                Action::None
            } else {
                Action::Run
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => Action::SimulateError,
        (KeyModifiers::NONE, KeyCode::Char('x')) => Action::Reset,
        (KeyModifiers::NONE, KeyCode::Char('g')) => Action::RefreshExports,

        _ => Action::None,
    }
}

/// Poll the terminal for one key press, waiting at most `timeout`.
pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Phase;
    use crate::types::TemplateId;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn state() -> DashboardState {
        DashboardState::new(TemplateId::new("alpha_diversity").unwrap())
    }

    #[test]
    fn quit_keys() {
        let s = state();
        assert_eq!(handle_key_event(key('q'), &s), Action::Quit);
        assert_eq!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &s
            ),
            Action::Quit
        );
    }

    #[test]
    fn run_blocked_while_executing() {
        let mut s = state();
        assert_eq!(handle_key_event(key('r'), &s), Action::Run);

        s.phase = Phase::Processing;
        assert_eq!(handle_key_event(key('r'), &s), Action::None);

        // Terminal phases allow a re-run.
        s.phase = Phase::Error;
        assert_eq!(handle_key_event(key('r'), &s), Action::Run);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let s = state();
        assert_eq!(handle_key_event(key('z'), &s), Action::None);
    }
}
