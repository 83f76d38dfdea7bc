use super::app::{Action, DashboardApp};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// Whether `event` is one of the quit keys: `q`, `Esc` or Ctrl-C
pub fn is_quit_event(event: &Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q') | KeyCode::Esc => true,
            _ => false,
        },
        _ => false,
    }
}

/// Handle a crossterm event.
///
/// Navigation and quitting are applied to `app` directly. Keys that need the
/// backend are returned as an `Action` for the caller to run. While another
/// action is in flight only the quit keys have an effect.
pub fn handle_event(app: &mut DashboardApp, event: &Event) -> Option<Action> {
    if is_quit_event(event) {
        app.should_quit = true;
        return None;
    }
    if app.busy.is_some() {
        return None;
    }
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') => Some(Action::CreateTask),
            KeyCode::Char('s') => Some(Action::CheckStatus),
            KeyCode::Char('r') => Some(Action::ReloadMetadata),
            KeyCode::Char('j') | KeyCode::Down => {
                app.select_next_metadata();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.select_previous_metadata();
                None
            }
            _ => None,
        },
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollDown => app.select_next_metadata(),
                MouseEventKind::ScrollUp => app.select_previous_metadata(),
                _ => {}
            }
            None
        }
        _ => None,
    }
}
