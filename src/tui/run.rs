use crate::task::FilterParams;
use crate::tui::app::{Action, DashboardApp};
use crate::tui::input::{handle_event, is_quit_event};
use crate::tui::ui::render;
use crate::workflow::TaskWorkflow;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;
use tokio::sync::mpsc::UnboundedReceiver;

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Guard that restores terminal state on drop, ensuring cleanup even on panic.
struct TerminalGuard {
    terminal: DashboardTerminal,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard event loop.
///
/// Loads metadata once at startup, then waits for key presses. At most one
/// request is in flight and the view state has a single writer: input that
/// arrives while an action runs is discarded, except for the quit keys,
/// which abandon the request. Returns when the user quits or the input
/// thread stops.
pub async fn run_dashboard(
    workflow: TaskWorkflow,
    filter: FilterParams,
    backend: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut guard = TerminalGuard { terminal };
    let mut app = DashboardApp::new(filter, backend);

    // Crossterm event polling in a dedicated thread
    let (input_tx, mut input_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            // Poll with 50ms timeout so the thread notices a closed channel
            if crossterm::event::poll(std::time::Duration::from_millis(50)).unwrap_or(false)
                && let Ok(event) = crossterm::event::read()
                && input_tx.send(event).is_err()
            {
                break;
            }
            if input_tx.is_closed() {
                break;
            }
        }
    });

    run_action(
        &mut guard.terminal,
        &mut app,
        &workflow,
        Action::ReloadMetadata,
        &mut input_rx,
    )
    .await?;

    loop {
        guard.terminal.draw(|frame| render(&mut app, frame))?;

        if app.should_quit {
            break;
        }

        let Some(event) = input_rx.recv().await else {
            break;
        };
        if let Some(action) = handle_event(&mut app, &event) {
            run_action(&mut guard.terminal, &mut app, &workflow, action, &mut input_rx).await?;
        }
    }

    // Guard's Drop handles terminal cleanup
    Ok(())
}

/// Show the busy marker, run the action, then clear the marker
async fn run_action(
    terminal: &mut DashboardTerminal,
    app: &mut DashboardApp,
    workflow: &TaskWorkflow,
    action: Action,
    input_rx: &mut UnboundedReceiver<Event>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    app.busy = Some(action);
    terminal.draw(|frame| render(app, frame))?;
    let quit = await_discarding_input(app.perform(workflow, action), input_rx).await;
    app.busy = None;
    if quit {
        app.should_quit = true;
    }
    Ok(())
}

/// Drive `work` to completion while draining `input_rx`.
///
/// Events that arrive meanwhile are dropped, including any still queued when
/// `work` finishes. Returns true if a quit key arrived or the input channel
/// closed; `work` is dropped unfinished in that case.
async fn await_discarding_input<F>(work: F, input_rx: &mut UnboundedReceiver<Event>) -> bool
where
    F: Future<Output = ()>,
{
    tokio::pin!(work);
    loop {
        tokio::select! {
            () = &mut work => break,
            event = input_rx.recv() => match event {
                Some(event) if is_quit_event(&event) => return true,
                Some(_) => {}
                None => return true,
            },
        }
    }

    let mut quit = false;
    while let Ok(event) = input_rx.try_recv() {
        quit |= is_quit_event(&event);
    }
    quit
}
