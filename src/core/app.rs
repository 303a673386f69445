//! Main application loop: owns the state, runs commands, redraws.

use anyhow::Result;
use chrono::Utc;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::core::events::{Event, EventHandler};
use crate::core::state::{init, transition, Command, DashboardState};
use crate::integrations::clock::{ClockSource, Coordinates};
use crate::integrations::feed::FeedSource;
use crate::ui::renderer::Renderer;
use crate::ui::theme::Theme;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

/// Runs commands as independent tasks that report back through the event
/// stream. Tasks never see the state.
pub struct CommandRunner {
    event_tx: mpsc::UnboundedSender<Event>,
    clock: Arc<dyn ClockSource>,
    coords: Coordinates,
    feed: Arc<Mutex<Box<dyn FeedSource>>>,
    tasks: JoinSet<()>,
}

impl CommandRunner {
    pub fn new(
        event_tx: mpsc::UnboundedSender<Event>,
        clock: Arc<dyn ClockSource>,
        coords: Coordinates,
        feed: Box<dyn FeedSource>,
    ) -> Self {
        Self {
            event_tx,
            clock,
            coords,
            feed: Arc::new(Mutex::new(feed)),
            tasks: JoinSet::new(),
        }
    }

    /// Start the task for `command`. Returns immediately.
    pub fn spawn(&mut self, command: Command) {
        // Reap finished tasks so the set only tracks outstanding work.
        while self.tasks.try_join_next().is_some() {}

        tracing::debug!(?command, outstanding = self.tasks.len(), "spawning command");
        match command {
            Command::AwaitNextFeedBatch => {
                let feed = Arc::clone(&self.feed);
                let tx = self.event_tx.clone();
                self.tasks.spawn(async move {
                    let batch = feed.lock().await.next_batch().await;
                    match batch {
                        Some(labels) => {
                            tracing::debug!(labels = labels.len(), "feed batch received");
                            let _ = tx.send(Event::FeedBatch(labels));
                        }
                        None => tracing::info!("feed closed, keeping last tabs"),
                    }
                });
            }
            Command::ScheduleTickAfter(delay) => {
                let clock = Arc::clone(&self.clock);
                let coords = self.coords;
                let tx = self.event_tx.clone();
                self.tasks.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let reading = clock.reading(coords, Utc::now());
                    let _ = tx.send(Event::ClockTick(reading));
                });
            }
            // The loop acts on this itself.
            Command::Quit => {}
        }
    }

    /// Number of commands still running.
    pub fn outstanding(&mut self) -> usize {
        while self.tasks.try_join_next().is_some() {}
        self.tasks.len()
    }

    /// Abort whatever is still running. A task blocked on the feed is simply
    /// dropped at its next poll.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }
}

/// Raw mode plus alternate screen for as long as this value lives.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        )?;
        let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, renderer: &Renderer, state: &DashboardState) -> Result<()> {
        self.terminal.draw(|frame| renderer.draw(frame, state))?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

fn restore_terminal() -> std::io::Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show,
    )?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

pub struct App {
    state: DashboardState,
    renderer: Renderer,
    events: EventHandler,
    runner: CommandRunner,
    /// Commands returned by `init`, started when the loop begins.
    startup: Vec<Command>,
}

impl App {
    pub fn new(config: &Config, clock: Arc<dyn ClockSource>, feed: Box<dyn FeedSource>) -> Self {
        let events = EventHandler::new();
        let runner = CommandRunner::new(
            events.sender(),
            clock,
            config.location.coordinates(),
            feed,
        );
        let theme = Theme::from_name(&config.display.theme);
        tracing::debug!(theme = %theme.name, "theme selected");
        let renderer = Renderer::new(theme, config.display.status_label.clone());
        let (state, startup) = init(config.clock.tick_interval());

        Self {
            state,
            renderer,
            events,
            runner,
            startup,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut session = TerminalSession::enter()?;
        let keyboard = EventHandler::spawn_keyboard(self.events.sender());

        let startup = std::mem::take(&mut self.startup);
        self.dispatch(startup);
        session.draw(&self.renderer, &self.state)?;

        let result = self.event_loop(&mut session).await;

        // Cleanup
        tracing::info!(outstanding = self.runner.outstanding(), "shutting down");
        self.runner.shutdown();
        keyboard.abort();
        drop(session);
        result
    }

    async fn event_loop(&mut self, session: &mut TerminalSession) -> Result<()> {
        while let Some(event) = self.events.next().await {
            match self.handle_event(event) {
                EventResult::Continue => session.draw(&self.renderer, &self.state)?,
                EventResult::Quit => break,
            }
        }
        Ok(())
    }

    /// One transition: replace the state, start the returned commands.
    fn handle_event(&mut self, event: Event) -> EventResult {
        if let Event::Key(key) = &event {
            tracing::trace!(%key, "key pressed");
        }
        let state = std::mem::take(&mut self.state);
        let (next, commands) = transition(state, event);
        self.state = next;
        self.dispatch(commands)
    }

    fn dispatch(&mut self, commands: Vec<Command>) -> EventResult {
        let mut result = EventResult::Continue;
        for command in commands {
            if command == Command::Quit {
                tracing::info!("quit requested");
                result = EventResult::Quit;
            } else {
                self.runner.spawn(command);
            }
        }
        result
    }
}

/// Render a single frame without taking over the terminal: one clock
/// reading, then the first feed batch if it arrives within `wait`.
pub async fn snapshot(
    config: &Config,
    clock: &dyn ClockSource,
    mut feed: Box<dyn FeedSource>,
    wait: Duration,
) -> String {
    let renderer = Renderer::new(
        Theme::from_name(&config.display.theme),
        config.display.status_label.clone(),
    );
    let (state, _) = init(config.clock.tick_interval());

    let reading = clock.reading(config.location.coordinates(), Utc::now());
    let (mut state, _) = transition(state, Event::ClockTick(reading));

    match tokio::time::timeout(wait, feed.next_batch()).await {
        Ok(Some(labels)) => state = transition(state, Event::FeedBatch(labels)).0,
        Ok(None) => tracing::info!("feed closed before the first batch"),
        Err(_) => tracing::info!(?wait, "no feed batch before timeout"),
    }

    renderer.render_to_string(&state)
}
