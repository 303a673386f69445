//! Unified event stream feeding the dashboard loop

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt;
use tokio::sync::mpsc;

use crate::integrations::clock::Reading;

/// Everything that can change the dashboard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key the user pressed.
    Key(Key),
    /// A full replacement list of tab labels.
    FeedBatch(Vec<String>),
    /// A fresh clock reading.
    ClockTick(Reading),
}

/// Key identifiers the dashboard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Esc,
    CtrlC,
    Char(char),
    Other,
}

impl Key {
    /// Map a crossterm key event. Release and repeat events yield `None`.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let key = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Self::CtrlC,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Esc => Self::Esc,
            KeyCode::Char(c) if event.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                Self::Char(c)
            }
            _ => Self::Other,
        };
        Some(key)
    }

    pub fn is_quit(self) -> bool {
        matches!(self, Self::Char('q') | Self::Esc | Self::CtrlC)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Esc => write!(f, "esc"),
            Self::CtrlC => write!(f, "ctrl+c"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Single consumer end of the event stream. Every producer (keyboard,
/// command tasks) holds a clone of the sender.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Forward terminal key presses until the stream ends or the loop goes away.
    pub fn spawn_keyboard(tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(Self::keyboard_events(tx))
    }

    async fn keyboard_events(tx: mpsc::UnboundedSender<Event>) {
        use crossterm::event::{Event as CrosstermEvent, EventStream};
        use futures::StreamExt;

        let mut reader = EventStream::new();
        while let Some(event_result) = reader.next().await {
            let key = match event_result {
                Ok(CrosstermEvent::Key(event)) => Key::from_key_event(&event),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal input stream failed");
                    break;
                }
            };
            let Some(key) = key else { continue };
            if tx.send(Event::Key(key)).is_err() {
                break;
            }
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
