//! Dashboard view state and its pure transition function.
//!
//! Nothing in here performs I/O. The loop in `app` feeds events in and
//! carries out the returned commands.

use std::time::Duration;

use crate::core::events::{Event, Key};
use crate::integrations::clock::Reading;

/// Delay between clock readings unless configured otherwise.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Work a transition asks the loop to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Wait for the next feed batch, then emit `Event::FeedBatch` once.
    AwaitNextFeedBatch,
    /// Sleep, take a clock reading, then emit `Event::ClockTick` once.
    ScheduleTickAfter(Duration),
    /// Stop the loop.
    Quit,
}

/// The authoritative view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    tabs: Vec<String>,
    selected: usize,
    reading: Option<Reading>,
    tick_interval: Duration,
}

impl DashboardState {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tabs: Vec::new(),
            selected: 0,
            reading: None,
            tick_interval,
        }
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    /// Index of the highlighted tab. Always 0 when there are no tabs.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tabs.len().saturating_sub(1));
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

/// Startup state plus the two self-re-arming commands.
pub fn init(tick_interval: Duration) -> (DashboardState, Vec<Command>) {
    (
        DashboardState::new(tick_interval),
        vec![
            Command::AwaitNextFeedBatch,
            Command::ScheduleTickAfter(tick_interval),
        ],
    )
}

/// Apply one event. Navigation clamps at both ends, it never wraps.
pub fn transition(mut state: DashboardState, event: Event) -> (DashboardState, Vec<Command>) {
    match event {
        Event::Key(key) if key.is_quit() => (state, vec![Command::Quit]),
        Event::Key(Key::Right) => {
            if state.selected + 1 < state.tabs.len() {
                state.selected += 1;
            }
            (state, Vec::new())
        }
        Event::Key(Key::Left) => {
            state.selected = state.selected.saturating_sub(1);
            (state, Vec::new())
        }
        Event::Key(_) => (state, Vec::new()),
        Event::FeedBatch(labels) => {
            state.tabs = labels;
            state.clamp_selection();
            (state, vec![Command::AwaitNextFeedBatch])
        }
        Event::ClockTick(reading) => {
            state.reading = Some(reading);
            let next = Command::ScheduleTickAfter(state.tick_interval);
            (state, vec![next])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn apply(state: DashboardState, events: impl IntoIterator<Item = Event>) -> DashboardState {
        events
            .into_iter()
            .fold(state, |s, e| transition(s, e).0)
    }

    #[test]
    fn init_issues_feed_and_tick_commands() {
        let (state, commands) = init(DEFAULT_TICK_INTERVAL);

        assert!(state.tabs().is_empty());
        assert_eq!(state.selected_index(), 0);
        assert!(state.reading().is_none());
        assert_eq!(
            commands,
            vec![
                Command::AwaitNextFeedBatch,
                Command::ScheduleTickAfter(Duration::from_secs(1))
            ]
        );
    }

    #[test]
    fn right_and_left_clamp_without_wrapping() {
        let state = apply(
            DashboardState::default(),
            [Event::FeedBatch(labels(&["a", "b", "c"]))],
        );

        let state = apply(state, std::iter::repeat(Event::Key(Key::Right)).take(5));
        assert_eq!(state.selected_index(), 2);

        let state = apply(state, std::iter::repeat(Event::Key(Key::Left)).take(5));
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn navigation_with_no_tabs_stays_at_zero() {
        let state = apply(
            DashboardState::default(),
            [Event::Key(Key::Right), Event::Key(Key::Left)],
        );
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn shrinking_batch_clamps_selection() {
        let state = apply(
            DashboardState::default(),
            [
                Event::FeedBatch(labels(&["a", "b", "c"])),
                Event::Key(Key::Right),
                Event::Key(Key::Right),
            ],
        );
        assert_eq!(state.selected_index(), 2);

        let (state, commands) = transition(state, Event::FeedBatch(labels(&["x", "y"])));
        assert_eq!(state.tabs(), labels(&["x", "y"]).as_slice());
        assert_eq!(state.selected_index(), 1);
        assert_eq!(commands, vec![Command::AwaitNextFeedBatch]);
    }

    #[test]
    fn empty_batch_resets_selection() {
        let state = apply(
            DashboardState::default(),
            [
                Event::FeedBatch(labels(&["a", "b"])),
                Event::Key(Key::Right),
                Event::FeedBatch(Vec::new()),
            ],
        );
        assert!(state.tabs().is_empty());
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn growing_batch_keeps_selection() {
        let state = apply(
            DashboardState::default(),
            [
                Event::FeedBatch(labels(&["a", "b"])),
                Event::Key(Key::Right),
                Event::FeedBatch(labels(&["x", "y", "z"])),
            ],
        );
        assert_eq!(state.selected_index(), 1);
    }

    #[test]
    fn each_tick_rearms_exactly_once() {
        let interval = Duration::from_millis(250);
        let (mut state, initial) = init(interval);
        let mut issued = initial
            .iter()
            .filter(|c| matches!(c, Command::ScheduleTickAfter(_)))
            .count();

        for n in 0..10 {
            let reading = Reading::new(format!("00:00:{n:02}"), "00:00:00");
            let (next, commands) = transition(state, Event::ClockTick(reading.clone()));
            assert_eq!(commands, vec![Command::ScheduleTickAfter(interval)]);
            assert_eq!(next.reading(), Some(&reading));
            issued += commands.len();
            state = next;
        }

        assert_eq!(issued, 11);
    }

    #[test]
    fn quit_keys_leave_state_untouched() {
        let state = apply(
            DashboardState::default(),
            [
                Event::FeedBatch(labels(&["a", "b"])),
                Event::Key(Key::Right),
            ],
        );

        for key in [Key::Char('q'), Key::Esc, Key::CtrlC] {
            let (next, commands) = transition(state.clone(), Event::Key(key));
            assert_eq!(commands, vec![Command::Quit]);
            assert_eq!(next, state);
        }
    }

    #[test]
    fn other_keys_are_ignored() {
        let state = apply(
            DashboardState::default(),
            [Event::FeedBatch(labels(&["a", "b"]))],
        );
        for key in [Key::Other, Key::Char('x'), Key::Char('Q')] {
            let (next, commands) = transition(state.clone(), Event::Key(key));
            assert!(commands.is_empty());
            assert_eq!(next, state);
        }
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::Key(Key::Left)),
            Just(Event::Key(Key::Right)),
            Just(Event::Key(Key::Other)),
            prop::collection::vec("[a-z]{1,6}", 0..6).prop_map(Event::FeedBatch),
            "[0-9:]{8}".prop_map(|t| Event::ClockTick(Reading::new(t, "00:00:00"))),
        ]
    }

    proptest! {
        #[test]
        fn selection_stays_in_bounds(events in prop::collection::vec(arb_event(), 0..64)) {
            let mut state = DashboardState::default();
            for event in events {
                state = transition(state, event).0;
                prop_assert!(state.selected_index() < state.tabs().len().max(1));
            }
        }
    }
}
