//! The timer list controller.
//!
//! Timers are stored by id. Ids come from a counter that only moves forward,
//! so the map's key order is also insertion order. Every mutation touches only
//! the affected record and publishes a [`Change`] to all subscribers.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use super::timer::{Timer, TimerId};

pub const DEFAULT_COLOR: &str = "#f5fcff";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(TimerId),
    Updated(TimerId),
    Removed(TimerId),
}

#[derive(Debug)]
pub struct TimerList {
    timers: BTreeMap<TimerId, Timer>,
    next_id: u32,
    default_color: String,
    color_input: String,
    subscribers: Vec<Sender<Change>>,
}

impl Default for TimerList {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR)
    }
}

impl TimerList {
    pub fn new(default_color: impl Into<String>) -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
            default_color: default_color.into(),
            color_input: String::new(),
            subscribers: Vec::new(),
        }
    }

    /// Returns a receiver that gets every change from now on.
    pub fn subscribe(&mut self) -> Receiver<Change> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, change: Change) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    pub fn add(&mut self, color_input: &str) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let color = if color_input.is_empty() {
            self.default_color.clone()
        } else {
            color_input.to_owned()
        };

        tracing::debug!(%id, %color, "timer added");
        self.timers.insert(id, Timer::new(id, color));
        self.publish(Change::Added(id));
        id
    }

    /// Adds a timer with the pending color input and clears the input.
    pub fn submit(&mut self) -> TimerId {
        let input = std::mem::take(&mut self.color_input);
        self.add(&input)
    }

    pub fn color_input(&self) -> &str {
        &self.color_input
    }

    pub fn push_input(&mut self, c: char) {
        self.color_input.push(c);
    }

    pub fn pop_input(&mut self) {
        let _ = self.color_input.pop();
    }

    pub fn toggle(&mut self, id: TimerId) -> bool {
        let Some(timer) = self.timers.get_mut(&id) else {
            tracing::debug!(%id, "toggle ignored, no such timer");
            return false;
        };
        timer.running = !timer.running;
        tracing::debug!(%id, running = timer.running, "timer toggled");
        self.publish(Change::Updated(id));
        true
    }

    pub fn reset(&mut self, id: TimerId) -> bool {
        let Some(timer) = self.timers.get_mut(&id) else {
            tracing::debug!(%id, "reset ignored, no such timer");
            return false;
        };
        timer.elapsed = 0;
        timer.running = false;
        tracing::debug!(%id, "timer reset");
        self.publish(Change::Updated(id));
        true
    }

    pub fn delete(&mut self, id: TimerId) -> Option<Timer> {
        let removed = self.timers.remove(&id);
        match removed {
            Some(_) => {
                tracing::debug!(%id, "timer deleted");
                self.publish(Change::Removed(id));
            }
            None => tracing::debug!(%id, "delete ignored, no such timer"),
        }
        removed
    }

    /// Advances every running timer by one second.
    pub fn tick(&mut self) -> usize {
        let advanced: Vec<TimerId> = self
            .timers
            .values_mut()
            .filter(|timer| timer.running)
            .map(|timer| {
                timer.elapsed = timer.elapsed.saturating_add(1);
                timer.id
            })
            .collect();

        tracing::trace!(advanced = advanced.len(), "tick");
        for &id in &advanced {
            self.publish(Change::Updated(id));
        }
        advanced.len()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.values()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn position(&self, id: TimerId) -> Option<usize> {
        self.timers.keys().position(|&key| key == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TimerId> {
        self.timers.keys().nth(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &TimerList) -> Vec<u32> {
        list.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn length_matches_number_of_adds() {
        for n in 0..20 {
            let mut list = TimerList::default();
            for _ in 0..n {
                list.add("");
            }
            assert_eq!(list.len(), n);
        }
    }

    #[test]
    fn empty_input_uses_default_color() {
        let mut list = TimerList::default();
        let a = list.add("");
        let b = list.add("#ff0000");
        let c = list.add("#ff0000");

        assert_eq!(list.get(a).unwrap().color, DEFAULT_COLOR);
        assert_eq!(list.get(b).unwrap().color, "#ff0000");
        assert_eq!(list.get(c).unwrap().color, "#ff0000");
    }

    #[test]
    fn configured_default_color_is_used() {
        let mut list = TimerList::new("teal");
        let id = list.add("");
        assert_eq!(list.get(id).unwrap().color, "teal");
    }

    #[test]
    fn whitespace_input_is_kept_verbatim() {
        let mut list = TimerList::default();
        let id = list.add("  ");
        assert_eq!(list.get(id).unwrap().color, "  ");
    }

    #[test]
    fn submit_uses_and_clears_pending_input() {
        let mut list = TimerList::default();
        list.push_input('r');
        list.push_input('e');
        list.push_input('x');
        list.pop_input();
        list.push_input('d');
        assert_eq!(list.color_input(), "red");

        let id = list.submit();
        assert_eq!(list.get(id).unwrap().color, "red");
        assert_eq!(list.color_input(), "");

        let id = list.submit();
        assert_eq!(list.get(id).unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut list = TimerList::default();
        let id = list.add("");
        list.tick();

        assert!(list.toggle(id));
        assert!(list.get(id).unwrap().running);
        assert!(list.toggle(id));
        assert!(!list.get(id).unwrap().running);
        assert_eq!(list.get(id).unwrap().elapsed, 0);
    }

    #[test]
    fn toggle_keeps_elapsed() {
        let mut list = TimerList::default();
        let id = list.add("");
        list.toggle(id);
        list.tick();
        list.tick();
        list.toggle(id);
        assert_eq!(list.get(id).unwrap().elapsed, 2);
    }

    #[test]
    fn reset_always_zeroes_and_pauses() {
        let mut list = TimerList::default();
        let running = list.add("");
        let paused = list.add("");
        list.toggle(running);
        list.toggle(paused);
        for _ in 0..5 {
            list.tick();
        }
        list.toggle(paused);

        assert!(list.reset(running));
        assert!(list.reset(paused));
        for id in [running, paused] {
            let timer = list.get(id).unwrap();
            assert_eq!(timer.elapsed, 0);
            assert!(!timer.running);
        }
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut list = TimerList::default();
        let a = list.add("a");
        let b = list.add("b");
        let c = list.add("c");
        list.toggle(c);
        list.tick();

        let removed = list.delete(b).unwrap();
        assert_eq!(removed.color, "b");
        assert_eq!(ids(&list), vec![a.0, c.0]);
        assert_eq!(list.get(a).unwrap().color, "a");
        assert_eq!(list.get(c).unwrap().elapsed, 1);
        assert!(list.get(c).unwrap().running);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut list = TimerList::default();
        let id = list.add("");
        let missing = TimerId(42);

        assert!(!list.toggle(missing));
        assert!(!list.reset(missing));
        assert!(list.delete(missing).is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(id).unwrap(), &Timer::new(id, DEFAULT_COLOR.into()));
    }

    #[test]
    fn tick_advances_only_running_timers() {
        let mut list = TimerList::default();
        let running = list.add("");
        let paused = list.add("");
        list.toggle(running);

        assert_eq!(list.tick(), 1);
        assert_eq!(list.get(running).unwrap().elapsed, 1);
        assert_eq!(list.get(paused).unwrap().elapsed, 0);
    }

    #[test]
    fn start_then_three_ticks_shows_three_seconds() {
        let mut list = TimerList::default();
        list.add("");
        list.toggle(TimerId(1));
        for _ in 0..3 {
            list.tick();
        }

        let timer = list.get(TimerId(1)).unwrap();
        assert_eq!(timer.formatted(), "00:03");
        assert!(timer.running);
    }

    #[test]
    fn delete_first_leaves_second_with_default_color() {
        let mut list = TimerList::default();
        list.add("#ff0000");
        list.add("");
        list.delete(TimerId(1));

        assert_eq!(list.len(), 1);
        let timer = list.iter().next().unwrap();
        assert_eq!(timer.color, "#f5fcff");
        assert_eq!(timer.id, TimerId(2));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut list = TimerList::default();
        list.add("");
        let second = list.add("");
        list.delete(second);
        let third = list.add("");

        assert_eq!(third, TimerId(3));
        assert_eq!(ids(&list), vec![1, 3]);
    }

    #[test]
    fn position_and_id_at_follow_insertion_order() {
        let mut list = TimerList::default();
        let a = list.add("");
        let b = list.add("");
        let c = list.add("");
        list.delete(a);

        assert_eq!(list.position(b), Some(0));
        assert_eq!(list.position(c), Some(1));
        assert_eq!(list.position(a), None);
        assert_eq!(list.id_at(1), Some(c));
        assert_eq!(list.id_at(2), None);
    }

    #[test]
    fn subscribers_see_each_change() {
        let mut list = TimerList::default();
        let changes = list.subscribe();

        let a = list.add("");
        let b = list.add("");
        list.toggle(a);
        list.toggle(TimerId(99));
        list.tick();
        list.reset(a);
        list.delete(b);
        list.delete(b);

        let seen: Vec<Change> = changes.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                Change::Added(a),
                Change::Added(b),
                Change::Updated(a),
                Change::Updated(a),
                Change::Updated(a),
                Change::Removed(b),
            ]
        );
    }

    #[test]
    fn tick_with_nothing_running_publishes_nothing() {
        let mut list = TimerList::default();
        list.add("");
        let changes = list.subscribe();

        assert_eq!(list.tick(), 0);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut list = TimerList::default();
        let kept = list.subscribe();
        drop(list.subscribe());

        list.add("");
        assert_eq!(list.subscribers.len(), 1);
        assert_eq!(kept.try_recv(), Ok(Change::Added(TimerId(1))));
    }
}
