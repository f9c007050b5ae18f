//! Animation states and the per-entity groups that hold them.
//!
//! Index 0 of every non-empty [`StateGroup`] is a reserved sentinel that
//! stands for "no state": reaching it removes the object.

use bitflags::bitflags;
use serde::Serialize;

use crate::action::ActionParam;

pub type StateNum = usize;

/// The "no state" index.
pub const S_NULL: StateNum = 0;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct StateFlags: u8 {
        const WEAPON   = 0x01;
        /// Frame refers to a model rather than a sprite.
        const MODEL    = 0x02;
        /// Model frame given by name, mapped once the model is loaded.
        const UNMAPPED = 0x04;
    }
}

/// Successor of a state, before and after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NextRef {
    /// Fall through to the following state.
    Sequential,
    /// Object is removed when this is reached.
    Terminal,
    /// Unresolved reference to a label, by redirector id.
    Redirector { id: usize, offset: usize },
    Resolved(StateNum),
}

impl NextRef {
    pub fn resolved(self) -> Option<StateNum> {
        match self {
            NextRef::Resolved(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State<A> {
    pub sprite: usize,
    pub frame: i32,
    pub bright: u8,
    pub flags: StateFlags,
    pub tics: i32,
    pub model_frame: Option<String>,
    pub label: Option<String>,
    pub action: Option<A>,
    pub action_param: Option<ActionParam>,
    pub next: NextRef,
    pub jump: NextRef,
}

impl<A> State<A> {
    pub fn new() -> Self {
        Self {
            sprite: 0,
            frame: 0,
            bright: 0,
            flags: StateFlags::empty(),
            tics: -1,
            model_frame: None,
            label: None,
            action: None,
            action_param: None,
            next: NextRef::Sequential,
            jump: NextRef::Terminal,
        }
    }
}

impl<A> Default for State<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// States added by one entry definition. `first == S_NULL` while empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StateRange {
    pub first: StateNum,
    pub last: StateNum,
}

impl StateRange {
    pub fn is_empty(&self) -> bool {
        self.first == S_NULL
    }

    pub fn contains(&self, st: StateNum) -> bool {
        !self.is_empty() && self.first <= st && st <= self.last
    }
}

/// Ordered states belonging to one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGroup<A> {
    states: Vec<State<A>>,
    ranges: Vec<StateRange>,
}

impl<A> StateGroup<A> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            ranges: Vec::new(),
        }
    }

    /// Number of slots including the sentinel; 0 until a state is added.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, st: StateNum) -> Option<&State<A>> {
        self.states.get(st)
    }

    pub fn get_mut(&mut self, st: StateNum) -> Option<&mut State<A>> {
        self.states.get_mut(st)
    }

    pub fn states(&self) -> &[State<A>] {
        &self.states
    }

    pub fn ranges(&self) -> &[StateRange] {
        &self.ranges
    }

    pub fn begin_range(&mut self) {
        self.ranges.push(StateRange::default());
    }

    pub fn current_range(&self) -> Option<StateRange> {
        self.ranges.last().copied()
    }

    /// Drop the current range if nothing was added to it.
    pub fn close_range(&mut self) -> Option<StateRange> {
        match self.ranges.last() {
            Some(r) if r.is_empty() => {
                self.ranges.pop();
                None
            }
            Some(r) => Some(*r),
            None => None,
        }
    }

    /// Append a state to the current range, seeding the sentinel first.
    pub fn push(&mut self, state: State<A>) -> StateNum {
        if self.states.is_empty() {
            self.states.push(State::new());
        }
        if self.ranges.is_empty() {
            self.begin_range();
        }
        self.states.push(state);
        let st = self.states.len() - 1;
        if let Some(range) = self.ranges.last_mut() {
            if range.is_empty() {
                range.first = st;
            }
            range.last = st;
        }
        st
    }

    /// Last state of the current range, if it has any.
    pub fn last_in_range(&self) -> Option<StateNum> {
        self.ranges.last().filter(|r| !r.is_empty()).map(|r| r.last)
    }

    pub fn contains(&self, st: StateNum) -> bool {
        self.ranges.iter().any(|r| r.contains(st))
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.ranges.clear();
    }
}

impl<A> Default for StateGroup<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(label: &str) -> State<()> {
        State {
            label: Some(label.into()),
            ..State::new()
        }
    }

    #[test]
    fn sentinel_seeded_on_first_push() {
        let mut g: StateGroup<()> = StateGroup::new();
        assert_eq!(g.len(), 0);
        let st = g.push(labelled("SPAWN"));
        assert_eq!(st, 1);
        assert_eq!(g.len(), 2);
        assert_eq!(g.get(S_NULL).and_then(|s| s.label.clone()), None);
    }

    #[test]
    fn ranges_track_entries() {
        let mut g: StateGroup<()> = StateGroup::new();
        g.begin_range();
        g.push(labelled("SPAWN"));
        g.push(State::new());
        assert_eq!(g.close_range(), Some(StateRange { first: 1, last: 2 }));

        g.begin_range();
        assert_eq!(g.last_in_range(), None);
        assert_eq!(g.close_range(), None);
        assert_eq!(g.ranges().len(), 1);

        g.begin_range();
        g.push(labelled("DEATH"));
        assert_eq!(g.last_in_range(), Some(3));
        assert!(g.contains(3));
        assert!(!g.contains(0));
    }

    #[test]
    fn template_state() {
        let s: State<()> = State::new();
        assert_eq!(s.tics, -1);
        assert_eq!(s.next, NextRef::Sequential);
        assert_eq!(s.jump, NextRef::Terminal);
    }
}
