//! The runnable machine produced by [`super::MachineBuilder::start`].

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::hash::Hash;

use crate::errors::FsmError;

use super::Callback;

pub(super) type StateId = usize;

pub(super) struct State<L, C, E> {
    pub(super) name: String,
    pub(super) acceptable: bool,
    pub(super) on_enter: Vec<Callback<C, E>>,
    pub(super) paths: HashMap<L, StateId>,
}

impl<L, C, E> State<L, C, E> {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            acceptable: false,
            on_enter: Vec::new(),
            paths: HashMap::new(),
        }
    }
}

/// A started machine: `Running` until [`Machine::finish`] succeeds, then
/// `Finished` for good.
///
/// Every operation on a finished machine fails with
/// [`FsmError::MachineUnusable`] and leaves it untouched.
pub struct Machine<L, C, E> {
    states: Vec<State<L, C, E>>,
    transitions: HashMap<L, Callback<C, E>>,
    origin: StateId,
    current: StateId,
    finished: bool,
    route: Vec<(L, StateId)>,
}

impl<L, C, E> Machine<L, C, E>
where
    L: Eq + Hash + Clone + fmt::Display,
    E: From<FsmError>,
{
    pub(super) fn new(
        states: Vec<State<L, C, E>>,
        transitions: HashMap<L, Callback<C, E>>,
        origin: StateId,
    ) -> Self {
        Self {
            states,
            transitions,
            origin,
            current: origin,
            finished: false,
            route: Vec::new(),
        }
    }

    /// Take the path labelled `via` out of the current state.
    ///
    /// On success the transition callback for `via` runs first, then the
    /// destination's entry callbacks in registration order, each handed
    /// `context`. The move happens before any callback runs, so a failing
    /// callback aborts the transition with the machine already advanced.
    pub fn transition(&mut self, via: L, context: &mut C) -> Result<(), E> {
        if self.finished {
            return Err(FsmError::MachineUnusable.into());
        }

        let current = &self.states[self.current];
        let Some(&next) = current.paths.get(&via) else {
            return Err(FsmError::InvalidTransition {
                from: current.name.clone(),
                via: via.to_string(),
            }
            .into());
        };

        self.current = next;
        self.route.push((via.clone(), next));

        if let Some(callback) = self.transitions.get(&via) {
            callback(context)?;
        }
        for callback in &self.states[next].on_enter {
            callback(context)?;
        }

        Ok(())
    }

    /// Stop the machine. Succeeds only in an accepting state, after which the
    /// machine is unusable.
    pub fn finish(&mut self) -> Result<(), FsmError> {
        if self.finished {
            return Err(FsmError::MachineUnusable);
        }

        let current = &self.states[self.current];
        if !current.acceptable {
            return Err(FsmError::UnacceptableFinishState(current.name.clone()));
        }

        self.finished = true;
        Ok(())
    }

    pub fn current_state(&self) -> &str {
        &self.states[self.current].name
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Human-readable trace of every label taken and state entered since
    /// the machine started, e.g. `ORIGIN: one >>1>> two >>2>> three`.
    pub fn debug_route(&self) -> String {
        let mut route = format!("ORIGIN: {}", self.states[self.origin].name);
        for (via, state) in &self.route {
            let _ = write!(route, " >>{}>> {}", via, self.states[*state].name);
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::super::MachineBuilder;
    use super::*;

    #[test]
    fn finished_machine_is_unusable() {
        let mut builder = MachineBuilder::<&str, (), FsmError>::new();
        builder.path("origin", "only", "origin").unwrap();
        builder.accept("origin").unwrap();
        let mut machine = builder.start("origin").unwrap();

        machine.finish().unwrap();
        assert!(machine.is_finished());
        assert_eq!(
            machine.transition("only", &mut ()),
            Err(FsmError::MachineUnusable)
        );
        assert_eq!(machine.finish(), Err(FsmError::MachineUnusable));
        assert_eq!(machine.debug_route(), "ORIGIN: origin");
    }

    #[test]
    fn failed_finish_leaves_machine_running() {
        let mut builder = MachineBuilder::<&str, (), FsmError>::new();
        builder.path("one", "go", "two").unwrap();
        builder.accept("two").unwrap();
        let mut machine = builder.start("one").unwrap();

        assert_eq!(
            machine.finish(),
            Err(FsmError::UnacceptableFinishState("one".into()))
        );
        machine.transition("go", &mut ()).unwrap();
        assert_eq!(machine.current_state(), "two");
        assert!(machine.finish().is_ok());
    }
}
