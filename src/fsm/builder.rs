//! Declarative construction of a [`Machine`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::errors::FsmError;

use super::machine::{Machine, State, StateId};
use super::Callback;

/// Declares states, labelled paths and callbacks, then starts a [`Machine`].
///
/// States come into existence the first time a path mentions them. The
/// builder is strict: declaring a second path with the same label out of the
/// same state is rejected with [`FsmError::PathExists`], as is a second
/// transition callback for one label.
pub struct MachineBuilder<L, C, E> {
    states: Vec<State<L, C, E>>,
    names: HashMap<String, StateId>,
    transitions: HashMap<L, Callback<C, E>>,
}

impl<L, C, E> Default for MachineBuilder<L, C, E>
where
    L: Eq + Hash + Clone + fmt::Display,
    E: From<FsmError>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, C, E> MachineBuilder<L, C, E>
where
    L: Eq + Hash + Clone + fmt::Display,
    E: From<FsmError>,
{
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            names: HashMap::new(),
            transitions: HashMap::new(),
        }
    }

    fn declare(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.states.len();
        self.states.push(State::new(name));
        self.names.insert(name.to_string(), id);
        id
    }

    fn lookup(&self, name: &str) -> Result<StateId, FsmError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FsmError::UnknownState(name.to_string()))
    }

    /// Declare a path from `from` to `to`, taken on label `via`.
    pub fn path(&mut self, from: &str, via: L, to: &str) -> Result<(), FsmError> {
        let from_id = self.declare(from);
        let to_id = self.declare(to);
        let state = &mut self.states[from_id];

        if state.paths.contains_key(&via) {
            return Err(FsmError::PathExists {
                from: from.to_string(),
                via: via.to_string(),
            });
        }
        state.paths.insert(via, to_id);
        Ok(())
    }

    /// Declare the same labelled path out of each of `froms`.
    pub fn paths(&mut self, froms: &[&str], via: L, to: &str) -> Result<(), FsmError> {
        froms
            .iter()
            .try_for_each(|from| self.path(from, via.clone(), to))
    }

    /// Register a callback run every time `state` is entered. Callbacks of
    /// one state run in registration order.
    pub fn when_entering<F>(&mut self, state: &str, callback: F) -> Result<(), FsmError>
    where
        F: Fn(&mut C) -> Result<(), E> + 'static,
    {
        let id = self.lookup(state)?;
        self.states[id].on_enter.push(Box::new(callback));
        Ok(())
    }

    /// Register a callback run whenever a path labelled `via` is taken,
    /// before the destination's entry callbacks.
    pub fn when_transitioning_via<F>(&mut self, via: L, callback: F) -> Result<(), FsmError>
    where
        F: Fn(&mut C) -> Result<(), E> + 'static,
    {
        if self.transitions.contains_key(&via) {
            return Err(FsmError::DuplicateCallback {
                via: via.to_string(),
            });
        }
        self.transitions.insert(via, Box::new(callback));
        Ok(())
    }

    /// Mark `state` as one the machine may finish in.
    pub fn accept(&mut self, state: &str) -> Result<(), FsmError> {
        let id = self.lookup(state)?;
        self.states[id].acceptable = true;
        Ok(())
    }

    /// Finish building and start the machine in `state`.
    pub fn start(self, state: &str) -> Result<Machine<L, C, E>, FsmError> {
        let origin = self.lookup(state)?;
        Ok(Machine::new(self.states, self.transitions, origin))
    }
}
