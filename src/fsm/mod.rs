//! A reusable finite-state machine.
//!
//! Machines are declared through a [`MachineBuilder`]: labelled paths between
//! named states, callbacks run on entering a state or on taking a label, and
//! the states a run may end in. [`MachineBuilder::start`] yields a
//! [`Machine`] driven with [`Machine::transition`] and stopped with
//! [`Machine::finish`].
//!
//! The machine is generic over its labels `L`, the context `C` handed to
//! callbacks, and the error `E` callbacks may fail with. Callbacks get
//! `&mut C` on every call instead of capturing shared state, so a grammar can
//! mutate its owner's data without interior mutability.
//!
//! ```rust
//! use jaslang::errors::FsmError;
//! use jaslang::fsm::MachineBuilder;
//!
//! let mut builder = MachineBuilder::<&str, u32, FsmError>::new();
//! builder.path("idle", "coin", "ready").unwrap();
//! builder.path("ready", "push", "idle").unwrap();
//! builder.when_entering("ready", |coins: &mut u32| { *coins += 1; Ok(()) }).unwrap();
//! builder.accept("idle").unwrap();
//!
//! let mut machine = builder.start("idle").unwrap();
//! let mut coins = 0;
//! machine.transition("coin", &mut coins).unwrap();
//! machine.transition("push", &mut coins).unwrap();
//! machine.finish().unwrap();
//! assert_eq!(coins, 1);
//! assert_eq!(machine.debug_route(), "ORIGIN: idle >>coin>> ready >>push>> idle");
//! ```

pub mod builder;
pub mod machine;

pub use builder::MachineBuilder;
pub use machine::Machine;

/// A state-entry or transition callback.
pub type Callback<C, E> = Box<dyn Fn(&mut C) -> Result<(), E>>;
