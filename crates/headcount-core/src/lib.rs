//! # Runtime, Scopes, Signals and Timers
//!
//! Headcount widgets are plain structs behind `Rc<RefCell<_>>` handles that
//! run on a single UI thread. This crate holds the small runtime they share:
//!
//! - `timer`: a thread-local queue of one-shot and repeating tasks driven by
//!   a virtual clock.
//! - `Scope` / `Dispose`: teardown wiring, so unmounting a subtree cancels
//!   its timers.
//! - `Signal<T>`: observable value that owners publish into.
//! - `View`: a headless description of what a widget shows.
//!
//! ## Timers
//!
//! Nothing fires on its own. The platform loop feeds wall-clock time with
//! `timer::pump`; tests move time in exact steps with `timer::advance`:
//!
//! ```rust
//! use headcount_core::timer;
//! use std::{cell::Cell, rc::Rc};
//! use web_time::Duration;
//!
//! let ticks = Rc::new(Cell::new(0));
//! let t = ticks.clone();
//! let id = timer::schedule_repeating(Duration::from_millis(100), move || t.set(t.get() + 1));
//!
//! timer::advance(Duration::from_millis(350));
//! assert_eq!(ticks.get(), 3);
//! timer::cancel(id);
//! ```
//!
//! ## Scopes
//!
//! Widgets created inside `Scope::run` register their cleanup with that
//! scope:
//!
//! ```rust
//! use headcount_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     effect(|| on_unmount(|| log::info!("unmounted")));
//! });
//! scope.dispose();
//! ```
//!
//! ## Signals
//!
//! ```rust
//! use headcount_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```

pub mod effects;
pub mod input;
pub mod prelude;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod timer;
pub mod view;

pub use effects::*;
pub use input::*;
pub use scope::*;
pub use semantics::*;
pub use prelude::*;
pub use signal::*;
pub use view::*;
