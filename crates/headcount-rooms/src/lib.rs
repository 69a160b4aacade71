//! Guest allocation form: spreads a fixed number of guests over a fixed
//! number of rooms, one adult and one child stepper per room.
//!
//! The rooms are coupled through the remaining capacity
//! (`guest - Σ(adult + child)`): every committed change recomputes it and
//! hands each room fresh stepper bounds, so growing one room tightens what
//! the others can take.
//!
//! ```rust
//! use headcount_rooms::*;
//!
//! let form = RoomAllocationForm::mount(RoomAllocationProps::new(10, 2)).unwrap();
//! let ids = form.room_ids();
//! let (a, b) = (ids[0], ids[1]);
//!
//! form.set_count(a, Guest::Adult, 5).unwrap();
//! assert_eq!(form.bounds(b).unwrap().adult.max, 5);
//! assert_eq!(
//!     form.allocations(),
//!     vec![Allocation::new(5, 0), Allocation::new(1, 0)]
//! );
//! ```

pub mod bounds;
pub mod error;
pub mod form;
pub mod guard;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

pub use bounds::{Bounds, RoomBounds, left_guest, room_bounds};
pub use error::FormError;
pub use form::{RoomAllocationForm, RoomAllocationProps};
pub use guard::{accept_room_edit, parse_leading_int};

new_key_type! {
    /// Stable identity of a room for the life of its form.
    pub struct RoomId;
}

/// What the form publishes per room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub adult: i64,
    pub child: i64,
}

impl Allocation {
    pub fn new(adult: i64, child: i64) -> Self {
        Self { adult, child }
    }

    pub fn total(&self) -> i64 {
        self.adult + self.child
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomAllocation {
    pub id: RoomId,
    pub adult: i64,
    pub child: i64,
}

impl RoomAllocation {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            adult: bounds::MIN_ADULTS,
            child: bounds::MIN_CHILDREN,
        }
    }

    pub fn total(&self) -> i64 {
        self.adult + self.child
    }

    pub fn with(self, guest: Guest, count: i64) -> Self {
        match guest {
            Guest::Adult => Self { adult: count, ..self },
            Guest::Child => Self { child: count, ..self },
        }
    }

    pub fn allocation(&self) -> Allocation {
        Allocation::new(self.adult, self.child)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Guest {
    Adult,
    Child,
}

impl Guest {
    pub fn label(self) -> &'static str {
        match self {
            Guest::Adult => "adult",
            Guest::Child => "child",
        }
    }
}
