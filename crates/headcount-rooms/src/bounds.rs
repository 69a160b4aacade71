use crate::RoomAllocation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

/// Stepper bounds for one room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomBounds {
    pub adult: Bounds,
    pub child: Bounds,
}

pub const MIN_ADULTS: i64 = 1;
pub const MIN_CHILDREN: i64 = 0;

/// Guests not yet placed in any room. Negative while rooms are
/// over-assigned.
pub fn left_guest(total: i64, rooms: &[RoomAllocation]) -> i64 {
    total - rooms.iter().map(RoomAllocation::total).sum::<i64>()
}

/// A field may grow by the remaining capacity but its max never drops
/// below its own current value.
///
/// When another room is over-assigned this lets the max exceed what is
/// really left; the rooms are not reconciled against each other.
pub fn room_bounds(left: i64, room: &RoomAllocation) -> RoomBounds {
    RoomBounds {
        adult: Bounds {
            min: MIN_ADULTS,
            max: (left + room.adult).max(room.adult),
        },
        child: Bounds {
            min: MIN_CHILDREN,
            max: (left + room.child).max(room.child),
        },
    }
}
