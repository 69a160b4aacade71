use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use headcount_core::{Signal, View, signal};
use headcount_ui::{Column, NumberInput, NumberInputProps, Row, Text};
use slotmap::SlotMap;

use crate::bounds::{Bounds, MIN_ADULTS, RoomBounds, left_guest, room_bounds};
use crate::guard::accept_room_edit;
use crate::{Allocation, FormError, Guest, RoomAllocation, RoomId};

pub type AllocationCallback = Rc<dyn Fn(&[Allocation])>;

#[derive(Clone)]
pub struct RoomAllocationProps {
    /// Total head count to place.
    pub guest: i64,
    /// Number of rooms; fixed once mounted.
    pub room: usize,
    pub on_change: Option<AllocationCallback>,
}

impl fmt::Debug for RoomAllocationProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomAllocationProps")
            .field("guest", &self.guest)
            .field("room", &self.room)
            .field("on_change", &self.on_change.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl RoomAllocationProps {
    pub fn new(guest: i64, room: usize) -> Self {
        Self {
            guest,
            room,
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(&[Allocation]) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

/// Inputs a room's sub-view depends on; unchanged keys reuse the last view.
/// The last two are the adult and child stepper revisions.
type RenderKey = (i64, i64, i64, u64, u64);

struct Room {
    alloc: RoomAllocation,
    index: usize,
    adult: NumberInput,
    child: NumberInput,
    rendered: Option<(RenderKey, View)>,
}

impl Room {
    fn stepper(&self, guest: Guest) -> &NumberInput {
        match guest {
            Guest::Adult => &self.adult,
            Guest::Child => &self.child,
        }
    }

    fn render_key(&self, left: i64) -> RenderKey {
        (
            self.alloc.adult,
            self.alloc.child,
            left,
            self.adult.revision(),
            self.child.revision(),
        )
    }

    fn render(&self) -> View {
        Column()
            .key(format!("room-{}", self.index))
            .with_children(vec![
                Text(format!("Room: {} guests", self.alloc.total())),
                Row().with_children(vec![Text("Adults (18+)"), self.adult.view()]),
                Row().with_children(vec![Text("Children"), self.child.view()]),
            ])
    }
}

struct FormState {
    guest: i64,
    order: Vec<RoomId>,
    rooms: SlotMap<RoomId, Room>,
    published: Signal<Vec<Allocation>>,
    room_renders: usize,
}

impl FormState {
    fn allocations(&self) -> Vec<RoomAllocation> {
        self.order.iter().map(|id| self.rooms[*id].alloc).collect()
    }

    fn left_guest(&self) -> i64 {
        left_guest(self.guest, &self.allocations())
    }
}

/// Handle to a mounted allocation form. Clones share the same form.
#[derive(Clone)]
pub struct RoomAllocationForm(Rc<RefCell<FormState>>);

impl RoomAllocationForm {
    /// Creates `room` rooms at one adult and no children each and publishes
    /// that initial list once.
    pub fn mount(props: RoomAllocationProps) -> Result<Self, FormError> {
        if props.room == 0 {
            return Err(FormError::NoRooms);
        }
        if props.guest < 0 {
            return Err(FormError::NegativeGuests(props.guest));
        }

        let form = Self(Rc::new(RefCell::new(FormState {
            guest: props.guest,
            order: Vec::with_capacity(props.room),
            rooms: SlotMap::with_capacity_and_key(props.room),
            published: signal(Vec::new()),
            room_renders: 0,
        })));

        let left = props.guest - props.room as i64 * MIN_ADULTS;
        {
            let weak = Rc::downgrade(&form.0);
            let mut st = form.0.borrow_mut();
            for index in 0..props.room {
                let id = st.rooms.try_insert_with_key(|id| -> Result<Room, FormError> {
                    let alloc = RoomAllocation::new(id);
                    let b = room_bounds(left, &alloc);
                    Ok(Room {
                        alloc,
                        index,
                        adult: mount_stepper(&weak, id, index, Guest::Adult, alloc.adult, b.adult)?,
                        child: mount_stepper(&weak, id, index, Guest::Child, alloc.child, b.child)?,
                        rendered: None,
                    })
                })?;
                st.order.push(id);
            }
        }

        if let Some(cb) = props.on_change {
            form.signal().subscribe(move |list| cb(list.as_slice()));
        }
        log::debug!(
            "room form: {} guests over {} rooms",
            props.guest,
            props.room
        );
        form.publish();
        Ok(form)
    }

    pub fn guest(&self) -> i64 {
        self.0.borrow().guest
    }

    pub fn room_count(&self) -> usize {
        self.0.borrow().order.len()
    }

    /// Room ids in display order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.0.borrow().order.clone()
    }

    pub fn room(&self, id: RoomId) -> Option<RoomAllocation> {
        self.0.borrow().rooms.get(id).map(|r| r.alloc)
    }

    pub fn rooms(&self) -> Vec<RoomAllocation> {
        self.0.borrow().allocations()
    }

    /// The published shape: room order, ids stripped.
    pub fn allocations(&self) -> Vec<Allocation> {
        self.rooms().iter().map(RoomAllocation::allocation).collect()
    }

    pub fn left_guest(&self) -> i64 {
        self.0.borrow().left_guest()
    }

    /// Current stepper bounds for `id`, derived from the remaining capacity.
    pub fn bounds(&self, id: RoomId) -> Result<RoomBounds, FormError> {
        let st = self.0.borrow();
        let room = st.rooms.get(id).ok_or(FormError::UnknownRoom(id))?;
        Ok(room_bounds(st.left_guest(), &room.alloc))
    }

    pub fn stepper(&self, id: RoomId, guest: Guest) -> Result<NumberInput, FormError> {
        let st = self.0.borrow();
        let room = st.rooms.get(id).ok_or(FormError::UnknownRoom(id))?;
        Ok(room.stepper(guest).clone())
    }

    /// Signal the form publishes every committed list into.
    pub fn signal(&self) -> Signal<Vec<Allocation>> {
        self.0.borrow().published.clone()
    }

    /// How many room sub-views have been rebuilt by [`view`](Self::view).
    pub fn room_renders(&self) -> usize {
        self.0.borrow().room_renders
    }

    /// Sets a count through the room's stepper, so its clamp applies.
    /// Negative counts are ignored. Returns whether the allocation changed.
    pub fn set_count(&self, id: RoomId, guest: Guest, count: i64) -> Result<bool, FormError> {
        if count < 0 {
            log::debug!("room {id:?}: ignoring negative {} count {count}", guest.label());
            return Ok(false);
        }
        self.edit_raw(id, guest, &count.to_string())
    }

    pub fn set_adult(&self, id: RoomId, adult: i64) -> Result<bool, FormError> {
        self.set_count(id, Guest::Adult, adult)
    }

    pub fn set_child(&self, id: RoomId, child: i64) -> Result<bool, FormError> {
        self.set_count(id, Guest::Child, child)
    }

    /// A keyboard edit of a room field. Text that does not start with a
    /// non-negative integer is dropped without touching state; anything else
    /// goes to the room's stepper. Returns whether the allocation changed.
    pub fn edit_raw(&self, id: RoomId, guest: Guest, raw: &str) -> Result<bool, FormError> {
        let stepper = self.stepper(id, guest)?;
        if accept_room_edit(raw).is_none() {
            log::debug!("room {id:?}: ignoring {} edit {raw:?}", guest.label());
            return Ok(false);
        }
        let before = self.room(id);
        stepper.input_text(raw);
        Ok(self.room(id) != before)
    }

    /// Header lines plus one sub-view per room. A room whose counts, the
    /// remaining capacity and both steppers are unchanged reuses its
    /// previous sub-view.
    pub fn view(&self) -> View {
        let mut st = self.0.borrow_mut();
        let left = st.left_guest();
        let header = vec![
            Text(format!("Guests: {} / Rooms: {}", st.guest, st.order.len())),
            Text(format!("Unassigned: {left}")),
        ];

        let FormState {
            order,
            rooms,
            room_renders,
            ..
        } = &mut *st;
        let mut room_views = Vec::with_capacity(order.len());
        for id in order.iter() {
            let room = &mut rooms[*id];
            let key = room.render_key(left);
            let cached = room
                .rendered
                .as_ref()
                .filter(|(last, _)| *last == key)
                .map(|(_, view)| view.clone());
            let view = match cached {
                Some(view) => view,
                None => {
                    *room_renders += 1;
                    let view = room.render();
                    room.rendered = Some((key, view.clone()));
                    view
                }
            };
            room_views.push(view);
        }

        Column()
            .key("room-allocation")
            .with_children(header)
            .child(Column().key("rooms").with_children(room_views))
    }

    /// Tears down every stepper. The form keeps its last allocations.
    pub fn dispose(&self) {
        let st = self.0.borrow();
        for room in st.rooms.values() {
            room.adult.dispose();
            room.child.dispose();
        }
    }

    /// Stepper callback: replace the room by id, push fresh props to every
    /// stepper and publish if anything changed.
    fn apply(&self, id: RoomId, guest: Guest, count: i64) -> Result<bool, FormError> {
        let changed = if count < 0 {
            log::debug!("room {id:?}: ignoring negative {} count {count}", guest.label());
            false
        } else {
            let mut st = self.0.borrow_mut();
            let room = st.rooms.get_mut(id).ok_or(FormError::UnknownRoom(id))?;
            let next = room.alloc.with(guest, count);
            let changed = next != room.alloc;
            room.alloc = next;
            changed
        };
        self.sync()?;
        if changed {
            self.publish();
        }
        Ok(changed)
    }

    /// Pushes every room's counts and freshly derived bounds into its
    /// steppers.
    fn sync(&self) -> Result<(), FormError> {
        let st = self.0.borrow();
        let left = st.left_guest();
        for id in &st.order {
            let room = &st.rooms[*id];
            let RoomBounds { adult, child } = room_bounds(left, &room.alloc);
            room.adult.set_bounds(adult.min, adult.max)?;
            room.adult.set_value(room.alloc.adult);
            room.child.set_bounds(child.min, child.max)?;
            room.child.set_value(room.alloc.child);
        }
        Ok(())
    }

    fn publish(&self) {
        let (list, published) = {
            let st = self.0.borrow();
            let list: Vec<Allocation> = st
                .allocations()
                .iter()
                .map(RoomAllocation::allocation)
                .collect();
            (list, st.published.clone())
        };
        log::debug!("room form: publish {list:?}");
        published.set(list);
    }
}

fn mount_stepper(
    form: &Weak<RefCell<FormState>>,
    id: RoomId,
    index: usize,
    guest: Guest,
    value: i64,
    bounds: Bounds,
) -> Result<NumberInput, FormError> {
    let form = form.clone();
    let props = NumberInputProps::new(value)
        .name(format!("room-{index}-{}", guest.label()))
        .range(bounds.min, bounds.max)
        .on_change(move |ev| {
            let Some(form) = form.upgrade().map(RoomAllocationForm) else {
                return;
            };
            if let Err(e) = form.apply(id, guest, ev.value) {
                log::error!("room {id:?}: {e}");
            }
        });
    Ok(NumberInput::new(props)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use headcount_core::timer;
    use headcount_ui::{Controls, StepControl};
    use web_time::Duration;

    fn recorded(guest: i64, room: usize) -> (RoomAllocationForm, Rc<RefCell<Vec<Vec<Allocation>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let form = RoomAllocationForm::mount(
            RoomAllocationProps::new(guest, room).on_change(move |list| s.borrow_mut().push(list.to_vec())),
        )
        .unwrap();
        (form, seen)
    }

    #[test]
    fn mount_validates_props() {
        assert_eq!(
            RoomAllocationForm::mount(RoomAllocationProps::new(3, 0)).err(),
            Some(FormError::NoRooms)
        );
        assert_eq!(
            RoomAllocationForm::mount(RoomAllocationProps::new(-1, 1)).err(),
            Some(FormError::NegativeGuests(-1))
        );
    }

    #[test]
    fn mount_publishes_defaults_once() {
        timer::reset();
        let (form, seen) = recorded(10, 2);
        assert_eq!(form.left_guest(), 8);
        assert_eq!(
            *seen.borrow(),
            vec![vec![Allocation::new(1, 0), Allocation::new(1, 0)]]
        );
    }

    #[test]
    fn growing_one_room_tightens_the_other() {
        timer::reset();
        let (form, seen) = recorded(10, 2);
        let ids = form.room_ids();
        assert_eq!(form.bounds(ids[1]).unwrap().adult.max, 9);

        assert!(form.set_adult(ids[0], 5).unwrap());
        assert_eq!(form.left_guest(), 4);
        assert_eq!(form.bounds(ids[1]).unwrap().adult.max, 5);
        assert_eq!(form.stepper(ids[1], Guest::Adult).unwrap().config().max, 5);
        assert_eq!(form.stepper(ids[1], Guest::Child).unwrap().config().max, 4);
        assert_eq!(
            seen.borrow().last().unwrap(),
            &vec![Allocation::new(5, 0), Allocation::new(1, 0)]
        );
    }

    #[test]
    fn stepper_clamps_to_remaining_capacity() {
        timer::reset();
        let (form, _) = recorded(4, 2);
        let ids = form.room_ids();
        // left = 2, so room 0 can hold at most 3 adults
        form.set_adult(ids[0], 50).unwrap();
        assert_eq!(form.room(ids[0]).unwrap().adult, 3);
        assert_eq!(form.left_guest(), 0);
        let b = form.stepper(ids[1], Guest::Adult).unwrap();
        assert!(!b.controls().contains(Controls::INCREMENT));
    }

    #[test]
    fn invalid_raw_edits_change_nothing() {
        timer::reset();
        let (form, seen) = recorded(6, 1);
        let id = form.room_ids()[0];
        assert!(!form.edit_raw(id, Guest::Child, "-2").unwrap());
        assert!(!form.edit_raw(id, Guest::Child, "two").unwrap());
        assert!(!form.set_child(id, -1).unwrap());
        assert_eq!(seen.borrow().len(), 1);
        assert!(form.edit_raw(id, Guest::Child, "2").unwrap());
        assert_eq!(form.allocations(), vec![Allocation::new(1, 2)]);
    }

    #[test]
    fn unchanged_edit_is_not_published() {
        timer::reset();
        let (form, seen) = recorded(6, 2);
        let id = form.room_ids()[0];
        assert!(!form.set_adult(id, 1).unwrap());
        // adult min is 1, so 0 clamps back to the current value
        assert!(!form.set_adult(id, 0).unwrap());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn unknown_room_is_an_error() {
        timer::reset();
        let (form, _) = recorded(2, 1);
        let stray = RoomId::default();
        assert_eq!(form.bounds(stray), Err(FormError::UnknownRoom(stray)));
        assert!(form.edit_raw(stray, Guest::Adult, "1").is_err());
    }

    #[test]
    fn held_increment_publishes_each_step() {
        timer::reset();
        let (form, seen) = recorded(5, 1);
        let id = form.room_ids()[0];
        let adult = form.stepper(id, Guest::Adult).unwrap();
        adult.pointer_down(StepControl::Increment);
        timer::advance(Duration::from_millis(900));
        adult.pointer_up(StepControl::Increment);
        // 1 + steps at 500..=900 would be 6, capped at 5 guests
        assert_eq!(form.allocations(), vec![Allocation::new(5, 0)]);
        assert_eq!(seen.borrow().len(), 5);
        assert_eq!(timer::pending(), 0);
    }

    #[test]
    fn view_reuses_unchanged_rooms() {
        timer::reset();
        let (form, _) = recorded(10, 3);
        let ids = form.room_ids();

        let first = form.view();
        assert_eq!(form.room_renders(), 3);
        assert_eq!(
            &first.texts()[..2],
            &["Guests: 10 / Rooms: 3", "Unassigned: 7"]
        );

        form.view();
        assert_eq!(form.room_renders(), 3);

        // left_guest changes, so every room rebuilds
        form.set_child(ids[2], 2).unwrap();
        let v = form.view();
        assert_eq!(form.room_renders(), 6);
        assert!(v.texts().contains(&"Room: 3 guests"));
        assert!(v.find_key("room-2-child/decrement").unwrap().is_enabled());
    }

    #[test]
    fn view_follows_stepper_state() {
        timer::reset();
        let (form, _) = recorded(10, 2);
        let ids = form.room_ids();
        form.view();

        form.stepper(ids[0], Guest::Adult).unwrap().set_disabled(true);
        let v = form.view();
        assert!(v.find_key("room-0-adult").unwrap().has_overlay());
        assert!(!v.find_key("room-1-adult").unwrap().has_overlay());
        assert_eq!(form.room_renders(), 3);

        form.dispose();
        let v = form.view();
        assert!(!v.find_key("room-1-adult/increment").unwrap().is_enabled());
        assert!(!v.find_key("room-1-child/field").unwrap().is_enabled());
        assert_eq!(form.room_renders(), 5);
    }

    #[test]
    fn consumer_may_edit_from_on_change() {
        timer::reset();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<RoomAllocationForm>>> = Rc::new(RefCell::new(None));
        let (s2, slot2) = (seen.clone(), slot.clone());
        let form = RoomAllocationForm::mount(RoomAllocationProps::new(10, 2).on_change(
            move |list| {
                s2.borrow_mut().push(list.to_vec());
                let Some(form) = slot2.borrow().clone() else {
                    return;
                };
                // every room with two adults gets a child next door
                if list[0].adult == 2 && list[1].child == 0 {
                    let next = form.room_ids()[1];
                    form.set_child(next, 1).unwrap();
                }
            },
        ))
        .unwrap();
        *slot.borrow_mut() = Some(form.clone());

        let ids = form.room_ids();
        assert!(form.set_adult(ids[0], 2).unwrap());
        assert_eq!(
            form.allocations(),
            vec![Allocation::new(2, 0), Allocation::new(1, 1)]
        );
        assert_eq!(
            *seen.borrow(),
            vec![
                vec![Allocation::new(1, 0), Allocation::new(1, 0)],
                vec![Allocation::new(2, 0), Allocation::new(1, 0)],
                vec![Allocation::new(2, 0), Allocation::new(1, 1)],
            ]
        );
        assert_eq!(form.stepper(ids[1], Guest::Child).unwrap().value(), 1);
        slot.borrow_mut().take();
    }

    #[test]
    fn dispose_cancels_holds() {
        timer::reset();
        let (form, _) = recorded(10, 2);
        let id = form.room_ids()[1];
        form.stepper(id, Guest::Child)
            .unwrap()
            .pointer_down(StepControl::Increment);
        assert_eq!(timer::pending(), 1);
        form.dispose();
        assert_eq!(timer::pending(), 0);
    }
}
