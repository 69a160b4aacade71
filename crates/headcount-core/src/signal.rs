use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Cloneable observable value.
///
/// Subscribers run after the write has been committed and with no borrow of
/// the signal held: they see a snapshot of the value they were notified
/// about and may read or write any signal, this one included. A write from a
/// subscriber notifies again before the outer notification carries on.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: Rc<T>,
    subs: Vec<Option<Rc<dyn Fn(&T)>>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value: Rc::new(value),
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        (*self.0.borrow().value).clone()
    }

    /// Reads without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.0.borrow().value.clone();
        f(&*value)
    }

    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = Rc::new(v);
        self.notify();
    }

    /// Mutates in place, copying first if a subscriber still holds the
    /// previous snapshot.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(Rc::make_mut(&mut self.0.borrow_mut().value));
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Some(Rc::new(f)));
        inner.subs.len() - 1
    }

    pub fn unsubscribe(&self, id: SubId) {
        if let Some(slot) = self.0.borrow_mut().subs.get_mut(id) {
            *slot = None;
        }
    }

    fn notify(&self) {
        let (value, subs) = {
            let inner = self.0.borrow();
            let subs: Vec<Rc<dyn Fn(&T)>> = inner.subs.iter().flatten().cloned().collect();
            (inner.value.clone(), subs)
        };
        for s in subs {
            s(&*value);
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
