pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::input::{FocusEvent, PointerButton, PointerEventKind};
pub use crate::scope::{Scope, current_scope};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::timer::{self, TimerId};
pub use crate::view::{View, ViewKind};
