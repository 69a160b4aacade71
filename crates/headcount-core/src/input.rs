#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Enter,
    Leave,
    Cancel,
}

impl PointerEventKind {
    pub fn is_primary_down(self) -> bool {
        matches!(self, PointerEventKind::Down(PointerButton::Primary))
    }

    pub fn is_primary_up(self) -> bool {
        matches!(self, PointerEventKind::Up(PointerButton::Primary))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusEvent {
    Gained,
    Lost,
}
