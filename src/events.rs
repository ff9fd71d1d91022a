//! Event model shared between the window-system adapter and handlers.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// X11 window identifier. Zero is the protocol's `None` window.
pub type WindowId = u32;

/// Interned X11 atom.
pub type Atom = u32;

/// Bitset of event classes a consumer wants delivered.
///
/// Bit values match the X11 core protocol, so the adapter can hand the
/// combined mask to the server unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u32);

impl EventMask {
    pub const EMPTY: EventMask = EventMask(0);
    pub const KEY_PRESS: EventMask = EventMask(1 << 0);
    pub const BUTTON_PRESS: EventMask = EventMask(1 << 2);
    pub const POINTER_MOTION: EventMask = EventMask(1 << 6);
    pub const SUBSTRUCTURE_NOTIFY: EventMask = EventMask(1 << 19);
    pub const FOCUS_CHANGE: EventMask = EventMask(1 << 21);
    pub const PROPERTY_CHANGE: EventMask = EventMask(1 << 22);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

/// Discriminant of a [`DesktopEvent`].
///
/// Handlers declare the kinds they consume; the dispatcher keys its cache
/// on this. `CreateNotify` is structural: it is handled by the dispatcher
/// itself and never delivered to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CreateNotify,
    PropertyNotify,
    KeyPress,
    ButtonPress,
    MotionNotify,
    FocusIn,
}

impl EventKind {
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::CreateNotify => "CreateNotify",
            EventKind::PropertyNotify => "PropertyNotify",
            EventKind::KeyPress => "KeyPress",
            EventKind::ButtonPress => "ButtonPress",
            EventKind::MotionNotify => "MotionNotify",
            EventKind::FocusIn => "FocusIn",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A window-system event, already converted out of the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopEvent {
    /// A new child window appeared under the root.
    Created { window: WindowId },
    /// A property changed on `window`.
    PropertyChanged { window: WindowId, property: Atom },
    KeyPressed { window: WindowId, keycode: u8 },
    ButtonPressed { window: WindowId, button: u8 },
    PointerMoved { window: WindowId },
    FocusedIn { window: WindowId },
}

impl DesktopEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            DesktopEvent::Created { .. } => EventKind::CreateNotify,
            DesktopEvent::PropertyChanged { .. } => EventKind::PropertyNotify,
            DesktopEvent::KeyPressed { .. } => EventKind::KeyPress,
            DesktopEvent::ButtonPressed { .. } => EventKind::ButtonPress,
            DesktopEvent::PointerMoved { .. } => EventKind::MotionNotify,
            DesktopEvent::FocusedIn { .. } => EventKind::FocusIn,
        }
    }

    /// The window the event was reported against.
    pub const fn window(&self) -> WindowId {
        match self {
            DesktopEvent::Created { window }
            | DesktopEvent::PropertyChanged { window, .. }
            | DesktopEvent::KeyPressed { window, .. }
            | DesktopEvent::ButtonPressed { window, .. }
            | DesktopEvent::PointerMoved { window }
            | DesktopEvent::FocusedIn { window } => *window,
        }
    }
}
