//! Records window focus changes and keyboard activity to CSV.

use std::time::Duration;

use chrono::Local;

use crate::csv_writer::CsvWriter;
use crate::error::DeskwatchResult;
use crate::events::{Atom, DesktopEvent, EventKind, EventMask, WindowId};
use crate::handler::{EventHandler, HandlerContext};
use crate::throttle::Throttle;
use crate::window_system::WindowSystem;

const COLUMNS: &[&str] = &[
    "wm_instance",
    "wm_class",
    "window_title",
    "event_type",
    "time",
];

/// Built-in handler writing one CSV row per focus/title change and at most
/// one per second for key presses.
pub struct ActivityRecorder {
    // Property changes worth a row: active window, EWMH title, legacy title.
    atoms: [Atom; 3],
    writer: CsvWriter,
    last_window: Option<(WindowId, Option<String>)>,
    key_throttle: Throttle,
}

impl ActivityRecorder {
    /// Constructor registered with the handler registry.
    pub fn create(
        ws: &dyn WindowSystem,
        ctx: &HandlerContext,
    ) -> DeskwatchResult<Box<dyn EventHandler>> {
        let atoms = [
            ws.intern_atom("_NET_ACTIVE_WINDOW")?,
            ws.intern_atom("_NET_WM_NAME")?,
            ws.intern_atom("WM_NAME")?,
        ];
        let writer = CsvWriter::new(ctx.config_dir.join("data"), COLUMNS)?;
        Ok(Box::new(Self {
            atoms,
            writer,
            last_window: None,
            key_throttle: Throttle::new(Duration::from_secs(1)),
        }))
    }

    /// Record any window focus or title change.
    fn on_property_notify(
        &mut self,
        ws: &dyn WindowSystem,
        property: Atom,
        focused: WindowId,
    ) -> DeskwatchResult<()> {
        if !self.atoms.contains(&property) {
            return Ok(());
        }
        let this_window = (focused, ws.window_title(focused));
        if self.last_window.as_ref() == Some(&this_window) {
            return Ok(());
        }
        let row = make_row(ws, EventKind::PropertyNotify, focused);
        self.last_window = Some(this_window);
        self.write_row(&row)
    }

    /// Record at most one keypress per second for any window.
    fn on_key_press(&mut self, ws: &dyn WindowSystem, focused: WindowId) -> DeskwatchResult<()> {
        match self
            .key_throttle
            .call(|| make_row(ws, EventKind::KeyPress, focused))
        {
            Some(row) => self.write_row(&row),
            None => Ok(()),
        }
    }

    fn write_row(&mut self, row: &[String; 5]) -> DeskwatchResult<()> {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        self.writer.write(&fields)
    }
}

fn make_row(ws: &dyn WindowSystem, kind: EventKind, window: WindowId) -> [String; 5] {
    let (instance, class) = ws.window_class(window).unwrap_or_default();
    let title = ws.window_title(window).unwrap_or_default();
    [
        instance,
        class,
        title,
        kind.name().to_string(),
        Local::now().to_rfc3339(),
    ]
}

impl EventHandler for ActivityRecorder {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn mask(&self) -> EventMask {
        EventMask::PROPERTY_CHANGE | EventMask::KEY_PRESS
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::PropertyNotify, EventKind::KeyPress]
    }

    fn handle(
        &mut self,
        ws: &dyn WindowSystem,
        event: &DesktopEvent,
        focused: WindowId,
    ) -> DeskwatchResult<()> {
        match event {
            DesktopEvent::PropertyChanged { property, .. } => {
                self.on_property_notify(ws, *property, focused)
            }
            DesktopEvent::KeyPressed { .. } => self.on_key_press(ws, focused),
            _ => Ok(()),
        }
    }

    fn idle(&mut self) -> DeskwatchResult<()> {
        self.writer.flush_or_rotate()
    }

    fn close(&mut self) -> DeskwatchResult<()> {
        self.writer.close()
    }
}
