//! X11 implementation of the window-system adapter.

use std::time::{Duration, Instant};

use tracing::trace;
use x11rb::{
    connection::Connection,
    protocol::{
        Event,
        xproto::{self, AtomEnum, ChangeWindowAttributesAux, ConnectionExt},
    },
    rust_connection::RustConnection,
};

use crate::error::{DeskwatchError, DeskwatchResult};
use crate::events::{Atom, DesktopEvent, EventMask, WindowId};
use crate::window_system::WindowSystem;

/// Adapter over an `x11rb` connection.
pub struct X11WindowSystem {
    conn: RustConnection,
    root: WindowId,
    poll_interval: Duration,
    net_wm_name: Atom,
    utf8_string: Atom,
}

impl X11WindowSystem {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect(poll_interval: Duration) -> DeskwatchResult<Self> {
        let (conn, screen_num) = RustConnection::connect(None).map_err(|e| {
            let error_str = e.to_string();
            if error_str.contains("DISPLAY")
                || error_str.contains("display")
                || error_str.contains("No such file or directory")
            {
                DeskwatchError::NoDisplay
            } else {
                DeskwatchError::Platform(error_str)
            }
        })?;
        let root = conn.setup().roots[screen_num].root;

        let net_wm_name = get_atom(&conn, b"_NET_WM_NAME")?;
        let utf8_string = get_atom(&conn, b"UTF8_STRING")?;

        Ok(Self {
            conn,
            root,
            poll_interval,
            net_wm_name,
            utf8_string,
        })
    }
}

impl WindowSystem for X11WindowSystem {
    fn root(&self) -> WindowId {
        self.root
    }

    fn children(&self, window: WindowId) -> DeskwatchResult<Vec<WindowId>> {
        let reply = self
            .conn
            .query_tree(window)
            .map_err(|e| DeskwatchError::Platform(format!("Failed to query tree: {e}")))?
            .reply()
            .map_err(|e| DeskwatchError::Platform(format!("Failed to query tree: {e}")))?;
        Ok(reply.children)
    }

    fn set_event_mask(&self, window: WindowId, mask: EventMask) -> DeskwatchResult<()> {
        self.conn
            .change_window_attributes(
                window,
                &ChangeWindowAttributesAux::new()
                    .event_mask(xproto::EventMask::from(mask.bits())),
            )
            .map_err(|e| DeskwatchError::Platform(e.to_string()))?;
        Ok(())
    }

    fn flush(&self) -> DeskwatchResult<()> {
        self.conn
            .flush()
            .map_err(|e| DeskwatchError::Platform(format!("Failed to flush connection: {e}")))
    }

    fn wait_event(&mut self, timeout: Duration) -> DeskwatchResult<Option<DesktopEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(event) = self.poll_event()? {
                return Ok(Some(event));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            std::thread::sleep(self.poll_interval.min(remaining));
        }
    }

    fn poll_event(&mut self) -> DeskwatchResult<Option<DesktopEvent>> {
        // Events we never asked a conversion for (gravity, reparent, ...)
        // are skipped, not surfaced.
        loop {
            let event = self
                .conn
                .poll_for_event()
                .map_err(|e| DeskwatchError::Platform(e.to_string()))?;
            match event {
                Some(event) => {
                    if let Some(converted) = convert_event(&event) {
                        return Ok(Some(converted));
                    }
                    trace!(?event, "skipping unhandled event type");
                }
                None => return Ok(None),
            }
        }
    }

    fn intern_atom(&self, name: &str) -> DeskwatchResult<Atom> {
        get_atom(&self.conn, name.as_bytes())
    }

    fn window_property(
        &self,
        window: WindowId,
        property: Atom,
    ) -> DeskwatchResult<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ANY, 0, 1)
            .map_err(|e| DeskwatchError::Platform(format!("Failed to get property: {e}")))?
            .reply()
            .map_err(|e| DeskwatchError::Platform(format!("Failed to get property: {e}")))?;
        Ok(reply.value32().and_then(|mut v| v.next()))
    }

    fn window_exists(&self, window: WindowId) -> bool {
        self.conn
            .get_window_attributes(window)
            .is_ok_and(|cookie| cookie.reply().is_ok())
    }

    fn window_title(&self, window: WindowId) -> Option<String> {
        // Try UTF‑8 first, then fall back to the legacy WM_NAME.
        match try_get_property_string(&self.conn, window, self.net_wm_name, self.utf8_string) {
            Ok(Some(title)) => Some(title),
            _ => try_get_property_string(
                &self.conn,
                window,
                AtomEnum::WM_NAME.into(),
                AtomEnum::STRING.into(),
            )
            .ok()
            .flatten(),
        }
    }

    fn window_class(&self, window: WindowId) -> Option<(String, String)> {
        // WM_CLASS holds two NUL-terminated strings: instance, then class.
        let raw = try_get_property_string(
            &self.conn,
            window,
            AtomEnum::WM_CLASS.into(),
            AtomEnum::STRING.into(),
        )
        .ok()
        .flatten()?;
        let mut parts = raw.split('\0');
        let instance = parts.next()?.to_string();
        let class = parts.next().unwrap_or_default().to_string();
        Some((instance, class))
    }
}

fn convert_event(event: &Event) -> Option<DesktopEvent> {
    match event {
        Event::CreateNotify(e) => Some(DesktopEvent::Created { window: e.window }),
        Event::PropertyNotify(e) => Some(DesktopEvent::PropertyChanged {
            window: e.window,
            property: e.atom,
        }),
        Event::KeyPress(e) => Some(DesktopEvent::KeyPressed {
            window: e.event,
            keycode: e.detail,
        }),
        Event::ButtonPress(e) => Some(DesktopEvent::ButtonPressed {
            window: e.event,
            button: e.detail,
        }),
        Event::MotionNotify(e) => Some(DesktopEvent::PointerMoved { window: e.event }),
        Event::FocusIn(e) => Some(DesktopEvent::FocusedIn { window: e.event }),
        _ => None,
    }
}

/// Get an X11 atom by name.
fn get_atom(conn: &RustConnection, name: &[u8]) -> DeskwatchResult<Atom> {
    let cookie = conn
        .intern_atom(false, name)
        .map_err(|e| DeskwatchError::Platform(e.to_string()))?;

    let reply = cookie
        .reply()
        .map_err(|e| DeskwatchError::Platform(e.to_string()))?;

    Ok(reply.atom)
}

/// Helper to get a string property from X11.
fn try_get_property_string(
    conn: &RustConnection,
    window: WindowId,
    property: u32,
    property_type: u32,
) -> DeskwatchResult<Option<String>> {
    let cookie = conn
        .get_property(false, window, property, property_type, 0, u32::MAX)
        .map_err(|e| DeskwatchError::Platform(format!("Failed to get property: {e}")))?;

    let reply = cookie
        .reply()
        .map_err(|e| DeskwatchError::Platform(format!("Failed to get property: {e}")))?;

    if reply.value_len > 0 {
        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    } else {
        Ok(None)
    }
}
