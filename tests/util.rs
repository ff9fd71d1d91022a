//! Common test utilities: a scripted window system and recording handlers.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use deskwatch::{
    Atom, DeskwatchError, DeskwatchResult, DesktopEvent, EventHandler, EventKind, EventMask,
    WindowId, WindowSystem,
};

pub const ROOT: WindowId = 1;
pub const NET_ACTIVE_WINDOW: Atom = 100;
pub const NET_WM_NAME: Atom = 101;
pub const WM_NAME: Atom = 102;

/// Scripted in-memory window system.
///
/// Events are served from a queue; once the queue runs dry the fake sets
/// the dispatcher's stop flag, so `Dispatcher::run` sees exactly one idle
/// pass (the drained wait reports a timeout) and then exits.
pub struct FakeWindowSystem {
    pub children: Vec<WindowId>,
    pub windows: HashSet<WindowId>,
    /// Value of the active-window hint on the root; `None` = property unset.
    pub active: Option<WindowId>,
    pub titles: HashMap<WindowId, String>,
    queue: VecDeque<DesktopEvent>,
    pub mask_calls: RefCell<Vec<(WindowId, EventMask)>>,
    stop: Arc<AtomicBool>,
}

impl FakeWindowSystem {
    pub fn new(events: Vec<DesktopEvent>) -> (Self, Arc<AtomicBool>) {
        let stop = Arc::new(AtomicBool::new(false));
        let fake = Self {
            children: Vec::new(),
            windows: HashSet::from([ROOT]),
            active: None,
            titles: HashMap::new(),
            queue: events.into(),
            mask_calls: RefCell::new(Vec::new()),
            stop: Arc::clone(&stop),
        };
        (fake, stop)
    }

    /// Add a window that exists and report it focused.
    pub fn focus_window(&mut self, window: WindowId, title: &str) {
        self.windows.insert(window);
        self.titles.insert(window, title.to_string());
        self.active = Some(window);
    }
}

impl WindowSystem for FakeWindowSystem {
    fn root(&self) -> WindowId {
        ROOT
    }

    fn children(&self, _window: WindowId) -> DeskwatchResult<Vec<WindowId>> {
        Ok(self.children.clone())
    }

    fn set_event_mask(&self, window: WindowId, mask: EventMask) -> DeskwatchResult<()> {
        self.mask_calls.borrow_mut().push((window, mask));
        Ok(())
    }

    fn flush(&self) -> DeskwatchResult<()> {
        Ok(())
    }

    fn wait_event(&mut self, _timeout: Duration) -> DeskwatchResult<Option<DesktopEvent>> {
        match self.queue.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                // Timed out with nothing pending; let the loop run its idle
                // pass once and then observe the stop flag.
                self.stop.store(true, Ordering::Release);
                Ok(None)
            }
        }
    }

    fn poll_event(&mut self) -> DeskwatchResult<Option<DesktopEvent>> {
        Ok(self.queue.pop_front())
    }

    fn intern_atom(&self, name: &str) -> DeskwatchResult<Atom> {
        Ok(match name {
            "_NET_ACTIVE_WINDOW" => NET_ACTIVE_WINDOW,
            "_NET_WM_NAME" => NET_WM_NAME,
            "WM_NAME" => WM_NAME,
            _ => 999,
        })
    }

    fn window_property(
        &self,
        window: WindowId,
        property: Atom,
    ) -> DeskwatchResult<Option<u32>> {
        if window == ROOT && property == NET_ACTIVE_WINDOW {
            return Ok(self.active);
        }
        Ok(None)
    }

    fn window_exists(&self, window: WindowId) -> bool {
        self.windows.contains(&window)
    }

    fn window_title(&self, window: WindowId) -> Option<String> {
        self.titles.get(&window).cloned()
    }

    fn window_class(&self, window: WindowId) -> Option<(String, String)> {
        self.titles
            .get(&window)
            .map(|title| (title.to_lowercase(), title.clone()))
    }
}

/// What a recording handler saw, shared with the test body.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Handler that appends `name:event:window`, `name:idle`, and `name:close`
/// entries to a shared log. Optionally fails every hook after recording.
pub struct RecordingHandler {
    name: &'static str,
    mask: EventMask,
    subscriptions: &'static [EventKind],
    log: Log,
    failing: bool,
}

impl RecordingHandler {
    pub fn new(
        name: &'static str,
        mask: EventMask,
        subscriptions: &'static [EventKind],
        log: &Log,
    ) -> Box<Self> {
        Box::new(Self {
            name,
            mask,
            subscriptions,
            log: Rc::clone(log),
            failing: false,
        })
    }

    pub fn failing(
        name: &'static str,
        mask: EventMask,
        subscriptions: &'static [EventKind],
        log: &Log,
    ) -> Box<Self> {
        let mut handler = Self::new(name, mask, subscriptions, log);
        handler.failing = true;
        handler
    }

    fn record(&self, entry: String) -> DeskwatchResult<()> {
        self.log.borrow_mut().push(entry);
        if self.failing {
            Err(DeskwatchError::new(format!("{} broke", self.name)))
        } else {
            Ok(())
        }
    }
}

impl EventHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn mask(&self) -> EventMask {
        self.mask
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        self.subscriptions
    }

    fn handle(
        &mut self,
        _ws: &dyn WindowSystem,
        event: &DesktopEvent,
        focused: WindowId,
    ) -> DeskwatchResult<()> {
        self.record(format!("{}:{}:{}", self.name, event.kind(), focused))
    }

    fn idle(&mut self) -> DeskwatchResult<()> {
        self.record(format!("{}:idle", self.name))
    }

    fn close(&mut self) -> DeskwatchResult<()> {
        self.record(format!("{}:close", self.name))
    }
}
