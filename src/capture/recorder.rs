//! Recorder state machine
//!
//! Consumes normalized page events and maintains the action log in the
//! shared session store. The log is re-read from the store at the start of
//! every mutation and written back after it, so entries appended externally
//! (navigation markers in particular) are always observed before the
//! recorder decides whether to coalesce into the tail.

use super::dom::{Dom, NodeId};
use super::events::{should_emit_key_press, EventMeta, PageEvent, Platform};
use super::types::{Action, ElementTarget, ANCHOR_TAG, INPUT_TAG};
use crate::session::log::ActionLog;
use crate::session::store::SessionStore;
use crate::synthesis::selector::gen_selectors;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// `id` of the recorder's own control overlay; events originating inside it
/// are never recorded.
pub const OVERLAY_ROOT_ID: &str = "overlay-controls";

/// Quiet period before a resize burst is committed to the log.
pub const RESIZE_DEBOUNCE_MS: f64 = 300.0;

/// Lifecycle of one recorder instance. Transitions only move forward;
/// `Deregistered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Unregistered,
    Registering,
    Active,
    Deregistered,
}

/// A resize waiting out its debounce window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    width: u32,
    height: u32,
    deadline: f64,
}

type ActionCallback = Box<dyn FnMut(&Action, &[Action]) + Send>;
type InitializedCallback = Box<dyn FnMut(Option<&Action>, &[Action]) + Send>;

/// The event-capture state machine.
pub struct Recorder {
    store: Arc<SessionStore>,
    platform: Platform,
    state: RecorderState,
    overlay_root_id: String,
    resize_debounce_ms: f64,
    /// Event classes already handled in the current tick. Some browsers
    /// deliver overlapping event pairs for one gesture; the set is cleared
    /// when the tick advances.
    handled_classes: HashSet<&'static str>,
    current_tick: u64,
    /// Element the last context menu opened on; hover and await-text
    /// requests relayed through the menu resolve against it.
    context_menu_target: Option<NodeId>,
    pending_resize: Option<PendingResize>,
    on_action: Option<ActionCallback>,
    on_initialized: Option<InitializedCallback>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("state", &self.state)
            .field("platform", &self.platform)
            .field("current_tick", &self.current_tick)
            .field("pending_resize", &self.pending_resize)
            .finish_non_exhaustive()
    }
}

impl Recorder {
    pub fn new(store: Arc<SessionStore>, platform: Platform) -> Self {
        Self {
            store,
            platform,
            state: RecorderState::Unregistered,
            overlay_root_id: OVERLAY_ROOT_ID.to_string(),
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            handled_classes: HashSet::new(),
            current_tick: 0,
            context_menu_target: None,
            pending_resize: None,
            on_action: None,
            on_initialized: None,
        }
    }

    /// Override the overlay root id (configurable for embedders that mount
    /// their controls under a different element).
    pub fn with_overlay_root_id(mut self, id: &str) -> Self {
        self.overlay_root_id = id.to_string();
        self
    }

    /// Override the resize debounce window.
    pub fn with_resize_debounce_ms(mut self, ms: f64) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    /// Called after every committed log mutation with the action that was
    /// appended or updated and the full log.
    pub fn set_on_action(&mut self, callback: impl FnMut(&Action, &[Action]) + Send + 'static) {
        self.on_action = Some(Box::new(callback));
    }

    /// Called once at registration with the most recent non-navigation
    /// action and the full log, so a UI can restore its view of the session.
    pub fn set_on_initialized(
        &mut self,
        callback: impl FnMut(Option<&Action>, &[Action]) + Send + 'static,
    ) {
        self.on_initialized = Some(Box::new(callback));
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Attach to the session. Records the current viewport when it differs
    /// from the last resize already in the log, then reports the restored
    /// log through `on_initialized`.
    pub fn register(&mut self, viewport: Option<(u32, u32)>) {
        if self.state != RecorderState::Unregistered {
            debug!(state = ?self.state, "register ignored");
            return;
        }
        self.state = RecorderState::Registering;

        if let Some((width, height)) = viewport {
            let mut log = self.store.recording();
            if log.last_resize() != Some((width, height)) {
                let action = Action::Resize { width, height };
                log.push(action.clone());
                self.store.set_recording(&log);
                self.notify(&action, &log);
            }
        }

        let log = self.store.recording();
        if let Some(callback) = self.on_initialized.as_mut() {
            callback(log.last_non_navigate(), log.actions());
        }
        self.state = RecorderState::Active;
        info!(actions = log.len(), "recorder registered");
    }

    /// Detach from the session. A resize still inside its debounce window
    /// is discarded, not flushed. Terminal.
    pub fn deregister(&mut self) {
        if self.state == RecorderState::Deregistered {
            return;
        }
        if let Some(pending) = self.pending_resize.take() {
            debug!(?pending, "pending resize discarded at deregister");
        }
        self.state = RecorderState::Deregistered;
        info!("recorder deregistered");
    }

    /// Feed one page event through the state machine.
    pub fn dispatch(&mut self, dom: &Dom, event: PageEvent) {
        if self.state != RecorderState::Active {
            debug!(state = ?self.state, class = event.class(), "event dropped");
            return;
        }
        // A debounced resize whose quiet period has elapsed commits before
        // the next event is interpreted.
        self.poll(event.timestamp());

        match event {
            PageEvent::Click(meta) => self.handle_click(dom, meta),
            PageEvent::ContextMenu(meta) => self.handle_context_menu(dom, meta),
            PageEvent::Input(meta) => self.handle_input(dom, meta),
            PageEvent::KeyDown { meta, key } => {
                if !should_emit_key_press(self.platform, &key) {
                    return;
                }
                self.handle_keydown(dom, meta, &key.key);
            }
            PageEvent::Wheel {
                meta,
                delta_x,
                delta_y,
                page_x_offset,
                page_y_offset,
            } => self.handle_wheel(dom, meta, delta_x, delta_y, page_x_offset, page_y_offset),
            PageEvent::Resize {
                timestamp,
                width,
                height,
            } => {
                self.pending_resize = Some(PendingResize {
                    width,
                    height,
                    deadline: timestamp + self.resize_debounce_ms,
                });
            }
            PageEvent::DragStart { meta, x, y } => self.handle_drag_start(dom, meta, x, y),
            PageEvent::Drop { meta, x, y } => self.handle_drop(dom, meta, x, y),
        }
    }

    /// Commit a pending resize whose debounce deadline has passed. Driven
    /// by event timestamps; embedders with a timer can also call it
    /// directly.
    pub fn poll(&mut self, now: f64) {
        if self.state != RecorderState::Active {
            return;
        }
        let Some(pending) = self.pending_resize else {
            return;
        };
        if now < pending.deadline {
            return;
        }
        self.pending_resize = None;

        let mut log = self.store.recording();
        // Identical back-to-back dimensions are noise (e.g. a transient
        // devtools toggle that restored the viewport).
        if log.last_resize() == Some((pending.width, pending.height)) {
            debug!(width = pending.width, height = pending.height, "resize deduplicated");
            return;
        }
        let action = Action::Resize {
            width: pending.width,
            height: pending.height,
        };
        log.push(action.clone());
        self.store.set_recording(&log);
        self.notify(&action, &log);
    }

    /// Record a hover over the element the context menu last opened on.
    pub fn record_hover(&mut self, dom: &Dom, timestamp: f64) {
        if self.state != RecorderState::Active {
            return;
        }
        let Some(node) = self.context_menu_target else {
            debug!("hover requested without a context-menu target");
            return;
        };
        let target = self.build_target(dom, node, timestamp);
        self.append(Action::Hover { target });
    }

    /// Record an await-text assertion on the text of the element the
    /// context menu last opened on.
    pub fn record_await_text(&mut self, dom: &Dom, timestamp: f64) {
        if self.state != RecorderState::Active {
            return;
        }
        let Some(node) = self.context_menu_target else {
            debug!("await-text requested without a context-menu target");
            return;
        };
        let text = dom.inner_text(node);
        let target = self.build_target(dom, node, timestamp);
        self.append(Action::AwaitText { target, text });
    }

    /// Record a full-page screenshot trigger.
    pub fn record_full_screenshot(&mut self) {
        if self.state != RecorderState::Active {
            return;
        }
        self.append(Action::FullScreenshot);
    }

    // Handlers -------------------------------------------------------------

    fn handle_click(&mut self, dom: &Dom, meta: EventMeta) {
        if !meta.trusted {
            debug!("untrusted click ignored");
            return;
        }
        let Some(node) = self.admit(dom, meta, "click") else {
            return;
        };
        // Clicks on an anchor's children act on the anchor.
        let node = self.retarget_to_anchor(dom, node);
        let target = self.build_target(dom, node, meta.timestamp);
        self.append(Action::Click { target });
    }

    fn handle_context_menu(&mut self, dom: &Dom, meta: EventMeta) {
        let Some(node) = self.admit(dom, meta, "contextmenu") else {
            return;
        };
        self.context_menu_target = Some(node);
    }

    fn handle_input(&mut self, dom: &Dom, meta: EventMeta) {
        let Some(node) = self.admit(dom, meta, "input") else {
            return;
        };
        let value = dom.value(node).unwrap_or("").to_string();
        let target = self.build_target(dom, node, meta.timestamp);

        let mut log = self.store.recording();
        // Keystrokes into the same field collapse into one Input action
        // holding the final value. Identity is the structural selector; a
        // Navigate appended externally breaks the run by not being Input.
        if let Some(Action::Input {
            target: last_target,
            value: last_value,
        }) = log.last_mut()
        {
            if last_target.selectors.general_selector == target.selectors.general_selector {
                *last_value = value;
                last_target.timestamp = target.timestamp;
                let updated = log.last().cloned();
                self.store.set_recording(&log);
                if let Some(action) = updated {
                    self.notify(&action, &log);
                }
                return;
            }
        }
        log.push(Action::Input { target, value });
        self.commit(log);
    }

    fn handle_keydown(&mut self, dom: &Dom, meta: EventMeta, key: &str) {
        let Some(node) = self.admit(dom, meta, "keydown") else {
            return;
        };
        let target = self.build_target(dom, node, meta.timestamp);
        self.append(Action::Keydown {
            target,
            key: key.to_string(),
        });
    }

    fn handle_wheel(
        &mut self,
        dom: &Dom,
        meta: EventMeta,
        delta_x: f64,
        delta_y: f64,
        page_x_offset: f64,
        page_y_offset: f64,
    ) {
        if self.from_overlay(dom, &meta) {
            debug!("wheel inside recorder overlay ignored");
            return;
        }
        if !self.guard(meta.tick, "wheel") {
            return;
        }
        let dx = delta_x.floor() as i64;
        let dy = delta_y.floor() as i64;

        let mut log = self.store.recording();
        // One scroll gesture fires a burst of wheel events; they accumulate
        // into the tail entry while the direction holds on both axes.
        if let Some(Action::Wheel {
            delta_x: last_dx,
            delta_y: last_dy,
            page_x_offset: last_px,
            page_y_offset: last_py,
        }) = log.last_mut()
        {
            if last_dx.signum() == dx.signum() && last_dy.signum() == dy.signum() {
                *last_dx += dx;
                *last_dy += dy;
                *last_px = page_x_offset;
                *last_py = page_y_offset;
                let updated = log.last().cloned();
                self.store.set_recording(&log);
                if let Some(action) = updated {
                    self.notify(&action, &log);
                }
                return;
            }
        }
        log.push(Action::Wheel {
            delta_x: dx,
            delta_y: dy,
            page_x_offset,
            page_y_offset,
        });
        self.commit(log);
    }

    fn handle_drag_start(&mut self, dom: &Dom, meta: EventMeta, x: f64, y: f64) {
        let Some(node) = self.admit(dom, meta, "dragstart") else {
            return;
        };
        let target = self.build_target(dom, node, meta.timestamp);
        self.append(Action::DragAndDrop {
            target,
            source_x: x,
            source_y: y,
            target_x: None,
            target_y: None,
        });
    }

    fn handle_drop(&mut self, dom: &Dom, meta: EventMeta, x: f64, y: f64) {
        if self.from_overlay(dom, &meta) {
            debug!("drop inside recorder overlay ignored");
            return;
        }
        if !self.guard(meta.tick, "drop") {
            return;
        }
        let mut log = self.store.recording();
        // A drop completes the open drag in the tail. Anything else (no
        // drag, or one already completed) makes this drop an orphan.
        match log.last_mut() {
            Some(Action::DragAndDrop {
                target_x: target_x @ None,
                target_y,
                ..
            }) => {
                *target_x = Some(x);
                *target_y = Some(y);
            }
            _ => {
                debug!("orphan drop ignored");
                return;
            }
        }
        let updated = log.last().cloned();
        self.store.set_recording(&log);
        if let Some(action) = updated {
            self.notify(&action, &log);
        }
    }

    // Internals ------------------------------------------------------------

    /// Common admission checks for element-targeted events: a resolved
    /// target outside the recorder's own overlay, not yet handled this tick.
    fn admit(&mut self, dom: &Dom, meta: EventMeta, class: &'static str) -> Option<NodeId> {
        let node = meta.target?;
        if dom.has_ancestor_with_id(node, &self.overlay_root_id) {
            debug!(class, "event inside recorder overlay ignored");
            return None;
        }
        if !self.guard(meta.tick, class) {
            return None;
        }
        Some(node)
    }

    /// Overlay check for events whose target may be absent (wheel, drop):
    /// a missing target means the event came from the page itself.
    fn from_overlay(&self, dom: &Dom, meta: &EventMeta) -> bool {
        meta.target
            .is_some_and(|node| dom.has_ancestor_with_id(node, &self.overlay_root_id))
    }

    /// Duplicate-event guard: at most one event per class per tick.
    fn guard(&mut self, tick: u64, class: &'static str) -> bool {
        if tick != self.current_tick {
            self.handled_classes.clear();
            self.current_tick = tick;
        }
        if self.handled_classes.contains(class) {
            debug!(class, tick, "duplicate event dropped");
            return false;
        }
        self.handled_classes.insert(class);
        true
    }

    fn retarget_to_anchor(&self, dom: &Dom, node: NodeId) -> NodeId {
        if dom.tag_name(node) != ANCHOR_TAG {
            if let Some(parent) = dom.parent(node) {
                if dom.tag_name(parent) == ANCHOR_TAG {
                    return parent;
                }
            }
        }
        node
    }

    fn build_target(&self, dom: &Dom, node: NodeId, timestamp: f64) -> ElementTarget {
        let tag_name = dom.tag_name(node).to_string();
        let input_type = if tag_name == INPUT_TAG {
            dom.attribute(node, "type").map(str::to_string)
        } else {
            None
        };
        let is_password = input_type.as_deref() == Some("password");
        let has_only_text = !dom.has_children(node) && !dom.inner_text(node).is_empty();
        ElementTarget {
            tag_name,
            input_type,
            selectors: gen_selectors(dom, node),
            timestamp,
            is_password,
            has_only_text,
        }
    }

    fn append(&mut self, action: Action) {
        let mut log = self.store.recording();
        log.push(action);
        self.commit(log);
    }

    fn commit(&mut self, log: ActionLog) {
        self.store.set_recording(&log);
        if let Some(action) = log.last().cloned() {
            self.notify(&action, &log);
        }
    }

    fn notify(&mut self, action: &Action, log: &ActionLog) {
        debug!(kind = action.kind(), actions = log.len(), "action recorded");
        if let Some(callback) = self.on_action.as_mut() {
            callback(action, log.actions());
        }
    }
}
