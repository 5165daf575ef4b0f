//! Turns pointer and keyboard events into one selection model, whichever
//! renderer drew the element under the pointer.
//!
//! Pointer events name the element they hit by id. The id is looked up in the
//! [`ElementRegistry`]: sequence elements start or extend a drag, every other
//! element selects its own range directly.

use seqview_engine::{Point, index_at_offset};
use seqview_protocol::{Selection, ViewMode};
use seqview_render::{ElementGeometry, ElementKind, ElementMeta, ElementRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn command() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Id of the element under the pointer.
    pub target: String,
    pub x: f64,
    pub y: f64,
    pub shift: bool,
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(target: &str, x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            target: target.to_string(),
            x,
            y,
            shift: false,
            time_ms,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Ignored,
    Selected(Selection),
    /// Copy the bases of this selection.
    Copy(Selection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HandlerState {
    Idle,
    Dragging {
        viewer: ViewMode,
        last_index: usize,
        /// Signed bases moved since the drag started, for circular direction.
        travel: i64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ClickTracker {
    target: Option<String>,
    time_ms: u64,
    count: u8,
}

impl ClickTracker {
    fn click(&mut self, target: &str, time_ms: u64, interval_ms: u64) -> u8 {
        let repeated = self.target.as_deref() == Some(target)
            && time_ms.saturating_sub(self.time_ms) <= interval_ms
            && self.count < 3;
        self.count = if repeated { self.count + 1 } else { 1 };
        self.target = Some(target.to_string());
        self.time_ms = time_ms;
        self.count
    }
}

/// Index of the base boundary under the pointer inside `meta`'s element.
pub fn index_under(meta: &ElementMeta, x: f64, y: f64, seq_len: usize) -> usize {
    match meta.geometry {
        ElementGeometry::Linear { left, width } => {
            let bases = meta.range.span(seq_len);
            (meta.range.start + index_at_offset(x - left, width, bases)).min(seq_len)
        }
        ElementGeometry::Circular(frame) => frame.nearest_index(Point::new(x, y)),
        ElementGeometry::None => meta.range.start,
    }
}

/// Shortest signed step from `from` to `to` on a circle of `seq_len` bases.
fn circular_step(from: usize, to: usize, seq_len: usize) -> i64 {
    if seq_len == 0 {
        return 0;
    }
    let len = seq_len as i64;
    let forward = (to as i64 - from as i64).rem_euclid(len);
    if forward * 2 > len { forward - len } else { forward }
}

/// The selected bases, reading through the origin for selections that wrap.
pub fn selected_text(seq: &str, selection: &Selection) -> String {
    if selection.is_cursor() {
        return String::new();
    }
    selection
        .as_range()
        .segments(seq.len())
        .filter_map(|segment| seq.get(segment))
        .collect()
}

#[derive(Debug, Clone)]
pub struct SelectionHandler {
    selection: Selection,
    state: HandlerState,
    clicks: ClickTracker,
    key_travel: i64,
    seq_len: usize,
    bases_per_line: usize,
    click_interval_ms: u64,
}

impl SelectionHandler {
    pub fn new(bases_per_line: usize, click_interval_ms: u64) -> Self {
        Self {
            selection: Selection::default(),
            state: HandlerState::Idle,
            clicks: ClickTracker::default(),
            key_travel: 0,
            seq_len: 0,
            bases_per_line: bases_per_line.max(1),
            click_interval_ms,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, HandlerState::Dragging { .. })
    }

    /// Starts over for a new sequence: cursor at the origin, no drag.
    pub fn reset(&mut self, seq_len: usize) {
        self.seq_len = seq_len;
        self.selection = Selection::default();
        self.state = HandlerState::Idle;
        self.clicks = ClickTracker::default();
        self.key_travel = 0;
    }

    pub fn set_bases_per_line(&mut self, bases_per_line: usize) {
        self.bases_per_line = bases_per_line.max(1);
    }

    /// Replaces the selection, clamping it to the sequence.
    pub fn set_selection(&mut self, selection: Selection) -> Selection {
        self.selection = Selection::new(
            selection.start.min(self.seq_len),
            selection.end.min(self.seq_len),
            selection.clockwise,
        );
        self.key_travel = 0;
        self.selection
    }

    pub fn select_all(&mut self) -> Selection {
        self.set_selection(Selection::new(0, self.seq_len, true))
    }

    pub fn mouse_down(&mut self, registry: &ElementRegistry, event: &PointerEvent) -> Option<Selection> {
        let meta = registry.get(&event.target)?;
        if meta.kind != ElementKind::Seq {
            self.state = HandlerState::Idle;
            return Some(self.set_selection(Selection::from_range(&meta.range)));
        }
        let index = index_under(meta, event.x, event.y, self.seq_len);
        let (start, travel) = if event.shift {
            let start = self.selection.start;
            let travel = match meta.viewer {
                ViewMode::Linear => index as i64 - start as i64,
                ViewMode::Circular => circular_step(start, index, self.seq_len),
            };
            (start, travel)
        } else {
            (index, 0)
        };
        self.state = HandlerState::Dragging {
            viewer: meta.viewer,
            last_index: index,
            travel,
        };
        Some(self.set_selection(Selection::new(start, index, travel >= 0)))
    }

    pub fn mouse_move(&mut self, registry: &ElementRegistry, event: &PointerEvent) -> Option<Selection> {
        let HandlerState::Dragging {
            viewer,
            last_index,
            travel,
        } = self.state
        else {
            return None;
        };
        let meta = registry.get(&event.target).filter(|m| m.kind == ElementKind::Seq)?;
        let index = index_under(meta, event.x, event.y, self.seq_len);
        if index == last_index {
            return None;
        }
        let start = self.selection.start;
        let (travel, clockwise) = match viewer {
            ViewMode::Linear => (0, index >= start),
            ViewMode::Circular => {
                let travel = travel + circular_step(last_index, index, self.seq_len);
                (travel, travel >= 0)
            }
        };
        self.state = HandlerState::Dragging {
            viewer,
            last_index: index,
            travel,
        };
        Some(self.set_selection(Selection::new(start, index, clockwise)))
    }

    /// Ends a drag and counts clicks: a double click selects the element
    /// under the pointer, a triple click selects everything.
    pub fn mouse_up(&mut self, registry: &ElementRegistry, event: &PointerEvent) -> Option<Selection> {
        self.state = HandlerState::Idle;
        let clicks = self
            .clicks
            .click(&event.target, event.time_ms, self.click_interval_ms);
        match clicks {
            2 => {
                let meta = registry.get(&event.target)?;
                Some(self.set_selection(Selection::from_range(&meta.range)))
            }
            3 => Some(self.select_all()),
            _ => None,
        }
    }

    fn wrap_position(&self, position: i64) -> usize {
        let len = self.seq_len as i64;
        let position = if position < 0 {
            position + len
        } else if position >= len + 1 {
            position - len
        } else {
            position
        };
        position.clamp(0, len) as usize
    }

    /// Bases covered by the selection, negative when it runs backwards.
    /// Selections made by pointer or API start with no key travel, so their
    /// extent is taken from the selection itself.
    fn signed_extent(&self) -> i64 {
        if self.key_travel != 0 || self.selection.is_cursor() {
            return self.key_travel;
        }
        let length = self.selection.length(self.seq_len) as i64;
        if self.selection.clockwise { length } else { -length }
    }

    pub fn key_down(&mut self, event: &KeyEvent) -> KeyAction {
        let delta = match event.key {
            Key::ArrowLeft => -1,
            Key::ArrowRight => 1,
            Key::ArrowUp => -(self.bases_per_line as i64),
            Key::ArrowDown => self.bases_per_line as i64,
            Key::Char(c) if event.modifiers.is_command() => {
                return match c.to_ascii_lowercase() {
                    'c' if !self.selection.is_cursor() => KeyAction::Copy(self.selection),
                    'a' => KeyAction::Selected(self.select_all()),
                    _ => KeyAction::Ignored,
                };
            }
            Key::Char(_) => return KeyAction::Ignored,
        };
        if self.seq_len == 0 {
            return KeyAction::Ignored;
        }

        if event.modifiers.shift {
            let start = self.selection.start;
            let end = self.wrap_position(self.selection.end as i64 + delta);
            let travel = self.signed_extent() + delta;
            self.selection = Selection::new(start, end, travel >= 0);
            self.key_travel = travel;
        } else {
            let cursor = self.wrap_position(self.selection.end as i64 + delta);
            self.set_selection(Selection::cursor(cursor));
        }
        KeyAction::Selected(self.selection)
    }
}
