//! Gesture dispatch: classifies raw pointer and touch streams into viewport,
//! selection, and transform operations on a [`Board`].
//!
//! Exactly one gesture descriptor is live at a time. Starting a new gesture
//! silently cancels the previous one, discarding its provisional state, so
//! two interactions can never write to the document at once. Transform frames
//! go through [`Board::preview`]; a gesture settles with one commit on
//! release.
//!
//! Element bodies are hit-tested here in world space. Resize, rotate, and
//! endpoint handles are drawn by the host, which routes presses on them
//! through the `begin_*` entry points.

use kurbo::{Point, Rect};

use crate::board::{Board, InteractionMode};
use crate::elements::{ArrowEnd, CanvasElement, ElementId};
use crate::group_transform::{
    GroupKind, GroupManipulation, apply_group_resize, apply_group_rotate, selection_bounds,
};
use crate::manipulate::{
    Manipulation, ManipulationKind, apply_endpoint, apply_move, apply_resize, apply_rotate,
};

/// Screen distance a touch may wander before it stops being a tap.
pub const TAP_SLOP: f64 = 5.0;

/// How long a motionless touch holds before the context menu opens.
pub const LONG_PRESS_MS: f64 = 500.0;

const DOUBLE_CLICK_MS: f64 = 500.0;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Spacebar held; turns a left drag into a pan.
    pub space: bool,
}

/// Keys the engine reacts to. The host maps its own event names onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Z,
    Y,
    G,
}

/// Asks the host to open its context menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuRequest {
    /// Screen point to anchor the menu at.
    pub screen: Point,
    /// World point under the press.
    pub position: Point,
    /// The element under the press, if any.
    pub element_id: Option<ElementId>,
}

/// The marquee rectangle while it is being swept, in screen space.
#[derive(Debug, Clone, Copy)]
pub struct MarqueeRect {
    pub start: Point,
    pub current: Point,
}

impl MarqueeRect {
    /// Normalized screen rectangle, for the host's overlay.
    pub fn to_screen_rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    fn to_world_rect(&self, board: &Board) -> Rect {
        Rect::from_points(
            board.viewport.screen_to_world(self.start),
            board.viewport.screen_to_world(self.current),
        )
    }
}

/// The single live interaction.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    Pan {
        last_screen: Point,
    },
    Marquee(MarqueeRect),
    Manipulate(Manipulation),
    Group(GroupManipulation),
    /// A single touch that has not yet crossed the slop or the long-press
    /// deadline, so it could still become anything.
    TouchPending {
        start_screen: Point,
        deadline: f64,
        fired: bool,
    },
    Pinch {
        last_a: Point,
        last_b: Point,
    },
}

/// Translates raw input events into board operations.
pub struct Dispatcher {
    gesture: Gesture,
    /// Set when a gesture asks for the context menu; the host takes it.
    pub pending_context_menu: Option<ContextMenuRequest>,
    /// Set when a gesture asks to open a note editor; the host takes it.
    pub pending_note_edit: Option<ElementId>,
    last_press: Option<(f64, Point)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            pending_context_menu: None,
            pending_note_edit: None,
            last_press: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    /// Whether an element or group transform is in flight.
    pub fn is_manipulating(&self) -> bool {
        matches!(self.gesture, Gesture::Manipulate(_) | Gesture::Group(_))
    }

    /// The live marquee, for the host's selection overlay.
    pub fn marquee(&self) -> Option<MarqueeRect> {
        match self.gesture {
            Gesture::Marquee(rect) => Some(rect),
            _ => None,
        }
    }

    /// Abort whatever is in flight, discarding provisional state without a
    /// commit.
    pub fn cancel(&mut self, board: &mut Board) {
        if self.is_manipulating() {
            log::debug!("Discarding in-flight transform");
            board.cancel_preview();
        }
        self.gesture = Gesture::Idle;
    }

    fn register_press(&mut self, now: f64, screen: Point) -> bool {
        let double = match self.last_press {
            Some((at, point)) => {
                now - at < DOUBLE_CLICK_MS && (screen - point).hypot() < DOUBLE_CLICK_DISTANCE
            }
            None => false,
        };
        self.last_press = if double { None } else { Some((now, screen)) };
        double
    }

    // ---- mouse ------------------------------------------------------------

    pub fn on_mouse_down(
        &mut self,
        board: &mut Board,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: f64,
    ) {
        self.cancel(board);

        match button {
            MouseButton::Middle => {
                self.gesture = Gesture::Pan {
                    last_screen: screen,
                };
            }
            MouseButton::Right => {
                if board.outpaint().is_some() {
                    return;
                }
                let position = board.viewport.screen_to_world(screen);
                let element_id = board.element_at(position).map(CanvasElement::id);
                self.pending_context_menu = Some(ContextMenuRequest {
                    screen,
                    position,
                    element_id,
                });
            }
            MouseButton::Left => {
                if modifiers.space {
                    self.gesture = Gesture::Pan {
                        last_screen: screen,
                    };
                    return;
                }
                if board.outpaint().is_some() {
                    return;
                }
                let double = self.register_press(now, screen);
                let world = board.viewport.screen_to_world(screen);
                match board.element_at(world).map(CanvasElement::id) {
                    Some(id) => {
                        if double && matches!(board.element(id), Some(CanvasElement::Note(_))) {
                            board.selection.select_only(id);
                            self.pending_note_edit = Some(id);
                            return;
                        }
                        self.begin_move(board, id, screen, modifiers.shift);
                    }
                    None => {
                        if !modifiers.shift {
                            board.selection.clear();
                        }
                        self.gesture = Gesture::Marquee(MarqueeRect {
                            start: screen,
                            current: screen,
                        });
                    }
                }
            }
        }
    }

    pub fn on_mouse_move(&mut self, board: &mut Board, screen: Point) {
        self.pointer_frame(board, screen);
    }

    pub fn on_mouse_up(&mut self, board: &mut Board, screen: Point, modifiers: Modifiers) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Marquee(mut rect) => {
                rect.current = screen;
                board.marquee_select(rect.to_world_rect(board), modifiers.shift);
            }
            Gesture::Manipulate(_) | Gesture::Group(_) => {
                board.commit_preview();
            }
            Gesture::Idle | Gesture::Pan { .. } | Gesture::TouchPending { .. } | Gesture::Pinch { .. } => {}
        }
    }

    /// Wheel zoom anchored at the cursor. Works during any gesture; active
    /// transforms keep the viewport they froze at press time.
    pub fn on_wheel(&mut self, board: &mut Board, screen: Point, delta_y: f64) {
        board.viewport.wheel_zoom(screen, delta_y);
    }

    // ---- touch ------------------------------------------------------------

    pub fn on_touch_start(&mut self, board: &mut Board, touches: &[Point], now: f64) {
        match touches {
            [] => {}
            [touch] => {
                self.cancel(board);
                let world = board.viewport.screen_to_world(*touch);
                board.record_pointer(world);
                self.gesture = Gesture::TouchPending {
                    start_screen: *touch,
                    deadline: now + LONG_PRESS_MS,
                    fired: false,
                };
            }
            // A second finger always means pinch, whatever was in flight.
            [a, b, ..] => {
                self.cancel(board);
                self.gesture = Gesture::Pinch {
                    last_a: *a,
                    last_b: *b,
                };
            }
        }
    }

    pub fn on_touch_move(&mut self, board: &mut Board, touches: &[Point]) {
        match touches {
            [] => {}
            [touch] => {
                if let Gesture::TouchPending { start_screen, .. } = self.gesture {
                    if (*touch - start_screen).hypot() > TAP_SLOP {
                        self.classify_touch_drag(board, start_screen, *touch);
                    }
                }
                self.pointer_frame(board, *touch);
            }
            [a, b, ..] => match &mut self.gesture {
                Gesture::Pinch { last_a, last_b } => {
                    let previous = (*last_a - *last_b).hypot();
                    let current = (*a - *b).hypot();
                    *last_a = *a;
                    *last_b = *b;
                    if previous > 0.0 {
                        board.viewport.zoom_at(a.midpoint(*b), current / previous);
                    }
                }
                _ => {
                    self.cancel(board);
                    self.gesture = Gesture::Pinch {
                        last_a: *a,
                        last_b: *b,
                    };
                }
            },
        }
    }

    pub fn on_touch_end(&mut self, board: &mut Board) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::TouchPending {
                start_screen,
                fired,
                ..
            } => {
                // A tap, unless the long press already fired the menu.
                if fired {
                    return;
                }
                let world = board.viewport.screen_to_world(start_screen);
                match board.element_at(world).map(CanvasElement::id) {
                    Some(id) => {
                        board.click_element(id, false);
                        if matches!(board.element(id), Some(CanvasElement::Note(_))) {
                            self.pending_note_edit = Some(id);
                        }
                    }
                    None => board.selection.clear(),
                }
            }
            Gesture::Marquee(rect) => {
                board.marquee_select(rect.to_world_rect(board), false);
            }
            Gesture::Manipulate(_) | Gesture::Group(_) => {
                board.commit_preview();
            }
            Gesture::Idle | Gesture::Pan { .. } | Gesture::Pinch { .. } => {}
        }
    }

    /// Advance time-based classification. Fires the long-press context menu
    /// when a touch has held still past its deadline.
    pub fn tick(&mut self, board: &mut Board, now: f64) {
        if let Gesture::TouchPending {
            start_screen,
            deadline,
            fired,
        } = &mut self.gesture
        {
            if !*fired && now >= *deadline {
                *fired = true;
                let position = board.viewport.screen_to_world(*start_screen);
                let element_id = board.element_at(position).map(CanvasElement::id);
                self.pending_context_menu = Some(ContextMenuRequest {
                    screen: *start_screen,
                    position,
                    element_id,
                });
            }
        }
    }

    // ---- handle entry points ----------------------------------------------

    /// Press on an element body: select it, then start dragging the whole
    /// selection. Returns false when the click left the element unselected.
    pub fn begin_move(
        &mut self,
        board: &mut Board,
        id: ElementId,
        screen: Point,
        additive: bool,
    ) -> bool {
        self.cancel(board);
        board.click_element(id, additive);
        if !board.selection.contains(id) {
            return false;
        }
        self.gesture = Gesture::Manipulate(Manipulation::new(
            id,
            ManipulationKind::Move,
            screen,
            board.viewport,
            board.selected_clones(),
        ));
        true
    }

    /// Press on the corner resize handle.
    pub fn begin_resize(&mut self, board: &mut Board, id: ElementId, screen: Point) -> bool {
        self.cancel(board);
        let Some(element) = board.element(id) else {
            return false;
        };
        if !element.supports_corner_resize() {
            return false;
        }
        self.gesture = Gesture::Manipulate(Manipulation::new(
            id,
            ManipulationKind::Resize,
            screen,
            board.viewport,
            vec![element.clone()],
        ));
        true
    }

    /// Press on the rotation handle.
    pub fn begin_rotate(&mut self, board: &mut Board, id: ElementId, screen: Point) -> bool {
        self.cancel(board);
        let Some(element) = board.element(id) else {
            return false;
        };
        self.gesture = Gesture::Manipulate(Manipulation::new(
            id,
            ManipulationKind::Rotate,
            screen,
            board.viewport,
            vec![element.clone()],
        ));
        true
    }

    /// Press on an arrow endpoint handle.
    pub fn begin_endpoint(
        &mut self,
        board: &mut Board,
        id: ElementId,
        end: ArrowEnd,
        screen: Point,
    ) -> bool {
        self.cancel(board);
        let Some(element @ CanvasElement::Arrow(_)) = board.element(id) else {
            return false;
        };
        self.gesture = Gesture::Manipulate(Manipulation::new(
            id,
            ManipulationKind::Endpoint(end),
            screen,
            board.viewport,
            vec![element.clone()],
        ));
        true
    }

    /// Press on the whole-selection rotate handle.
    pub fn begin_group_rotate(&mut self, board: &mut Board, screen: Point) -> bool {
        self.begin_group(board, GroupKind::Rotate, screen)
    }

    /// Press on the whole-selection resize handle.
    pub fn begin_group_resize(&mut self, board: &mut Board, screen: Point) -> bool {
        self.begin_group(board, GroupKind::Resize, screen)
    }

    fn begin_group(&mut self, board: &mut Board, kind: GroupKind, screen: Point) -> bool {
        self.cancel(board);
        let originals = board.selected_clones();
        let Some(bounds) = selection_bounds(&originals) else {
            return false;
        };
        self.gesture = Gesture::Group(GroupManipulation::new(
            kind,
            screen,
            board.viewport,
            bounds,
            originals,
        ));
        true
    }

    // ---- keyboard ---------------------------------------------------------

    /// Apply a shortcut. Returns true when the combination maps to an engine
    /// action, whether or not it changed anything.
    pub fn handle_key(&mut self, board: &mut Board, key: Key, modifiers: Modifiers) -> bool {
        if board.outpaint().is_some() {
            return false;
        }
        match key {
            Key::Delete | Key::Backspace => {
                self.cancel(board);
                board.delete_selected();
                true
            }
            Key::Escape => {
                self.cancel(board);
                true
            }
            Key::Z if modifiers.ctrl => {
                self.cancel(board);
                if modifiers.shift {
                    board.redo();
                } else {
                    board.undo();
                }
                true
            }
            Key::Y if modifiers.ctrl => {
                self.cancel(board);
                board.redo();
                true
            }
            Key::G if modifiers.ctrl => {
                if modifiers.shift {
                    board.ungroup_selected();
                } else {
                    board.group_selected();
                }
                true
            }
            _ => false,
        }
    }

    // ---- shared frame handling --------------------------------------------

    /// Decide what a single touch becomes once it crosses the slop: dragging
    /// an element, sweeping a marquee (select mode), or panning (pan mode).
    fn classify_touch_drag(&mut self, board: &mut Board, start_screen: Point, current: Point) {
        let world = board.viewport.screen_to_world(start_screen);
        if let Some(id) = board.element_at(world).map(CanvasElement::id) {
            self.begin_move(board, id, start_screen, false);
            return;
        }
        match board.mode() {
            InteractionMode::Select => {
                if board.outpaint().is_none() {
                    board.selection.clear();
                    self.gesture = Gesture::Marquee(MarqueeRect {
                        start: start_screen,
                        current,
                    });
                } else {
                    self.gesture = Gesture::Idle;
                }
            }
            InteractionMode::Pan => {
                // Start from the press point so the canvas tracks the finger
                // without eating the slop distance.
                self.gesture = Gesture::Pan {
                    last_screen: start_screen,
                };
            }
        }
    }

    fn pointer_frame(&mut self, board: &mut Board, screen: Point) {
        let world = board.viewport.screen_to_world(screen);
        board.record_pointer(world);

        match &mut self.gesture {
            Gesture::Idle | Gesture::TouchPending { .. } | Gesture::Pinch { .. } => {}
            Gesture::Pan { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                board.viewport.pan_by(delta);
            }
            Gesture::Marquee(rect) => {
                rect.current = screen;
            }
            Gesture::Manipulate(manipulation) => {
                manipulation.moved = true;
                let updates = manipulation_frame(manipulation, screen, board.snap_to_grid());
                board.preview(updates);
            }
            Gesture::Group(group) => {
                group.moved = true;
                let updates = match group.kind {
                    GroupKind::Rotate => apply_group_rotate(
                        &group.originals,
                        group.start_bounds.center(),
                        group.start_world(),
                        group.cursor_world(screen),
                    ),
                    GroupKind::Resize => {
                        match apply_group_resize(
                            &group.originals,
                            group.start_bounds,
                            group.delta_world(screen),
                        ) {
                            Some(updates) => updates,
                            // Degenerate ratio: drop the frame, keep the last
                            // valid preview.
                            None => {
                                log::debug!("Dropping group resize frame with degenerate ratio");
                                return;
                            }
                        }
                    }
                };
                board.preview(updates);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn manipulation_frame(
    manipulation: &Manipulation,
    screen: Point,
    snap_enabled: bool,
) -> Vec<CanvasElement> {
    match manipulation.kind {
        ManipulationKind::Move => {
            let delta = manipulation.delta_world(screen);
            manipulation
                .originals
                .iter()
                .map(|el| apply_move(el, delta, snap_enabled))
                .collect()
        }
        ManipulationKind::Resize => {
            let delta = manipulation.delta_world(screen);
            manipulation
                .originals
                .iter()
                .map(|el| apply_resize(el, delta))
                .collect()
        }
        ManipulationKind::Rotate => {
            let start = manipulation.start_world();
            let cursor = manipulation.cursor_world(screen);
            manipulation
                .originals
                .iter()
                .map(|el| apply_rotate(el, start, cursor))
                .collect()
        }
        ManipulationKind::Endpoint(end) => {
            let delta = manipulation.delta_world(screen);
            manipulation
                .originals
                .iter()
                .map(|el| apply_endpoint(el, end, delta))
                .collect()
        }
    }
}
