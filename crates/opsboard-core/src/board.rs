//! The board: the element collection under history, the selection, the
//! viewport, and the operations a host shell invokes on them.
//!
//! Interactive gestures write through [`Board::preview`] and settle with a
//! single [`Board::commit_preview`] on release, so an entire drag collapses
//! into one undo step. Discrete operations (add, delete, layout, grouping)
//! commit one history entry directly.

use kurbo::{Point, Rect, Size, Vec2};
use uuid::Uuid;

use crate::assist::{
    self, AnalysisResult, AssistError, AssistResult, AnalysisStore, FrameHandle, GeneratedImage,
    GenerationRequest, OutpaintFrame, OutpaintSession,
};
use crate::elements::{CanvasElement, ElementId, EquipmentStatus, GroupId, TextAlign};
use crate::factory::{self, GENERATED_IMAGE_MAX_DIMENSION, IMAGE_MAX_DIMENSION, PLACEMENT_OFFSET};
use crate::history::History;
use crate::layout::{self, AlignKind, DistributeAxis};
use crate::selection::{self, GroupInfo, SelectionSet};
use crate::transfer::{self, ClipboardPayload, PastedText, TransferResult};
use crate::viewport::Viewport;

/// How a drag over empty canvas is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Dragging empty space pans the viewport.
    #[default]
    Pan,
    /// Dragging empty space sweeps a marquee selection.
    Select,
}

/// An image handed in by the host, with its natural pixel dimensions.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub src: String,
    pub width: f64,
    pub height: f64,
}

/// Everything the engine owns for one open board.
#[derive(Debug, Clone)]
pub struct Board {
    history: History<Vec<CanvasElement>>,
    pub selection: SelectionSet,
    pub viewport: Viewport,
    pub analysis: AnalysisStore,
    outpaint: Option<OutpaintSession>,
    /// Pre-gesture snapshot, captured on the first preview frame. Restored
    /// under the committed entry so undo lands before the gesture began.
    preview_base: Option<Vec<CanvasElement>>,
    next_z: i64,
    mode: InteractionMode,
    snap_to_grid: bool,
    last_pointer_world: Option<Point>,
}

fn next_z_after(elements: &[CanvasElement]) -> i64 {
    elements.iter().map(CanvasElement::z_index).fold(0, i64::max) + 1
}

impl Board {
    /// A board seeded with the starter station layout.
    pub fn new(viewport_size: Size) -> Self {
        Self::with_elements(factory::starter_layout(), viewport_size)
    }

    /// A board over an existing element collection.
    pub fn with_elements(elements: Vec<CanvasElement>, viewport_size: Size) -> Self {
        let next_z = next_z_after(&elements);
        Self {
            history: History::new(elements),
            selection: SelectionSet::new(),
            viewport: Viewport::new(viewport_size),
            analysis: AnalysisStore::new(),
            outpaint: None,
            preview_base: None,
            next_z,
            mode: InteractionMode::default(),
            snap_to_grid: true,
            last_pointer_world: None,
        }
    }

    pub fn elements(&self) -> &[CanvasElement] {
        self.history.present()
    }

    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements().iter().find(|el| el.id() == id)
    }

    /// Selected elements in document order.
    pub fn selected_elements(&self) -> Vec<&CanvasElement> {
        self.elements()
            .iter()
            .filter(|el| self.selection.contains(el.id()))
            .collect()
    }

    /// Owned copies of the selection, for freezing gesture originals.
    pub fn selected_clones(&self) -> Vec<CanvasElement> {
        self.elements()
            .iter()
            .filter(|el| self.selection.contains(el.id()))
            .cloned()
            .collect()
    }

    /// The topmost element under a world point. Equal z resolves to the
    /// later element in document order.
    pub fn element_at(&self, world: Point) -> Option<&CanvasElement> {
        self.elements()
            .iter()
            .filter(|el| el.hit_test(world))
            .max_by_key(|el| el.z_index())
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    /// Remember the pointer's world position; new elements cascade off it
    /// when nothing is selected.
    pub fn record_pointer(&mut self, world: Point) {
        self.last_pointer_world = Some(world);
    }

    pub fn last_pointer(&self) -> Option<Point> {
        self.last_pointer_world
    }

    // ---- history ----------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_preview();
        let moved = self.history.undo();
        if moved {
            self.selection.prune(self.history.present());
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_preview();
        let moved = self.history.redo();
        if moved {
            self.selection.prune(self.history.present());
        }
        moved
    }

    fn merged(&self, updates: Vec<CanvasElement>) -> Vec<CanvasElement> {
        let mut next = self.history.present().clone();
        for update in updates {
            if let Some(slot) = next.iter_mut().find(|el| el.id() == update.id()) {
                *slot = update;
            }
        }
        next
    }

    /// Apply provisional updates without creating an undo point. The first
    /// frame of a gesture captures the pre-gesture snapshot.
    pub fn preview(&mut self, updates: Vec<CanvasElement>) {
        if self.preview_base.is_none() {
            self.preview_base = Some(self.history.present().clone());
        }
        let next = self.merged(updates);
        self.history.mutate(next);
    }

    /// Settle the active gesture into one committed history entry.
    ///
    /// Returns false, committing nothing, when no preview ran or the
    /// gesture ended where it started.
    pub fn commit_preview(&mut self) -> bool {
        let Some(base) = self.preview_base.take() else {
            return false;
        };
        let settled = self.history.present().clone();
        self.history.mutate(base.clone());
        if settled == base {
            return false;
        }
        self.history.commit(settled);
        self.selection.prune(self.history.present());
        true
    }

    /// Discard the active gesture's provisional state.
    pub fn cancel_preview(&mut self) {
        if let Some(base) = self.preview_base.take() {
            self.history.mutate(base);
        }
    }

    fn commit_elements(&mut self, next: Vec<CanvasElement>) {
        self.cancel_preview();
        self.history.commit(next);
        self.selection.prune(self.history.present());
    }

    fn commit_updates(&mut self, updates: Vec<CanvasElement>) {
        let next = self.merged(updates);
        self.commit_elements(next);
    }

    // ---- selection --------------------------------------------------------

    pub fn click_element(&mut self, id: ElementId, additive: bool) {
        self.selection.click(id, additive, self.history.present());
    }

    /// Select every element whose centroid lies in the marquee rect.
    /// `additive` unions with the existing selection instead of replacing it.
    pub fn marquee_select(&mut self, rect: Rect, additive: bool) {
        let ids = selection::ids_in_rect(self.history.present(), rect);
        if additive {
            self.selection.extend(ids);
        } else {
            self.selection.set(ids);
        }
    }

    pub fn group_info(&self) -> GroupInfo {
        self.selection.group_info(self.elements())
    }

    // ---- structure --------------------------------------------------------

    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let retained: Vec<CanvasElement> = self
            .elements()
            .iter()
            .filter(|el| !self.selection.contains(el.id()))
            .cloned()
            .collect();
        self.commit_elements(retained);
        self.selection.clear();
        true
    }

    /// Bind the selection into a fresh group.
    pub fn group_selected(&mut self) -> Option<GroupId> {
        if !self.group_info().can_group {
            return None;
        }
        let group_id = Uuid::new_v4();
        let next = self
            .elements()
            .iter()
            .map(|el| {
                let mut el = el.clone();
                if self.selection.contains(el.id()) {
                    el.set_group_id(Some(group_id));
                }
                el
            })
            .collect();
        self.commit_elements(next);
        Some(group_id)
    }

    /// Dissolve the selected group, releasing every member that carries it.
    pub fn ungroup_selected(&mut self) -> bool {
        if !self.group_info().can_ungroup {
            return false;
        }
        let Some(group_id) = self
            .selected_elements()
            .iter()
            .find_map(|el| el.group_id())
        else {
            return false;
        };
        let next = self
            .elements()
            .iter()
            .map(|el| {
                let mut el = el.clone();
                if el.group_id() == Some(group_id) {
                    el.set_group_id(None);
                }
                el
            })
            .collect();
        self.commit_elements(next);
        true
    }

    /// Lift the whole selection above everything else.
    pub fn bring_selected_to_front(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let max_z = self
            .elements()
            .iter()
            .map(CanvasElement::z_index)
            .fold(0, i64::max);
        let next = self
            .elements()
            .iter()
            .map(|el| {
                let mut el = el.clone();
                if self.selection.contains(el.id()) {
                    el.set_z_index(max_z + 1);
                }
                el
            })
            .collect();
        self.commit_elements(next);
        self.next_z = max_z + 2;
        true
    }

    /// Drop the whole selection below everything else.
    pub fn send_selected_to_back(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let min_z = self
            .elements()
            .iter()
            .map(CanvasElement::z_index)
            .fold(0, i64::min);
        let next = self
            .elements()
            .iter()
            .map(|el| {
                let mut el = el.clone();
                if self.selection.contains(el.id()) {
                    el.set_z_index(min_z - 1);
                }
                el
            })
            .collect();
        self.commit_elements(next);
        true
    }

    // ---- layout -----------------------------------------------------------

    pub fn align_selected(&mut self, kind: AlignKind) -> bool {
        match layout::align(&self.selected_clones(), kind) {
            Some(updates) => {
                self.commit_updates(updates);
                true
            }
            None => false,
        }
    }

    pub fn distribute_selected(&mut self, axis: DistributeAxis) -> bool {
        match layout::distribute(&self.selected_clones(), axis) {
            Some(updates) => {
                self.commit_updates(updates);
                true
            }
            None => false,
        }
    }

    pub fn tidy_selected(&mut self) -> bool {
        match layout::tidy_up(&self.selected_clones()) {
            Some(updates) => {
                self.commit_updates(updates);
                true
            }
            None => false,
        }
    }

    // ---- content ----------------------------------------------------------

    /// Provisional content edit while a note editor is open. The host calls
    /// [`Board::commit_preview`] when editing finishes.
    pub fn set_note_content(&mut self, id: ElementId, content: impl Into<String>) -> bool {
        let Some(CanvasElement::Note(note)) = self.element(id) else {
            return false;
        };
        let mut note = note.clone();
        note.content = content.into();
        self.preview(vec![CanvasElement::Note(note)]);
        true
    }

    /// Replace a note's content in one committed step.
    pub fn replace_note_content(&mut self, id: ElementId, content: impl Into<String>) -> bool {
        let Some(CanvasElement::Note(note)) = self.element(id) else {
            return false;
        };
        let mut note = note.clone();
        note.content = content.into();
        self.commit_updates(vec![CanvasElement::Note(note)]);
        true
    }

    pub fn set_text_align(&mut self, id: ElementId, align: TextAlign) -> bool {
        let Some(CanvasElement::Note(note)) = self.element(id) else {
            return false;
        };
        let mut note = note.clone();
        note.text_align = Some(align);
        self.commit_updates(vec![CanvasElement::Note(note)]);
        true
    }

    /// Recolor the selection. Notes take the background class as-is; arrows
    /// take its text-color counterpart. Other elements are untouched.
    pub fn set_selection_color(&mut self, bg_color: &str) -> bool {
        let updates: Vec<CanvasElement> = self
            .selected_elements()
            .into_iter()
            .filter_map(|el| match el {
                CanvasElement::Note(note) => {
                    let mut note = note.clone();
                    note.color = bg_color.to_string();
                    Some(CanvasElement::Note(note))
                }
                CanvasElement::Arrow(arrow) => {
                    let mut arrow = arrow.clone();
                    arrow.color = bg_color.replace("bg-", "text-");
                    Some(CanvasElement::Arrow(arrow))
                }
                _ => None,
            })
            .collect();
        if updates.is_empty() {
            return false;
        }
        self.commit_updates(updates);
        true
    }

    pub fn set_equipment_status(&mut self, id: ElementId, status: EquipmentStatus) -> bool {
        let Some(CanvasElement::Equipment(equipment)) = self.element(id) else {
            return false;
        };
        let mut equipment = equipment.clone();
        equipment.status = status;
        self.commit_updates(vec![CanvasElement::Equipment(equipment)]);
        true
    }

    // ---- creation ---------------------------------------------------------

    fn take_z(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Where a new element lands when the caller has no position: beside the
    /// selection, cascaded off the last pointer, or at the viewport center.
    pub fn target_position(&self) -> Point {
        factory::target_position(
            &self.selected_clones(),
            self.last_pointer_world,
            &self.viewport,
        )
    }

    fn spawn(&mut self, mut element: CanvasElement) -> ElementId {
        element.set_z_index(self.take_z());
        let id = element.id();
        let mut next = self.history.present().clone();
        next.push(element);
        self.commit_elements(next);
        id
    }

    pub fn add_note(&mut self, at: Option<Point>) -> ElementId {
        let position = at.unwrap_or_else(|| self.target_position());
        self.spawn(factory::note_at(position))
    }

    pub fn add_drawing(&mut self, at: Option<Point>) -> ElementId {
        let position = at.unwrap_or_else(|| self.target_position());
        self.spawn(factory::drawing_at(position))
    }

    pub fn add_arrow(&mut self, at: Option<Point>) -> ElementId {
        let start = at.unwrap_or_else(|| self.target_position());
        self.spawn(factory::arrow_at(start))
    }

    /// Add a batch of images in one committed step, cascading each by the
    /// placement offset so they do not stack exactly.
    pub fn add_images(&mut self, sources: Vec<ImageSource>, at: Option<Point>) -> Vec<ElementId> {
        if sources.is_empty() {
            return Vec::new();
        }
        let base = at.unwrap_or_else(|| self.target_position());
        let mut next = self.history.present().clone();
        let mut ids = Vec::with_capacity(sources.len());
        for (index, source) in sources.into_iter().enumerate() {
            let position = base + PLACEMENT_OFFSET * index as f64;
            let mut image = factory::image_at(
                position,
                source.src,
                source.width,
                source.height,
                IMAGE_MAX_DIMENSION,
            );
            image.set_z_index(self.take_z());
            ids.push(image.id());
            next.push(image);
        }
        self.commit_elements(next);
        ids
    }

    /// Place a model-generated image, scaled to the larger generated-image
    /// cap.
    pub fn add_generated_image(&mut self, image: &GeneratedImage) -> ElementId {
        let position = self.target_position();
        self.spawn(factory::image_at(
            position,
            image.src.clone(),
            image.width,
            image.height,
            GENERATED_IMAGE_MAX_DIMENSION,
        ))
    }

    /// Clone one element slightly offset from its source. The copy gets a
    /// fresh id, leaves any group behind, and lands on top. Equipment is not
    /// duplicable.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let source = self.element(id)?;
        if matches!(source, CanvasElement::Equipment(_)) {
            return None;
        }
        let mut copy = source.clone();
        copy.regenerate_id();
        copy.translate(PLACEMENT_OFFSET);
        copy.set_group_id(None);
        Some(self.spawn(copy))
    }

    // ---- clipboard --------------------------------------------------------

    pub fn copy_selection(&self) -> TransferResult<Option<ClipboardPayload>> {
        transfer::copy_payload(&self.selected_clones())
    }

    /// Insert deserialized elements at the target position, preserving their
    /// relative offsets, and select the copies.
    pub fn paste_elements(&mut self, items: Vec<CanvasElement>) -> Vec<ElementId> {
        if items.is_empty() {
            return Vec::new();
        }
        let target = self.target_position();
        let min_x = items
            .iter()
            .map(|el| el.position().x)
            .fold(f64::INFINITY, f64::min);
        let min_y = items
            .iter()
            .map(|el| el.position().y)
            .fold(f64::INFINITY, f64::min);
        let origin = Point::new(min_x, min_y);

        let mut next = self.history.present().clone();
        let mut ids = Vec::with_capacity(items.len());
        for mut item in items {
            item.regenerate_id();
            item.translate(target - origin);
            item.set_z_index(self.take_z());
            ids.push(item.id());
            next.push(item);
        }
        self.commit_elements(next);
        self.selection.set(ids.clone());
        ids
    }

    /// Paste text: serialized elements re-enter as elements, anything else
    /// becomes a note carrying the text.
    pub fn paste_text(&mut self, text: &str) -> Vec<ElementId> {
        match transfer::parse_pasted_text(text) {
            PastedText::Elements(items) => self.paste_elements(items),
            PastedText::Plain(content) => {
                let position = self.target_position();
                vec![self.spawn(factory::pasted_text_note(position, content))]
            }
        }
    }

    pub fn paste_image(&mut self, source: ImageSource) -> ElementId {
        let position = self.target_position();
        self.spawn(factory::image_at(
            position,
            source.src,
            source.width,
            source.height,
            IMAGE_MAX_DIMENSION,
        ))
    }

    // ---- transfer ---------------------------------------------------------

    pub fn export_json(&self) -> TransferResult<String> {
        transfer::export_json(self.elements(), self.analysis.results())
    }

    /// Replace the whole board from an exported document. Element ids are
    /// preserved; the selection is dropped and analysis results swapped in.
    pub fn import_json(&mut self, json: &str) -> TransferResult<()> {
        let document = transfer::import_json(json)?;
        log::info!("Importing {} elements", document.elements.len());
        self.next_z = next_z_after(&document.elements);
        self.analysis.replace(document.analysis);
        self.selection.clear();
        self.commit_elements(document.elements);
        Ok(())
    }

    // ---- assist -----------------------------------------------------------

    /// Open an outpaint session on an image element. Clears the selection so
    /// the frame overlay stands alone.
    pub fn begin_outpaint(&mut self, id: ElementId) -> AssistResult<()> {
        let element = self.element(id).ok_or(AssistError::UnsupportedElement)?;
        let session = OutpaintSession::begin(element)?;
        self.selection.clear();
        self.outpaint = Some(session);
        Ok(())
    }

    pub fn outpaint(&self) -> Option<&OutpaintSession> {
        self.outpaint.as_ref()
    }

    pub fn set_outpaint_frame(&mut self, frame: OutpaintFrame) -> bool {
        match self.outpaint.as_mut() {
            Some(session) => {
                session.set_frame(frame);
                true
            }
            None => false,
        }
    }

    /// Stretch the outpaint frame from one of its border grips.
    pub fn drag_outpaint_frame(&mut self, handle: FrameHandle, delta: Vec2) -> bool {
        match self.outpaint.as_mut() {
            Some(session) => {
                session.drag_frame_handle(handle, delta);
                true
            }
            None => false,
        }
    }

    pub fn cancel_outpaint(&mut self) {
        self.outpaint = None;
    }

    /// Finish the outpaint session: the element takes the generated source
    /// and assumes the frame's position and size, in one committed step.
    pub fn apply_outpaint(&mut self, src: impl Into<String>) -> bool {
        let Some(session) = self.outpaint.take() else {
            return false;
        };
        let Some(CanvasElement::Image(image)) = self.element(session.element_id) else {
            log::warn!("Outpaint target no longer on the board, dropping session");
            return false;
        };
        let mut image = image.clone();
        image.src = src.into();
        image.position = session.frame.position;
        image.width = session.frame.width;
        image.height = session.frame.height;
        self.commit_updates(vec![CanvasElement::Image(image)]);
        true
    }

    /// The data URL an analysis call would describe, if the element has one.
    pub fn analysis_source(&self, id: ElementId) -> AssistResult<String> {
        match self.element(id) {
            Some(CanvasElement::Image(image)) if !image.src.is_empty() => Ok(image.src.clone()),
            Some(CanvasElement::Drawing(drawing)) if !drawing.src.is_empty() => {
                Ok(drawing.src.clone())
            }
            _ => Err(AssistError::UnsupportedElement),
        }
    }

    /// The prompt text a note offers for optimization, if non-empty.
    pub fn note_prompt(&self, id: ElementId) -> AssistResult<String> {
        match self.element(id) {
            Some(CanvasElement::Note(note)) if !note.content.trim().is_empty() => {
                Ok(note.content.clone())
            }
            _ => Err(AssistError::UnsupportedElement),
        }
    }

    /// File an analysis result and clear the in-flight marker if it matches.
    pub fn store_analysis(&mut self, id: ElementId, result: AnalysisResult) {
        self.analysis.store(id, result);
        if self.analysis.analyzing() == Some(id) {
            self.analysis.set_analyzing(None);
        }
    }

    /// Bundle the selection into a generation request, if it carries any
    /// usable context.
    pub fn generation_request(&self) -> Option<GenerationRequest> {
        assist::collect_generation_inputs(&self.selected_clones())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn board() -> Board {
        Board::new(Size::new(800.0, 600.0))
    }

    fn note_board(positions: &[(f64, f64)]) -> Board {
        let elements = positions
            .iter()
            .map(|&(x, y)| factory::note_at(Point::new(x, y)))
            .collect();
        Board::with_elements(elements, Size::new(800.0, 600.0))
    }

    #[test]
    fn test_starter_board_counts_and_counter() {
        let mut board = board();
        assert_eq!(board.elements().len(), 3);
        let id = board.add_note(None);
        let note = board.element(id).unwrap();
        // Starter layout tops out at z 1, so the first addition gets 2.
        assert_eq!(note.z_index(), 2);
    }

    #[test]
    fn test_preview_then_commit_is_one_undo_step() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let id = board.elements()[0].id();

        for step in 1..=5 {
            let mut moved = board.element(id).unwrap().clone();
            moved.set_position(Point::new(step as f64 * 10.0, 0.0));
            board.preview(vec![moved]);
        }
        assert!(board.commit_preview());
        assert_eq!(board.element(id).unwrap().position(), Point::new(50.0, 0.0));

        assert!(board.undo());
        assert_eq!(board.element(id).unwrap().position(), Point::ZERO);
        assert!(!board.can_undo());

        assert!(board.redo());
        assert_eq!(board.element(id).unwrap().position(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_commit_preview_without_change_commits_nothing() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let unchanged = board.elements()[0].clone();
        board.preview(vec![unchanged]);
        assert!(!board.commit_preview());
        assert!(!board.can_undo());
    }

    #[test]
    fn test_cancel_preview_restores_pregesture_state() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let id = board.elements()[0].id();
        let mut moved = board.elements()[0].clone();
        moved.set_position(Point::new(40.0, 40.0));
        board.preview(vec![moved]);
        board.cancel_preview();
        assert_eq!(board.element(id).unwrap().position(), Point::ZERO);
        assert!(!board.can_undo());
    }

    #[test]
    fn test_note_edit_settles_as_one_entry() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let id = board.elements()[0].id();

        for content in ["d", "dr", "draft"] {
            assert!(board.set_note_content(id, content));
        }
        assert!(board.commit_preview());
        if let Some(CanvasElement::Note(note)) = board.element(id) {
            assert_eq!(note.content, "draft");
        } else {
            unreachable!();
        }

        assert!(board.undo());
        if let Some(CanvasElement::Note(note)) = board.element(id) {
            assert_eq!(note.content, "New Note");
        } else {
            unreachable!();
        }

        // Whole-value replacement is its own undo step.
        assert!(board.redo());
        assert!(board.replace_note_content(id, "final"));
        assert!(board.undo());
        if let Some(CanvasElement::Note(note)) = board.element(id) {
            assert_eq!(note.content, "draft");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_delete_selected_prunes_selection() {
        let mut board = note_board(&[(0.0, 0.0), (100.0, 0.0)]);
        let keep = board.elements()[1].id();
        let gone = board.elements()[0].id();
        board.selection.select_only(gone);
        assert!(board.delete_selected());
        assert_eq!(board.elements().len(), 1);
        assert_eq!(board.elements()[0].id(), keep);
        assert!(board.selection.is_empty());
        assert!(!board.delete_selected());
    }

    #[test]
    fn test_group_click_and_ungroup() {
        let mut board = note_board(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);
        let a = board.elements()[0].id();
        let b = board.elements()[1].id();
        board.selection.set(vec![a, b]);

        let group_id = board.group_selected().unwrap();
        assert_eq!(board.element(a).unwrap().group_id(), Some(group_id));
        assert_eq!(board.element(b).unwrap().group_id(), Some(group_id));

        // Clicking one member pulls in the whole group.
        board.selection.clear();
        board.click_element(a, false);
        assert_eq!(board.selection.len(), 2);

        assert!(board.ungroup_selected());
        assert_eq!(board.element(a).unwrap().group_id(), None);
        assert_eq!(board.element(b).unwrap().group_id(), None);
    }

    #[test]
    fn test_bring_to_front_lifts_selection_and_counter() {
        let mut board = board();
        let first = board.elements()[0].id();
        board.selection.select_only(first);
        assert!(board.bring_selected_to_front());
        assert_eq!(board.element(first).unwrap().z_index(), 2);

        // Counter skips past the lifted layer.
        let id = board.add_note(None);
        assert_eq!(board.element(id).unwrap().z_index(), 3);
    }

    #[test]
    fn test_send_to_back_floors_below_zero() {
        let mut board = board();
        let first = board.elements()[0].id();
        board.selection.select_only(first);
        assert!(board.send_selected_to_back());
        assert_eq!(board.element(first).unwrap().z_index(), -1);
    }

    #[test]
    fn test_duplicate_offsets_and_leaves_group() {
        let mut board = note_board(&[(0.0, 0.0), (100.0, 0.0)]);
        let a = board.elements()[0].id();
        let b = board.elements()[1].id();
        board.selection.set(vec![a, b]);
        board.group_selected().unwrap();

        let copy = board.duplicate_element(a).unwrap();
        assert_ne!(copy, a);
        let copied = board.element(copy).unwrap();
        assert_eq!(copied.position(), Point::new(20.0, 20.0));
        assert_eq!(copied.group_id(), None);
    }

    #[test]
    fn test_duplicate_skips_equipment() {
        let mut board = board();
        let equipment = board.elements()[0].id();
        assert_eq!(board.duplicate_element(equipment), None);
    }

    #[test]
    fn test_paste_preserves_relative_offsets_and_selects() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let items = vec![
            factory::note_at(Point::new(500.0, 500.0)),
            factory::note_at(Point::new(600.0, 550.0)),
        ];
        let source_ids: Vec<ElementId> = items.iter().map(CanvasElement::id).collect();

        // Viewport center maps to the world origin on a fresh viewport.
        let pasted = board.paste_elements(items);
        assert_eq!(pasted.len(), 2);
        assert!(!pasted.iter().any(|id| source_ids.contains(id)));

        let first = board.element(pasted[0]).unwrap().position();
        let second = board.element(pasted[1]).unwrap().position();
        assert_eq!(first, Point::ZERO);
        assert_eq!(second - first, Vec2::new(100.0, 50.0));
        assert_eq!(board.selection.ids(), pasted.as_slice());
    }

    #[test]
    fn test_paste_plain_text_becomes_note() {
        let mut board = note_board(&[]);
        let ids = board.paste_text("meeting notes");
        assert_eq!(ids.len(), 1);
        let Some(CanvasElement::Note(note)) = board.element(ids[0]) else {
            panic!("expected a note");
        };
        assert_eq!(note.content, "meeting notes");
        assert_eq!((note.width, note.height), (200.0, 150.0));
    }

    #[test]
    fn test_set_selection_color_maps_arrow_class() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let arrow = board.add_arrow(Some(Point::new(300.0, 0.0)));
        let note = board.elements()[0].id();
        board.selection.set(vec![note, arrow]);

        assert!(board.set_selection_color("bg-blue-500"));
        let Some(CanvasElement::Note(n)) = board.element(note) else {
            panic!("expected a note");
        };
        assert_eq!(n.color, "bg-blue-500");
        let Some(CanvasElement::Arrow(a)) = board.element(arrow) else {
            panic!("expected an arrow");
        };
        assert_eq!(a.color, "text-blue-500");
    }

    #[test]
    fn test_export_import_round_trip_replaces_board() {
        let mut board = note_board(&[(0.0, 0.0), (100.0, 0.0)]);
        let exported = board.export_json().unwrap();
        let original_ids: Vec<ElementId> =
            board.elements().iter().map(CanvasElement::id).collect();

        let mut other = Board::new(Size::new(800.0, 600.0));
        other.selection.select_only(other.elements()[0].id());
        other.import_json(&exported).unwrap();

        let imported_ids: Vec<ElementId> =
            other.elements().iter().map(CanvasElement::id).collect();
        assert_eq!(imported_ids, original_ids);
        assert!(other.selection.is_empty());
        // Undo steps back to the board as it stood before the import.
        assert!(other.undo());
        assert_eq!(other.elements().len(), 3);
    }

    #[test]
    fn test_apply_outpaint_rewrites_element_to_frame() {
        let mut board = note_board(&[]);
        let id = board.paste_image(ImageSource {
            src: "data:image/png;base64,AAAA".to_string(),
            width: 200.0,
            height: 100.0,
        });

        board.begin_outpaint(id).unwrap();
        let frame = OutpaintFrame {
            position: Point::new(50.0, 25.0),
            width: 400.0,
            height: 200.0,
        };
        assert!(board.set_outpaint_frame(frame));
        assert!(board.apply_outpaint("data:image/png;base64,BBBB"));

        let Some(CanvasElement::Image(image)) = board.element(id) else {
            panic!("expected an image");
        };
        assert_eq!(image.src, "data:image/png;base64,BBBB");
        assert_eq!(image.position, Point::new(50.0, 25.0));
        assert_eq!((image.width, image.height), (400.0, 200.0));
        assert!(board.outpaint().is_none());

        // One undo covers the whole apply.
        assert!(board.undo());
        let Some(CanvasElement::Image(image)) = board.element(id) else {
            panic!("expected an image");
        };
        assert_eq!(image.src, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_begin_outpaint_rejects_notes() {
        let mut board = note_board(&[(0.0, 0.0)]);
        let id = board.elements()[0].id();
        assert!(board.begin_outpaint(id).is_err());
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut board = note_board(&[(0.0, 0.0), (10.0, 0.0)]);
        let top = board.elements()[1].id();
        board.selection.select_only(top);
        board.bring_selected_to_front();
        let hit = board.element_at(Point::new(5.0, 0.0)).unwrap();
        assert_eq!(hit.id(), top);
    }
}
