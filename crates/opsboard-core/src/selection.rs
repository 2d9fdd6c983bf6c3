//! Selection state and the click rules that feed it.

use std::collections::HashSet;

use kurbo::Rect;

use crate::elements::{CanvasElement, ElementId, GroupId};

/// What the group/ungroup actions may do for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupInfo {
    pub can_group: bool,
    pub can_ungroup: bool,
}

/// An ordered set of selected element ids.
///
/// Order is insertion order; ids never repeat.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: Vec<ElementId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Clear selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection wholesale.
    pub fn set(&mut self, ids: Vec<ElementId>) {
        self.ids = ids;
        self.dedup();
    }

    /// Select one element, dropping everything else.
    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add to selection.
    pub fn insert(&mut self, id: ElementId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|&existing| existing != id);
    }

    /// Flip membership of one id.
    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    /// Union another batch of ids into the selection.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            self.insert(id);
        }
    }

    /// Apply the click rules for pressing on an element.
    ///
    /// Additive (shift) clicks toggle the single element. Plain clicks keep
    /// the current selection when the element is already in it (so a drag of
    /// a multi-selection can start from any member), otherwise they select
    /// the element's whole group, or just the element when ungrouped.
    pub fn click(&mut self, id: ElementId, additive: bool, elements: &[CanvasElement]) {
        if additive {
            self.toggle(id);
            return;
        }
        if self.contains(id) {
            return;
        }
        let group = elements
            .iter()
            .find(|el| el.id() == id)
            .and_then(|el| el.group_id());
        match group {
            Some(group_id) => {
                let members = elements
                    .iter()
                    .filter(|el| el.group_id() == Some(group_id))
                    .map(|el| el.id())
                    .collect();
                self.set(members);
            }
            None => self.select_only(id),
        }
    }

    /// Distinct group ids among the selected elements.
    pub fn group_ids(&self, elements: &[CanvasElement]) -> HashSet<GroupId> {
        elements
            .iter()
            .filter(|el| self.contains(el.id()))
            .filter_map(|el| el.group_id())
            .collect()
    }

    /// Group/ungroup availability for the current selection.
    ///
    /// Grouping needs more than one element and is pointless when they
    /// already form exactly one group. Ungrouping needs the selection to be
    /// exactly one group with no stray ungrouped members.
    pub fn group_info(&self, elements: &[CanvasElement]) -> GroupInfo {
        let selected: Vec<&CanvasElement> = elements
            .iter()
            .filter(|el| self.contains(el.id()))
            .collect();
        let groups: HashSet<GroupId> =
            selected.iter().filter_map(|el| el.group_id()).collect();
        let has_ungrouped = selected.iter().any(|el| el.group_id().is_none());
        let single_group = groups.len() == 1 && !has_ungrouped;

        GroupInfo {
            can_group: selected.len() > 1 && !single_group,
            can_ungroup: !selected.is_empty() && single_group,
        }
    }

    /// Drop ids that no longer resolve to an element.
    pub fn prune(&mut self, elements: &[CanvasElement]) {
        self.ids
            .retain(|&id| elements.iter().any(|el| el.id() == id));
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.ids.retain(|&id| seen.insert(id));
    }
}

/// Ids of elements whose centroid falls inside a world rect.
///
/// Marquee selection goes by centroid, not bounds, so grazing a corner of a
/// large element does not grab it.
pub fn ids_in_rect(elements: &[CanvasElement], rect: Rect) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|el| rect.contains(el.position()))
        .map(|el| el.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Note;
    use kurbo::Point;
    use uuid::Uuid;

    fn note_at(x: f64, y: f64) -> CanvasElement {
        CanvasElement::Note(Note::new(Point::new(x, y), "bg-gray-700"))
    }

    fn grouped(mut el: CanvasElement, group: GroupId) -> CanvasElement {
        el.set_group_id(Some(group));
        el
    }

    #[test]
    fn test_toggle_and_dedup() {
        let mut sel = SelectionSet::new();
        let id = Uuid::new_v4();
        sel.toggle(id);
        sel.insert(id);
        assert_eq!(sel.len(), 1);
        sel.toggle(id);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_click_selects_whole_group() {
        let group = Uuid::new_v4();
        let elements = vec![
            grouped(note_at(0.0, 0.0), group),
            grouped(note_at(50.0, 0.0), group),
            note_at(100.0, 0.0),
        ];
        let mut sel = SelectionSet::new();
        sel.click(elements[0].id(), false, &elements);
        assert_eq!(sel.len(), 2);
        assert!(sel.contains(elements[0].id()));
        assert!(sel.contains(elements[1].id()));
        assert!(!sel.contains(elements[2].id()));
    }

    #[test]
    fn test_click_on_selected_member_keeps_selection() {
        let elements = vec![note_at(0.0, 0.0), note_at(50.0, 0.0)];
        let mut sel = SelectionSet::new();
        sel.set(vec![elements[0].id(), elements[1].id()]);

        sel.click(elements[0].id(), false, &elements);
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn test_shift_click_toggles_individual() {
        let group = Uuid::new_v4();
        let elements = vec![
            grouped(note_at(0.0, 0.0), group),
            grouped(note_at(50.0, 0.0), group),
        ];
        let mut sel = SelectionSet::new();
        sel.click(elements[0].id(), true, &elements);
        assert_eq!(sel.len(), 1);

        sel.click(elements[1].id(), true, &elements);
        assert_eq!(sel.len(), 2);

        sel.click(elements[0].id(), true, &elements);
        assert_eq!(sel.ids(), &[elements[1].id()]);
    }

    #[test]
    fn test_group_info() {
        let group = Uuid::new_v4();
        let elements = vec![
            grouped(note_at(0.0, 0.0), group),
            grouped(note_at(50.0, 0.0), group),
            note_at(100.0, 0.0),
        ];

        // A full single group: only ungroup makes sense.
        let mut sel = SelectionSet::new();
        sel.set(vec![elements[0].id(), elements[1].id()]);
        let info = sel.group_info(&elements);
        assert!(!info.can_group);
        assert!(info.can_ungroup);

        // Mixed group + loose element: only grouping makes sense.
        sel.insert(elements[2].id());
        let info = sel.group_info(&elements);
        assert!(info.can_group);
        assert!(!info.can_ungroup);

        // A single loose element: neither.
        sel.set(vec![elements[2].id()]);
        let info = sel.group_info(&elements);
        assert!(!info.can_group);
        assert!(!info.can_ungroup);
    }

    #[test]
    fn test_ids_in_rect_uses_centroid() {
        let elements = vec![note_at(0.0, 0.0), note_at(50.0, 50.0), note_at(200.0, 200.0)];
        let rect = Rect::new(-10.0, -10.0, 100.0, 100.0);
        let hits = ids_in_rect(&elements, rect);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&elements[0].id()));
        assert!(hits.contains(&elements[1].id()));
    }

    #[test]
    fn test_prune_drops_stale_ids() {
        let elements = vec![note_at(0.0, 0.0)];
        let mut sel = SelectionSet::new();
        sel.set(vec![elements[0].id(), Uuid::new_v4()]);
        sel.prune(&elements);
        assert_eq!(sel.ids(), &[elements[0].id()]);
    }
}
