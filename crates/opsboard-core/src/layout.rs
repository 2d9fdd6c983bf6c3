//! Bulk layout actions: align, distribute, tidy.
//!
//! All three work on the unrotated footprint (centroid plus half extents).
//! They take the selected elements and return repositioned clones for the
//! caller to merge back and commit, or `None` when the selection is too
//! small for the action to mean anything.

use kurbo::Point;

use crate::elements::CanvasElement;

/// Gap inserted between cells by tidy.
pub const TIDY_PADDING: f64 = 60.0;

/// Vertical distance that separates two tidy rows in reading order.
pub const TIDY_ROW_TOLERANCE: f64 = 80.0;

/// Edge or axis to align on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignKind {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis to distribute along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

fn left_edge(el: &CanvasElement) -> f64 {
    el.position().x - el.width() / 2.0
}

fn right_edge(el: &CanvasElement) -> f64 {
    el.position().x + el.width() / 2.0
}

fn top_edge(el: &CanvasElement) -> f64 {
    el.position().y - el.height() / 2.0
}

fn bottom_edge(el: &CanvasElement) -> f64 {
    el.position().y + el.height() / 2.0
}

/// Align the selection on a shared edge or center line.
///
/// Edges align to the outermost edge among the selection; center and middle
/// align to the mean centroid. Needs at least two elements.
pub fn align(selected: &[CanvasElement], kind: AlignKind) -> Option<Vec<CanvasElement>> {
    if selected.len() <= 1 {
        return None;
    }

    let count = selected.len() as f64;
    let target = match kind {
        AlignKind::Left => selected.iter().map(left_edge).fold(f64::INFINITY, f64::min),
        AlignKind::Center => selected.iter().map(|el| el.position().x).sum::<f64>() / count,
        AlignKind::Right => selected
            .iter()
            .map(right_edge)
            .fold(f64::NEG_INFINITY, f64::max),
        AlignKind::Top => selected.iter().map(top_edge).fold(f64::INFINITY, f64::min),
        AlignKind::Middle => selected.iter().map(|el| el.position().y).sum::<f64>() / count,
        AlignKind::Bottom => selected
            .iter()
            .map(bottom_edge)
            .fold(f64::NEG_INFINITY, f64::max),
    };

    let aligned = selected
        .iter()
        .map(|original| {
            let mut element = original.clone();
            let mut position = element.position();
            match kind {
                AlignKind::Left => position.x = target + element.width() / 2.0,
                AlignKind::Center => position.x = target,
                AlignKind::Right => position.x = target - element.width() / 2.0,
                AlignKind::Top => position.y = target + element.height() / 2.0,
                AlignKind::Middle => position.y = target,
                AlignKind::Bottom => position.y = target - element.height() / 2.0,
            }
            element.set_position(position);
            element
        })
        .collect();
    Some(aligned)
}

/// Spread the selection with equal gaps between neighbors.
///
/// The outermost edges stay put; the slack between them is divided evenly.
/// Needs at least three elements.
pub fn distribute(
    selected: &[CanvasElement],
    axis: DistributeAxis,
) -> Option<Vec<CanvasElement>> {
    if selected.len() <= 2 {
        return None;
    }

    let mut ordered = selected.to_vec();
    match axis {
        DistributeAxis::Horizontal => {
            ordered.sort_by(|a, b| left_edge(a).total_cmp(&left_edge(b)));
            let first = &ordered[0];
            let last = &ordered[ordered.len() - 1];
            let span = right_edge(last) - left_edge(first);
            let total: f64 = ordered.iter().map(CanvasElement::width).sum();
            let gap = (span - total) / (ordered.len() - 1) as f64;

            let mut cursor = left_edge(&ordered[0]);
            for element in &mut ordered {
                let mut position = element.position();
                position.x = cursor + element.width() / 2.0;
                element.set_position(position);
                cursor += element.width() + gap;
            }
        }
        DistributeAxis::Vertical => {
            ordered.sort_by(|a, b| top_edge(a).total_cmp(&top_edge(b)));
            let first = &ordered[0];
            let last = &ordered[ordered.len() - 1];
            let span = bottom_edge(last) - top_edge(first);
            let total: f64 = ordered.iter().map(CanvasElement::height).sum();
            let gap = (span - total) / (ordered.len() - 1) as f64;

            let mut cursor = top_edge(&ordered[0]);
            for element in &mut ordered {
                let mut position = element.position();
                position.y = cursor + element.height() / 2.0;
                element.set_position(position);
                cursor += element.height() + gap;
            }
        }
    }
    Some(ordered)
}

/// Pack the selection into a grid in reading order.
///
/// Elements sort into rows (a fresh row starts when the vertical jump
/// exceeds [`TIDY_ROW_TOLERANCE`]), then left to right within a row. The
/// grid starts at the selection's min corner; the column count comes from
/// how many average-width cells fit the selection's width. Rotations reset
/// to zero. Needs at least two elements.
pub fn tidy_up(selected: &[CanvasElement]) -> Option<Vec<CanvasElement>> {
    if selected.len() <= 1 {
        return None;
    }

    let mut ordered = selected.to_vec();
    ordered.sort_by(|a, b| a.position().y.total_cmp(&b.position().y));
    let mut bands = vec![0usize; ordered.len()];
    for i in 1..ordered.len() {
        let jump = ordered[i].position().y - ordered[i - 1].position().y;
        bands[i] = bands[i - 1] + usize::from(jump > TIDY_ROW_TOLERANCE);
    }
    let mut keyed: Vec<(usize, CanvasElement)> = bands.into_iter().zip(ordered).collect();
    keyed.sort_by(|(band_a, a), (band_b, b)| {
        band_a
            .cmp(band_b)
            .then_with(|| a.position().x.total_cmp(&b.position().x))
    });
    let mut ordered: Vec<CanvasElement> = keyed.into_iter().map(|(_, el)| el).collect();

    let count = ordered.len();
    let avg_width =
        ordered.iter().map(CanvasElement::width).sum::<f64>() / count as f64;
    let min_x = ordered.iter().map(left_edge).fold(f64::INFINITY, f64::min);
    let min_y = ordered.iter().map(top_edge).fold(f64::INFINITY, f64::min);
    let max_x = ordered
        .iter()
        .map(right_edge)
        .fold(f64::NEG_INFINITY, f64::max);
    let group_width = max_x - min_x;

    let cols = ((group_width / (avg_width + TIDY_PADDING)).floor() as usize).clamp(1, count);
    let cell_width = ordered
        .iter()
        .map(CanvasElement::width)
        .fold(0.0, f64::max)
        + TIDY_PADDING;
    let cell_height = ordered
        .iter()
        .map(CanvasElement::height)
        .fold(0.0, f64::max)
        + TIDY_PADDING;

    for (i, element) in ordered.iter_mut().enumerate() {
        let row = i / cols;
        let col = i % cols;
        element.set_position(Point::new(
            min_x + col as f64 * cell_width + element.width() / 2.0,
            min_y + row as f64 * cell_height + element.height() / 2.0,
        ));
        element.set_rotation(0.0);
    }
    Some(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Note;

    fn sized_note(x: f64, y: f64, w: f64, h: f64) -> CanvasElement {
        let mut el = CanvasElement::Note(Note::new(Point::new(x, y), "bg-gray-700"));
        el.set_size(w, h);
        el
    }

    fn find(elements: &[CanvasElement], id: uuid::Uuid) -> &CanvasElement {
        elements.iter().find(|el| el.id() == id).unwrap()
    }

    #[test]
    fn test_align_needs_two() {
        let one = vec![sized_note(0.0, 0.0, 100.0, 100.0)];
        assert!(align(&one, AlignKind::Left).is_none());
    }

    #[test]
    fn test_align_left_edge() {
        let elements = vec![
            sized_note(0.0, 0.0, 100.0, 50.0),
            sized_note(200.0, 80.0, 40.0, 50.0),
        ];
        let aligned = align(&elements, AlignKind::Left).unwrap();
        // Leftmost edge is -50; everyone's left edge lands there.
        for el in &aligned {
            assert!((left_edge(el) + 50.0).abs() < 1e-10);
        }
        // y untouched.
        assert!((find(&aligned, elements[1].id()).position().y - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_align_center_uses_mean_centroid() {
        let elements = vec![
            sized_note(0.0, 0.0, 100.0, 50.0),
            sized_note(100.0, 10.0, 40.0, 50.0),
        ];
        let aligned = align(&elements, AlignKind::Center).unwrap();
        for el in &aligned {
            assert!((el.position().x - 50.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_align_bottom_edge() {
        let elements = vec![
            sized_note(0.0, 0.0, 100.0, 50.0),
            sized_note(200.0, 100.0, 40.0, 30.0),
        ];
        let aligned = align(&elements, AlignKind::Bottom).unwrap();
        for el in &aligned {
            assert!((bottom_edge(el) - 115.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_distribute_needs_three() {
        let two = vec![
            sized_note(0.0, 0.0, 100.0, 100.0),
            sized_note(300.0, 0.0, 100.0, 100.0),
        ];
        assert!(distribute(&two, DistributeAxis::Horizontal).is_none());
    }

    #[test]
    fn test_distribute_horizontal_even_gaps() {
        let elements = vec![
            sized_note(50.0, 0.0, 100.0, 50.0),
            sized_note(170.0, 0.0, 100.0, 50.0),
            sized_note(350.0, 0.0, 100.0, 50.0),
        ];
        let spread = distribute(&elements, DistributeAxis::Horizontal).unwrap();

        let mut ordered: Vec<&CanvasElement> = spread.iter().collect();
        ordered.sort_by(|a, b| left_edge(a).total_cmp(&left_edge(b)));

        // Span 0..400 minus 300 of content leaves two gaps of 50.
        for pair in ordered.windows(2) {
            let gap = left_edge(pair[1]) - right_edge(pair[0]);
            assert!((gap - 50.0).abs() < 1e-10);
        }
        // Outermost edges stay put.
        assert!((left_edge(ordered[0]) - 0.0).abs() < 1e-10);
        assert!((right_edge(ordered[2]) - 400.0).abs() < 1e-10);
    }

    #[test]
    fn test_distribute_vertical_even_gaps() {
        let elements = vec![
            sized_note(0.0, 25.0, 50.0, 50.0),
            sized_note(0.0, 90.0, 50.0, 60.0),
            sized_note(0.0, 375.0, 50.0, 50.0),
        ];
        let spread = distribute(&elements, DistributeAxis::Vertical).unwrap();

        let mut ordered: Vec<&CanvasElement> = spread.iter().collect();
        ordered.sort_by(|a, b| top_edge(a).total_cmp(&top_edge(b)));

        // Span 0..400 minus 160 of content leaves two gaps of 120.
        for pair in ordered.windows(2) {
            let gap = top_edge(pair[1]) - bottom_edge(pair[0]);
            assert!((gap - 120.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_tidy_zeroes_rotation_and_packs() {
        let mut slanted = sized_note(0.0, 0.0, 100.0, 100.0);
        slanted.set_rotation(45.0);
        let elements = vec![
            slanted,
            sized_note(300.0, 10.0, 100.0, 100.0),
            sized_note(100.0, 300.0, 100.0, 100.0),
        ];
        let tidied = tidy_up(&elements).unwrap();

        for el in &tidied {
            assert!((el.rotation()).abs() < 1e-10);
        }

        // Selection is 400 wide; two 160-wide cells fit, so we get 2 columns.
        // Reading order: the two top notes, then the lower one wraps.
        let min_x = -50.0;
        let min_y = -50.0;
        let cell = 160.0;
        assert_eq!(
            find(&tidied, elements[0].id()).position(),
            Point::new(min_x + 50.0, min_y + 50.0)
        );
        assert_eq!(
            find(&tidied, elements[1].id()).position(),
            Point::new(min_x + cell + 50.0, min_y + 50.0)
        );
        assert_eq!(
            find(&tidied, elements[2].id()).position(),
            Point::new(min_x + 50.0, min_y + cell + 50.0)
        );
    }

    #[test]
    fn test_tidy_single_row() {
        let elements = vec![
            sized_note(1000.0, 0.0, 100.0, 100.0),
            sized_note(0.0, 20.0, 100.0, 100.0),
            sized_note(500.0, -20.0, 100.0, 100.0),
        ];
        let tidied = tidy_up(&elements).unwrap();

        // All within one row band; x order is preserved left to right.
        let xs: Vec<f64> = [elements[1].id(), elements[2].id(), elements[0].id()]
            .iter()
            .map(|&id| find(&tidied, id).position().x)
            .collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        let ys: Vec<f64> = tidied.iter().map(|el| el.position().y).collect();
        assert!(ys.iter().all(|&y| (y - ys[0]).abs() < 1e-10));
    }
}
