//! Element construction: palette, placement, and the starter layout.

use kurbo::{Point, Vec2};

use crate::elements::{
    ARROW_DEFAULT_LENGTH, Arrow, CanvasElement, Drawing, Equipment, Image, Note,
};
use crate::group_transform::selection_bounds;
use crate::viewport::Viewport;

/// Longest display side for an imported image.
pub const IMAGE_MAX_DIMENSION: f64 = 300.0;

/// Longest display side for a generated image (kept larger for detail).
pub const GENERATED_IMAGE_MAX_DIMENSION: f64 = 400.0;

/// Offset applied to duplicates, pastes, and cascaded placements.
pub const PLACEMENT_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Horizontal clearance between a selection and an element spawned next
/// to it.
const SPAWN_CLEARANCE: f64 = 250.0;

/// Stroke color for new arrows.
pub const ARROW_DEFAULT_COLOR: &str = "text-red-500";

/// Size of a note created from pasted plain text.
pub const PASTED_NOTE_SIZE: (f64, f64) = (200.0, 150.0);

/// A palette entry, as paired background and stroke tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
    pub name: &'static str,
    pub bg: &'static str,
    pub text: &'static str,
}

/// Note/arrow color palette. Tokens are opaque to the engine; the host maps
/// them to styling.
pub const COLORS: [ColorOption; 8] = [
    ColorOption { name: "Gray", bg: "bg-gray-700", text: "text-gray-700" },
    ColorOption { name: "Red", bg: "bg-red-500", text: "text-red-500" },
    ColorOption { name: "Orange", bg: "bg-orange-500", text: "text-orange-500" },
    ColorOption { name: "Yellow", bg: "bg-yellow-500", text: "text-yellow-500" },
    ColorOption { name: "Green", bg: "bg-green-500", text: "text-green-500" },
    ColorOption { name: "Blue", bg: "bg-blue-600", text: "text-blue-600" },
    ColorOption { name: "Purple", bg: "bg-purple-600", text: "text-purple-600" },
    ColorOption { name: "Pink", bg: "bg-pink-500", text: "text-pink-500" },
];

/// Pick a palette color for a new note. Counter-seeded, no RNG state.
pub fn random_palette_color() -> &'static ColorOption {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-style finalizer.
    let mut x = counter.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;

    &COLORS[x as usize % COLORS.len()]
}

/// Where a new element should land.
///
/// Next to the selection when there is one, cascaded off the last pointer
/// position otherwise, and at the viewport center as a last resort.
pub fn target_position(
    selected: &[CanvasElement],
    last_pointer_world: Option<Point>,
    viewport: &Viewport,
) -> Point {
    if let Some(bounds) = selection_bounds(selected.iter()) {
        return Point::new(bounds.x1 + SPAWN_CLEARANCE, bounds.center().y);
    }
    if let Some(pointer) = last_pointer_world {
        return pointer + PLACEMENT_OFFSET;
    }
    viewport.screen_to_world(viewport.center())
}

/// Shrink natural image dimensions so the longest side fits `max_dimension`.
/// Images smaller than the cap keep their natural size.
pub fn fit_image_size(width: f64, height: f64, max_dimension: f64) -> (f64, f64) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    if width > height {
        (max_dimension, height / width * max_dimension)
    } else {
        (width / height * max_dimension, max_dimension)
    }
}

/// A fresh note with a palette color.
pub fn note_at(position: Point) -> CanvasElement {
    CanvasElement::Note(Note::new(position, random_palette_color().bg))
}

/// A note carrying pasted plain text.
pub fn pasted_text_note(position: Point, content: impl Into<String>) -> CanvasElement {
    let note = Note::new(position, random_palette_color().bg)
        .with_content(content)
        .with_size(PASTED_NOTE_SIZE.0, PASTED_NOTE_SIZE.1);
    CanvasElement::Note(note)
}

/// An empty drawing surface.
pub fn drawing_at(position: Point) -> CanvasElement {
    CanvasElement::Drawing(Drawing::new(position))
}

/// A horizontal arrow starting at the given point.
pub fn arrow_at(start: Point) -> CanvasElement {
    let end = start + Vec2::new(ARROW_DEFAULT_LENGTH, 0.0);
    CanvasElement::Arrow(Arrow::new(start, end, ARROW_DEFAULT_COLOR))
}

/// An image sized down from its natural dimensions to fit the cap.
pub fn image_at(
    position: Point,
    src: impl Into<String>,
    natural_width: f64,
    natural_height: f64,
    max_dimension: f64,
) -> CanvasElement {
    let (width, height) = fit_image_size(natural_width, natural_height, max_dimension);
    CanvasElement::Image(Image::new(position, src, width, height))
}

/// The seeded station layout: three equipment cards on a hex-ish spread.
pub fn starter_layout() -> Vec<CanvasElement> {
    let mut o2 = Equipment::new(Point::ZERO, "o2Regenerator", "o2RegeneratorDesc");
    o2.z_index = 1;
    let mut water = Equipment::new(
        Point::new(-277.0, 480.0),
        "waterReclamation",
        "waterReclamationDesc",
    );
    water.z_index = 1;
    let mut comm = Equipment::new(Point::new(277.0, 480.0), "commArray", "commArrayDesc");
    comm.z_index = 1;

    vec![
        CanvasElement::Equipment(o2),
        CanvasElement::Equipment(water),
        CanvasElement::Equipment(comm),
    ]
}
