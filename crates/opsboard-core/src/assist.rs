//! Model-assisted features: analysis, prompt optimization, image generation,
//! outpainting.
//!
//! The engine never talks to a model itself. A host supplies an
//! [`AssistProvider`]; calls return boxed futures the host drives however it
//! likes and feeds the outcome back into the board. A future the host drops
//! is simply an abandoned request, the board keeps no reference to it.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::{CanvasElement, ElementId, Image};

/// Assist errors.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Element cannot be used for this assist action")]
    UnsupportedElement,
    #[error("Malformed data url")]
    MalformedDataUrl,
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Result type for assist operations.
pub type AssistResult<T> = Result<T, AssistError>;

/// Boxed future returned by provider calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One language rendering of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContent {
    pub description: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Analysis attached to an element, keyed by language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub en: AnalysisContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<AnalysisContent>,
}

impl AnalysisResult {
    pub fn english(content: AnalysisContent) -> Self {
        Self {
            en: content,
            zh: None,
        }
    }
}

/// Inputs for a generation call, distilled from a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Note contents joined into guidance text. May be empty when images
    /// carry the context alone.
    pub instructions: String,
    /// Data URLs of the selected images and drawings.
    pub image_sources: Vec<String>,
}

/// An image produced by a provider, with its natural pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub src: String,
    pub width: f64,
    pub height: f64,
}

/// Everything a provider needs to extend an image past its borders.
#[derive(Debug, Clone, PartialEq)]
pub struct OutpaintRequest {
    /// Data URL of the existing image.
    pub src: String,
    /// Frame size in world units; the generated image fills this.
    pub frame_width: f64,
    pub frame_height: f64,
    /// Top-left of the existing image inside the frame.
    pub image_left: f64,
    pub image_top: f64,
    pub image_width: f64,
    pub image_height: f64,
    /// User guidance, possibly empty. Providers supply their own default.
    pub prompt: String,
}

/// Provider of model-backed operations.
///
/// Off wasm, implementations must be `Send + Sync`.
#[cfg(not(target_arch = "wasm32"))]
pub trait AssistProvider: Send + Sync {
    /// Describe an image and suggest prompt refinements.
    fn analyze_image(&self, src: &str) -> BoxFuture<'_, AssistResult<AnalysisContent>>;

    /// Rework note text into a stronger generation prompt.
    fn optimize_prompt(&self, text: &str) -> BoxFuture<'_, AssistResult<AnalysisContent>>;

    /// Produce candidate images from the request context.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> BoxFuture<'_, AssistResult<Vec<GeneratedImage>>>;

    /// Extend an image to fill the request frame.
    fn outpaint(&self, request: &OutpaintRequest) -> BoxFuture<'_, AssistResult<GeneratedImage>>;
}

/// Provider of model-backed operations, without the thread-safety bounds.
#[cfg(target_arch = "wasm32")]
pub trait AssistProvider {
    /// Describe an image and suggest prompt refinements.
    fn analyze_image(&self, src: &str) -> BoxFuture<'_, AssistResult<AnalysisContent>>;

    /// Rework note text into a stronger generation prompt.
    fn optimize_prompt(&self, text: &str) -> BoxFuture<'_, AssistResult<AnalysisContent>>;

    /// Produce candidate images from the request context.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> BoxFuture<'_, AssistResult<Vec<GeneratedImage>>>;

    /// Extend an image to fill the request frame.
    fn outpaint(&self, request: &OutpaintRequest) -> BoxFuture<'_, AssistResult<GeneratedImage>>;
}

/// Build a generation request from the selected elements.
///
/// Notes contribute guidance text; images and drawings contribute their
/// sources. Returns `None` when the selection offers no context at all.
pub fn collect_generation_inputs(selected: &[CanvasElement]) -> Option<GenerationRequest> {
    let mut instructions = Vec::new();
    let mut image_sources = Vec::new();
    let mut has_context = false;

    for element in selected {
        match element {
            CanvasElement::Note(note) => {
                has_context = true;
                instructions.push(note.content.clone());
            }
            CanvasElement::Image(image) => {
                has_context = true;
                if !image.src.is_empty() {
                    image_sources.push(image.src.clone());
                }
            }
            CanvasElement::Drawing(drawing) => {
                has_context = true;
                if !drawing.src.is_empty() {
                    image_sources.push(drawing.src.clone());
                }
            }
            _ => {}
        }
    }

    has_context.then(|| GenerationRequest {
        instructions: instructions.join(" \n"),
        image_sources,
    })
}

/// The adjustable frame of an outpaint session, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutpaintFrame {
    /// World-space centroid of the frame.
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl OutpaintFrame {
    fn to_rect(self) -> Rect {
        Rect::from_center_size(self.position, Size::new(self.width, self.height))
    }

    fn from_rect(rect: Rect) -> Self {
        Self {
            position: rect.center(),
            width: rect.width(),
            height: rect.height(),
        }
    }
}

/// Border grip on the outpaint frame, one per edge and corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl FrameHandle {
    fn moves_top(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    fn moves_left(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }
}

/// An outpaint session: one image element and the frame it will grow into.
///
/// The frame starts congruent with the image and the host stretches it
/// outward. It always contains the image's rect; adjustments that would pull
/// an edge inside the image stop at the image's edge. Applying the generated
/// result rewrites the element to the frame.
#[derive(Debug, Clone)]
pub struct OutpaintSession {
    pub element_id: ElementId,
    /// The image as it stood when the session opened.
    pub original: Image,
    pub frame: OutpaintFrame,
}

impl OutpaintSession {
    /// Open a session on an image element.
    pub fn begin(element: &CanvasElement) -> AssistResult<Self> {
        match element {
            CanvasElement::Image(image) => Ok(Self {
                element_id: image.id,
                frame: OutpaintFrame {
                    position: image.position,
                    width: image.width,
                    height: image.height,
                },
                original: image.clone(),
            }),
            _ => Err(AssistError::UnsupportedElement),
        }
    }

    fn image_rect(&self) -> Rect {
        Rect::from_center_size(
            self.original.position,
            Size::new(self.original.width, self.original.height),
        )
    }

    /// Replace the frame with the host's adjusted one, grown where needed so
    /// it still contains the image.
    pub fn set_frame(&mut self, frame: OutpaintFrame) {
        let rect = frame.to_rect().abs().union(self.image_rect());
        self.frame = OutpaintFrame::from_rect(rect);
    }

    /// Stretch the frame from one of its border grips by a world delta.
    ///
    /// Only the gripped edges move; each stops at the image, so dragging a
    /// grip inward past the image leaves that side flush with it.
    pub fn drag_frame_handle(&mut self, handle: FrameHandle, delta: Vec2) {
        let image = self.image_rect();
        let mut rect = self.frame.to_rect();
        if handle.moves_left() {
            rect.x0 = (rect.x0 + delta.x).min(image.x0);
        }
        if handle.moves_right() {
            rect.x1 = (rect.x1 + delta.x).max(image.x1);
        }
        if handle.moves_top() {
            rect.y0 = (rect.y0 + delta.y).min(image.y0);
        }
        if handle.moves_bottom() {
            rect.y1 = (rect.y1 + delta.y).max(image.y1);
        }
        self.frame = OutpaintFrame::from_rect(rect);
    }

    /// Assemble the provider request for this session.
    pub fn request(&self, prompt: impl Into<String>) -> OutpaintRequest {
        let image = &self.original;
        let frame = &self.frame;
        // Top-left of the image when the frame is drawn as a pixel surface.
        let image_left =
            frame.width / 2.0 + (image.position.x - frame.position.x) - image.width / 2.0;
        let image_top =
            frame.height / 2.0 + (image.position.y - frame.position.y) - image.height / 2.0;

        OutpaintRequest {
            src: image.src.clone(),
            frame_width: frame.width,
            frame_height: frame.height,
            image_left,
            image_top,
            image_width: image.width,
            image_height: image.height,
            prompt: prompt.into(),
        }
    }
}

/// Per-element analysis results and their visibility, as the board tracks
/// them.
#[derive(Debug, Clone, Default)]
pub struct AnalysisStore {
    results: HashMap<ElementId, AnalysisResult>,
    visibility: HashMap<ElementId, bool>,
    analyzing: Option<ElementId>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self, id: ElementId) -> Option<&AnalysisResult> {
        self.results.get(&id)
    }

    pub fn results(&self) -> &HashMap<ElementId, AnalysisResult> {
        &self.results
    }

    /// Whether an element's analysis panel should be showing.
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.results.contains_key(&id) && self.visibility.get(&id).copied().unwrap_or(false)
    }

    pub fn toggle_visibility(&mut self, id: ElementId) {
        let entry = self.visibility.entry(id).or_insert(false);
        *entry = !*entry;
    }

    /// Record a finished analysis and reveal it.
    pub fn store(&mut self, id: ElementId, result: AnalysisResult) {
        self.results.insert(id, result);
        self.visibility.insert(id, true);
    }

    /// The element with an analysis in flight, if any.
    pub fn analyzing(&self) -> Option<ElementId> {
        self.analyzing
    }

    pub fn set_analyzing(&mut self, id: Option<ElementId>) {
        self.analyzing = id;
    }

    /// Swap in an imported result set, hiding everything until toggled.
    pub fn replace(&mut self, results: HashMap<ElementId, AnalysisResult>) {
        self.results = results;
        self.visibility.clear();
        self.analyzing = None;
    }
}

/// A decoded `data:` URL payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Split a `data:<mime>;base64,<payload>` URL into mime type and bytes.
///
/// Odd headers fall back to image/png; only a missing payload separator or a
/// bad base64 body fails.
pub fn parse_data_url(src: &str) -> AssistResult<DataUrl> {
    let (header, payload) = src.split_once(',').ok_or(AssistError::MalformedDataUrl)?;
    let mime_type = header
        .strip_prefix("data:")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .filter(|mime| !mime.is_empty())
        .unwrap_or("image/png")
        .to_string();
    let bytes = STANDARD.decode(payload)?;
    Ok(DataUrl { mime_type, bytes })
}
