//! OpsBoard Core Library
//!
//! Platform-agnostic document model and interaction logic for the OpsBoard
//! operations canvas.

pub mod assist;
pub mod board;
pub mod dispatcher;
pub mod elements;
pub mod factory;
pub mod geometry;
pub mod group_transform;
pub mod history;
pub mod layout;
pub mod manipulate;
pub mod selection;
pub mod snap;
pub mod transfer;
pub mod viewport;

pub use assist::{
    AnalysisResult, AnalysisStore, AssistError, FrameHandle, GeneratedImage, GenerationRequest,
    OutpaintFrame, OutpaintSession,
};
pub use board::{Board, ImageSource, InteractionMode};
pub use dispatcher::{ContextMenuRequest, Dispatcher, Key, MarqueeRect, Modifiers, MouseButton};
pub use elements::{
    Arrow, ArrowEnd, CanvasElement, Drawing, ElementId, Equipment, EquipmentStatus, GroupId, Image,
    Note, TextAlign,
};
pub use history::History;
pub use layout::{AlignKind, DistributeAxis};
pub use selection::{GroupInfo, SelectionSet};
pub use snap::{GRID_SIZE, maybe_snap, snap_point};
pub use transfer::{ClipboardPayload, TransferError};
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP};
