//! artboard-core: Backend-independent scene-tree data types.
//!
//! This crate provides the typed nodes produced by interpreting an
//! Illustrator/PDF content stream (paths, text groups, XObjects, shadings,
//! marked-content groups), the graphics-state value type they snapshot, and
//! the fixed text-encoding tables used for glyph decoding. It has no
//! mandatory external dependencies; `serde` derives are available behind the
//! `serde` feature for serializing scene trees with deterministic field
//! ordering.

pub mod color;
pub mod encoding;
pub mod geometry;
pub mod graphics;
pub mod node;
pub mod warning;

pub use color::{ColorSpace, default_components, expand_single_component, resolve_alternate};
pub use encoding::{BaseEncoding, glyph_name_to_char};
pub use geometry::Matrix;
pub use graphics::{ColorComponent, DashPattern, GraphicsState, PropertyValue};
pub use node::{
    FillRule, MarkedContext, Node, Path, PathPoint, Shading, Subpath, TextGroup, TextItem,
    TextPayload, TextRun, XObject,
};
pub use warning::{ParseOutcome, Warning, WarningCode};
