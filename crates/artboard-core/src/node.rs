//! The scene tree produced by interpreting a content stream.

use crate::geometry::Matrix;
use crate::graphics::GraphicsState;

/// A produced scene node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "Type")
)]
pub enum Node {
    /// A painted or clipping path.
    Path(Path),
    /// A group of text runs shown between `BT` and `ET`.
    TextGroup(TextGroup),
    /// An external object placed by `Do`.
    XObject(XObject),
    /// A shading painted by `sh`.
    Shading(Shading),
    /// A marked-content group (`BDC`/`BMC` … `EMC`).
    MarkedContext(MarkedContext),
}

/// Fill rule selected by the painting operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// Nonzero winding number rule (default).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "nonzero-winding-number"))]
    NonZeroWinding,
    /// Even-odd rule (`f*`, `B*`, `b*`, `W*`).
    #[cfg_attr(feature = "serde", serde(rename = "even-odd"))]
    EvenOdd,
}

/// One point record within a subpath.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "Type")
)]
pub enum PathPoint {
    /// Start a new position (`m`).
    Move {
        /// `[x, y]`.
        #[cfg_attr(feature = "serde", serde(rename = "Coords"))]
        coords: [f64; 2],
    },
    /// Straight segment (`l`).
    Line {
        /// `[x, y]`.
        #[cfg_attr(feature = "serde", serde(rename = "Coords"))]
        coords: [f64; 2],
    },
    /// Cubic Bézier segment (`c`, or synthesized for `v`/`y`).
    Curve {
        /// `[x1, y1, x2, y2, x3, y3]` — both control points then the endpoint.
        #[cfg_attr(feature = "serde", serde(rename = "Coords"))]
        coords: [f64; 6],
    },
}

/// One subpath of a path: either a point sequence or a literal rectangle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "Type")
)]
pub enum Subpath {
    /// A sequence of points with a closed flag.
    Path {
        /// The point records in construction order.
        #[cfg_attr(feature = "serde", serde(rename = "Points"))]
        points: Vec<PathPoint>,
        /// Whether the subpath was closed (`h`, or a closing painting operator).
        #[cfg_attr(feature = "serde", serde(rename = "Closed"))]
        closed: bool,
    },
    /// A rectangle appended by `re`.
    Rect {
        /// `[x, y, width, height]`.
        #[cfg_attr(feature = "serde", serde(rename = "Coords"))]
        coords: [f64; 4],
    },
}

/// A path node: subpaths plus the painting decision and state snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct Path {
    /// Graphics state at the time the path was painted.
    pub graphics_state: GraphicsState,
    /// Subpaths in construction order.
    pub subpaths: Vec<Subpath>,
    /// Fill rule selected by the painting operator.
    pub fill_rule: FillRule,
    /// Whether the path is filled.
    pub fill: bool,
    /// Whether the path is stroked.
    pub stroke: bool,
}

impl Path {
    /// An empty, unpainted path snapshotting the given state.
    pub fn new(graphics_state: GraphicsState) -> Self {
        Self {
            graphics_state,
            subpaths: Vec::new(),
            fill_rule: FillRule::NonZeroWinding,
            fill: false,
            stroke: false,
        }
    }
}

/// An element of a `TJ` payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum TextItem {
    /// A decoded string.
    Text(String),
    /// A kerning adjustment in thousandths of text-space units.
    Offset(f64),
}

/// The decoded payload of a text-showing operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum TextPayload {
    /// `Tj`, `'`, `"` — one decoded string.
    Plain(String),
    /// `TJ` — strings interleaved with kerning offsets.
    Kerned(Vec<TextItem>),
}

/// One shown text run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct TextRun {
    /// Graphics state at the time of showing.
    pub graphics_state: GraphicsState,
    /// Text matrix when the run was shown.
    pub text_matrix: Matrix,
    /// Text line matrix when the run was shown.
    pub text_line_matrix: Matrix,
    /// The decoded payload.
    pub text: TextPayload,
}

/// An ordered group of text runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct TextGroup {
    /// The runs in stream order.
    pub texts: Vec<TextRun>,
}

/// An external object reference placed by `Do`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct XObject {
    /// Resource name of the object.
    pub name: String,
    /// Graphics state at the time of placement.
    pub graphics_state: GraphicsState,
}

/// A shading painted by `sh`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct Shading {
    /// Resource name of the shading.
    pub name: String,
    /// Graphics state at the time of painting.
    pub graphics_state: GraphicsState,
}

/// A marked-content group.
///
/// The interpreter keeps a stack of open contexts rooted at an implicit,
/// tagless context whose kids become the stream's output.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct MarkedContext {
    /// Tag name from `BDC`/`BMC`; `None` for the implicit root.
    pub tag: Option<String>,
    /// Properties name from `BDC`, if given.
    pub properties: Option<String>,
    /// Child nodes in stream order.
    pub kids: Vec<Node>,
}
