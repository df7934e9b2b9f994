//! The graphics-state value type snapshotted into every produced node.

use crate::color::ColorSpace;
use crate::geometry::Matrix;
use crate::node::Path;

/// One component of a colour tuple.
///
/// Colour operators normally supply numbers; `scn`/`SCN` under a Pattern
/// colour space append a trailing pattern name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ColorComponent {
    /// A numeric component.
    Value(f64),
    /// A pattern name.
    Name(String),
}

/// A dash pattern: the dash array plus its phase.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct DashPattern {
    /// Alternating on/off lengths; empty means a solid line.
    pub dashes: Vec<f64>,
    /// Offset into the dash array at which stroking starts.
    pub phase: f64,
}

/// An opaque value carried through from a Resources dictionary, e.g. the
/// parameter dictionary a `gs` operator names.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum PropertyValue {
    /// A number.
    Number(f64),
    /// A name object.
    Name(String),
    /// A string.
    Text(String),
    /// A boolean.
    Boolean(bool),
    /// An ordered array.
    Array(Vec<PropertyValue>),
    /// A dictionary with insertion-ordered keys.
    Dict(Vec<(String, PropertyValue)>),
}

/// The graphics state: a value type snapshotted by `q` and restored by `Q`.
///
/// Cloning on push keeps snapshots independent; a node's recorded state never
/// aliases the interpreter's live state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct GraphicsState {
    /// Current transformation matrix; unset until the first `cm`.
    #[cfg_attr(feature = "serde", serde(rename = "CTM"))]
    pub ctm: Option<Matrix>,
    /// Accumulated clipping paths, innermost last.
    pub clipping_path: Option<Vec<Path>>,
    /// Stroking colour space.
    pub color_space_stroking: ColorSpace,
    /// Non-stroking colour space.
    pub color_space_non_stroking: ColorSpace,
    /// Stroking colour components.
    pub color_stroking: Vec<ColorComponent>,
    /// Non-stroking colour components.
    pub color_non_stroking: Vec<ColorComponent>,
    /// Character spacing (`Tc`).
    pub text_char_space: f64,
    /// Word spacing (`Tw`).
    pub text_word_space: f64,
    /// Horizontal scaling percentage (`Tz`).
    pub text_scale: f64,
    /// Text leading (`TL`, also set by `TD`).
    pub text_leading: f64,
    /// Resource name of the active font (`Tf`).
    pub text_font: Option<String>,
    /// Active font size (`Tf`).
    pub text_font_size: f64,
    /// Text rendering mode (`Tr`).
    pub text_render: f64,
    /// Text rise (`Ts`).
    pub text_rise: f64,
    /// Line width (`w`).
    pub line_width: f64,
    /// Line cap style (`J`).
    pub line_cap: f64,
    /// Line join style (`j`).
    pub line_join: f64,
    /// Miter limit (`M`).
    pub miter_limit: f64,
    /// Dash pattern (`d`).
    pub dash_pattern: DashPattern,
    /// Rendering intent (`ri`).
    pub rendering_intent: String,
    /// Flatness tolerance (`i`).
    pub flatness: f64,
    /// Automatic stroke adjustment flag.
    pub stroke_adjustment: bool,
    /// Blend mode.
    pub blend_mode: String,
    /// Soft mask, if any.
    pub soft_mask: Option<String>,
    /// Constant alpha.
    pub alpha_constant: f64,
    /// Alpha source flag.
    pub alpha_source: bool,
    /// Parameters installed by the `gs` operator.
    pub specified_parameters: Option<PropertyValue>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: None,
            clipping_path: None,
            color_space_stroking: ColorSpace::Named("DeviceGray".to_string()),
            color_space_non_stroking: ColorSpace::Named("DeviceGray".to_string()),
            color_stroking: black(),
            color_non_stroking: black(),
            text_char_space: 0.0,
            text_word_space: 0.0,
            text_scale: 100.0,
            text_leading: 0.0,
            text_font: None,
            text_font_size: 0.0,
            text_render: 0.0,
            text_rise: 0.0,
            line_width: 1.0,
            line_cap: 0.0,
            line_join: 0.0,
            miter_limit: 10.0,
            dash_pattern: DashPattern::default(),
            rendering_intent: "RelativeColorimetric".to_string(),
            flatness: 0.0,
            stroke_adjustment: false,
            blend_mode: "Normal".to_string(),
            soft_mask: None,
            alpha_constant: 1.0,
            alpha_source: false,
            specified_parameters: None,
        }
    }
}

fn black() -> Vec<ColorComponent> {
    vec![
        ColorComponent::Value(0.0),
        ColorComponent::Value(0.0),
        ColorComponent::Value(0.0),
    ]
}

impl GraphicsState {
    /// Replace a colour tuple with plain numeric components.
    pub fn components(values: &[f64]) -> Vec<ColorComponent> {
        values.iter().map(|&v| ColorComponent::Value(v)).collect()
    }
}
