//! Colour spaces and alternate-space normalization.
//!
//! Indirect colour spaces (ICCBased, Separation) must be resolved to a
//! concrete device space before their component tuples can be interpreted.
//! Resolution is pure: it depends only on the space itself.

use crate::warning::{Warning, WarningCode};

/// A colour space as referenced from a Resources dictionary or set directly
/// by a colour operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    /// A directly named space, e.g. `DeviceRGB`.
    Named(String),
    /// `[/ICCBased stream]` — an ICC profile with `N` components and an
    /// optional explicit `/Alternate` space.
    IccBased {
        /// Explicit alternate space name, if the stream dictionary had one.
        alternate: Option<String>,
        /// Number of colour components declared by the profile.
        n: u32,
    },
    /// `[/Separation name alternate tintTransform]` — a spot colour with a
    /// declared fallback space.
    Separation {
        /// The colourant name.
        name: String,
        /// The declared alternate space.
        alternate: String,
    },
    /// `[/Pattern]` — passes through resolution unchanged.
    Pattern,
}

/// Resolve an indirect colour space to a concrete space name.
///
/// ICCBased spaces prefer their explicit `/Alternate`; otherwise the device
/// space is derived from the component count `N` (1 → DeviceGray,
/// 3 → DeviceRGB, 4 → DeviceCMYK). An unmapped `N` records a warning and
/// falls back to DeviceRGB. Separation resolves to its declared alternate;
/// Pattern and named spaces pass through unchanged.
pub fn resolve_alternate(space: &ColorSpace, warnings: &mut Vec<Warning>) -> String {
    match space {
        ColorSpace::Named(name) => name.clone(),
        ColorSpace::IccBased { alternate, n } => {
            if let Some(alternate) = alternate {
                return alternate.clone();
            }
            match n {
                1 => "DeviceGray".to_string(),
                3 => "DeviceRGB".to_string(),
                4 => "DeviceCMYK".to_string(),
                _ => {
                    warnings.push(Warning::with_code(
                        WarningCode::DecodeFallback,
                        format!("no alternate for ICCBased colour space with N={n}, using DeviceRGB"),
                    ));
                    "DeviceRGB".to_string()
                }
            }
        }
        ColorSpace::Separation { alternate, .. } => alternate.clone(),
        ColorSpace::Pattern => "Pattern".to_string(),
    }
}

/// Component tuple of the given value shaped for a space: 1 component for
/// DeviceGray, 4 for DeviceCMYK with a 1.0 fourth slot, 3 otherwise.
fn shape(space: &ColorSpace, value: f64) -> Vec<f64> {
    match space {
        ColorSpace::Named(name) if name == "DeviceGray" => vec![value],
        ColorSpace::Named(name) if name == "DeviceCMYK" => vec![value, value, value, 1.0],
        _ => vec![value, value, value],
    }
}

/// The zero-intensity colour tuple for a space, used when a colour space is
/// selected before any components are given.
pub fn default_components(space: &ColorSpace) -> Vec<f64> {
    shape(space, 0.0)
}

/// Widen a single-component tuple to the shape its space expects.
///
/// A Separation colour reduced to one tint value is mapped through the
/// alternate space's shape; tuples that already carry more than one
/// component are returned unchanged.
pub fn expand_single_component(space: &ColorSpace, components: Vec<f64>) -> Vec<f64> {
    if components.len() == 1 {
        return shape(space, components[0]);
    }
    components
}
