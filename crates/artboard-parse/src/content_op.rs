//! The closed content-stream operator set.
//!
//! One variant per keyword (PDF 7.8.2 / 8.5 / 9.4). Operands whose grammar is
//! fixed are decoded into typed payloads at construction; operands whose
//! interpretation depends on interpreter state (text strings, extended colour
//! components, marked-content properties) stay as raw operand lists.

use crate::error::ParseError;
use crate::operand::Operand;
use crate::operator::{Args, OperatorSet};

/// A typed content-stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOp {
    // --- Graphics state ---
    /// `q` — push the graphics state.
    Save,
    /// `Q` — pop the graphics state.
    Restore,
    /// `cm a b c d e f` — set the CTM.
    Concat([f64; 6]),
    /// `w` — line width.
    LineWidth(f64),
    /// `J` — line cap.
    LineCap(f64),
    /// `j` — line join.
    LineJoin(f64),
    /// `M` — miter limit.
    MiterLimit(f64),
    /// `d dashArray dashPhase` — dash pattern.
    Dash {
        /// Alternating on/off lengths.
        dashes: Vec<f64>,
        /// Starting phase.
        phase: f64,
    },
    /// `ri` — rendering intent.
    RenderingIntent(String),
    /// `i` — flatness tolerance.
    Flatness(f64),
    /// `gs` — install named ExtGState parameters.
    ExtGState(String),

    // --- Path construction ---
    /// `m x y`
    MoveTo([f64; 2]),
    /// `l x y`
    LineTo([f64; 2]),
    /// `c x1 y1 x2 y2 x3 y3`
    CurveTo([f64; 6]),
    /// `v x2 y2 x3 y3` — first control point is the current point.
    CurveToInitial([f64; 4]),
    /// `y x1 y1 x3 y3` — second control point is the endpoint.
    CurveToFinal([f64; 4]),
    /// `h` — close the current subpath.
    ClosePath,
    /// `re x y width height`
    Rect([f64; 4]),

    // --- Path painting ---
    /// `S` — stroke.
    Stroke,
    /// `s` — close and stroke.
    CloseStroke,
    /// `f` — fill.
    Fill,
    /// `F` — legacy alias of `f`.
    FillCompat,
    /// `f*` — fill, even-odd.
    FillEvenOdd,
    /// `B` — fill and stroke.
    FillStroke,
    /// `B*` — fill and stroke, even-odd.
    FillStrokeEvenOdd,
    /// `b` — close, fill, and stroke.
    CloseFillStroke,
    /// `b*` — close, fill, and stroke, even-odd.
    CloseFillStrokeEvenOdd,
    /// `n` — end the path without painting.
    EndPath,

    // --- Clipping ---
    /// `W` — intersect the clipping path.
    Clip,
    /// `W*` — intersect the clipping path, even-odd.
    ClipEvenOdd,

    // --- Text objects ---
    /// `BT`
    BeginText,
    /// `ET`
    EndText,

    // --- Text positioning ---
    /// `Td tx ty`
    TextMove([f64; 2]),
    /// `TD tx ty` — also sets the leading to `-ty`.
    TextMoveLeading([f64; 2]),
    /// `Tm a b c d e f`
    SetTextMatrix([f64; 6]),
    /// `T*`
    NextLine,

    // --- Text showing (decoded against the active font) ---
    /// `Tj string`
    ShowText(Vec<Operand>),
    /// `' string` — next line, then show.
    MoveShowText(Vec<Operand>),
    /// `" aw ac string` — set spacing, next line, then show.
    MoveShowTextSpacing(Vec<Operand>),
    /// `TJ array` — show with individual glyph positioning.
    ShowTextAdjusted(Vec<Operand>),

    // --- Text state ---
    /// `Tc`
    CharSpace(f64),
    /// `Tw`
    WordSpace(f64),
    /// `Tz`
    HorizontalScale(f64),
    /// `TL`
    Leading(f64),
    /// `Tf font size`
    SetFont {
        /// Font resource name.
        name: String,
        /// Font size.
        size: f64,
    },
    /// `Tr`
    RenderMode(f64),
    /// `Ts`
    Rise(f64),

    // --- Colour ---
    /// `CS name`
    StrokeColorSpace(String),
    /// `cs name`
    FillColorSpace(String),
    /// `SC c1...cn`
    StrokeColor(Vec<Operand>),
    /// `SCN c1...cn` or `SCN c1...cn name` under a Pattern space.
    StrokeColorExtended(Vec<Operand>),
    /// `sc c1...cn`
    FillColor(Vec<Operand>),
    /// `scn c1...cn` or `scn c1...cn name` under a Pattern space.
    FillColorExtended(Vec<Operand>),
    /// `G gray`
    StrokeGray(f64),
    /// `g gray`
    FillGray(f64),
    /// `RG r g b`
    StrokeRgb([f64; 3]),
    /// `rg r g b`
    FillRgb([f64; 3]),
    /// `K c m y k`
    StrokeCmyk([f64; 4]),
    /// `k c m y k`
    FillCmyk([f64; 4]),

    // --- XObjects and shadings ---
    /// `Do name`
    PaintXObject(String),
    /// `sh name`
    PaintShading(String),

    // --- Marked content ---
    /// `MP tag` — marked point (recognized, skipped).
    MarkPoint(Vec<Operand>),
    /// `DP tag properties` — marked point with properties (recognized, skipped).
    MarkPointTagged(Vec<Operand>),
    /// `BMC tag`
    BeginMarked {
        /// Tag name.
        tag: String,
    },
    /// `BDC tag properties`
    BeginMarkedTagged {
        /// Tag name.
        tag: String,
        /// Properties name, when given.
        properties: Option<String>,
    },
    /// `EMC`
    EndMarked,

    // --- Inline images (recognized, not decoded) ---
    /// `BI`
    BeginInlineImage,
    /// `ID`
    InlineImageData,
    /// `EI`
    EndInlineImage,

    // --- Compatibility ---
    /// `BX`
    BeginCompat,
    /// `EX`
    EndCompat,
}

impl ContentOp {
    /// True for the operators that open a path object (`m` .. `re`).
    pub fn is_path_construction(&self) -> bool {
        matches!(
            self,
            ContentOp::MoveTo(_)
                | ContentOp::LineTo(_)
                | ContentOp::CurveTo(_)
                | ContentOp::CurveToInitial(_)
                | ContentOp::CurveToFinal(_)
                | ContentOp::ClosePath
                | ContentOp::Rect(_)
        )
    }

    /// True for the painting operators that terminate a path object.
    pub fn is_path_painting(&self) -> bool {
        matches!(
            self,
            ContentOp::Stroke
                | ContentOp::CloseStroke
                | ContentOp::Fill
                | ContentOp::FillCompat
                | ContentOp::FillEvenOdd
                | ContentOp::FillStroke
                | ContentOp::FillStrokeEvenOdd
                | ContentOp::CloseFillStroke
                | ContentOp::CloseFillStrokeEvenOdd
                | ContentOp::EndPath
        )
    }

    /// True for `W`/`W*`.
    pub fn is_path_clipping(&self) -> bool {
        matches!(self, ContentOp::Clip | ContentOp::ClipEvenOdd)
    }
}

// --- Operand decoding helpers ---

/// Every operand must be a number.
pub(crate) fn decode_numbers(operands: &[Operand]) -> Result<Vec<f64>, ParseError> {
    operands
        .iter()
        .map(|op| match op {
            Operand::Number(n) => Ok(*n),
            other => Err(ParseError::Assertion(format!(
                "bogus operand {other:?} where a number was expected"
            ))),
        })
        .collect()
}

/// Exactly one numeric operand.
pub(crate) fn decode_number(operands: &[Operand]) -> Result<f64, ParseError> {
    decode_numbers(operands)?
        .first()
        .copied()
        .ok_or_else(|| ParseError::Assertion("missing numeric operand".to_string()))
}

/// Every operand must be a name.
pub(crate) fn decode_names(operands: &[Operand]) -> Result<Vec<String>, ParseError> {
    operands
        .iter()
        .map(|op| match op {
            Operand::Name(n) => Ok(n.clone()),
            other => Err(ParseError::Assertion(format!(
                "bogus operand {other:?} where a name was expected"
            ))),
        })
        .collect()
}

/// Exactly one name operand.
pub(crate) fn decode_name(operands: &[Operand]) -> Result<String, ParseError> {
    decode_names(operands)?
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::Assertion("missing name operand".to_string()))
}

fn fixed<const N: usize>(keyword: &str, operands: &[Operand]) -> Result<[f64; N], ParseError> {
    decode_numbers(operands)?.try_into().map_err(|_| {
        ParseError::Assertion(format!(
            "operator '{keyword}' expects {N} numeric operands, got {}",
            operands.len()
        ))
    })
}

/// `d` operands: `[dashes] phase`.
fn decode_dash(operands: &[Operand]) -> Result<(Vec<f64>, f64), ParseError> {
    match operands {
        [Operand::Array(items), Operand::Number(phase)] => {
            Ok((decode_numbers(items)?, *phase))
        }
        _ => Err(ParseError::Assertion(format!(
            "bogus dash pattern operands {operands:?}"
        ))),
    }
}

impl OperatorSet for ContentOp {
    const KEYWORDS: &'static [&'static str] = &[
        "q", "Q", "cm", "w", "J", "j", "M", "d", "ri", "i", "gs", // graphics state
        "m", "l", "c", "v", "y", "h", "re", // path construction
        "S", "s", "f", "F", "f*", "B", "B*", "b", "b*", "n", // path painting
        "W", "W*", // clipping
        "BT", "ET", // text objects
        "Td", "TD", "Tm", "T*", // text positioning
        "Tj", "'", "\"", "TJ", // text showing
        "Tc", "Tw", "Tz", "TL", "Tf", "Tr", "Ts", // text state
        "CS", "cs", "SC", "SCN", "sc", "scn", "G", "g", "RG", "rg", "K", "k", // colour
        "Do", "sh", // xobjects and shadings
        "MP", "DP", "BMC", "BDC", "EMC", // marked content
        "BI", "ID", "EI", // inline images
        "BX", "EX", // compatibility
    ];

    fn construct(keyword: &str, args: Args<'_, '_>) -> Result<Self, ParseError> {
        let operands = args.parse()?;
        Ok(match keyword {
            "q" => ContentOp::Save,
            "Q" => ContentOp::Restore,
            "cm" => ContentOp::Concat(fixed(keyword, &operands)?),
            "w" => ContentOp::LineWidth(decode_number(&operands)?),
            "J" => ContentOp::LineCap(decode_number(&operands)?),
            "j" => ContentOp::LineJoin(decode_number(&operands)?),
            "M" => ContentOp::MiterLimit(decode_number(&operands)?),
            "d" => {
                let (dashes, phase) = decode_dash(&operands)?;
                ContentOp::Dash { dashes, phase }
            }
            "ri" => ContentOp::RenderingIntent(decode_name(&operands)?),
            "i" => ContentOp::Flatness(decode_number(&operands)?),
            "gs" => ContentOp::ExtGState(decode_name(&operands)?),

            "m" => ContentOp::MoveTo(fixed(keyword, &operands)?),
            "l" => ContentOp::LineTo(fixed(keyword, &operands)?),
            "c" => ContentOp::CurveTo(fixed(keyword, &operands)?),
            "v" => ContentOp::CurveToInitial(fixed(keyword, &operands)?),
            "y" => ContentOp::CurveToFinal(fixed(keyword, &operands)?),
            "h" => ContentOp::ClosePath,
            "re" => ContentOp::Rect(fixed(keyword, &operands)?),

            "S" => ContentOp::Stroke,
            "s" => ContentOp::CloseStroke,
            "f" => ContentOp::Fill,
            "F" => ContentOp::FillCompat,
            "f*" => ContentOp::FillEvenOdd,
            "B" => ContentOp::FillStroke,
            "B*" => ContentOp::FillStrokeEvenOdd,
            "b" => ContentOp::CloseFillStroke,
            "b*" => ContentOp::CloseFillStrokeEvenOdd,
            "n" => ContentOp::EndPath,

            "W" => ContentOp::Clip,
            "W*" => ContentOp::ClipEvenOdd,

            "BT" => ContentOp::BeginText,
            "ET" => ContentOp::EndText,

            "Td" => ContentOp::TextMove(fixed(keyword, &operands)?),
            "TD" => ContentOp::TextMoveLeading(fixed(keyword, &operands)?),
            "Tm" => ContentOp::SetTextMatrix(fixed(keyword, &operands)?),
            "T*" => ContentOp::NextLine,

            "Tj" => ContentOp::ShowText(operands),
            "'" => ContentOp::MoveShowText(operands),
            "\"" => ContentOp::MoveShowTextSpacing(operands),
            "TJ" => ContentOp::ShowTextAdjusted(operands),

            "Tc" => ContentOp::CharSpace(decode_number(&operands)?),
            "Tw" => ContentOp::WordSpace(decode_number(&operands)?),
            "Tz" => ContentOp::HorizontalScale(decode_number(&operands)?),
            "TL" => ContentOp::Leading(decode_number(&operands)?),
            "Tf" => match operands.as_slice() {
                [font, size] => ContentOp::SetFont {
                    name: decode_name(std::slice::from_ref(font))?,
                    size: decode_number(std::slice::from_ref(size))?,
                },
                _ => {
                    return Err(ParseError::Assertion(format!(
                        "operator 'Tf' expects a name and a size, got {operands:?}"
                    )));
                }
            },
            "Tr" => ContentOp::RenderMode(decode_number(&operands)?),
            "Ts" => ContentOp::Rise(decode_number(&operands)?),

            "CS" => ContentOp::StrokeColorSpace(decode_name(&operands)?),
            "cs" => ContentOp::FillColorSpace(decode_name(&operands)?),
            "SC" => ContentOp::StrokeColor(operands),
            "SCN" => ContentOp::StrokeColorExtended(operands),
            "sc" => ContentOp::FillColor(operands),
            "scn" => ContentOp::FillColorExtended(operands),
            "G" => ContentOp::StrokeGray(decode_number(&operands)?),
            "g" => ContentOp::FillGray(decode_number(&operands)?),
            "RG" => ContentOp::StrokeRgb(fixed(keyword, &operands)?),
            "rg" => ContentOp::FillRgb(fixed(keyword, &operands)?),
            "K" => ContentOp::StrokeCmyk(fixed(keyword, &operands)?),
            "k" => ContentOp::FillCmyk(fixed(keyword, &operands)?),

            "Do" => ContentOp::PaintXObject(decode_name(&operands)?),
            "sh" => ContentOp::PaintShading(decode_name(&operands)?),

            "MP" => ContentOp::MarkPoint(operands),
            "DP" => ContentOp::MarkPointTagged(operands),
            "BMC" => ContentOp::BeginMarked {
                tag: decode_name(&operands)?,
            },
            "BDC" => {
                let mut names = decode_names(&operands)?.into_iter();
                let tag = names.next().ok_or_else(|| {
                    ParseError::Assertion("BDC without a tag operand".to_string())
                })?;
                ContentOp::BeginMarkedTagged {
                    tag,
                    properties: names.next(),
                }
            }
            "EMC" => ContentOp::EndMarked,

            "BI" => ContentOp::BeginInlineImage,
            "ID" => ContentOp::InlineImageData,
            "EI" => ContentOp::EndInlineImage,

            "BX" => ContentOp::BeginCompat,
            "EX" => ContentOp::EndCompat,

            other => {
                return Err(ParseError::Structural(format!(
                    "keyword '{other}' is not in the content operator set"
                )));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::parse_operators;

    fn parse(data: &[u8]) -> Vec<ContentOp> {
        parse_operators(data).unwrap()
    }

    #[test]
    fn graphics_state_operators_decode_typed() {
        assert_eq!(
            parse(b"q 1 0 0 1 72 720 cm 2.5 w Q"),
            vec![
                ContentOp::Save,
                ContentOp::Concat([1.0, 0.0, 0.0, 1.0, 72.0, 720.0]),
                ContentOp::LineWidth(2.5),
                ContentOp::Restore,
            ]
        );
    }

    #[test]
    fn dash_pattern_decodes_array_and_phase() {
        assert_eq!(
            parse(b"[3 5] 6 d"),
            vec![ContentOp::Dash {
                dashes: vec![3.0, 5.0],
                phase: 6.0,
            }]
        );
    }

    #[test]
    fn path_operators_decode_typed() {
        assert_eq!(
            parse(b"0 0 m 0 -115.151 -58.203 -208.5 -130 -208.5 c h f*"),
            vec![
                ContentOp::MoveTo([0.0, 0.0]),
                ContentOp::CurveTo([0.0, -115.151, -58.203, -208.5, -130.0, -208.5]),
                ContentOp::ClosePath,
                ContentOp::FillEvenOdd,
            ]
        );
    }

    #[test]
    fn starred_operators_are_distinct_keywords() {
        assert_eq!(parse(b"W* n"), vec![ContentOp::ClipEvenOdd, ContentOp::EndPath]);
        assert_eq!(parse(b"B*"), vec![ContentOp::FillStrokeEvenOdd]);
    }

    #[test]
    fn tf_decodes_name_and_size() {
        assert_eq!(
            parse(b"/F1 12 Tf"),
            vec![ContentOp::SetFont {
                name: "F1".to_string(),
                size: 12.0,
            }]
        );
    }

    #[test]
    fn text_showing_keeps_raw_operands() {
        assert_eq!(
            parse(b"(Hello) Tj"),
            vec![ContentOp::ShowText(vec![Operand::LiteralString(
                b"Hello".to_vec()
            )])]
        );
    }

    #[test]
    fn quote_operators_lex_as_keywords() {
        assert_eq!(
            parse(b"(a) '"),
            vec![ContentOp::MoveShowText(vec![Operand::LiteralString(
                b"a".to_vec()
            )])]
        );
        assert_eq!(
            parse(b"1 2 (a) \""),
            vec![ContentOp::MoveShowTextSpacing(vec![
                Operand::Number(1.0),
                Operand::Number(2.0),
                Operand::LiteralString(b"a".to_vec()),
            ])]
        );
    }

    #[test]
    fn bdc_decodes_tag_and_optional_properties() {
        assert_eq!(
            parse(b"/OC /MC0 BDC EMC"),
            vec![
                ContentOp::BeginMarkedTagged {
                    tag: "OC".to_string(),
                    properties: Some("MC0".to_string()),
                },
                ContentOp::EndMarked,
            ]
        );
        assert_eq!(
            parse(b"/Artifact BMC EMC"),
            vec![
                ContentOp::BeginMarked {
                    tag: "Artifact".to_string(),
                },
                ContentOp::EndMarked,
            ]
        );
    }

    #[test]
    fn wrong_arity_is_an_assertion_error() {
        let result: Result<Vec<ContentOp>, _> = parse_operators(b"1 0 0 1 72 cm");
        assert!(matches!(result, Err(ParseError::Assertion(_))));
    }

    #[test]
    fn non_numeric_operand_for_numeric_operator_fails() {
        let result: Result<Vec<ContentOp>, _> = parse_operators(b"/Name w");
        assert!(matches!(result, Err(ParseError::Assertion(_))));
    }

    #[test]
    fn category_predicates() {
        assert!(ContentOp::MoveTo([0.0, 0.0]).is_path_construction());
        assert!(ContentOp::Rect([0.0; 4]).is_path_construction());
        assert!(ContentOp::Stroke.is_path_painting());
        assert!(ContentOp::EndPath.is_path_painting());
        assert!(ContentOp::Clip.is_path_clipping());
        assert!(!ContentOp::Save.is_path_construction());
    }
}
