//! The content-stream interpreter.
//!
//! Applies operators strictly in stream order, maintaining the
//! graphics-state stack and the marked-content stack, delegating path
//! objects to the [`PathBuilder`] and text to the [`TextBuilder`], and
//! resolving fonts and colour spaces on demand. The result is the kid list
//! of the single remaining root marked context.

use std::collections::HashMap;

use artboard_core::{
    ColorComponent, ColorSpace, DashPattern, GraphicsState, MarkedContext, Matrix, Node,
    ParseOutcome, PropertyValue, Shading, TextItem, TextPayload, Warning, WarningCode, XObject,
    default_components, expand_single_component, resolve_alternate,
};

use crate::content_op::{ContentOp, decode_number, decode_numbers};
use crate::encoding::{decode_hex, decode_literal};
use crate::error::ParseError;
use crate::font::{Font, FontRef, FontResolver};
use crate::operand::Operand;
use crate::operator::parse_operators;
use crate::path_builder::PathBuilder;
use crate::record;
use crate::session::StreamFetcher;
use crate::text_builder::TextBuilder;

/// The resources in scope for one content stream, as resolved by the outer
/// object-graph reader.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Named colour spaces.
    pub color_space: HashMap<String, ColorSpace>,
    /// Named ExtGState parameter dictionaries, opaque to the interpreter.
    pub ext_g_state: HashMap<String, PropertyValue>,
    /// Named font references.
    pub font: HashMap<String, FontRef>,
}

/// Interpret one content stream into a scene-node list.
///
/// `strict_compat` toggles alternate-colour-space remapping and clip-path
/// pruning to match the reference implementation's output shape.
pub fn parse_content(
    data: &[u8],
    resources: &Resources,
    fetcher: &dyn StreamFetcher,
    fonts: &FontResolver,
    strict_compat: bool,
) -> Result<ParseOutcome<Vec<Node>>, ParseError> {
    let ops = parse_operators::<ContentOp>(data)?;
    Interpreter::new(fetcher, fonts, resources, strict_compat).run(ops)
}

pub(crate) struct Interpreter<'a> {
    fetcher: &'a dyn StreamFetcher,
    fonts: &'a FontResolver,
    resources: &'a Resources,
    strict_compat: bool,
    graphics: Vec<GraphicsState>,
    context: Vec<MarkedContext>,
    text: Option<TextBuilder>,
    warnings: Vec<Warning>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(
        fetcher: &'a dyn StreamFetcher,
        fonts: &'a FontResolver,
        resources: &'a Resources,
        strict_compat: bool,
    ) -> Self {
        Self {
            fetcher,
            fonts,
            resources,
            strict_compat,
            graphics: vec![GraphicsState::default()],
            context: vec![MarkedContext::default()],
            text: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn run(
        mut self,
        ops: Vec<ContentOp>,
    ) -> Result<ParseOutcome<Vec<Node>>, ParseError> {
        let mut cursor = ops.into_iter();
        let mut index = 0usize;
        while let Some(op) = cursor.next() {
            self.apply(op, &mut cursor, index)?;
            index += 1;
        }

        if self.context.len() > 1 {
            record(
                &mut self.warnings,
                Warning::with_code(
                    WarningCode::UnbalancedMarkedContent,
                    format!(
                        "leftover {} marked contexts on stack",
                        self.context.len() - 1
                    ),
                ),
            );
        }
        let top = self.context.pop().unwrap_or_default();
        Ok(ParseOutcome::with_warnings(top.kids, self.warnings))
    }

    fn apply(
        &mut self,
        op: ContentOp,
        cursor: &mut std::vec::IntoIter<ContentOp>,
        index: usize,
    ) -> Result<(), ParseError> {
        match op {
            // --- Path objects: one atomic unit up to the painting operator ---
            op @ (ContentOp::MoveTo(_)
            | ContentOp::LineTo(_)
            | ContentOp::CurveTo(_)
            | ContentOp::CurveToInitial(_)
            | ContentOp::CurveToFinal(_)
            | ContentOp::ClosePath
            | ContentOp::Rect(_)) => {
                let snapshot = self.current()?.clone();
                let result = PathBuilder::new(snapshot, self.strict_compat).run(op, cursor)?;
                if let Some(path) = result.path {
                    self.push_kid(Node::Path(path));
                }
                if let Some(clip) = result.clipping_path {
                    self.current_mut()?
                        .clipping_path
                        .get_or_insert_with(Vec::new)
                        .push(clip);
                }
            }
            op @ (ContentOp::Stroke
            | ContentOp::CloseStroke
            | ContentOp::Fill
            | ContentOp::FillCompat
            | ContentOp::FillEvenOdd
            | ContentOp::FillStroke
            | ContentOp::FillStrokeEvenOdd
            | ContentOp::CloseFillStroke
            | ContentOp::CloseFillStrokeEvenOdd
            | ContentOp::EndPath
            | ContentOp::Clip
            | ContentOp::ClipEvenOdd) => {
                return Err(ParseError::Assertion(format!(
                    "operator {op:?} outside a path object"
                )));
            }

            // --- Graphics state ---
            ContentOp::Save => {
                let snapshot = self.current()?.clone();
                self.graphics.push(snapshot);
            }
            ContentOp::Restore => {
                if self.graphics.pop().is_none() {
                    return Err(ParseError::Assertion(
                        "graphics stack pop without matching push".to_string(),
                    ));
                }
            }
            ContentOp::Concat(matrix) => self.current_mut()?.ctm = Some(Matrix(matrix)),
            ContentOp::LineWidth(v) => self.current_mut()?.line_width = v,
            ContentOp::LineCap(v) => self.current_mut()?.line_cap = v,
            ContentOp::LineJoin(v) => self.current_mut()?.line_join = v,
            ContentOp::MiterLimit(v) => self.current_mut()?.miter_limit = v,
            ContentOp::Dash { dashes, phase } => {
                self.current_mut()?.dash_pattern = DashPattern { dashes, phase };
            }
            ContentOp::RenderingIntent(name) => self.current_mut()?.rendering_intent = name,
            ContentOp::Flatness(v) => self.current_mut()?.flatness = v,
            ContentOp::ExtGState(name) => {
                let parameters = if self.strict_compat {
                    PropertyValue::Name(name)
                } else {
                    match self.resources.ext_g_state.get(&name) {
                        Some(value) => value.clone(),
                        None => PropertyValue::Name(name),
                    }
                };
                self.current_mut()?.specified_parameters = Some(parameters);
            }

            // --- Marked content ---
            ContentOp::BeginMarked { tag } => self.context.push(MarkedContext {
                tag: Some(tag),
                properties: None,
                kids: Vec::new(),
            }),
            ContentOp::BeginMarkedTagged { tag, properties } => {
                self.context.push(MarkedContext {
                    tag: Some(tag),
                    properties,
                    kids: Vec::new(),
                });
            }
            ContentOp::EndMarked => {
                if self.context.len() <= 1 {
                    return Err(ParseError::Assertion(
                        "marked context pop without respective push".to_string(),
                    ));
                }
                if let Some(node) = self.context.pop() {
                    self.push_kid(Node::MarkedContext(node));
                }
            }
            ContentOp::MarkPoint(_) => self.unsupported("MP", index),
            ContentOp::MarkPointTagged(_) => self.unsupported("DP", index),

            // --- Inline images: recognized, never decoded ---
            ContentOp::BeginInlineImage => self.unsupported("BI", index),
            ContentOp::InlineImageData => self.unsupported("ID", index),
            ContentOp::EndInlineImage => self.unsupported("EI", index),

            // --- XObjects and shadings ---
            ContentOp::PaintXObject(name) => {
                let graphics_state = self.current()?.clone();
                self.push_kid(Node::XObject(XObject {
                    name,
                    graphics_state,
                }));
            }
            ContentOp::PaintShading(name) => {
                let graphics_state = self.current()?.clone();
                self.push_kid(Node::Shading(Shading {
                    name,
                    graphics_state,
                }));
            }

            // --- Text objects ---
            ContentOp::BeginText => self.text = Some(TextBuilder::new()),
            ContentOp::EndText => {
                self.flush_text_group();
                self.text = None;
            }

            // --- Text positioning ---
            ContentOp::TextMove([tx, ty]) => {
                self.text_builder_mut()?.translate(tx, ty);
                self.flush_text_group();
            }
            ContentOp::TextMoveLeading([tx, ty]) => {
                self.current_mut()?.text_leading = -ty;
                self.text_builder_mut()?.translate(tx, ty);
                self.flush_text_group();
            }
            ContentOp::SetTextMatrix(matrix) => {
                self.text_builder_mut()?.set_matrix(Matrix(matrix));
                self.flush_text_group();
            }
            ContentOp::NextLine => self.next_line()?,

            // --- Text showing ---
            ContentOp::ShowText(operands) => self.show_text(&operands)?,
            ContentOp::MoveShowText(operands) => {
                self.next_line()?;
                self.show_text(&operands)?;
            }
            ContentOp::MoveShowTextSpacing(operands) => match operands.as_slice() {
                [word, char_, text] => {
                    self.current_mut()?.text_word_space =
                        decode_number(std::slice::from_ref(word))?;
                    self.current_mut()?.text_char_space =
                        decode_number(std::slice::from_ref(char_))?;
                    self.next_line()?;
                    self.show_text(std::slice::from_ref(text))?;
                }
                other => {
                    return Err(ParseError::Assertion(format!(
                        "operator '\"' expects word spacing, char spacing, and a string, got {other:?}"
                    )));
                }
            },
            ContentOp::ShowTextAdjusted(operands) => self.show_text_adjusted(&operands)?,

            // --- Text state ---
            ContentOp::CharSpace(v) => self.current_mut()?.text_char_space = v,
            ContentOp::WordSpace(v) => self.current_mut()?.text_word_space = v,
            ContentOp::HorizontalScale(v) => self.current_mut()?.text_scale = v,
            ContentOp::Leading(v) => self.current_mut()?.text_leading = v,
            ContentOp::SetFont { name, size } => {
                let gs = self.current_mut()?;
                gs.text_font = Some(name);
                gs.text_font_size = size;
            }
            ContentOp::RenderMode(v) => self.current_mut()?.text_render = v,
            ContentOp::Rise(v) => self.current_mut()?.text_rise = v,

            // --- Colour ---
            ContentOp::StrokeColorSpace(name) => self.select_color_space(&name, true)?,
            ContentOp::FillColorSpace(name) => self.select_color_space(&name, false)?,
            ContentOp::StrokeColor(operands) => {
                let components = GraphicsState::components(&decode_numbers(&operands)?);
                self.current_mut()?.color_stroking = components;
            }
            ContentOp::FillColor(operands) => {
                let components = GraphicsState::components(&decode_numbers(&operands)?);
                self.current_mut()?.color_non_stroking = components;
            }
            ContentOp::StrokeColorExtended(operands) => {
                self.extended_color(&operands, true, index)?;
            }
            ContentOp::FillColorExtended(operands) => {
                self.extended_color(&operands, false, index)?;
            }
            ContentOp::StrokeGray(v) => self.set_device_color(true, "DeviceGray", &[v])?,
            ContentOp::FillGray(v) => self.set_device_color(false, "DeviceGray", &[v])?,
            ContentOp::StrokeRgb(rgb) => self.set_device_color(true, "DeviceRGB", &rgb)?,
            ContentOp::FillRgb(rgb) => self.set_device_color(false, "DeviceRGB", &rgb)?,
            ContentOp::StrokeCmyk(cmyk) => self.set_device_color(true, "DeviceCMYK", &cmyk)?,
            ContentOp::FillCmyk(cmyk) => self.set_device_color(false, "DeviceCMYK", &cmyk)?,

            // --- Compatibility: pass state through unchanged ---
            ContentOp::BeginCompat | ContentOp::EndCompat => {}
        }
        Ok(())
    }

    // --- Stack helpers ---

    fn current(&self) -> Result<&GraphicsState, ParseError> {
        self.graphics
            .last()
            .ok_or_else(|| ParseError::Assertion("empty graphics stack".to_string()))
    }

    fn current_mut(&mut self) -> Result<&mut GraphicsState, ParseError> {
        self.graphics
            .last_mut()
            .ok_or_else(|| ParseError::Assertion("empty graphics stack".to_string()))
    }

    fn text_builder_mut(&mut self) -> Result<&mut TextBuilder, ParseError> {
        self.text
            .as_mut()
            .ok_or_else(|| ParseError::Assertion("empty text builder".to_string()))
    }

    fn push_kid(&mut self, node: Node) {
        // The context stack always holds at least the implicit root.
        if let Some(top) = self.context.last_mut() {
            top.kids.push(node);
        }
    }

    fn unsupported(&mut self, keyword: &str, index: usize) {
        record(
            &mut self.warnings,
            Warning::with_code(
                WarningCode::UnsupportedFeature,
                format!("unhandled operator {keyword}"),
            )
            .at_operator(index),
        );
    }

    // --- Text ---

    fn next_line(&mut self) -> Result<(), ParseError> {
        let leading = self.current()?.text_leading;
        self.text_builder_mut()?.translate(0.0, -leading);
        Ok(())
    }

    fn flush_text_group(&mut self) {
        let group = self.text.as_mut().and_then(TextBuilder::take_group);
        if let Some(group) = group {
            self.push_kid(Node::TextGroup(group));
        }
    }

    fn active_font(&mut self, snapshot: &GraphicsState) -> Result<std::sync::Arc<Font>, ParseError> {
        let name = snapshot.text_font.as_deref().ok_or_else(|| {
            ParseError::Assertion("TextFont is undefined during a text-showing operator".to_string())
        })?;
        let font_ref: &FontRef = self
            .resources
            .font
            .get(name)
            .ok_or_else(|| ParseError::Font(format!("font '{name}' is not in Resources")))?;
        self.fonts.get(self.fetcher, font_ref, &mut self.warnings)
    }

    fn decode_string(&mut self, font: &Font, operand: &Operand) -> Result<String, ParseError> {
        match operand {
            Operand::LiteralString(bytes) => Ok(decode_literal(font, bytes, &mut self.warnings)),
            Operand::HexString(hex) => Ok(decode_hex(font, hex, &mut self.warnings)),
            other => Err(ParseError::Assertion(format!(
                "bogus operand {other:?} in a text-showing operator"
            ))),
        }
    }

    fn show_text(&mut self, operands: &[Operand]) -> Result<(), ParseError> {
        let snapshot = self.current()?.clone();
        let font = self.active_font(&snapshot)?;
        let mut decoded = Vec::with_capacity(operands.len());
        for operand in operands {
            decoded.push(self.decode_string(&font, operand)?);
        }
        let text = decoded.into_iter().next().ok_or_else(|| {
            ParseError::Assertion("text-showing operator without a string operand".to_string())
        })?;
        self.text_builder_mut()?
            .show_text(snapshot, TextPayload::Plain(text));
        Ok(())
    }

    fn show_text_adjusted(&mut self, operands: &[Operand]) -> Result<(), ParseError> {
        let snapshot = self.current()?.clone();
        let font = self.active_font(&snapshot)?;
        let Some(Operand::Array(items)) = operands.first() else {
            return Err(ParseError::Assertion(format!(
                "TJ operand is not an array: {operands:?}"
            )));
        };
        let mut payload = Vec::with_capacity(items.len());
        for item in items {
            payload.push(match item {
                Operand::Number(n) => TextItem::Offset(*n),
                other => TextItem::Text(self.decode_string(&font, other)?),
            });
        }
        self.text_builder_mut()?
            .show_text(snapshot, TextPayload::Kerned(payload));
        Ok(())
    }

    // --- Colour ---

    fn resolve_color_space(&mut self, name: &str) -> ColorSpace {
        let space = self
            .resources
            .color_space
            .get(name)
            .cloned()
            .unwrap_or_else(|| ColorSpace::Named(name.to_string()));
        if self.strict_compat {
            ColorSpace::Named(resolve_alternate(&space, &mut self.warnings))
        } else {
            space
        }
    }

    fn select_color_space(&mut self, name: &str, stroking: bool) -> Result<(), ParseError> {
        let space = self.resolve_color_space(name);
        let components = GraphicsState::components(&default_components(&space));
        let gs = self.current_mut()?;
        if stroking {
            gs.color_space_stroking = space;
            gs.color_stroking = components;
        } else {
            gs.color_space_non_stroking = space;
            gs.color_non_stroking = components;
        }
        Ok(())
    }

    fn set_device_color(
        &mut self,
        stroking: bool,
        space: &str,
        components: &[f64],
    ) -> Result<(), ParseError> {
        let gs = self.current_mut()?;
        let space = ColorSpace::Named(space.to_string());
        let components = GraphicsState::components(components);
        if stroking {
            gs.color_space_stroking = space;
            gs.color_stroking = components;
        } else {
            gs.color_space_non_stroking = space;
            gs.color_non_stroking = components;
        }
        Ok(())
    }

    fn extended_color(
        &mut self,
        operands: &[Operand],
        stroking: bool,
        index: usize,
    ) -> Result<(), ParseError> {
        let space = if stroking {
            self.current()?.color_space_stroking.clone()
        } else {
            self.current()?.color_space_non_stroking.clone()
        };
        let is_pattern = matches!(space, ColorSpace::Pattern)
            || matches!(&space, ColorSpace::Named(name) if name == "Pattern");
        let components = if is_pattern {
            self.decode_pattern(operands, index)?
        } else {
            let values = decode_numbers(operands)?;
            let values = if self.strict_compat {
                expand_single_component(&space, values)
            } else {
                values
            };
            GraphicsState::components(&values)
        };
        let gs = self.current_mut()?;
        if stroking {
            gs.color_stroking = components;
        } else {
            gs.color_non_stroking = components;
        }
        Ok(())
    }

    /// Pattern colour operands: numbers, then a trailing pattern name.
    fn decode_pattern(
        &mut self,
        operands: &[Operand],
        index: usize,
    ) -> Result<Vec<ColorComponent>, ParseError> {
        let Some((last, values)) = operands.split_last() else {
            record(
                &mut self.warnings,
                Warning::with_code(
                    WarningCode::DecodeFallback,
                    "empty operand list for a Pattern colour",
                )
                .at_operator(index),
            );
            return Ok(Vec::new());
        };
        let mut components: Vec<ColorComponent> = decode_numbers(values)?
            .into_iter()
            .map(ColorComponent::Value)
            .collect();
        match last {
            Operand::Name(name) => components.push(ColorComponent::Name(name.clone())),
            other => {
                return Err(ParseError::Assertion(format!(
                    "bogus operand {other:?} as a Pattern name"
                )));
            }
        }
        Ok(components)
    }
}
