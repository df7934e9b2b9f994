//! Path object reconstruction.
//!
//! A path object is the operator run from the first construction operator
//! through the painting operator that terminates it, with optional clipping
//! operators in between. The builder consumes that run from the shared
//! operator cursor and reassembles subpaths with explicit Bézier control
//! points.

use artboard_core::{FillRule, GraphicsState, Path, PathPoint, Subpath};

use crate::content_op::ContentOp;
use crate::error::ParseError;

/// The outcome of one path object.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// The painted path, absent when the run ended in `n`.
    pub path: Option<Path>,
    /// The new clipping path, when `W`/`W*` appeared in the run.
    pub clipping_path: Option<Path>,
}

enum Step {
    Continue,
    Done(Option<Path>),
}

/// Builds one path object from a starting graphics-state snapshot.
pub struct PathBuilder {
    path: Path,
    clipping_path: Option<Path>,
    current: Vec<PathPoint>,
    current_point: Option<[f64; 2]>,
    strict_compat: bool,
}

impl PathBuilder {
    /// Start a path object under the given state snapshot.
    pub fn new(graphics_state: GraphicsState, strict_compat: bool) -> Self {
        Self {
            path: Path::new(graphics_state),
            clipping_path: None,
            current: Vec::new(),
            current_point: None,
            strict_compat,
        }
    }

    /// Consume operators from `first` onward until a painting operator
    /// terminates the path object.
    pub fn run(
        mut self,
        first: ContentOp,
        ops: &mut impl Iterator<Item = ContentOp>,
    ) -> Result<PathResult, ParseError> {
        let mut op = first;
        loop {
            if let Step::Done(path) = self.apply(op)? {
                return Ok(PathResult {
                    path,
                    clipping_path: self.clipping_path,
                });
            }
            op = ops.next().ok_or_else(|| {
                ParseError::Assertion("content stream ended inside a path object".to_string())
            })?;
        }
    }

    fn apply(&mut self, op: ContentOp) -> Result<Step, ParseError> {
        match op {
            // --- Construction (8.5.2) ---
            ContentOp::MoveTo(coords) => {
                self.finish_subpath(false);
                self.current.push(PathPoint::Move { coords });
                self.current_point = Some(coords);
            }
            ContentOp::LineTo(coords) => {
                self.current.push(PathPoint::Line { coords });
                self.current_point = Some(coords);
            }
            ContentOp::CurveTo(coords) => {
                self.current.push(PathPoint::Curve { coords });
                self.current_point = Some([coords[4], coords[5]]);
            }
            // `v`: the first control point is the current point.
            ContentOp::CurveToInitial([x2, y2, x3, y3]) => {
                let [x0, y0] = self.current_point()?;
                self.current.push(PathPoint::Curve {
                    coords: [x0, y0, x2, y2, x3, y3],
                });
                self.current_point = Some([x3, y3]);
            }
            // `y`: the second control point is the endpoint.
            ContentOp::CurveToFinal([x1, y1, x3, y3]) => {
                self.current.push(PathPoint::Curve {
                    coords: [x1, y1, x3, y3, x3, y3],
                });
                self.current_point = Some([x3, y3]);
            }
            ContentOp::ClosePath => self.finish_subpath(true),
            ContentOp::Rect(coords) => {
                // A rectangle is its own subpath and leaves the current
                // point untouched.
                self.path.subpaths.push(Subpath::Rect { coords });
            }

            // --- Painting (8.5.3): lowercase variants imply a closing `h` ---
            ContentOp::Stroke => return Ok(self.paint(false, false, true, None)),
            ContentOp::CloseStroke => return Ok(self.paint(true, false, true, None)),
            ContentOp::Fill | ContentOp::FillCompat => {
                return Ok(self.paint(true, true, false, None));
            }
            ContentOp::FillEvenOdd => {
                return Ok(self.paint(true, true, false, Some(FillRule::EvenOdd)));
            }
            ContentOp::FillStroke => return Ok(self.paint(false, true, true, None)),
            ContentOp::FillStrokeEvenOdd => {
                return Ok(self.paint(false, true, true, Some(FillRule::EvenOdd)));
            }
            ContentOp::CloseFillStroke => return Ok(self.paint(true, true, true, None)),
            ContentOp::CloseFillStrokeEvenOdd => {
                return Ok(self.paint(true, true, true, Some(FillRule::EvenOdd)));
            }
            ContentOp::EndPath => {
                self.finish_subpath(false);
                return Ok(Step::Done(None));
            }

            // --- Clipping (8.5.4) ---
            ContentOp::Clip => self.capture_clip(None),
            ContentOp::ClipEvenOdd => self.capture_clip(Some(FillRule::EvenOdd)),

            other => {
                return Err(ParseError::Assertion(format!(
                    "unhandled path-builder operator: {other:?}"
                )));
            }
        }
        Ok(Step::Continue)
    }

    fn current_point(&self) -> Result<[f64; 2], ParseError> {
        self.current_point
            .ok_or_else(|| ParseError::Assertion("current point is undefined".to_string()))
    }

    fn finish_subpath(&mut self, closed: bool) {
        if !self.current.is_empty() {
            self.path.subpaths.push(Subpath::Path {
                points: std::mem::take(&mut self.current),
                closed,
            });
        }
    }

    fn paint(&mut self, close: bool, fill: bool, stroke: bool, rule: Option<FillRule>) -> Step {
        self.finish_subpath(close);
        let mut path = self.path.clone();
        path.fill = fill;
        path.stroke = stroke;
        if let Some(rule) = rule {
            path.fill_rule = rule;
        }
        Step::Done(Some(path))
    }

    fn capture_clip(&mut self, rule: Option<FillRule>) {
        if let Some(rule) = rule {
            self.path.fill_rule = rule;
        }
        self.finish_subpath(true);
        // Strict mode strips the snapshot's own clipping-path field so
        // nested clips do not recurse through the output.
        if self.strict_compat {
            self.path.graphics_state.clipping_path = None;
        }
        self.clipping_path = Some(self.path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::parse_operators;

    fn build(data: &[u8], strict: bool) -> Result<PathResult, ParseError> {
        let ops: Vec<ContentOp> = parse_operators(data).unwrap();
        let mut iter = ops.into_iter();
        let first = iter.next().unwrap();
        PathBuilder::new(GraphicsState::default(), strict).run(first, &mut iter)
    }

    fn subpaths(result: &PathResult) -> &[Subpath] {
        &result.path.as_ref().unwrap().subpaths
    }

    #[test]
    fn move_and_curve_build_one_subpath() {
        let result = build(b"0 0 m 0 -115.151 -58.203 -208.5 -130 -208.5 c S", false).unwrap();
        assert_eq!(
            subpaths(&result),
            &[Subpath::Path {
                points: vec![
                    PathPoint::Move { coords: [0.0, 0.0] },
                    PathPoint::Curve {
                        coords: [0.0, -115.151, -58.203, -208.5, -130.0, -208.5],
                    },
                ],
                closed: false,
            }]
        );
        assert!(result.path.as_ref().unwrap().stroke);
    }

    #[test]
    fn v_synthesizes_first_control_point_from_current_point() {
        let result = build(b"10 20 m 30 40 50 60 v S", false).unwrap();
        match &subpaths(&result)[0] {
            Subpath::Path { points, .. } => assert_eq!(
                points[1],
                PathPoint::Curve {
                    coords: [10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
                }
            ),
            other => panic!("expected point subpath, got {other:?}"),
        }
    }

    #[test]
    fn y_mirrors_the_endpoint_as_second_control_point() {
        let result = build(b"0 0 m 1 2 3 4 y S", false).unwrap();
        match &subpaths(&result)[0] {
            Subpath::Path { points, .. } => assert_eq!(
                points[1],
                PathPoint::Curve {
                    coords: [1.0, 2.0, 3.0, 4.0, 3.0, 4.0],
                }
            ),
            other => panic!("expected point subpath, got {other:?}"),
        }
    }

    #[test]
    fn v_before_any_current_point_fails() {
        assert!(matches!(
            build(b"1 2 3 4 v S", false),
            Err(ParseError::Assertion(_))
        ));
    }

    #[test]
    fn m_flushes_the_open_subpath() {
        let result = build(b"0 0 m 1 1 l 5 5 m 6 6 l S", false).unwrap();
        let paths = subpaths(&result);
        assert_eq!(paths.len(), 2);
        assert!(matches!(paths[0], Subpath::Path { closed: false, .. }));
    }

    #[test]
    fn h_closes_without_painting() {
        let result = build(b"0 0 m 1 1 l h S", false).unwrap();
        assert!(matches!(subpaths(&result)[0], Subpath::Path { closed: true, .. }));
    }

    #[test]
    fn re_appends_a_literal_rect() {
        let result = build(b"10 20 100 50 re f", false).unwrap();
        assert_eq!(
            subpaths(&result),
            &[Subpath::Rect {
                coords: [10.0, 20.0, 100.0, 50.0],
            }]
        );
        let path = result.path.as_ref().unwrap();
        assert!(path.fill);
        assert!(!path.stroke);
    }

    #[test]
    fn re_does_not_initialize_the_current_point() {
        assert!(matches!(
            build(b"10 20 100 50 re 1 2 3 4 v S", false),
            Err(ParseError::Assertion(_))
        ));
    }

    #[test]
    fn lowercase_variants_close_before_painting() {
        let result = build(b"0 0 m 1 1 l s", false).unwrap();
        assert!(matches!(subpaths(&result)[0], Subpath::Path { closed: true, .. }));

        let result = build(b"0 0 m 1 1 l S", false).unwrap();
        assert!(matches!(subpaths(&result)[0], Subpath::Path { closed: false, .. }));
    }

    #[test]
    fn star_variants_select_even_odd() {
        let result = build(b"0 0 m 1 1 l f*", false).unwrap();
        assert_eq!(result.path.as_ref().unwrap().fill_rule, FillRule::EvenOdd);

        let result = build(b"0 0 m 1 1 l b*", false).unwrap();
        let path = result.path.as_ref().unwrap();
        assert_eq!(path.fill_rule, FillRule::EvenOdd);
        assert!(path.fill && path.stroke);
    }

    #[test]
    fn n_paints_nothing() {
        let result = build(b"0 0 m 1 1 l n", false).unwrap();
        assert!(result.path.is_none());
        assert!(result.clipping_path.is_none());
    }

    #[test]
    fn w_captures_the_clipping_path() {
        let result = build(b"0 0 m 10 0 l 10 10 l W n", false).unwrap();
        assert!(result.path.is_none());
        let clip = result.clipping_path.unwrap();
        assert_eq!(clip.subpaths.len(), 1);
        assert!(matches!(clip.subpaths[0], Subpath::Path { closed: true, .. }));
        assert_eq!(clip.fill_rule, FillRule::NonZeroWinding);
    }

    #[test]
    fn w_star_selects_even_odd_for_the_clip() {
        let result = build(b"0 0 m 10 0 l 10 10 l W* n", false).unwrap();
        assert_eq!(result.clipping_path.unwrap().fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn strict_mode_prunes_nested_clipping_state() {
        let mut state = GraphicsState::default();
        state.clipping_path = Some(vec![Path::new(GraphicsState::default())]);

        let ops: Vec<ContentOp> = parse_operators(b"0 0 m 1 1 l W n").unwrap();
        let mut iter = ops.into_iter();
        let first = iter.next().unwrap();

        let strict = PathBuilder::new(state.clone(), true)
            .run(first.clone(), &mut iter)
            .unwrap();
        assert!(strict.clipping_path.unwrap().graphics_state.clipping_path.is_none());

        let ops: Vec<ContentOp> = parse_operators(b"0 0 m 1 1 l W n").unwrap();
        let mut iter = ops.into_iter();
        let first = iter.next().unwrap();
        let lax = PathBuilder::new(state, false).run(first, &mut iter).unwrap();
        assert!(lax.clipping_path.unwrap().graphics_state.clipping_path.is_some());
    }

    #[test]
    fn stream_ending_mid_path_fails() {
        assert!(matches!(
            build(b"0 0 m 1 1 l", false),
            Err(ParseError::Assertion(_))
        ));
    }

    #[test]
    fn non_path_operator_inside_a_path_object_fails() {
        assert!(matches!(
            build(b"0 0 m BT S", false),
            Err(ParseError::Assertion(_))
        ));
    }
}
