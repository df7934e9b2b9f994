//! Text accumulation between `BT` and `ET`.
//!
//! Runs shown while the text matrix stays put accumulate into one pending
//! [`TextGroup`]; repositioning (`Td`, `Tm`) and `ET` flush the pending
//! group into the tree.

use artboard_core::{GraphicsState, Matrix, TextGroup, TextPayload, TextRun};

/// Accumulates text runs under a 2D affine text matrix.
#[derive(Debug, Default)]
pub struct TextBuilder {
    /// The current text matrix.
    pub text_matrix: Matrix,
    pending: Option<TextGroup>,
}

impl TextBuilder {
    /// A fresh builder with an identity text matrix (`BT`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a shown run under the current matrix.
    pub fn show_text(&mut self, graphics_state: GraphicsState, text: TextPayload) {
        let run = TextRun {
            graphics_state,
            text_matrix: self.text_matrix,
            text_line_matrix: self.text_matrix,
            text,
        };
        match &mut self.pending {
            Some(group) => group.texts.push(run),
            None => self.pending = Some(TextGroup { texts: vec![run] }),
        }
    }

    /// Compose a translation into the text matrix (`Td`, `T*`).
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.text_matrix = self.text_matrix.translate(tx, ty);
    }

    /// Replace the text matrix (`Tm`).
    pub fn set_matrix(&mut self, matrix: Matrix) {
        self.text_matrix = matrix;
    }

    /// Take the pending group, if any runs were shown since the last flush.
    pub fn take_group(&mut self) -> Option<TextGroup> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_identity_matrix_and_no_pending_group() {
        let mut builder = TextBuilder::new();
        assert_eq!(builder.text_matrix, Matrix::identity());
        assert!(builder.take_group().is_none());
    }

    #[test]
    fn runs_accumulate_into_one_group() {
        let mut builder = TextBuilder::new();
        builder.show_text(GraphicsState::default(), TextPayload::Plain("a".to_string()));
        builder.show_text(GraphicsState::default(), TextPayload::Plain("b".to_string()));
        let group = builder.take_group().unwrap();
        assert_eq!(group.texts.len(), 2);
        assert!(builder.take_group().is_none());
    }

    #[test]
    fn runs_capture_the_matrix_at_show_time() {
        let mut builder = TextBuilder::new();
        builder.set_matrix(Matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]));
        builder.show_text(GraphicsState::default(), TextPayload::Plain("x".to_string()));
        builder.translate(0.0, -14.0);
        let group = builder.take_group().unwrap();
        assert_eq!(group.texts[0].text_matrix, Matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]));
        assert_eq!(group.texts[0].text_line_matrix, group.texts[0].text_matrix);
        assert_eq!(builder.text_matrix, Matrix([1.0, 0.0, 0.0, 1.0, 72.0, 686.0]));
    }
}
