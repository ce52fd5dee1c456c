//! Begin/end bracketing for the text-drawing phase.

/// Whether the renderer is inside a `begin`/`end` bracket.
///
/// Glyph draws are only legal between `begin` and `end`. Violating that is
/// a programming error in the caller and is asserted, not tolerated as a
/// silent no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawPhase {
    /// Outside a text phase; drawing panics.
    #[default]
    Idle,
    /// Inside a text phase; drawing is legal.
    Drawing,
}

impl DrawPhase {
    /// Enters the drawing phase. Beginning again while already drawing
    /// leaves the phase unchanged.
    pub fn begin(&mut self) {
        *self = DrawPhase::Drawing;
    }

    /// Leaves the drawing phase. A redundant end is a no-op.
    pub fn end(&mut self) {
        *self = DrawPhase::Idle;
    }

    /// Returns whether the phase is `Drawing`.
    pub fn is_drawing(self) -> bool {
        matches!(self, DrawPhase::Drawing)
    }

    /// Panics unless the phase is `Drawing`.
    #[track_caller]
    pub fn expect_drawing(self) {
        assert!(
            self.is_drawing(),
            "text drawn outside a begin()/end() phase"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(DrawPhase::default(), DrawPhase::Idle);
        assert!(!DrawPhase::default().is_drawing());
    }

    #[test]
    fn begin_enters_drawing() {
        let mut phase = DrawPhase::Idle;
        phase.begin();
        assert_eq!(phase, DrawPhase::Drawing);
        assert!(phase.is_drawing());
    }

    #[test]
    fn end_returns_to_idle() {
        let mut phase = DrawPhase::Drawing;
        phase.end();
        assert_eq!(phase, DrawPhase::Idle);
    }

    #[test]
    fn begin_twice_stays_drawing() {
        let mut phase = DrawPhase::Idle;
        phase.begin();
        phase.begin();
        assert!(phase.is_drawing());
    }

    #[test]
    fn end_without_begin_stays_idle() {
        let mut phase = DrawPhase::Idle;
        phase.end();
        assert_eq!(phase, DrawPhase::Idle);
    }

    #[test]
    fn expect_drawing_passes_inside_a_phase() {
        let mut phase = DrawPhase::Idle;
        phase.begin();
        phase.expect_drawing();
    }

    #[test]
    #[should_panic(expected = "begin()/end()")]
    fn expect_drawing_panics_when_idle() {
        DrawPhase::Idle.expect_drawing();
    }

    #[test]
    #[should_panic(expected = "begin()/end()")]
    fn expect_drawing_panics_after_end() {
        let mut phase = DrawPhase::Idle;
        phase.begin();
        phase.end();
        phase.expect_drawing();
    }
}
