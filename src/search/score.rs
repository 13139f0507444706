//! Score type and reserved score values.
//!
//! Scores are always from the perspective of the player to move at the node
//! that produced them. Infinite values are reserved for proven outcomes and
//! are never produced by a heuristic.

pub type Score = f32;

/// The player to move has a forced win.
pub const WIN_SCORE: Score = Score::INFINITY;
/// The opponent has a forced win.
pub const LOSS_SCORE: Score = Score::NEG_INFINITY;
pub const DRAW_SCORE: Score = 0.0;

/// True for scores that only a decided game can produce.
#[inline]
pub fn is_proven(score: Score) -> bool {
    score.is_infinite()
}

/// Smallest score strictly greater than `score`.
///
/// Used to build zero-width windows for principal variation search.
#[inline]
pub fn next_up(score: Score) -> Score {
    if score.is_nan() || score == Score::INFINITY {
        return score;
    }
    if score == 0.0 {
        return Score::from_bits(1);
    }
    let bits = score.to_bits();
    if score > 0.0 {
        Score::from_bits(bits + 1)
    } else {
        Score::from_bits(bits - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_up_is_strictly_greater() {
        for s in [-1000.0, -1.5, -0.0, 0.0, 0.25, 99.0, 1000.0, Score::MAX] {
            let up = next_up(s);
            assert!(up > s, "{up} should exceed {s}");
        }
        assert_eq!(next_up(LOSS_SCORE), -Score::MAX);
        assert_eq!(next_up(WIN_SCORE), WIN_SCORE);
    }

    #[test]
    fn only_infinities_are_proven() {
        assert!(is_proven(WIN_SCORE));
        assert!(is_proven(LOSS_SCORE));
        assert!(!is_proven(DRAW_SCORE));
        assert!(!is_proven(1000.0));
    }
}
