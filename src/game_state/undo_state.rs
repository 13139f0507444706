use crate::game_state::board_types::*;

/// Single undo record for `apply_move` / `undo_last_move`.
#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub mv: Move,
    pub row: usize,
    pub color: PColor,
}
