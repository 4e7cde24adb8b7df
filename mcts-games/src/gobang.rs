use serde::{Deserialize, Serialize};

use crate::GameState;

const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 1), (1, 0), (1, -1)];

/// Gobang (five-in-a-row, generalized to a configurable board size and
/// run length). Ported from `original_source/common.py`'s `GobangState`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GobangState {
    board: Vec<Vec<u8>>,
    size: usize,
    in_row: usize,
    terminated: bool,
    player_just_moved: u8,
}

impl GobangState {
    pub fn new(size: usize, in_row: usize) -> Self {
        Self {
            board: vec![vec![0u8; size]; size],
            size,
            in_row,
            terminated: false,
            player_just_moved: 2,
        }
    }

    fn is_on_board(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.size && y >= 0 && (y as usize) < self.size
    }

    fn count_stones_in_direction(&self, x: usize, y: usize, dx: i32, dy: i32) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x as i32 + dx, y as i32 + dy);
        while self.is_on_board(cx, cy)
            && self.board[cx as usize][cy as usize] == self.player_just_moved
        {
            count += 1;
            cx += dx;
            cy += dy;
        }
        count
    }

    fn check_termination(&self, x: usize, y: usize) -> bool {
        DIRECTIONS.iter().any(|&(dx, dy)| {
            self.count_stones_in_direction(x, y, dx, dy)
                + self.count_stones_in_direction(x, y, -dx, -dy)
                + 1
                >= self.in_row
        })
    }
}

impl GameState for GobangState {
    type Move = (u8, u8);

    fn player_just_moved(&self) -> u8 {
        self.player_just_moved
    }

    fn do_move(&mut self, mv: (u8, u8)) {
        let (x, y) = (mv.0 as usize, mv.1 as usize);
        assert!(
            self.is_on_board(x as i32, y as i32) && self.board[x][y] == 0,
            "illegal Gobang move {mv:?}"
        );
        self.player_just_moved = 3 - self.player_just_moved;
        self.board[x][y] = self.player_just_moved;
        self.terminated = self.check_termination(x, y);
    }

    fn get_moves(&self) -> Vec<(u8, u8)> {
        if self.terminated {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if self.board[x][y] == 0 {
                    moves.push((x as u8, y as u8));
                }
            }
        }
        moves
    }

    fn get_result(&self, player: u8) -> f64 {
        if self.terminated {
            if self.player_just_moved == player {
                1.0
            } else {
                0.0
            }
        } else {
            0.5
        }
    }

    fn state_key(&self) -> String {
        let mut key = format!("JustPlayed:{}\n", self.player_just_moved);
        for row in &self.board {
            for &cell in row {
                key.push(match cell {
                    0 => '.',
                    1 => 'X',
                    _ => 'O',
                });
            }
            key.push('\n');
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_all_squares_as_moves() {
        let state = GobangState::new(8, 5);
        assert_eq!(state.get_moves().len(), 64);
    }

    #[test]
    fn five_in_a_row_terminates_the_game() {
        let mut state = GobangState::new(8, 5);
        // Player 1 plays (0,0)..(0,3), player 2 plays elsewhere, player 1
        // finishes the run at (0,4).
        let p1_moves = [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)];
        let p2_moves = [(2, 0), (2, 1), (2, 2), (2, 3)];
        let mut p2_iter = p2_moves.iter();
        for (i, &mv) in p1_moves.iter().enumerate() {
            state.do_move(mv);
            if i < p1_moves.len() - 1 {
                let &p2mv = p2_iter.next().unwrap();
                state.do_move(p2mv);
            }
        }
        assert!(state.is_terminal());
        assert_eq!(state.get_result(1), 1.0);
        assert_eq!(state.get_result(2), 0.0);
    }

    #[test]
    #[should_panic]
    fn illegal_move_onto_occupied_square_panics() {
        let mut state = GobangState::new(8, 5);
        state.do_move((0, 0));
        state.do_move((0, 0));
    }
}
