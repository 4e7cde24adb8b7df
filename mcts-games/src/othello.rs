use serde::{Deserialize, Serialize};

use crate::GameState;

const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Othello on a variable-sized, even square board. Players alternately
/// place a piece that must sandwich at least one opponent piece between it
/// and an existing piece of the mover's color; sandwiched pieces flip.
///
/// As in `original_source/common.py`'s `OthelloState`, this variant skips
/// the standard "pass" move: the game simply terminates as soon as the
/// player to move has no legal move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OthelloState {
    board: Vec<Vec<u8>>,
    size: usize,
    player_just_moved: u8,
}

impl OthelloState {
    pub fn new(size: usize) -> Self {
        assert!(size % 2 == 0 && size >= 2, "Othello board size must be even");
        let mut board = vec![vec![0u8; size]; size];
        let h = size / 2;
        board[h][h] = 1;
        board[h - 1][h - 1] = 1;
        board[h][h - 1] = 2;
        board[h - 1][h] = 2;
        Self {
            board,
            size,
            player_just_moved: 2,
        }
    }

    fn is_on_board(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.size && y >= 0 && (y as usize) < self.size
    }

    fn adjacent_enemy_directions(&self, x: usize, y: usize) -> Vec<(i32, i32)> {
        DIRECTIONS
            .iter()
            .copied()
            .filter(|&(dx, dy)| {
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                self.is_on_board(nx, ny)
                    && self.board[nx as usize][ny as usize] == self.player_just_moved
            })
            .collect()
    }

    fn sandwiched_counters(&self, x: usize, y: usize, dx: i32, dy: i32) -> Vec<(usize, usize)> {
        let mut sandwiched = Vec::new();
        let (mut cx, mut cy) = (x as i32 + dx, y as i32 + dy);
        while self.is_on_board(cx, cy)
            && self.board[cx as usize][cy as usize] == self.player_just_moved
        {
            sandwiched.push((cx as usize, cy as usize));
            cx += dx;
            cy += dy;
        }
        if self.is_on_board(cx, cy) && self.board[cx as usize][cy as usize] == 3 - self.player_just_moved
        {
            sandwiched
        } else {
            Vec::new()
        }
    }

    fn exists_sandwiched_counter(&self, x: usize, y: usize) -> bool {
        self.adjacent_enemy_directions(x, y)
            .into_iter()
            .any(|(dx, dy)| !self.sandwiched_counters(x, y, dx, dy).is_empty())
    }

    fn all_sandwiched_counters(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        self.adjacent_enemy_directions(x, y)
            .into_iter()
            .flat_map(|(dx, dy)| self.sandwiched_counters(x, y, dx, dy))
            .collect()
    }
}

impl GameState for OthelloState {
    type Move = (u8, u8);

    fn player_just_moved(&self) -> u8 {
        self.player_just_moved
    }

    fn do_move(&mut self, mv: (u8, u8)) {
        let (x, y) = (mv.0 as usize, mv.1 as usize);
        assert!(
            self.is_on_board(x as i32, y as i32) && self.board[x][y] == 0,
            "illegal Othello move {mv:?}"
        );
        let flips = self.all_sandwiched_counters(x, y);
        self.player_just_moved = 3 - self.player_just_moved;
        self.board[x][y] = self.player_just_moved;
        for (fx, fy) in flips {
            self.board[fx][fy] = self.player_just_moved;
        }
    }

    fn get_moves(&self) -> Vec<(u8, u8)> {
        let mut moves = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if self.board[x][y] == 0 && self.exists_sandwiched_counter(x, y) {
                    moves.push((x as u8, y as u8));
                }
            }
        }
        moves
    }

    fn get_result(&self, player: u8) -> f64 {
        let mut mine = 0;
        let mut theirs = 0;
        for row in &self.board {
            for &cell in row {
                if cell == player {
                    mine += 1;
                } else if cell == 3 - player {
                    theirs += 1;
                }
            }
        }
        match mine.cmp(&theirs) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Less => 0.0,
            std::cmp::Ordering::Equal => 0.5,
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
    fn starting_position_has_four_moves_on_8x8() {
        let state = OthelloState::new(8);
        assert_eq!(state.get_moves().len(), 4);
    }

    #[test]
    fn do_move_flips_sandwiched_pieces() {
        let mut state = OthelloState::new(8);
        let mv = state.get_moves()[0];
        state.do_move(mv);
        let mut ones = 0;
        let mut twos = 0;
        for row in &state.board {
            for &c in row {
                if c == 1 {
                    ones += 1;
                } else if c == 2 {
                    twos += 1;
                }
            }
        }
        assert_eq!(ones + twos, 5); // one placed, one flipped, three untouched originals
    }

    #[test]
    #[should_panic]
    fn illegal_move_onto_occupied_square_panics() {
        let mut state = OthelloState::new(8);
        state.do_move((3, 3));
    }

    #[test]
    fn result_reflects_piece_counts() {
        let state = OthelloState::new(4);
        // symmetric starting position on a 4x4 board is a draw by count
        assert_eq!(state.get_result(1), state.get_result(2));
    }
}
