use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::Point;
use crate::error::GoError;
use crate::goban::{Goban, grid};
use crate::group::Group;
use crate::stone::Stone;

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

/// Ownership mark of a single cell during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum Mark {
    #[default]
    Unmarked = 0,
    Black = 1,
    White = -1,
}

impl Mark {
    /// Cycle used when clicking an empty cell: unmarked, Black, White, unmarked.
    pub fn next(self) -> Mark {
        match self {
            Mark::Unmarked => Mark::Black,
            Mark::Black => Mark::White,
            Mark::White => Mark::Unmarked,
        }
    }

    pub fn owner(self) -> Option<Stone> {
        match self {
            Mark::Unmarked => None,
            Mark::Black => Some(Stone::Black),
            Mark::White => Some(Stone::White),
        }
    }

    pub fn to_int(self) -> i8 {
        self as i8
    }
}

impl From<Stone> for Mark {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Mark::Black,
            Stone::White => Mark::White,
        }
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Per-color score breakdown.
///
/// `territory` counts every marked cell, `dead_stones` counts marked cells that still hold
/// a stone (each worth one extra point), `captures` counts prisoners taken during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlayerPoints {
    pub territory: u32,
    pub dead_stones: u32,
    pub captures: u32,
}

impl PlayerPoints {
    pub fn total(&self) -> u32 {
        self.territory + self.dead_stones + self.captures
    }
}

/// Full score breakdown for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameScore {
    pub black: PlayerPoints,
    pub white: PlayerPoints,
}

impl GameScore {
    pub fn get(&self, stone: Stone) -> &PlayerPoints {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    fn get_mut(&mut self, stone: Stone) -> &mut PlayerPoints {
        match stone {
            Stone::Black => &mut self.black,
            Stone::White => &mut self.white,
        }
    }

    pub fn totals(&self) -> (u32, u32) {
        (self.black.total(), self.white.total())
    }

    pub fn result(&self) -> String {
        format_result(self.black.total(), self.white.total())
    }
}

/// Format the game result string from final scores.
///
/// Returns "B+{diff}", "W+{diff}", or "Draw".
pub fn format_result(black_score: u32, white_score: u32) -> String {
    if black_score > white_score {
        format!("B+{}", black_score - white_score)
    } else if white_score > black_score {
        format!("W+{}", white_score - black_score)
    } else {
        "Draw".to_string()
    }
}

// ---------------------------------------------------------------------------
// Territory grid
// ---------------------------------------------------------------------------

/// Territory marks for every cell, kept separately from the stones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    size: usize,
    marks: Vec<Mark>,
}

impl Territory {
    pub fn new(size: usize) -> Result<Self, GoError> {
        Ok(Territory {
            size,
            marks: grid(size, Mark::Unmarked)?,
        })
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn get(&self, (x, y): Point) -> Mark {
        if x < self.size && y < self.size {
            self.marks[y * self.size + x]
        } else {
            Mark::Unmarked
        }
    }

    /// Apply one manual mark at `point` and return the mark that was written.
    ///
    /// An empty cell advances to the next mark and floods its empty region with it. A stone
    /// toggles its whole group between dead (owned by the other color) and unmarked, along
    /// with every empty cell reachable from the group.
    pub fn mark(&mut self, goban: &Goban, point: Point) -> Result<Mark, GoError> {
        if !goban.on_board(point) {
            return Err(GoError::NotOnBoard);
        }

        let mut visited = vec![false; self.marks.len()];
        let mark = match goban.group_at(point) {
            None => {
                let mark = self.get(point).next();
                self.claim_empty(goban, point, mark, &mut visited);
                mark
            }
            Some(group) => {
                let mark = match self.get(point) {
                    Mark::Unmarked => Mark::from(group.color().opp()),
                    _ => Mark::Unmarked,
                };
                self.claim_group(goban, group, mark, &mut visited);
                mark
            }
        };

        tracing::trace!(?point, ?mark, "territory marked");
        Ok(mark)
    }

    /// Claim every empty region bordered by stones of exactly one color for that color.
    ///
    /// Regions touching both colors, or no stones at all, keep their current marks. Returns
    /// the number of regions claimed.
    pub fn auto_find(&mut self, goban: &Goban) -> usize {
        let mut visited = vec![false; self.marks.len()];
        let mut claimed = 0;

        for y in 0..self.size {
            for x in 0..self.size {
                let start = (x, y);
                if visited[goban.idx(start)] || !goban.is_vacant(start) {
                    continue;
                }

                let mut region = Vec::new();
                let mut border_colors: u8 = 0; // bit 0 = Black seen, bit 1 = White seen
                let mut stack = vec![start];

                while let Some(p) = stack.pop() {
                    let pi = goban.idx(p);
                    if visited[pi] {
                        continue;
                    }
                    visited[pi] = true;
                    region.push(pi);

                    for n in goban.neighbors(p) {
                        match goban.stone_at(n) {
                            Some(Stone::Black) => border_colors |= 1,
                            Some(Stone::White) => border_colors |= 2,
                            None if !visited[goban.idx(n)] => stack.push(n),
                            None => {}
                        }
                    }
                }

                let owner = match border_colors {
                    1 => Mark::Black,
                    2 => Mark::White,
                    _ => continue,
                };

                for pi in region {
                    self.marks[pi] = owner;
                }
                claimed += 1;
            }
        }

        tracing::trace!(claimed, "territory detected");
        claimed
    }

    /// Score the current marks: one point per marked cell, two if the cell holds a stone,
    /// plus the prisoners recorded on the board.
    pub fn score(&self, goban: &Goban) -> GameScore {
        let mut score = GameScore::default();

        for y in 0..self.size {
            for x in 0..self.size {
                let Some(owner) = self.get((x, y)).owner() else {
                    continue;
                };
                let points = score.get_mut(owner);
                points.territory += 1;
                if goban.stone_at((x, y)).is_some() {
                    points.dead_stones += 1;
                }
            }
        }

        score.black.captures = goban.captures().get(Stone::Black);
        score.white.captures = goban.captures().get(Stone::White);
        score
    }

    /// Flood `mark` over the empty region containing `start`, skipping visited cells.
    fn claim_empty(&mut self, goban: &Goban, start: Point, mark: Mark, visited: &mut [bool]) {
        if !goban.is_vacant(start) || visited[goban.idx(start)] {
            return;
        }

        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            let pi = goban.idx(p);
            if visited[pi] {
                continue;
            }
            visited[pi] = true;
            self.marks[pi] = mark;

            for n in goban.neighbors(p) {
                if goban.is_vacant(n) && !visited[goban.idx(n)] {
                    stack.push(n);
                }
            }
        }
    }

    fn claim_group(&mut self, goban: &Goban, group: &Group, mark: Mark, visited: &mut [bool]) {
        for &p in group.stones() {
            let pi = goban.idx(p);
            if !visited[pi] {
                visited[pi] = true;
                self.marks[pi] = mark;
            }
        }

        for &p in group.border() {
            self.claim_empty(goban, p, mark, visited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goban_from_layout(layout: &[&str]) -> Goban {
        Goban::from_layout(layout).unwrap()
    }

    /// Render marks as rows: 'b' / 'w' for marked cells, '.' for unmarked.
    fn marks_layout(territory: &Territory) -> Vec<String> {
        territory
            .marks()
            .chunks(territory.size)
            .map(|row| {
                row.iter()
                    .map(|m| match m {
                        Mark::Black => 'b',
                        Mark::White => 'w',
                        Mark::Unmarked => '.',
                    })
                    .collect()
            })
            .collect()
    }

    // -- Marks --

    #[test]
    fn mark_cycle() {
        assert_eq!(Mark::Unmarked.next(), Mark::Black);
        assert_eq!(Mark::Black.next(), Mark::White);
        assert_eq!(Mark::White.next(), Mark::Unmarked);
    }

    #[test]
    fn mark_owner_and_conversion() {
        assert_eq!(Mark::Unmarked.owner(), None);
        assert_eq!(Mark::White.owner(), Some(Stone::White));
        assert_eq!(Mark::from(Stone::Black), Mark::Black);
        assert_eq!(Mark::White.to_int(), -1);
    }

    // -- Manual marking --

    #[test]
    fn marking_empty_cell_floods_region() {
        let goban = goban_from_layout(&["+B++", "+B++", "BB++", "++++"]);
        let mut territory = Territory::new(4).unwrap();

        assert_eq!(territory.mark(&goban, (0, 0)).unwrap(), Mark::Black);
        assert_eq!(
            marks_layout(&territory),
            vec!["b...", "b...", "....", "...."]
        );
    }

    #[test]
    fn marking_empty_cell_cycles_back_to_unmarked() {
        let goban = goban_from_layout(&["+B++", "+B++", "BB++", "++++"]);
        let mut territory = Territory::new(4).unwrap();

        territory.mark(&goban, (0, 1)).unwrap();
        assert_eq!(territory.mark(&goban, (0, 0)).unwrap(), Mark::White);
        assert_eq!(territory.get((0, 1)), Mark::White);
        assert_eq!(territory.mark(&goban, (0, 1)).unwrap(), Mark::Unmarked);
        assert!(territory.marks().iter().all(|&m| m == Mark::Unmarked));
    }

    #[test]
    fn marking_stone_claims_group_for_opponent() {
        let goban = goban_from_layout(&["BBBBB", "B+++B", "B+W+B", "B+++B", "BBBBB"]);
        let mut territory = Territory::new(5).unwrap();

        assert_eq!(territory.mark(&goban, (2, 2)).unwrap(), Mark::Black);
        assert_eq!(
            marks_layout(&territory),
            vec![".....", ".bbb.", ".bbb.", ".bbb.", "....."]
        );
    }

    #[test]
    fn marking_marked_stone_unclaims_it() {
        let goban = goban_from_layout(&["BBBBB", "B+++B", "B+W+B", "B+++B", "BBBBB"]);
        let mut territory = Territory::new(5).unwrap();

        territory.mark(&goban, (2, 2)).unwrap();
        assert_eq!(territory.mark(&goban, (2, 2)).unwrap(), Mark::Unmarked);
        assert!(territory.marks().iter().all(|&m| m == Mark::Unmarked));
    }

    #[test]
    fn group_claim_covers_every_stone() {
        let goban = goban_from_layout(&["WW++", "+W++", "BBBB", "++++"]);
        let mut territory = Territory::new(4).unwrap();

        territory.mark(&goban, (1, 1)).unwrap();
        assert_eq!(
            marks_layout(&territory),
            vec!["bbbb", "bbbb", "....", "...."]
        );
    }

    #[test]
    fn marking_off_board_is_rejected() {
        let goban = Goban::with_size(3).unwrap();
        let mut territory = Territory::new(3).unwrap();
        assert_eq!(territory.mark(&goban, (3, 0)), Err(GoError::NotOnBoard));
    }

    // -- Automatic detection --

    #[test]
    fn empty_board_stays_unmarked() {
        let goban = Goban::with_size(4).unwrap();
        let mut territory = Territory::new(4).unwrap();
        assert_eq!(territory.auto_find(&goban), 0);
        assert!(territory.marks().iter().all(|&m| m == Mark::Unmarked));
    }

    #[test]
    fn auto_find_claims_single_color_regions() {
        let goban = goban_from_layout(&["+B+W+", "+B+W+", "+B+W+", "+B+W+", "+B+W+"]);
        let mut territory = Territory::new(5).unwrap();

        assert_eq!(territory.auto_find(&goban), 2);
        assert_eq!(
            marks_layout(&territory),
            vec!["b...w", "b...w", "b...w", "b...w", "b...w"]
        );
    }

    #[test]
    fn auto_find_counts_colors_not_visits() {
        // The black stone touches the region from three sides; it is still one color.
        let goban = goban_from_layout(&["+++", "+B+", "+++"]);
        let mut territory = Territory::new(3).unwrap();

        assert_eq!(territory.auto_find(&goban), 1);
        assert_eq!(marks_layout(&territory), vec!["bbb", "b.b", "bbb"]);
    }

    #[test]
    fn auto_find_keeps_manual_marks_on_mixed_regions() {
        let goban = goban_from_layout(&["+B+", "+++", "+W+"]);
        let mut territory = Territory::new(3).unwrap();
        territory.mark(&goban, (0, 0)).unwrap();

        assert_eq!(territory.auto_find(&goban), 0);
        assert_eq!(territory.get((2, 1)), Mark::Black);
    }

    // -- Scoring --

    #[test]
    fn dead_stone_scores_double() {
        let goban = goban_from_layout(&["BBBBB", "B+++B", "B+W+B", "B+++B", "BBBBB"]);
        let mut territory = Territory::new(5).unwrap();
        territory.mark(&goban, (2, 2)).unwrap();

        let score = territory.score(&goban);
        assert_eq!(score.black.territory, 9);
        assert_eq!(score.black.dead_stones, 1);
        assert_eq!(score.black.total(), 10);
        assert_eq!(score.white.total(), 0);
        assert_eq!(score.result(), "B+10");
    }

    #[test]
    fn score_includes_captures() {
        let mut goban = goban_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        goban.play((1, 2), Stone::Black).unwrap();

        let territory = Territory::new(4).unwrap();
        let score = territory.score(&goban);
        assert_eq!(score.black.captures, 1);
        assert_eq!(score.totals(), (1, 0));
    }

    #[test]
    fn score_json_shape() {
        let score = GameScore::default();
        let json = serde_json::to_value(score).unwrap();
        assert_eq!(json["black"]["territory"], 0);
        assert_eq!(json["white"]["dead_stones"], 0);
        assert_eq!(json["white"]["captures"], 0);
    }

    // -- Result formatting --

    #[test]
    fn format_result_black_wins() {
        assert_eq!(format_result(10, 5), "B+5");
    }

    #[test]
    fn format_result_white_wins() {
        assert_eq!(format_result(5, 11), "W+6");
    }

    #[test]
    fn format_result_draw() {
        assert_eq!(format_result(5, 5), "Draw");
    }
}
