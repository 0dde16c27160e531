use super::geometry::in_bounds;
use super::types::{ClientId, Point, SnakeSnapshot};
use std::collections::VecDeque;

/// Outcome of a failed death check. `bump` marks a head-to-head meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub bump: bool,
}

#[derive(Debug, Clone)]
pub struct Snake {
    owner: ClientId,
    /// Tail first, head last. Never empty.
    body: VecDeque<Point>,
    past_body: VecDeque<Point>,
    direction: Point,
    last_direction_used: Point,
    corners_for_correction: VecDeque<Point>,
    points: u32,
    dead: bool,
    should_bump: bool,
}

impl Snake {
    pub fn new(owner: ClientId, start: Point, direction: Point) -> Self {
        let body = VecDeque::from([start]);
        Self {
            owner,
            past_body: body.clone(),
            body,
            direction,
            last_direction_used: direction,
            corners_for_correction: VecDeque::new(),
            points: 0,
            dead: false,
            should_bump: false,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn head(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[cfg(test)]
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn should_bump(&self) -> bool {
        self.should_bump
    }

    /// Records the next heading. A 180° turn is refused once the snake is
    /// longer than its head; the last accepted input before a tick wins.
    pub fn set_direction(&mut self, input: Point) -> bool {
        if self.body.len() > 1 && input == self.last_direction_used.reversed() {
            return false;
        }
        self.direction = input;
        true
    }

    /// Moves one cell, eating at most one apple from `apples`.
    pub fn advance(&mut self, apples: &mut Vec<Point>) {
        let tail = self.body[0];
        self.corners_for_correction.retain(|corner| *corner != tail);

        self.past_body = self.body.clone();

        let head = self.head().offset(self.direction);
        let ate = match apples.iter().position(|apple| *apple == head) {
            Some(index) => {
                apples.remove(index);
                self.points += 1;
                true
            }
            None => false,
        };

        self.body.push_back(head);
        if ate {
            let oldest = self.past_body[0];
            self.past_body.push_front(oldest);
        } else {
            self.body.pop_front();
        }

        if self.body.len() > 1 && self.direction != self.last_direction_used {
            let corner = self.body[self.body.len() - 2];
            self.corners_for_correction.push_front(corner);
        }
        self.last_direction_used = self.direction;
    }

    /// Evaluates this snake's head against itself, the walls, every other
    /// snake and the score goal. Bodies must already reflect this tick's moves.
    pub fn death_check(&self, snakes: &[Snake], map_size: i32, goal: u32) -> Option<Death> {
        let head = self.head();
        let hits_itself = self.body.iter().filter(|part| **part == head).count() >= 2;
        let hits_wall = !in_bounds(head, map_size);

        let mut hits_other = false;
        let mut hits_other_head = false;
        for other in snakes.iter().filter(|snake| snake.owner != self.owner) {
            if other.head() == head {
                hits_other_head = true;
            }
            if other.body.contains(&head) {
                hits_other = true;
            }
        }

        if hits_itself || hits_wall || hits_other || self.points >= goal {
            Some(Death {
                bump: hits_other_head,
            })
        } else {
            None
        }
    }

    pub fn kill(&mut self, death: Death) {
        self.dead = true;
        if death.bump {
            self.should_bump = true;
        }
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            owner: self.owner.clone(),
            body: self.body.iter().copied().collect(),
            past_body: self.past_body.iter().copied().collect(),
            corners_for_correction: self.corners_for_correction.iter().copied().collect(),
            points: self.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    const RIGHT: Point = Point { x: 1, y: 0 };
    const LEFT: Point = Point { x: -1, y: 0 };
    const UP: Point = Point { x: 0, y: -1 };
    const DOWN: Point = Point { x: 0, y: 1 };

    fn snake_with_body(cells: &[(i32, i32)], direction: Point) -> Snake {
        let (x, y) = cells[0];
        let mut snake = Snake::new("a".to_string(), Point { x, y }, direction);
        snake.body = cells.iter().map(|&(x, y)| Point { x, y }).collect();
        snake.past_body = snake.body.clone();
        snake
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let mut snake = snake_with_body(&[(1, 1), (2, 1), (3, 1)], RIGHT);
        let mut apples = vec![Point { x: 9, y: 9 }];
        for _ in 0..5 {
            snake.advance(&mut apples);
            assert_eq!(snake.len(), 3);
            assert_eq!(snake.past_body.len(), 3);
        }
        assert_eq!(snake.head(), Point { x: 8, y: 1 });
        assert_eq!(apples.len(), 1);
    }

    #[test]
    fn eating_grows_by_one_and_keeps_past_body_aligned() {
        let mut snake = snake_with_body(&[(1, 1), (2, 1)], RIGHT);
        let mut apples = vec![Point { x: 3, y: 1 }, Point { x: 7, y: 7 }];
        snake.advance(&mut apples);

        assert_eq!(snake.len(), 3);
        assert_eq!(snake.past_body.len(), snake.len());
        assert_eq!(snake.past_body[0], snake.past_body[1]);
        assert_eq!(snake.points(), 1);
        assert_eq!(apples, vec![Point { x: 7, y: 7 }]);
    }

    #[test]
    fn reversal_is_rejected_while_longer_than_one() {
        let mut snake = snake_with_body(&[(1, 1), (2, 1)], RIGHT);
        assert!(!snake.set_direction(LEFT));
        assert!(snake.set_direction(UP));
        // the reversal rule compares against the heading actually used last tick
        assert!(snake.set_direction(DOWN));
        assert!(!snake.set_direction(LEFT));
    }

    #[test]
    fn single_cell_snake_may_reverse() {
        let mut snake = Snake::new("a".to_string(), Point { x: 5, y: 5 }, RIGHT);
        assert!(snake.set_direction(LEFT));
        snake.advance(&mut Vec::new());
        assert_eq!(snake.head(), Point { x: 4, y: 5 });
    }

    #[test]
    fn random_inputs_never_reverse_a_long_snake() {
        let mut rng = rand::thread_rng();
        let mut snake = snake_with_body(&[(10, 10), (11, 10), (12, 10)], RIGHT);
        let headings = [RIGHT, LEFT, UP, DOWN];
        for _ in 0..500 {
            for _ in 0..3 {
                snake.set_direction(*headings.choose(&mut rng).unwrap_or(&RIGHT));
            }
            let previous = snake.last_direction_used;
            snake.advance(&mut Vec::new());
            assert_ne!(snake.last_direction_used, previous.reversed());
        }
    }

    #[test]
    fn turning_records_a_corner_until_the_tail_passes_it() {
        let mut snake = snake_with_body(&[(1, 1), (2, 1), (3, 1)], RIGHT);
        snake.set_direction(DOWN);
        snake.advance(&mut Vec::new());
        assert_eq!(snake.corners_for_correction, VecDeque::from([Point { x: 3, y: 1 }]));

        snake.advance(&mut Vec::new());
        assert_eq!(snake.corners_for_correction.len(), 1);

        // tail reaches the corner, so it is evicted on the following move
        snake.advance(&mut Vec::new());
        assert!(snake.corners_for_correction.is_empty());
    }

    #[test]
    fn self_overlap_is_a_death() {
        let mut snake = snake_with_body(&[(3, 1), (2, 1), (1, 1), (1, 2), (2, 2)], RIGHT);
        snake.set_direction(UP);
        snake.advance(&mut Vec::new());
        assert_eq!(snake.head(), Point { x: 2, y: 1 });
        let snakes = vec![snake.clone()];
        assert!(snake.death_check(&snakes, 35, 30).is_some());
    }

    #[test]
    fn leaving_the_board_is_a_death() {
        let mut snake = snake_with_body(&[(0, 4)], LEFT);
        snake.advance(&mut Vec::new());
        let snakes = vec![snake.clone()];
        assert_eq!(snake.death_check(&snakes, 35, 30), Some(Death { bump: false }));
    }

    #[test]
    fn reaching_the_goal_ends_the_round() {
        let mut snake = snake_with_body(&[(4, 4)], RIGHT);
        snake.points = 3;
        let snakes = vec![snake.clone()];
        assert!(snake.death_check(&snakes, 35, 3).is_some());
        assert!(snake.death_check(&snakes, 35, 4).is_none());
    }

    #[test]
    fn head_meeting_marks_bump() {
        let a = snake_with_body(&[(4, 4), (5, 4)], RIGHT);
        let mut b = snake_with_body(&[(6, 4), (5, 4)], LEFT);
        b.owner = "b".to_string();
        let snakes = vec![a.clone(), b.clone()];
        assert_eq!(a.death_check(&snakes, 35, 30), Some(Death { bump: true }));
        assert_eq!(b.death_check(&snakes, 35, 30), Some(Death { bump: true }));
    }
}
