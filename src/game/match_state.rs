use super::constants::SPAWN_INSET;
use super::error::GameError;
use super::geometry::random_free_position;
use super::snake::Snake;
use super::types::{ClientId, GameOverNotice, GameSnapshot, MatchRules, Point, RoundCause};

#[derive(Debug)]
pub enum TickOutcome {
    Running(GameSnapshot),
    Over {
        notice: GameOverNotice,
        snapshot: GameSnapshot,
    },
}

/// One round between the members of a room: two snakes, a fixed apple count
/// and the arbitration that ends the round.
#[derive(Debug)]
pub struct Match {
    rules: MatchRules,
    snakes: Vec<Snake>,
    apples: Vec<Point>,
    is_over: bool,
}

/// Mirrored spawn cells on the middle row, both heading toward the centre.
pub fn spawn_points(map_size: i32) -> [(Point, Point); 2] {
    let row = (map_size + 1) / 2;
    [
        (Point { x: SPAWN_INSET, y: row }, Point { x: 1, y: 0 }),
        (
            Point {
                x: map_size - 1 - SPAWN_INSET,
                y: row,
            },
            Point { x: -1, y: 0 },
        ),
    ]
}

impl Match {
    pub fn new(players: &[ClientId], rules: MatchRules) -> Result<Self, GameError> {
        let snakes = players
            .iter()
            .zip(spawn_points(rules.map_size))
            .map(|(owner, (start, direction))| Snake::new(owner.clone(), start, direction))
            .collect();
        let mut game = Self {
            rules,
            snakes,
            apples: Vec::new(),
            is_over: false,
        };
        game.top_up_apples()?;
        Ok(game)
    }

    #[cfg(test)]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    #[cfg(test)]
    pub fn apples(&self) -> &[Point] {
        &self.apples
    }

    #[cfg(test)]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn set_direction(&mut self, owner: &str, input: Point) -> bool {
        match self.snakes.iter_mut().find(|snake| snake.owner() == owner) {
            Some(snake) => snake.set_direction(input),
            None => false,
        }
    }

    /// Advances every snake, then checks every snake, so simultaneous moves
    /// resolve the same way regardless of iteration order.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        for snake in &mut self.snakes {
            snake.advance(&mut self.apples);
        }

        let deaths: Vec<_> = self
            .snakes
            .iter()
            .map(|snake| snake.death_check(&self.snakes, self.rules.map_size, self.rules.goal))
            .collect();
        for (snake, death) in self.snakes.iter_mut().zip(deaths) {
            if let Some(death) = death {
                snake.kill(death);
                self.is_over = true;
            }
        }

        if self.is_over {
            let notice = self.arbitrate();
            return Ok(TickOutcome::Over {
                notice,
                snapshot: self.snapshot(),
            });
        }

        let snapshot = self.snapshot();
        self.top_up_apples()?;
        Ok(TickOutcome::Running(snapshot))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snakes: self.snakes.iter().map(Snake::snapshot).collect(),
            apples: self.apples.clone(),
        }
    }

    fn arbitrate(&self) -> GameOverNotice {
        let dead: Vec<&Snake> = self.snakes.iter().filter(|snake| snake.is_dead()).collect();
        let cause = if dead.len() == self.snakes.len() {
            RoundCause::Draw
        } else {
            dead.first()
                .map(|snake| RoundCause::Player(snake.owner().to_string()))
                .unwrap_or(RoundCause::NoResult)
        };
        GameOverNotice {
            cause,
            owners_of_snakes_to_bump: self
                .snakes
                .iter()
                .filter(|snake| snake.should_bump())
                .map(|snake| snake.owner().to_string())
                .collect(),
        }
    }

    fn top_up_apples(&mut self) -> Result<(), GameError> {
        let mut rng = rand::thread_rng();
        while self.apples.len() < self.rules.apple_count {
            let occupied = self.snakes.iter().flat_map(Snake::body).chain(self.apples.iter());
            let apple = random_free_position(&mut rng, self.rules.map_size, occupied)
                .ok_or(GameError::BoardSaturated)?;
            self.apples.push(apple);
        }
        Ok(())
    }
}
