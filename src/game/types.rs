use super::constants::{APPLE_COUNT, DEFAULT_GOAL, DEFAULT_SNAKE_RATE_MS, MAP_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub type ClientId = String;

/// A board cell, or a unit heading when used as a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn offset(self, direction: Point) -> Point {
        Point {
            x: self.x + direction.x,
            y: self.y + direction.y,
        }
    }

    pub fn reversed(self) -> Point {
        Point {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchRules {
    pub map_size: i32,
    pub apple_count: usize,
    pub goal: u32,
    pub snake_rate: Duration,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            map_size: MAP_SIZE,
            apple_count: APPLE_COUNT,
            goal: DEFAULT_GOAL,
            snake_rate: Duration::from_millis(DEFAULT_SNAKE_RATE_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeSnapshot {
    pub owner: ClientId,
    pub body: Vec<Point>,
    pub past_body: Vec<Point>,
    pub corners_for_correction: Vec<Point>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub snakes: Vec<SnakeSnapshot>,
    pub apples: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundCause {
    Player(ClientId),
    Draw,
    NoResult,
}

impl Serialize for RoundCause {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RoundCause::Player(id) => serializer.serialize_str(id),
            RoundCause::Draw => serializer.serialize_str("draw"),
            RoundCause::NoResult => serializer.serialize_str(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverNotice {
    pub cause: RoundCause,
    pub owners_of_snakes_to_bump: Vec<ClientId>,
}

impl GameOverNotice {
    pub fn quit() -> Self {
        Self {
            cause: RoundCause::NoResult,
            owners_of_snakes_to_bump: Vec::new(),
        }
    }
}
