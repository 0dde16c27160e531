pub const MAP_SIZE: i32 = 35;
pub const APPLE_COUNT: usize = 2;
pub const DEFAULT_GOAL: u32 = 30;
pub const DEFAULT_SNAKE_RATE_MS: u64 = 100;
pub const MIN_SNAKE_RATE_MS: u64 = 20;
pub const MAX_SNAKE_RATE_MS: u64 = 1000;
pub const MAX_ROOM_MEMBERS: usize = 2;
pub const MAX_ROOM_NAME_LENGTH: usize = 21;
/// Distance of each spawn cell from its side wall.
pub const SPAWN_INSET: i32 = 3;
