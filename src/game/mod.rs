pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod match_state;
pub mod registry;
pub mod room;
pub mod snake;
pub mod types;
