pub mod board;
pub mod column;
pub mod error;
pub mod io;
pub mod label;
pub mod migrations;
pub mod paths;
pub mod sprint;
pub mod task;

pub use board::Board;
pub use error::{KnbnError, Result};
