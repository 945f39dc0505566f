/// Error-to-status mapping for the request surface.
pub mod error;
/// The six player operations and their wire types.
pub mod players;

pub use error::ApiError;
pub use players::{PlayerDto, PlayerQuery};
