/// Typed validation errors shared across crates.
pub mod error;
/// Filter criteria and predicate-fragment composition.
pub mod filter;
/// Player model, closed enums, and sort orders.
pub mod model;
/// Field validation, level derivation, and partial-update merge.
pub mod validate;

pub use error::ValidationError;
pub use filter::{PageRequest, PlayerFilter, Predicate};
pub use model::{Player, PlayerDraft, PlayerOrder, Profession, Race};
