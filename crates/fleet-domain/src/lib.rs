pub mod search;
pub mod user;
pub mod vehicle;

pub use search::Searchable;
pub use user::{User, UserId, NO_NAME};
pub use vehicle::{Vehicle, VehicleId};
