pub use birthdays::{Birthday, BirthdayPatch};
pub use contributions::{Contribution, ContributionSummary, Split};
pub use error::EngineError;
pub use gifts::{Gift, GiftPatch, NewGift};
pub use ops::{BirthdayDetail, BirthdayRole, BirthdaySummary, Engine, EngineBuilder, EngineConfig};
pub use users::{NewUser, ProfilePatch, User};

pub mod birthdays;
pub mod contributions;
mod error;
pub mod gifts;
mod ops;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
