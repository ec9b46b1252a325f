pub mod event;
pub mod intent;
pub mod turn;
pub mod user;

pub use event::{BotAction, EventRow};
pub use intent::TrueIntent;
pub use turn::{LabeledTurn, UserTurn};
pub use user::{NpsGroup, UserMetrics};
