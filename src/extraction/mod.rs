pub mod extractor;
pub mod reader;

pub use extractor::{extract_user_turns, parse_user_event, UserEvent};
pub use reader::{load_event_rows, read_event_rows};
