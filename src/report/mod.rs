pub mod render;
pub mod writer;

pub use render::render_report;
pub use writer::{
    save_events_table, save_intent_distribution, save_user_intent_pivot, write_events_table,
    write_intent_distribution, write_user_intent_pivot,
};
