pub mod assistant;
pub mod rules;

pub use assistant::{
    parse_command, thinking_delay, Assistant, Command, Submission, FOCUS_SETTLE_DELAY, SEND_PREFIX,
};
pub use rules::{pick_variant, Classification, Response, ResponseBook, ResponseRule, Topic};
