pub mod machine;

pub use machine::{Event, Mode, QuizState, StoreRequest};
