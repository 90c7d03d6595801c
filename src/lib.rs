pub mod codec;
pub mod models;
pub mod state;
pub mod store;

pub use models::{Card, Deck};
pub use state::{Event, Mode, QuizState, StoreRequest};
