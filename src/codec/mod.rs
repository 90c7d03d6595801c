pub mod text;

pub use text::{decode, encode};
