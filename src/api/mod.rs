pub mod payload;

pub use payload::{Payload, PHOTO_FIELD};
