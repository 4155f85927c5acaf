pub mod errors;
pub mod revert;

pub use errors::{classify_send_error, Result, SwapError};
