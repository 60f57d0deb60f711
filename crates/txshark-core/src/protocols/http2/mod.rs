mod error;
pub mod layout;
mod parser;

pub use error::Http2Error;
pub use parser::{FrameIter, FrameKind, Http2Frame, split_frames};
