mod error;
pub mod layout;
mod parser;

pub use error::GrpcError;
pub use parser::{GrpcMessage, MessageIter, split_messages};
