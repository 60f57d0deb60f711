//! Link, network and transport layer decoding.
//!
//! One captured frame goes in, one `TcpSegment` comes out (or `None` when
//! the frame is not TCP-over-IP). Parsing is pure; the analysis layer owns
//! all cross-packet state.

mod error;
mod parser;

pub use error::LayerError;
pub use parser::{Endpoint, TcpSegment, parse_tcp_segment};
