use super::error::GrpcError;
use super::layout;

/// One gRPC message unwrapped from a DATA frame.
#[derive(Debug)]
pub struct GrpcMessage<'a> {
    /// Raw protobuf body. `None` when the message was compressed: the
    /// compression flag is honored only far enough to skip the payload.
    pub body: Option<&'a [u8]>,
}

/// Iterator over the length-prefixed gRPC messages in one DATA frame body.
///
/// gRPC-on-HTTP/2 prepends 1 byte of compression flag and a 4-byte
/// big-endian length to every protobuf message; several messages may share
/// one DATA frame.
pub struct MessageIter<'a> {
    data: &'a [u8],
    cursor: usize,
    done: bool,
}

pub fn split_messages(data: &[u8]) -> MessageIter<'_> {
    MessageIter {
        data,
        cursor: 0,
        done: false,
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<GrpcMessage<'a>, GrpcError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let remaining = &self.data[self.cursor..];
        if remaining.len() < layout::MESSAGE_PREFIX_SIZE {
            self.done = true;
            return None;
        }

        let compressed = remaining[layout::COMPRESSED_FLAG_OFFSET] != 0;
        let len_bytes = &remaining[layout::LENGTH_RANGE];
        let length =
            u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;

        let body = &remaining[layout::MESSAGE_PREFIX_SIZE..];
        if length > body.len() {
            self.done = true;
            return Some(Err(GrpcError::TruncatedMessage {
                declared: length,
                available: body.len(),
            }));
        }

        self.cursor += layout::MESSAGE_PREFIX_SIZE + length;

        Some(Ok(GrpcMessage {
            body: if compressed {
                None
            } else {
                Some(&body[..length])
            },
        }))
    }
}
