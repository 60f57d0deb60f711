use super::error::Http2Error;
use super::layout;

/// Kind of an HTTP/2 frame, as far as this tool cares.
///
/// HEADERS is kept distinct from the catch-all only for tracing: HPACK
/// cannot be decoded when the capture starts mid-stream, so headers carry
/// no usable information here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Headers,
    Other(u8),
}

/// One HTTP/2 frame sliced out of a TCP payload.
#[derive(Debug)]
pub struct Http2Frame<'a> {
    pub kind: FrameKind,
    pub stream_id: u32,
    pub payload: &'a [u8],
}

/// Iterator over the HTTP/2 frames contained in one TCP payload.
///
/// A declared frame length that runs past the end of the payload yields one
/// `Err(TruncatedFrame)` and then stops: TCP segmentation can legitimately
/// split a frame across segments and this design does not reassemble, so
/// the remainder of the payload cannot be trusted.
pub struct FrameIter<'a> {
    payload: &'a [u8],
    cursor: usize,
    done: bool,
}

/// Walk the HTTP/2 frames inside a TCP payload.
pub fn split_frames(payload: &[u8]) -> FrameIter<'_> {
    FrameIter {
        payload,
        cursor: 0,
        done: false,
    }
}

impl<'a> Iterator for FrameIter<'a> {
    type Item = Result<Http2Frame<'a>, Http2Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let remaining = &self.payload[self.cursor..];
        if remaining.len() < layout::FRAME_HEADER_SIZE {
            self.done = true;
            return None;
        }

        let len_bytes = &remaining[layout::LENGTH_RANGE];
        let length = u32::from_be_bytes([0, len_bytes[0], len_bytes[1], len_bytes[2]]) as usize;
        let frame_type = remaining[layout::TYPE_OFFSET];
        let id_bytes = &remaining[layout::STREAM_ID_RANGE];
        let stream_id = u32::from_be_bytes([id_bytes[0], id_bytes[1], id_bytes[2], id_bytes[3]])
            & layout::STREAM_ID_MASK;

        let body = &remaining[layout::FRAME_HEADER_SIZE..];
        if length > body.len() {
            self.done = true;
            return Some(Err(Http2Error::TruncatedFrame {
                stream_id,
                declared: length,
                available: body.len(),
            }));
        }

        self.cursor += layout::FRAME_HEADER_SIZE + length;

        let kind = match frame_type {
            layout::FRAME_TYPE_DATA => FrameKind::Data,
            layout::FRAME_TYPE_HEADERS => FrameKind::Headers,
            other => FrameKind::Other(other),
        };

        Some(Ok(Http2Frame {
            kind,
            stream_id,
            payload: &body[..length],
        }))
    }
}
