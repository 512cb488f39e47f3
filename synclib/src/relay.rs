use crate::types::OutputChunk;

use bytes::{BufMut, Bytes, BytesMut};

/// Rewrites a job's raw output so every rendered line begins with the job's
/// prefix.
///
/// Insertion is byte-level: the prefix is prepended to the first chunk and
/// re-inserted after every `\n`. Chunk boundaries never change the result;
/// feeding one byte at a time concatenates to the same bytes as one large
/// feed, so a line whose terminating newline arrives in a later read still
/// comes out prefixed. The bytes themselves are never decoded, which keeps
/// non-UTF-8 child output intact.
pub struct LinePrefixer {
    prefix: Bytes,
    started: bool,
}

impl LinePrefixer {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Bytes::copy_from_slice(prefix.as_bytes()),
            started: false,
        }
    }

    /// Rewrite one chunk. The first call also carries the opening prefix so
    /// it lands on the sink in the same write as the line it belongs to.
    pub fn feed(&mut self, chunk: &[u8]) -> OutputChunk {
        let mut out = BytesMut::with_capacity(chunk.len() + self.prefix.len());
        if !self.started {
            out.extend_from_slice(&self.prefix);
            self.started = true;
        }
        for &byte in chunk {
            out.put_u8(byte);
            if byte == b'\n' {
                out.extend_from_slice(&self.prefix);
            }
        }
        out.freeze()
    }

    /// The opening prefix for a stream that ended without producing a byte.
    /// Keeps silent jobs visible on the console.
    pub fn finish(&mut self) -> Option<OutputChunk> {
        if self.started {
            None
        } else {
            self.started = true;
            Some(self.prefix.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_every_line() {
        let mut prefixer = LinePrefixer::new("[src1] ");
        let out = prefixer.feed(b"a\nb\n");
        assert_eq!(&out[..], b"[src1] a\n[src1] b\n[src1] ");
    }

    #[test]
    fn byte_at_a_time_matches_single_feed() {
        let raw: &[u8] = b"one\ntwo\npartial";
        let mut whole = LinePrefixer::new("[src2] ");
        let expected = whole.feed(raw);

        let mut bytewise = LinePrefixer::new("[src2] ");
        let mut out = Vec::new();
        for byte in raw.chunks(1) {
            out.extend_from_slice(&bytewise.feed(byte));
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn chunk_boundary_mid_line_adds_no_prefix() {
        let mut prefixer = LinePrefixer::new("[src1] ");
        let mut out = Vec::new();
        out.extend_from_slice(&prefixer.feed(b"hel"));
        out.extend_from_slice(&prefixer.feed(b"lo\n"));
        assert_eq!(out, b"[src1] hello\n[src1] ");
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        let mut prefixer = LinePrefixer::new("[src1] ");
        let out = prefixer.feed(&[0xff, 0xfe, b'\n', 0x80]);

        let mut expected = b"[src1] ".to_vec();
        expected.extend_from_slice(&[0xff, 0xfe, b'\n']);
        expected.extend_from_slice(b"[src1] ");
        expected.push(0x80);
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_stream_still_shows_prefix() {
        let mut prefixer = LinePrefixer::new("[src3] ");
        assert_eq!(prefixer.finish().expect("opening prefix"), "[src3] ");
        assert!(prefixer.finish().is_none());
    }

    #[test]
    fn finish_after_output_is_empty() {
        let mut prefixer = LinePrefixer::new("[src1] ");
        let _ = prefixer.feed(b"x");
        assert!(prefixer.finish().is_none());
    }
}
