//! Streaming support for the Sauron SDK.
//!
//! A streamed query hands each chunk to a callback as it arrives. The
//! callback receives the chunk text and whether it is the final one, and
//! returns `false` to stop consumption early.

/// Callback invoked once per received chunk, in arrival order.
///
/// The last call has `done == true` and may carry an empty chunk. Returning
/// `false` asks the transport to stop delivering.
pub type ChunkCallback<'a> = dyn FnMut(&str, bool) -> bool + Send + 'a;

/// Turns raw body bytes into text without splitting multi-byte characters.
///
/// A sequence cut off at a chunk boundary is held back and prepended to the
/// next chunk.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` as forms complete characters.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let keep_from = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // Incomplete trailing sequence: hold it for the next chunk.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            // Genuinely invalid bytes are replaced rather than held forever.
            Err(_) => self.pending.len(),
        };

        let rest = self.pending.split_off(keep_from);
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending = rest;
        text
    }

    /// Flush whatever is still held back.
    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

/// Accumulates a streamed response.
#[derive(Debug, Clone, Default)]
pub struct StreamCollector {
    /// Full accumulated content.
    pub content: String,
    /// Number of callback invocations, including the final one.
    pub chunk_count: usize,
    /// Whether the final chunk has arrived.
    pub finished: bool,
}

impl StreamCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one chunk. Always asks for more.
    pub fn add_chunk(&mut self, chunk: &str, done: bool) -> bool {
        self.content.push_str(chunk);
        self.chunk_count += 1;
        if done {
            self.finished = true;
        }
        true
    }

    /// Borrow the collector as a chunk callback.
    pub fn callback(&mut self) -> impl FnMut(&str, bool) -> bool + Send + '_ {
        move |chunk: &str, done: bool| self.add_chunk(chunk, done)
    }
}
