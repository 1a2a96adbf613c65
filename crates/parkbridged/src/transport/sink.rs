//! Consumer seam for bytes read from the producer connection.

/// Receives raw chunks on the acceptor's reader thread.
pub trait ChunkSink: Send + 'static {
    /// Handles one non-empty chunk. Implementations should avoid panicking.
    fn accept_chunk(&mut self, chunk: &[u8]);

    /// Called once after the connection ends, whatever the cause.
    fn finish(&mut self) {}
}
