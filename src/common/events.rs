/// Progress of one streaming chat request, as produced by the transport.
///
/// A stream yields any number of `Chunk`s and then exactly one of the two
/// terminal variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk(Vec<u8>),
    Finished { status: u16 },
    TransportFailed(String),
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Chunk(_))
    }
}

/// What changed in the transcript after one stream event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Text appended to the assistant entry.
    Delta(String),
    /// Stream ended; any partial content is kept as-is.
    Completed { status: u16 },
    /// Non-success status with an empty body; the entry now holds `message`.
    ServerFailed { status: u16, message: String },
    /// Transport broke; `marker` was appended to the entry.
    ConnectionLost { marker: String },
    /// A turn detached by a reset has finished; nothing was written.
    Discarded,
}
