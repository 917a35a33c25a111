/// Turns a byte stream into text deltas without splitting characters.
///
/// Bytes of an incomplete trailing character are held back until the next
/// chunk completes them. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Assembler {
    pending: Vec<u8>,
    received: usize,
}

impl Utf8Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes seen so far, including any held back.
    pub fn bytes_received(&self) -> usize {
        self.received
    }

    /// Feed the next chunk; returns the newly decodable text.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.received += bytes.len();
        self.pending.extend_from_slice(bytes);

        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match err.error_len() {
                        // Incomplete character at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                        Some(invalid) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + invalid);
                        }
                    }
                }
            }
        }
        text
    }

    /// Flush whatever is still held back once the stream has ended.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}
