//! Decrypting stream adapter.

use courier_crypto::secretstream::{ChunkFlag, Header, PullStream, chunk_ciphertext_len};
use courier_crypto::{HEADER_SIZE, TransmissionKey};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace, warn};

use crate::error::StreamError;

/// Presents chunked decryption of an async ciphertext source as a readable
/// plaintext byte stream.
///
/// Opened via [`DecryptionStream::open`], which consumes the stream header
/// before any payload is produced. Each refill reads exactly one bounded
/// ciphertext chunk, authenticates and unpads it, and serves the plaintext.
/// No plaintext is ever yielded from a chunk that failed authentication,
/// and a stream that ends without a final-flagged chunk is reported as
/// truncated rather than silently short.
pub struct DecryptionStream<R> {
    source: R,
    pull: PullStream,
    total_size: u64,
    bytes_consumed: u64,
    full_chunk_len: usize,
    buffer: Vec<u8>,
    pos: usize,
    saw_final: bool,
}

impl<R: AsyncRead + Unpin> DecryptionStream<R> {
    /// Open a decryption stream over a ciphertext source of exactly
    /// `total_size` bytes (header included), encrypted with `max_read_size`
    /// chunks padded to `pad_size`.
    ///
    /// Reads and consumes the 24-byte header before returning.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Truncated`] if the source ends inside the
    /// header, [`StreamError::InvalidReadSize`] for a zero `max_read_size`,
    /// and propagates source I/O errors.
    pub async fn open(
        mut source: R,
        total_size: u64,
        key: &TransmissionKey,
        max_read_size: usize,
        pad_size: usize,
    ) -> Result<Self, StreamError> {
        if max_read_size == 0 {
            return Err(StreamError::InvalidReadSize);
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        read_exact_or_truncated(&mut source, &mut header_bytes).await?;
        let header = Header::from_bytes(header_bytes);
        debug!(total_size, max_read_size, pad_size, "decryption stream opened");

        Ok(Self {
            source,
            pull: PullStream::init(&header, key),
            total_size,
            bytes_consumed: HEADER_SIZE as u64,
            full_chunk_len: chunk_ciphertext_len(max_read_size, pad_size),
            buffer: Vec::new(),
            pos: 0,
            saw_final: false,
        })
    }

    /// Read the next plaintext bytes into `buf`, returning the count.
    /// Returns 0 only after the final chunk has been authenticated and
    /// fully consumed.
    ///
    /// # Errors
    ///
    /// Returns [`courier_crypto::CryptoError::AuthenticationFailed`]
    /// (wrapped) on tampering and [`StreamError::Truncated`] when the
    /// source ends early or the consumed total differs from the declared
    /// size. All errors are terminal; no partial plaintext is returned
    /// from a failed chunk.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.pos < self.buffer.len() {
                let n = (self.buffer.len() - self.pos).min(buf.len());
                buf[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.saw_final {
                return Ok(0);
            }
            self.refill().await?;
        }
    }

    /// Decrypt the entire remaining stream into one buffer. Intended for
    /// small payloads and tests; large transfers should loop over
    /// [`DecryptionStream::read`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`DecryptionStream::read`].
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>, StreamError> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = self.read(&mut buf).await?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Pull and decrypt the next ciphertext chunk into the internal buffer.
    async fn refill(&mut self) -> Result<(), StreamError> {
        let remaining = self.total_size.saturating_sub(self.bytes_consumed);
        if remaining == 0 {
            // Declared size exhausted without a final chunk.
            warn!("ciphertext ended before final chunk");
            return Err(StreamError::Truncated);
        }

        let target = remaining.min(self.full_chunk_len as u64) as usize;
        let mut ciphertext = vec![0u8; target];
        read_exact_or_truncated(&mut self.source, &mut ciphertext).await?;
        self.bytes_consumed += target as u64;

        let (plaintext, flag) = self.pull.pull(&ciphertext)?;
        trace!(chunk_len = plaintext.len(), ?flag, "decrypted chunk");

        if flag == ChunkFlag::Final {
            self.saw_final = true;
            if self.bytes_consumed != self.total_size {
                // Authenticated final chunk arrived before the declared
                // ciphertext size was consumed.
                warn!(
                    consumed = self.bytes_consumed,
                    declared = self.total_size,
                    "ciphertext size mismatch after final chunk"
                );
                return Err(StreamError::Truncated);
            }
        }

        self.buffer = plaintext;
        self.pos = 0;
        Ok(())
    }

    /// Whether the final chunk has been seen and authenticated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.saw_final && self.pos == self.buffer.len()
    }

    /// Consume the adapter, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// `read_exact` that reports a clean EOF as stream truncation.
async fn read_exact_or_truncated<R: AsyncRead + Unpin>(
    source: &mut R,
    buf: &mut [u8],
) -> Result<(), StreamError> {
    match source.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(StreamError::Truncated),
        Err(e) => Err(e.into()),
    }
}
