//! Encrypting stream adapter.

use courier_crypto::TransmissionKey;
use courier_crypto::secretstream::{ChunkFlag, PushStream};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::error::StreamError;

/// Presents chunked encryption of an async plaintext source as a readable
/// byte stream.
///
/// The first read yields the stream header, after which each refill pulls
/// up to `max_read_size` plaintext bytes from the source, pads and encrypts
/// them as one chunk, and serves the ciphertext to the caller. Callers may
/// request fewer bytes than a full chunk; the remainder stays buffered.
/// The chunk covering the last declared plaintext byte is flagged final.
pub struct EncryptionStream<R> {
    source: R,
    push: PushStream,
    total_size: u64,
    bytes_read: u64,
    max_read_size: usize,
    buffer: Vec<u8>,
    pos: usize,
    finished: bool,
}

impl<R: AsyncRead + Unpin> EncryptionStream<R> {
    /// Wrap a plaintext source of exactly `total_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidReadSize`] for a zero `max_read_size`
    /// and propagates [`courier_crypto::CryptoError`] from session setup.
    pub fn new(
        source: R,
        total_size: u64,
        key: &TransmissionKey,
        max_read_size: usize,
        pad_size: usize,
    ) -> Result<Self, StreamError> {
        if max_read_size == 0 {
            return Err(StreamError::InvalidReadSize);
        }

        let (push, header) = PushStream::init(key, pad_size)?;
        debug!(total_size, max_read_size, pad_size, "encryption stream opened");

        Ok(Self {
            source,
            push,
            total_size,
            bytes_read: 0,
            max_read_size,
            buffer: header.as_bytes().to_vec(),
            pos: 0,
            finished: false,
        })
    }

    /// Read the next ciphertext bytes into `buf`, returning the count.
    /// Returns 0 only once the whole stream has been produced and consumed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SourceSizeMismatch`] if the source ends before
    /// `total_size` plaintext bytes, and propagates source I/O and cipher
    /// errors. All errors are terminal for the stream.
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
            if self.finished {
                return Ok(0);
            }
            self.refill().await?;
        }
    }

    /// Encrypt the entire remaining stream into one buffer. Intended for
    /// small payloads and tests; large transfers should loop over
    /// [`EncryptionStream::read`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`EncryptionStream::read`].
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

    /// Produce the next ciphertext chunk into the internal buffer.
    async fn refill(&mut self) -> Result<(), StreamError> {
        let remaining = self.total_size - self.bytes_read;
        let target = remaining.min(self.max_read_size as u64) as usize;

        let mut plaintext = vec![0u8; target];
        let mut filled = 0;
        while filled < target {
            let n = self.source.read(&mut plaintext[filled..]).await?;
            if n == 0 {
                return Err(StreamError::SourceSizeMismatch {
                    declared: self.total_size,
                    actual: self.bytes_read + filled as u64,
                });
            }
            filled += n;
        }

        self.bytes_read += target as u64;
        let flag = if self.bytes_read == self.total_size {
            ChunkFlag::Final
        } else {
            ChunkFlag::Message
        };

        trace!(chunk_len = target, ?flag, "encrypting chunk");
        self.buffer = self.push.push(&plaintext, flag)?;
        self.pos = 0;
        if flag == ChunkFlag::Final {
            self.finished = true;
        }
        Ok(())
    }

    /// Consume the adapter, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}
