//! # Package Source Module
//!
//! Connection to the controller side of the pipeline.
//!
//! This module handles:
//! - Connecting over TCP with a timeout
//! - Uploading an optional URScript program after connecting
//! - Reading decoded packages as newline-delimited JSON
//!
//! Decoding the controller's binary frames happens upstream; each line on
//! the stream is one already-decoded package:
//!
//! ```text
//! {"type": 16, "subpackages": [{"name": "Robot Mode Data", "fields": {"timestamp": 1200}}]}
//! ```

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::package::Package;

/// Default primary interface port
pub const PRIMARY_PORT: u16 = 30001;

/// Stream of decoded packages
pub struct PackageStream<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
    received: u64,
}

impl<R, W> std::fmt::Debug for PackageStream<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageStream")
            .field("received", &self.received)
            .finish_non_exhaustive()
    }
}

impl PackageStream<OwnedReadHalf, OwnedWriteHalf> {
    /// Connect to `host:port`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] on timeout or refused connection
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use ur_primary_client::source::PackageStream;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut stream = PackageStream::connect("localhost", 30001, Duration::from_secs(4)).await?;
    ///     while let Some(package) = stream.next_package().await? {
    ///         println!("{}", package);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        debug!("Connecting to {}:{}", host, port);

        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| {
                ClientError::Connection(format!(
                    "Timed out after {}ms connecting to {}:{}",
                    timeout.as_millis(),
                    host,
                    port
                ))
            })?
            .map_err(|e| ClientError::Connection(format!("Could not connect to {}:{}: {}", host, port, e)))?;

        info!("Connected to {}:{}", host, port);
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer))
    }
}

impl<R, W> PackageStream<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            received: 0,
        }
    }

    /// Send a URScript program to the controller
    pub async fn send_script(&mut self, script: &[u8]) -> Result<()> {
        self.writer.write_all(script).await?;
        self.writer.flush().await?;

        info!("Sent script ({} bytes)", script.len());
        Ok(())
    }

    /// Next decoded package, or `None` once the peer closes the stream.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the stream fails or a line is not a valid package
    pub async fn next_package(&mut self) -> Result<Option<Package>> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let package: Package = serde_json::from_str(line)?;
            self.received += 1;
            return Ok(Some(package));
        }

        debug!("Package stream closed after {} packages", self.received);
        Ok(None)
    }

    /// Packages decoded so far
    pub fn received(&self) -> u64 {
        self.received
    }
}
