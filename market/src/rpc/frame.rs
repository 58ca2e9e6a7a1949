//! Length-prefixed framing: 4-byte little-endian length, then the body.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::MAX_FRAME_SIZE;
use crate::error::{AuctionError, AuctionResult};

/// Read one frame, rejecting any longer than [`MAX_FRAME_SIZE`].
pub async fn read_frame<R>(reader: &mut R) -> AuctionResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| AuctionError::Network(format!("Failed to read frame length: {e}")))?;
    let len = u32::from_le_bytes(len_buf) as usize;

    if len > MAX_FRAME_SIZE {
        return Err(AuctionError::Protocol(format!(
            "Frame of {len} bytes exceeds limit of {MAX_FRAME_SIZE}"
        )));
    }

    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| AuctionError::Network(format!("Failed to read frame body: {e}")))?;
    Ok(body)
}

/// Write one frame and flush it.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> AuctionResult<()>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_SIZE {
        return Err(AuctionError::Protocol(format!(
            "Frame of {} bytes exceeds limit of {MAX_FRAME_SIZE}",
            body.len()
        )));
    }

    let mut data = Vec::with_capacity(4 + body.len());
    data.extend_from_slice(&(body.len() as u32).to_le_bytes());
    data.extend_from_slice(body);
    writer
        .write_all(&data)
        .await
        .map_err(|e| AuctionError::Network(format!("Failed to write frame: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| AuctionError::Network(format!("Failed to flush frame: {e}")))
}
