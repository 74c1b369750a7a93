//! Line codec for the MCP stdio transport.
//!
//! Frame format: one UTF-8 JSON value per line, `\n` terminated. Blank lines are
//! skipped. Lines longer than the configured cap are discarded up to the next
//! newline and surfaced as [`Inbound::Oversized`] so the server can answer with an
//! error instead of dropping the session.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One decoded inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Well-formed JSON.
    Message(Value),
    /// Not JSON; carries the parser message.
    Malformed(String),
    /// Line exceeded the size cap; carries the cap.
    Oversized(usize),
}

/// Read the next non-blank line. Returns `None` on clean EOF.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_message_bytes: usize,
) -> std::io::Result<Option<Inbound>> {
    loop {
        let mut line = Vec::new();
        let limit = (max_message_bytes as u64).saturating_add(1);
        let read = (&mut *reader).take(limit).read_until(b'\n', &mut line).await?;
        if read == 0 {
            return Ok(None);
        }

        let terminated = line.last() == Some(&b'\n');
        let content_len = line.len() - usize::from(terminated);
        if content_len > max_message_bytes {
            if !terminated {
                discard_line(reader).await?;
            }
            return Ok(Some(Inbound::Oversized(max_message_bytes)));
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        return Ok(Some(match serde_json::from_str(text) {
            Ok(value) => Inbound::Message(value),
            Err(e) => Inbound::Malformed(e.to_string()),
        }));
    }
}

/// Consume input up to and including the next newline.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Write one JSON value as a line and flush.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    value: &Value,
) -> std::io::Result<()> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
