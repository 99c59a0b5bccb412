//! Connection handler
//!
//! Per-connection command loop: read a line, run it, write one reply.

use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt,
    BufReader,
};
use tracing::debug;

use crate::protocol::{Command, Response};
use crate::server::ServerState;

/// Longest request line accepted, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Serves one client until it closes the stream or an I/O error occurs.
///
/// Malformed requests get a diagnostic reply and the loop continues; only
/// transport errors end it early, and those are returned to the caller.
/// Lines that are not UTF-8 or exceed [`MAX_LINE_LEN`] answer `Invalid command`.
pub async fn handle_connection<S>(stream: S, state: ServerState) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if read_line_capped(&mut reader, &mut buf).await? == 0 {
            break;
        }

        let response = if is_oversized(&buf) {
            debug!(limit = MAX_LINE_LEN, "rejected oversized request");
            skip_rest_of_line(&mut reader, &mut buf).await?;
            Response::InvalidCommand
        } else {
            match std::str::from_utf8(strip_line_ending(&buf)) {
                Ok(line) => respond(line, &state).await,
                Err(err) => {
                    debug!(error = %err, "rejected undecodable request");
                    Response::InvalidCommand
                }
            }
        };

        writer.write_all(response.to_line().as_bytes()).await?;
    }

    Ok(())
}

async fn respond(line: &str, state: &ServerState) -> Response {
    match Command::parse(line) {
        Ok(command) => {
            debug!(verb = command.verb(), "executing command");
            state.execute(command).await
        }
        Err(err) => {
            debug!(error = %err, "rejected request");
            Response::from(err)
        }
    }
}

/// Reads up to one line, never buffering more than `MAX_LINE_LEN + 1` bytes.
async fn read_line_capped<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    reader
        .take(MAX_LINE_LEN as u64 + 1)
        .read_until(b'\n', buf)
        .await
}

fn is_oversized(buf: &[u8]) -> bool {
    buf.len() > MAX_LINE_LEN && buf.last() != Some(&b'\n')
}

/// Drains the remainder of an oversized line in bounded chunks.
async fn skip_rest_of_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        buf.clear();
        let read = read_line_capped(reader, buf).await?;
        if read == 0 || buf.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
