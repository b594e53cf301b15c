use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::client::SessionRegistry;
use crate::config::ServiceConfig;
use crate::error::SessionError;
use crate::error::handlers::error_reply;
use crate::middleware::RateLimiter;
use crate::middleware::logging::{log_command, log_disconnect};
use crate::protocol::{Command, CommandStatus, handle_command, parse_command};

/// Outcome of reading one command line.
#[derive(Debug, PartialEq)]
enum LineRead {
    Closed,
    Line,
    /// The line overflowed the cap; holds the number of bytes dropped.
    TooLong(usize),
}

/// Serves one client session using the Tokio async runtime.
///
/// - Reads command lines through a capped buffer; an over-long line is
///   dropped up to its newline and answered with `500 Line too long`.
/// - Rate-limits every command except QUIT.
/// - Dispatches commands using `handle_command` against the session stored in
///   the shared `sessions` registry.
pub async fn handle_client(
    stream: TcpStream,
    sessions: Arc<Mutex<SessionRegistry>>,
    limiter: Arc<Mutex<RateLimiter>>,
    client_addr: SocketAddr,
    config: Arc<ServiceConfig>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let max_line = config.server.max_line_length;
    let mut buf = Vec::with_capacity(max_line + 2);

    loop {
        match read_bounded_line(&mut reader, &mut buf, max_line).await {
            Ok(LineRead::Closed) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(LineRead::TooLong(len)) => {
                warn!("Dropped {} byte line from {}", len, client_addr);
                let reply = error_reply(&SessionError::LineTooLong(len).into());
                if write_half.write_all(reply.as_bytes()).await.is_err() {
                    break;
                }
            }
            Ok(LineRead::Line) => {
                let line = String::from_utf8_lossy(&buf);
                let trimmed = line.trim_end_matches(['\r', '\n']);

                if trimmed.len() > max_line {
                    let reply = error_reply(&SessionError::LineTooLong(trimmed.len()).into());
                    let _ = write_half.write_all(reply.as_bytes()).await;
                    continue;
                }

                let command = parse_command(trimmed);
                log_command(&client_addr, &command);

                if command != Command::Quit && !limiter.lock().await.is_allowed(client_addr.ip())
                {
                    warn!("Rate limit exceeded for {}", client_addr);
                    let reply = error_reply(&SessionError::RateLimited(client_addr).into());
                    let _ = write_half.write_all(reply.as_bytes()).await;
                    continue;
                }

                let mut sessions_guard = sessions.lock().await;
                let Some(session) = sessions_guard.get_mut(&client_addr) else {
                    error!("Client {} not found in session registry", client_addr);
                    let _ = write_half
                        .write_all(b"421 Client session not found\r\n")
                        .await;
                    break;
                };
                let result = handle_command(session, &command, &config.forms);
                drop(sessions_guard);

                if let Some(msg) = &result.message {
                    if let Err(e) = write_half.write_all(msg.as_bytes()).await {
                        error!("Failed to write to {}: {}", client_addr, e);
                        break;
                    }
                }

                if result.status == CommandStatus::CloseConnection {
                    info!("Client {} requested to quit", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    let removed = sessions.lock().await.remove(&client_addr);
    limiter.lock().await.prune();
    log_disconnect(
        &client_addr,
        removed.map(|s| s.commands_handled()).unwrap_or_default(),
    );
}

/// Reads one line into `buf`, holding at most `max_line` bytes plus `\r\n`.
///
/// When the cap is hit before a newline, the rest of the line is consumed
/// without buffering.
async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let cap = max_line + 2;
    buf.clear();

    let read = (&mut *reader).take(cap as u64).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(LineRead::Closed);
    }
    if buf.len() < cap || buf.ends_with(b"\n") {
        return Ok(LineRead::Line);
    }

    let discarded = discard_line(reader).await?;
    Ok(LineRead::TooLong(buf.len() + discarded))
}

/// Consumes input up to and including the next newline or EOF.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut discarded = 0;

    loop {
        let (newline, available) = {
            let chunk = reader.fill_buf().await?;
            (chunk.iter().position(|&b| b == b'\n'), chunk.len())
        };

        match newline {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(discarded + pos + 1);
            }
            None if available == 0 => return Ok(discarded),
            None => {
                reader.consume(available);
                discarded += available;
            }
        }
    }
}
