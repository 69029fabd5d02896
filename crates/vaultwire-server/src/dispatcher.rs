//! The single-threaded reactor (C4, `§4.4`, `§5`).
//!
//! One `mio::Poll` instance drives the whole server: a listening socket and
//! every accepted connection are registered on it. Non-`SendFile` requests
//! are handled from the one packet that made the connection readable;
//! `SendFile` additionally drains further packets through a short-lived,
//! per-connection `Poll` that blocks this thread until the declared
//! `content_size` worth of ciphertext has arrived — the "blocking mode"
//! `§4.4` step 2 describes, achieved without raw file descriptors or
//! `unsafe` by registering the same socket on a second, throwaway `Poll`.
//!
//! Every connection is closed after exactly one request/response cycle
//! (`§4.4`, confirmed uniform across all seven opcodes by `§11`).

use std::{collections::HashMap, io, io::Read as _, io::Write as _};

use bytes::Bytes;
use mio::{
    net::{TcpListener, TcpStream},
    Events, Interest, Poll, Token,
};
use vaultwire_core::{handlers, Environment, HandlerError, Outcome, Repository, ServerState};
use vaultwire_proto::{Header, Request, RequestBody, Response, PACKET_SIZE};

const LISTENER: Token = Token(0);

/// Run the reactor until the process is killed.
///
/// # Errors
///
/// Returns [`io::Error`] if the listener cannot be registered or the poll
/// loop itself fails; per-connection failures are logged and never
/// propagate here (`§7`).
pub fn run<R, E>(mut state: ServerState<R, E>, mut listener: TcpListener) -> io::Result<()>
where
    R: Repository,
    E: Environment,
{
    let mut poll = Poll::new()?;
    poll.registry().register(&mut listener, LISTENER, Interest::READABLE)?;

    let mut events = Events::with_capacity(1024);
    let mut connections: HashMap<Token, TcpStream> = HashMap::new();
    let mut next_token = 1usize;

    loop {
        poll.poll(&mut events, None)?;

        for event in events.iter() {
            if event.token() == LISTENER {
                accept_all(&mut listener, &mut poll, &mut connections, &mut next_token);
                continue;
            }

            let Some(mut stream) = connections.remove(&event.token()) else {
                continue;
            };
            // Every connection is handled to completion in one pass, so it
            // never needs another readiness notification.
            let _ = poll.registry().deregister(&mut stream);
            handle_connection(&mut state, &mut stream);
        }
    }
}

fn accept_all(
    listener: &mut TcpListener,
    poll: &mut Poll,
    connections: &mut HashMap<Token, TcpStream>,
    next_token: &mut usize,
) {
    loop {
        match listener.accept() {
            Ok((mut stream, addr)) => {
                let token = Token(*next_token);
                *next_token += 1;
                if let Err(err) =
                    poll.registry().register(&mut stream, token, Interest::READABLE)
                {
                    tracing::warn!(error = %err, "failed to register accepted connection");
                    continue;
                }
                tracing::debug!(%addr, "accepted connection");
                connections.insert(token, stream);
            },
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
            Err(err) => {
                tracing::warn!(error = %err, "accept failed");
                break;
            },
        }
    }
}

fn handle_connection<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    stream: &mut TcpStream,
) {
    let mut buf = [0u8; PACKET_SIZE];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(err) if err.kind() == io::ErrorKind::WouldBlock => return,
        Err(err) => {
            tracing::warn!(error = %err, "read failed");
            return;
        },
    };

    if let Err(err) = process_frame(state, stream, &buf[..n]) {
        tracing::warn!(error = %err, "request failed");
        if let Ok(bytes) = Response::ServerError.encode() {
            if let Err(write_err) = write_response(stream, &bytes) {
                tracing::warn!(error = %write_err, "failed to send ServerError response");
            }
        }
    }
}

fn process_frame<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    stream: &mut TcpStream,
    initial: &[u8],
) -> Result<(), HandlerError> {
    if initial.len() < Header::SIZE {
        return Err(HandlerError::MalformedFrame(
            vaultwire_proto::ProtocolError::FrameTooShort {
                expected: Header::SIZE,
                actual: initial.len(),
            },
        ));
    }
    let (header_bytes, payload) = initial.split_at(Header::SIZE);
    let request = Request::decode(header_bytes, payload)?;
    let client_id = request.header.client_id();

    let upload_chunks = collect_upload_chunks(stream, &request.body)?;

    let outcome = handlers::handle(state, client_id, &request.body, &upload_chunks)?;
    match outcome {
        Outcome::Respond(response) => {
            let bytes = response.encode()?;
            write_response(stream, &bytes)?;
        },
        Outcome::Silent => {},
    }
    Ok(())
}

/// Accumulate the full ciphertext for a `SendFile` request, reading further
/// packets beyond whatever arrived bundled with the header if needed
/// (`§4.4` step 2, `§4.5`). Every other opcode's payload is fully self
/// contained in the first packet, so this returns an empty slice for them.
fn collect_upload_chunks(
    stream: &mut TcpStream,
    body: &RequestBody,
) -> io::Result<Vec<Bytes>> {
    let RequestBody::SendFile { content_size, initial_chunk, .. } = body else {
        return Ok(Vec::new());
    };
    let needed = *content_size as usize;
    let mut collected = initial_chunk.len().min(needed);
    let mut chunks = Vec::new();
    if collected > 0 {
        chunks.push(initial_chunk.slice(0..collected));
    }
    if collected >= needed {
        return Ok(chunks);
    }

    let mut local_poll = Poll::new()?;
    local_poll.registry().register(stream, Token(0), Interest::READABLE)?;
    let mut buf = [0u8; PACKET_SIZE];
    while collected < needed {
        match stream.read(&mut buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed mid-upload",
                ));
            },
            Ok(n) => {
                let take = n.min(needed - collected);
                chunks.push(Bytes::copy_from_slice(&buf[..take]));
                collected += take;
            },
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                let mut local_events = Events::with_capacity(1);
                local_poll.poll(&mut local_events, None)?;
            },
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(err) => return Err(err),
        }
    }
    let _ = local_poll.registry().deregister(stream);
    Ok(chunks)
}

/// Write `bytes` in `PACKET_SIZE` chunks, zero-padding the final (or only)
/// chunk up to `PACKET_SIZE` if it is shorter (`§6.1`).
fn write_response(stream: &mut TcpStream, bytes: &[u8]) -> io::Result<()> {
    let mut offset = 0;
    loop {
        let end = (offset + PACKET_SIZE).min(bytes.len());
        let mut packet = [0u8; PACKET_SIZE];
        packet[..end - offset].copy_from_slice(&bytes[offset..end]);
        write_all_blocking(stream, &packet)?;
        offset = end;
        if offset >= bytes.len() {
            break;
        }
    }
    Ok(())
}

fn write_all_blocking(stream: &mut TcpStream, buf: &[u8]) -> io::Result<()> {
    let mut written = 0;
    let mut local_poll: Option<Poll> = None;
    while written < buf.len() {
        match stream.write(&buf[written..]) {
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                let poll = match &mut local_poll {
                    Some(poll) => poll,
                    None => {
                        let mut poll = Poll::new()?;
                        poll.registry().register(stream, Token(0), Interest::WRITABLE)?;
                        local_poll = Some(poll);
                        local_poll.as_mut().expect("just inserted")
                    },
                };
                let mut events = Events::with_capacity(1);
                poll.poll(&mut events, None)?;
            },
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(err) => return Err(err),
        }
    }
    if let Some(mut poll) = local_poll {
        let _ = poll.registry().deregister(stream);
    }
    Ok(())
}
