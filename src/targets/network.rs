//! Network target for remote logging
//!
//! Sends `formatted-message\n` lines over TCP, UDP or a Unix domain socket.
//! Network latency is kept off the dispatch worker: `process` only hands the
//! entry to a private writer thread through a single-slot queue, and the
//! writer thread owns the connection.
//!
//! A failed write is reported to the error sink and the entry is dropped.
//! The connection is not re-established.

use crate::core::{Dispatch, Entry, ErrorSink, LoggerError, Result, Target};
use crossbeam_channel::{bounded, Receiver, Sender};
use socket2::SockRef;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// Network target that sends logs to a remote endpoint
///
/// # Example
///
/// ```no_run
/// use rust_logkit::prelude::*;
///
/// let logger = Logger::builder()
///     .target(NetworkTarget::new("tcp", "127.0.0.1:5140"))
///     .build();
///
/// logger.open().unwrap();
/// logger.info("This log will be sent to 127.0.0.1:5140");
/// logger.close();
/// ```
pub struct NetworkTarget {
    transport: String,
    address: String,
    connect_timeout: Option<Duration>,
    queue: Option<Sender<Arc<Entry>>>,
    writer: Option<thread::JoinHandle<()>>,
}

impl NetworkTarget {
    /// # Arguments
    ///
    /// * `transport` - `tcp`, `tcp4`, `tcp6`, `udp`, `udp4`, `udp6`, or `unix` (Unix only)
    /// * `address` - `host:port`, or a socket path for `unix`
    pub fn new(transport: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            transport: transport.into(),
            address: address.into(),
            connect_timeout: None,
            queue: None,
            writer: None,
        }
    }

    /// Give up connecting (TCP only) after `timeout`
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn transport(&self) -> &str {
        &self.transport
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Close the internal queue and wait for the writer to hang up
    fn stop_writer(&mut self) -> Result<()> {
        drop(self.queue.take());
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                return Err(LoggerError::delivery(self.name(), "writer thread panicked"));
            }
        }
        Ok(())
    }
}

impl Target for NetworkTarget {
    fn open(&mut self, errors: &ErrorSink) -> Result<()> {
        if self.transport.is_empty() {
            return Err(LoggerError::target_open(self.name(), "transport must be set"));
        }
        if self.address.is_empty() {
            return Err(LoggerError::target_open(self.name(), "address must be set"));
        }

        let connection = Connection::open(&self.transport, &self.address, self.connect_timeout)
            .map_err(|e| {
                LoggerError::target_open(
                    self.name(),
                    format!("{} {}: {}", self.transport, self.address, e),
                )
            })?;

        let (sender, receiver) = bounded(1);
        let errors = errors.clone();
        let writer = thread::Builder::new()
            .name("logkit-network".to_string())
            .spawn(move || send_loop(connection, receiver, errors))
            .map_err(|e| LoggerError::target_open(self.name(), format!("writer thread: {}", e)))?;

        self.queue = Some(sender);
        self.writer = Some(writer);
        Ok(())
    }

    fn process(&mut self, dispatch: &Dispatch) -> Result<()> {
        match dispatch {
            Dispatch::Entry(entry) => {
                let queue = self
                    .queue
                    .as_ref()
                    .ok_or_else(|| LoggerError::delivery("network", "network target is not open"))?;
                queue
                    .send(Arc::clone(entry))
                    .map_err(|_| LoggerError::delivery("network", "writer thread has stopped"))
            }
            // The writer sees the closed queue once it has sent everything before it.
            Dispatch::Drain => {
                drop(self.queue.take());
                Ok(())
            }
        }
    }

    fn close(&mut self) {
        // Joining is the drain acknowledgment; the connection is closed by then.
        let _ = self.stop_writer();
    }

    fn name(&self) -> &str {
        "network"
    }
}

impl Drop for NetworkTarget {
    fn drop(&mut self) {
        let _ = self.stop_writer();
    }
}

fn send_loop(mut connection: Connection, entries: Receiver<Arc<Entry>>, errors: ErrorSink) {
    for entry in entries.iter() {
        let mut line = String::with_capacity(entry.formatted_message.len() + 1);
        line.push_str(&entry.formatted_message);
        line.push('\n');

        if let Err(e) = connection.write_all(line.as_bytes()) {
            errors.report(&LoggerError::delivery(
                "network",
                format!("write error: {}", e),
            ));
        }
    }
    connection.shutdown();
}

/// The writer thread's end of the link
enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    fn open(transport: &str, address: &str, timeout: Option<Duration>) -> io::Result<Self> {
        match transport {
            "tcp" | "tcp4" | "tcp6" => {
                let stream = connect_tcp(resolve(transport, address)?, timeout)?;
                SockRef::from(&stream).set_keepalive(true)?;
                Ok(Connection::Tcp(stream))
            }
            "udp" | "udp4" | "udp6" => {
                let socket = connect_udp(resolve(transport, address)?)?;
                Ok(Connection::Udp(socket))
            }
            #[cfg(unix)]
            "unix" => Ok(Connection::Unix(UnixStream::connect(address)?)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown transport '{}'", other),
            )),
        }
    }

    fn shutdown(self) {
        match self {
            Connection::Tcp(stream) => {
                let _ = stream.shutdown(std::net::Shutdown::Both);
            }
            Connection::Udp(_) => {}
            #[cfg(unix)]
            Connection::Unix(stream) => {
                let _ = stream.shutdown(std::net::Shutdown::Both);
            }
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.write(buf),
            Connection::Udp(socket) => socket.send(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush(),
            Connection::Udp(_) => Ok(()),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.flush(),
        }
    }
}

/// Resolve `address`, keeping only the family a `4`/`6` suffix asks for
fn resolve(transport: &str, address: &str) -> io::Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = address
        .to_socket_addrs()?
        .filter(|addr| match transport.as_bytes().last() {
            Some(b'4') => addr.is_ipv4(),
            Some(b'6') => addr.is_ipv6(),
            _ => true,
        })
        .collect();
    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no {} address for '{}'", transport, address),
        ));
    }
    Ok(addrs)
}

fn connect_tcp(addrs: Vec<SocketAddr>, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let mut last_error = None;
    for addr in addrs {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)))
}

fn connect_udp(addrs: Vec<SocketAddr>) -> io::Result<UdpSocket> {
    let mut last_error = None;
    for addr in addrs {
        let local: SocketAddr = if addr.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let attempt = UdpSocket::bind(local).and_then(|socket| {
            socket.connect(addr)?;
            Ok(socket)
        });
        match attempt {
            Ok(socket) => return Ok(socket),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)))
}
