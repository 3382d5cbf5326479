use std::{
    collections::HashSet,
    fmt::{self, Debug},
    io::{self, ErrorKind, Read, Write},
    net::{Shutdown, TcpStream},
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex, MutexGuard, TryLockError,
    },
};

use byteorder::{BigEndian, ByteOrder};
use log::{debug, error, info, trace, warn};
use thiserror::Error;

use crate::{
    codec::{DecodeError, JdwpReadable, JdwpReader},
    config::ServerConfig,
    handlers,
    requests::RequestRegistry,
    spec::{
        event::{Composite, Event},
        *,
    },
    vm::{Debuggee, SourceInfo},
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Bad handshake: {0:?}")]
    Handshake(Vec<u8>),
    #[error("Packet length {0} is shorter than its header")]
    Framing(usize),
    #[error("Malformed packet: {0}")]
    Decode(#[from] DecodeError),
    #[error("Debugger disconnected")]
    Disconnected,
    #[error("Reply to packet {0} does not match its reported length")]
    LengthMismatch(u32),
}

/// Splits the incoming byte stream into packets.
///
/// Partial packets are kept across read timeouts.
#[derive(Debug)]
pub(crate) struct PacketReader {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl PacketReader {
    pub(crate) fn new(stream: TcpStream) -> Self {
        PacketReader {
            stream,
            buf: Vec::new(),
        }
    }

    /// `Ok(None)` when the socket timed out before a whole packet arrived.
    pub(crate) fn read_packet(&mut self) -> Result<Option<Vec<u8>>, ServerError> {
        let mut chunk = [0; 4096];
        loop {
            if let Some(packet) = self.take_packet()? {
                return Ok(Some(packet));
            }
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ServerError::Disconnected),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None)
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn take_packet(&mut self) -> Result<Option<Vec<u8>>, ServerError> {
        if self.buf.len() < 4 {
            return Ok(None);
        }
        let length = BigEndian::read_u32(&self.buf[..4]) as usize;
        if length < PacketHeader::JDWP_SIZE {
            return Err(ServerError::Framing(length));
        }
        if self.buf.len() < length {
            return Ok(None);
        }
        let rest = self.buf.split_off(length);
        Ok(Some(std::mem::replace(&mut self.buf, rest)))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// One attached debugger.
///
/// There is no network thread: packets are read and serviced by whichever
/// interpreter thread is currently handing control to the debugger.
pub struct Session {
    config: ServerConfig,
    debuggee: Arc<dyn Debuggee>,
    source: Arc<dyn SourceInfo>,
    requests: RequestRegistry,
    writer: Mutex<TcpStream>,
    reader: Mutex<PacketReader>,
    /// Threads currently inside their packet loop.
    dispatching: Mutex<HashSet<ThreadID>>,
    disposed: AtomicBool,
    next_packet_id: AtomicU32,
}

impl Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("requests", &self.requests)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Leaves the dispatching set on drop.
struct DispatchGuard<'a> {
    session: &'a Session,
    thread: ThreadID,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        lock(&self.session.dispatching).remove(&self.thread);
    }
}

impl Session {
    pub(crate) fn new(
        config: ServerConfig,
        stream: TcpStream,
        debuggee: Arc<dyn Debuggee>,
        source: Arc<dyn SourceInfo>,
    ) -> Result<Session, ServerError> {
        stream.set_read_timeout(Some(config.poll_interval))?;
        stream.set_nodelay(true)?;
        let reader = PacketReader::new(stream.try_clone()?);
        Ok(Session {
            config,
            debuggee,
            source,
            requests: RequestRegistry::default(),
            writer: Mutex::new(stream),
            reader: Mutex::new(reader),
            dispatching: Mutex::default(),
            disposed: AtomicBool::new(false),
            // ids of packets we originate, the debugger picks its own
            next_packet_id: AtomicU32::new(1),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn debuggee(&self) -> &dyn Debuggee {
        &*self.debuggee
    }

    pub fn source(&self) -> &dyn SourceInfo {
        &*self.source
    }

    pub fn requests(&self) -> &RequestRegistry {
        &self.requests
    }

    /// False once the debugger disposed of the session or went away.
    pub fn is_active(&self) -> bool {
        !self.disposed.load(Ordering::Acquire)
    }

    fn enter_dispatch(&self, thread: ThreadID) -> Option<DispatchGuard<'_>> {
        lock(&self.dispatching)
            .insert(thread)
            .then_some(DispatchGuard {
                session: self,
                thread,
            })
    }

    /// Announces the session to the debugger with VM_START, then lets it
    /// look around before `thread` runs any code.
    pub fn start(&self, thread: ThreadID) {
        let policy = if self.config.suspend_on_start {
            SuspendPolicy::All
        } else {
            SuspendPolicy::None
        };
        self.send_events(policy, vec![Event::VmStart(RequestID::AUTOMATIC, thread)]);
        self.give_control(thread, policy);
    }

    /// Sends VM_DEATH and closes the session.
    pub fn vm_died(&self) {
        if !self.is_active() {
            return;
        }
        self.send_events(SuspendPolicy::None, vec![Event::VmDeath(RequestID::AUTOMATIC)]);
        self.close();
    }

    /// Sends one composite event packet.
    pub fn send_events(&self, suspend_policy: SuspendPolicy, events: Vec<Event>) {
        if events.is_empty() || !self.is_active() {
            return;
        }
        debug!(
            "sending {:?} with {:?}",
            events
                .iter()
                .map(|e| (e.kind(), e.request_id()))
                .collect::<Vec<_>>(),
            suspend_policy
        );
        let id = self.next_packet_id.fetch_add(1, Ordering::Relaxed);
        let composite = Composite {
            suspend_policy,
            events,
        };
        match encode_packet(id, PacketMeta::Command(Composite::ID), &composite) {
            Ok(packet) => {
                if let Err(e) = self.write_packet(&packet) {
                    self.terminate(e.into());
                }
            }
            Err(e) => error!("dropping composite event {}: {}", id, e),
        }
    }

    /// Suspends threads per `policy` and services the debugger until
    /// `thread` may run again.
    ///
    /// Does nothing if `thread` is already servicing packets further up its
    /// own stack.
    pub fn give_control(&self, thread: ThreadID, policy: SuspendPolicy) {
        if !self.is_active() {
            return;
        }
        let Some(_guard) = self.enter_dispatch(thread) else {
            trace!("{:?} is already dispatching", thread);
            return;
        };
        match policy {
            SuspendPolicy::None => {}
            SuspendPolicy::EventThread => {
                if let Err(code) = self.debuggee.suspend_thread(thread) {
                    warn!("could not suspend {:?} for an event: {}", thread, code);
                }
            }
            SuspendPolicy::All => self.debuggee.suspend_all(),
        }
        self.packet_loop(thread);
    }

    /// Holds a thread that was suspended by the debugger while it ran.
    pub fn park(&self, thread: ThreadID) {
        if !self.is_active() || self.resumable(thread) {
            return;
        }
        if let Some(_guard) = self.enter_dispatch(thread) {
            trace!("parking {:?}", thread);
            self.packet_loop(thread);
        }
    }

    fn resumable(&self, thread: ThreadID) -> bool {
        self.debuggee
            .suspend_count(thread)
            .map_or(true, |count| count <= 0)
    }

    fn packet_loop(&self, thread: ThreadID) {
        while self.is_active() {
            let packet = match self.reader.try_lock() {
                Ok(mut reader) => reader.read_packet(),
                Err(TryLockError::Poisoned(e)) => e.into_inner().read_packet(),
                Err(TryLockError::WouldBlock) => {
                    // another thread owns the socket and serves the debugger
                    if self.resumable(thread) {
                        return;
                    }
                    std::thread::sleep(self.config.poll_interval);
                    continue;
                }
            };
            match packet {
                Ok(Some(packet)) => {
                    if let Err(e) = self.process(&packet) {
                        self.terminate(e);
                    }
                }
                Ok(None) => {}
                Err(e) => self.terminate(e),
            }
            if self.resumable(thread) {
                return;
            }
        }
    }

    fn process(&self, packet: &[u8]) -> Result<(), ServerError> {
        let mut reader = JdwpReader::new(packet);
        let header = PacketHeader::read(&mut reader)?;
        trace!("received {:?}", header);

        match header.meta() {
            PacketMeta::Command(command) => {
                let reply = match handlers::dispatch(self, command, header.id(), &mut reader) {
                    Err(ServerError::LengthMismatch(id)) => {
                        error!("reply to {} ({}) does not match its length", id, command);
                        encode_error(id, ErrorCode::Internal)?
                    }
                    other => other?,
                };
                self.write_packet(&reply)?;
                if !self.is_active() {
                    info!("session disposed");
                    self.shutdown();
                }
            }
            PacketMeta::Reply(code) => {
                debug!("ignoring reply to packet {} ({})", header.id(), code);
            }
        }
        Ok(())
    }

    fn write_packet(&self, packet: &[u8]) -> io::Result<()> {
        let mut writer = lock(&self.writer);
        writer.write_all(packet)?;
        writer.flush()
    }

    /// Cancels every request and releases every suspension, then stops
    /// servicing the debugger. Hooks become noops afterwards.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.requests.clear();
        for thread in self.debuggee.threads() {
            while !self.resumable(thread) {
                if self.debuggee.resume_thread(thread).is_err() {
                    break;
                }
            }
        }
    }

    fn shutdown(&self) {
        if let Err(e) = lock(&self.writer).shutdown(Shutdown::Both) {
            // the peer may have closed it already
            trace!("socket shutdown: {}", e);
        }
    }

    /// Disposes the session and closes the connection.
    pub fn close(&self) {
        self.dispose();
        self.shutdown();
    }

    fn terminate(&self, error: ServerError) {
        match error {
            ServerError::Disconnected => info!("debugger disconnected"),
            e => error!("ending session: {}", e),
        }
        self.close();
    }
}
