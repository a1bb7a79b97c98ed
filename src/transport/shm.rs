//! Shared-memory rendezvous channel.
//!
//! The segment is a file mapped into both processes: a `#[repr(C)]` header
//! of atomics followed by a single message slot. Two counting signals in the
//! header sequence the exchange: the client writes the slot and posts
//! ClientReady, the server takes ClientReady, answers in the same slot and
//! posts ServerReady, which the client takes before reading. Only one
//! message is ever in flight, for all clients together.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{bail, Context};
use memmap2::MmapMut;

use crate::config::DEFAULT_SEGMENT_NAME;
use crate::protocol::{Message, MessageKind};
use crate::transport::Transport;

const MAGIC: u32 = 0x5345_4142;
const LAYOUT_VERSION: u32 = 1;

/// Bytes reserved for the header at the start of the segment.
pub const HEADER_SIZE: usize = 64;
/// Bytes available to one encoded message.
pub const SLOT_CAPACITY: usize = 16 * 1024;
pub const SEGMENT_SIZE: usize = HEADER_SIZE + SLOT_CAPACITY;

/// Text of the reply sent in place of one that overflows the slot.
pub const REPLY_TOO_LARGE: &str = "Response too large!";

const DEFAULT_TICK: Duration = Duration::from_millis(1);

#[repr(C)]
struct Header {
    magic: AtomicU32,
    version: AtomicU32,
    client_ready: AtomicU32,
    server_ready: AtomicU32,
    len: AtomicU32,
}

const _: () = assert!(std::mem::size_of::<Header>() <= HEADER_SIZE);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Signal {
    ClientReady,
    ServerReady,
}

/// Which end of the rendezvous this handle drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

/// Where the segment lives when no path is configured: `/dev/shm` if the
/// host has it, the temp dir otherwise.
pub fn default_segment_path() -> PathBuf {
    let shm = Path::new("/dev/shm");
    if shm.is_dir() {
        shm.join(DEFAULT_SEGMENT_NAME)
    } else {
        std::env::temp_dir().join(DEFAULT_SEGMENT_NAME)
    }
}

pub struct ShmTransport {
    map: MmapMut,
    path: PathBuf,
    role: Role,
    awaiting_reply: bool,
    tick: Duration,
}

impl ShmTransport {
    /// Create (or reset) the segment at `path` and take the server end.
    /// The file is removed again when the handle is dropped.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("cannot create shared memory segment {}", path.display()))?;
        file.set_len(SEGMENT_SIZE as u64)?;
        // SAFETY: the file was just sized to SEGMENT_SIZE and stays open
        // through the mapping; other processes only touch it via this layout.
        let map = unsafe { MmapMut::map_mut(&file) }
            .with_context(|| format!("cannot map {}", path.display()))?;
        let transport = Self {
            map,
            path,
            role: Role::Server,
            awaiting_reply: false,
            tick: DEFAULT_TICK,
        };
        let header = transport.header();
        header.client_ready.store(0, Ordering::Relaxed);
        header.server_ready.store(0, Ordering::Relaxed);
        header.len.store(0, Ordering::Relaxed);
        header.version.store(LAYOUT_VERSION, Ordering::Relaxed);
        header.magic.store(MAGIC, Ordering::Release);
        log::info!("shared memory segment ready at {}", transport.path.display());
        Ok(transport)
    }

    /// Attach to a segment a server created and take the client end.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| {
                format!(
                    "shared memory segment {} not found; is the server running?",
                    path.display()
                )
            })?;
        let size = file.metadata()?.len();
        if size < SEGMENT_SIZE as u64 {
            bail!(
                "shared memory segment {} is {} bytes, expected {}",
                path.display(),
                size,
                SEGMENT_SIZE
            );
        }
        // SAFETY: size checked above; the server keeps the file alive.
        let map = unsafe { MmapMut::map_mut(&file) }
            .with_context(|| format!("cannot map {}", path.display()))?;
        let transport = Self {
            map,
            path,
            role: Role::Client,
            awaiting_reply: false,
            tick: DEFAULT_TICK,
        };
        let header = transport.header();
        if header.magic.load(Ordering::Acquire) != MAGIC {
            bail!(
                "{} is not a sea battle segment; is the server running?",
                transport.path.display()
            );
        }
        let version = header.version.load(Ordering::Relaxed);
        if version != LAYOUT_VERSION {
            bail!("segment layout version {} is not supported", version);
        }
        Ok(transport)
    }

    /// Sleep between checks of a signal that is not yet posted.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn header(&self) -> &Header {
        // SAFETY: the mapping is page aligned and at least HEADER_SIZE long;
        // the header fields are atomics, so shared access from both
        // processes is sound.
        unsafe { &*(self.map.as_ptr() as *const Header) }
    }

    fn signal(&self, signal: Signal) -> &AtomicU32 {
        match signal {
            Signal::ClientReady => &self.header().client_ready,
            Signal::ServerReady => &self.header().server_ready,
        }
    }

    fn post(&self, signal: Signal) {
        self.signal(signal).fetch_add(1, Ordering::Release);
    }

    fn try_take(&self, signal: Signal) -> bool {
        self.signal(signal)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| count.checked_sub(1))
            .is_ok()
    }

    /// Block until `signal` is posted and consume it. Never times out.
    async fn take(&self, signal: Signal) {
        while !self.try_take(signal) {
            tokio::time::sleep(self.tick).await;
        }
    }

    fn write_slot(&mut self, msg: &Message) -> anyhow::Result<()> {
        let bytes = msg.encode()?;
        if bytes.len() > SLOT_CAPACITY {
            bail!(
                "message of {} bytes does not fit the {} byte slot",
                bytes.len(),
                SLOT_CAPACITY
            );
        }
        self.map[HEADER_SIZE..HEADER_SIZE + bytes.len()].copy_from_slice(&bytes);
        self.header().len.store(bytes.len() as u32, Ordering::Release);
        Ok(())
    }

    fn read_slot(&self) -> anyhow::Result<Message> {
        let len = self.header().len.load(Ordering::Acquire) as usize;
        if len > SLOT_CAPACITY {
            bail!("slot length {} exceeds capacity", len);
        }
        Message::decode(&self.map[HEADER_SIZE..HEADER_SIZE + len])
    }
}

#[async_trait::async_trait]
impl Transport for ShmTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        match self.role {
            Role::Client => {
                if self.awaiting_reply {
                    bail!("a request is already in flight");
                }
                self.write_slot(&msg)?;
                self.awaiting_reply = true;
                self.post(Signal::ClientReady);
            }
            Role::Server => {
                // The client is parked on ServerReady, so it gets some
                // answer even when the real one does not fit.
                let written = self.write_slot(&msg).or_else(|e| {
                    log::warn!("replacing {:?} reply: {:#}", msg.kind, e);
                    let fallback = Message::new(MessageKind::Error, "").with_text(REPLY_TOO_LARGE);
                    self.write_slot(&fallback)
                });
                self.post(Signal::ServerReady);
                return written;
            }
        }
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        match self.role {
            Role::Client => {
                if !self.awaiting_reply {
                    bail!("no request in flight");
                }
                self.take(Signal::ServerReady).await;
                self.awaiting_reply = false;
                self.read_slot()
            }
            Role::Server => {
                self.take(Signal::ClientReady).await;
                // The client is parked on ServerReady, so an unreadable
                // request still has to be answered.
                Ok(self.read_slot().unwrap_or_else(|e| {
                    log::warn!("malformed request in shared memory: {:#}", e);
                    Message::new(MessageKind::Other(0), "")
                }))
            }
        }
    }
}

impl Drop for ShmTransport {
    fn drop(&mut self) {
        if self.role == Role::Server {
            if let Err(e) = fs::remove_file(&self.path) {
                log::debug!("could not remove segment {}: {}", self.path.display(), e);
            }
        }
    }
}
