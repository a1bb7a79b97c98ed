use crate::protocol::Message;

/// A bidirectional message pipe. Clients send requests and receive
/// responses; the server end does the opposite.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
#[cfg(unix)]
pub mod shm;
