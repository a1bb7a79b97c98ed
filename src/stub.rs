#![cfg(feature = "std")]

use anyhow::bail;

use crate::{protocol::GameApi, protocol::Message, transport::Transport};

/// Client end of a channel: each call is one request and its response.
pub struct Stub<T: Transport> {
    transport: T,
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[async_trait::async_trait]
impl<T: Transport> GameApi for Stub<T> {
    async fn call(&mut self, request: Message) -> anyhow::Result<Message> {
        let expected = request.kind.response();
        self.transport.send(request).await?;
        let reply = self.transport.recv().await?;
        match expected {
            Some(kind) if reply.kind != kind && reply.kind != crate::protocol::MessageKind::Error => {
                bail!("Unexpected response {:?}, expected {:?}", reply.kind, kind)
            }
            _ => Ok(reply),
        }
    }
}
