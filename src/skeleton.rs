#![cfg(feature = "std")]

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{dispatcher::Dispatcher, transport::Transport};

/// Dispatcher shared by every server loop. Each request is handled under the
/// lock, so the match table and the directory only ever see one mutation at a
/// time.
pub type SharedDispatcher = Arc<Mutex<Dispatcher>>;

/// Server end of one channel: wait for a request, dispatch it, answer.
pub struct Skeleton<T: Transport> {
    dispatcher: SharedDispatcher,
    transport: T,
}

impl<T: Transport> Skeleton<T> {
    pub fn new(dispatcher: SharedDispatcher, transport: T) -> Self {
        Self {
            dispatcher,
            transport,
        }
    }

    /// Serve until the peer goes away. Returns the number of requests
    /// handled.
    pub async fn run(&mut self) -> anyhow::Result<usize> {
        let mut served = 0;
        while let Ok(request) = self.transport.recv().await {
            let reply = self.dispatcher.lock().await.dispatch(request);
            self.transport.send(reply).await?;
            served += 1;
        }
        Ok(served)
    }
}
