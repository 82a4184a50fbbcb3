//! Rendezvous queue between the poller and the sender.
//!
//! `push` returns only once `pop` has taken the item, so a slow consumer holds
//! the producer back one item at a time. tokio's mpsc can't be created with
//! zero capacity; each item therefore travels with a oneshot that the
//! receiving side fires on pickup.

use crate::types::{RelayError, Result};
use tokio::sync::{mpsc, oneshot};

type Slot<T> = (T, oneshot::Sender<()>);

pub fn channel<T>() -> (HandOffSender<T>, HandOffReceiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (HandOffSender { tx }, HandOffReceiver { rx })
}

#[derive(Debug)]
pub struct HandOffSender<T> {
    tx: mpsc::Sender<Slot<T>>,
}

impl<T> Clone for HandOffSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> HandOffSender<T> {
    /// Wait until the receiver has taken `item`.
    pub async fn push(&self, item: T) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send((item, ack_tx))
            .await
            .map_err(|_| RelayError::HandOffClosed)?;
        ack_rx.await.map_err(|_| RelayError::HandOffClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct HandOffReceiver<T> {
    rx: mpsc::Receiver<Slot<T>>,
}

impl<T> HandOffReceiver<T> {
    /// Next item, or `None` once every sender is gone.
    pub async fn pop(&mut self) -> Option<T> {
        let (item, ack) = self.rx.recv().await?;
        // The pusher may have given up waiting; the item is ours either way
        let _ = ack.send(());
        Some(item)
    }
}
