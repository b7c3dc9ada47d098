//! Non-blocking confirmation dialogs.
//!
//! [`confirm`] returns the dialog the UI renders and a [`Confirmation`]
//! future that resolves once the user answers. Dropping the dialog without
//! an answer resolves the future to `false`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

#[derive(Debug)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    responder: Option<oneshot::Sender<bool>>,
}

impl ConfirmDialog {
    pub fn accept(mut self) {
        self.answer(true);
    }

    pub fn decline(mut self) {
        self.answer(false);
    }

    fn answer(&mut self, accepted: bool) {
        if let Some(responder) = self.responder.take() {
            // The waiting side may be gone already; nothing to do then.
            let _ = responder.send(accepted);
        }
    }
}

/// Resolves to `true` when the dialog was accepted.
#[derive(Debug)]
pub struct Confirmation {
    receiver: oneshot::Receiver<bool>,
}

impl Confirmation {
    /// A confirmation that is already answered.
    pub fn resolved(accepted: bool) -> Self {
        let (tx, receiver) = oneshot::channel();
        let _ = tx.send(accepted);
        Self { receiver }
    }
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}

pub fn confirm(
    title: impl Into<String>,
    message: impl Into<String>,
) -> (ConfirmDialog, Confirmation) {
    let (tx, receiver) = oneshot::channel();
    (
        ConfirmDialog {
            title: title.into(),
            message: message.into(),
            responder: Some(tx),
        },
        Confirmation { receiver },
    )
}
