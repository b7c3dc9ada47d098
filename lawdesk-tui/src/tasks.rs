//! Background tasks that run app commands against the API.
//!
//! Each request runs in its own task and reports back through the event
//! channel, so a slow response never blocks input.

use crate::api_client::CollectionApi;
use crate::events::TuiEvent;
use crate::state::Command;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the event loop should do after a command was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn dispatch(
    api: &Arc<dyn CollectionApi>,
    command: Command,
    sender: &mpsc::Sender<TuiEvent>,
) -> Flow {
    match command {
        Command::Quit => return Flow::Quit,
        Command::Fetch(ticket) => {
            let api = Arc::clone(api);
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = api.list(ticket.kind, &ticket.query).await;
                let _ = sender
                    .send(TuiEvent::Fetched {
                        kind: ticket.kind,
                        generation: ticket.generation,
                        result,
                    })
                    .await;
            });
        }
        Command::Delete {
            kind,
            id,
            confirmation,
        } => {
            let api = Arc::clone(api);
            let sender = sender.clone();
            tokio::spawn(async move {
                if !confirmation.await {
                    tracing::debug!(resource = %kind, id, "Delete declined");
                    return;
                }
                let result = api.delete(kind, id).await;
                let _ = sender.send(TuiEvent::Deleted { kind, id, result }).await;
            });
        }
        Command::FetchReport(ticket) => {
            let api = Arc::clone(api);
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = api.report(ticket.kind).await;
                let _ = sender
                    .send(TuiEvent::ReportFetched {
                        kind: ticket.kind,
                        generation: ticket.generation,
                        result,
                    })
                    .await;
            });
        }
        Command::Update { kind, id, body } => {
            let api = Arc::clone(api);
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = api.update(kind, id, body).await;
                let _ = sender.send(TuiEvent::Updated { kind, id, result }).await;
            });
        }
    }
    Flow::Continue
}
