use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use super::{MetadataTicket, UploadTicket, UploadToken};
use crate::backend::{Backend, BackendError, InputMetadata, UploadAccepted};

/// Backend work requested by a session.
#[derive(Debug, Clone)]
pub enum SessionJob {
    Upload(UploadTicket),
    Metadata(MetadataTicket),
}

/// Result of a [`SessionJob`], tagged so stale replies can be recognised.
#[derive(Debug)]
pub enum SessionMessage {
    Uploaded {
        token: UploadToken,
        result: Result<UploadAccepted, BackendError>,
    },
    MetadataLoaded {
        ticket: MetadataTicket,
        result: Result<InputMetadata, BackendError>,
    },
}

/// Runs backend calls off the caller's thread, one thread per job.
///
/// Replies arrive in completion order, not submission order.
pub struct BackendWorker {
    backend: Arc<dyn Backend>,
    message_tx: Sender<SessionMessage>,
    message_rx: Receiver<SessionMessage>,
    in_flight: usize,
}

impl BackendWorker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            backend,
            message_tx,
            message_rx,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, job: SessionJob) {
        self.in_flight += 1;
        let backend = Arc::clone(&self.backend);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let message = run_job(backend.as_ref(), job);
            let _ = tx.send(message);
        });
    }

    pub fn try_recv(&mut self) -> Option<SessionMessage> {
        match self.message_rx.try_recv() {
            Ok(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(message)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until a reply arrives or `timeout` elapses.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<SessionMessage> {
        match self.message_rx.recv_timeout(timeout) {
            Ok(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(message)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Jobs submitted whose replies have not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }
}

fn run_job(backend: &dyn Backend, job: SessionJob) -> SessionMessage {
    match job {
        SessionJob::Upload(ticket) => SessionMessage::Uploaded {
            token: ticket.token,
            result: backend.upload(&ticket.file.name, &ticket.file.contents),
        },
        SessionJob::Metadata(ticket) => SessionMessage::MetadataLoaded {
            result: backend.fetch_metadata(&ticket.input, ticket.cache_bust),
            ticket,
        },
    }
}
