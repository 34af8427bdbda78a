use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
	Parent,
	Deadline,
	Cancel,
}

impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parent => write!(f, "Parent"),
			Self::Deadline => write!(f, "Deadline"),
			Self::Cancel => write!(f, "Cancel"),
		}
	}
}

struct Inner {
	// Dropped together with the last clone of the context, which is what
	// `Handler::cancel` waits on.
	_alive: oneshot::Sender<()>,
	deadline: Option<Instant>,
	parent: Option<Context>,
	cancel: broadcast::Receiver<()>,
}

impl Inner {
	fn done(&self) -> Pin<Box<dyn Future<Output = CancelReason> + Send + '_>> {
		let mut cancel = self.cancel.resubscribe();

		Box::pin(async move {
			let parent = async {
				match &self.parent {
					Some(parent) => {
						parent.done().await;
					}
					None => std::future::pending::<()>().await,
				}
			};

			let deadline = async {
				match self.deadline {
					Some(deadline) => tokio::time::sleep_until(deadline).await,
					None => std::future::pending::<()>().await,
				}
			};

			tokio::select! {
				_ = parent => CancelReason::Parent,
				_ = deadline => CancelReason::Deadline,
				_ = cancel.recv() => CancelReason::Cancel,
			}
		})
	}
}

/// The owning side of a [`Context`].
///
/// Dropping or cancelling the handler cancels every clone of the context.
/// [`Handler::cancel`] then waits until all of those clones are dropped.
pub struct Handler {
	alive: oneshot::Receiver<()>,
	cancel: broadcast::Sender<()>,
}

impl Handler {
	/// Waits for every clone of the context to be dropped without cancelling.
	pub async fn done(&mut self) {
		let _ = (&mut self.alive).await;
	}

	pub async fn cancel(self) {
		drop(self.cancel);

		let _ = self.alive.await;
	}
}

#[derive(Clone)]
pub struct Context(Arc<Inner>);

impl Context {
	fn build(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (alive_tx, alive_rx) = oneshot::channel();
		let (cancel_tx, cancel_rx) = broadcast::channel(1);

		(
			Self(Arc::new(Inner {
				_alive: alive_tx,
				deadline,
				parent,
				cancel: cancel_rx,
			})),
			Handler {
				alive: alive_rx,
				cancel: cancel_tx,
			},
		)
	}

	#[must_use]
	pub fn new() -> (Self, Handler) {
		Self::build(None, None)
	}

	#[must_use]
	pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
		Self::build(None, Some(deadline))
	}

	#[must_use]
	pub fn with_timeout(timeout: std::time::Duration) -> (Self, Handler) {
		Self::with_deadline(Instant::now() + timeout)
	}

	#[must_use]
	pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
		Self::build(Some(parent), deadline)
	}

	pub async fn done(&self) -> CancelReason {
		self.0.done().await
	}
}
