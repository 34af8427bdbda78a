use tokio::signal::unix::{Signal, SignalKind};
use tokio::sync::mpsc;

/// Fans several unix signals into a single receiver.
pub struct SignalHandler {
	send: mpsc::Sender<SignalKind>,
	recv: mpsc::Receiver<SignalKind>,
}

impl Default for SignalHandler {
	fn default() -> Self {
		let (send, recv) = mpsc::channel(1);
		Self { send, recv }
	}
}

impl SignalHandler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_signal(self, kind: SignalKind) -> Self {
		let signal = tokio::signal::unix::signal(kind).expect("failed to create signal");
		tokio::spawn(forward(signal, kind, self.send.clone()));
		self
	}

	pub async fn recv(&mut self) -> SignalKind {
		// `self.send` is never dropped while `self` is alive
		self.recv.recv().await.expect("signal channel closed")
	}
}

async fn forward(mut signal: Signal, kind: SignalKind, send: mpsc::Sender<SignalKind>) {
	while signal.recv().await.is_some() {
		if send.send(kind).await.is_err() {
			break;
		}
	}
}
