//! Live subscription handle.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A live row-insert subscription producing values of `T`.
///
/// Events arrive in server order via [`next`](Self::next). Teardown is
/// explicit: [`unsubscribe`](Self::unsubscribe) leaves the channel and
/// waits for the socket task to stop, so once it returns no further
/// event can be observed. Dropping the handle aborts the task as a last
/// resort, but graceful teardown should go through `unsubscribe`.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<T>,
        token: CancellationToken,
        task: JoinHandle<()>,
    ) -> Self {
        Self { rx, token, task }
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the underlying socket has closed and every
    /// already-delivered event has been consumed.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Tear the subscription down.
    ///
    /// Sends the leave frame, closes the socket, and waits for the
    /// reader task to finish. Consumes the handle: after this returns,
    /// no callback path remains through which an event could surface.
    pub async fn unsubscribe(mut self) {
        self.token.cancel();
        let _ = (&mut self.task).await;
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
