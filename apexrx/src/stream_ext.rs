use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extra combinators for any [`Stream`], mainly the state streams handed out by
/// [`StateStore::to_stream`](crate::StateStore::to_stream).
pub trait ApexStreamExt: Stream {
    /// Yields items until one satisfies `done`, yields that one, then ends.
    ///
    /// The matching item is part of the output, so a consumer sees the state
    /// that ended the wait. A stream that ends first just ends.
    ///
    /// ## Examples
    ///
    /// ```
    /// use apexrx::ApexStreamExt;
    /// use futures_signals::signal::SignalExt;
    ///
    /// async fn example() {
    ///     let _settled = futures_signals::signal::always(0)
    ///         .to_stream()
    ///         .take_through(|&value| value == 0);
    ///
    ///     // Yields the single `0`, then terminates.
    /// }
    /// ```
    fn take_through<F>(self, done: F) -> TakeThrough<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        TakeThrough {
            stream: self,
            done: Some(done),
        }
    }
}

impl<T: ?Sized> ApexStreamExt for T where T: Stream {}

/// Stream returned by [`ApexStreamExt::take_through`].
///
/// Wraps the inner stream and the predicate. The predicate is dropped after the
/// first match, and from then on the stream reports its end.
#[pin_project]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct TakeThrough<St, F> {
    #[pin]
    stream: St,
    // Dropped once the stream has finished.
    done: Option<F>,
}

impl<St, F> Stream for TakeThrough<St, F>
where
    St: Stream,
    F: FnMut(&St::Item) -> bool,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let Some(done) = this.done.as_mut() else {
            return Poll::Ready(None);
        };
        match this.stream.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                if done(&item) {
                    *this.done = None;
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                *this.done = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
