use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Buf, Bytes, BytesMut};
use either::Either::{self, Left, Right};
use futures::{Stream, StreamExt};
use ufotofu::{BufferedProducer, BulkProducer, Producer};

/// What the reading half of a [`GrowingBytes`] is currently doing.
#[derive(Debug)]
enum ReadState {
    /// No read is pending.
    Idle,
    /// A read is suspended until the buffer holds at least this many bytes.
    AwaitingLength(usize, Waker),
}

#[derive(Debug)]
struct Shared {
    /// The oldest unpruned bytes, as handed out to readers.
    frozen: Bytes,
    /// Bytes pushed since the last time a reader looked at the buffer. They logically follow `frozen`.
    incoming: BytesMut,
    state: ReadState,
    /// Set once the [`BytesFeeder`] is gone, no more bytes will arrive.
    closed: bool,
}

impl Shared {
    fn len(&self) -> usize {
        self.frozen.len() + self.incoming.len()
    }

    /// Returns all unpruned bytes, moving the incoming bytes behind the frozen ones first.
    ///
    /// Only copies when both parts are non-empty, and then only the unpruned frozen bytes.
    fn view(&mut self) -> Bytes {
        if !self.incoming.is_empty() {
            let incoming = self.incoming.split().freeze();

            self.frozen = if self.frozen.is_empty() {
                incoming
            } else {
                let mut joined = BytesMut::with_capacity(self.frozen.len() + incoming.len());
                joined.extend_from_slice(&self.frozen);
                joined.extend_from_slice(&incoming);
                joined.freeze()
            };
        }

        self.frozen.clone()
    }

    fn prune(&mut self, length: usize) {
        let from_frozen = length.min(self.frozen.len());
        self.frozen.advance(from_frozen);

        let from_incoming = (length - from_frozen).min(self.incoming.len());
        self.incoming.advance(from_incoming);
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The critical sections never panic while the data is inconsistent.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A bytestring which grows as bytes are pushed into it from an asynchronous source, and which lets a single consumer suspend until enough bytes have arrived.
///
/// Create one with [`GrowingBytes::new`], which also returns the [`BytesFeeder`] for pushing bytes. At most one read can be outstanding at any time, which the `&mut self` receivers of the reading methods enforce. Dropping a pending read cancels it and leaves the buffer untouched, so a fresh read can start at the same position.
///
/// [`GrowingBytes`] is a [`BulkProducer`] of bytes whose final value is emitted once the feeder is gone and every byte has been produced, so all decoders of this crate can read from it directly.
#[derive(Debug)]
pub struct GrowingBytes {
    shared: Arc<Mutex<Shared>>,
    /// The bytes most recently exposed through [`BulkProducer::expose_items`].
    exposed: Bytes,
}

/// The pushing half of a [`GrowingBytes`].
///
/// Dropping the feeder signals that no more bytes will arrive; reads that can then never be satisfied resolve to `None`.
#[derive(Debug)]
pub struct BytesFeeder {
    shared: Arc<Mutex<Shared>>,
}

impl GrowingBytes {
    /// Creates an empty [`GrowingBytes`] together with the [`BytesFeeder`] that fills it.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (BytesFeeder, GrowingBytes) {
        let shared = Arc::new(Mutex::new(Shared {
            frozen: Bytes::new(),
            incoming: BytesMut::new(),
            state: ReadState::Idle,
            closed: false,
        }));

        (
            BytesFeeder {
                shared: shared.clone(),
            },
            GrowingBytes {
                shared,
                exposed: Bytes::new(),
            },
        )
    }

    /// Returns all received bytes that have not been pruned.
    pub fn array(&self) -> Bytes {
        lock(&self.shared).view()
    }

    /// Returns the number of received bytes that have not been pruned.
    pub fn len(&self) -> usize {
        lock(&self.shared).len()
    }

    /// Returns whether there are no unpruned bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until the accumulated bytestring has grown to at least `length` bytes, then resolves to it.
    ///
    /// Resolves to `None` if the feeder is dropped before that many bytes arrived.
    pub fn next_absolute(&mut self, length: usize) -> NextAbsolute<'_> {
        NextAbsolute {
            reader: self,
            target: length,
        }
    }

    /// Waits until the accumulated bytestring has grown by `length` bytes beyond its current size, then resolves to it.
    pub fn next_relative(&mut self, length: usize) -> NextAbsolute<'_> {
        let target = self.len() + length;
        self.next_absolute(target)
    }

    /// Discards the first `length` bytes, or all bytes if fewer are available.
    pub fn prune(&mut self, length: usize) {
        lock(&self.shared).prune(length);
    }
}

impl BytesFeeder {
    /// Appends a chunk of bytes, waking a pending read if it is now satisfied.
    pub fn push(&self, chunk: impl AsRef<[u8]>) {
        let waker = {
            let mut guard = lock(&self.shared);
            let shared = &mut *guard;

            shared.incoming.extend_from_slice(chunk.as_ref());

            let available = shared.len();
            let satisfied = matches!(
                &shared.state,
                ReadState::AwaitingLength(target, _) if available >= *target
            );

            if satisfied {
                tracing::trace!(available, "pending read satisfied");

                match core::mem::replace(&mut shared.state, ReadState::Idle) {
                    ReadState::AwaitingLength(_, waker) => Some(waker),
                    ReadState::Idle => None,
                }
            } else {
                None
            }
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Signals that no more bytes will arrive. Equivalent to dropping the feeder.
    pub fn close(self) {}
}

impl Drop for BytesFeeder {
    fn drop(&mut self) {
        let waker = {
            let mut shared = lock(&self.shared);
            shared.closed = true;

            match core::mem::replace(&mut shared.state, ReadState::Idle) {
                ReadState::AwaitingLength(_, waker) => Some(waker),
                ReadState::Idle => None,
            }
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Future returned by [`GrowingBytes::next_absolute`] and [`GrowingBytes::next_relative`].
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct NextAbsolute<'a> {
    reader: &'a mut GrowingBytes,
    target: usize,
}

impl Future for NextAbsolute<'_> {
    type Output = Option<Bytes>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let target = self.target;
        let mut guard = lock(&self.reader.shared);
        let shared = &mut *guard;

        if shared.len() >= target {
            shared.state = ReadState::Idle;
            return Poll::Ready(Some(shared.view()));
        }

        if shared.closed {
            shared.state = ReadState::Idle;
            tracing::trace!(
                target,
                available = shared.len(),
                "byte source ended before pending read was satisfied"
            );
            return Poll::Ready(None);
        }

        match &mut shared.state {
            ReadState::AwaitingLength(length, waker) if *length == target => {
                waker.clone_from(cx.waker());
            }
            state => {
                tracing::trace!(target, "suspending until enough bytes arrive");
                *state = ReadState::AwaitingLength(target, cx.waker().clone());
            }
        }

        Poll::Pending
    }
}

impl Drop for NextAbsolute<'_> {
    fn drop(&mut self) {
        let mut guard = lock(&self.reader.shared);

        if let ReadState::AwaitingLength(target, _) = guard.state {
            tracing::trace!(target, "pending read abandoned");
            guard.state = ReadState::Idle;
        }
    }
}

impl Producer for GrowingBytes {
    type Item = u8;

    type Final = ();

    type Error = Infallible;

    /// Waits for the next byte and prunes it.
    async fn produce(&mut self) -> Result<Either<Self::Item, Self::Final>, Self::Error> {
        match self.next_absolute(1).await {
            Some(available) => {
                self.prune(1);
                Ok(Left(available[0]))
            }
            None => Ok(Right(())),
        }
    }
}

impl BufferedProducer for GrowingBytes {
    async fn slurp(&mut self) -> Result<(), Self::Error> {
        // Pushed bytes are buffered already.
        Ok(())
    }
}

impl BulkProducer for GrowingBytes {
    /// Waits until at least one byte is available, then exposes every unpruned byte.
    async fn expose_items<'a>(
        &'a mut self,
    ) -> Result<Either<&'a [Self::Item], Self::Final>, Self::Error>
    where
        Self::Item: 'a,
    {
        match self.next_absolute(1).await {
            Some(available) => {
                self.exposed = available;
                Ok(Left(&self.exposed[..]))
            }
            None => Ok(Right(())),
        }
    }

    /// Prunes the given number of exposed bytes.
    async fn consider_produced(&mut self, amount: usize) -> Result<(), Self::Error> {
        self.exposed = Bytes::new();
        self.prune(amount);
        Ok(())
    }
}

/// Pushes every chunk of `stream` into `feeder`, then closes it.
///
/// Drive this future concurrently with the decoding that reads from the matching [`GrowingBytes`], e.g. via [`futures::join!`].
pub async fn feed_from_stream<S>(feeder: BytesFeeder, stream: S)
where
    S: Stream<Item = Bytes>,
{
    let mut stream = core::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        feeder.push(chunk);
    }
}
