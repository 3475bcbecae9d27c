use crossbeam::channel::{bounded, unbounded, Receiver, Sender};

/// The provider's wake channel. Clients post here when they seat into an
/// empty waiting area; the provider blocks on the receive side while idle.
/// Unbounded so a wake posted mid-episode is kept, not lost.
pub fn wake_channel() -> (Sender<()>, Receiver<()>) {
    unbounded()
}

/// One-shot signal for a single seating episode. The send half lives in the
/// waiting-area entry, the receive half goes back to the seated client, and
/// each is used exactly once.
pub fn one_shot() -> (Sender<()>, Receiver<()>) {
    bounded(1)
}
