use std::fmt;

/// Token returned by [`Signal::connect`], used to disconnect a slot again.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SlotId(u64);

type Slot<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Synchronous, instance-owned signal.
///
/// Observers register on the owning instance; there is no global listener
/// registry. Slots run in connection order on the emitting thread.
pub struct Signal<T> {
    next_slot: u64,
    slots: Vec<(SlotId, Slot<T>)>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            next_slot: 0,
            slots: Vec::new(),
        }
    }

    pub fn connect(&mut self, slot: impl Fn(&T) + Send + Sync + 'static) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.slots.push((id, Box::new(slot)));
        id
    }

    pub fn disconnect(&mut self, id: SlotId) {
        self.slots.retain(|(slot_id, _)| *slot_id != id);
    }

    pub fn emit(&self, value: &T) {
        for (_, slot) in &self.slots {
            slot(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_reaches_connected_slots() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut signal = Signal::new();

        let slot_counter = Arc::clone(&counter);
        let id = signal.connect(move |delta: &usize| {
            slot_counter.fetch_add(*delta, Ordering::SeqCst);
        });

        signal.emit(&2);
        signal.emit(&3);
        assert_eq!(counter.load(Ordering::SeqCst), 5);

        signal.disconnect(id);
        signal.emit(&7);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert!(signal.is_empty());
    }

    #[test]
    fn disconnect_unknown_slot_is_harmless() {
        let mut signal: Signal<()> = Signal::new();
        let id = signal.connect(|_| {});
        signal.disconnect(id);
        signal.disconnect(id);
        signal.emit(&());
    }
}
