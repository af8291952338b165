use std::sync::{Arc, Mutex, PoisonError};

/// Single-slot, overwrite-on-publish handoff between a producer thread and the render loop.
///
/// The consumer never blocks on the producer: it reads whatever value was published last (or
/// nothing yet). Each publish bumps a generation counter so consumers can tell fresh values apart.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Slot<T>>,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<Arc<T>>,
    generation: u64,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                generation: 0,
            }),
        }
    }

    /// Replace the held value wholesale. Returns the new generation.
    pub fn publish(&self, value: T) -> u64 {
        self.publish_arc(Arc::new(value))
    }

    pub fn publish_arc(&self, value: Arc<T>) -> u64 {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.value = Some(value);
        slot.generation += 1;
        slot.generation
    }

    /// Latest published value, if any.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.latest_with_generation().map(|(v, _)| v)
    }

    pub fn latest_with_generation(&self) -> Option<(Arc<T>, u64)> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.value.clone().map(|v| (v, slot.generation))
    }

    pub fn generation(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}
