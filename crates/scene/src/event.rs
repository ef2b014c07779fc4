/// Listener list raised synchronously, in subscription order.
pub struct Event<T> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&T) + Send>)>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl<T> Event<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn raise(&mut self, payload: &T) {
        for (_, listener) in &mut self.listeners {
            listener(payload);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Event;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn raises_listeners_in_order_until_removed() {
        let mut event: Event<u32> = Event::new();
        let seen = Arc::new(AtomicU32::new(0));

        let s = seen.clone();
        let id = event.add_listener(move |v| {
            s.fetch_add(*v, Ordering::SeqCst);
        });

        event.raise(&3);
        event.raise(&4);
        assert_eq!(seen.load(Ordering::SeqCst), 7);

        assert!(event.remove_listener(id));
        assert!(!event.remove_listener(id));
        event.raise(&100);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(event.listener_count(), 0);
    }
}
