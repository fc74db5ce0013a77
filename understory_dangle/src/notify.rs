// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification: observer lists for value and step changes.
//!
//! Notifications are derived from a [`Change`] and are therefore
//! de-duplicated by construction: a subscriber only hears about a quantity
//! that strictly changed, and value subscribers always run before step
//! subscribers for the same update.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::mapping::Change;

/// Payload delivered to value-changed subscribers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ValueChanged {
    /// The new normalized value (step units).
    pub normalized: f64,
    /// The new value scaled by the configured stretch.
    pub value: f64,
}

/// Payload delivered to step-changed subscribers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepChanged {
    /// Step before the update.
    pub previous: i32,
    /// Step after the update.
    pub step: i32,
}

/// Identifies one subscriber within a [`Notifier`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback<T> = Box<dyn FnMut(T)>;

/// A list of callbacks invoked in subscription order.
pub struct Notifier<T> {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Callback<T>)>,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Copy> Notifier<T> {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `callback` and returns the id needed to remove it again.
    pub fn subscribe(&mut self, callback: impl FnMut(T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Invokes every current subscriber with `payload`.
    pub fn notify(&mut self, payload: T) {
        for (_, callback) in &mut self.subscribers {
            callback(payload);
        }
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drops every subscriber.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

/// Which notifier a [`Subscription`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Value-changed notifications.
    Value,
    /// Step-changed notifications.
    Step,
}

/// Handle returned when subscribing to an engine; pass it back to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: Topic,
    id: SubscriberId,
}

impl Subscription {
    /// The notifier this subscription belongs to.
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

/// The pair of notifiers an engine owns.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    value: Notifier<ValueChanged>,
    step: Notifier<StepChanged>,
}

impl ChangeNotifier {
    /// Creates a notifier pair with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to value changes.
    pub fn subscribe_value(&mut self, callback: impl FnMut(ValueChanged) + 'static) -> Subscription {
        Subscription {
            topic: Topic::Value,
            id: self.value.subscribe(callback),
        }
    }

    /// Subscribes to step changes.
    pub fn subscribe_step(&mut self, callback: impl FnMut(StepChanged) + 'static) -> Subscription {
        Subscription {
            topic: Topic::Step,
            id: self.step.subscribe(callback),
        }
    }

    /// Removes a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        match subscription.topic {
            Topic::Value => self.value.unsubscribe(subscription.id),
            Topic::Step => self.step.unsubscribe(subscription.id),
        }
    }

    /// Dispatches `change`: value subscribers first, then step subscribers.
    ///
    /// `stretch` scales the value for [`ValueChanged::value`].
    pub fn emit(&mut self, change: Change, stretch: f64) {
        if let Some(normalized) = change.value {
            self.value.notify(ValueChanged {
                normalized,
                value: normalized * stretch,
            });
        }
        if let Some((previous, step)) = change.step {
            self.step.notify(StepChanged { previous, step });
        }
    }

    /// Drops every subscriber on both topics.
    pub fn clear(&mut self) {
        self.value.clear();
        self.step.clear();
    }
}
