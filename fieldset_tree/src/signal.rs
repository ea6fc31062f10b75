// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit parent/child notification channels.
//!
//! A group subscribes to each child when the child registers and holds on to the
//! returned [`SubscriptionId`] until the child leaves. Delivery is synchronous and
//! in emission order; see `Form::emit`.

use crate::types::NodeId;

bitflags::bitflags! {
    /// Notification topics a node can emit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Topics: u8 {
        /// The node finished a validation run.
        const VALIDATE_PERFORMED = 0b01;
        /// The node's `dirty` flag changed.
        const DIRTY_CHANGED      = 0b10;
    }
}

/// Handle returned by a subscription; needed to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

#[derive(Clone, Debug)]
struct Subscription {
    id: SubscriptionId,
    subscriber: NodeId,
    topics: Topics,
}

/// The subscribers of one node.
#[derive(Clone, Debug, Default)]
pub(crate) struct Subscribers {
    next: u32,
    list: Vec<Subscription>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, subscriber: NodeId, topics: Topics) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next = self.next.wrapping_add(1);
        self.list.push(Subscription {
            id,
            subscriber,
            topics,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.list.len();
        self.list.retain(|s| s.id != id);
        self.list.len() != before
    }

    /// Subscribers of `topic`, in subscription order.
    pub(crate) fn for_topic(&self, topic: Topics) -> Vec<NodeId> {
        self.list
            .iter()
            .filter(|s| s.topics.intersects(topic))
            .map(|s| s.subscriber)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_filter_delivery() {
        let mut s = Subscribers::default();
        let a = NodeId::new(1, 1);
        let b = NodeId::new(2, 1);
        let sa = s.subscribe(a, Topics::all());
        let _sb = s.subscribe(b, Topics::DIRTY_CHANGED);
        assert_eq!(s.for_topic(Topics::DIRTY_CHANGED), [a, b]);
        assert_eq!(s.for_topic(Topics::VALIDATE_PERFORMED), [a]);

        assert!(s.unsubscribe(sa));
        assert!(!s.unsubscribe(sa));
        assert_eq!(s.len(), 1);
        assert!(s.for_topic(Topics::VALIDATE_PERFORMED).is_empty());
    }
}
