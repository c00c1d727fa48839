/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

use super::registry::Registry;
use super::{ClusterId, EndptId};

/// Iterator over the endpoints that are enabled and host a server instance
/// of a given cluster.
///
/// The cursor is an index into the registry's full endpoint sequence, with
/// the endpoint count captured at construction. Each index lookup walks the
/// sequence from the head, so a full traversal is O(n^2) in the endpoint
/// count; registries are small enough that this does not matter.
pub struct EnabledEndpointsWithServerCluster<'a, R> {
    registry: &'a R,
    cluster_id: ClusterId,
    index: usize,
    total: usize,
}

impl<'a, R> EnabledEndpointsWithServerCluster<'a, R>
where
    R: Registry,
{
    /// Create the iterator positioned at the first matching endpoint, or
    /// exhausted if there is none.
    pub fn new(registry: &'a R, cluster_id: ClusterId) -> Self {
        let mut this = Self {
            registry,
            cluster_id,
            index: 0,
            total: registry.endpoint_count(),
        };

        this.ensure_matching();

        this
    }

    /// The endpoint the cursor is positioned at, or `None` if exhausted.
    pub fn current(&self) -> Option<EndptId> {
        if self.is_exhausted() {
            None
        } else {
            self.endpoint_at(self.index)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.total
    }

    /// Skip forward until the cursor points at a matching endpoint or falls
    /// off the end.
    fn ensure_matching(&mut self) {
        while self.index < self.total {
            if let Some(endpoint_id) = self.endpoint_at(self.index) {
                if self.registry.endpoint_enabled(endpoint_id)
                    && self
                        .registry
                        .has_server_cluster(endpoint_id, self.cluster_id)
                {
                    break;
                }
            }

            self.index += 1;
        }
    }

    /// Sequential lookup from the list head; O(index).
    fn endpoint_at(&self, index: usize) -> Option<EndptId> {
        let mut endpoint_id = self.registry.first_endpoint()?;

        for _ in 0..index {
            endpoint_id = self.registry.next_endpoint(endpoint_id)?;
        }

        Some(endpoint_id)
    }
}

impl<R> Iterator for EnabledEndpointsWithServerCluster<'_, R>
where
    R: Registry,
{
    type Item = EndptId;

    fn next(&mut self) -> Option<Self::Item> {
        let endpoint_id = self.current()?;

        self.index += 1;
        self.ensure_matching();

        Some(endpoint_id)
    }
}

#[cfg(test)]
mod tests {
    use super::EnabledEndpointsWithServerCluster;
    use crate::dm::{Cluster, Endpoint, Node};

    /// Endpoint 0 with cluster 6 enabled, endpoint 1 with cluster 6
    /// disabled, endpoint 2 with clusters 6 and 8 enabled.
    fn node() -> Node {
        let mut node = Node::new();

        for id in 0..3u16 {
            let mut endpoint = Endpoint::new(id);
            endpoint.add_cluster(Cluster::new(6)).unwrap();
            if id == 2 {
                endpoint.add_cluster(Cluster::new(8)).unwrap();
            }
            node.add_endpoint(endpoint).unwrap();
        }

        node.enable_endpoint(1, false).unwrap();

        node
    }

    #[test]
    fn test_skips_disabled_and_non_matching() {
        let node = node();

        let found: heapless::Vec<_, 4> =
            EnabledEndpointsWithServerCluster::new(&node, 6).collect();
        assert_eq!(found.as_slice(), &[0, 2]);

        let found: heapless::Vec<_, 4> =
            EnabledEndpointsWithServerCluster::new(&node, 8).collect();
        assert_eq!(found.as_slice(), &[2]);
    }

    #[test]
    fn test_no_match_is_exhausted_at_construction() {
        let node = node();

        let iter = EnabledEndpointsWithServerCluster::new(&node, 99);
        assert!(iter.is_exhausted());
        assert_eq!(iter.current(), None);

        let empty = Node::new();
        let mut iter = EnabledEndpointsWithServerCluster::new(&empty, 6);
        assert!(iter.is_exhausted());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_current_tracks_position() {
        let node = node();

        let mut iter = EnabledEndpointsWithServerCluster::new(&node, 6);
        assert_eq!(iter.current(), Some(0));
        assert_eq!(iter.current(), Some(0));

        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.current(), Some(2));

        assert_eq!(iter.next(), Some(2));
        assert!(iter.is_exhausted());
        assert_eq!(iter.current(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_restartable() {
        let node = node();

        let first: heapless::Vec<_, 4> =
            EnabledEndpointsWithServerCluster::new(&node, 6).collect();
        let second: heapless::Vec<_, 4> =
            EnabledEndpointsWithServerCluster::new(&node, 6).collect();
        assert_eq!(first, second);
    }
}
