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

//! In-memory node storage: endpoints hosting server clusters hosting
//! attributes, with each attribute persisted in its wire encoding.

use crate::error::{Error, ErrorCode};

use super::metadata::{AttributeBounds, AttributeFlags, AttributeMetadata};
use super::registry::Registry;
use super::value::AttrValue;
use super::{AttrId, ClusterId, EndptId};

pub const MAX_ENDPOINTS: usize = 8;
pub const MAX_CLUSTERS_PER_ENDPOINT: usize = 8;
pub const MAX_ATTRS_PER_CLUSTER: usize = 16;

/// Per-attribute value storage capacity, in encoded bytes.
pub const MAX_ATTRIBUTE_SIZE: usize = 64;

/// One attribute instance: static metadata plus the current value in its
/// wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: AttrId,
    metadata: AttributeMetadata,
    storage: heapless::Vec<u8, MAX_ATTRIBUTE_SIZE>,
}

impl Attribute {
    /// Create an attribute initialized to `value`, deriving wire type, size
    /// and default from it.
    ///
    /// The nullable flag is implied by the value's kind; `flags` carries the
    /// rest of the mask.
    pub fn new(id: AttrId, value: AttrValue<'static>, flags: AttributeFlags) -> Result<Self, Error> {
        let mut this = Self {
            id,
            metadata: AttributeMetadata::for_value(&value, flags),
            storage: heapless::Vec::new(),
        };

        this.store(&value)?;

        Ok(this)
    }

    /// Attach an inclusive min/max range, setting the min-max flag.
    pub fn with_bounds(mut self, min: AttrValue<'static>, max: AttrValue<'static>) -> Self {
        self.metadata.flags |= AttributeFlags::MIN_MAX;
        self.metadata.bounds = Some(AttributeBounds { min, max });
        self
    }

    pub fn metadata(&self) -> &AttributeMetadata {
        &self.metadata
    }

    /// Decode the currently stored value.
    pub fn value(&self) -> Result<AttrValue<'_>, Error> {
        AttrValue::from_buffer(
            self.metadata.wire_type,
            self.metadata.is_nullable(),
            &self.storage,
        )
    }

    /// Replace the stored value.
    ///
    /// The incoming value must be of the attribute's own kind; kind or
    /// nullability mismatches are rejected without touching storage.
    pub fn set_value(&mut self, value: &AttrValue) -> Result<(), Error> {
        if value.wire_type() != self.metadata.wire_type {
            Err(ErrorCode::InvalidDataType)?;
        }

        // String kinds carry nullability in the payload, not in the kind
        if !value.wire_type().is_string() && value.is_nullable_kind() != self.metadata.is_nullable()
        {
            Err(ErrorCode::InvalidDataType)?;
        }

        self.store(value)
    }

    fn store(&mut self, value: &AttrValue) -> Result<(), Error> {
        let mut scratch = [0; MAX_ATTRIBUTE_SIZE];
        let len = value.to_buffer(&mut scratch)?;

        self.storage.clear();
        self.storage
            .extend_from_slice(&scratch[..len])
            .map_err(|_| ErrorCode::NoSpace)?;

        Ok(())
    }
}

/// A server cluster instance and its attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    attributes: heapless::Vec<Attribute, MAX_ATTRS_PER_CLUSTER>,
}

impl Cluster {
    pub const fn new(id: ClusterId) -> Self {
        Self {
            id,
            attributes: heapless::Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<(), Error> {
        if self.attribute(attribute.id).is_some() {
            Err(ErrorCode::InvalidArgument)?;
        }

        self.attributes
            .push(attribute)
            .map_err(|_| ErrorCode::NoSpace)?;

        Ok(())
    }

    pub fn attribute(&self, attr_id: AttrId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == attr_id)
    }

    pub fn attribute_mut(&mut self, attr_id: AttrId) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.id == attr_id)
    }
}

/// An endpoint and its cluster table. Endpoints start out enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub id: EndptId,
    pub enabled: bool,
    clusters: heapless::Vec<Cluster, MAX_CLUSTERS_PER_ENDPOINT>,
}

impl Endpoint {
    pub const fn new(id: EndptId) -> Self {
        Self {
            id,
            enabled: true,
            clusters: heapless::Vec::new(),
        }
    }

    pub fn add_cluster(&mut self, cluster: Cluster) -> Result<(), Error> {
        if self.cluster(cluster.id).is_some() {
            Err(ErrorCode::InvalidArgument)?;
        }

        self.clusters.push(cluster).map_err(|_| ErrorCode::NoSpace)?;

        Ok(())
    }

    pub fn cluster(&self, cluster_id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    pub fn cluster_mut(&mut self, cluster_id: ClusterId) -> Option<&mut Cluster> {
        self.clusters.iter_mut().find(|c| c.id == cluster_id)
    }
}

/// The root of the data model tree. Endpoints keep their registration
/// order, which defines the iteration order of the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    endpoints: heapless::Vec<Endpoint, MAX_ENDPOINTS>,
}

impl Node {
    pub const fn new() -> Self {
        Self {
            endpoints: heapless::Vec::new(),
        }
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> Result<(), Error> {
        if self.endpoint(endpoint.id).is_some() {
            Err(ErrorCode::InvalidArgument)?;
        }

        self.endpoints
            .push(endpoint)
            .map_err(|_| ErrorCode::NoSpace)?;

        Ok(())
    }

    pub fn endpoint(&self, endpoint_id: EndptId) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == endpoint_id)
    }

    pub fn endpoint_mut(&mut self, endpoint_id: EndptId) -> Option<&mut Endpoint> {
        self.endpoints.iter_mut().find(|e| e.id == endpoint_id)
    }

    /// Unregister an endpoint, preserving the order of the remaining ones.
    pub fn remove_endpoint(&mut self, endpoint_id: EndptId) -> Result<Endpoint, Error> {
        let index = self
            .endpoints
            .iter()
            .position(|e| e.id == endpoint_id)
            .ok_or(ErrorCode::EndpointNotFound)?;

        Ok(self.endpoints.remove(index))
    }

    pub fn enable_endpoint(&mut self, endpoint_id: EndptId, enabled: bool) -> Result<(), Error> {
        let endpoint = self
            .endpoint_mut(endpoint_id)
            .ok_or(ErrorCode::EndpointNotFound)?;

        endpoint.enabled = enabled;

        Ok(())
    }

    fn resolve(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Result<&Attribute, Error> {
        let endpoint = self
            .endpoint(endpoint_id)
            .ok_or(ErrorCode::EndpointNotFound)?;
        let cluster = endpoint
            .cluster(cluster_id)
            .ok_or(ErrorCode::ClusterNotFound)?;

        cluster
            .attribute(attr_id)
            .ok_or_else(|| ErrorCode::AttributeNotFound.into())
    }
}

impl Registry for Node {
    fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    fn first_endpoint(&self) -> Option<EndptId> {
        self.endpoints.first().map(|e| e.id)
    }

    fn next_endpoint(&self, endpoint_id: EndptId) -> Option<EndptId> {
        let index = self.endpoints.iter().position(|e| e.id == endpoint_id)?;

        self.endpoints.get(index + 1).map(|e| e.id)
    }

    fn endpoint_enabled(&self, endpoint_id: EndptId) -> bool {
        self.endpoint(endpoint_id).map(|e| e.enabled).unwrap_or(false)
    }

    fn has_server_cluster(&self, endpoint_id: EndptId, cluster_id: ClusterId) -> bool {
        self.endpoint(endpoint_id)
            .and_then(|e| e.cluster(cluster_id))
            .is_some()
    }

    fn attribute(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Option<AttributeMetadata> {
        self.resolve(endpoint_id, cluster_id, attr_id)
            .ok()
            .map(|a| a.metadata().clone())
    }

    fn attr_value(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Result<AttrValue<'_>, Error> {
        self.resolve(endpoint_id, cluster_id, attr_id)?.value()
    }

    fn set_attr_value(
        &mut self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
        value: &AttrValue,
    ) -> Result<(), Error> {
        let endpoint = self
            .endpoint_mut(endpoint_id)
            .ok_or(ErrorCode::EndpointNotFound)?;
        let cluster = endpoint
            .cluster_mut(cluster_id)
            .ok_or(ErrorCode::ClusterNotFound)?;
        let attribute = cluster
            .attribute_mut(attr_id)
            .ok_or(ErrorCode::AttributeNotFound)?;

        attribute.set_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, Cluster, Endpoint, Node};
    use crate::dm::{AttrValue, AttributeFlags, Nullable, Registry, WireType};
    use crate::error::ErrorCode;

    fn node() -> Node {
        let mut cluster = Cluster::new(6);
        cluster
            .add_attribute(
                Attribute::new(0, AttrValue::Bool(false), AttributeFlags::WRITABLE).unwrap(),
            )
            .unwrap();
        cluster
            .add_attribute(
                Attribute::new(
                    0x4001,
                    AttrValue::NullableUint8(Nullable::NonNull(254)),
                    AttributeFlags::WRITABLE | AttributeFlags::NONVOLATILE,
                )
                .unwrap(),
            )
            .unwrap();

        let mut endpoint = Endpoint::new(1);
        endpoint.add_cluster(cluster).unwrap();

        let mut node = Node::new();
        node.add_endpoint(endpoint).unwrap();

        node
    }

    #[test]
    fn test_lookup() {
        let node = node();

        assert_eq!(node.endpoint_count(), 1);
        assert_eq!(node.first_endpoint(), Some(1));
        assert_eq!(node.next_endpoint(1), None);
        assert!(node.endpoint_enabled(1));
        assert!(!node.endpoint_enabled(2));
        assert!(node.has_server_cluster(1, 6));
        assert!(!node.has_server_cluster(1, 8));

        let meta = node.attribute(1, 6, 0).unwrap();
        assert_eq!(meta.wire_type, WireType::Boolean);
        assert!(meta.is_writable());
        assert!(!meta.is_nullable());

        let meta = node.attribute(1, 6, 0x4001).unwrap();
        assert!(meta.is_nullable());
        assert!(meta.is_nonvolatile());

        assert!(node.attribute(1, 6, 0x4002).is_none());
    }

    #[test]
    fn test_value_roundtrip() {
        let mut node = node();

        assert_eq!(node.attr_value(1, 6, 0), Ok(AttrValue::Bool(false)));

        node.set_attr_value(1, 6, 0, &AttrValue::Bool(true)).unwrap();
        assert_eq!(node.attr_value(1, 6, 0), Ok(AttrValue::Bool(true)));

        node.set_attr_value(1, 6, 0x4001, &AttrValue::NullableUint8(Nullable::Null))
            .unwrap();
        assert_eq!(
            node.attr_value(1, 6, 0x4001),
            Ok(AttrValue::NullableUint8(Nullable::Null))
        );
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut node = node();

        assert_eq!(
            node.set_attr_value(1, 6, 0, &AttrValue::Uint8(1))
                .map_err(|e| e.code()),
            Err(ErrorCode::InvalidDataType)
        );

        // Nullability is part of the kind
        assert_eq!(
            node.set_attr_value(1, 6, 0x4001, &AttrValue::Uint8(1))
                .map_err(|e| e.code()),
            Err(ErrorCode::InvalidDataType)
        );
    }

    #[test]
    fn test_resolution_errors_in_order() {
        let mut node = node();

        assert_eq!(
            node.attr_value(2, 6, 0).map_err(|e| e.code()),
            Err(ErrorCode::EndpointNotFound)
        );
        assert_eq!(
            node.attr_value(1, 7, 0).map_err(|e| e.code()),
            Err(ErrorCode::ClusterNotFound)
        );
        assert_eq!(
            node.attr_value(1, 6, 99).map_err(|e| e.code()),
            Err(ErrorCode::AttributeNotFound)
        );
        assert_eq!(
            node.set_attr_value(2, 6, 0, &AttrValue::Bool(true))
                .map_err(|e| e.code()),
            Err(ErrorCode::EndpointNotFound)
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut node = node();

        assert_eq!(
            node.add_endpoint(Endpoint::new(1)).map_err(|e| e.code()),
            Err(ErrorCode::InvalidArgument)
        );

        let endpoint = node.endpoint_mut(1).unwrap();
        assert_eq!(
            endpoint.add_cluster(Cluster::new(6)).map_err(|e| e.code()),
            Err(ErrorCode::InvalidArgument)
        );

        let cluster = endpoint.cluster_mut(6).unwrap();
        assert_eq!(
            cluster
                .add_attribute(
                    Attribute::new(0, AttrValue::Bool(false), AttributeFlags::empty()).unwrap()
                )
                .map_err(|e| e.code()),
            Err(ErrorCode::InvalidArgument)
        );
    }

    #[test]
    fn test_enable_endpoint() {
        let mut node = node();

        node.enable_endpoint(1, false).unwrap();
        assert!(!node.endpoint_enabled(1));

        node.enable_endpoint(1, true).unwrap();
        assert!(node.endpoint_enabled(1));

        assert_eq!(
            node.enable_endpoint(9, false).map_err(|e| e.code()),
            Err(ErrorCode::EndpointNotFound)
        );
    }

    #[test]
    fn test_remove_endpoint() {
        let mut node = node();

        let removed = node.remove_endpoint(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(node.endpoint_count(), 0);
        assert_eq!(
            node.remove_endpoint(1).map_err(|e| e.code()),
            Err(ErrorCode::EndpointNotFound)
        );
    }

    #[test]
    fn test_string_attribute_storage() {
        let mut node = node();

        let cluster = node.endpoint_mut(1).unwrap().cluster_mut(6).unwrap();
        cluster
            .add_attribute(
                Attribute::new(
                    0x4002,
                    AttrValue::CharStr(Nullable::NonNull("init")),
                    AttributeFlags::WRITABLE,
                )
                .unwrap(),
            )
            .unwrap();

        assert_eq!(
            node.attr_value(1, 6, 0x4002),
            Ok(AttrValue::CharStr(Nullable::NonNull("init")))
        );

        // Stored length tracks the value, shrinking included
        node.set_attr_value(1, 6, 0x4002, &AttrValue::CharStr(Nullable::NonNull("x")))
            .unwrap();
        assert_eq!(
            node.attr_value(1, 6, 0x4002),
            Ok(AttrValue::CharStr(Nullable::NonNull("x")))
        );
    }
}
