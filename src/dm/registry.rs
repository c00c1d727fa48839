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

use crate::error::Error;

use super::metadata::AttributeMetadata;
use super::value::AttrValue;
use super::{AttrId, ClusterId, EndptId};

/// The data model surface the attribute shim resolves against.
///
/// Implemented by concrete node storage ([`Node`](super::Node)) and by
/// anything else that can answer endpoint/cluster/attribute queries, such as
/// bridged or externally-stored data models.
pub trait Registry {
    /// Number of endpoints currently registered, enabled or not.
    fn endpoint_count(&self) -> usize;

    /// The ID of the first registered endpoint, if any.
    fn first_endpoint(&self) -> Option<EndptId>;

    /// The ID of the endpoint registered after `endpoint_id`, if any.
    fn next_endpoint(&self, endpoint_id: EndptId) -> Option<EndptId>;

    /// Whether `endpoint_id` is registered and enabled.
    fn endpoint_enabled(&self, endpoint_id: EndptId) -> bool;

    /// Whether `endpoint_id` hosts a server instance of `cluster_id`.
    fn has_server_cluster(&self, endpoint_id: EndptId, cluster_id: ClusterId) -> bool;

    /// Resolve the static metadata of one attribute.
    fn attribute(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Option<AttributeMetadata>;

    /// Fetch the current value of one attribute.
    ///
    /// The returned value may borrow from the registry's storage.
    fn attr_value(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Result<AttrValue<'_>, Error>;

    /// Store a new value for one attribute.
    fn set_attr_value(
        &mut self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
        value: &AttrValue,
    ) -> Result<(), Error>;
}

impl<T> Registry for &mut T
where
    T: Registry,
{
    fn endpoint_count(&self) -> usize {
        (**self).endpoint_count()
    }

    fn first_endpoint(&self) -> Option<EndptId> {
        (**self).first_endpoint()
    }

    fn next_endpoint(&self, endpoint_id: EndptId) -> Option<EndptId> {
        (**self).next_endpoint(endpoint_id)
    }

    fn endpoint_enabled(&self, endpoint_id: EndptId) -> bool {
        (**self).endpoint_enabled(endpoint_id)
    }

    fn has_server_cluster(&self, endpoint_id: EndptId, cluster_id: ClusterId) -> bool {
        (**self).has_server_cluster(endpoint_id, cluster_id)
    }

    fn attribute(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Option<AttributeMetadata> {
        (**self).attribute(endpoint_id, cluster_id, attr_id)
    }

    fn attr_value(
        &self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
    ) -> Result<AttrValue<'_>, Error> {
        (**self).attr_value(endpoint_id, cluster_id, attr_id)
    }

    fn set_attr_value(
        &mut self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
        value: &AttrValue,
    ) -> Result<(), Error> {
        (**self).set_attr_value(endpoint_id, cluster_id, attr_id, value)
    }
}

/// Receiver of attribute-changed reports emitted by the write path.
pub trait ChangeNotifier {
    fn attribute_changed(&self, endpoint_id: EndptId, cluster_id: ClusterId, attr_id: AttrId);
}

impl<T> ChangeNotifier for &T
where
    T: ChangeNotifier,
{
    fn attribute_changed(&self, endpoint_id: EndptId, cluster_id: ClusterId, attr_id: AttrId) {
        (**self).attribute_changed(endpoint_id, cluster_id, attr_id)
    }
}

/// A notifier that swallows all reports.
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn attribute_changed(&self, _endpoint_id: EndptId, _cluster_id: ClusterId, _attr_id: AttrId) {}
}
