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

//! Wire-level attribute access entry points, as called by the surrounding
//! framework. All entry points report via [`Status`] rather than `Error`.

use log::{debug, warn};

use crate::dm::{
    AttrId, AttrValue, AttributeMetadata, ChangeNotifier, ClusterId, EndptId, Registry, WireType,
};
use crate::im::Status;

/// When the change-notification collaborator should be told about a write.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarkDirty {
    /// Never notify.
    No,
    /// Notify on every successful write, value change or not.
    Yes,
    /// Notify only when the stored value actually changed.
    #[default]
    OnSuccess,
}

/// A write request descriptor for [`write_attribute_with`].
pub struct WriteInput<'a> {
    pub endpoint_id: EndptId,
    pub cluster_id: ClusterId,
    pub attr_id: AttrId,
    /// Wire-format source bytes.
    pub data: &'a [u8],
    /// The layout `data` was encoded with; must match the attribute's own
    /// wire type.
    pub wire_type: WireType,
    /// Change listener; `None` suppresses notification regardless of the
    /// dirty policy.
    pub listener: Option<&'a dyn ChangeNotifier>,
    /// Dirty policy; `None` means [`MarkDirty::OnSuccess`].
    pub mark_dirty: Option<MarkDirty>,
}

impl<'a> WriteInput<'a> {
    pub const fn new(
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        attr_id: AttrId,
        wire_type: WireType,
        data: &'a [u8],
    ) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            attr_id,
            data,
            wire_type,
            listener: None,
            mark_dirty: None,
        }
    }

    pub const fn with_listener(mut self, listener: &'a dyn ChangeNotifier) -> Self {
        self.listener = Some(listener);
        self
    }

    pub const fn with_mark_dirty(mut self, mark_dirty: MarkDirty) -> Self {
        self.mark_dirty = Some(mark_dirty);
        self
    }
}

/// Read an attribute's current value in wire format into `buf`.
///
/// Resolution failures report `UnsupportedEndpoint` / `UnsupportedCluster` /
/// `UnsupportedAttribute` in that order; a destination too small for the
/// encoding reports `ResourceExhausted`.
pub fn read_attribute<R>(
    registry: &R,
    endpoint_id: EndptId,
    cluster_id: ClusterId,
    attr_id: AttrId,
    buf: &mut [u8],
) -> Status
where
    R: Registry,
{
    let result = (|| {
        resolve(registry, endpoint_id, cluster_id, attr_id)?;

        let value = registry.attr_value(endpoint_id, cluster_id, attr_id)?;
        value.to_buffer(buf)?;

        Ok::<_, Status>(())
    })();

    match result {
        Ok(()) => Status::Success,
        Err(status) => {
            debug!(
                "Read of attribute {}/{:#04x}/{:#04x} failed: {:?}",
                endpoint_id, cluster_id, attr_id, status
            );
            status
        }
    }
}

/// Write an attribute from wire-format bytes, notifying `notifier` under the
/// default dirty policy ([`MarkDirty::OnSuccess`]).
pub fn write_attribute<R>(
    registry: &mut R,
    notifier: &dyn ChangeNotifier,
    endpoint_id: EndptId,
    cluster_id: ClusterId,
    attr_id: AttrId,
    data: &[u8],
    wire_type: WireType,
) -> Status
where
    R: Registry,
{
    write_attribute_with(
        registry,
        &WriteInput::new(endpoint_id, cluster_id, attr_id, wire_type, data)
            .with_listener(notifier),
    )
}

/// Write an attribute from a full write descriptor.
///
/// The declared wire type must match the attribute's own; the payload is
/// decoded with the attribute's configured nullability, checked against its
/// bounds if any, and stored. The listener is then notified per the dirty
/// policy.
pub fn write_attribute_with<R>(registry: &mut R, input: &WriteInput) -> Status
where
    R: Registry,
{
    match write(registry, input) {
        Ok(()) => Status::Success,
        Err(status) => {
            warn!(
                "Write of attribute {}/{:#04x}/{:#04x} failed: {:?}",
                input.endpoint_id, input.cluster_id, input.attr_id, status
            );
            status
        }
    }
}

fn write<R>(registry: &mut R, input: &WriteInput) -> Result<(), Status>
where
    R: Registry,
{
    let metadata = resolve(registry, input.endpoint_id, input.cluster_id, input.attr_id)?;

    if input.wire_type != metadata.wire_type {
        Err(Status::InvalidDataType)?;
    }

    let value = AttrValue::from_buffer(metadata.wire_type, metadata.is_nullable(), input.data)?;

    metadata.check_bounds(&value)?;

    let changed = registry
        .attr_value(input.endpoint_id, input.cluster_id, input.attr_id)
        .map(|old| old != value)
        .unwrap_or(true);

    registry.set_attr_value(input.endpoint_id, input.cluster_id, input.attr_id, &value)?;

    let notify = match input.mark_dirty.unwrap_or_default() {
        MarkDirty::No => false,
        MarkDirty::Yes => true,
        MarkDirty::OnSuccess => changed,
    };

    if notify {
        if let Some(listener) = input.listener {
            listener.attribute_changed(input.endpoint_id, input.cluster_id, input.attr_id);
        }
    }

    Ok(())
}

/// Resolve an attribute's static metadata, by value.
///
/// Unlike the read/write entry points, resolution does not require the
/// endpoint to be enabled.
pub fn locate_attribute_metadata<R>(
    registry: &R,
    endpoint_id: EndptId,
    cluster_id: ClusterId,
    attr_id: AttrId,
) -> Option<AttributeMetadata>
where
    R: Registry,
{
    registry.attribute(endpoint_id, cluster_id, attr_id)
}

fn resolve<R>(
    registry: &R,
    endpoint_id: EndptId,
    cluster_id: ClusterId,
    attr_id: AttrId,
) -> Result<AttributeMetadata, Status>
where
    R: Registry,
{
    if !registry.endpoint_enabled(endpoint_id) {
        Err(Status::UnsupportedEndpoint)?;
    }

    if !registry.has_server_cluster(endpoint_id, cluster_id) {
        Err(Status::UnsupportedCluster)?;
    }

    registry
        .attribute(endpoint_id, cluster_id, attr_id)
        .ok_or(Status::UnsupportedAttribute)
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::{
        locate_attribute_metadata, read_attribute, write_attribute, write_attribute_with,
        MarkDirty, WriteInput,
    };
    use crate::dm::{
        AttrId, AttrValue, Attribute, AttributeFlags, ChangeNotifier, Cluster, ClusterId,
        EndptId, Endpoint, Node, NoopNotifier, Registry, WireType,
    };
    use crate::im::Status;

    struct Recorder {
        events: RefCell<heapless::Vec<(EndptId, ClusterId, AttrId), 8>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                events: RefCell::new(heapless::Vec::new()),
            }
        }

        fn take(&self) -> heapless::Vec<(EndptId, ClusterId, AttrId), 8> {
            core::mem::take(&mut self.events.borrow_mut())
        }
    }

    impl ChangeNotifier for Recorder {
        fn attribute_changed(&self, endpoint_id: EndptId, cluster_id: ClusterId, attr_id: AttrId) {
            self.events
                .borrow_mut()
                .push((endpoint_id, cluster_id, attr_id))
                .unwrap();
        }
    }

    fn node() -> Node {
        let mut cluster = Cluster::new(6);
        cluster
            .add_attribute(
                Attribute::new(0, AttrValue::Bool(false), AttributeFlags::WRITABLE).unwrap(),
            )
            .unwrap();
        cluster
            .add_attribute(
                Attribute::new(8, AttrValue::Uint8(50), AttributeFlags::WRITABLE)
                    .unwrap()
                    .with_bounds(AttrValue::Uint8(1), AttrValue::Uint8(100)),
            )
            .unwrap();

        let mut endpoint = Endpoint::new(1);
        endpoint.add_cluster(cluster).unwrap();

        let mut node = Node::new();
        node.add_endpoint(endpoint).unwrap();

        node
    }

    #[test]
    fn test_read() {
        let node = node();

        let mut buf = [0xA5; 4];
        assert_eq!(read_attribute(&node, 1, 6, 0, &mut buf), Status::Success);
        assert_eq!(buf[0], 0);

        assert_eq!(read_attribute(&node, 1, 6, 8, &mut buf), Status::Success);
        assert_eq!(buf[0], 50);
    }

    #[test]
    fn test_read_resolution_status_order() {
        let node = node();
        let mut buf = [0; 4];

        assert_eq!(
            read_attribute(&node, 2, 6, 0, &mut buf),
            Status::UnsupportedEndpoint
        );
        assert_eq!(
            read_attribute(&node, 1, 7, 0, &mut buf),
            Status::UnsupportedCluster
        );
        assert_eq!(
            read_attribute(&node, 1, 6, 99, &mut buf),
            Status::UnsupportedAttribute
        );
    }

    #[test]
    fn test_read_disabled_endpoint() {
        let mut node = node();
        node.enable_endpoint(1, false).unwrap();

        let mut buf = [0; 4];
        assert_eq!(
            read_attribute(&node, 1, 6, 0, &mut buf),
            Status::UnsupportedEndpoint
        );
    }

    #[test]
    fn test_read_insufficient_buffer() {
        let node = node();

        assert_eq!(
            read_attribute(&node, 1, 6, 0, &mut []),
            Status::ResourceExhausted
        );
    }

    #[test]
    fn test_write() {
        let mut node = node();

        assert_eq!(
            write_attribute(&mut node, &NoopNotifier, 1, 6, 0, &[1], WireType::Boolean),
            Status::Success
        );
        assert_eq!(node.attr_value(1, 6, 0), Ok(AttrValue::Bool(true)));
    }

    #[test]
    fn test_write_type_mismatch() {
        let mut node = node();

        assert_eq!(
            write_attribute(&mut node, &NoopNotifier, 1, 6, 0, &[1], WireType::Int8u),
            Status::InvalidDataType
        );
        assert_eq!(node.attr_value(1, 6, 0), Ok(AttrValue::Bool(false)));
    }

    #[test]
    fn test_write_bounds() {
        let mut node = node();

        assert_eq!(
            write_attribute(&mut node, &NoopNotifier, 1, 6, 8, &[101], WireType::Int8u),
            Status::ConstraintError
        );
        assert_eq!(node.attr_value(1, 6, 8), Ok(AttrValue::Uint8(50)));

        assert_eq!(
            write_attribute(&mut node, &NoopNotifier, 1, 6, 8, &[100], WireType::Int8u),
            Status::Success
        );
        assert_eq!(node.attr_value(1, 6, 8), Ok(AttrValue::Uint8(100)));
    }

    #[test]
    fn test_default_dirty_policy_notifies_on_change_only() {
        let mut node = node();
        let recorder = Recorder::new();

        assert_eq!(
            write_attribute(&mut node, &recorder, 1, 6, 0, &[1], WireType::Boolean),
            Status::Success
        );
        assert_eq!(recorder.take().as_slice(), &[(1, 6, 0)]);

        // Same value again: no report
        assert_eq!(
            write_attribute(&mut node, &recorder, 1, 6, 0, &[1], WireType::Boolean),
            Status::Success
        );
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_explicit_dirty_policies() {
        let mut node = node();
        let recorder = Recorder::new();

        // Yes: notified even though the value did not change
        let status = write_attribute_with(
            &mut node,
            &WriteInput::new(1, 6, 8, WireType::Int8u, &[50])
                .with_listener(&recorder)
                .with_mark_dirty(MarkDirty::Yes),
        );
        assert_eq!(status, Status::Success);
        assert_eq!(recorder.take().as_slice(), &[(1, 6, 8)]);

        // No: silent even though the value changed
        let status = write_attribute_with(
            &mut node,
            &WriteInput::new(1, 6, 8, WireType::Int8u, &[60])
                .with_listener(&recorder)
                .with_mark_dirty(MarkDirty::No),
        );
        assert_eq!(status, Status::Success);
        assert!(recorder.take().is_empty());
        assert_eq!(node.attr_value(1, 6, 8), Ok(AttrValue::Uint8(60)));
    }

    #[test]
    fn test_no_listener_is_silent() {
        let mut node = node();

        let status = write_attribute_with(
            &mut node,
            &WriteInput::new(1, 6, 0, WireType::Boolean, &[1])
                .with_mark_dirty(MarkDirty::Yes),
        );
        assert_eq!(status, Status::Success);
        assert_eq!(node.attr_value(1, 6, 0), Ok(AttrValue::Bool(true)));
    }

    #[test]
    fn test_failed_write_not_reported() {
        let mut node = node();
        let recorder = Recorder::new();

        let status = write_attribute_with(
            &mut node,
            &WriteInput::new(1, 6, 8, WireType::Int8u, &[200])
                .with_listener(&recorder)
                .with_mark_dirty(MarkDirty::Yes),
        );
        assert_eq!(status, Status::ConstraintError);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_locate_attribute_metadata() {
        let mut node = node();

        let meta = locate_attribute_metadata(&node, 1, 6, 8).unwrap();
        assert_eq!(meta.wire_type, WireType::Int8u);
        assert!(meta.bounds.is_some());

        assert!(locate_attribute_metadata(&node, 1, 6, 99).is_none());

        // Metadata resolution works on disabled endpoints too
        node.enable_endpoint(1, false).unwrap();
        assert!(locate_attribute_metadata(&node, 1, 6, 8).is_some());
    }
}
