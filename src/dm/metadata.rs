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

//! Static per-attribute metadata in the layout the cluster storage tables
//! consume.

use crate::error::{Error, ErrorCode};

use super::value::AttrValue;
use super::wire::WireType;

bitflags::bitflags! {
    /// Attribute mask bits as laid down in the generated cluster tables.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct AttributeFlags: u8 {
        const WRITABLE = 0x01;
        const NONVOLATILE = 0x02;
        const MIN_MAX = 0x04;
        const MUST_USE_TIMED_WRITE = 0x08;
        const EXTERNAL_STORAGE = 0x10;
        const SINGLETON = 0x20;
        const NULLABLE = 0x40;
    }
}

/// A compact default-value descriptor.
///
/// Defaults small enough for a 16-bit immediate are carried by value; wider
/// numeric defaults carry their storage bytes inline. Owning the bytes keeps
/// the descriptor usable without a backing scratch buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DefaultValue {
    /// No default (strings, or kinds with no minimal representation)
    Empty,
    /// Storage bytes widened to a 16-bit immediate
    Value(u16),
    /// Native-order storage bytes of a wider numeric default
    Bytes(heapless::Vec<u8, 8>),
}

/// An inclusive min/max range for attributes carrying the min-max flag.
///
/// Bounds apply to numeric kinds only; nullable-null and string values are
/// outside its domain and always rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeBounds {
    pub min: AttrValue<'static>,
    pub max: AttrValue<'static>,
}

impl AttributeBounds {
    /// Whether `value` lies within `[min, max]`.
    ///
    /// Comparison happens in the integer domain for integral kinds and the
    /// floating domain for `Single`; a value whose kind does not match the
    /// bounds' domain is out of range.
    pub fn contains(&self, value: &AttrValue) -> bool {
        if let (Some(v), Some(min), Some(max)) =
            (value.as_i128(), self.min.as_i128(), self.max.as_i128())
        {
            return min <= v && v <= max;
        }

        if let (Some(v), Some(min), Some(max)) =
            (value.as_f32(), self.min.as_f32(), self.max.as_f32())
        {
            return min <= v && v <= max;
        }

        false
    }
}

/// Everything the storage and interaction layers need to know about one
/// attribute, resolved from the cluster tables and returned by value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeMetadata {
    pub wire_type: WireType,
    pub flags: AttributeFlags,
    /// Wire size in bytes, including the string length prefix.
    pub size: u16,
    pub default: DefaultValue,
    pub bounds: Option<AttributeBounds>,
}

impl AttributeMetadata {
    /// Derive metadata from a kind-representative value.
    pub fn for_value(value: &AttrValue<'static>, flags: AttributeFlags) -> Self {
        let flags = if value.is_nullable_kind() {
            flags | AttributeFlags::NULLABLE
        } else {
            flags
        };

        Self {
            wire_type: value.wire_type(),
            flags,
            size: value.wire_size() as u16,
            default: value.default_value(),
            bounds: None,
        }
    }

    pub const fn is_writable(&self) -> bool {
        self.flags.contains(AttributeFlags::WRITABLE)
    }

    pub const fn is_nullable(&self) -> bool {
        self.flags.contains(AttributeFlags::NULLABLE)
    }

    pub const fn is_nonvolatile(&self) -> bool {
        self.flags.contains(AttributeFlags::NONVOLATILE)
    }

    /// Check an incoming value against the bounds, if any are configured.
    pub fn check_bounds(&self, value: &AttrValue) -> Result<(), Error> {
        let Some(bounds) = self.bounds.as_ref() else {
            return Ok(());
        };

        // Null is always admissible on a nullable attribute
        if self.is_nullable() && value.is_null() {
            return Ok(());
        }

        if bounds.contains(value) {
            Ok(())
        } else {
            Err(ErrorCode::ConstraintError.into())
        }
    }
}
