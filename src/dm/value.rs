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

use core::fmt;

/// A payload slot that may carry the ZCL "null" marker instead of a value.
///
/// For numeric kinds `Null` corresponds to the type's reserved sentinel bit
/// pattern on the wire; for string kinds it corresponds to the reserved
/// length-prefix value (255 for short strings, 65535 for long ones).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Nullable<T> {
    NonNull(T),
    Null,
}

impl<T> Nullable<T> {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn into_opt(self) -> Option<T> {
        match self {
            Self::NonNull(v) => Some(v),
            Self::Null => None,
        }
    }
}

/// The application-level representation of one attribute value.
///
/// This is a closed sum type: the active variant is the value's kind tag and
/// fully determines the interpretation of the payload. Numeric, enum and
/// bitmap kinds come in a plain and a nullable flavor; string kinds carry
/// their nullability in the payload itself (a null string is the
/// length-sentinel marker on the wire).
///
/// String variants are borrowing views into caller-owned memory. A decoded
/// string value is valid only for as long as the buffer it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttrValue<'a> {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Enum8(u8),
    Enum16(u16),
    Bitmap8(u8),
    Bitmap16(u16),
    Bitmap32(u32),
    NullableBool(Nullable<bool>),
    NullableInt8(Nullable<i8>),
    NullableInt16(Nullable<i16>),
    NullableInt32(Nullable<i32>),
    NullableInt64(Nullable<i64>),
    NullableUint8(Nullable<u8>),
    NullableUint16(Nullable<u16>),
    NullableUint32(Nullable<u32>),
    NullableUint64(Nullable<u64>),
    NullableFloat(Nullable<f32>),
    NullableEnum8(Nullable<u8>),
    NullableEnum16(Nullable<u16>),
    NullableBitmap8(Nullable<u8>),
    NullableBitmap16(Nullable<u16>),
    NullableBitmap32(Nullable<u32>),
    /// Short octet string, payload length up to 254 bytes.
    OctetStr(Nullable<&'a [u8]>),
    /// Short UTF-8 string, payload length up to 254 bytes.
    CharStr(Nullable<&'a str>),
    /// Long octet string, payload length up to 65534 bytes.
    LongOctetStr(Nullable<&'a [u8]>),
    /// Long UTF-8 string, payload length up to 65534 bytes.
    LongCharStr(Nullable<&'a str>),
}

impl AttrValue<'_> {
    /// Return `true` if the value carries the null marker.
    ///
    /// Plain (non-nullable) kinds are never null.
    pub fn is_null(&self) -> bool {
        match self {
            Self::NullableBool(v) => v.is_null(),
            Self::NullableInt8(v) => v.is_null(),
            Self::NullableInt16(v) => v.is_null(),
            Self::NullableInt32(v) => v.is_null(),
            Self::NullableInt64(v) => v.is_null(),
            Self::NullableUint8(v) | Self::NullableEnum8(v) | Self::NullableBitmap8(v) => {
                v.is_null()
            }
            Self::NullableUint16(v) | Self::NullableEnum16(v) | Self::NullableBitmap16(v) => {
                v.is_null()
            }
            Self::NullableUint32(v) | Self::NullableBitmap32(v) => v.is_null(),
            Self::NullableUint64(v) => v.is_null(),
            Self::NullableFloat(v) => v.is_null(),
            Self::OctetStr(v) | Self::LongOctetStr(v) => v.is_null(),
            Self::CharStr(v) | Self::LongCharStr(v) => v.is_null(),
            _ => false,
        }
    }

    /// Return `true` if the value is one of the nullable kinds.
    pub fn is_nullable_kind(&self) -> bool {
        matches!(
            self,
            Self::NullableBool(_)
                | Self::NullableInt8(_)
                | Self::NullableInt16(_)
                | Self::NullableInt32(_)
                | Self::NullableInt64(_)
                | Self::NullableUint8(_)
                | Self::NullableUint16(_)
                | Self::NullableUint32(_)
                | Self::NullableUint64(_)
                | Self::NullableFloat(_)
                | Self::NullableEnum8(_)
                | Self::NullableEnum16(_)
                | Self::NullableBitmap8(_)
                | Self::NullableBitmap16(_)
                | Self::NullableBitmap32(_)
        )
    }

    /// Widen a non-null integral payload for ordered comparison.
    ///
    /// Returns `None` for null payloads, floats and strings.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Bool(v) => Some(*v as i128),
            Self::Int8(v) => Some(*v as i128),
            Self::Int16(v) => Some(*v as i128),
            Self::Int32(v) => Some(*v as i128),
            Self::Int64(v) => Some(*v as i128),
            Self::Uint8(v) | Self::Enum8(v) | Self::Bitmap8(v) => Some(*v as i128),
            Self::Uint16(v) | Self::Enum16(v) | Self::Bitmap16(v) => Some(*v as i128),
            Self::Uint32(v) | Self::Bitmap32(v) => Some(*v as i128),
            Self::Uint64(v) => Some(*v as i128),
            Self::NullableBool(v) => v.into_opt().map(|v| v as i128),
            Self::NullableInt8(v) => v.into_opt().map(|v| v as i128),
            Self::NullableInt16(v) => v.into_opt().map(|v| v as i128),
            Self::NullableInt32(v) => v.into_opt().map(|v| v as i128),
            Self::NullableInt64(v) => v.into_opt().map(|v| v as i128),
            Self::NullableUint8(v) | Self::NullableEnum8(v) | Self::NullableBitmap8(v) => {
                v.into_opt().map(|v| v as i128)
            }
            Self::NullableUint16(v) | Self::NullableEnum16(v) | Self::NullableBitmap16(v) => {
                v.into_opt().map(|v| v as i128)
            }
            Self::NullableUint32(v) | Self::NullableBitmap32(v) => {
                v.into_opt().map(|v| v as i128)
            }
            Self::NullableUint64(v) => v.into_opt().map(|v| v as i128),
            _ => None,
        }
    }

    /// Extract a non-null float payload for ordered comparison.
    pub(crate) fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::NullableFloat(v) => v.into_opt(),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }

        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::NullableFloat(Nullable::NonNull(v)) => write!(f, "{}", v),
            Self::CharStr(Nullable::NonNull(v)) | Self::LongCharStr(Nullable::NonNull(v)) => {
                write!(f, "{:?}", v)
            }
            Self::OctetStr(Nullable::NonNull(v)) | Self::LongOctetStr(Nullable::NonNull(v)) => {
                write!(f, "{} octets", v.len())
            }
            other => match other.as_i128() {
                Some(v) => write!(f, "{}", v),
                None => write!(f, "{:?}", other),
            },
        }
    }
}
