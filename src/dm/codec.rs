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

//! The value <-> buffer codec.
//!
//! Numeric payloads are copied in the platform's native byte order; there is
//! deliberately no endian conversion here, so encoder and decoder must agree
//! on endianness. String payloads are length-prefixed (1 byte for short
//! strings, 2 native-endian bytes for long ones) with the all-ones prefix
//! value reserved as the null marker.

use log::error;

use crate::error::{Error, ErrorCode};

use super::metadata::DefaultValue;
use super::value::{AttrValue, Nullable};
use super::wire::WireType;

/// Longest representable short string payload; 255 is the null marker.
const SHORT_STR_MAX: usize = 254;
/// Longest representable long string payload; 65535 is the null marker.
const LONG_STR_MAX: usize = 65534;

/// The canonical quiet-NaN pattern used as the single-precision null sentinel.
const NULL_F32: u32 = 0x7FC0_0000;

impl<'a> AttrValue<'a> {
    /// Map the value's kind to its ZCL wire type tag.
    ///
    /// Lossy many-to-one: the nullable and non-nullable flavor of a kind
    /// share one wire type.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Bool(_) | Self::NullableBool(_) => WireType::Boolean,
            Self::Int8(_) | Self::NullableInt8(_) => WireType::Int8s,
            Self::Int16(_) | Self::NullableInt16(_) => WireType::Int16s,
            Self::Int32(_) | Self::NullableInt32(_) => WireType::Int32s,
            Self::Int64(_) | Self::NullableInt64(_) => WireType::Int64s,
            Self::Uint8(_) | Self::NullableUint8(_) => WireType::Int8u,
            Self::Uint16(_) | Self::NullableUint16(_) => WireType::Int16u,
            Self::Uint32(_) | Self::NullableUint32(_) => WireType::Int32u,
            Self::Uint64(_) | Self::NullableUint64(_) => WireType::Int64u,
            Self::Float(_) | Self::NullableFloat(_) => WireType::Single,
            Self::Enum8(_) | Self::NullableEnum8(_) => WireType::Enum8,
            Self::Enum16(_) | Self::NullableEnum16(_) => WireType::Enum16,
            Self::Bitmap8(_) | Self::NullableBitmap8(_) => WireType::Bitmap8,
            Self::Bitmap16(_) | Self::NullableBitmap16(_) => WireType::Bitmap16,
            Self::Bitmap32(_) | Self::NullableBitmap32(_) => WireType::Bitmap32,
            Self::OctetStr(_) => WireType::OctetString,
            Self::CharStr(_) => WireType::CharString,
            Self::LongOctetStr(_) => WireType::LongOctetString,
            Self::LongCharStr(_) => WireType::LongCharString,
        }
    }

    /// The number of bytes the value occupies in wire format, including the
    /// string length prefix.
    pub fn wire_size(&self) -> usize {
        match self {
            Self::Bool(_) | Self::NullableBool(_) => 1,
            Self::Int8(_) | Self::NullableInt8(_) => 1,
            Self::Int16(_) | Self::NullableInt16(_) => 2,
            Self::Int32(_) | Self::NullableInt32(_) => 4,
            Self::Int64(_) | Self::NullableInt64(_) => 8,
            Self::Uint8(_) | Self::NullableUint8(_) => 1,
            Self::Uint16(_) | Self::NullableUint16(_) => 2,
            Self::Uint32(_) | Self::NullableUint32(_) => 4,
            Self::Uint64(_) | Self::NullableUint64(_) => 8,
            Self::Float(_) | Self::NullableFloat(_) => 4,
            Self::Enum8(_) | Self::NullableEnum8(_) => 1,
            Self::Enum16(_) | Self::NullableEnum16(_) => 2,
            Self::Bitmap8(_) | Self::NullableBitmap8(_) => 1,
            Self::Bitmap16(_) | Self::NullableBitmap16(_) => 2,
            Self::Bitmap32(_) | Self::NullableBitmap32(_) => 4,
            Self::OctetStr(v) => v.into_opt().map(<[u8]>::len).unwrap_or(0) + 1,
            Self::CharStr(v) => v.into_opt().map(str::len).unwrap_or(0) + 1,
            // The storage layer accounts a single prefix byte for long
            // strings as well, even though their wire prefix is two bytes.
            Self::LongOctetStr(v) => v.into_opt().map(<[u8]>::len).unwrap_or(0) + 1,
            Self::LongCharStr(v) => v.into_opt().map(str::len).unwrap_or(0) + 1,
        }
    }

    /// Encode the value into `buf` in wire format and return the number of
    /// bytes written.
    ///
    /// Fails with [`ErrorCode::BufferTooSmall`] without touching `buf` when
    /// the destination cannot hold the encoding, and with
    /// [`ErrorCode::InvalidArgument`] for string payloads longer than the
    /// wire format can express (254 / 65534 bytes).
    pub fn to_buffer(&self, buf: &mut [u8]) -> Result<usize, Error> {
        match self {
            Self::Bool(v) => put(buf, &[*v as u8]),
            Self::NullableBool(v) => {
                put(buf, &[v.into_opt().map(|b| b as u8).unwrap_or(u8::MAX)])
            }
            Self::Int8(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableInt8(v) => put(buf, &v.into_opt().unwrap_or(i8::MIN).to_ne_bytes()),
            Self::Int16(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableInt16(v) => put(buf, &v.into_opt().unwrap_or(i16::MIN).to_ne_bytes()),
            Self::Int32(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableInt32(v) => put(buf, &v.into_opt().unwrap_or(i32::MIN).to_ne_bytes()),
            Self::Int64(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableInt64(v) => put(buf, &v.into_opt().unwrap_or(i64::MIN).to_ne_bytes()),
            Self::Uint8(v) | Self::Enum8(v) | Self::Bitmap8(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableUint8(v) | Self::NullableEnum8(v) | Self::NullableBitmap8(v) => {
                put(buf, &v.into_opt().unwrap_or(u8::MAX).to_ne_bytes())
            }
            Self::Uint16(v) | Self::Enum16(v) | Self::Bitmap16(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableUint16(v) | Self::NullableEnum16(v) | Self::NullableBitmap16(v) => {
                put(buf, &v.into_opt().unwrap_or(u16::MAX).to_ne_bytes())
            }
            Self::Uint32(v) | Self::Bitmap32(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableUint32(v) | Self::NullableBitmap32(v) => {
                put(buf, &v.into_opt().unwrap_or(u32::MAX).to_ne_bytes())
            }
            Self::Uint64(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableUint64(v) => put(buf, &v.into_opt().unwrap_or(u64::MAX).to_ne_bytes()),
            Self::Float(v) => put(buf, &v.to_ne_bytes()),
            Self::NullableFloat(v) => put(
                buf,
                &v.into_opt()
                    .unwrap_or(f32::from_bits(NULL_F32))
                    .to_ne_bytes(),
            ),
            Self::OctetStr(v) => put_short_str(buf, v.into_opt()),
            Self::CharStr(v) => put_short_str(buf, v.into_opt().map(str::as_bytes)),
            Self::LongOctetStr(v) => put_long_str(buf, v.into_opt()),
            Self::LongCharStr(v) => put_long_str(buf, v.into_opt().map(str::as_bytes)),
        }
    }

    /// Decode a wire-format buffer into a tagged value.
    ///
    /// `wire_type` is the externally-declared layout of `data`; `nullable`
    /// states whether the destination attribute is configured nullable, in
    /// which case the type's null sentinel decodes to the nullable-null
    /// variant and any other payload to the nullable-non-null one.
    ///
    /// Decoded strings are borrowing views into `data`; they are valid only
    /// for as long as `data` is.
    ///
    /// # Panics
    ///
    /// The buffer is **not** checked against the length its own wire type
    /// (or string length prefix) implies. Passing a buffer shorter than the
    /// implied encoding is a caller contract violation and panics. Buffer
    /// length correctness is the caller's obligation.
    pub fn from_buffer(wire_type: WireType, nullable: bool, data: &'a [u8]) -> Result<Self, Error> {
        match wire_type {
            WireType::Boolean => {
                let v = data[0];
                Ok(if nullable {
                    Self::NullableBool(if v == u8::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v != 0)
                    })
                } else {
                    Self::Bool(v != 0)
                })
            }
            WireType::Int8s => {
                let v = data[0] as i8;
                Ok(if nullable {
                    Self::NullableInt8(if v == i8::MIN {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Int8(v)
                })
            }
            WireType::Int16s | WireType::Temperature => {
                let v = i16::from_ne_bytes(data[..2].try_into()?);
                Ok(if nullable {
                    Self::NullableInt16(if v == i16::MIN {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Int16(v)
                })
            }
            // 24-bit values are carried in the 32-bit storage type
            WireType::Int32s | WireType::Int24s => {
                let v = i32::from_ne_bytes(data[..4].try_into()?);
                Ok(if nullable {
                    Self::NullableInt32(if v == i32::MIN {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Int32(v)
                })
            }
            // 40/48/56-bit values are carried in the 64-bit storage type
            WireType::Int64s
            | WireType::Int40s
            | WireType::Int48s
            | WireType::Int56s
            | WireType::EnergyMwh
            | WireType::AmperageMa
            | WireType::PowerMw => {
                let v = i64::from_ne_bytes(data[..8].try_into()?);
                Ok(if nullable {
                    Self::NullableInt64(if v == i64::MIN {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Int64(v)
                })
            }
            WireType::Int8u
            | WireType::ActionId
            | WireType::Tag
            | WireType::Namespace
            | WireType::FabricIdx
            | WireType::Percent => {
                let v = data[0];
                Ok(if nullable {
                    Self::NullableUint8(if v == u8::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Uint8(v)
                })
            }
            WireType::Int16u
            | WireType::EntryIdx
            | WireType::GroupId
            | WireType::EndpointNo
            | WireType::VendorId
            | WireType::Percent100ths => {
                let v = u16::from_ne_bytes(data[..2].try_into()?);
                Ok(if nullable {
                    Self::NullableUint16(if v == u16::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Uint16(v)
                })
            }
            WireType::Int32u
            | WireType::Int24u
            | WireType::TransactionId
            | WireType::ClusterId
            | WireType::AttributeId
            | WireType::FieldId
            | WireType::EventId
            | WireType::CommandId
            | WireType::EpochS
            | WireType::ElapsedS
            | WireType::DataVer
            | WireType::DevtypeId => {
                let v = u32::from_ne_bytes(data[..4].try_into()?);
                Ok(if nullable {
                    Self::NullableUint32(if v == u32::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Uint32(v)
                })
            }
            WireType::Int64u
            | WireType::Int40u
            | WireType::Int48u
            | WireType::Int56u
            | WireType::FabricId
            | WireType::NodeId
            | WireType::PosixMs
            | WireType::EpochUs
            | WireType::SystimeUs
            | WireType::SystimeMs
            | WireType::EventNo => {
                let v = u64::from_ne_bytes(data[..8].try_into()?);
                Ok(if nullable {
                    Self::NullableUint64(if v == u64::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Uint64(v)
                })
            }
            WireType::Enum8 | WireType::Status | WireType::Priority => {
                let v = data[0];
                Ok(if nullable {
                    Self::NullableEnum8(if v == u8::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Enum8(v)
                })
            }
            WireType::Enum16 => {
                let v = u16::from_ne_bytes(data[..2].try_into()?);
                Ok(if nullable {
                    Self::NullableEnum16(if v == u16::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Enum16(v)
                })
            }
            WireType::Bitmap8 => {
                let v = data[0];
                Ok(if nullable {
                    Self::NullableBitmap8(if v == u8::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Bitmap8(v)
                })
            }
            WireType::Bitmap16 => {
                let v = u16::from_ne_bytes(data[..2].try_into()?);
                Ok(if nullable {
                    Self::NullableBitmap16(if v == u16::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Bitmap16(v)
                })
            }
            WireType::Bitmap32 => {
                let v = u32::from_ne_bytes(data[..4].try_into()?);
                Ok(if nullable {
                    Self::NullableBitmap32(if v == u32::MAX {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Bitmap32(v)
                })
            }
            WireType::Single => {
                let v = f32::from_ne_bytes(data[..4].try_into()?);
                Ok(if nullable {
                    Self::NullableFloat(if v.is_nan() {
                        Nullable::Null
                    } else {
                        Nullable::NonNull(v)
                    })
                } else {
                    Self::Float(v)
                })
            }
            // Address types share the short octet string layout
            WireType::OctetString
            | WireType::Ipadr
            | WireType::Ipv4adr
            | WireType::Ipv6adr
            | WireType::Ipv6pre
            | WireType::Hwadr => Ok(Self::OctetStr(take_short_str(data, nullable)?)),
            WireType::CharString => Ok(Self::CharStr(as_utf8(take_short_str(data, nullable)?)?)),
            WireType::LongOctetString => Ok(Self::LongOctetStr(take_long_str(data, nullable)?)),
            WireType::LongCharString => {
                Ok(Self::LongCharStr(as_utf8(take_long_str(data, nullable)?)?))
            }
            WireType::NoData
            | WireType::Bitmap64
            | WireType::Double
            | WireType::Array
            | WireType::Struct
            | WireType::Tod
            | WireType::Date
            | WireType::Utc => {
                error!("Wire type not handled: {:?}", wire_type);
                Err(ErrorCode::InvalidDataType.into())
            }
        }
    }

    /// Extract a minimal default-value descriptor for static metadata.
    ///
    /// Kinds whose storage fits in 16 bits are passed by immediate value
    /// (their storage bytes widened to 16 bits); wider numeric kinds carry
    /// their storage bytes; strings have no minimal representation.
    pub fn default_value(&self) -> DefaultValue {
        match self {
            Self::OctetStr(_) | Self::CharStr(_) | Self::LongOctetStr(_) | Self::LongCharStr(_) => {
                DefaultValue::Empty
            }
            _ => {
                let mut storage = [0; 8];

                // Numeric encodings always fit the 8-byte scratch
                let Ok(len) = self.to_buffer(&mut storage) else {
                    return DefaultValue::Empty;
                };

                match len {
                    1 => DefaultValue::Value(storage[0] as u16),
                    2 => {
                        let Ok(bytes) = storage[..2].try_into() else {
                            return DefaultValue::Empty;
                        };
                        DefaultValue::Value(u16::from_ne_bytes(bytes))
                    }
                    _ => {
                        let mut bytes = heapless::Vec::new();
                        if bytes.extend_from_slice(&storage[..len]).is_err() {
                            return DefaultValue::Empty;
                        }
                        DefaultValue::Bytes(bytes)
                    }
                }
            }
        }
    }
}

/// Copy `bytes` to the head of `buf`, failing without touching `buf` if the
/// capacity does not suffice.
fn put(buf: &mut [u8], bytes: &[u8]) -> Result<usize, Error> {
    if buf.len() < bytes.len() {
        Err(ErrorCode::BufferTooSmall)?;
    }

    buf[..bytes.len()].copy_from_slice(bytes);

    Ok(bytes.len())
}

fn put_short_str(buf: &mut [u8], payload: Option<&[u8]>) -> Result<usize, Error> {
    let Some(payload) = payload else {
        // A null string occupies the prefix only
        if buf.is_empty() {
            Err(ErrorCode::BufferTooSmall)?;
        }

        buf[0] = u8::MAX;
        return Ok(1);
    };

    if payload.len() > SHORT_STR_MAX {
        Err(ErrorCode::InvalidArgument)?;
    }

    let required = 1 + payload.len();
    if buf.len() < required {
        Err(ErrorCode::BufferTooSmall)?;
    }

    buf[0] = payload.len() as u8;
    buf[1..required].copy_from_slice(payload);

    Ok(required)
}

fn put_long_str(buf: &mut [u8], payload: Option<&[u8]>) -> Result<usize, Error> {
    let Some(payload) = payload else {
        if buf.len() < 2 {
            Err(ErrorCode::BufferTooSmall)?;
        }

        buf[..2].copy_from_slice(&u16::MAX.to_ne_bytes());
        return Ok(2);
    };

    if payload.len() > LONG_STR_MAX {
        Err(ErrorCode::InvalidArgument)?;
    }

    let required = 2 + payload.len();
    if buf.len() < required {
        Err(ErrorCode::BufferTooSmall)?;
    }

    buf[..2].copy_from_slice(&(payload.len() as u16).to_ne_bytes());
    buf[2..required].copy_from_slice(payload);

    Ok(required)
}

fn take_short_str(data: &[u8], nullable: bool) -> Result<Nullable<&[u8]>, Error> {
    let len = data[0] as usize;

    if len == u8::MAX as usize {
        if nullable {
            Ok(Nullable::Null)
        } else {
            // A non-nullable attribute cannot carry the null marker
            Err(ErrorCode::InvalidDataType.into())
        }
    } else {
        Ok(Nullable::NonNull(&data[1..1 + len]))
    }
}

fn take_long_str(data: &[u8], nullable: bool) -> Result<Nullable<&[u8]>, Error> {
    let len = u16::from_ne_bytes(data[..2].try_into()?) as usize;

    if len == u16::MAX as usize {
        if nullable {
            Ok(Nullable::Null)
        } else {
            Err(ErrorCode::InvalidDataType.into())
        }
    } else {
        Ok(Nullable::NonNull(&data[2..2 + len]))
    }
}

fn as_utf8(bytes: Nullable<&[u8]>) -> Result<Nullable<&str>, Error> {
    Ok(match bytes {
        Nullable::NonNull(bytes) => Nullable::NonNull(core::str::from_utf8(bytes)?),
        Nullable::Null => Nullable::Null,
    })
}
