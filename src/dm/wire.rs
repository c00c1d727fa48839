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

use strum::FromRepr;

/// The ZCL attribute type tag identifying the byte layout of one attribute
/// value in ember-style storage.
///
/// The wire type space is coarser than the [`AttrValue`](super::AttrValue)
/// kind space: one wire type serves both the nullable and the non-nullable
/// flavor of a kind, and the domain-specific aliases (fabric-index,
/// cluster-id, epoch timestamps, addresses, ...) share the layout of their
/// base width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WireType {
    NoData = 0x00,
    Boolean = 0x10,
    Bitmap8 = 0x18,
    Bitmap16 = 0x19,
    Bitmap32 = 0x1B,
    Bitmap64 = 0x1F,
    Int8u = 0x20,
    Int16u = 0x21,
    Int24u = 0x22,
    Int32u = 0x23,
    Int40u = 0x24,
    Int48u = 0x25,
    Int56u = 0x26,
    Int64u = 0x27,
    Int8s = 0x28,
    Int16s = 0x29,
    Int24s = 0x2A,
    Int32s = 0x2B,
    Int40s = 0x2C,
    Int48s = 0x2D,
    Int56s = 0x2E,
    Int64s = 0x2F,
    Enum8 = 0x30,
    Enum16 = 0x31,
    Priority = 0x32,
    Status = 0x33,
    Single = 0x39,
    Double = 0x3A,
    OctetString = 0x41,
    CharString = 0x42,
    LongOctetString = 0x43,
    LongCharString = 0x44,
    Array = 0x48,
    Struct = 0x4C,
    Ipadr = 0xD0,
    Ipv4adr = 0xD1,
    Ipv6adr = 0xD2,
    Ipv6pre = 0xD3,
    Hwadr = 0xD4,
    Tag = 0xD5,
    Namespace = 0xD6,
    EnergyMwh = 0xD8,
    AmperageMa = 0xD9,
    PowerMw = 0xDA,
    EventNo = 0xDB,
    Tod = 0xE0,
    Date = 0xE1,
    Utc = 0xE2,
    EpochUs = 0xE3,
    EpochS = 0xE4,
    SystimeUs = 0xE5,
    PosixMs = 0xE6,
    SystimeMs = 0xE7,
    ElapsedS = 0xE8,
    Temperature = 0xE9,
    Percent = 0xEA,
    Percent100ths = 0xEB,
    GroupId = 0xF0,
    EndpointNo = 0xF1,
    VendorId = 0xF2,
    DevtypeId = 0xF3,
    FabricId = 0xF4,
    FabricIdx = 0xF5,
    EntryIdx = 0xF6,
    DataVer = 0xF7,
    ActionId = 0xF8,
    TransactionId = 0xF9,
    NodeId = 0xFA,
    ClusterId = 0xFB,
    AttributeId = 0xFC,
    FieldId = 0xFD,
    EventId = 0xFE,
    CommandId = 0xFF,
}

impl WireType {
    /// Return `true` for the four string layouts (length prefix + payload)
    /// and for the address types which share the short octet string layout.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Self::OctetString
                | Self::CharString
                | Self::LongOctetString
                | Self::LongCharString
                | Self::Ipadr
                | Self::Ipv4adr
                | Self::Ipv6adr
                | Self::Ipv6pre
                | Self::Hwadr
        )
    }
}
