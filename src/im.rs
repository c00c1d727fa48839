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

//! Interaction Model status codes as surfaced by the ember-compatible
//! attribute entry points.

use num::FromPrimitive;
use num_derive::FromPrimitive;

use crate::error::{Error, ErrorCode};

/// An enumeration of the Interaction Model status codes which the attribute
/// read/write entry points can produce.
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Success = 0,
    Failure = 1,
    UnsupportedEndpoint = 0x7F,
    UnsupportedAttribute = 0x86,
    ConstraintError = 0x87,
    ResourceExhausted = 0x89,
    InvalidDataType = 0x8D,
    UnsupportedCluster = 0xC3,
}

impl Status {
    /// Map a raw Matter status code value to a `Status`, if it is one
    /// of the codes this shim produces.
    pub fn from_raw(raw: u16) -> Option<Self> {
        FromPrimitive::from_u16(raw)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ErrorCode> for Status {
    fn from(e: ErrorCode) -> Self {
        match e {
            ErrorCode::EndpointNotFound => Status::UnsupportedEndpoint,
            ErrorCode::ClusterNotFound => Status::UnsupportedCluster,
            ErrorCode::AttributeNotFound => Status::UnsupportedAttribute,
            ErrorCode::BufferTooSmall | ErrorCode::NoSpace => Status::ResourceExhausted,
            ErrorCode::InvalidDataType => Status::InvalidDataType,
            ErrorCode::ConstraintError => Status::ConstraintError,
            _ => Status::Failure,
        }
    }
}

impl From<Error> for Status {
    fn from(value: Error) -> Self {
        Self::from(value.code())
    }
}
