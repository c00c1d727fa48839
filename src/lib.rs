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

//! An ember-compatible attribute shim for Matter data models.
//!
//! The crate bridges two representations of one attribute value:
//! - the application-level [`dm::AttrValue`] tagged union, and
//! - the raw byte layout used by ember-style attribute storage, identified
//!   by a ZCL [`dm::WireType`] tag.
//!
//! On top of the codec it offers the classic ember entry points
//! ([`ember::read_attribute`], [`ember::write_attribute`]) operating against
//! a pluggable endpoint/cluster [`dm::Registry`], and the
//! [`dm::EnabledEndpointsWithServerCluster`] traversal helper.
//!
//! Numeric payloads are stored in the platform's native byte order. Encoder
//! and decoder must therefore run on the same (or a compatible-endian)
//! platform; no endian conversion is performed anywhere in this crate.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::uninlined_format_args)]

#[cfg(feature = "std")]
extern crate std;

pub mod dm;
pub mod ember;
pub mod error;
pub mod im;
