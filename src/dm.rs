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

//! The data-model types of the attribute shim: the tagged attribute value,
//! the ZCL wire type space, attribute metadata, the endpoint/cluster
//! registry and the enabled-endpoint traversal.

pub use iter::*;
pub use metadata::*;
pub use node::*;
pub use registry::*;
pub use value::*;
pub use wire::*;

mod codec;
mod iter;
mod metadata;
mod node;
mod registry;
mod value;
mod wire;

pub type EndptId = u16;
pub type ClusterId = u32;
pub type AttrId = u32;
