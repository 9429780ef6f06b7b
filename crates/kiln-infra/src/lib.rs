// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Concrete rendering backends for kiln.
//!
//! [`graphics::gl`] implements [`kiln_core::GraphicsDevice`] on top of any
//! [`kiln_core::RenderDriver`]; [`graphics::recording`] provides a driver that
//! records every call instead of talking to a GPU. [`dispatch`] runs a device on
//! its own thread and feeds it commands from others.

#![warn(missing_docs)]

pub mod dispatch;
pub mod graphics;
