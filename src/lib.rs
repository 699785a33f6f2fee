// Copyright 2025 Johann Kempter
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
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cilgraph
//!
//! Lazy resolution of ECMA-335 metadata into an identity-stable object graph.
//!
//! `cilgraph` takes the tables stream and the `#Strings` / `#Blob` heaps of a compiled .NET
//! module and turns table rows into shared member objects on demand: types, methods, member
//! references, events, properties, their accessors, custom attributes and generic parameters.
//! Nothing is resolved until it is asked for, and every token is resolved at most once.
//!
//! ## Features
//!
//! - **Identity-stable resolution** - resolving a token twice yields the same `Arc`
//! - **Lazy attributes** - names, signatures and references are read on first access
//! - **Coded indices** - one shared schema for decoding and encoding
//! - **Range lookups** - declaring types of methods, events and properties are recovered by
//!   binary search over the sorted map tables
//! - **Write-back** - member objects, loaded or built in memory, are encoded into a new image
//! - **Thread safe** - members are `Send + Sync`, whole tables resolve in parallel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cilgraph::prelude::*;
//!
//! # fn load(tables: &[u8], strings: &[u8], blobs: &[u8]) -> cilgraph::Result<()> {
//! let image = MetadataImage::from_bytes(tables, strings, blobs)?;
//!
//! for event in image.members_of::<Event>() {
//!     println!("{} ({:?})", event.full_name(), event.event_type());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Building metadata
//!
//! ```rust
//! use cilgraph::prelude::*;
//!
//! let foo = TypeDef::new("Demo", "Foo", TypeAttributes::PUBLIC)?;
//! let handler = TypeRef::new(None, "System", "EventHandler")?;
//! let changed = Event::new("Changed", handler.clone().into(), EventAttributes::empty())?;
//! assert_eq!(changed.full_name(), "Changed");
//!
//! let map = EventMap::new(&foo);
//! map.events().push(changed.clone())?;
//! assert_eq!(changed.full_name(), "Demo.Foo::Changed");
//!
//! let mut writer = MetadataWriter::new();
//! writer.add_type_ref(&handler);
//! // Adds the event map of the type as well
//! writer.add_type_def(&foo);
//! let image = writer.finish()?;
//!
//! let event = image.resolve_member(Token::new(0x1400_0001))?;
//! assert_eq!(event.full_name().as_deref(), Some("Demo.Foo::Changed"));
//! # Ok::<(), cilgraph::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Constructors and parsers return [`Result`]. Inconsistent data found while resolving an
//! attribute (malformed coded indices, dangling tokens, unreadable heap entries) does not fail:
//! only that attribute resolves to absence, and a `tracing` warning is emitted.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

pub(crate) mod file;

/// Metadata tables, heaps, member objects and their resolution
pub mod metadata;

/// Convenient re-exports of the commonly used types
pub mod prelude;

/// `cilgraph` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilgraph` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;
