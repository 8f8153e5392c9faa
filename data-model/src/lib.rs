#![doc(html_logo_url = "https://willowprotocol.org/named_assets/willow_emblem_standalone.png")]
//! # Willow Data Model
//!
//! This crate provides implementation of the [Willow Data Model](https://willowprotocol.org/specs/data-model/index.html#data_model), including:
//!
//! - Traits to assist in your implementation of Willow [parameters](https://willowprotocol.org/specs/data-model/index.html#willow_parameters), such as [`NamespaceId`](https://willowprotocol.org/specs/data-model/index.html#NamespaceId) and [`SubspaceId`](https://willowprotocol.org/specs/data-model/index.html#SubspaceId).
//! - An implementation of Willow [paths](https://willowprotocol.org/specs/data-model/index.html#Path) backed by a single shared buffer, their constituent [components](https://willowprotocol.org/specs/data-model/index.html#Component), and the successor computations needed to turn prefixes into ranges.
//! - An implementation of Willow's [entries](https://willowprotocol.org/specs/data-model/index.html#Entry).
//! - Utilities for Willow's entry [groupings](https://willowprotocol.org/specs/grouping-entries/index.html#grouping_entries), such as [ranges](https://willowprotocol.org/specs/grouping-entries/index.html#ranges) and [areas](https://willowprotocol.org/specs/grouping-entries/index.html#areas).
//! - The absolute [encodings](https://willowprotocol.org/specs/encodings/index.html#encodings) of paths and entries, and the [relative encodings](https://willowprotocol.org/specs/encodings/index.html#relativity) of paths, entries, areas, and 3d ranges, all via the traits of [`willow_encoding`].
//!
//! ## Type parameters
//!
//! Willow is a parametrised family of protocols, and so this crate makes heavy use of generic parameters.
//!
//! The following generic parameter names are used consistently across this crate:
//!
//! - `MCL` - A `usize` representing [`max_component_length`](https://willowprotocol.org/specs/data-model/index.html#max_component_length).
//! - `MCC` - A `usize` representing [`max_component_count`](https://willowprotocol.org/specs/data-model/index.html#max_component_count).
//! - `MPL` - A `usize` representing [`max_path_length`](https://willowprotocol.org/specs/data-model/index.html#max_path_length).
//! - `N` - The type used for [`NamespaceId`](https://willowprotocol.org/specs/data-model/index.html#NamespaceId) (willowprotocol.org), must implement the [`NamespaceId`] trait.
//! - `S` - The type used for [`SubspaceId`](https://willowprotocol.org/specs/data-model/index.html#SubspaceId) (willowprotocol.org), must implement the [`SubspaceId`] trait.
//! - `PD` - The type used for [`PayloadDigest`](https://willowprotocol.org/specs/data-model/index.html#PayloadDigest) (willowprotocol.org), must implement the [`PayloadDigest`] trait.
//!
//! ## Encodings
//!
//! Every encodable type implements [`Encodable`](willow_encoding::Encodable) and [`Decodable`](willow_encoding::Decodable), or their relative counterparts [`RelativeEncodable`](willow_encoding::RelativeEncodable) and [`RelativeDecodable`](willow_encoding::RelativeDecodable) for each kind of reference it can be encoded against:
//!
//! | Value | Reference |
//! |---|---|
//! | [`Path`] | [`Path`] |
//! | [`Entry`] | [`Entry`] |
//! | [`Entry`] | `(N, `[`Area`](grouping::Area)`)` |
//! | [`Entry`] | `(N, `[`Range3d`](grouping::Range3d)`)` |
//! | [`Area`](grouping::Area) | [`Area`](grouping::Area) |
//! | [`Range3d`](grouping::Range3d) | [`Range3d`](grouping::Range3d) |
//!
//! Decoders only accept canonical encodings, and reject values that the reference could not have produced.

mod entry;
pub use entry::*;
pub mod grouping;
pub mod order;
mod parameters;
pub use parameters::*;
mod path;
pub use path::*;
mod relative_encodings;
