//! Typed client for the Trello REST API.
//!
//! # Overview
//! Models Trello's remote resources — [`Entity`] (account), [`Board`],
//! [`List`], [`Card`], [`Label`] — as local handles backed by lazy,
//! on-demand HTTP calls. The library never performs I/O itself: the host
//! supplies a [`Transport`] (the generic GET/POST/PUT/DELETE-with-URL
//! capability) and the library builds authenticated URLs, interprets
//! statuses, and decodes JSON.
//!
//! # Design
//! - `Entity` is the only holder of credentials and the only URL builder;
//!   every other handle addresses the API through it.
//! - Each resource is either fresh (`create` pushes it to the remote and
//!   returns a bound handle) or bound (`bind_existing` / `from_remote`
//!   wraps a known id).
//! - `Board` keeps a cached snapshot with dirty-tracking: setters are
//!   local, [`Board::commit`] flushes in one request. List, card, and
//!   label are pass-through: getters re-fetch, setters write immediately,
//!   one field per round trip. The asymmetry is deliberate and visible in
//!   the method shapes.
//! - Deletion is remote-first; a deleted handle fails every later call
//!   with [`Error::InvalidState`] and issues no request.
//!
//! Handles are not safe to mutate from multiple threads without external
//! synchronization, and the library performs no retry, coalescing, or
//! conflict resolution — concurrent writers are last-write-wins at the
//! server.

pub mod board;
pub mod card;
pub mod entity;
pub mod error;
pub mod http;
pub mod label;
pub mod list;
pub mod url;

pub use board::Board;
pub use card::Card;
pub use entity::Entity;
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use label::{Color, Label};
pub use list::List;
pub use url::ParamValue;

#[cfg(test)]
pub(crate) mod test_support;
