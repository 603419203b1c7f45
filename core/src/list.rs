//! Lists: read-through, write-through handles.
//!
//! # Design
//! A `List` holds nothing but its id and the entity. Every getter
//! re-fetches the list JSON and extracts one field, so reads are never
//! stale but each costs a round trip; every setter is one immediate
//! single-field PUT, so two setters in a row are two independent requests
//! with no atomicity between them. Trello has no list deletion endpoint —
//! [`List::set_archived`] is the retirement path.

use serde::Deserialize;

use crate::board::Board;
use crate::card::Card;
use crate::entity::Entity;
use crate::error::Error;
use crate::http::HttpResponse;

#[derive(Debug, Clone, Deserialize)]
struct ListData {
    id: String,
    name: String,
    #[serde(default)]
    closed: bool,
    #[serde(rename = "idBoard", default)]
    id_board: String,
}

/// A bound list handle. Carries no cached fields.
#[derive(Debug, Clone)]
pub struct List {
    entity: Entity,
    remote_id: String,
}

impl List {
    /// Create a list on `board` and return the bound handle.
    pub fn create(board: &Board, name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::Validation("list name must not be empty".to_string()));
        }
        let board_id = board.remote_id()?.to_string();
        let entity = board.entity();
        let response = entity.post(
            "/lists",
            &[("name", name.into()), ("idBoard", board_id.into())],
        )?;
        let data: ListData = response.json()?;
        Ok(Self {
            entity: entity.clone(),
            remote_id: data.id,
        })
    }

    /// Wrap a known remote id. No request is issued here; the id is taken
    /// as authoritative and verified by the first read.
    pub fn bind_existing(entity: &Entity, remote_id: impl Into<String>) -> Result<Self, Error> {
        let remote_id = remote_id.into();
        if remote_id.is_empty() {
            return Err(Error::Validation("list id must not be empty".to_string()));
        }
        Ok(Self {
            entity: entity.clone(),
            remote_id,
        })
    }

    pub(crate) fn from_listing(
        entity: &Entity,
        response: &HttpResponse,
    ) -> Result<Vec<Self>, Error> {
        let items: Vec<ListData> = response.json()?;
        Ok(items
            .into_iter()
            .map(|data| Self {
                entity: entity.clone(),
                remote_id: data.id,
            })
            .collect())
    }

    pub fn remote_id(&self) -> &str {
        &self.remote_id
    }

    fn fetch(&self) -> Result<ListData, Error> {
        let response = self.entity.get(&format!("/lists/{}", self.remote_id), &[])?;
        response.json()
    }

    pub fn name(&self) -> Result<String, Error> {
        Ok(self.fetch()?.name)
    }

    pub fn is_archived(&self) -> Result<bool, Error> {
        Ok(self.fetch()?.closed)
    }

    pub fn board_id(&self) -> Result<String, Error> {
        Ok(self.fetch()?.id_board)
    }

    pub fn set_name(&self, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::Validation("list name must not be empty".to_string()));
        }
        self.entity.put(
            &format!("/lists/{}/name", self.remote_id),
            &[("value", name.into())],
        )?;
        Ok(())
    }

    pub fn set_archived(&self, archived: bool) -> Result<(), Error> {
        self.entity.put(
            &format!("/lists/{}/closed", self.remote_id),
            &[("value", archived.into())],
        )?;
        Ok(())
    }

    /// Cards on this list; empty when there are none.
    pub fn cards(&self) -> Result<Vec<Card>, Error> {
        let response = self
            .entity
            .get(&format!("/lists/{}/cards", self.remote_id), &[])?;
        Card::from_listing(&self.entity, &response)
    }

    pub(crate) fn entity(&self) -> &Entity {
        &self.entity
    }
}
