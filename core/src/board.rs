//! Boards: the one resource with a cached snapshot and deferred commit.
//!
//! # Design
//! Unlike the pass-through resources ([`crate::list`], [`crate::card`],
//! [`crate::label`]), a `Board` keeps a local snapshot of its metadata.
//! Setters mutate the snapshot and mark the field dirty without touching
//! the network; [`Board::commit`] flushes every dirty field in a single
//! PUT and clears the dirty set only when that request succeeds, so a
//! failed commit can simply be retried. [`Board::refresh`] replaces the
//! snapshot with the server's current state and discards local edits.
//!
//! A handle is poisoned by a successful [`Board::delete`]: every later
//! operation fails with [`Error::InvalidState`] and issues no request.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::entity::Entity;
use crate::error::Error;
use crate::label::Label;
use crate::list::List;
use crate::url::ParamValue;

/// Trello caps board names at 16384 characters.
const MAX_NAME_LEN: usize = 16384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Name,
    Description,
    Public,
    Closed,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BoardPrefs {
    #[serde(rename = "permissionLevel", default)]
    permission_level: String,
}

/// Wire shape of a board as the API returns it.
#[derive(Debug, Clone, Deserialize)]
struct BoardData {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    prefs: BoardPrefs,
}

/// A bound board handle with a cached metadata snapshot.
#[derive(Debug)]
pub struct Board {
    entity: Entity,
    remote_id: String,
    name: String,
    description: String,
    is_public: bool,
    is_closed: bool,
    dirty: BTreeSet<Field>,
    deleted: bool,
}

fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Validation("board name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "board name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn permission_level(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "private"
    }
}

impl Board {
    /// Create a board remotely and return the bound handle.
    ///
    /// Visibility defaults to private when `is_public` is omitted. Name
    /// rules are enforced before any request is issued.
    pub fn create(entity: &Entity, name: &str, is_public: Option<bool>) -> Result<Self, Error> {
        validate_name(name)?;
        let response = entity.post(
            "/boards",
            &[
                ("name", name.into()),
                ("defaultLists", false.into()),
                (
                    "prefs_permissionLevel",
                    permission_level(is_public.unwrap_or(false)).into(),
                ),
            ],
        )?;
        Ok(Self::from_data(entity.clone(), response.json()?))
    }

    /// Bind to an existing board by id.
    ///
    /// Returns `Ok(None)` when the id does not exist or is not accessible
    /// with the entity's credentials — an expected outcome, not an error.
    pub fn from_remote(entity: &Entity, remote_id: &str) -> Result<Option<Self>, Error> {
        if remote_id.is_empty() {
            return Err(Error::Validation("board id must not be empty".to_string()));
        }
        let response = entity.get_opt(&format!("/boards/{remote_id}"), &[])?;
        match response {
            Some(response) => Ok(Some(Self::from_data(entity.clone(), response.json()?))),
            None => Ok(None),
        }
    }

    /// All open boards the entity can edit; empty when there are none.
    pub fn fetch_all(entity: &Entity) -> Result<Vec<Self>, Error> {
        let response = entity.get("/members/me/boards", &[("filter", "open".into())])?;
        let boards: Vec<BoardData> = response.json()?;
        Ok(boards
            .into_iter()
            .map(|data| Self::from_data(entity.clone(), data))
            .collect())
    }

    fn from_data(entity: Entity, data: BoardData) -> Self {
        Self {
            entity,
            remote_id: data.id,
            name: data.name,
            description: data.desc,
            is_public: data.prefs.permission_level == "public",
            is_closed: data.closed,
            dirty: BTreeSet::new(),
            deleted: false,
        }
    }

    fn ensure_live(&self) -> Result<(), Error> {
        if self.deleted {
            return Err(Error::InvalidState("board was deleted"));
        }
        Ok(())
    }

    pub fn remote_id(&self) -> Result<&str, Error> {
        self.ensure_live()?;
        Ok(&self.remote_id)
    }

    /// Snapshot getters: no I/O. Use [`Board::refresh`] to re-sync.
    pub fn name(&self) -> Result<&str, Error> {
        self.ensure_live()?;
        Ok(&self.name)
    }

    pub fn description(&self) -> Result<&str, Error> {
        self.ensure_live()?;
        Ok(&self.description)
    }

    pub fn is_public(&self) -> Result<bool, Error> {
        self.ensure_live()?;
        Ok(self.is_public)
    }

    pub fn is_closed(&self) -> Result<bool, Error> {
        self.ensure_live()?;
        Ok(self.is_closed)
    }

    /// Setters mutate the snapshot only; nothing reaches the server until
    /// [`Board::commit`].
    pub fn set_name(&mut self, name: &str) -> Result<(), Error> {
        self.ensure_live()?;
        validate_name(name)?;
        self.name = name.to_string();
        self.dirty.insert(Field::Name);
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), Error> {
        self.ensure_live()?;
        self.description = description.to_string();
        self.dirty.insert(Field::Description);
        Ok(())
    }

    pub fn set_public(&mut self, is_public: bool) -> Result<(), Error> {
        self.ensure_live()?;
        self.is_public = is_public;
        self.dirty.insert(Field::Public);
        Ok(())
    }

    pub fn set_closed(&mut self, is_closed: bool) -> Result<(), Error> {
        self.ensure_live()?;
        self.is_closed = is_closed;
        self.dirty.insert(Field::Closed);
        Ok(())
    }

    /// Flush buffered edits in one PUT.
    ///
    /// With a clean buffer and `force` false this is a no-op and issues no
    /// request. With `force` true every metadata field is sent regardless.
    /// The dirty set is cleared only on success; any failure leaves it
    /// intact so the commit can be retried as-is.
    pub fn commit(&mut self, force: bool) -> Result<(), Error> {
        self.ensure_live()?;
        if self.dirty.is_empty() && !force {
            return Ok(());
        }

        let mut params: Vec<(&str, ParamValue)> = Vec::new();
        if force || self.dirty.contains(&Field::Name) {
            params.push(("name", self.name.as_str().into()));
        }
        if force || self.dirty.contains(&Field::Description) {
            params.push(("desc", self.description.as_str().into()));
        }
        if force || self.dirty.contains(&Field::Closed) {
            params.push(("closed", self.is_closed.into()));
        }
        if force || self.dirty.contains(&Field::Public) {
            let mut prefs = BTreeMap::new();
            prefs.insert(
                "permissionLevel".to_string(),
                permission_level(self.is_public).to_string(),
            );
            params.push(("prefs", ParamValue::Map(prefs)));
        }

        self.entity
            .put(&format!("/boards/{}", self.remote_id), &params)?;
        self.dirty.clear();
        Ok(())
    }

    /// Replace the snapshot with the server's current state, dropping any
    /// uncommitted local edits.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.ensure_live()?;
        let response = self.entity.get(&format!("/boards/{}", self.remote_id), &[])?;
        let data: BoardData = response.json()?;
        self.name = data.name;
        self.description = data.desc;
        self.is_public = data.prefs.permission_level == "public";
        self.is_closed = data.closed;
        self.dirty.clear();
        Ok(())
    }

    /// Lists on this board; empty when there are none.
    pub fn lists(&self) -> Result<Vec<List>, Error> {
        self.ensure_live()?;
        let response = self
            .entity
            .get(&format!("/boards/{}/lists", self.remote_id), &[])?;
        List::from_listing(&self.entity, &response)
    }

    /// Labels defined on this board; empty when there are none.
    pub fn labels(&self) -> Result<Vec<Label>, Error> {
        self.ensure_live()?;
        let response = self
            .entity
            .get(&format!("/boards/{}/labels", self.remote_id), &[])?;
        Label::from_listing(&self.entity, &response)
    }

    /// Delete the remote board. Remote-first: the handle is only poisoned
    /// once the server confirms the deletion.
    pub fn delete(&mut self) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity
            .delete(&format!("/boards/{}", self.remote_id), &[])?;
        self.deleted = true;
        Ok(())
    }

    pub(crate) fn entity(&self) -> &Entity {
        &self.entity
    }
}
