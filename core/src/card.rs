//! Cards: read-through, write-through handles with comment and label
//! operations.
//!
//! # Design
//! Same discipline as [`crate::list`]: no local cache, every getter
//! re-fetches the full card JSON, every setter is one immediate
//! single-field PUT. A successful [`Card::delete`] poisons the handle the
//! way [`crate::board::Board::delete`] does.

use serde::Deserialize;

use crate::board::Board;
use crate::entity::Entity;
use crate::error::Error;
use crate::http::HttpResponse;
use crate::label::Label;
use crate::list::List;
use crate::url::ParamValue;

#[derive(Debug, Clone, Deserialize)]
struct CardData {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    closed: bool,
    #[serde(rename = "idList", default)]
    id_list: String,
    #[serde(rename = "idBoard", default)]
    id_board: String,
    #[serde(rename = "idLabels", default)]
    id_labels: Vec<String>,
}

/// A bound card handle. Carries no cached fields.
#[derive(Debug, Clone)]
pub struct Card {
    entity: Entity,
    remote_id: String,
    deleted: bool,
}

impl Card {
    /// Create a card on `list` and return the bound handle.
    pub fn create(list: &List, name: &str, description: Option<&str>) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::Validation("card name must not be empty".to_string()));
        }
        let entity = list.entity();
        let mut params: Vec<(&str, ParamValue)> = vec![
            ("name", name.into()),
            ("idList", list.remote_id().into()),
        ];
        if let Some(description) = description {
            params.push(("desc", description.into()));
        }
        let response = entity.post("/cards", &params)?;
        let data: CardData = response.json()?;
        Ok(Self {
            entity: entity.clone(),
            remote_id: data.id,
            deleted: false,
        })
    }

    /// Wrap a known remote id without a request; the first read verifies it.
    pub fn bind_existing(entity: &Entity, remote_id: impl Into<String>) -> Result<Self, Error> {
        let remote_id = remote_id.into();
        if remote_id.is_empty() {
            return Err(Error::Validation("card id must not be empty".to_string()));
        }
        Ok(Self {
            entity: entity.clone(),
            remote_id,
            deleted: false,
        })
    }

    pub(crate) fn from_listing(
        entity: &Entity,
        response: &HttpResponse,
    ) -> Result<Vec<Self>, Error> {
        let items: Vec<CardData> = response.json()?;
        Ok(items
            .into_iter()
            .map(|data| Self {
                entity: entity.clone(),
                remote_id: data.id,
                deleted: false,
            })
            .collect())
    }

    fn ensure_live(&self) -> Result<(), Error> {
        if self.deleted {
            return Err(Error::InvalidState("card was deleted"));
        }
        Ok(())
    }

    pub fn remote_id(&self) -> Result<&str, Error> {
        self.ensure_live()?;
        Ok(&self.remote_id)
    }

    fn fetch(&self) -> Result<CardData, Error> {
        self.ensure_live()?;
        let response = self.entity.get(&format!("/cards/{}", self.remote_id), &[])?;
        response.json()
    }

    pub fn name(&self) -> Result<String, Error> {
        Ok(self.fetch()?.name)
    }

    pub fn description(&self) -> Result<String, Error> {
        Ok(self.fetch()?.desc)
    }

    pub fn is_archived(&self) -> Result<bool, Error> {
        Ok(self.fetch()?.closed)
    }

    pub fn list_id(&self) -> Result<String, Error> {
        Ok(self.fetch()?.id_list)
    }

    pub fn board_id(&self) -> Result<String, Error> {
        Ok(self.fetch()?.id_board)
    }

    /// Ids of the labels currently assigned to the card.
    pub fn label_ids(&self) -> Result<Vec<String>, Error> {
        Ok(self.fetch()?.id_labels)
    }

    /// The assigned labels as bound handles.
    pub fn labels(&self) -> Result<Vec<Label>, Error> {
        self.fetch()?
            .id_labels
            .into_iter()
            .map(|id| Label::bind_existing(&self.entity, id))
            .collect()
    }

    fn put_field(&self, field: &str, value: ParamValue) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity.put(
            &format!("/cards/{}/{field}", self.remote_id),
            &[("value", value)],
        )?;
        Ok(())
    }

    pub fn set_name(&self, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::Validation("card name must not be empty".to_string()));
        }
        self.put_field("name", name.into())
    }

    pub fn set_description(&self, description: &str) -> Result<(), Error> {
        self.put_field("desc", description.into())
    }

    pub fn set_archived(&self, archived: bool) -> Result<(), Error> {
        self.put_field("closed", archived.into())
    }

    /// Move the card to another list.
    pub fn set_list(&self, list: &List) -> Result<(), Error> {
        self.put_field("idList", list.remote_id().into())
    }

    /// Move the card to another board.
    pub fn set_board(&self, board: &Board) -> Result<(), Error> {
        let board_id = board.remote_id()?.to_string();
        self.put_field("idBoard", board_id.into())
    }

    /// Post a comment on the card.
    pub fn comment(&self, text: &str) -> Result<(), Error> {
        self.ensure_live()?;
        if text.is_empty() {
            return Err(Error::Validation(
                "comment text must not be empty".to_string(),
            ));
        }
        self.entity.post(
            &format!("/cards/{}/actions/comments", self.remote_id),
            &[("text", text.into())],
        )?;
        Ok(())
    }

    /// Replace the card's label set with the given labels in one request.
    pub fn assign_labels(&self, labels: &[Label]) -> Result<(), Error> {
        self.ensure_live()?;
        let mut ids = Vec::with_capacity(labels.len());
        for label in labels {
            ids.push(label.remote_id()?.to_string());
        }
        self.put_field("idLabels", ParamValue::List(ids))
    }

    /// Delete the remote card; the handle is poisoned on success.
    pub fn delete(&mut self) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity
            .delete(&format!("/cards/{}", self.remote_id), &[])?;
        self.deleted = true;
        Ok(())
    }
}
