//! Labels and the closed color palette Trello defines for them.

use serde::Deserialize;

use crate::board::Board;
use crate::entity::Entity;
use crate::error::Error;
use crate::http::HttpResponse;

/// Trello's fixed label palette. `None` is the colorless label, which the
/// API spells `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    None,
    Black,
    Red,
    Orange,
    Yellow,
    LimeGreen,
    Green,
    SkyBlue,
    Blue,
    Purple,
    Pink,
}

impl Color {
    /// The token the API expects for this color.
    pub fn as_token(self) -> &'static str {
        match self {
            Color::None => "null",
            Color::Black => "black",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::LimeGreen => "lime",
            Color::Green => "green",
            Color::SkyBlue => "sky",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }

    fn from_token(token: &str) -> Self {
        match token {
            "black" => Color::Black,
            "red" => Color::Red,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "lime" => Color::LimeGreen,
            "green" => Color::Green,
            "sky" => Color::SkyBlue,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "pink" => Color::Pink,
            _ => Color::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LabelData {
    id: String,
    #[serde(default)]
    name: String,
    /// The API returns JSON `null` for a colorless label.
    #[serde(default)]
    color: Option<String>,
    #[serde(rename = "idBoard", default)]
    id_board: String,
}

/// A bound label handle. Read-through and write-through like lists and
/// cards; a successful [`Label::delete`] poisons the handle.
#[derive(Debug, Clone)]
pub struct Label {
    entity: Entity,
    remote_id: String,
    deleted: bool,
}

impl Label {
    /// Create a label on `board` and return the bound handle.
    pub fn create(board: &Board, name: &str, color: Color) -> Result<Self, Error> {
        let board_id = board.remote_id()?.to_string();
        let entity = board.entity();
        let response = entity.post(
            "/labels",
            &[
                ("name", name.into()),
                ("color", color.as_token().into()),
                ("idBoard", board_id.into()),
            ],
        )?;
        let data: LabelData = response.json()?;
        Ok(Self {
            entity: entity.clone(),
            remote_id: data.id,
            deleted: false,
        })
    }

    /// Wrap a known remote id without a request.
    pub fn bind_existing(entity: &Entity, remote_id: impl Into<String>) -> Result<Self, Error> {
        let remote_id = remote_id.into();
        if remote_id.is_empty() {
            return Err(Error::Validation("label id must not be empty".to_string()));
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
        let items: Vec<LabelData> = response.json()?;
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
            return Err(Error::InvalidState("label was deleted"));
        }
        Ok(())
    }

    pub fn remote_id(&self) -> Result<&str, Error> {
        self.ensure_live()?;
        Ok(&self.remote_id)
    }

    fn fetch(&self) -> Result<LabelData, Error> {
        self.ensure_live()?;
        let response = self
            .entity
            .get(&format!("/labels/{}", self.remote_id), &[])?;
        response.json()
    }

    pub fn name(&self) -> Result<String, Error> {
        Ok(self.fetch()?.name)
    }

    pub fn color(&self) -> Result<Color, Error> {
        let data = self.fetch()?;
        Ok(data
            .color
            .as_deref()
            .map(Color::from_token)
            .unwrap_or(Color::None))
    }

    pub fn board_id(&self) -> Result<String, Error> {
        Ok(self.fetch()?.id_board)
    }

    pub fn set_name(&self, name: &str) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity.put(
            &format!("/labels/{}/name", self.remote_id),
            &[("value", name.into())],
        )?;
        Ok(())
    }

    pub fn set_color(&self, color: Color) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity.put(
            &format!("/labels/{}/color", self.remote_id),
            &[("value", color.as_token().into())],
        )?;
        Ok(())
    }

    /// Delete the remote label; the handle is poisoned on success.
    pub fn delete(&mut self) -> Result<(), Error> {
        self.ensure_live()?;
        self.entity
            .delete(&format!("/labels/{}", self.remote_id), &[])?;
        self.deleted = true;
        Ok(())
    }
}
