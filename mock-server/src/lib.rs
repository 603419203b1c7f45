//! In-memory Trello API stand-in for integration tests.
//!
//! Mirrors the subset of the real API the client uses: query-parameter
//! auth (`key`/`token`, writes need both), all mutation arguments in the
//! query string, JSON responses with Trello's field names. Board deletion
//! cascades to the board's lists, cards, and labels.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardPrefs {
    #[serde(rename = "permissionLevel")]
    pub permission_level: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardRec {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub prefs: BoardPrefs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRec {
    pub id: String,
    pub name: String,
    pub closed: bool,
    #[serde(rename = "idBoard")]
    pub id_board: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardRec {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    #[serde(rename = "idList")]
    pub id_list: String,
    #[serde(rename = "idBoard")]
    pub id_board: String,
    #[serde(rename = "idLabels")]
    pub id_labels: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelRec {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    #[serde(rename = "idBoard")]
    pub id_board: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

#[derive(Default)]
pub struct Store {
    pub boards: HashMap<String, BoardRec>,
    pub lists: HashMap<String, ListRec>,
    pub cards: HashMap<String, CardRec>,
    pub labels: HashMap<String, LabelRec>,
    pub actions: Vec<ActionRec>,
}

pub type Db = Arc<RwLock<Store>>;

type Params = Query<HashMap<String, String>>;

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// key is required for everything; writes additionally require a token.
fn check_auth(params: &HashMap<String, String>, write: bool) -> Result<(), StatusCode> {
    let has = |name: &str| params.get(name).is_some_and(|v| !v.is_empty());
    if !has("key") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if write && !has("token") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/1/members/me", get(me))
        .route("/1/members/me/boards", get(my_boards))
        .route("/1/boards", post(create_board))
        .route(
            "/1/boards/{id}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route("/1/boards/{id}/lists", get(board_lists))
        .route("/1/boards/{id}/labels", get(board_labels))
        .route("/1/lists", post(create_list))
        .route("/1/lists/{id}", get(get_list))
        .route("/1/lists/{id}/cards", get(list_cards))
        .route("/1/lists/{id}/{field}", put(update_list_field))
        .route("/1/cards", post(create_card))
        .route("/1/cards/{id}", get(get_card).delete(delete_card))
        .route("/1/cards/{id}/actions/comments", post(comment_card))
        .route("/1/cards/{id}/{field}", put(update_card_field))
        .route("/1/labels", post(create_label))
        .route("/1/labels/{id}", get(get_label).delete(delete_label))
        .route("/1/labels/{id}/{field}", put(update_label_field))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn me(Query(q): Params) -> Result<Json<Value>, StatusCode> {
    check_auth(&q, false)?;
    Ok(Json(json!({ "id": "me1", "username": "tester" })))
}

async fn my_boards(State(db): State<Db>, Query(q): Params) -> Result<Json<Vec<BoardRec>>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    let mut boards: Vec<BoardRec> = store
        .boards
        .values()
        .filter(|b| !b.closed)
        .cloned()
        .collect();
    boards.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(boards))
}

async fn create_board(State(db): State<Db>, Query(q): Params) -> Result<Json<BoardRec>, StatusCode> {
    check_auth(&q, true)?;
    let name = q.get("name").ok_or(StatusCode::BAD_REQUEST)?;
    let board = BoardRec {
        id: new_id(),
        name: name.clone(),
        desc: q.get("desc").cloned().unwrap_or_default(),
        closed: false,
        prefs: BoardPrefs {
            permission_level: q
                .get("prefs_permissionLevel")
                .cloned()
                .unwrap_or_else(|| "private".to_string()),
        },
    };
    db.write().await.boards.insert(board.id.clone(), board.clone());
    Ok(Json(board))
}

async fn get_board(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<BoardRec>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    store.boards.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_board(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<BoardRec>, StatusCode> {
    check_auth(&q, true)?;
    let mut store = db.write().await;
    let board = store.boards.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = q.get("name") {
        board.name = name.clone();
    }
    if let Some(desc) = q.get("desc") {
        board.desc = desc.clone();
    }
    if let Some(closed) = q.get("closed") {
        board.closed = closed == "true";
    }
    if let Some(level) = q.get("prefs.permissionLevel") {
        board.prefs.permission_level = level.clone();
    }
    Ok(Json(board.clone()))
}

async fn delete_board(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&q, true)?;
    let mut store = db.write().await;
    store.boards.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.lists.retain(|_, l| l.id_board != id);
    store.cards.retain(|_, c| c.id_board != id);
    store.labels.retain(|_, l| l.id_board != id);
    Ok(Json(json!({ "_value": null })))
}

async fn board_lists(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Vec<ListRec>>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    if !store.boards.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut lists: Vec<ListRec> = store
        .lists
        .values()
        .filter(|l| l.id_board == id)
        .cloned()
        .collect();
    lists.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(lists))
}

async fn board_labels(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Vec<LabelRec>>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    if !store.boards.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut labels: Vec<LabelRec> = store
        .labels
        .values()
        .filter(|l| l.id_board == id)
        .cloned()
        .collect();
    labels.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(labels))
}

async fn create_list(State(db): State<Db>, Query(q): Params) -> Result<Json<ListRec>, StatusCode> {
    check_auth(&q, true)?;
    let name = q.get("name").ok_or(StatusCode::BAD_REQUEST)?;
    let id_board = q.get("idBoard").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    if !store.boards.contains_key(id_board) {
        return Err(StatusCode::NOT_FOUND);
    }
    let list = ListRec {
        id: new_id(),
        name: name.clone(),
        closed: false,
        id_board: id_board.clone(),
    };
    store.lists.insert(list.id.clone(), list.clone());
    Ok(Json(list))
}

async fn get_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<ListRec>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    store.lists.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_list_field(
    State(db): State<Db>,
    Path((id, field)): Path<(String, String)>,
    Query(q): Params,
) -> Result<Json<ListRec>, StatusCode> {
    check_auth(&q, true)?;
    let value = q.get("value").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    let list = store.lists.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    match field.as_str() {
        "name" => list.name = value.clone(),
        "closed" => list.closed = value == "true",
        _ => return Err(StatusCode::BAD_REQUEST),
    }
    Ok(Json(list.clone()))
}

async fn list_cards(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Vec<CardRec>>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    if !store.lists.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut cards: Vec<CardRec> = store
        .cards
        .values()
        .filter(|c| c.id_list == id)
        .cloned()
        .collect();
    cards.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(cards))
}

async fn create_card(State(db): State<Db>, Query(q): Params) -> Result<Json<CardRec>, StatusCode> {
    check_auth(&q, true)?;
    let name = q.get("name").ok_or(StatusCode::BAD_REQUEST)?;
    let id_list = q.get("idList").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    let id_board = store
        .lists
        .get(id_list)
        .map(|l| l.id_board.clone())
        .ok_or(StatusCode::NOT_FOUND)?;
    let card = CardRec {
        id: new_id(),
        name: name.clone(),
        desc: q.get("desc").cloned().unwrap_or_default(),
        closed: false,
        id_list: id_list.clone(),
        id_board,
        id_labels: Vec::new(),
    };
    store.cards.insert(card.id.clone(), card.clone());
    Ok(Json(card))
}

async fn get_card(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<CardRec>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    store.cards.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_card_field(
    State(db): State<Db>,
    Path((id, field)): Path<(String, String)>,
    Query(q): Params,
) -> Result<Json<CardRec>, StatusCode> {
    check_auth(&q, true)?;
    let value = q.get("value").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    let card = store.cards.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    match field.as_str() {
        "name" => card.name = value.clone(),
        "desc" => card.desc = value.clone(),
        "closed" => card.closed = value == "true",
        "idList" => card.id_list = value.clone(),
        "idBoard" => card.id_board = value.clone(),
        "idLabels" => {
            card.id_labels = if value.is_empty() {
                Vec::new()
            } else {
                value.split(',').map(str::to_string).collect()
            };
        }
        _ => return Err(StatusCode::BAD_REQUEST),
    }
    Ok(Json(card.clone()))
}

async fn delete_card(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&q, true)?;
    let mut store = db.write().await;
    store.cards.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "_value": null })))
}

async fn comment_card(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<ActionRec>, StatusCode> {
    check_auth(&q, true)?;
    let text = q.get("text").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    if !store.cards.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let action = ActionRec {
        id: new_id(),
        kind: "commentCard".to_string(),
        data: json!({ "text": text, "card": { "id": id } }),
    };
    store.actions.push(action.clone());
    Ok(Json(action))
}

async fn create_label(State(db): State<Db>, Query(q): Params) -> Result<Json<LabelRec>, StatusCode> {
    check_auth(&q, true)?;
    let name = q.get("name").ok_or(StatusCode::BAD_REQUEST)?;
    let id_board = q.get("idBoard").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    if !store.boards.contains_key(id_board) {
        return Err(StatusCode::NOT_FOUND);
    }
    let color = q.get("color").filter(|c| c.as_str() != "null").cloned();
    let label = LabelRec {
        id: new_id(),
        name: name.clone(),
        color,
        id_board: id_board.clone(),
    };
    store.labels.insert(label.id.clone(), label.clone());
    Ok(Json(label))
}

async fn get_label(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<LabelRec>, StatusCode> {
    check_auth(&q, false)?;
    let store = db.read().await;
    store.labels.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_label_field(
    State(db): State<Db>,
    Path((id, field)): Path<(String, String)>,
    Query(q): Params,
) -> Result<Json<LabelRec>, StatusCode> {
    check_auth(&q, true)?;
    let value = q.get("value").ok_or(StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    let label = store.labels.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    match field.as_str() {
        "name" => label.name = value.clone(),
        "color" => {
            label.color = if value == "null" {
                None
            } else {
                Some(value.clone())
            };
        }
        _ => return Err(StatusCode::BAD_REQUEST),
    }
    Ok(Json(label.clone()))
}

async fn delete_label(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(q): Params,
) -> Result<Json<Value>, StatusCode> {
    check_auth(&q, true)?;
    let mut store = db.write().await;
    store.labels.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.cards.values_mut().for_each(|c| c.id_labels.retain(|l| l != &id));
    Ok(Json(json!({ "_value": null })))
}
