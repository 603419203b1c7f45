use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ActionRec, BoardRec, CardRec, ListRec};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn req(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_unauthorized() {
    let app = app();
    let resp = app.oneshot(req("GET", "/1/members/me")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn write_without_token_is_unauthorized() {
    let app = app();
    let resp = app
        .oneshot(req("POST", "/1/boards?name=B&key=k"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn read_with_key_only_is_allowed() {
    let app = app();
    let resp = app.oneshot(req("GET", "/1/members/me?key=k")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let me: serde_json::Value = body_json(resp).await;
    assert_eq!(me["username"], "tester");
}

// --- boards ---

#[tokio::test]
async fn create_board_defaults_to_private() {
    let app = app();
    let resp = app
        .oneshot(req("POST", "/1/boards?name=Errands&key=k&token=t"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let board: BoardRec = body_json(resp).await;
    assert_eq!(board.name, "Errands");
    assert!(!board.closed);
    assert_eq!(board.prefs.permission_level, "private");
    assert!(!board.id.is_empty());
}

#[tokio::test]
async fn get_missing_board_is_404() {
    let app = app();
    let resp = app.oneshot(req("GET", "/1/boards/nope?key=k")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_board_applies_dotted_prefs() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(req("POST", "/1/boards?name=B&key=k&token=t"))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;

    let uri = format!(
        "/1/boards/{}?name=Renamed&prefs.permissionLevel=public&key=k&token=t",
        board.id
    );
    let resp = app.clone().oneshot(req("PUT", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(req("GET", &format!("/1/boards/{}?key=k", board.id)))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;
    assert_eq!(board.name, "Renamed");
    assert_eq!(board.prefs.permission_level, "public");
}

#[tokio::test]
async fn deleting_a_board_cascades_to_its_lists() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(req("POST", "/1/boards?name=B&key=k&token=t"))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;

    let uri = format!("/1/lists?name=Today&idBoard={}&key=k&token=t", board.id);
    let resp = app.clone().oneshot(req("POST", &uri)).await.unwrap();
    let list: ListRec = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(req(
            "DELETE",
            &format!("/1/boards/{}?key=k&token=t", board.id),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(req("GET", &format!("/1/lists/{}?key=k", list.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cards ---

#[tokio::test]
async fn card_field_put_updates_one_field() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(req("POST", "/1/boards?name=B&key=k&token=t"))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/lists?name=L&idBoard={}&key=k&token=t", board.id),
        ))
        .await
        .unwrap();
    let list: ListRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/cards?name=C&idList={}&key=k&token=t", list.id),
        ))
        .await
        .unwrap();
    let card: CardRec = body_json(resp).await;
    assert_eq!(card.id_board, board.id);

    let resp = app
        .clone()
        .oneshot(req(
            "PUT",
            &format!("/1/cards/{}/name?value=Renamed&key=k&token=t", card.id),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(req("GET", &format!("/1/cards/{}?key=k", card.id)))
        .await
        .unwrap();
    let card: CardRec = body_json(resp).await;
    assert_eq!(card.name, "Renamed");
    assert_eq!(card.desc, "");
}

#[tokio::test]
async fn unknown_card_field_is_rejected() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(req("POST", "/1/boards?name=B&key=k&token=t"))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/lists?name=L&idBoard={}&key=k&token=t", board.id),
        ))
        .await
        .unwrap();
    let list: ListRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/cards?name=C&idList={}&key=k&token=t", list.id),
        ))
        .await
        .unwrap();
    let card: CardRec = body_json(resp).await;

    let resp = app
        .oneshot(req(
            "PUT",
            &format!("/1/cards/{}/bogus?value=x&key=k&token=t", card.id),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn commenting_creates_an_action() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(req("POST", "/1/boards?name=B&key=k&token=t"))
        .await
        .unwrap();
    let board: BoardRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/lists?name=L&idBoard={}&key=k&token=t", board.id),
        ))
        .await
        .unwrap();
    let list: ListRec = body_json(resp).await;
    let resp = app
        .clone()
        .oneshot(req(
            "POST",
            &format!("/1/cards?name=C&idList={}&key=k&token=t", list.id),
        ))
        .await
        .unwrap();
    let card: CardRec = body_json(resp).await;

    let resp = app
        .oneshot(req(
            "POST",
            &format!(
                "/1/cards/{}/actions/comments?text=done&key=k&token=t",
                card.id
            ),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let action: ActionRec = body_json(resp).await;
    assert_eq!(action.kind, "commentCard");
    assert_eq!(action.data["text"], "done");
    assert_eq!(action.data["card"]["id"], card.id);
}
