//! HTTP API endpoint handlers.
//!
//! Status mapping: both authorization failures surface as a uniform
//! 403 so the response does not reveal which half of the credential
//! check failed. `RoomNotFound` and `RoomFull` stay distinct (404/409)
//! so the client can render a specific message.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    domain::{ROOM_TTL_SECONDS, RoomId, SessionToken},
    infrastructure::dto::http::{
        CreateRoomResponse, JoinRoomResponse, ListMessagesResponse, MessageDto,
        PostMessageRequest, PostMessageResponse, TtlResponse,
    },
    ui::state::AppState,
    usecase::{
        AdmitError, AdmitParticipantUseCase, AuthError, AuthenticateSessionUseCase,
        CreateRoomUseCase, DestroyRoomUseCase, GetRoomTtlUseCase, ListMessagesUseCase,
        PostMessageError, PostMessageUseCase, Session,
    },
};

/// Cookie carrying the session token, scoped to the whole application
pub const SESSION_COOKIE: &str = "session_token";

/// Extract the presented session token from the Cookie header.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Build the Set-Cookie value for an issued session token.
fn session_cookie_value(token: &SessionToken) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={ROOM_TTL_SECONDS}",
        token.as_str()
    )
}

/// Authenticate a room-scoped request. Uniform 403 on denial.
pub(crate) async fn authenticate(
    state: &AppState,
    room_id: &str,
    headers: &HeaderMap,
) -> Result<Session, StatusCode> {
    let token = token_from_headers(headers);
    AuthenticateSessionUseCase::new(state.store.clone())
        .execute(Some(room_id), token.as_deref())
        .await
        .map_err(|e| match e {
            AuthError::Unauthorized | AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a fresh room with an empty membership list.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreateRoomResponse>, StatusCode> {
    let usecase = CreateRoomUseCase::new(state.store.clone(), state.clock.clone());
    let room_id = usecase
        .execute()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(CreateRoomResponse {
        room_id: room_id.into_string(),
    }))
}

/// Admission endpoint: joins the room and sets the session cookie.
///
/// An already-admitted token presented via cookie is returned unchanged
/// (idempotent re-entry on page reload).
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    // A non-UUID id cannot name an existing room
    let Ok(room_id) = RoomId::new(room_id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    let presented = token_from_headers(&headers);

    let usecase = AdmitParticipantUseCase::new(state.store.clone());
    match usecase.execute(&room_id, presented.as_deref()).await {
        Ok(admission) => {
            let cookie = HeaderValue::from_str(&session_cookie_value(&admission.token))
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            let mut response = Json(JoinRoomResponse {
                room_id: room_id.into_string(),
            })
            .into_response();
            response.headers_mut().insert(header::SET_COOKIE, cookie);
            Ok(response)
        }
        Err(AdmitError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(AdmitError::RoomFull) => Err(StatusCode::CONFLICT),
        Err(AdmitError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Remaining room lifetime in whole seconds (0 once expired).
pub async fn get_room_ttl(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TtlResponse>, StatusCode> {
    let session = authenticate(&state, &room_id, &headers).await?;

    let ttl = GetRoomTtlUseCase::new(state.store.clone())
        .execute(&session)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(TtlResponse { ttl }))
}

/// Append a message to the room's log.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, StatusCode> {
    let session = authenticate(&state, &room_id, &headers).await?;

    let usecase = PostMessageUseCase::new(
        state.store.clone(),
        state.publisher.clone(),
        state.clock.clone(),
    );
    match usecase.execute(&session, body.sender, body.text).await {
        Ok(message) => Ok(Json(PostMessageResponse {
            message: MessageDto::from(message),
        })),
        Err(PostMessageError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(PostMessageError::Validation(_)) => Err(StatusCode::BAD_REQUEST),
        Err(PostMessageError::Store(_)) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Read the full message log, token-redacted for everyone but the author.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ListMessagesResponse>, StatusCode> {
    let session = authenticate(&state, &room_id, &headers).await?;

    let messages = ListMessagesUseCase::new(state.store.clone())
        .execute(&session)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(ListMessagesResponse {
        messages: messages.into_iter().map(MessageDto::from).collect(),
    }))
}

/// Destroy the room early. Participants are notified before teardown.
pub async fn destroy_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let session = authenticate(&state, &room_id, &headers).await?;

    DestroyRoomUseCase::new(state.store.clone(), state.publisher.clone())
        .execute(&session)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
