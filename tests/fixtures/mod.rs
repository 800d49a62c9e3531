//! Shared fixtures for room-protocol scenario tests.
//!
//! ユースケースを InMemoryRoomStore と ManualClock で束ねたハーネス。
//! 時間は ManualClock で進めるので、TTL 絡みのシナリオでも sleep しない。

use std::sync::Arc;

use tachibanashi::common::time::ManualClock;
use tachibanashi::domain::{ChatMessage, RoomId};
use tachibanashi::infrastructure::publisher::BroadcastEventPublisher;
use tachibanashi::infrastructure::repository::InMemoryRoomStore;
use tachibanashi::usecase::{
    AdmitError, AdmitParticipantUseCase, Admission, AuthError, AuthenticateSessionUseCase,
    CreateRoomUseCase, DestroyRoomUseCase, GetRoomTtlUseCase, ListMessagesUseCase,
    PostMessageError, PostMessageUseCase, Session,
};

/// In-process application wiring used by the scenario tests.
pub struct TestApp {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryRoomStore>,
    pub publisher: Arc<BroadcastEventPublisher>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = ManualClock::new(0);
        let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
        let publisher = Arc::new(BroadcastEventPublisher::new());
        Self {
            clock,
            store,
            publisher,
        }
    }

    pub async fn create_room(&self) -> RoomId {
        CreateRoomUseCase::new(self.store.clone(), self.clock.clone())
            .execute()
            .await
            .unwrap()
    }

    pub async fn join(
        &self,
        room_id: &RoomId,
        presented_token: Option<&str>,
    ) -> Result<Admission, AdmitError> {
        AdmitParticipantUseCase::new(self.store.clone())
            .execute(room_id, presented_token)
            .await
    }

    pub async fn authenticate(
        &self,
        room_id: &RoomId,
        token: &str,
    ) -> Result<Session, AuthError> {
        AuthenticateSessionUseCase::new(self.store.clone())
            .execute(Some(room_id.as_str()), Some(token))
            .await
    }

    pub async fn post(
        &self,
        session: &Session,
        sender: &str,
        text: &str,
    ) -> Result<ChatMessage, PostMessageError> {
        PostMessageUseCase::new(
            self.store.clone(),
            self.publisher.clone(),
            self.clock.clone(),
        )
        .execute(session, sender.to_string(), text.to_string())
        .await
    }

    pub async fn list(&self, session: &Session) -> Vec<ChatMessage> {
        ListMessagesUseCase::new(self.store.clone())
            .execute(session)
            .await
            .unwrap()
    }

    pub async fn ttl(&self, session: &Session) -> u64 {
        GetRoomTtlUseCase::new(self.store.clone())
            .execute(session)
            .await
            .unwrap()
    }

    pub async fn destroy(&self, session: &Session) {
        DestroyRoomUseCase::new(self.store.clone(), self.publisher.clone())
            .execute(session)
            .await
            .unwrap()
    }
}
