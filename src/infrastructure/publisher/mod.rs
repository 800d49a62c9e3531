//! イベントチャンネルの実装
//!
//! ルームごとに 1 本の tokio broadcast チャンネルを持ち、配信は
//! ベストエフォート・at-most-once。切断中の購読者はイベントを
//! 取りこぼし、再接続時に読み取り操作で整合を取り直します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};

use crate::domain::{EventPublisher, RoomEvent, RoomId};

/// ルームごとの broadcast チャンネル容量
const CHANNEL_CAPACITY: usize = 64;

/// ルーム単位の broadcast チャンネルによる EventPublisher 実装
pub struct BroadcastEventPublisher {
    channels: Mutex<HashMap<String, broadcast::Sender<RoomEvent>>>,
}

impl BroadcastEventPublisher {
    /// 新しい BroadcastEventPublisher を作成
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// ルームのチャンネルを購読する（無ければ作る）
    pub async fn subscribe(&self, room_id: &RoomId) -> broadcast::Receiver<RoomEvent> {
        let mut channels = self.channels.lock().await;
        // 購読者の残っていないチャンネルはここで回収する。受動的に
        // 失効したルームは chat.destroy を発行しないため、回収しないと
        // マップが際限なく成長する
        channels.retain(|_, tx| tx.receiver_count() > 0);
        let tx = channels
            .entry(room_id.as_str().to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone();
        tx.subscribe()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, room_id: &RoomId, event: RoomEvent) {
        let destroyed = matches!(event, RoomEvent::RoomDestroyed);

        let mut channels = self.channels.lock().await;
        let deserted = match channels.get(room_id.as_str()) {
            // 購読者ゼロの send はエラーを返すが、ベストエフォートなので無視
            Some(tx) => {
                let err = tx.send(event).is_err();
                if err {
                    tracing::debug!(room_id = %room_id, "event published with no subscribers");
                }
                err
            }
            None => {
                tracing::debug!(room_id = %room_id, "no channel for room, event dropped");
                false
            }
        };

        // 破棄後のチャンネルは残さない。以降の購読者は新しい（空の）
        // チャンネルを得るだけで、破棄済みイベントは再配信されない。
        // 全購読者が去ったチャンネルも同様に回収する
        if destroyed || deserted {
            channels.remove(room_id.as_str());
        }
    }
}
