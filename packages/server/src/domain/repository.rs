//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `RoomRegistry`: Room コードと接続 ID の対応（メンバーシップ）
//! - `FeatureStateCache`: 復元用のフィーチャー状態（揮発性キャッシュ）

use async_trait::async_trait;

use super::{
    entity::{CachedFeatureState, RoomDeparture, RoomEntered, RoomSnapshot, ScopeFilter},
    error::RoomError,
    value_object::{ConnectionId, FeatureKind, RoomCode, RoomName, RoomScope, Timestamp},
};

/// Room Registry trait
///
/// Room は参加者がいる間だけ存在します。最後の参加者が抜けた瞬間にエントリは
/// 削除され、同じコードは即座に再利用可能になります。
///
/// 入室判定と登録は必ず一回のロック取得の中で行われます
/// （判定と登録の間に他の接続の入室・退室が割り込まない）。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Session スコープが空であれば `creator` を最初の参加者として登録する
    ///
    /// 既に参加者がいる場合は `RoomError::CodeInUse`。
    /// `creator` が別の Session Room にいた場合はそこから退室し、
    /// その退室が `RoomEntered::moved_out` に入る。
    async fn create_room(
        &self,
        code: RoomCode,
        name: Option<RoomName>,
        creator: ConnectionId,
        at: Timestamp,
    ) -> Result<RoomEntered, RoomError>;

    /// 参加者のいる Session Room に入室する
    ///
    /// 参加者がいない場合は `RoomError::RoomNotFound`。
    async fn join_room(
        &self,
        code: &RoomCode,
        connection_id: ConnectionId,
        at: Timestamp,
    ) -> Result<RoomEntered, RoomError>;

    /// Board スコープに入室する（存在チェックなし、必要なら作成）
    async fn join_board(
        &self,
        code: RoomCode,
        connection_id: ConnectionId,
        at: Timestamp,
    ) -> RoomEntered;

    /// 接続の全メンバーシップを削除する
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture>;

    /// 指定スコープの参加者 ID を取得（重複なし）
    async fn members(&self, code: &RoomCode, scope: ScopeFilter) -> Vec<ConnectionId>;

    /// 指定スコープの参加者数を取得
    async fn count_members(&self, code: &RoomCode, scope: RoomScope) -> usize;

    /// Session スコープに参加者が一人以上いるか
    async fn is_occupied(&self, code: &RoomCode) -> bool;

    /// 接続が指定スコープで参加している Room コード
    async fn room_of(&self, connection_id: &ConnectionId, scope: RoomScope) -> Option<RoomCode>;

    /// Room のスナップショットを取得
    async fn room(&self, code: &RoomCode) -> Option<RoomSnapshot>;

    /// 全 Room のスナップショットを取得（コード順）
    async fn rooms(&self) -> Vec<RoomSnapshot>;
}

/// Feature State Cache trait
///
/// Room コードとフィーチャーごとに最後に届いた状態を一つだけ保持します
/// （last-write-wins、バージョン管理なし、発行者の検証なし）。
#[async_trait]
pub trait FeatureStateCache: Send + Sync {
    /// 状態を保存し、置き換えられた古い状態を返す
    async fn store(
        &self,
        code: RoomCode,
        entry: CachedFeatureState,
    ) -> Option<CachedFeatureState>;

    /// 状態を取得（読み取りで状態は変化しない）
    async fn load(&self, code: &RoomCode, feature: FeatureKind) -> Option<CachedFeatureState>;

    /// Room にキャッシュされているフィーチャーの一覧
    async fn features(&self, code: &RoomCode) -> Vec<FeatureKind>;

    /// Room の全状態を削除し、削除した件数を返す
    async fn purge_room(&self, code: &RoomCode) -> usize;
}
