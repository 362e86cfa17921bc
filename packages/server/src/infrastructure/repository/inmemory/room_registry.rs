//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! Room コード → 参加者の対応と、接続 → 参加中 Room の逆引きを同じロックの下で管理します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, RoomCode, RoomDeparture, RoomEntered, RoomError, RoomMember, RoomName,
    RoomRegistry, RoomScope, RoomSnapshot, ScopeFilter, Timestamp,
};

/// Room entry: present only while at least one scope has members
#[derive(Debug)]
struct RoomEntry {
    name: Option<RoomName>,
    created_at: Timestamp,
    session: HashMap<ConnectionId, Timestamp>,
    board: HashMap<ConnectionId, Timestamp>,
}

impl RoomEntry {
    fn new(created_at: Timestamp) -> Self {
        Self {
            name: None,
            created_at,
            session: HashMap::new(),
            board: HashMap::new(),
        }
    }

    fn scope(&self, scope: RoomScope) -> &HashMap<ConnectionId, Timestamp> {
        match scope {
            RoomScope::Session => &self.session,
            RoomScope::Board => &self.board,
        }
    }

    fn scope_mut(&mut self, scope: RoomScope) -> &mut HashMap<ConnectionId, Timestamp> {
        match scope {
            RoomScope::Session => &mut self.session,
            RoomScope::Board => &mut self.board,
        }
    }

    fn is_empty(&self) -> bool {
        self.session.is_empty() && self.board.is_empty()
    }

    fn snapshot(&self, code: &RoomCode) -> RoomSnapshot {
        let mut members: Vec<RoomMember> = [RoomScope::Session, RoomScope::Board]
            .into_iter()
            .flat_map(|scope| {
                self.scope(scope)
                    .iter()
                    .map(move |(connection_id, joined_at)| RoomMember {
                        connection_id: connection_id.clone(),
                        scope,
                        joined_at: *joined_at,
                    })
            })
            .collect();
        members.sort_by(|a, b| {
            (a.scope == RoomScope::Board, a.joined_at, &a.connection_id).cmp(&(
                b.scope == RoomScope::Board,
                b.joined_at,
                &b.connection_id,
            ))
        });

        RoomSnapshot {
            code: code.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            members,
        }
    }
}

/// Rooms a single connection belongs to, at most one per scope
#[derive(Debug, Default)]
struct ConnectionRooms {
    session: Option<RoomCode>,
    board: Option<RoomCode>,
}

impl ConnectionRooms {
    fn slot_mut(&mut self, scope: RoomScope) -> &mut Option<RoomCode> {
        match scope {
            RoomScope::Session => &mut self.session,
            RoomScope::Board => &mut self.board,
        }
    }

    fn slot(&self, scope: RoomScope) -> Option<&RoomCode> {
        match scope {
            RoomScope::Session => self.session.as_ref(),
            RoomScope::Board => self.board.as_ref(),
        }
    }

    fn is_empty(&self) -> bool {
        self.session.is_none() && self.board.is_none()
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    rooms: HashMap<RoomCode, RoomEntry>,
    connections: HashMap<ConnectionId, ConnectionRooms>,
}

impl RegistryState {
    /// Remove `connection_id` from whatever room it holds in `scope`.
    fn leave_scope(
        &mut self,
        connection_id: &ConnectionId,
        scope: RoomScope,
    ) -> Option<RoomDeparture> {
        let rooms = self.connections.get_mut(connection_id)?;
        let code = rooms.slot_mut(scope).take()?;
        if rooms.is_empty() {
            self.connections.remove(connection_id);
        }

        let entry = self.rooms.get_mut(&code)?;
        entry.scope_mut(scope).remove(connection_id);
        if entry.session.is_empty() {
            entry.name = None;
        }
        let room_removed = entry.is_empty();
        if room_removed {
            self.rooms.remove(&code);
        }

        Some(RoomDeparture {
            code,
            scope,
            room_removed,
        })
    }

    /// Add `connection_id` to `code` in `scope`, leaving its previous room of that scope.
    fn enter_scope(
        &mut self,
        code: &RoomCode,
        connection_id: ConnectionId,
        scope: RoomScope,
        at: Timestamp,
    ) -> (&mut RoomEntry, Option<RoomDeparture>) {
        let already_here = self
            .connections
            .get(&connection_id)
            .and_then(|rooms| rooms.slot(scope))
            .is_some_and(|current| current == code);

        let mut moved_out = None;
        if !already_here {
            moved_out = self.leave_scope(&connection_id, scope);
            if let Some(departure) = &moved_out {
                tracing::debug!(
                    "Connection '{}' moved out of room '{}' ({:?})",
                    connection_id,
                    departure.code,
                    scope
                );
            }
            *self
                .connections
                .entry(connection_id.clone())
                .or_default()
                .slot_mut(scope) = Some(code.clone());
        }

        let entry = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| RoomEntry::new(at));
        entry.scope_mut(scope).entry(connection_id).or_insert(at);
        (entry, moved_out)
    }

    fn entered(
        &mut self,
        code: &RoomCode,
        connection_id: ConnectionId,
        scope: RoomScope,
        at: Timestamp,
    ) -> RoomEntered {
        let (entry, moved_out) = self.enter_scope(code, connection_id, scope, at);
        RoomEntered {
            room: entry.snapshot(code),
            moved_out,
        }
    }
}

/// インメモリ Room Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn create_room(
        &self,
        code: RoomCode,
        name: Option<RoomName>,
        creator: ConnectionId,
        at: Timestamp,
    ) -> Result<RoomEntered, RoomError> {
        let mut state = self.state.lock().await;

        let occupied = state
            .rooms
            .get(&code)
            .is_some_and(|entry| !entry.session.is_empty());
        if occupied {
            return Err(RoomError::CodeInUse(code.into_string()));
        }

        let (entry, moved_out) = state.enter_scope(&code, creator, RoomScope::Session, at);
        entry.name = name;
        Ok(RoomEntered {
            room: entry.snapshot(&code),
            moved_out,
        })
    }

    async fn join_room(
        &self,
        code: &RoomCode,
        connection_id: ConnectionId,
        at: Timestamp,
    ) -> Result<RoomEntered, RoomError> {
        let mut state = self.state.lock().await;

        let occupied = state
            .rooms
            .get(code)
            .is_some_and(|entry| !entry.session.is_empty());
        if !occupied {
            return Err(RoomError::RoomNotFound(code.as_str().to_string()));
        }

        Ok(state.entered(code, connection_id, RoomScope::Session, at))
    }

    async fn join_board(
        &self,
        code: RoomCode,
        connection_id: ConnectionId,
        at: Timestamp,
    ) -> RoomEntered {
        let mut state = self.state.lock().await;
        state.entered(&code, connection_id, RoomScope::Board, at)
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture> {
        let mut state = self.state.lock().await;
        [RoomScope::Session, RoomScope::Board]
            .into_iter()
            .filter_map(|scope| state.leave_scope(connection_id, scope))
            .collect()
    }

    async fn members(&self, code: &RoomCode, scope: ScopeFilter) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        let Some(entry) = state.rooms.get(code) else {
            return Vec::new();
        };

        let mut members: Vec<ConnectionId> = [RoomScope::Session, RoomScope::Board]
            .into_iter()
            .filter(|s| scope.matches(*s))
            .flat_map(|s| entry.scope(s).keys().cloned())
            .collect();
        members.sort();
        members.dedup();
        members
    }

    async fn count_members(&self, code: &RoomCode, scope: RoomScope) -> usize {
        let state = self.state.lock().await;
        state
            .rooms
            .get(code)
            .map(|entry| entry.scope(scope).len())
            .unwrap_or(0)
    }

    async fn is_occupied(&self, code: &RoomCode) -> bool {
        let state = self.state.lock().await;
        state
            .rooms
            .get(code)
            .is_some_and(|entry| !entry.session.is_empty())
    }

    async fn room_of(&self, connection_id: &ConnectionId, scope: RoomScope) -> Option<RoomCode> {
        let state = self.state.lock().await;
        state
            .connections
            .get(connection_id)
            .and_then(|rooms| rooms.slot(scope).cloned())
    }

    async fn room(&self, code: &RoomCode) -> Option<RoomSnapshot> {
        let state = self.state.lock().await;
        state.rooms.get(code).map(|entry| entry.snapshot(code))
    }

    async fn rooms(&self) -> Vec<RoomSnapshot> {
        let state = self.state.lock().await;
        let mut rooms: Vec<RoomSnapshot> = state
            .rooms
            .iter()
            .map(|(code, entry)| entry.snapshot(code))
            .collect();
        rooms.sort_by(|a, b| a.code.cmp(&b.code));
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 作成・入室・退室によるメンバーシップの変化
    // - Room の存在が「参加者がいること」だけで決まること
    // - スコープ（Session / Board）ごとの独立性
    //
    // 【なぜこのテストが必要か】
    // - 入室判定（CodeInUse / RoomNotFound）の正しさは全てこの Registry に依存する
    // - 切断時にメンバーシップが暗黙的に消えないとファンアウト先がずれる
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_registers_creator() {
        // テスト項目: Room 作成時に作成者が最初の参加者として登録される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let name = RoomName::parse(Some("Design review".to_string())).unwrap();

        // when (操作):
        let snapshot = registry
            .create_room(code("ABC123"), name, conn("x"), Timestamp::new(1000))
            .await
            .unwrap()
            .room;

        // then (期待する結果):
        assert_eq!(snapshot.code.as_str(), "ABC123");
        assert_eq!(snapshot.name.as_ref().unwrap().as_str(), "Design review");
        assert_eq!(snapshot.count_in(RoomScope::Session), 1);
        assert!(registry.is_occupied(&code("ABC123")).await);
    }

    #[tokio::test]
    async fn test_create_room_with_occupied_code_fails() {
        // テスト項目: 参加者のいるコードで作成すると CodeInUse になる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .create_room(code("ABC123"), None, conn("x"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let result = registry
            .create_room(code("ABC123"), None, conn("y"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::CodeInUse("ABC123".to_string())));
        assert_eq!(
            registry.count_members(&code("ABC123"), RoomScope::Session).await,
            1
        );
    }

    #[tokio::test]
    async fn test_join_room_requires_members() {
        // テスト項目: 参加者のいない Room への入室は RoomNotFound になる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let result = registry
            .join_room(&code("GHOST1"), conn("z"), Timestamp::new(1000))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomNotFound("GHOST1".to_string())));
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_room_vanishes_when_last_member_leaves() {
        // テスト項目: 最後の参加者が抜けると Room が消え、コードが再利用できる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .create_room(code("ABC123"), None, conn("x"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let departures = registry.leave_all(&conn("x")).await;

        // then (期待する結果):
        assert_eq!(
            departures,
            vec![RoomDeparture {
                code: code("ABC123"),
                scope: RoomScope::Session,
                room_removed: true,
            }]
        );
        assert!(registry.room(&code("ABC123")).await.is_none());
        assert!(
            registry
                .join_room(&code("ABC123"), conn("z"), Timestamp::new(2000))
                .await
                .is_err()
        );
        assert!(
            registry
                .create_room(code("ABC123"), None, conn("y"), Timestamp::new(3000))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_board_membership_does_not_occupy_session_room() {
        // テスト項目: Board スコープの参加者は Session Room の存在判定に含まれない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .join_board(code("R1"), conn("a"), Timestamp::new(1000))
            .await;

        // when (操作):
        let join_result = registry
            .join_room(&code("R1"), conn("b"), Timestamp::new(2000))
            .await;
        let create_result = registry
            .create_room(code("R1"), None, conn("b"), Timestamp::new(3000))
            .await;

        // then (期待する結果):
        assert!(matches!(join_result, Err(RoomError::RoomNotFound(_))));
        let snapshot = create_result.unwrap().room;
        assert_eq!(snapshot.count_in(RoomScope::Session), 1);
        assert_eq!(snapshot.count_in(RoomScope::Board), 1);
    }

    #[tokio::test]
    async fn test_members_any_scope_is_deduplicated() {
        // テスト項目: 両スコープに参加している接続は Any で一度だけ返される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .create_room(code("R1"), None, conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join_board(code("R1"), conn("a"), Timestamp::new(1001))
            .await;
        registry
            .join_board(code("R1"), conn("b"), Timestamp::new(1002))
            .await;

        // when (操作):
        let any = registry.members(&code("R1"), ScopeFilter::Any).await;
        let session = registry
            .members(&code("R1"), ScopeFilter::Only(RoomScope::Session))
            .await;

        // then (期待する結果):
        assert_eq!(any, vec![conn("a"), conn("b")]);
        assert_eq!(session, vec![conn("a")]);
    }

    #[tokio::test]
    async fn test_joining_another_room_leaves_previous_one() {
        // テスト項目: 同じスコープで別の Room に入ると前の Room から退室する
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .create_room(code("OLD"), None, conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .create_room(code("NEW"), None, conn("b"), Timestamp::new(1001))
            .await
            .unwrap();

        // when (操作):
        let entered = registry
            .join_room(&code("NEW"), conn("a"), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            entered.moved_out,
            Some(RoomDeparture {
                code: code("OLD"),
                scope: RoomScope::Session,
                room_removed: true,
            })
        );
        assert!(registry.room(&code("OLD")).await.is_none());
        assert_eq!(
            registry.room_of(&conn("a"), RoomScope::Session).await,
            Some(code("NEW"))
        );
        assert_eq!(
            registry.count_members(&code("NEW"), RoomScope::Session).await,
            2
        );
    }

    #[tokio::test]
    async fn test_moving_board_reports_remaining_members() {
        // テスト項目: 他の参加者が残る Board から移動した場合、Room は消えない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .join_board(code("B1"), conn("a"), Timestamp::new(1000))
            .await;
        registry
            .join_board(code("B1"), conn("b"), Timestamp::new(1001))
            .await;

        // when (操作):
        let entered = registry
            .join_board(code("B2"), conn("a"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(
            entered.moved_out,
            Some(RoomDeparture {
                code: code("B1"),
                scope: RoomScope::Board,
                room_removed: false,
            })
        );
        assert_eq!(registry.count_members(&code("B1"), RoomScope::Board).await, 1);
    }

    #[tokio::test]
    async fn test_rejoining_same_room_is_idempotent() {
        // テスト項目: 同じ Room への再入室で参加者が重複しない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        registry
            .create_room(code("R1"), None, conn("a"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let entered = registry
            .join_room(&code("R1"), conn("a"), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(entered.moved_out, None);
        let snapshot = entered.room;
        assert_eq!(snapshot.count_in(RoomScope::Session), 1);
        assert_eq!(snapshot.members[0].joined_at, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_room_name_cleared_when_session_empties() {
        // テスト項目: Session の参加者がいなくなると Room 名が消える（Board は残る）
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let name = RoomName::parse(Some("Retro".to_string())).unwrap();
        registry
            .create_room(code("R1"), name, conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join_board(code("R1"), conn("b"), Timestamp::new(1001))
            .await;

        // when (操作):
        let departures = registry.leave_all(&conn("a")).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 1);
        assert!(!departures[0].room_removed);
        let snapshot = registry.room(&code("R1")).await.unwrap();
        assert!(snapshot.name.is_none());
        assert_eq!(snapshot.count_in(RoomScope::Board), 1);
    }

    #[tokio::test]
    async fn test_members_of_unknown_room_is_empty() {
        // テスト項目: 存在しない Room の参加者は空
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let members = registry.members(&code("NOPE"), ScopeFilter::Any).await;

        // then (期待する結果):
        assert!(members.is_empty());
        assert!(registry.leave_all(&conn("nobody")).await.is_empty());
    }
}
