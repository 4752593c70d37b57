//! Optimistic synchronizer behavior: optimistic flips, rollback,
//! auth preconditions, fail-safe reloads, and completion-order races.

use std::sync::Arc;

use decanter::application::{CollectionSync, SyncStatus};
use decanter::domain::{AuthToken, CollectionKind, MutationPhase, WineId};
use decanter::error::{Error, RemoteError};
use decanter::testkit::{GatewayCall, MockGateway};
use tokio::sync::watch;

type FavoritesSync = CollectionSync<MockGateway>;

fn favorites_with_token(
    token: Option<&str>,
) -> (
    Arc<MockGateway>,
    watch::Sender<Option<AuthToken>>,
    Arc<FavoritesSync>,
) {
    let gateway = Arc::new(MockGateway::new());
    let (tx, rx) = watch::channel(token.map(AuthToken::new));
    let sync = Arc::new(CollectionSync::new(
        CollectionKind::Favorites,
        Arc::clone(&gateway),
        rx,
    ));
    (gateway, tx, sync)
}

/// Drive the current-thread runtime until `gateway` has recorded `count`
/// calls, so tests can observe a mutation mid-flight.
async fn wait_for_calls(gateway: &MockGateway, count: usize) {
    for _ in 0..1000 {
        if gateway.call_count() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("gateway never reached {count} calls");
}

#[tokio::test]
async fn toggle_twice_returns_to_original_state() {
    let (_, _, sync) = favorites_with_token(Some("T1"));

    assert!(sync.toggle(WineId::from("wine-42")).await.unwrap());
    assert!(!sync.toggle(WineId::from("wine-42")).await.unwrap());

    assert!(sync.member_ids().is_empty());
}

#[tokio::test]
async fn optimistic_flip_is_visible_before_the_call_settles() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    let gate = gateway.gate_next_add();

    let id = WineId::from("wine-42");
    let task = tokio::spawn({
        let sync = Arc::clone(&sync);
        let id = id.clone();
        async move { sync.toggle(id).await }
    });

    wait_for_calls(&gateway, 1).await;
    // The network has not resolved, but the flip is already visible.
    assert!(sync.is_member(&id));
    assert_eq!(
        sync.last_mutation().unwrap().phase(),
        MutationPhase::Pending { was_member: false }
    );

    gate.send(()).unwrap();
    assert!(task.await.unwrap().unwrap());
    assert!(sync.is_member(&id));
    assert_eq!(sync.last_mutation().unwrap().phase(), MutationPhase::Committed);
}

#[tokio::test]
async fn successful_add_uses_the_session_token() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));

    sync.toggle(WineId::from("wine-42")).await.unwrap();

    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::AddMember {
            kind: CollectionKind::Favorites,
            id: WineId::from("wine-42"),
            token: "T1".to_string(),
        }]
    );
}

#[tokio::test]
async fn failed_add_rolls_back_and_propagates() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    gateway.script_add(Err(RemoteError::new(500, "boom").into()));

    let err = sync.toggle(WineId::from("wine-42")).await.unwrap_err();

    match err {
        Error::Remote(remote) => assert_eq!(remote.status, 500),
        other => panic!("expected RemoteError, got {other:?}"),
    }
    assert!(!sync.is_member(&WineId::from("wine-42")));
    assert_eq!(sync.last_mutation().unwrap().phase(), MutationPhase::RolledBack);
}

#[tokio::test]
async fn failed_remove_restores_membership() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    gateway.script_fetch(Ok(vec![WineId::from("wine-1")]));
    sync.reload().await.unwrap();

    gateway.script_remove(Err(RemoteError::new(503, "unavailable").into()));
    let err = sync.toggle(WineId::from("wine-1")).await.unwrap_err();

    assert!(matches!(err, Error::Remote(_)));
    assert!(sync.is_member(&WineId::from("wine-1")));
}

#[tokio::test]
async fn toggle_without_session_makes_no_network_call() {
    let (gateway, _, sync) = favorites_with_token(None);

    let err = sync.toggle(WineId::from("wine-42")).await.unwrap_err();

    assert!(matches!(err, Error::AuthRequired));
    assert_eq!(gateway.call_count(), 0);
    assert!(sync.member_ids().is_empty());
}

#[tokio::test]
async fn reload_replaces_members_wholesale_and_dedupes() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    gateway.script_fetch(Ok(vec![
        WineId::from("a"),
        WineId::from("b"),
        WineId::from("a"),
    ]));

    sync.reload().await.unwrap();

    assert_eq!(sync.member_ids(), vec![WineId::from("a"), WineId::from("b")]);
    assert_eq!(sync.status(), SyncStatus::Idle);
}

#[tokio::test]
async fn failed_reload_clears_members_and_records_the_error() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    gateway.script_fetch(Ok(vec![WineId::from("a")]));
    sync.reload().await.unwrap();

    gateway.script_fetch(Err(RemoteError::new(500, "boom").into()));
    let result = sync.reload().await;

    assert!(result.is_err());
    assert!(sync.member_ids().is_empty());
    assert!(matches!(sync.status(), SyncStatus::Error(_)));
}

#[tokio::test]
async fn reload_without_session_clears_without_network() {
    let (gateway, tx, sync) = favorites_with_token(Some("T1"));
    gateway.script_fetch(Ok(vec![WineId::from("1"), WineId::from("2")]));
    sync.reload().await.unwrap();
    assert_eq!(sync.member_ids().len(), 2);

    tx.send(None).unwrap();
    sync.reload().await.unwrap();

    assert!(sync.member_ids().is_empty());
    // Only the initial authenticated reload hit the gateway.
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn session_watcher_clears_collection_on_logout() {
    let (gateway, tx, sync) = favorites_with_token(Some("T1"));
    gateway.script_fetch(Ok(vec![WineId::from("1"), WineId::from("2")]));
    sync.reload().await.unwrap();

    let watcher = Arc::clone(&sync).spawn_session_watcher();
    tx.send(None).unwrap();

    for _ in 0..1000 {
        if sync.member_ids().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(sync.member_ids().is_empty());
    assert_eq!(gateway.call_count(), 1);

    drop(tx);
    let _ = watcher.await;
}

#[tokio::test]
async fn stale_reload_completion_is_discarded() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    let gate_first = gateway.gate_next_fetch();
    let gate_second = gateway.gate_next_fetch();
    gateway.script_fetch(Ok(vec![WineId::from("old")]));
    gateway.script_fetch(Ok(vec![WineId::from("new")]));

    let first = tokio::spawn({
        let sync = Arc::clone(&sync);
        async move { sync.reload().await }
    });
    wait_for_calls(&gateway, 1).await;

    let second = tokio::spawn({
        let sync = Arc::clone(&sync);
        async move { sync.reload().await }
    });
    wait_for_calls(&gateway, 2).await;

    // The newer reload settles first; the slow one must not clobber it.
    gate_second.send(()).unwrap();
    second.await.unwrap().unwrap();
    gate_first.send(()).unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(sync.member_ids(), vec![WineId::from("new")]);
}

#[tokio::test]
async fn second_toggle_for_the_same_id_fails_fast_while_pending() {
    let (gateway, _, sync) = favorites_with_token(Some("T1"));
    let gate = gateway.gate_next_add();

    let id = WineId::from("wine-42");
    let task = tokio::spawn({
        let sync = Arc::clone(&sync);
        let id = id.clone();
        async move { sync.toggle(id).await }
    });
    wait_for_calls(&gateway, 1).await;

    let err = sync.toggle(id.clone()).await.unwrap_err();
    assert!(matches!(err, Error::ToggleInFlight { .. }));
    // The optimistic state of the first toggle is untouched.
    assert!(sync.is_member(&id));

    gate.send(()).unwrap();
    assert!(task.await.unwrap().unwrap());
    assert_eq!(gateway.call_count(), 1);

    // Once settled, toggling again is allowed.
    assert!(!sync.toggle(id.clone()).await.unwrap());
}

#[tokio::test]
async fn history_collection_targets_history_endpoints() {
    let gateway = Arc::new(MockGateway::new());
    let (_tx, rx) = watch::channel(Some(AuthToken::new("T1")));
    let sync = CollectionSync::new(CollectionKind::History, Arc::clone(&gateway), rx);

    sync.reload().await.unwrap();
    sync.toggle(WineId::from("wine-9")).await.unwrap();

    assert_eq!(
        gateway.calls(),
        vec![
            GatewayCall::FetchMembers {
                kind: CollectionKind::History,
                token: "T1".to_string(),
            },
            GatewayCall::AddMember {
                kind: CollectionKind::History,
                id: WineId::from("wine-9"),
                token: "T1".to_string(),
            },
        ]
    );
}
