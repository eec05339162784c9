use super::*;
use shared::domain::{AnswerRecord, QuestionId};

fn answered(session_id: &SessionId, values: &[&str]) -> SessionState {
    let mut state = SessionState::empty(session_id.clone());
    for (i, value) in values.iter().enumerate() {
        state.answers.push(AnswerRecord {
            question_id: QuestionId(i as u32 + 1),
            value: (*value).to_string(),
        });
    }
    state
}

#[tokio::test]
async fn unknown_session_reads_as_empty() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId("nobody".into());
    let state = store.get(&id).await.expect("get");
    assert_eq!(state.session_id, id);
    assert!(state.answers.is_empty());
    assert!(store.find(&id).await.expect("find").is_none());
    assert!(!store.contains(&id).await.expect("contains"));
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn put_then_get_returns_snapshot() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId::generate();
    store
        .put(&id, answered(&id, &["Alice", "alice@example.com"]))
        .await
        .expect("put");

    let state = store.get(&id).await.expect("get");
    assert_eq!(state.answered(), 2);
    assert_eq!(state.answer_for(QuestionId(1)), Some("Alice"));
    assert!(store.contains(&id).await.expect("contains"));
}

#[tokio::test]
async fn snapshots_do_not_alias_stored_state() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["Alice"])).await.expect("put");

    let mut snapshot = store.get(&id).await.expect("get");
    snapshot.answers[0].value = "Mallory".into();

    let stored = store.get(&id).await.expect("get");
    assert_eq!(stored.answer_for(QuestionId(1)), Some("Alice"));
}

#[tokio::test]
async fn put_overwrites_previous_state() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["a", "b"])).await.expect("put");
    store.put(&id, answered(&id, &["c"])).await.expect("put");

    let state = store.get(&id).await.expect("get");
    assert_eq!(state.answered(), 1);
    assert_eq!(state.answer_for(QuestionId(1)), Some("c"));
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn expired_sessions_read_as_empty_and_get_purged() {
    let store = MemorySessionStore::new(Duration::milliseconds(1));
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["Alice"])).await.expect("put");
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let state = store.get(&id).await.expect("get");
    assert!(state.answers.is_empty());
    assert!(!store.contains(&id).await.expect("contains"));

    assert_eq!(store.purge_expired().await.expect("purge"), 1);
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn zero_ttl_never_expires() {
    let store = MemorySessionStore::new(Duration::zero());
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["Alice"])).await.expect("put");
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    assert!(store.contains(&id).await.expect("contains"));
    assert_eq!(store.get(&id).await.expect("get").answered(), 1);
    assert_eq!(store.purge_expired().await.expect("purge"), 0);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn purge_keeps_live_sessions() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["Alice"])).await.expect("put");

    assert_eq!(store.purge_expired().await.expect("purge"), 0);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn clones_share_the_same_map() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let other = store.clone();
    let id = SessionId::generate();
    store.put(&id, answered(&id, &["Alice"])).await.expect("put");
    assert!(other.contains(&id).await.expect("contains"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_puts_on_one_session_keep_a_single_writer() {
    let store = MemorySessionStore::new(Duration::hours(1));
    let id = SessionId::generate();
    let first = answered(&id, &["Alice", "alice@example.com", "Norway"]);
    let second = answered(&id, &["Bob"]);

    let a = {
        let store = store.clone();
        let id = id.clone();
        let state = first.clone();
        tokio::spawn(async move { store.put(&id, state).await })
    };
    let b = {
        let store = store.clone();
        let id = id.clone();
        let state = second.clone();
        tokio::spawn(async move { store.put(&id, state).await })
    };
    a.await.expect("join").expect("put");
    b.await.expect("join").expect("put");

    let stored = store.get(&id).await.expect("get");
    assert!(
        stored.answers == first.answers || stored.answers == second.answers,
        "stored answers must match one writer: {:?}",
        stored.answers
    );
    assert_eq!(store.session_count().await, 1);
}
