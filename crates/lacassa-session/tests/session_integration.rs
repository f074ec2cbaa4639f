//! Session operations against the scripted adapter.

use lacassa_config::{Consistency, Credentials, SessionConfig};
use lacassa_query::{row, CollectionValue, QueryError, Row, Value};
use lacassa_session::testing::ScriptedAdapter;
use lacassa_session::{CancellationToken, ExecutionOptions, PageCursor, Session, SessionError};
use proptest::prelude::*;
use std::time::Duration;

fn session(adapter: ScriptedAdapter) -> Session<ScriptedAdapter> {
    Session::new(adapter, SessionConfig::new("blog")).expect("default config is valid")
}

// ============================================================================
// Configuration reaches the adapter
// ============================================================================

#[test]
fn test_connect_receives_session_config() {
    let config = SessionConfig::new("blog")
        .with_hosts(["10.0.0.1", "10.0.0.2"])
        .with_credentials(Credentials::new("app", "secret"));
    let session = Session::new(ScriptedAdapter::new(), config.clone()).unwrap();

    let connected = session.adapter().connected_config().unwrap();
    assert_eq!(connected, config);
    assert_eq!(
        connected.contact_points(),
        vec!["10.0.0.1:9042", "10.0.0.2:9042"]
    );
}

#[test]
fn test_connect_failure_fails_session() {
    let result = Session::new(
        ScriptedAdapter::new().failing_connect("no hosts reachable"),
        SessionConfig::new("blog"),
    );

    assert!(matches!(result, Err(SessionError::Execution(_))));
}

#[test]
fn test_every_statement_carries_options() {
    let config = SessionConfig::new("blog")
        .with_page_size(2)
        .with_consistency(Consistency::One);
    let session = Session::new(ScriptedAdapter::new(), config).unwrap();
    let expected = ExecutionOptions {
        page_size: 2,
        consistency: Consistency::One,
        request_timeout: Duration::from_millis(12_000),
    };

    session.get(&session.table("posts")).unwrap();
    assert_eq!(session.adapter().last_options(), Some(expected.clone()));

    session.raw("truncate posts").unwrap();
    assert_eq!(session.adapter().last_options(), Some(expected));
}

#[test]
fn test_page_size_drives_paging() {
    let config = SessionConfig::new("blog").with_page_size(2);
    let session = Session::new(ScriptedAdapter::with_rows(5), config).unwrap();

    assert_eq!(session.count(&session.table("posts")).unwrap(), 5);
    assert_eq!(session.adapter().page_fetches(), 2);

    let default_paged = Session::new(ScriptedAdapter::with_rows(5), SessionConfig::new("blog"))
        .unwrap();
    assert_eq!(default_paged.count(&default_paged.table("posts")).unwrap(), 5);
    assert_eq!(default_paged.adapter().page_fetches(), 0);
}

// ============================================================================
// Paged count
// ============================================================================

#[test]
fn test_count_sums_every_page() {
    let session = session(ScriptedAdapter::with_pages([2, 2, 1]));
    let query = session.table("posts").where_eq("user", "u1");

    assert_eq!(session.count(&query).unwrap(), 5);
    assert_eq!(session.adapter().page_fetches(), 2);

    let executed = session.adapter().last_executed().unwrap();
    assert_eq!(executed.cql, "select * from posts where user = ?");
    assert_eq!(executed.params, vec![Value::from("u1")]);
}

#[test]
fn test_count_single_empty_page() {
    let session = session(ScriptedAdapter::new());

    assert_eq!(session.count(&session.table("posts")).unwrap(), 0);
    assert_eq!(session.adapter().page_fetches(), 0);
}

#[test]
fn test_count_page_failure_propagates() {
    let session = session(ScriptedAdapter::with_pages([2, 2, 1]).failing_at_page(2));

    let err = session.count(&session.table("posts")).unwrap_err();

    assert!(err.is_execution());
    assert_eq!(session.adapter().page_fetches(), 2);
}

#[test]
fn test_count_precancelled_never_executes() {
    let session = session(ScriptedAdapter::with_pages([1, 1]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = session.count_with_cancel(&session.table("posts"), &cancel);

    assert!(matches!(result, Err(SessionError::Cancelled { pages: 0 })));
    assert!(session.adapter().executed().is_empty());
}

#[test]
fn test_count_compile_error_never_executes() {
    let session = session(ScriptedAdapter::new());
    let query = session
        .table("posts")
        .add_binding(1, lacassa_query::BindingKind::Where);

    let result = session.count(&query);

    assert!(matches!(
        result,
        Err(SessionError::Query(QueryError::BindingMismatch { .. }))
    ));
    assert!(session.adapter().executed().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_count_equals_sum_of_pages(pages in prop::collection::vec(0usize..50, 1..20)) {
        let expected: u64 = pages.iter().map(|&n| n as u64).sum();
        let fetches = pages.len() - 1;
        let session = session(ScriptedAdapter::with_pages(pages));

        prop_assert_eq!(session.count(&session.table("posts")).unwrap(), expected);
        prop_assert_eq!(session.adapter().page_fetches(), fetches);
    }
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn test_get_returns_first_page() {
    let session = session(ScriptedAdapter::with_pages([3, 1]));
    let query = session.table("posts").select(["id", "title"]).limit(10);

    let cursor = session.get(&query).unwrap();

    assert_eq!(cursor.row_count(), 3);
    assert!(!cursor.is_last_page());
    assert_eq!(
        session.adapter().last_executed().unwrap().cql,
        "select id, title from posts limit 10"
    );
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_insert_with_collection() {
    let session = session(ScriptedAdapter::new());
    let query = session
        .table("posts")
        .insert_collection("set", "tags", CollectionValue::items(["rust"]))
        .unwrap();
    let values = row([("id", Value::from(1)), ("title", Value::from("hello"))]);

    assert!(session.insert(&query, &values).unwrap().is_some());

    let executed = session.adapter().last_executed().unwrap();
    assert_eq!(
        executed.cql,
        "insert into posts (id, title, tags) values (?, ?, {'rust'})"
    );
    assert_eq!(executed.params, vec![Value::from(1), Value::from("hello")]);
}

#[test]
fn test_insert_collection_only_executes() {
    let session = session(ScriptedAdapter::new());
    let query = session
        .table("posts")
        .insert_collection("list", "tags", CollectionValue::items(["a"]))
        .unwrap();

    assert!(session.insert(&query, &Row::new()).unwrap().is_some());
    assert_eq!(session.adapter().executed().len(), 1);
}

#[test]
fn test_insert_many_executes_each_record() {
    let session = session(ScriptedAdapter::new());
    let query = session
        .table("posts")
        .insert_collection("set", "tags", CollectionValue::items(["rust"]))
        .unwrap();
    let records = vec![row([("id", 1)]), row([("id", 2)])];

    let cursors = session.insert_many(&query, &records).unwrap();

    assert_eq!(cursors.len(), 2);
    let executed = session.adapter().executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(
        executed[1].cql,
        "insert into posts (id, tags) values (?, {'rust'})"
    );
    assert_eq!(executed[1].params, vec![Value::from(2)]);
}

#[test]
fn test_empty_insert_executes_nothing() {
    let session = session(ScriptedAdapter::new());

    let result = session.insert(&session.table("posts"), &Row::new()).unwrap();

    assert!(result.is_none());
    assert!(session.adapter().executed().is_empty());
}

#[test]
fn test_update_values_then_where_params() {
    let session = session(ScriptedAdapter::new());
    let query = session
        .table("posts")
        .where_eq("user", "u1")
        .update_collection_with("set", "tags", "+", CollectionValue::items(["rust"]))
        .unwrap();
    let values = row([("title", "x")]);

    session.update(&query, &values).unwrap();

    let executed = session.adapter().last_executed().unwrap();
    assert_eq!(
        executed.cql,
        "update posts set title = ?, tags=tags+{'rust'} where user = ?"
    );
    assert_eq!(executed.params, vec![Value::from("x"), Value::from("u1")]);
}

#[test]
fn test_delete_row_and_columns() {
    let session = session(ScriptedAdapter::new());
    let query = session.table("posts").where_eq("id", 7);

    session.delete_row(&query).unwrap();
    session.delete_columns(&query, ["title"]).unwrap();

    let executed = session.adapter().executed();
    assert_eq!(executed[0].cql, "delete from posts where id = ?");
    assert_eq!(executed[1].cql, "delete title from posts where id = ?");
    assert_eq!(executed[1].params, vec![Value::from(7)]);
}

#[test]
fn test_index_requires_columns() {
    let session = session(ScriptedAdapter::new());
    let query = session.table("posts");

    session.index(&query, &["user".to_string()]).unwrap();
    let err = session.index(&query, &[]).unwrap_err();

    assert_eq!(
        session.adapter().last_executed().unwrap().cql,
        "create index if not exists on posts(user)"
    );
    assert!(matches!(err, SessionError::Query(QueryError::EmptyIndex)));
}

// ============================================================================
// Raw statements and adapter failures
// ============================================================================

#[test]
fn test_statement_passes_through() {
    let session = session(ScriptedAdapter::new());

    session
        .statement("select * from posts where id = ?", &[Value::from(1)])
        .unwrap();
    session.raw("truncate posts").unwrap();

    let executed = session.adapter().executed();
    assert_eq!(executed[0].params, vec![Value::from(1)]);
    assert_eq!(executed[1].cql, "truncate posts");
    assert!(executed[1].params.is_empty());
}

#[test]
fn test_execute_failure_is_execution_error() {
    let session = session(ScriptedAdapter::new().failing_execute("unavailable"));

    let err = session.get(&session.table("posts")).unwrap_err();

    assert!(err.is_execution());
    assert_eq!(err.to_string(), "Execution failed: unavailable");
}
