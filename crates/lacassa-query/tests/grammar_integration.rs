//! End-to-end checks of the builder and grammar through the public API.

use lacassa_query::{
    row, BindingKind, CollectionValue, CqlGrammar, Query, QueryError, QueryRenderer, Row,
    Statement, Value,
};

fn render(statement: Statement<'_>) -> lacassa_query::RenderedQuery {
    CqlGrammar.render(&statement).expect("statement should render")
}

#[test]
fn test_bare_select_has_no_params() {
    let query = Query::table("foo");
    let rendered = render(Statement::Select(&query));

    assert_eq!(rendered.cql.trim(), "select * from foo");
    assert!(rendered.params.is_empty());
}

#[test]
fn test_select_single_predicate() {
    let query = Query::table("foo").where_("age", ">", 30).unwrap();
    let rendered = render(Statement::Select(&query));

    assert_eq!(rendered.cql, "select * from foo where age > ?");
    assert_eq!(rendered.params, vec![Value::Int(30)]);
}

#[test]
fn test_insert_with_set_collection() {
    let query = Query::table("foo")
        .insert_collection("Set", "tags", CollectionValue::items(["a", "b"]))
        .unwrap();
    let values = row([("id", Value::from(1)), ("name", Value::from("x"))]);
    let rendered = render(Statement::Insert {
        query: &query,
        values: &values,
    });

    assert!(rendered.cql.contains("(id, name, tags)"));
    assert!(rendered.cql.contains("values (?, ?, {'a','b'})"));
    assert_eq!(rendered.params, vec![Value::from(1), Value::from("x")]);
}

#[test]
fn test_update_list_delta_and_replace() {
    let values = Row::new();

    let delta = Query::table("foo")
        .update_collection_with("List", "items", "+", CollectionValue::items(["z"]))
        .unwrap();
    let rendered = render(Statement::Update {
        query: &delta,
        values: &values,
    });
    assert!(rendered.cql.contains("items=items+['z']"));

    let replace = Query::table("foo")
        .update_collection("List", "items", CollectionValue::items(["z"]))
        .unwrap();
    let rendered = render(Statement::Update {
        query: &replace,
        values: &values,
    });
    assert!(rendered.cql.contains("items=['z']"));
    assert!(!rendered.cql.contains("items=items"));
}

#[test]
fn test_column_delete_versus_row_delete() {
    let base = Query::table("foo").where_eq("user", "u").where_eq("id", 2);

    let column = base.clone().delete_columns(["title"]);
    let rendered = render(Statement::Delete(&column));
    assert_eq!(rendered.cql, "delete title from foo where user = ? and id = ?");

    let rendered = render(Statement::Delete(&base));
    assert_eq!(rendered.cql, "delete from foo where user = ? and id = ?");
    assert_eq!(rendered.params, vec![Value::from("u"), Value::from(2)]);
}

#[test]
fn test_array_collection_type_fails_before_encoding() {
    let result = Query::table("foo").update_collection("array", "tags", CollectionValue::items(["a"]));

    assert_eq!(
        result.unwrap_err(),
        QueryError::InvalidCollectionType {
            kind: "array".to_string()
        }
    );
}

#[test]
fn test_rendered_update_inlines_for_diagnostics() {
    let query = Query::table("foo")
        .update_collection_with("map", "meta", "+", CollectionValue::pairs([("k", "v?")]))
        .unwrap()
        .where_eq("id", 5);
    let values = row([("name", "it's")]);
    let rendered = render(Statement::Update {
        query: &query,
        values: &values,
    });

    assert_eq!(
        rendered.to_inline_cql(),
        "update foo set name = 'it''s', meta=meta+{'k':'v?'} where id = 5"
    );
}

#[test]
fn test_params_match_placeholders_in_order() {
    let query = Query::table("foo")
        .where_eq("a", 1)
        .where_in("b", ["x", "y"])
        .unwrap();
    let rendered = render(Statement::Select(&query));

    assert_eq!(rendered.cql.matches('?').count(), rendered.params.len());
    assert_eq!(
        rendered.params,
        vec![Value::from(1), Value::from("x"), Value::from("y")]
    );
}

#[test]
fn test_select_bucket_binding_is_rejected() {
    let query = Query::table("foo")
        .where_eq("a", 1)
        .add_binding("x", BindingKind::Select);
    let result = CqlGrammar.render(&Statement::Select(&query));

    assert_eq!(
        result,
        Err(QueryError::BindingMismatch {
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn test_empty_in_list_never_renders() {
    let result = Query::table("foo").where_in("id", Vec::<i64>::new());

    assert!(matches!(result, Err(QueryError::EmptyInList { .. })));
}
