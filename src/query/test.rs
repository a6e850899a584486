use super::{QueryError, QueryString, Value};

#[test]
fn test_scalar_params() {
    let query = QueryString::parse("a=1&b=two&c=").unwrap();
    assert_eq!(query.len(), 3);
    assert_eq!(query.get("a"), Some(&Value::Scalar("1".into())));
    assert_eq!(query.get("b"), Some(&Value::Scalar("two".into())));
    assert_eq!(query.get("c"), Some(&Value::Scalar(String::new())));
}

#[test]
fn test_absent_value() {
    let query = QueryString::parse("flag&a=1").unwrap();
    assert_eq!(query.get("flag"), Some(&Value::Absent));
    assert_eq!(query.build(), "flag&a=1");
}

#[test]
fn test_percent_decoding() {
    let query = QueryString::parse("na%C3%AFve=a+b%26c").unwrap();
    assert_eq!(query.get("naïve").unwrap().as_str(), Some("a b&c"));
}

#[test]
fn test_nested_structure() {
    let query = QueryString::parse("a=1&b[]=2&b[]=3&c[x]=9").unwrap();

    assert_eq!(query.get("a").unwrap().as_str(), Some("1"));

    let b = query.get("b").unwrap().as_list().unwrap();
    assert_eq!(b.len(), 2);
    assert_eq!(b[0].as_str(), Some("2"));
    assert_eq!(b[1].as_str(), Some("3"));

    let c = query.get("c").unwrap().as_map().unwrap();
    assert_eq!(c.get("x").unwrap().as_str(), Some("9"));
}

#[test]
fn test_deep_nesting() {
    let query = QueryString::parse("a[b][c][]=1&a[b][c][]=2&a[b][d]=3").unwrap();
    let b = query.get("a").unwrap().as_map().unwrap();
    let c = b.get("b").unwrap().as_map().unwrap();
    assert_eq!(c.get("c").unwrap().as_list().unwrap().len(), 2);
    assert_eq!(c.get("d").unwrap().as_str(), Some("3"));
}

#[test]
fn test_list_of_maps() {
    let query = QueryString::parse("a[][x]=1&a[][x]=2").unwrap();
    let a = query.get("a").unwrap().as_list().unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].as_map().unwrap().get("x").unwrap().as_str(), Some("1"));
    assert_eq!(a[1].as_map().unwrap().get("x").unwrap().as_str(), Some("2"));
}

#[test]
fn test_get_path() {
    let query = QueryString::parse("a=1&b[]=2&b[]=3&c[x][y]=9").unwrap();
    assert_eq!(query.get_path("a").unwrap().as_str(), Some("1"));
    assert_eq!(query.get_path("b[0]").unwrap().as_str(), Some("2"));
    assert_eq!(query.get_path("b[1]").unwrap().as_str(), Some("3"));
    assert_eq!(query.get_path("c[x][y]").unwrap().as_str(), Some("9"));

    assert_eq!(query.get_path("b[2]"), None);
    assert_eq!(query.get_path("c[missing]"), None);
    assert_eq!(query.get_path("a[x]"), None);
    assert_eq!(query.get_path("c[x"), None);
}

#[test]
fn test_duplicate_plain_key_overwrites() {
    let query = QueryString::parse("a=1&a=2").unwrap();
    assert_eq!(query.len(), 1);
    assert_eq!(query.get("a").unwrap().as_str(), Some("2"));
}

#[test]
fn test_unbalanced_brackets() {
    assert_eq!(
        QueryString::parse("a[b=1"),
        Err(QueryError::UnbalancedBrackets),
    );
    assert_eq!(
        QueryString::parse("a]b=1"),
        Err(QueryError::UnbalancedBrackets),
    );
    assert_eq!(
        QueryString::parse("a[b]c[d]=1"),
        Err(QueryError::UnbalancedBrackets),
    );
}

#[test]
fn test_build() {
    let mut query = QueryString::new();
    query.set("a", "1");
    query.set("flag", true);
    query.set("off", false);
    assert_eq!(query.build(), "a=1&flag=1&off=0");
}

#[test]
fn test_build_encodes_components() {
    let mut query = QueryString::new();
    query.set("key name", "a&b");
    assert_eq!(query.build(), "key+name=a%26b");
}

#[test]
fn test_build_nested() {
    let query = QueryString::parse("a=1&b[]=2&b[]=3&c[x]=9").unwrap();
    assert_eq!(query.build(), "a=1&b[]=2&b[]=3&c[x]=9");
}

#[test]
fn test_build_parse_idempotent() {
    for raw in [
        "a=1",
        "a=1&b[]=2&b[]=3&c[x]=9",
        "flag",
        "a[b][c][]=1&a[b][c][]=2",
        "empty=",
    ] {
        let first = QueryString::parse(raw).unwrap();
        let rebuilt = first.build();
        let second = QueryString::parse(&rebuilt).unwrap();
        assert_eq!(first, second, "re-parse mismatch for {raw:?}");
        assert_eq!(rebuilt, second.build(), "build not stable for {raw:?}");
    }
}

#[test]
fn test_insertion_order_preserved() {
    let query = QueryString::parse("z=1&a=2&m=3").unwrap();
    let names: Vec<&str> = query.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["z", "a", "m"]);
}

#[test]
fn test_set_remove() {
    let mut query = QueryString::parse("a=1&b=2").unwrap();
    assert!(query.contains("a"));
    query.remove("a");
    assert!(!query.contains("a"));
    query.set("c", "3");
    assert_eq!(query.build(), "b=2&c=3");
}
