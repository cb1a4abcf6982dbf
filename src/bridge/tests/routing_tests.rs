//! Unit tests for reply queue resolution.

use super::fixtures::object;
use crate::bridge::{
    domain::Context,
    services::{DEFAULT_REPLY_QUEUE, RoutingResolver},
};
use rstest::rstest;
use serde_json::{Map, json};

fn context(klat: Option<&str>, mq: Option<&str>) -> Context {
    let mut map = Map::new();
    if let Some(queue) = klat {
        map.insert("klat_data".to_owned(), json!({"routing_key": queue}));
    }
    if let Some(queue) = mq {
        map.insert("mq".to_owned(), json!({"routing_key": queue}));
    }
    Context::from_map(map)
}

#[rstest]
#[case(Some("override"), Some("klat_q"), Some("mq_q"), "override")]
#[case(Some("override"), None, None, "override")]
#[case(None, Some("klat_q"), Some("mq_q"), "klat_q")]
#[case(None, Some("klat_q"), None, "klat_q")]
#[case(None, None, Some("mq_q"), "mq_q")]
#[case(None, None, None, DEFAULT_REPLY_QUEUE)]
#[case(Some(""), None, Some("mq_q"), "mq_q")]
fn precedence_is_override_then_klat_then_mq_then_default(
    #[case] explicit: Option<&str>,
    #[case] klat: Option<&str>,
    #[case] mq: Option<&str>,
    #[case] expected: &str,
) {
    let resolver = RoutingResolver::default();
    let context = context(klat, mq);
    assert_eq!(resolver.resolve(&context, explicit), expected);
}

#[test]
fn legacy_klat_section_is_consulted_before_mq() {
    let resolver = RoutingResolver::default();
    let context = Context::from_map(object(json!({
        "klat": {"routing_key": "legacy_q"},
        "mq": {"routing_key": "mq_q"}
    })));
    assert_eq!(resolver.resolve(&context, None), "legacy_q");
}

#[test]
fn non_string_routing_keys_are_ignored() {
    let resolver = RoutingResolver::new("fallback");
    let context = Context::from_map(object(json!({
        "klat_data": {"routing_key": 12},
        "mq": {"routing_key": null}
    })));
    assert_eq!(resolver.resolve(&context, None), "fallback");
    assert_eq!(resolver.default_queue(), "fallback");
}
