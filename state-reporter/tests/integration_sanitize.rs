//! Integration tests for path masking and sanitization.
//!
//! These tests focus on the guarantees callers rely on: the live state is
//! never modified, untouched branches stay shared, and transform specs are
//! used verbatim.

use std::{cell::Cell, rc::Rc};

use serde_json::json;
use state_reporter::{
    KeyPath, MASK, RedactionSpec, Value, decycle, sanitize, sanitize_with_mask, set_at_path,
};

fn state() -> Value {
    Value::from(json!({
        "a": {"b": "bad", "x": "good"},
        "c": {"d": "bad2", "y": "good2"},
        "e": "worst",
        "f": "bork"
    }))
}

mod paths {
    use super::*;

    #[test]
    fn replaces_what_it_should() {
        let state = state();
        let sanitized = sanitize(&state, &RedactionSpec::paths(["a.b", "c.d", "e"]));

        assert_eq!(
            sanitized.to_string(),
            json!({
                "a": {"b": MASK, "x": "good"},
                "c": {"d": MASK, "y": "good2"},
                "e": MASK,
                "f": "bork"
            })
            .to_string()
        );
    }

    #[test]
    fn leaves_the_input_unchanged() {
        let state = state();
        let before = decycle(&state);

        let _ = sanitize(&state, &RedactionSpec::paths(["a.b", "c.d", "e"]));

        assert_eq!(decycle(&state), before);
        assert_eq!(state.get_path("a.b").as_ref().and_then(Value::as_str), Some("bad"));
        assert_eq!(state.get_path("c.d").as_ref().and_then(Value::as_str), Some("bad2"));
        assert_eq!(state.get("e").as_ref().and_then(Value::as_str), Some("worst"));
    }

    #[test]
    fn shares_untouched_branches() {
        let state = state();
        let sanitized = sanitize(&state, &RedactionSpec::paths(["a.b"]));

        let original_a = state.get("a").unwrap();
        let original_c = state.get("c").unwrap();
        assert!(!sanitized.get("a").unwrap().same_node(&original_a));
        assert!(sanitized.get("c").unwrap().same_node(&original_c));
    }

    #[test]
    fn masks_missing_paths_by_creating_them() {
        let state = Value::from(json!({"a": 1}));
        let sanitized = sanitize(&state, &RedactionSpec::paths(["session.token"]));

        assert_eq!(
            sanitized.to_string(),
            r#"{"a":1,"session":{"token":"********"}}"#
        );
        assert!(state.get("session").is_none());
    }

    #[test]
    fn terminates_on_self_referential_state() {
        let state = Value::from(json!({"token": "secret", "user": "alice"}));
        state.set("self", state.clone());

        let sanitized = sanitize(&state, &RedactionSpec::paths(["token", "self.user"]));

        assert_eq!(decycle(&state).as_deref(), Some(r#"{"token":"secret","user":"alice"}"#));
        // The copied `self` branch still points back at the original root,
        // which is a distinct node from the sanitized top level.
        assert_eq!(
            decycle(&sanitized).as_deref(),
            Some(concat!(
                r#"{"token":"********","user":"alice","self":"#,
                r#"{"token":"secret","user":"********","self":"#,
                r#"{"token":"secret","user":"alice"}}}"#
            ))
        );
    }

    #[test]
    fn structured_masks_appear_at_every_path() {
        let mask = Value::from(json!({"redacted": true}));
        let spec = RedactionSpec::paths(["a.b", "c.d", "e"]);
        let sanitized = sanitize_with_mask(&state(), &spec, &mask);

        assert_eq!(
            decycle(&sanitized).as_deref(),
            Some(concat!(
                r#"{"a":{"b":{"redacted":true},"x":"good"},"#,
                r#""c":{"d":{"redacted":true},"y":"good2"},"#,
                r#""e":{"redacted":true},"f":"bork"}"#
            ))
        );
        assert_eq!(mask.to_string(), r#"{"redacted":true}"#);
    }
}

mod transforms {
    use super::*;

    #[test]
    fn calls_the_transform_verbatim() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let spec = RedactionSpec::transform(move |state| {
            counter.set(counter.get() + 1);
            let copy = state.shallow_clone();
            copy.set("bork", true);
            copy
        });

        let state = Value::from(json!({"a": 1}));
        let sanitized = sanitize(&state, &spec);

        assert_eq!(calls.get(), 1);
        assert_eq!(sanitized.get("a").and_then(|a| a.as_i64()), Some(1));
        assert_eq!(sanitized.get("bork").and_then(|b| b.as_bool()), Some(true));
        assert!(state.get("bork").is_none());
    }

    #[test]
    fn result_is_not_cloned() {
        let fixed = Value::from(json!({"replaced": true}));
        let returned = fixed.clone();
        let spec = RedactionSpec::transform(move |_| returned.clone());

        let sanitized = sanitize(&state(), &spec);
        assert!(sanitized.same_node(&fixed));
    }
}

mod set_at_path_properties {
    use super::*;

    #[test]
    fn creates_exactly_the_missing_chain() {
        let root = Value::from(json!({"sibling": {"keep": 1}}));
        let sibling = root.get("sibling").unwrap();

        set_at_path(&root, &KeyPath::parse("p.q.r"), Value::from("v"));

        assert_eq!(
            root.to_string(),
            r#"{"sibling":{"keep":1},"p":{"q":{"r":"v"}}}"#
        );
        assert!(root.get("sibling").unwrap().same_node(&sibling));
    }

    #[test]
    fn never_mutates_nodes_off_the_path() {
        let root = Value::from(json!({"a": {"b": {"c": 1}, "d": {"e": 2}}, "x": {"y": 3}}));
        let snapshots: Vec<(Value, Option<String>)> = ["a", "a.b", "a.d", "x"]
            .into_iter()
            .map(|path| {
                let node = root.get_path(path).unwrap();
                let text = decycle(&node);
                (node, text)
            })
            .collect();

        set_at_path(&root, &KeyPath::parse("a.b.c"), Value::from(99));

        for (node, text) in snapshots {
            assert_eq!(decycle(&node), text);
        }
        assert_eq!(root.get_path("a.b.c").and_then(|c| c.as_i64()), Some(99));
    }
}
