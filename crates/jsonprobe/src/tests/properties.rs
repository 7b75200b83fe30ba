//! Cross-cutting properties, cross-checked against `serde_json` as the
//! independent decoder.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;

use crate::{
    find, find_key, find_many, list_pointers,
    pointer::{encode_pointer, parse_pointer},
    simple_unmarshal, KeyState, ScanState, Value,
};

fn test_count() -> u64 {
    if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

#[test]
fn display_decode_roundtrip() {
    fn prop(v: Value) -> bool {
        let doc = v.to_string();
        simple_unmarshal(doc.as_bytes()) == Ok(v)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn sliced_fragments_match_independent_decoder() {
    fn prop(v: Value) -> bool {
        let doc = v.to_string();
        let reference: serde_json::Value = serde_json::from_str(&doc).expect("document parses");
        let pointers = list_pointers(doc.as_bytes()).expect("list_pointers");

        pointers.iter().all(|p| {
            let frag = find(doc.as_bytes(), p).expect("find");
            match (frag, reference.pointer(p)) {
                (Some(raw), Some(want)) => {
                    serde_json::from_slice::<serde_json::Value>(raw).ok().as_ref() == Some(want)
                }
                // an index listed for an array that turned out empty
                (None, None) => true,
                _ => false,
            }
        })
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn find_many_matches_single_finds() {
    fn prop(v: Value) -> bool {
        let doc = v.to_string();
        let pointers = list_pointers(doc.as_bytes()).expect("list_pointers");
        let live: Vec<&str> = pointers
            .iter()
            .filter(|p| find(doc.as_bytes(), p).expect("find").is_some())
            .map(String::as_str)
            .collect();

        let (found, err) = find_many(doc.as_bytes(), &live);
        if err.is_some() {
            return false;
        }
        live.iter().all(|&p| {
            found.get(p).copied() == find(doc.as_bytes(), p).expect("find")
        })
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn state_probes_match_stateless() {
    fn prop(v: Value) -> bool {
        let doc = v.to_string();
        let Value::Object(map) = &v else {
            return true;
        };

        // Reverse order makes the first probe scan to the far end; the rest
        // must come out of the cache, identical to the stateless answers.
        let mut state = KeyState::new(doc.as_bytes());
        let mut keys: Vec<&String> = map.keys().collect();
        keys.reverse();

        keys.iter().all(|&k| {
            state.find_key(k).expect("state probe") == find_key(doc.as_bytes(), k).expect("find_key")
        })
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn scan_keys_yield_document_order() {
    fn prop(v: Value) -> bool {
        let doc = v.to_string();
        let Value::Object(map) = &v else {
            return true;
        };

        let mut state = ScanState::new(doc.as_bytes());
        let mut got = Vec::new();
        while let Some(key) = state.scan_keys().expect("scan_keys") {
            got.push(key.into_owned());
        }
        got == map.keys().cloned().collect::<Vec<_>>()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn pointer_codec_roundtrip() {
    fn prop(tokens: Vec<String>) -> bool {
        parse_pointer(&encode_pointer(&tokens)) == tokens
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<String>) -> bool);
}
