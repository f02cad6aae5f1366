use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use rand::Rng as _;

use super::*;

fn string(s: &str) -> Element {
    Element::String(BString::from(s))
}

fn integer(i: i64) -> Element {
    Element::Integer(BInteger::new(i))
}

fn random_key(rng: &mut impl rand::Rng) -> Vec<u8> {
    let len = rng.random_range(0..6);
    (0..len).map(|_| rng.random_range(b'a'..=b'f')).collect()
}

fn random_native(rng: &mut impl rand::Rng, depth: usize) -> Native {
    match rng.random_range(0..if depth == 0 { 2 } else { 4 }) {
        0 => Native::Integer(rng.random_range(-1000..1000)),
        1 => Native::Bytes(Bytes::from(random_key(rng))),
        2 => Native::List(
            (0..rng.random_range(0..4))
                .map(|_| random_native(rng, depth - 1))
                .collect(),
        ),
        _ => {
            // Distinct keys, so the source and the dictionary hold the same entries.
            let entries: BTreeMap<Vec<u8>, Native> = (0..rng.random_range(0..5))
                .map(|_| (random_key(rng), random_native(rng, depth - 1)))
                .collect();
            Native::Dict(
                entries
                    .into_iter()
                    .rev()
                    .map(|(k, v)| (Bytes::from(k), v))
                    .collect(),
            )
        }
    }
}

#[test]
fn test_encode_reorders_keys() {
    let mut dict = Dictionary::from_pairs([("b", 2), ("a", 1)]).unwrap();
    assert!(!dict.is_sorted());
    assert_eq!(dict.encode().as_ref(), b"d1:ai1e1:bi2ee");
    assert!(dict.is_sorted());
}

#[test]
fn test_encode_empty_dict() {
    let mut dict = Dictionary::from_pairs(Vec::<(&str, i64)>::new()).unwrap();
    assert_eq!(dict.encode().as_ref(), b"de");
    assert_eq!(Dictionary::new().encode().as_ref(), b"de");
}

#[test]
fn test_exists_missing_key() {
    let dict = Dictionary::from_pairs([("cow", "moo")]).unwrap();
    assert!(dict.exists("cow"));
    assert!(dict.exists(BString::from("cow")));
    assert!(!dict.exists("missing"));
    assert!(!dict.exists(42));
    assert!(dict.get("missing").is_none());
}

#[test]
fn test_set_replaces_existing_key() {
    let mut dict = Dictionary::new();
    dict.set("spam", 1).unwrap();
    dict.set("eggs", 2).unwrap();
    dict.set("spam", "replaced").unwrap();

    assert_eq!(dict.count(), 2);
    assert_eq!(dict.get("spam"), Some(&string("replaced")));

    // Replacement keeps the pair where it was.
    let keys: Vec<_> = dict.keys().map(|k| k.as_str().unwrap()).collect();
    assert_eq!(keys, ["spam", "eggs"]);
}

#[test]
fn test_set_rejects_non_string_key() {
    let mut dict = Dictionary::from_pairs([("a", 1)]).unwrap();

    assert!(matches!(dict.set(42, "v"), Err(BencodeError::InvalidKey)));
    assert!(matches!(
        dict.set(integer(7), "v"),
        Err(BencodeError::InvalidKey)
    ));
    assert!(matches!(
        dict.set(vec!["a"], "v"),
        Err(BencodeError::InvalidKey)
    ));

    assert_eq!(dict.len(), 1);
    assert_eq!(dict.encode().as_ref(), b"d1:ai1ee");
}

#[test]
fn test_from_pairs_rejects_non_string_key() {
    let result = Dictionary::from_pairs([(string("a"), 1), (integer(1), 2)]);
    assert!(matches!(result, Err(BencodeError::InvalidKey)));
}

#[test]
fn test_set_rejects_unrepresentable_value() {
    let mut dict = Dictionary::new();
    assert!(matches!(
        dict.set("ratio", 0.5f64),
        Err(BencodeError::Unrepresentable("float"))
    ));
    assert!(matches!(
        dict.set("none", Option::<i64>::None),
        Err(BencodeError::Unrepresentable("null"))
    ));
    assert!(dict.is_empty());
}

#[test]
fn test_set_binds_parent() {
    let mut dict = Dictionary::new();
    dict.set("a", 1).unwrap();
    assert_eq!(dict.get("a").unwrap().parent(), Some(dict.id()));

    dict.set("a", 2).unwrap();
    assert_eq!(dict.get("a").unwrap().parent(), Some(dict.id()));

    let mut other = Dictionary::new();
    let moved = dict.remove("a").unwrap();
    assert_eq!(moved.parent(), None);
    other.set("b", moved).unwrap();
    assert_eq!(other.get("b").unwrap().parent(), Some(other.id()));
}

#[test]
fn test_list_replace_binds_parent() {
    let mut list = List::from_items(["a", "b"]).unwrap();

    let old = list.replace(1, 7).unwrap();
    assert_eq!(old, string("b"));
    assert_eq!(old.parent(), None);
    assert_eq!(list.get(1), Some(&integer(7)));
    assert_eq!(list.get(1).unwrap().parent(), Some(list.id()));

    assert!(matches!(
        list.replace(2, "c"),
        Err(BencodeError::IndexOutOfRange(2))
    ));
    assert!(matches!(
        list.replace(0, 0.5f64),
        Err(BencodeError::Unrepresentable("float"))
    ));
    assert_eq!(list.get(0), Some(&string("a")));
    assert_eq!(list.encode().as_ref(), b"l1:ai7ee");
}

#[test]
fn test_smart_add_pairs_elements() {
    let mut smart = Dictionary::new();
    for element in [string("k1"), integer(1), string("k2"), string("v2")] {
        smart.smart_add(element).unwrap();
    }
    smart.finish().unwrap();

    let mut paired = Dictionary::new();
    paired.set("k1", 1).unwrap();
    paired.set("k2", "v2").unwrap();

    assert_eq!(smart, paired);
    assert_eq!(smart.encode(), paired.encode());
}

#[test]
fn test_smart_add_state() {
    let mut dict = Dictionary::new();
    assert_eq!(dict.smart_add_state(), &SmartAddState::Empty);

    dict.smart_add(string("key")).unwrap();
    assert_eq!(
        dict.smart_add_state(),
        &SmartAddState::AwaitingValue(BString::from("key"))
    );
    assert_eq!(dict.pending_key().unwrap().parent(), Some(dict.id()));
    assert_eq!(dict.count(), 0);

    dict.smart_add(integer(5)).unwrap();
    assert!(dict.pending_key().is_none());
    assert_eq!(dict.get("key").unwrap().parent(), Some(dict.id()));
}

#[test]
fn test_smart_add_rejects_non_string_key() {
    let mut dict = Dictionary::new();
    assert!(matches!(
        dict.smart_add(integer(1)),
        Err(BencodeError::InvalidKey)
    ));
    assert_eq!(dict.smart_add_state(), &SmartAddState::Empty);
}

#[test]
fn test_smart_add_dangling_key() {
    let mut dict = Dictionary::new();
    dict.smart_add(string("a")).unwrap();
    dict.smart_add(integer(1)).unwrap();
    dict.smart_add(string("b")).unwrap();

    assert!(matches!(dict.finish(), Err(BencodeError::DanglingKey)));
    assert_eq!(dict.encode().as_ref(), b"d1:ai1ee");
    assert_eq!(
        dict.un_morph(),
        Native::Dict(vec![(Bytes::from_static(b"a"), Native::Integer(1))])
    );

    let key = dict.discard_pending().unwrap();
    assert_eq!(key.as_str(), Some("b"));
    assert_eq!(key.parent(), None);
    assert!(dict.finish().is_ok());
    assert!(dict.discard_pending().is_none());
}

#[test]
fn test_un_morph_follows_stored_order() {
    let mut dict = Dictionary::from_pairs([("b", 2), ("a", 1)]).unwrap();
    let native = dict.un_morph();
    let before: Vec<_> = native.as_dict().unwrap().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(before, [Bytes::from_static(b"b"), Bytes::from_static(b"a")]);

    dict.encode();
    let after: Vec<_> = dict.iter().map(|pair| pair.key().as_bytes().clone()).collect();
    assert_eq!(after, [Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
}

#[test]
fn test_nested_dicts_are_sorted() {
    let mut inner = Dictionary::new();
    inner.set("z", 1).unwrap();
    inner.set("y", 2).unwrap();

    let mut list = List::new();
    list.push(inner).unwrap();

    let mut outer = Dictionary::new();
    outer.set("list", list).unwrap();
    outer.set("first", "x").unwrap();

    assert_eq!(
        outer.encode().as_ref(),
        b"d5:first1:x4:listld1:yi2e1:zi1eeee"
    );
}

#[test]
fn test_sort_is_bytewise() {
    let mut dict = Dictionary::new();
    dict.set(&b"\xff"[..], 1).unwrap();
    dict.set("B", 2).unwrap();
    dict.set("a", 3).unwrap();
    dict.set("", 4).unwrap();
    assert_eq!(dict.encode().as_ref(), b"d0:i4e1:Bi2e1:ai3e1:\xffi1ee");
}

#[test]
fn test_compare() {
    assert!(string("a").compare(&string("a")));
    assert!(!string("a").compare(&string("b")));
    assert!(!string("1").compare(&integer(1)));
    assert!(integer(1).compare(&integer(1)));

    let dict = Element::morph(Dictionary::new()).unwrap();
    assert!(!dict.compare(&dict));
    let list = Element::morph(List::new()).unwrap();
    assert!(!list.compare(&list));
}

#[test]
fn test_count() {
    let mut dict = Dictionary::from_pairs([("a", 1), ("b", 2), ("a", 3)]).unwrap();
    assert_eq!(dict.count(), 2);
    dict.remove("a");
    assert_eq!(dict.count(), 1);
    assert_eq!(dict.entries().count(), 1);
}

#[test]
fn test_morph_dispatch() {
    assert_eq!(Element::morph("s").unwrap(), string("s"));
    assert_eq!(Element::morph(String::from("s")).unwrap(), string("s"));
    assert_eq!(Element::morph(b"s").unwrap(), string("s"));
    assert_eq!(Element::morph(vec![b's']).unwrap(), string("s"));
    assert_eq!(Element::morph(7u32).unwrap(), integer(7));
    assert_eq!(Element::morph(Some(-7i8)).unwrap(), integer(-7));
    assert!(matches!(
        Element::morph(u64::MAX),
        Err(BencodeError::IntegerOutOfRange)
    ));

    let list = Element::morph(vec![1, 2]).unwrap();
    assert_eq!(list.as_list().map(List::len), Some(2));

    let mut map = HashMap::new();
    map.insert("b", 2);
    map.insert("a", 1);
    let mut dict = Element::morph(map).unwrap();
    assert_eq!(dict.encode().as_ref(), b"d1:ai1e1:bi2ee");
}

#[test]
fn test_morph_is_idempotent() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let native = random_native(&mut rng, 3);
        let once = Element::morph(&native).unwrap();
        let twice = Element::morph(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_clone_rehomes_children() {
    let dict = Dictionary::from_pairs([("a", vec![1])]).unwrap();
    let copy = dict.clone();

    assert_ne!(dict.id(), copy.id());
    assert_eq!(dict, copy);

    let value = copy.get("a").unwrap();
    assert_eq!(value.parent(), Some(copy.id()));
    let list = value.as_list().unwrap();
    assert_eq!(list.get(0).unwrap().parent(), Some(list.id()));
}

#[test]
fn test_dict_equality_ignores_order() {
    let a = Dictionary::from_pairs([("x", 1), ("y", 2)]).unwrap();
    let b = Dictionary::from_pairs([("y", 2), ("x", 1)]).unwrap();
    let c = Dictionary::from_pairs([("y", 2), ("x", 3)]).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_write_to() {
    let mut element = Element::morph(vec!["spam"]).unwrap();
    let mut out = Vec::new();
    element.write_to(&mut out).unwrap();
    assert_eq!(out, b"l4:spame");
}

#[test]
fn test_encode_scalars() {
    assert_eq!(BInteger::new(0).encode().as_ref(), b"i0e");
    assert_eq!(
        BInteger::new(i64::MIN).encode().as_ref(),
        b"i-9223372036854775808e"
    );
    assert_eq!(
        BInteger::new(i64::MAX).encode().as_ref(),
        b"i9223372036854775807e"
    );
    assert_eq!(BString::from("").encode().as_ref(), b"0:");
    assert_eq!(
        BString::from("hello, world").encode().as_ref(),
        b"12:hello, world"
    );
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), integer(0));
}

#[test]
fn test_decode_integer_invalid() {
    assert!(decode(b"i-0e").is_err());
    assert!(decode(b"i03e").is_err());
    assert!(decode(b"ie").is_err());
    assert!(decode(b"i99999999999999999999e").is_err());
    assert!(matches!(decode(b"i+5e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i-e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i 5e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i--5e"), Err(BencodeError::InvalidInteger(_))));
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        integer(i64::MIN)
    );

    let strict = DecodeConfig::default().strict(true);
    assert!(matches!(
        decode_with(b"li+5ee", &strict),
        Err(BencodeError::InvalidInteger(_))
    ));
}

#[test]
fn test_decode_string() {
    assert_eq!(decode(b"4:spam").unwrap(), string("spam"));
    assert_eq!(decode(b"0:").unwrap(), string(""));
    assert!(matches!(decode(b"5:spam"), Err(BencodeError::UnexpectedEof)));
    assert!(matches!(decode(b"04:spam"), Err(BencodeError::InvalidStringLength)));
    assert!(matches!(decode(b"00:"), Err(BencodeError::InvalidStringLength)));
    assert!(matches!(decode(b"4"), Err(BencodeError::UnexpectedEof)));

    let strict = DecodeConfig::default().strict(true);
    assert!(matches!(
        decode_with(b"d1:a04:spame", &strict),
        Err(BencodeError::InvalidStringLength)
    ));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spami42ee").unwrap();
    let list = result.as_list().expect("expected list");
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(0), Some(&string("spam")));
    assert_eq!(list.get(1), Some(&integer(42)));
    assert_eq!(list.get(1).unwrap().parent(), Some(list.id()));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    let dict = result.as_dict().expect("expected dict");
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get("cow"), Some(&string("moo")));
}

#[test]
fn test_decode_dict_errors() {
    assert!(matches!(decode(b"di1ei2ee"), Err(BencodeError::InvalidKey)));
    assert!(matches!(decode(b"d1:ae"), Err(BencodeError::DanglingKey)));
    assert!(matches!(decode(b"d1:a"), Err(BencodeError::UnexpectedEof)));
}

#[test]
fn test_decode_duplicate_keys_merge() {
    let mut element = decode(b"d1:ai1e1:ai2ee").unwrap();
    assert_eq!(element.get("a"), Some(&integer(2)));
    assert_eq!(element.encode().as_ref(), b"d1:ai2ee");

    let strict = DecodeConfig::default().strict(true);
    assert!(matches!(
        decode_with(b"d1:ai1e1:ai2ee", &strict),
        Err(BencodeError::UnsortedKeys)
    ));
}

#[test]
fn test_decode_nesting_limit() {
    let mut data = vec![b'l'; 70];
    data.extend(vec![b'e'; 70]);
    assert!(matches!(decode(&data), Err(BencodeError::NestingTooDeep)));

    let shallow = DecodeConfig::default().max_depth(2);
    assert!(decode_with(b"ll0:ee", &shallow).is_ok());
    assert!(matches!(
        decode_with(b"lll0:eee", &shallow),
        Err(BencodeError::NestingTooDeep)
    ));
}

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for bencode roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let mut decoded = decode(original).unwrap();
    assert_eq!(decoded.encode().as_ref(), original);
}

#[test]
fn test_trailing_data_error() {
    assert!(matches!(decode(b"i42eextra"), Err(BencodeError::TrailingData)));
    assert!(matches!(decode(b"x"), Err(BencodeError::UnexpectedChar('x'))));
}

#[test]
fn test_native_roundtrip() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let native = random_native(&mut rng, 4);
        let mut element = Element::morph(&native).unwrap();
        let decoded = decode(&element.encode()).unwrap();
        assert_eq!(decoded.un_morph().into_sorted(), native.clone().into_sorted());
    }
}

#[test]
fn test_encoded_keys_strictly_ascending() {
    let strict = DecodeConfig::default().strict(true);
    let mut rng = rand::rng();
    for _ in 0..100 {
        let mut dict = Dictionary::new();
        for _ in 0..rng.random_range(2..12) {
            dict.set(random_key(&mut rng), rng.random_range(0..10)).unwrap();
        }
        assert!(decode_with(&dict.encode(), &strict).is_ok());
    }
}

#[test]
fn test_element_accessors() {
    let element = integer(42);
    assert_eq!(element.as_integer(), Some(42));
    assert!(element.as_bytes().is_none());
    assert_eq!(element.kind(), "integer");

    let element = string("test");
    assert_eq!(element.as_str(), Some("test"));
    assert!(element.as_integer().is_none());

    let element = Element::morph(Vec::<i64>::new()).unwrap();
    assert!(element.as_list().is_some());
    assert!(element.as_dict().is_none());
    assert!(element.into_dict().is_none());
}
