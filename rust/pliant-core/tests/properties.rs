//! Cross-cutting conversion properties: wrapper transparency, negative
//! rejection for unsigned targets, text idempotence, collection atomicity
//! and the layout round trip.

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{TimeZone, Utc};
use pliant_core::{
    boxed, map_get, parse_timestamp, split_text, to_bool, to_int, to_text, BoolOptions, Boxed, Convert, ConvertError,
    Dynamic, ScalarOptions, SequenceOptions, Timestamp, Value, TIME_LAYOUTS,
};

#[derive(Debug)]
struct Label;

impl Dynamic for Label {
    fn type_name(&self) -> &str {
        "Label"
    }

    fn render_text(&self) -> Option<String> {
        Some("label-7".to_string())
    }
}

#[derive(Debug)]
struct Triple;

impl Dynamic for Triple {
    fn type_name(&self) -> &str {
        "Triple"
    }

    fn as_sequence(&self) -> Option<Vec<Value>> {
        Some(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)])
    }
}

fn samples() -> Vec<Value> {
    vec![
        Value::Null,
        Value::from(true),
        Value::from(false),
        Value::from(-5i8),
        Value::from(300i16),
        Value::from(-70_000i32),
        Value::from(i64::MIN),
        Value::from(200u8),
        Value::from(65_535u16),
        Value::from(4_000_000_000u32),
        Value::from(u64::MAX),
        Value::from(-2.75f32),
        Value::from(1e300f64),
        Value::from("42"),
        Value::from("-17"),
        Value::from("0x10"),
        Value::from("2006-01-02"),
        Value::from("a,b;c"),
        Value::from(""),
        Value::from(b"7".to_vec()),
        Value::from(Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap()),
        Value::list([1i64, 2, 3]),
        Value::list(["x", "y"]),
        Value::map([("k", 1i64)]),
        Value::pairs([(1i64, "one")]),
        Value::indirect(9i32),
        Value::null_pointer(),
        Value::custom(Label),
        Value::custom(Triple),
    ]
}

fn assert_transparent<T>()
where
    T: Convert + PartialEq + Debug,
{
    for x in samples() {
        let plain = x.try_to::<T>();
        let wrapped = Value::from(boxed(x.clone())).try_to::<T>();
        assert_eq!(wrapped, plain, "box({x:?}) as {}", std::any::type_name::<T>());
    }
}

// ============================================================================
// Boxed transparency
// ============================================================================

#[test]
fn boxing_never_changes_scalar_results() {
    assert_transparent::<String>();
    assert_transparent::<bool>();
    assert_transparent::<i8>();
    assert_transparent::<i64>();
    assert_transparent::<u8>();
    assert_transparent::<u64>();
    assert_transparent::<usize>();
    assert_transparent::<f32>();
    assert_transparent::<f64>();
    assert_transparent::<Timestamp>();
}

#[test]
fn boxing_never_changes_collection_results() {
    assert_transparent::<Vec<String>>();
    assert_transparent::<Vec<i64>>();
    assert_transparent::<Vec<bool>>();
    assert_transparent::<Vec<Value>>();
    assert_transparent::<Vec<Boxed>>();
    assert_transparent::<BTreeMap<String, Value>>();
    assert_transparent::<BTreeMap<String, Boxed>>();
}

#[test]
fn boxing_never_changes_untyped_results() {
    assert_transparent::<Value>();
    assert_transparent::<Boxed>();
    assert_eq!(Value::from(boxed(5i64)).try_to::<Value>().unwrap(), Value::from(5i64));
    assert_eq!(boxed(boxed(5i64)).slice(), boxed(5i64).slice());
}

#[test]
fn boxes_inside_pointers_resolve() {
    let v = Value::indirect(Boxed::new(Value::indirect("12")));
    assert_eq!(v.try_to::<u32>().unwrap(), 12);
}

// ============================================================================
// Unsigned targets
// ============================================================================

fn assert_negative<T: Convert + Debug>(value: &Value) {
    let err = value.try_to::<T>().unwrap_err();
    assert!(err.is_negative(), "{value:?} as {}: {err}", std::any::type_name::<T>());
}

#[test]
fn unsigned_targets_reject_every_negative_number() {
    let negatives = [
        Value::from(-1i8),
        Value::from(-1i16),
        Value::from(-1i32),
        Value::from(i64::MIN),
        Value::from(-0.5f32),
        Value::from(-1e10f64),
    ];
    for v in &negatives {
        assert_negative::<u8>(v);
        assert_negative::<u16>(v);
        assert_negative::<u32>(v);
        assert_negative::<u64>(v);
        assert_negative::<usize>(v);
    }
}

#[test]
fn signed_targets_accept_negatives() {
    assert_eq!(Value::from(-1e10f64).try_to::<i64>().unwrap(), -10_000_000_000);
    assert_eq!(Value::from(-1i8).try_to::<i64>().unwrap(), -1);
}

// ============================================================================
// Text idempotence
// ============================================================================

#[test]
fn text_conversion_is_idempotent() {
    let opts = ScalarOptions::default();
    for x in samples() {
        if let Ok(once) = to_text(&x, &opts) {
            let twice = to_text(&Value::from(once.clone()), &opts).unwrap();
            assert_eq!(twice, once, "{x:?}");
        }
    }
}

#[test]
fn text_renderings_of_timestamps_parse_back() {
    let ts = Value::from(Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap());
    let text = to_text(&ts, &ScalarOptions::default()).unwrap();
    assert_eq!(Value::from(text).try_to::<Timestamp>().unwrap(), ts.try_to::<Timestamp>().unwrap());
}

// ============================================================================
// Collection atomicity
// ============================================================================

#[test]
fn one_bad_element_fails_the_whole_sequence() {
    let v = Value::list(["1", "2", "bad"]);
    let err = v.try_to::<Vec<i64>>().unwrap_err();
    assert!(matches!(err, ConvertError::Element { index: 2, .. }));
    assert!(v.to::<Vec<i64>>().is_empty());
}

#[test]
fn split_pieces_fail_atomically_too() {
    let err = Value::from("1,x,3")
        .try_to_with::<Vec<u8>>(&SequenceOptions::separated(","))
        .unwrap_err();
    assert!(matches!(err, ConvertError::Element { index: 1, .. }));
}

#[test]
fn sequence_capable_custom_values_act_as_lists() {
    assert_eq!(Value::custom(Triple).try_to::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
    assert_eq!(Value::custom(Label).try_to::<Vec<String>>().unwrap(), vec!["label", "7"]);
}

// ============================================================================
// Timestamp layouts
// ============================================================================

#[test]
fn every_layout_round_trips_its_example() {
    for layout in &TIME_LAYOUTS {
        let ts = parse_timestamp(layout.example, None).unwrap();
        assert_eq!(layout.render(&ts), layout.example, "layout {}", layout.name);
    }
}

#[test]
fn zone_abbreviations_survive_the_round_trip() {
    let cases = [
        ("rfc1123", "Mon, 02 Jan 2006 15:04:05 PST"),
        ("rfc822", "02 Jan 06 15:04 CET"),
        ("rfc850", "Monday, 02-Jan-06 15:04:05 EST"),
        ("unix_date", "Mon Jan  2 15:04:05 JST 2006"),
        ("canonical", "2006-01-02 15:04:05 -0700 MST"),
    ];
    for (name, text) in cases {
        let layout = TIME_LAYOUTS.iter().find(|l| l.name == name).unwrap();
        let ts = parse_timestamp(text, None).unwrap();
        assert_eq!(layout.render(&ts), text, "layout {name}");
    }
}

#[test]
fn layout_names_are_unique() {
    let mut names: Vec<&str> = TIME_LAYOUTS.iter().map(|l| l.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), TIME_LAYOUTS.len());
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn reference_scenarios() {
    let int = |s: &str| to_int::<i64>(&Value::from(s), &ScalarOptions::default());
    assert_eq!(int("42").unwrap(), 42);
    assert!(int("abc").is_err());

    assert!(!to_bool(&Value::from(0i64), &BoolOptions::default()).unwrap());
    assert!(to_bool(&Value::from(5i64), &BoolOptions::truthy("5")).unwrap());
    assert!(to_bool(&Value::from(5i64), &BoolOptions::default()).unwrap());

    let err = Value::from(-1i64).try_to::<u8>().unwrap_err();
    assert!(err.is_negative());
    assert_eq!(Value::from(-1i64).to::<u8>(), 0);

    assert_eq!(split_text("a,b,c", Some(",")), vec!["a", "b", "c"]);
    assert_eq!(split_text("ab12cd", None), vec!["ab", "12", "cd"]);

    assert_eq!(
        parse_timestamp("2006-01-02", None).unwrap(),
        Timestamp::from(Utc.with_ymd_and_hms(2006, 1, 2, 0, 0, 0).unwrap())
    );

    let nested = Value::map([("a", Value::map([("b", 1i64)]))]);
    assert_eq!(map_get(&nested, "a.b").unwrap(), boxed(1i64));
    match map_get(&nested, "a.c") {
        Err(ConvertError::MissingKey { segment, .. }) => assert_eq!(segment, "c"),
        other => panic!("expected a missing key error, got {other:?}"),
    }
}
