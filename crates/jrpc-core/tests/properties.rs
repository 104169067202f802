use jrpc_core::id::Decimal;
use jrpc_core::{response, Args, Request, RequestId};
use proptest::prelude::*;
use serde_json::{json, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,40}".prop_map(Value::from),
    ]
}

fn args() -> impl Strategy<Value = Args> {
    (
        prop::collection::vec(scalar(), 0..4),
        prop::collection::vec(("[a-z]{1,6}", scalar()), 0..4),
    )
        .prop_map(|(positional, keyword)| {
            let mut args = Args::new();
            for value in positional {
                args = args.arg(value);
            }
            for (key, value) in keyword {
                args = args.kwarg(key, value);
            }
            args
        })
}

proptest! {
    #[test]
    fn test_build_is_deterministic(method in "[a-z][a-z._]{0,15}", args in args()) {
        let a = Request::build(&method, args.clone(), true, &Decimal::new()).unwrap();
        let b = Request::build(&method, args, true, &Decimal::new()).unwrap();
        prop_assert_eq!(a.to_canonical_string().unwrap(), b.to_canonical_string().unwrap());
    }

    #[test]
    fn test_keyword_order_irrelevant(
        method in "[a-z]{1,8}",
        pairs in prop::collection::btree_map("[a-z]{1,6}", scalar(), 0..5)
    ) {
        let forward = pairs.iter().fold(Args::new(), |a, (k, v)| a.kwarg(k.clone(), v.clone()));
        let backward = pairs.iter().rev().fold(Args::new(), |a, (k, v)| a.kwarg(k.clone(), v.clone()));
        let a = Request::notification(&method, forward).unwrap();
        let b = Request::notification(&method, backward).unwrap();
        prop_assert_eq!(a.to_canonical_string().unwrap(), b.to_canonical_string().unwrap());
    }

    #[test]
    fn test_request_roundtrip(method in "[a-z]{1,8}", args in args(), id in any::<i64>()) {
        let req = Request::with_id(&method, args, id).unwrap();
        let text = req.to_canonical_string().unwrap();
        let back: Request = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(&back.method, &req.method);
        prop_assert_eq!(&back.params, &req.params);
        prop_assert_eq!(back.id, Some(RequestId::Number(id)));
    }

    #[test]
    fn test_success_result_passes_through(result in scalar(), id in any::<i64>()) {
        let raw = json!({"jsonrpc": "2.0", "result": result.clone(), "id": id}).to_string();
        prop_assert_eq!(response::validate(&raw).unwrap(), result);
    }

    #[test]
    fn test_validate_never_panics(raw in "\\PC*") {
        let _ = response::parse(&raw);
    }
}
