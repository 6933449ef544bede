// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
use serde_json::json;

fn context() -> EvalContext {
    let mut ctx = EvalContext::new();
    ctx.declare("version", Value::Number(1.0));
    ctx.declare(
        "jane_doe",
        Value::from(json!({ "birthday": "1990-01-01", "tags": ["a", "b"], "meta": { "active": true } })),
    );
    ctx
}

#[test]
fn test_literals_evaluate_to_themselves() {
    let ctx = EvalContext::new();
    assert_eq!(Expression::new(json!(1)).evaluate(&ctx), Ok(Value::Number(1.0)));
    assert_eq!(Expression::new(json!(false)).evaluate(&ctx), Ok(Value::Bool(false)));
    assert_eq!(Expression::new(json!(null)).evaluate(&ctx), Ok(Value::Null));
    assert_eq!(Expression::new(json!("plain $ text")).evaluate(&ctx), Ok(Value::from("plain $ text")));
}

#[test]
fn test_whole_reference_keeps_type() {
    let ctx = context();
    assert_eq!(evaluate_template("${version}", &ctx), Ok(Value::Number(1.0)));
    assert_eq!(evaluate_template("${ jane_doe.meta.active }", &ctx), Ok(Value::Bool(true)));
    assert_eq!(evaluate_template("${jane_doe.tags.1}", &ctx), Ok(Value::from("b")));

    let meta = evaluate_template("${jane_doe.meta}", &ctx).unwrap();
    assert!(meta.is_object());
}

#[test]
fn test_interpolation() {
    let ctx = context();
    assert_eq!(
        evaluate_template("v${version} born ${jane_doe.birthday}", &ctx),
        Ok(Value::from("v1 born 1990-01-01"))
    );
    assert_eq!(evaluate_template("$${version} is ${version}", &ctx), Ok(Value::from("${version} is 1")));
    assert_eq!(evaluate_template("$${version}", &ctx), Ok(Value::from("${version}")));
}

#[test]
fn test_interpolating_object_fails() {
    let ctx = context();
    let err = evaluate_template("meta: ${jane_doe.meta}", &ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::NotInterpolatable { path: "jane_doe.meta".into(), type_name: "object" });
    assert_eq!(err.code(), 705);
}

#[test]
fn test_unresolvable_references() {
    let ctx = context();

    let err = evaluate_template("${john.birthday}", &ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::UnknownVariable { name: "john".into() });
    assert!(err.to_string().contains("no variable named 'john'"));

    let err = evaluate_template("${jane_doe.date}", &ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::UnsupportedAttribute { path: "jane_doe".into(), name: "date".into() });

    let err = evaluate_template("${jane_doe.tags.7}", &ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::IndexOutOfRange { path: "jane_doe.tags".into(), index: 7 });

    let err = evaluate_template("${version.major}", &ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::NotTraversable { path: "version".into(), type_name: "number" });
}

#[test]
fn test_invalid_references() {
    let ctx = context();
    for bad in ["${}", "${a..b}", "${0.a}", "${a b}"] {
        let err = evaluate_template(bad, &ctx).unwrap_err();
        assert_eq!(err.code(), 706, "expected invalid reference for {}", bad);
    }
}

#[test]
fn test_arrays_and_objects_evaluate_elementwise() {
    let ctx = context();
    let value = Expression::new(json!({ "v": "${version}", "list": ["${jane_doe.birthday}", 2] }))
        .evaluate(&ctx)
        .unwrap();
    assert_eq!(value, Value::from(json!({ "v": 1, "list": ["1990-01-01", 2] })));

    let err = Expression::new(json!(["ok", "${missing}"])).evaluate(&ctx).unwrap_err();
    assert_eq!(err, EvalDiagnostic::UnknownVariable { name: "missing".into() });
}

#[test]
fn test_env_expansion() {
    unsafe {
        std::env::set_var("BLOCKCFG_TEST_ENV", "hello_world");
    }
    let ctx = EvalContext::new();
    assert_eq!(evaluate_template("${env.BLOCKCFG_TEST_ENV}", &ctx), Ok(Value::from("hello_world")));
    assert_eq!(
        evaluate_template("greeting: ${env.BLOCKCFG_TEST_ENV}", &ctx),
        Ok(Value::from("greeting: hello_world"))
    );
    assert_eq!(evaluate_template("${env.BLOCKCFG_SURELY_UNSET_VAR}", &ctx), Ok(Value::from("")));
    assert_eq!(evaluate_template("${env}", &ctx).unwrap_err().code(), 706);
}

#[test]
fn test_context_env_shadows_environment() {
    let mut ctx = EvalContext::new();
    ctx.declare("env", Value::from(json!({ "HOME": "/configured" })));
    assert_eq!(evaluate_template("${env.HOME}", &ctx), Ok(Value::from("/configured")));
}
