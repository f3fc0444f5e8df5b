//! `serde_json::Value` 트리를 점(.) 경로로 안전하게 읽고 쓰는 도우미 모음.
//!
//! 모든 함수는 전역(total) 함수다. 잘못된 입력에도 패닉하지 않고 기본값을 돌려준다.
//! 결과 검증기의 스키마 테이블(경로 → 기본값)이 이 함수들 위에서 동작한다.

use serde_json::{Map, Value};

/// 경로 문자열을 비어 있지 않은 세그먼트로 나눈다.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// `a.b.c` 경로의 값을 참조로 돌려준다. 중간 노드가 객체가 아니면 `None`.
pub fn get_nested<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = obj;
    let mut any = false;
    for key in segments(path) {
        current = current.as_object()?.get(key)?;
        any = true;
    }
    any.then_some(current)
}

/// `a.b.c` 경로의 값을 복사해 돌려준다. 없거나 `null`이면 `default`.
pub fn get_nested_property(obj: &Value, path: &str, default: Value) -> Value {
    match get_nested(obj, path) {
        Some(Value::Null) | None => default,
        Some(v) => v.clone(),
    }
}

/// `a.b.c` 경로에 값을 기록한다.
///
/// 중간 노드가 없거나 객체가 아니면 빈 객체로 바꿔 만든다. 루트가 객체가 아니어도
/// 객체로 교체한다. 경로가 비어 있으면 아무것도 하지 않고 `false`.
pub fn set_nested_property(obj: &mut Value, path: &str, value: Value) -> bool {
    let keys: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = keys.split_last() else {
        return false;
    };
    if !obj.is_object() {
        *obj = Value::Object(Map::new());
    }
    let mut current = obj;
    for key in parents {
        let Value::Object(map) = current else {
            return false;
        };
        let entry = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }
    match current {
        Value::Object(map) => {
            map.insert((*last).to_string(), value);
            true
        }
        _ => false,
    }
}

/// 두 값이 같은 JSON 종류(숫자/문자열/불리언/객체/배열/null)인지 확인한다.
pub fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// 스키마(경로 → 기본값)에 맞춰 `obj`의 사본을 보정한다.
///
/// 경로가 없거나 `null`이거나 기본값과 종류가 다르면 기본값으로 채운다.
/// 스키마에 없는 키는 그대로 남긴다.
pub fn ensure_object_structure<P: AsRef<str>>(obj: &Value, schema: &[(P, Value)]) -> Value {
    let mut out = if obj.is_object() {
        obj.clone()
    } else {
        Value::Object(Map::new())
    };
    for (path, default) in schema {
        let path = path.as_ref();
        let keep = matches!(get_nested(&out, path), Some(v) if same_kind(v, default));
        if !keep {
            set_nested_property(&mut out, path, default.clone());
        }
    }
    out
}

/// 객체 트리의 모든 말단(객체가 아닌 값)을 `(점 경로, 값)` 목록으로 편다.
pub fn flatten_leaves(obj: &Value) -> Vec<(String, Value)> {
    fn walk(prefix: &str, val: &Value, out: &mut Vec<(String, Value)>) {
        match val {
            Value::Object(map) => {
                for (k, v) in map {
                    let next = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&next, v, out);
                }
            }
            other => out.push((prefix.to_string(), other.clone())),
        }
    }
    let mut out = Vec::new();
    if obj.is_object() {
        walk("", obj, &mut out);
    }
    out
}

/// 값을 유한한 f64로 바꾼다. 숫자 문자열도 허용하며, 실패하면 `default`.
pub fn to_number(value: &Value, default: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

/// 0 또는 비유한 값으로 나누는 경우 `default`를 돌려주는 나눗셈.
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return default;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        default
    }
}

/// 유한하지 않은 값을 `fallback`으로 바꾼다.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
