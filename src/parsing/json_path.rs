//! JSON path read helpers for payload extraction
//!
//! Internal utilities used by the schema-inferred strategy to walk response
//! trees by dotted path.

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PathSeg {
    Key(String),
    Index(usize),
}

/// Normalize a caller-facing path to dotted form. Configuration paths use
/// `>` as the segment delimiter, e.g. `"result>payload>items"`.
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('>', ".")
}

/// Parse a dotted/array path like `a.b[0].c[2]` into segments
pub(crate) fn parse_path(path: &str) -> Vec<PathSeg> {
    let mut segs = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }
        // Key up to the first '['
        let mut key = String::new();
        let mut chars = part.chars().peekable();
        while let Some(&ch) = chars.peek() {
            if ch == '[' {
                break;
            }
            key.push(ch);
            chars.next();
        }
        if !key.is_empty() {
            segs.push(PathSeg::Key(key));
        }
        // Zero or more [number]
        while let Some(&ch) = chars.peek() {
            if ch != '[' {
                break;
            }
            chars.next();
            let mut num = String::new();
            while let Some(&d) = chars.peek() {
                if d == ']' {
                    break;
                }
                num.push(d);
                chars.next();
            }
            let _ = chars.next();
            if let Ok(idx) = num.parse::<usize>() {
                segs.push(PathSeg::Index(idx));
            }
        }
    }
    segs
}

/// Get immutable reference by path
pub(crate) fn get_path<'a>(
    v: &'a serde_json::Value,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut cur = v;
    for seg in parse_path(path) {
        match (seg, cur) {
            (PathSeg::Key(k), serde_json::Value::Object(map)) => {
                cur = map.get(&k)?;
            }
            (PathSeg::Index(i), serde_json::Value::Array(arr)) => {
                cur = arr.get(i)?;
            }
            _ => return None,
        }
    }
    Some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_translates_angle_delimiters() {
        assert_eq!(normalize_path("result>payload>items"), "result.payload.items");
        assert_eq!(normalize_path("users"), "users");
    }

    #[test]
    fn parse_mixed_path() {
        let segs = parse_path("a.b[2].c[0][1]");
        assert!(matches!(&segs[0], PathSeg::Key(k) if k == "a"));
        assert!(matches!(&segs[1], PathSeg::Key(k) if k == "b"));
        assert!(matches!(segs[2], PathSeg::Index(2)));
        assert!(matches!(&segs[3], PathSeg::Key(k) if k == "c"));
        assert!(matches!(segs[4], PathSeg::Index(0)));
        assert!(matches!(segs[5], PathSeg::Index(1)));
    }

    #[test]
    fn get_path_walks_objects_and_arrays() {
        let v = serde_json::json!({ "errors": { "details": ["x", "y"] } });
        assert_eq!(
            get_path(&v, "errors.details[1]"),
            Some(&serde_json::json!("y"))
        );
        assert!(get_path(&v, "errors.missing").is_none());
    }

    #[test]
    fn get_path_rejects_type_mismatches() {
        let v = serde_json::json!({ "scalar": 5 });
        assert!(get_path(&v, "scalar.deeper").is_none());
        assert!(get_path(&v, "scalar[0]").is_none());
    }
}
