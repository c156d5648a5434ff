use serde_json::{Map, Value};

/// Depth-first walk over a raw definition.
///
/// `visit` sees every JSON object together with the key it was found under
/// (`None` at the root). Array elements are reported under their index.
/// States reference each other by name, so the tree never loops back on itself.
pub fn walk<F>(value: &mut Value, parent_key: Option<&str>, visit: &mut F)
where
    F: FnMut(&mut Map<String, Value>, Option<&str>),
{
    match value {
        Value::Object(map) => {
            visit(map, parent_key);
            for (key, child) in map.iter_mut() {
                if child.is_object() || child.is_array() {
                    walk(child, Some(key), visit);
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter_mut().enumerate() {
                if child.is_object() || child.is_array() {
                    let key = index.to_string();
                    walk(child, Some(&key), visit);
                }
            }
        }
        _ => {}
    }
}
