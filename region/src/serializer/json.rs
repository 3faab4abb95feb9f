//! JSON inventory of a registry.
//!
//! One document with the container settings, the counters and one node per
//! entry in index order. Collections nest their members.

use serde_json::{json, Map, Value};

use crate::registry::{Entry, Registry};

/// Serializes the registry inventory.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json(registry: &Registry) -> Value {
    let config = registry.config();
    let mut counters = Map::new();
    for (kind, n) in registry.counters() {
        counters.insert(kind.as_str().to_owned(), json!(n));
    }
    let entries: Vec<Value> = registry.entries().into_iter().map(entry_node).collect();
    json!({
        "name": config.name,
        "config": {
            "dimension": config.dimension,
            "box": [config.width, config.height, config.depth],
            "center": config.center,
            "spacefilling": config.spacefilling,
            "region_units": config.region_units,
            "lattice": {
                "style": config.lattice_style,
                "scale": config.lattice_scale
            }
        },
        "counters": {
            "all": registry.total(),
            "kinds": Value::Object(counters)
        },
        "nbeads": registry.nbeads(),
        "entries": entries
    })
}

fn entry_node(entry: &Entry) -> Value {
    match entry {
        Entry::Object(o) => {
            let flags: Vec<&str> = o.flags().into_iter().map(|k| k.as_str()).collect();
            json!({
                "name": o.name(),
                "kind": o.kind().as_str(),
                "alike": o.alike().as_str(),
                "index": o.index(),
                "subindex": o.subindex(),
                "beadtype": o.beadtype(),
                "flags": flags,
                "statics": o.statics(),
                "dynamics": o.dynamics()
            })
        }
        Entry::Collection(c) => {
            let members: Vec<Value> = c
                .members()
                .map(|(alias, member)| {
                    let mut node = entry_node(member);
                    if let Value::Object(map) = &mut node {
                        map.insert("alias".to_owned(), json!(alias));
                    }
                    node
                })
                .collect();
            json!({
                "name": c.name(),
                "kind": entry.kind().as_str(),
                "alike": entry.kind().alike().as_str(),
                "index": c.index(),
                "subindex": c.subindex(),
                "beadtypes": c.beadtypes(),
                "group": c.has_group(),
                "members": members
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::object::ObjectOptions;
    use crate::registry::CollectionOptions;

    #[test]
    fn inventory_lists_entries_in_order() {
        let mut r = Registry::default();
        r.create(
            Geometry::sphere(0, 0, 0, 1),
            ObjectOptions::named("S").with_variable("vx", "0.1*step"),
        )
        .unwrap();
        let m = r
            .create_detached(Geometry::block(0, 1, 0, 1, 0, 1), ObjectOptions::named("m"))
            .unwrap();
        r.collection(vec![("first".into(), m.into())], CollectionOptions::default())
            .unwrap();
        let doc = to_json(&r);
        assert_eq!(doc["name"], "region container");
        assert_eq!(doc["counters"]["all"], 2);
        assert_eq!(doc["counters"]["kinds"]["sphere"], 1);
        assert_eq!(doc["entries"][0]["name"], "S");
        assert_eq!(doc["entries"][0]["flags"], json!(["variables", "region", "create"]));
        assert_eq!(doc["entries"][0]["dynamics"]["vx"], "0.1*step");
        assert_eq!(doc["entries"][1]["kind"], "collection");
        assert_eq!(doc["entries"][1]["members"][0]["alias"], "first");
        assert_eq!(doc["entries"][1]["members"][0]["kind"], "block");
    }
}
