//! The IR root: an ordered map from type name to type.

use crate::types::{ComponentType, DataType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Upper bound on `Ref` chains followed by [`Context::resolve`].
const MAX_REF_DEPTH: usize = 16;

/// The IR root.
///
/// Insertion order is the order in which output files are produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Every named type.
    pub types: IndexMap<String, DataType>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a type under `name`.
    pub fn insert(&mut self, name: impl Into<String>, datatype: DataType) {
        self.types.insert(name.into(), datatype);
    }

    /// Adds a type under its own declared name.
    ///
    /// Integer types have no name and are ignored.
    pub fn add(&mut self, datatype: DataType) {
        if let Some(name) = datatype.name().map(str::to_string) {
            self.types.insert(name, datatype);
        }
    }

    /// Looks up a type by type-map key, then by declared name.
    pub fn lookup(&self, name: &str) -> Option<&DataType> {
        self.types.get(name).or_else(|| {
            self.types
                .values()
                .find(|dt| !matches!(dt, DataType::Ref { .. }) && dt.name() == Some(name))
        })
    }

    /// Follows `Ref` chains until a concrete type is reached.
    ///
    /// Returns `None` for a dangling or cyclic reference.
    pub fn resolve<'a>(&'a self, datatype: &'a DataType) -> Option<&'a DataType> {
        let mut current = datatype;
        for _ in 0..MAX_REF_DEPTH {
            match current {
                DataType::Ref { name } => current = self.lookup(name)?,
                concrete => return Some(concrete),
            }
        }
        None
    }

    /// Iterates over the component types in type-map order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &ComponentType)> {
        self.types.iter().filter_map(|(name, dt)| match dt {
            DataType::Component(c) => Some((name.as_str(), c)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructType;

    #[test]
    fn resolve_follows_refs() {
        let mut ctx = Context::new();
        ctx.add(DataType::Component(ComponentType::new("Core")));
        ctx.insert("Alias", DataType::named("Core"));
        let r = DataType::named("Alias");
        assert!(matches!(ctx.resolve(&r), Some(DataType::Component(c)) if c.name == "Core"));
        assert_eq!(ctx.resolve(&DataType::bit()), Some(&DataType::bit()));
    }

    #[test]
    fn dangling_and_cyclic_refs_are_none() {
        let mut ctx = Context::new();
        ctx.insert("A", DataType::named("B"));
        ctx.insert("B", DataType::named("A"));
        assert!(ctx.resolve(&DataType::named("A")).is_none());
        assert!(ctx.resolve(&DataType::named("Missing")).is_none());
    }

    #[test]
    fn lookup_by_declared_name() {
        let mut ctx = Context::new();
        ctx.insert(
            "pkg.Bus",
            DataType::Struct(StructType {
                name: "Bus".into(),
                fields: Default::default(),
            }),
        );
        assert!(ctx.lookup("Bus").is_some());
        assert!(ctx.lookup("pkg.Bus").is_some());
    }

    #[test]
    fn components_keep_insertion_order() {
        let mut ctx = Context::new();
        ctx.add(DataType::Component(ComponentType::new("Top")));
        ctx.add(DataType::Struct(StructType {
            name: "Bus".into(),
            fields: Default::default(),
        }));
        ctx.add(DataType::Component(ComponentType::new("Leaf")));
        let names: Vec<_> = ctx.components().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Top", "Leaf"]);
    }

    #[test]
    fn json_roundtrip() {
        let mut ctx = Context::new();
        ctx.add(DataType::Component(ComponentType::new("Top")));
        let json = serde_json::to_string(&ctx).unwrap();
        let back: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }
}
