//! Universe accumulation and the sealed entity index.
//!
//! Names are collected by a [`UniverseBuilder`] and sealed into an immutable [`EntityIndex`].
//! Stages can only be indexed against a sealed index, so a universe can never grow underneath
//! relations that already carry its ids.

use sankey_types::{EntityId, IndexedRelation, Relation, SankeyError};
use std::collections::{BTreeSet, HashMap};

/// Accepts universe unions until sealed.
#[derive(Debug, Clone, Default)]
pub struct UniverseBuilder {
    universe: BTreeSet<String>,
}

impl UniverseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `names` into the universe.
    pub fn add_universe<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.universe.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.universe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universe.is_empty()
    }

    /// Build the index: ids follow the lexicographic order of names.
    pub fn seal(self) -> EntityIndex {
        EntityIndex::from_sorted(self.universe.into_iter().collect())
    }
}

/// Immutable name <-> id mapping over a closed universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIndex {
    /// name -> id
    ids: HashMap<String, EntityId>,
    /// id -> name (sorted universe)
    names: Vec<String>,
}

impl EntityIndex {
    /// Build directly from a set of names. Same universe, same mapping.
    pub fn from_universe<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = UniverseBuilder::new();
        builder.add_universe(names);
        builder.seal()
    }

    fn from_sorted(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), EntityId(i as u32)))
            .collect();
        Self { ids, names }
    }

    /// Turn the index back into a builder. Ids assigned by the next `seal` are not
    /// comparable with ids from this index once the universe grows.
    pub fn reopen(self) -> UniverseBuilder {
        UniverseBuilder {
            universe: self.names.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Id for `name`, or `UnknownEntity`.
    pub fn id(&self, name: &str) -> Result<EntityId, SankeyError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| SankeyError::UnknownEntity(name.to_string()))
    }

    /// Display name for `id`.
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Names in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn index_relation(&self, relation: &Relation) -> Result<IndexedRelation, SankeyError> {
        Ok(IndexedRelation {
            source: self.id(&relation.source)?,
            target: self.id(&relation.target)?,
            value: relation.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_sorted_name_order() {
        let mut builder = UniverseBuilder::new();
        builder.add_universe(["gamma", "alpha"]).add_universe(["beta", "alpha"]);
        assert_eq!(builder.len(), 3);
        let index = builder.seal();

        assert_eq!(index.id("alpha").unwrap(), EntityId(0));
        assert_eq!(index.id("beta").unwrap(), EntityId(1));
        assert_eq!(index.id("gamma").unwrap(), EntityId(2));
        assert_eq!(index.name(EntityId(1)), Some("beta"));
        assert_eq!(index.names().collect::<Vec<_>>(), ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn rebuilding_same_universe_is_identical() {
        let a = EntityIndex::from_universe(["D", "B", "A", "C"]);
        let b = EntityIndex::from_universe(["A", "B", "C", "D"]);
        assert_eq!(a, b);
        assert_eq!(a.clone().reopen().seal(), a);
    }

    #[test]
    fn growth_reassigns_ids() {
        let index = EntityIndex::from_universe(["B", "C"]);
        assert_eq!(index.id("B").unwrap(), EntityId(0));
        let mut builder = index.reopen();
        builder.add_universe(["A"]);
        let grown = builder.seal();
        assert_eq!(grown.id("B").unwrap(), EntityId(1));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let index = EntityIndex::from_universe(["A"]);
        let err = index.id("Z").unwrap_err();
        assert!(matches!(err, SankeyError::UnknownEntity(ref n) if n == "Z"));

        let err = index
            .index_relation(&Relation::new("A", "missing", 1.0))
            .unwrap_err();
        assert!(matches!(err, SankeyError::UnknownEntity(ref n) if n == "missing"));
    }
}
