//! Object arena keyed by id.
//!
//! Objects are held behind `Arc` so cloning a table (for undo snapshots or a
//! scratch copy during a multi-object edit) copies only handles; a write goes
//! through `Arc::make_mut` and copies just the object being edited.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{CadObject, ObjectId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectTable {
    objects: BTreeMap<ObjectId, Arc<CadObject>>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CadObject> {
        self.objects.get(id).map(Arc::as_ref)
    }

    /// Mutable access; copies the object first if a snapshot still shares it
    pub fn get_mut(&mut self, id: &str) -> Option<&mut CadObject> {
        self.objects.get_mut(id).map(Arc::make_mut)
    }

    /// Insert (or replace) an object under its own id
    pub fn insert(&mut self, object: CadObject) {
        self.objects.insert(object.id.clone(), Arc::new(object));
    }

    pub fn remove(&mut self, id: &str) -> Option<CadObject> {
        self.objects.remove(id).map(Arc::unwrap_or_clone)
    }

    /// Objects in id order
    pub fn iter(&self) -> impl Iterator<Item = &CadObject> {
        self.objects.values().map(Arc::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.keys()
    }

    /// Parent of `id`, if that parent exists. A dangling `parent_id` reads as none.
    pub fn parent_of(&self, id: &str) -> Option<&CadObject> {
        let parent_id = self.get(id)?.parent_id.as_deref()?;
        self.get(parent_id)
    }

    /// An object with no existing parent
    pub fn is_root(&self, id: &str) -> bool {
        self.contains(id) && self.parent_of(id).is_none()
    }

    pub fn roots(&self) -> impl Iterator<Item = &CadObject> {
        self.iter().filter(|obj| self.is_root(&obj.id))
    }

    /// Walk parent links to the outermost ancestor.
    ///
    /// Returns `id` itself when it has no parent, when the parent link is
    /// dangling, or when `id` names no object. The walk is bounded by the
    /// table size, so a corrupt cyclic chain still terminates.
    pub fn top_level_ancestor(&self, id: &str) -> ObjectId {
        let mut current = id;
        for _ in 0..=self.len() {
            match self.parent_of(current) {
                Some(parent) if parent.id != id => current = &parent.id,
                _ => break,
            }
        }
        current.to_string()
    }

    /// `id` followed by its ancestors, innermost first
    pub fn ancestry(&self, id: &str) -> Vec<&CadObject> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(id);
        while let Some(obj) = current {
            if !seen.insert(obj.id.as_str()) {
                break;
            }
            chain.push(obj);
            current = self.parent_of(&obj.id);
        }
        chain
    }

    pub fn child_index(&self) -> ChildIndex {
        let mut children: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        for obj in self.iter() {
            if let Some(parent) = self.parent_of(&obj.id) {
                children
                    .entry(parent.id.clone())
                    .or_default()
                    .push(obj.id.clone());
            }
        }
        ChildIndex { children }
    }

    /// Existing ids from `ids` plus all their descendants, breadth first, without repeats
    pub fn collect_subtrees(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let index = self.child_index();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&ObjectId> = ids.iter().collect();

        while let Some(id) = queue.pop_front() {
            if !self.contains(id) || !seen.insert(id.clone()) {
                continue;
            }
            order.push(id.clone());
            queue.extend(index.children_of(id));
        }
        order
    }

    /// A new table holding the subtrees rooted at `ids`; objects are shared, not copied
    pub fn extract_subtrees(&self, ids: &[ObjectId]) -> ObjectTable {
        let objects = self
            .collect_subtrees(ids)
            .into_iter()
            .filter_map(|id| {
                let obj = self.objects.get(&id)?;
                Some((id, Arc::clone(obj)))
            })
            .collect();
        ObjectTable { objects }
    }

    /// Whether both tables hold the very same allocation for `id`
    pub fn shares_object(&self, other: &ObjectTable, id: &str) -> bool {
        match (self.objects.get(id), other.objects.get(id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl FromIterator<CadObject> for ObjectTable {
    fn from_iter<I: IntoIterator<Item = CadObject>>(iter: I) -> Self {
        let mut table = ObjectTable::new();
        for obj in iter {
            table.insert(obj);
        }
        table
    }
}

impl Serialize for ObjectTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.objects.len()))?;
        for (id, obj) in &self.objects {
            map.serialize_entry(id, obj.as_ref())?;
        }
        map.end()
    }
}

/// Parent id -> child ids, built once per traversal
#[derive(Debug, Default)]
pub struct ChildIndex {
    children: HashMap<ObjectId, Vec<ObjectId>>,
}

impl ChildIndex {
    pub fn children_of(&self, id: &str) -> &[ObjectId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShapeType, Transform};

    fn object(id: &str, parent: Option<&str>) -> CadObject {
        let mut obj = CadObject::new(
            id.to_string(),
            ShapeType::Box,
            Transform::new(),
            "#cccccc".to_string(),
        );
        obj.parent_id = parent.map(str::to_string);
        obj
    }

    fn tree() -> ObjectTable {
        [
            object("root", None),
            object("mid", Some("root")),
            object("leaf", Some("mid")),
            object("other", None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_top_level_ancestor_walks_to_root() {
        let t = tree();
        assert_eq!(t.top_level_ancestor("leaf"), "root");
        assert_eq!(t.top_level_ancestor("mid"), "root");
        assert_eq!(t.top_level_ancestor("root"), "root");
    }

    #[test]
    fn test_top_level_ancestor_missing_id_returns_input() {
        assert_eq!(tree().top_level_ancestor("ghost"), "ghost");
    }

    #[test]
    fn test_dangling_parent_is_treated_as_root() {
        let mut t = tree();
        t.insert(object("orphan", Some("gone")));
        assert_eq!(t.top_level_ancestor("orphan"), "orphan");
        assert!(t.is_root("orphan"));
        assert!(t.roots().any(|o| o.id == "orphan"));
    }

    #[test]
    fn test_cycle_terminates() {
        let t: ObjectTable = [object("a", Some("b")), object("b", Some("a"))]
            .into_iter()
            .collect();
        let top = t.top_level_ancestor("a");
        assert!(top == "a" || top == "b");
        assert_eq!(t.ancestry("a").len(), 2);
        assert_eq!(t.collect_subtrees(&["a".to_string()]).len(), 2);
    }

    #[test]
    fn test_collect_subtrees_breadth_first() {
        let t = tree();
        let ids = t.collect_subtrees(&["root".to_string(), "mid".to_string()]);
        assert_eq!(ids, vec!["root", "mid", "leaf"]);
    }

    #[test]
    fn test_clone_shares_until_write() {
        let t = tree();
        let mut copy = t.clone();
        assert!(copy.shares_object(&t, "leaf"));
        copy.get_mut("leaf").unwrap().color = "#000000".to_string();
        assert!(!copy.shares_object(&t, "leaf"));
        assert!(copy.shares_object(&t, "root"));
        assert_eq!(t.get("leaf").unwrap().color, "#cccccc");
    }

    #[test]
    fn test_serializes_as_id_map() {
        let value = serde_json::to_value(tree()).unwrap();
        assert_eq!(value["leaf"]["parentId"], "mid");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}
