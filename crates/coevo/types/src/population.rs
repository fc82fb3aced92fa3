use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Common surface of programs and tests as seen by the population manager.
pub trait Individual {
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug;

    fn id(&self) -> Self::Id;

    /// Current text (program encoding or query).
    fn text(&self) -> &str;

    /// Overwrite the text in place. Identity is retained.
    fn replace_text(&mut self, text: String);

    /// Failure details collected during the latest evaluation pass.
    fn error_log_mut(&mut self) -> &mut Vec<String>;
}

/// Ordered arena of individuals addressed by position or by stable id.
///
/// Positions are only meaningful against the fitness matrix of the latest
/// evaluation pass; ids stay valid across repairs, mutations and culls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Population<T> {
    members: Vec<T>,
}

impl<T> Default for Population<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<T: Individual> Population<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<T>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Append an individual and return its position.
    pub fn push(&mut self, member: T) -> usize {
        self.members.push(member);
        self.members.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.members.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.members.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.members.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.members
    }

    pub fn index_of(&self, id: T::Id) -> Option<usize> {
        self.members.iter().position(|m| m.id() == id)
    }

    pub fn find(&self, id: T::Id) -> Option<&T> {
        self.members.iter().find(|m| m.id() == id)
    }

    pub fn find_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.members.iter_mut().find(|m| m.id() == id)
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.members.iter().map(|m| m.id()).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.text()).collect()
    }

    /// Replace the text of the member at `idx`, keeping its identity.
    /// Returns `false` when `idx` is out of range.
    pub fn replace_text(&mut self, idx: usize, text: String) -> bool {
        match self.members.get_mut(idx) {
            Some(member) => {
                member.replace_text(text);
                true
            }
            None => false,
        }
    }

    /// Keep members matching `keep`, preserving order. Returns the number removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.members.len();
        self.members.retain(keep);
        before - self.members.len()
    }

    /// Keep exactly the members whose id is in `ids`, preserving population order.
    pub fn retain_ids(&mut self, ids: &HashSet<T::Id>) -> usize {
        self.retain(|m| ids.contains(&m.id()))
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, members: I) {
        self.members.extend(members);
    }
}

impl<'a, T> IntoIterator for &'a Population<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
