//! Persistent indexed sequence backed by an RRB tree.

mod iter;
pub(crate) mod node;
pub(crate) mod ops;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Index};
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

pub use iter::Iter;

use crate::error::{Error, Result};
use crate::map::ChampMap;
use crate::transient::Owner;
use node::{Branch, Node};
use ops::insert::Inserted;
use ops::remove::Removed;
use ops::{concat, get, insert, push, remove, slice};

/// Persistent sequence with O(log N) indexed access, update, insert,
/// remove, slice and concatenation.
///
/// Every structural method returns a new list sharing all untouched
/// subtrees with the receiver; the receiver is never modified.
pub struct RrbList<T> {
    pub(crate) root: Option<Arc<Node<T>>>,
    len: usize,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<T> RrbList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the element at `index`, or `None` when out of
    /// bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.root.as_deref().map(|root| get::get(root, index))
    }

    /// Returns the first element, or `None` on an empty list.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element, or `None` on an empty list.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Returns the single element of a one-element list.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCollection`] on an empty list,
    /// [`Error::TooManyElements`] when more than one element is present.
    pub fn single(&self) -> Result<&T> {
        match self.len {
            0 => Err(Error::EmptyCollection),
            1 => self.get(0).ok_or(Error::EmptyCollection),
            _ => Err(Error::TooManyElements),
        }
    }

    /// Returns an iterator over the elements in logical order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.len)
    }
}

// ---------------------------------------------------------------------------
// Structural operations — T: Clone
// ---------------------------------------------------------------------------

impl<T: Clone> RrbList<T> {
    /// Returns a new list with `value` appended. Amortised O(1).
    #[must_use]
    pub fn push_back(&self, value: T) -> Self {
        let owner = Owner::frozen();
        let mut root = self.root.clone();
        Self::push_in(&owner, &mut root, value);
        Self { root, len: self.len + 1 }
    }

    /// Returns a new list with every element of `values` appended.
    ///
    /// Runs as one transient session: intermediate nodes are mutated in
    /// place and frozen before the list is returned.
    #[must_use]
    pub fn extend_with<I: IntoIterator<Item = T>>(&self, values: I) -> Self {
        let owner = Owner::new();
        let mut root = self.root.clone();
        let mut len = self.len;
        for value in values {
            Self::push_in(&owner, &mut root, value);
            len += 1;
        }
        if let Some(r) = &mut root {
            node::freeze(&owner, r);
        }
        Self { root, len }
    }

    /// Returns a new list with the element at `index` replaced by `value`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn set(&self, index: usize, value: T) -> Result<Self> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        let mut root = self.root.clone();
        if let Some(r) = &mut root {
            get::update(&Owner::frozen(), r, index, value);
        }
        Ok(Self { root, len: self.len })
    }

    /// Returns a new list with `value` inserted before position `index`;
    /// `index == len` appends.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index > len`.
    pub fn insert(&self, index: usize, value: T) -> Result<Self> {
        if index > self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        let owner = Owner::frozen();
        let Some(r) = &self.root else {
            return Ok(Self {
                root: Some(Arc::new(Node::leaf(vec![value], &owner))),
                len: 1,
            });
        };
        let mut root = r.clone();
        if let Inserted::Split(right) = insert::insert_at(&owner, &mut root, index, value) {
            let height = root.height() + 1;
            root = Arc::new(Node::Branch(Branch::from_children(
                height,
                vec![root, right],
                &owner,
            )));
        }
        Ok(Self { root: Some(root), len: self.len + 1 })
    }

    /// Returns a new list with all of `values` inserted before `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index > len`.
    pub fn insert_all<I: IntoIterator<Item = T>>(&self, index: usize, values: I) -> Result<Self> {
        if index > self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        let middle: Self = values.into_iter().collect();
        if middle.is_empty() {
            return Ok(self.clone());
        }
        let left = self.sublist(0, index)?;
        let right = self.sublist(index, self.len)?;
        Ok(left.concat(&middle).concat(&right))
    }

    /// Returns a new list without the element at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn remove_at(&self, index: usize) -> Result<Self> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        let Some(r) = &self.root else {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        };
        let mut root = r.clone();
        match remove::remove_at(&Owner::frozen(), &mut root, index) {
            Removed::Emptied => Ok(Self::new()),
            Removed::Kept => Ok(Self {
                root: Some(slice::collapse_root(root)),
                len: self.len - 1,
            }),
        }
    }

    /// Returns a new list without the first occurrence of `value`; the list
    /// is returned unchanged when the value is absent.
    #[must_use]
    pub fn remove_value(&self, value: &T) -> Self
    where
        T: PartialEq,
    {
        match self.index_of(value) {
            Some(index) => self.remove_at(index).unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }

    /// Returns a new list without the elements matching `pred`, rebuilt in
    /// one transient session.
    #[must_use]
    pub fn remove_where(&self, mut pred: impl FnMut(&T) -> bool) -> Self {
        self.iter().filter(|&x| !pred(x)).cloned().collect()
    }

    /// Returns the elements in `start..end` as a new list; subtrees fully
    /// inside the range are shared with the receiver.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `end > len` or `start > end`.
    pub fn sublist(&self, start: usize, end: usize) -> Result<Self> {
        if end > self.len {
            return Err(Error::IndexOutOfRange { index: end, len: self.len });
        }
        if start > end {
            return Err(Error::IndexOutOfRange { index: start, len: self.len });
        }
        if start == end {
            return Ok(Self::new());
        }
        if start == 0 && end == self.len {
            return Ok(self.clone());
        }
        let owner = Owner::frozen();
        let root = self
            .root
            .as_ref()
            .map(|r| slice::collapse_root(slice::slice(&owner, r, start, end)));
        Ok(Self { root, len: end - start })
    }

    /// Returns the concatenation of `self` and `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        match (&self.root, &other.root) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(l), Some(r)) => Self {
                root: Some(slice::collapse_root(concat::concat(&Owner::frozen(), l, r))),
                len: self.len + other.len,
            },
        }
    }

    /// Appends `value` below `root`, growing a level when the spine is full.
    fn push_in(owner: &Owner, root: &mut Option<Arc<Node<T>>>, value: T) {
        match root {
            None => *root = Some(Arc::new(Node::leaf(vec![value], owner))),
            Some(r) => {
                if push::is_full(r) {
                    *r = push::grow_root(r.clone(), value, owner);
                } else {
                    push::push(owner, r, value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search — T: PartialEq
// ---------------------------------------------------------------------------

impl<T: PartialEq> RrbList<T> {
    /// Returns the index of the first element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.index_of_from(value, 0)
    }

    /// Returns the index of the first element equal to `value` at or after
    /// `start`.
    #[must_use]
    pub fn index_of_from(&self, value: &T, start: usize) -> Option<usize> {
        self.iter()
            .enumerate()
            .skip(start)
            .find_map(|(i, x)| (x == value).then_some(i))
    }

    /// Returns the index of the last element equal to `value`.
    #[must_use]
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.last_index_of_until(value, self.len)
    }

    /// Returns the index of the last element equal to `value` before `end`.
    #[must_use]
    pub fn last_index_of_until(&self, value: &T, end: usize) -> Option<usize> {
        let end = end.min(self.len);
        let mut found = None;
        for (i, x) in self.iter().enumerate().take(end) {
            if x == value {
                found = Some(i);
            }
        }
        found
    }

    /// Returns `true` if some element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }
}

// ---------------------------------------------------------------------------
// Views and derivatives — iteration + rebuild
// ---------------------------------------------------------------------------

impl<T> RrbList<T> {
    /// Collects the elements into a `Vec` in logical order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Collects the distinct elements into a `HashSet`.
    #[must_use]
    pub fn to_set(&self) -> HashSet<T>
    where
        T: Hash + Eq + Clone,
    {
        self.iter().cloned().collect()
    }

    /// Returns a map from position to element.
    #[must_use]
    pub fn as_map(&self) -> ChampMap<usize, T>
    where
        T: Hash + Clone,
    {
        self.iter().cloned().enumerate().collect()
    }

    /// Returns a new list with `f` applied to every element.
    #[must_use]
    pub fn map<U: Clone>(&self, f: impl FnMut(&T) -> U) -> RrbList<U> {
        self.iter().map(f).collect()
    }

    /// Returns a new list keeping only the elements matching `pred`.
    #[must_use]
    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Self
    where
        T: Clone,
    {
        self.iter().filter(|&x| pred(x)).cloned().collect()
    }

    /// Returns a new list with the elements in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self
    where
        T: Clone,
    {
        let mut snapshot = self.to_vec();
        snapshot.reverse();
        Self::from(snapshot)
    }

    /// Returns a new list with the elements in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Self
    where
        T: Ord + Clone,
    {
        let mut snapshot = self.to_vec();
        snapshot.sort();
        Self::from(snapshot)
    }

    /// Returns a new list ordered by `cmp`.
    #[must_use]
    pub fn sorted_by(&self, cmp: impl FnMut(&T, &T) -> Ordering) -> Self
    where
        T: Clone,
    {
        let mut snapshot = self.to_vec();
        snapshot.sort_by(cmp);
        Self::from(snapshot)
    }

    /// Returns a new list with the elements in random order.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self
    where
        T: Clone,
    {
        let mut snapshot = self.to_vec();
        snapshot.shuffle(rng);
        Self::from(snapshot)
    }

    /// Concatenates the `Display` forms of all elements, separated by `sep`.
    #[must_use]
    pub fn join(&self, sep: &str) -> String
    where
        T: fmt::Display,
    {
        use fmt::Write;
        let mut out = String::new();
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            let _ = write!(out, "{x}");
        }
        out
    }

    /// Folds the elements left to right, seeding with the first element.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCollection`] on an empty list.
    pub fn reduce(&self, mut f: impl FnMut(T, &T) -> T) -> Result<T>
    where
        T: Clone,
    {
        let mut iter = self.iter();
        let first = iter.next().ok_or(Error::EmptyCollection)?;
        Ok(iter.fold(first.clone(), |acc, x| f(acc, x)))
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Manual impls — the derives would demand `T: Clone` / `T: Debug` bounds
// stronger than the cheap handle copy and element listing need.
impl<T> Clone for RrbList<T> {
    fn clone(&self) -> Self {
        Self { root: self.root.clone(), len: self.len }
    }
}

impl<T> Default for RrbList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RrbList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RrbList<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        if let (Some(a), Some(b)) = (&self.root, &other.root) {
            if Arc::ptr_eq(a, b) {
                return true;
            }
        }
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RrbList<T> {}

impl<T: Hash> Hash for RrbList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for x in self {
            x.hash(state);
        }
    }
}

impl<T> Index<usize> for RrbList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for length {}", self.len))
    }
}

impl<T: Clone> Add for RrbList<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.concat(&rhs)
    }
}

impl<T: Clone> Add for &RrbList<T> {
    type Output = RrbList<T>;

    fn add(self, rhs: Self) -> RrbList<T> {
        self.concat(rhs)
    }
}

impl<T: Clone> FromIterator<T> for RrbList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new().extend_with(iter)
    }
}

impl<T: Clone> Extend<T> for RrbList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        *self = self.extend_with(iter);
    }
}

impl<T: Clone> From<Vec<T>> for RrbList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for RrbList<T> {
    fn from(values: &[T]) -> Self {
        values.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a RrbList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Builds an [`RrbList`] from a comma-separated element list.
#[macro_export]
macro_rules! rrb_list {
    () => { $crate::RrbList::new() };
    ($($x:expr),+ $(,)?) => { $crate::RrbList::from(vec![$($x),+]) };
}
