use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

use num_traits::Float;

#[derive(Clone, Debug, PartialEq)]
pub struct Array1<T> {
    data: Vec<T>,
}

impl<T> Array1<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn select(&self, indices: &[usize]) -> Array1<T>
    where
        T: Clone,
    {
        indices.iter().map(|&idx| self.data[idx].clone()).collect()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }
}

/// Index of the largest value of a slice; the first one wins ties. NaNs are
/// skipped.
pub fn argmax<T: Float>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

impl<T> FromIterator<T> for Array1<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array1::from_vec(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for Array1<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Array1<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
