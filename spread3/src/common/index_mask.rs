//! This module contains tools for working with candidate indices as a mask of boolean values.

#[derive(Clone, Debug)]
pub struct IndexMask {
    mask: Vec<bool>,
}

impl IndexMask {
    /// Create a new IndexMask with the specified length and initial value.
    ///
    /// # Arguments
    ///
    /// * `len`: the length of the mask
    /// * `value`: the initial value for each index in the mask
    ///
    /// returns: IndexMask
    pub fn new(len: usize, value: bool) -> Self {
        IndexMask {
            mask: vec![value; len],
        }
    }

    /// Set the value at the specified index. Indices past the end of the mask are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        if index < self.mask.len() {
            self.mask[index] = value;
        }
    }

    /// Get the value at the specified index.
    pub fn get(&self, index: usize) -> bool {
        self.mask[index]
    }

    /// The number of indices currently set to `true`.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|v| **v).count()
    }

    /// Get the length of the mask.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }
}
