use serde::{Deserialize, Serialize};

/// A flat, fixed-length encoding of one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Contiguous `width` values starting at `offset`
    ///
    /// Returns `None` when the range runs past the end.
    #[inline]
    pub fn segment(&self, offset: usize, width: usize) -> Option<&[f64]> {
        self.data.get(offset..offset.checked_add(width)?)
    }

    /// New vector with `other` appended
    #[must_use]
    pub fn concat(&self, other: &Vector) -> Vector {
        let mut data = Vec::with_capacity(self.dim() + other.dim());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Vector::new(data)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}
