//! Argument carrier - the value a step yields to replace the arguments
//! seen by the rest of the chain

use std::sync::Arc;

/// An immutable, ordered bundle of arguments
///
/// A step yields `Control::Replace(arguments)` to make every later step and
/// the destination observe these values instead of the ones it received.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Arguments<A> {
    values: Arc<[A]>,
}

impl<A> Arguments<A> {
    /// Create a carrier from an ordered list of values
    pub fn new(values: Vec<A>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// The arguments in positional order
    pub fn as_slice(&self) -> &[A] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.values.iter()
    }
}

impl<A: Clone> Arguments<A> {
    /// Copy the arguments into a positional list
    pub fn to_vec(&self) -> Vec<A> {
        self.values.to_vec()
    }
}

impl<A> Clone for Arguments<A> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl<A> From<Vec<A>> for Arguments<A> {
    fn from(values: Vec<A>) -> Self {
        Self::new(values)
    }
}

impl<A> FromIterator<A> for Arguments<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, A> IntoIterator for &'a Arguments<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
