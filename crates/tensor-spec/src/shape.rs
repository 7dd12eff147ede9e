// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and dimension utilities.

use crate::ShapeError;
use std::fmt;

/// Describes the dimensions of a model input tensor.
///
/// Shapes are immutable once created. In TOML and JSON a shape is written
/// as a plain array of dimensions, e.g. `[1, 4, 64, 64]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use tensor_spec::Shape;
    /// let s = Shape::new(vec![1, 4, 64, 64]);
    /// assert_eq!(s.rank(), 4);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Parses a comma-separated dimension list such as `"1,3,640,640"`.
    pub fn parse(s: &str) -> Result<Self, ShapeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShapeError::Parse {
                text: s.to_string(),
                detail: "empty dimension list".into(),
            });
        }

        let dims = s
            .split(',')
            .map(|d| {
                d.trim().parse::<usize>().map_err(|_| ShapeError::Parse {
                    text: s.to_string(),
                    detail: format!("'{}' is not a non-negative integer", d.trim()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { dims })
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the first axis where `self` exceeds `other`, if any.
    ///
    /// Both shapes must have the same rank; the caller checks that first.
    pub fn first_axis_exceeding(&self, other: &Shape) -> Option<usize> {
        self.dims
            .iter()
            .zip(other.dims.iter())
            .position(|(a, b)| a > b)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

/// Convenience: `Shape::from(vec![1, 77, 768])`.
impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

/// Convenience: `Shape::from(&[1, 77, 768][..])`.
impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shape() {
        let s = Shape::new(vec![2, 77, 768]);
        assert_eq!(s.rank(), 3);
        assert_eq!(s.dims(), &[2, 77, 768]);
    }

    #[test]
    fn test_parse() {
        let s = Shape::parse("1, 3,640,640").unwrap();
        assert_eq!(s.dims(), &[1, 3, 640, 640]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Shape::parse("").is_err());
        assert!(Shape::parse("1,x,3").is_err());
        assert!(Shape::parse("1,-1").is_err());
        assert!(Shape::parse("1,,2").is_err());
    }

    #[test]
    fn test_first_axis_exceeding() {
        let min = Shape::new(vec![1, 4, 64, 64]);
        let max = Shape::new(vec![2, 4, 64, 64]);
        assert_eq!(min.first_axis_exceeding(&max), None);
        assert_eq!(max.first_axis_exceeding(&min), Some(0));
    }

    #[test]
    fn test_display() {
        let s = Shape::new(vec![1, 4, 64, 64]);
        assert_eq!(format!("{s}"), "[1, 4, 64, 64]");
    }

    #[test]
    fn test_serde_transparent() {
        let s: Shape = serde_json::from_str("[1,77,768]").unwrap();
        assert_eq!(s, Shape::from(vec![1, 77, 768]));
        assert_eq!(serde_json::to_string(&s).unwrap(), "[1,77,768]");
    }

    #[test]
    fn test_from_conversions() {
        let s1: Shape = vec![2, 3].into();
        let s2: Shape = (&[2, 3][..]).into();
        assert_eq!(s1, s2);
    }
}
