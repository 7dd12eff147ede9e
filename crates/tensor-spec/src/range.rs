// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Minimum / optimal / maximum shape triples for a single input.

use crate::{Shape, ShapeError};

/// The shape range a compiled backend specialises one input for.
///
/// `opt` and `max` default to `min` when omitted, which pins the input to a
/// fixed shape.
///
/// # TOML Format
/// ```toml
/// min_shape = [1, 4, 64, 64]
/// opt_shape = [2, 4, 64, 64]   # optional
/// max_shape = [2, 4, 64, 64]   # optional
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawRange", into = "RawRange")]
pub struct ShapeRange {
    min: Shape,
    opt: Shape,
    max: Shape,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRange {
    min_shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opt_shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_shape: Option<Shape>,
}

impl From<RawRange> for ShapeRange {
    fn from(raw: RawRange) -> Self {
        ShapeRange::new(raw.min_shape, raw.opt_shape, raw.max_shape)
    }
}

impl From<ShapeRange> for RawRange {
    fn from(range: ShapeRange) -> Self {
        RawRange {
            min_shape: range.min,
            opt_shape: Some(range.opt),
            max_shape: Some(range.max),
        }
    }
}

impl ShapeRange {
    /// Builds a range. Missing `opt` / `max` fall back to `min`.
    ///
    /// The range is not validated here; call [`ShapeRange::validate`].
    pub fn new(min: Shape, opt: Option<Shape>, max: Option<Shape>) -> Self {
        let opt = opt.unwrap_or_else(|| min.clone());
        let max = max.unwrap_or_else(|| min.clone());
        Self { min, opt, max }
    }

    /// A range pinned to a single shape.
    pub fn fixed(shape: Shape) -> Self {
        Self::new(shape, None, None)
    }

    /// Parses `"min"`, `"min:max"` or `"min:opt:max"`, each part a
    /// comma-separated dimension list.
    ///
    /// ```
    /// use tensor_spec::ShapeRange;
    /// let r = ShapeRange::parse("1,3,640,640:1,3,640,640:4,3,640,640").unwrap();
    /// assert_eq!(r.max().dims(), &[4, 3, 640, 640]);
    /// ```
    pub fn parse(s: &str) -> Result<Self, ShapeError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(ShapeError::Parse {
                text: s.to_string(),
                detail: format!("expected at most 3 ':'-separated shapes, got {}", parts.len()),
            });
        }

        let mut shapes = parts
            .iter()
            .map(|p| Shape::parse(p))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        // `split` always yields at least one part.
        let min = shapes.next().unwrap_or_else(|| Shape::new(Vec::new()));
        match (shapes.next(), shapes.next()) {
            (Some(max), None) => Ok(Self::new(min, None, Some(max))),
            (opt, max) => Ok(Self::new(min, opt, max)),
        }
    }

    /// Minimum shape.
    pub fn min(&self) -> &Shape {
        &self.min
    }

    /// Optimal shape.
    pub fn opt(&self) -> &Shape {
        &self.opt
    }

    /// Maximum shape.
    pub fn max(&self) -> &Shape {
        &self.max
    }

    /// Returns `true` when min, opt and max are identical.
    pub fn is_fixed(&self) -> bool {
        self.min == self.opt && self.opt == self.max
    }

    /// Checks that the range is well formed for `input`.
    ///
    /// Rules:
    /// - every shape has at least one dimension and no zero-sized dimension;
    /// - opt and max have the same rank as min;
    /// - `min <= opt <= max` on every axis.
    pub fn validate(&self, input: &str) -> Result<(), ShapeError> {
        for (which, shape) in [("min", &self.min), ("opt", &self.opt), ("max", &self.max)] {
            if shape.rank() == 0 || shape.dims().contains(&0) {
                return Err(ShapeError::Degenerate {
                    input: input.to_string(),
                    which,
                    shape: shape.clone(),
                });
            }
        }

        for (which, other) in [("opt", &self.opt), ("max", &self.max)] {
            if other.rank() != self.min.rank() {
                return Err(ShapeError::RankMismatch {
                    input: input.to_string(),
                    which,
                    min: self.min.clone(),
                    other: other.clone(),
                });
            }
        }

        let pairs = [
            ("min", &self.min, "max", &self.max),
            ("min", &self.min, "opt", &self.opt),
            ("opt", &self.opt, "max", &self.max),
        ];
        for (lower_name, lower, upper_name, upper) in pairs {
            if let Some(axis) = lower.first_axis_exceeding(upper) {
                return Err(ShapeError::Unordered {
                    input: input.to_string(),
                    axis,
                    lower_name,
                    lower: lower.clone(),
                    upper_name,
                    upper: upper.clone(),
                });
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for ShapeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "min={} opt={} max={}", self.min, self.opt, self.max)
        }
    }
}
