// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-input dynamic shape tables.

use crate::{ShapeError, ShapeRange};
use std::collections::BTreeMap;

/// Maps tensor input names to the shape range a compiled backend should
/// specialise for.
///
/// Inputs are kept in name order so that iteration, display, and
/// serialisation are deterministic.
///
/// # TOML Format
/// ```toml
/// [latent_input]
/// min_shape = [1, 4, 64, 64]
/// opt_shape = [2, 4, 64, 64]
/// max_shape = [2, 4, 64, 64]
///
/// [timestep]
/// min_shape = [1]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ShapeHint {
    inputs: BTreeMap<String, ShapeRange>,
}

impl ShapeHint {
    /// Creates an empty hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the range for `input`.
    pub fn insert(&mut self, input: impl Into<String>, range: ShapeRange) -> &mut Self {
        self.inputs.insert(input.into(), range);
        self
    }

    /// Builder form of [`ShapeHint::insert`].
    pub fn with(mut self, input: impl Into<String>, range: ShapeRange) -> Self {
        self.insert(input, range);
        self
    }

    /// Parses one `name=min[:opt]:max` entry and adds it.
    ///
    /// ```
    /// use tensor_spec::ShapeHint;
    /// let mut hint = ShapeHint::new();
    /// hint.parse_entry("image=1,3,640,640").unwrap();
    /// assert!(hint.get("image").unwrap().is_fixed());
    /// ```
    pub fn parse_entry(&mut self, entry: &str) -> Result<&mut Self, ShapeError> {
        let (name, shapes) = entry.split_once('=').ok_or_else(|| ShapeError::Parse {
            text: entry.to_string(),
            detail: "expected 'name=min[:opt]:max'".into(),
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ShapeError::EmptyInputName);
        }

        let range = ShapeRange::parse(shapes)?;
        Ok(self.insert(name, range))
    }

    /// Returns the range for `input`, if present.
    pub fn get(&self, input: &str) -> Option<&ShapeRange> {
        self.inputs.get(input)
    }

    /// Number of inputs with a range.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns `true` when no input has a range, i.e. fully dynamic shapes.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterates over `(input, range)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShapeRange)> {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validates every entry, failing on the first malformed one.
    pub fn validate(&self) -> Result<(), ShapeError> {
        for (input, range) in &self.inputs {
            if input.trim().is_empty() {
                return Err(ShapeError::EmptyInputName);
            }
            range.validate(input)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, ShapeRange)> for ShapeHint {
    fn from_iter<I: IntoIterator<Item = (String, ShapeRange)>>(iter: I) -> Self {
        Self {
            inputs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    fn unet_hint() -> ShapeHint {
        ShapeHint::new()
            .with(
                "latent_input",
                ShapeRange::new(
                    Shape::from(vec![1, 4, 64, 64]),
                    Some(Shape::from(vec![2, 4, 64, 64])),
                    Some(Shape::from(vec![2, 4, 64, 64])),
                ),
            )
            .with("timestep", ShapeRange::fixed(Shape::from(vec![1])))
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let hint = unet_hint();
        let names: Vec<&str> = hint.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["latent_input", "timestep"]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(unet_hint().validate().is_ok());
        assert!(ShapeHint::new().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_input() {
        let hint = unet_hint().with(
            "encoder_embedding",
            ShapeRange::new(
                Shape::from(vec![2, 77, 768]),
                None,
                Some(Shape::from(vec![1, 77, 768])),
            ),
        );
        let err = hint.validate().unwrap_err();
        assert_eq!(err.input(), Some("encoder_embedding"));
    }

    #[test]
    fn test_parse_entry() {
        let mut hint = ShapeHint::new();
        hint.parse_entry("image=1,3,320,320").unwrap();
        hint.parse_entry("scale_factor = 1,2").unwrap();
        assert_eq!(hint.len(), 2);
        assert_eq!(hint.get("scale_factor").unwrap().min().dims(), &[1, 2]);
    }

    #[test]
    fn test_parse_entry_errors() {
        let mut hint = ShapeHint::new();
        assert!(matches!(
            hint.parse_entry("=1,2"),
            Err(ShapeError::EmptyInputName)
        ));
        assert!(matches!(
            hint.parse_entry("image"),
            Err(ShapeError::Parse { .. })
        ));
        assert!(hint.is_empty());
    }

    #[test]
    fn test_toml_table() {
        let hint: ShapeHint = toml::from_str(
            r#"
[latent]
min_shape = [1, 4, 64, 64]
max_shape = [2, 4, 64, 64]
"#,
        )
        .unwrap();
        assert_eq!(hint.len(), 1);
        assert_eq!(hint.get("latent").unwrap().max().dims(), &[2, 4, 64, 64]);
    }
}
