//! A property bag for configuring models by name, used by the
//! `get_properties`/`set_properties` contract.
//!
//! Unknown keys are ignored by convention so one map can configure
//! heterogeneous models, known keys are type checked against the kind of
//! value the model expects.

use std::collections::HashMap;
use crate::error::ParameterError;


/// A single named property value
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// A scalar value such as a capacitance or time constant
    Scalar(f32),
    /// A per-receptor vector such as a set of synaptic time constants
    Vector(Vec<f32>),
}

/// A map of property names to values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap {
    values: HashMap<String, Property>,
}

impl PropertyMap {
    pub fn new() -> Self {
        PropertyMap { values: HashMap::new() }
    }

    /// Inserts a scalar value under the given name
    pub fn insert_scalar(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), Property::Scalar(value));
    }

    /// Inserts a vector value under the given name
    pub fn insert_vector(&mut self, name: &str, value: Vec<f32>) {
        self.values.insert(name.to_string(), Property::Vector(value));
    }

    /// Returns the scalar stored under the given name, `None` if the name
    /// is absent, or an error if the name holds a vector
    pub fn scalar(&self, name: &'static str) -> Result<Option<f32>, ParameterError> {
        match self.values.get(name) {
            Some(Property::Scalar(value)) => Ok(Some(*value)),
            Some(Property::Vector(_)) => Err(ParameterError::WrongPropertyKind(name)),
            None => Ok(None),
        }
    }

    /// Returns the vector stored under the given name, `None` if the name
    /// is absent, or an error if the name holds a scalar
    pub fn vector(&self, name: &'static str) -> Result<Option<&[f32]>, ParameterError> {
        match self.values.get(name) {
            Some(Property::Vector(value)) => Ok(Some(value)),
            Some(Property::Scalar(_)) => Err(ParameterError::WrongPropertyKind(name)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Property)> {
        self.values.iter()
    }
}

/// Overwrites `field` with the scalar stored under `name` if the map
/// contains it
pub fn update_scalar(
    props: &PropertyMap,
    name: &'static str,
    field: &mut f32,
) -> Result<(), ParameterError> {
    if let Some(value) = props.scalar(name)? {
        *field = value;
    }

    Ok(())
}

/// Overwrites `field` with the vector stored under `name` if the map
/// contains it
pub fn update_vector(
    props: &PropertyMap,
    name: &'static str,
    field: &mut Vec<f32>,
) -> Result<(), ParameterError> {
    if let Some(value) = props.vector(name)? {
        *field = value.to_vec();
    }

    Ok(())
}

/// Checks that a value that must be strictly positive is strictly positive,
/// infinity is allowed so time constants may be degenerate on purpose
pub fn check_positive(value: f32, name: &'static str) -> Result<(), ParameterError> {
    if value > 0. {
        Ok(())
    } else {
        Err(ParameterError::NonPositive(name))
    }
}

/// Checks that a value that must be non-negative is non-negative
pub fn check_non_negative(value: f32, name: &'static str) -> Result<(), ParameterError> {
    if value >= 0. {
        Ok(())
    } else {
        Err(ParameterError::Negative(name))
    }
}
