//! Named accessors for analog state so an external sampler can poll
//! membrane potentials, synaptic currents, and auxiliary variables at a
//! configured interval.
//!
//! A [`RecordablesMap`] is built once per model type and shared read-only
//! afterwards, a [`StateLogger`] polls one instance through it.

use std::collections::HashMap;
use crate::neuron::grid_dynamics::GridDynamics;


/// A per-model-type map of recordable names to accessor functions
pub struct RecordablesMap<T> {
    entries: Vec<(&'static str, fn(&T) -> f32)>,
}

impl<T> Clone for RecordablesMap<T> {
    fn clone(&self) -> Self {
        RecordablesMap { entries: self.entries.clone() }
    }
}

impl<T> Default for RecordablesMap<T> {
    fn default() -> Self {
        RecordablesMap::new()
    }
}

impl<T> RecordablesMap<T> {
    pub fn new() -> Self {
        RecordablesMap { entries: vec![] }
    }

    /// Registers an accessor under the given name
    pub fn insert(&mut self, name: &'static str, accessor: fn(&T) -> f32) {
        self.entries.push((name, accessor));
    }

    /// Returns the accessor registered under the given name
    pub fn get(&self, name: &str) -> Option<fn(&T) -> f32> {
        self.entries.iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, accessor)| *accessor)
    }

    /// Names of every recordable quantity
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter()
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads every recordable quantity from the given instance
    pub fn record_all(&self, cell: &T) -> Vec<(&'static str, f32)> {
        self.entries.iter()
            .map(|(name, accessor)| (*name, accessor(cell)))
            .collect()
    }
}

/// Polls a model's recordables every `interval` grid steps and stores the
/// sampled values as named series
pub struct StateLogger<T> {
    map: RecordablesMap<T>,
    /// Sampling interval in grid steps
    pub interval: usize,
    /// Sampled series keyed by recordable name
    pub records: HashMap<String, Vec<f32>>,
}

impl<T> StateLogger<T> {
    pub fn new(map: RecordablesMap<T>, interval: usize) -> Self {
        let records = map.names()
            .iter()
            .map(|name| (name.to_string(), vec![]))
            .collect();

        StateLogger {
            map,
            interval: interval.max(1),
            records,
        }
    }

    /// Samples every recordable if the step falls on the sampling interval
    pub fn sample(&mut self, step: usize, cell: &T) {
        if step % self.interval != 0 {
            return;
        }

        for (name, value) in self.map.record_all(cell) {
            if let Some(series) = self.records.get_mut(name) {
                series.push(value);
            }
        }
    }

    /// Returns the sampled series for the given recordable name
    pub fn series(&self, name: &str) -> Option<&[f32]> {
        self.records.get(name).map(|series| series.as_slice())
    }
}

/// Takes in a static current as an input and advances the given neuron
/// for a given number of grid steps while sampling its recordables,
/// returns the sampled series keyed by recordable name
pub fn run_static_input_with_logger<T: GridDynamics>(
    cell: &mut T,
    logger: &mut StateLogger<T>,
    input: f32,
    gaussian: bool,
    steps: usize,
) -> Result<(), crate::error::SolverError> {
    for step in 0..steps {
        let amplitude = if gaussian {
            cell.get_gaussian_factor() * input
        } else {
            input
        };

        cell.inject_current(0, amplitude);
        let _is_spiking = cell.advance_step(step)?;

        logger.sample(step, cell);
    }

    Ok(())
}
