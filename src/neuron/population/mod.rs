//! A population of cells updated in lockstep, wired together through
//! delayed weighted connections.
//!
//! Every cell advances one grid step in parallel before any of the step's
//! spikes are delivered, so delivery order within a step never matters and
//! a connection delay of one step is the soonest an event can arrive.

use rayon::prelude::*;
use crate::error::{NeuronModelError, PopulationError, SolverError};
use super::grid_dynamics::GridDynamics;


/// A spike emitted by a cell at a given grid step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeEvent {
    /// Index of the cell that fired
    pub sender: usize,
    /// Grid step the spike occurred at
    pub step: usize,
}

/// A delayed weighted connection between two cells
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Index of the sending cell
    pub source: usize,
    /// Index of the receiving cell
    pub target: usize,
    /// Receptor port on the receiving cell
    pub port: usize,
    /// Synaptic weight
    pub weight: f32,
    /// Transmission delay in grid steps, at least one
    pub delay_steps: usize,
}

/// A set of cells of one model type advancing on a shared grid
#[derive(Debug, Clone)]
pub struct Population<T: GridDynamics> {
    /// The cells, indexed by the connection endpoints
    pub cells: Vec<T>,
    connections: Vec<Connection>,
    /// Next grid step to execute
    pub step: usize,
    /// Every spike emitted so far, in step order
    pub spike_events: Vec<SpikeEvent>,
}

impl<T: GridDynamics> Population<T> {
    pub fn new(cells: Vec<T>) -> Self {
        Population {
            cells,
            connections: vec![],
            step: 0,
            spike_events: vec![],
        }
    }

    /// Number of cells in the population
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The connections wired so far
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Calibrates every cell to the given resolution (ms)
    pub fn calibrate(&mut self, resolution: f32) -> Result<(), NeuronModelError> {
        for cell in self.cells.iter_mut() {
            cell.calibrate(resolution)?;
        }

        Ok(())
    }

    /// Wires a delayed weighted connection between two cells, checking the
    /// endpoints and the receptor port before anything is stored
    pub fn connect(&mut self, connection: Connection) -> Result<(), NeuronModelError> {
        let n_cells = self.cells.len();

        if connection.source >= n_cells {
            return Err(PopulationError::CellOutOfBounds {
                index: connection.source,
                n_cells,
            }.into());
        }

        if connection.target >= n_cells {
            return Err(PopulationError::CellOutOfBounds {
                index: connection.target,
                n_cells,
            }.into());
        }

        if connection.delay_steps == 0 {
            return Err(PopulationError::DelayTooShort.into());
        }

        self.cells[connection.target].check_receptor(connection.port)?;
        self.connections.push(connection);

        Ok(())
    }

    /// Advances every cell one grid step in parallel and then delivers the
    /// spikes the step produced along the stored connections
    pub fn run_step(&mut self) -> Result<(), NeuronModelError> {
        let step = self.step;

        let spiked: Vec<bool> = self.cells
            .par_iter_mut()
            .map(|cell| cell.advance_step(step))
            .collect::<Result<Vec<bool>, SolverError>>()?;

        for (sender, fired) in spiked.iter().enumerate() {
            if *fired {
                self.spike_events.push(SpikeEvent { sender, step });
            }
        }

        // cells have already consumed this step's slots, so a delay of one
        // step lands in the slot the next update reads
        for connection in self.connections.iter() {
            if spiked[connection.source] {
                self.cells[connection.target].receive_spike(
                    connection.delay_steps - 1,
                    connection.port,
                    connection.weight,
                )?;
            }
        }

        self.step += 1;

        Ok(())
    }

    /// Runs the given number of grid steps
    pub fn run_steps(&mut self, steps: usize) -> Result<(), NeuronModelError> {
        for _ in 0..steps {
            self.run_step()?;
        }

        Ok(())
    }

    /// Spikes emitted by the given cell so far, in step order
    pub fn spikes_of(&self, sender: usize) -> Vec<usize> {
        self.spike_events.iter()
            .filter(|event| event.sender == sender)
            .map(|event| event.step)
            .collect()
    }

    /// Forgets the recorded spike history without touching cell state
    pub fn clear_history(&mut self) {
        self.spike_events.clear();
    }
}
