//! A collection of point neuron models that advance on a fixed simulation
//! grid, covering exactly integrated integrate and fire models with delta,
//! exponential, and alpha shaped post-synaptic currents, a generalized
//! leaky integrate and fire model with after-spike currents, and adaptive
//! exponential and Hodgkin-Huxley models integrated numerically.
//!
//! Every model implements [`GridDynamics`] so populations, recording, and
//! input delivery work the same way regardless of how a given model is
//! integrated, and models can be swapped out without rewriting the
//! surrounding simulation code.

pub mod grid_dynamics;
pub mod recordables;
pub mod integrate_and_fire;
pub mod multisynapse;
pub mod glif;
pub mod adex;
pub mod hodgkin_huxley;
pub mod population;
/// A derive macro for the capability traits every `GridDynamics` model shares.
pub mod neuron_base_traits {
    pub use neuron_base_traits::*;
}

pub use grid_dynamics::{
    run_static_input, CurrentVoltage, GaussianFactor, GaussianParameters, GridDynamics,
    IsSpiking, LastFiringTime, Timestep, MIN_RESOLUTION,
};
pub use recordables::{run_static_input_with_logger, RecordablesMap, StateLogger};
pub use population::{Connection, Population, SpikeEvent};
