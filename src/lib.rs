//! # Point Neuron Models
//!
//! `point_neuron_models` is a package focused on simulating point neuron
//! models on a fixed time grid. Models whose subthreshold dynamics are
//! linear are advanced through exact precomputed propagator coefficients
//! while conductance based models are integrated numerically with an
//! adaptive embedded Runge-Kutta scheme. Every model implements the same
//! [`neuron::GridDynamics`] trait so input delivery, recording, and
//! populations work the same way regardless of the model, and new models
//! can be added via the type system without rewriting the surrounding
//! simulation code.
//!
//! Currently implements integrate and fire models with delta, exponential,
//! and alpha shaped post-synaptic currents, a multisynapse variant with an
//! arbitrary number of receptor ports, a generalized leaky integrate and
//! fire model with after-spike currents and an adaptive threshold, an
//! adaptive exponential conductance model, and a Hodgkin-Huxley model.
//!
//! ## Example Code
//!
//! ### Driving a single neuron with a static current
//!
//! ```rust
//! use point_neuron_models::{
//!     error::NeuronModelError,
//!     neuron::{
//!         integrate_and_fire::IafPscAlpha,
//!         run_static_input, GridDynamics,
//!     },
//! };
//!
//! fn main() -> Result<(), NeuronModelError> {
//!     let mut cell = IafPscAlpha::default();
//!     cell.calibrate(0.1)?;
//!
//!     // 100 ms of a 400 pA drive at a 0.1 ms resolution
//!     let voltages = run_static_input(&mut cell, 400., false, 1000)?;
//!
//!     assert_eq!(voltages.len(), 1000);
//!     assert!(voltages.iter().any(|v| *v > cell.parameters.e_l));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Coupling neurons through delayed connections
//!
//! ```rust
//! use point_neuron_models::{
//!     error::NeuronModelError,
//!     neuron::{
//!         integrate_and_fire::IafPscExp,
//!         Connection, GridDynamics, Population,
//!     },
//! };
//!
//! fn main() -> Result<(), NeuronModelError> {
//!     let mut driver = IafPscExp::default();
//!     driver.parameters.i_e = 450.; // suprathreshold drive (pA)
//!
//!     let mut population = Population::new(vec![driver, IafPscExp::default()]);
//!     population.calibrate(0.1)?;
//!
//!     population.connect(Connection {
//!         source: 0,
//!         target: 1,
//!         port: 0,
//!         weight: 50.,
//!         delay_steps: 10,
//!     })?;
//!
//!     population.run_steps(5000)?;
//!
//!     assert!(!population.spikes_of(0).is_empty());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Adding a custom model
//!
//! New models implement [`neuron::GridDynamics`] and derive the shared
//! capability traits with `#[derive(NeuronBase)]`, which expects the
//! deriving struct to have a `state` field with a `v_m` member as well as
//! `dt`, `is_spiking`, `last_firing_time`, and `gaussian_params` fields.

pub mod buffer;
pub mod distribution;
pub mod error;
pub mod properties;
pub mod solver;
pub mod neuron;
