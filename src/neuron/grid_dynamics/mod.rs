//! The [`GridDynamics`] trait for encapsulating calibrated per-grid-step
//! neuronal dynamics as well as the capability traits every model shares
//! and the closed-form propagator coefficients used by the exactly
//! integrable models.

use crate::error::{ParameterError, ReceptorError, SolverError};
use crate::properties::PropertyMap;


/// Gets the current membrane potential (mV)
pub trait CurrentVoltage {
    fn get_current_voltage(&self) -> f32;
}

/// Gets the calibrated grid step (ms)
pub trait Timestep {
    fn get_dt(&self) -> f32;
}

/// Whether the neuron fired during the last update step
pub trait IsSpiking {
    fn is_spiking(&self) -> bool;
}

/// Gets and sets the last grid step the neuron fired at
pub trait LastFiringTime {
    /// Sets the last firing step of the neuron (`None` if it has not fired yet)
    fn set_last_firing_time(&mut self, step: Option<usize>);
    /// Gets the last firing step of the neuron (`None` if it has not fired yet)
    fn get_last_firing_time(&self) -> Option<usize>;
}

/// Gets a clamped normally distributed random factor for noisy inputs
pub trait GaussianFactor {
    fn get_gaussian_factor(&self) -> f32;
}

/// A set of parameters to use in generating gaussian noise
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianParameters {
    /// Mean of distribution
    pub mean: f32,
    /// Standard deviation of distribution
    pub std: f32,
    /// Maximum cutoff value
    pub max: f32,
    /// Minimum cutoff value
    pub min: f32,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        GaussianParameters {
            mean: 1.0, // center of norm distr
            std: 0.0, // std of norm distr
            max: 2.0, // maximum cutoff for norm distr
            min: 0.0, // minimum cutoff for norm distr
        }
    }
}

/// Smallest representable grid step (ms), every resolution must be an
/// integral multiple of this
pub const MIN_RESOLUTION: f32 = 0.001;

/// Checks that a resolution is a positive integral multiple of
/// [`MIN_RESOLUTION`]
pub fn validate_resolution(resolution: f32) -> Result<(), ParameterError> {
    if !resolution.is_finite() || resolution < MIN_RESOLUTION {
        return Err(ParameterError::InvalidResolution);
    }

    let steps = resolution / MIN_RESOLUTION;
    if (steps - steps.round()).abs() > 0.01 {
        return Err(ParameterError::InvalidResolution);
    }

    Ok(())
}

/// Converts a refractory duration (ms) into a whole number of grid steps
pub fn refractory_steps(t_ref: f32, resolution: f32) -> usize {
    (t_ref / resolution).round() as usize
}

/// Relative tolerance below which membrane and synaptic time constants are
/// treated as numerically degenerate
const TAU_EPSILON: f32 = 1e-4;

/// Exact charge-transfer propagator from an exponentially decaying synaptic
/// current onto the membrane potential over one step of length `h`,
/// switches to the l'Hopital limit when the time constants are degenerate
pub fn propagator_32(tau_syn: f32, tau_m: f32, c_m: f32, h: f32) -> f32 {
    if tau_m.is_infinite() {
        // pure integrator membrane, the current integrates without leak
        return tau_syn * (1. - (-h / tau_syn).exp()) / c_m;
    }

    if (tau_m - tau_syn).abs() < TAU_EPSILON * tau_m {
        h * (-h / tau_m).exp() / c_m
    } else {
        let k = 1. / tau_m - 1. / tau_syn;

        ((-h / tau_syn).exp() - (-h / tau_m).exp()) / (c_m * k)
    }
}

/// Exact charge-transfer propagator from the rise component of an alpha
/// shaped synaptic current onto the membrane potential over one step of
/// length `h`
pub fn propagator_31(tau_syn: f32, tau_m: f32, c_m: f32, h: f32) -> f32 {
    if tau_m.is_infinite() {
        let decay = (-h / tau_syn).exp();

        return tau_syn * (tau_syn * (1. - decay) - h * decay) / c_m;
    }

    if (tau_m - tau_syn).abs() < TAU_EPSILON * tau_m {
        h * h * (-h / tau_m).exp() / (2. * c_m)
    } else {
        let k = 1. / tau_m - 1. / tau_syn;

        h * (-h / tau_syn).exp() / (c_m * k) - propagator_32(tau_syn, tau_m, c_m, h) / k
    }
}

/// Exact decay of the membrane potential toward rest over one step of
/// length `h`, `1` for a pure integrator membrane
pub fn propagator_membrane_decay(tau_m: f32, h: f32) -> f32 {
    if tau_m.is_infinite() {
        1.
    } else {
        (-h / tau_m).exp()
    }
}

/// Exact charge transfer from a constant current onto the membrane
/// potential over one step of length `h`
pub fn propagator_constant_current(tau_m: f32, c_m: f32, h: f32) -> f32 {
    if tau_m.is_infinite() {
        h / c_m
    } else {
        tau_m / c_m * (1. - (-h / tau_m).exp())
    }
}

/// The central per-grid-step state machine every neuron model implements,
/// advancing a calibrated state one step at a time while consuming
/// accumulated input and reporting threshold crossings
pub trait GridDynamics:
    CurrentVoltage + Timestep + IsSpiking + LastFiringTime + GaussianFactor + Clone + Send + Sync
{
    /// Validates the current parameters and recomputes the derived
    /// propagator coefficients for the given resolution (ms), must be
    /// called again whenever parameters or the resolution change
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError>;

    /// Advances the state by one grid step with the given absolute step
    /// index, consuming pending buffered input, returns whether the neuron
    /// fired during the step
    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError>;

    /// Checks that a receptor port is valid for this model without
    /// delivering anything
    fn check_receptor(&self, port: usize) -> Result<(), ReceptorError>;

    /// Accumulates a weighted spike into the slot `delay_steps` ahead of
    /// the current step for the given receptor port
    fn receive_spike(
        &mut self,
        delay_steps: usize,
        port: usize,
        weight: f32,
    ) -> Result<(), ReceptorError>;

    /// Stages an external current amplitude (pA) `delay_steps` ahead of the
    /// current step
    fn inject_current(&mut self, delay_steps: usize, amplitude: f32);

    /// Exports every configurable parameter into a property map
    fn get_properties(&self) -> PropertyMap;

    /// Validates and applies the recognized entries of a property map,
    /// leaving the model untouched when any entry is invalid
    fn set_properties(&mut self, props: &PropertyMap) -> Result<(), ParameterError>;
}

macro_rules! impl_two_channel_input {
    () => {
        fn check_receptor(&self, port: usize) -> Result<(), ReceptorError> {
            if port != 0 {
                Err(ReceptorError::UnknownReceptor { port, n_receptors: 1 })
            } else {
                Ok(())
            }
        }

        fn receive_spike(
            &mut self,
            delay_steps: usize,
            port: usize,
            weight: f32,
        ) -> Result<(), ReceptorError> {
            self.check_receptor(port)?;
            self.buffers.add_spike(delay_steps, weight);

            Ok(())
        }

        fn inject_current(&mut self, delay_steps: usize, amplitude: f32) {
            self.buffers.currents.add(delay_steps, amplitude);
        }
    }
}

pub(crate) use impl_two_channel_input;

/// Takes in a static current as an input and advances the given neuron
/// for a given number of grid steps, set `gaussian` to true to add
/// normally distributed noise to the input as it iterates,
/// returns the voltages from the neuron over time
pub fn run_static_input<T: GridDynamics>(
    cell: &mut T,
    input: f32,
    gaussian: bool,
    steps: usize,
) -> Result<Vec<f32>, SolverError> {
    let mut voltages: Vec<f32> = vec![];

    for step in 0..steps {
        let amplitude = if gaussian {
            cell.get_gaussian_factor() * input
        } else {
            input
        };

        cell.inject_current(0, amplitude);
        let _is_spiking = cell.advance_step(step)?;

        voltages.push(cell.get_current_voltage());
    }

    Ok(voltages)
}
