//! A Hodgkin-Huxley conductance model with alpha shaped post-synaptic
//! currents, integrated numerically each grid step through a pluggable
//! [`OdeSolver`].
//!
//! Spikes are detected as upward crossings of 0 mV rather than imposed by
//! a reset rule, the refractory period only suppresses double counting
//! while the membrane stays depolarized.

use ndarray::Array1;
use neuron_base_traits::NeuronBase;
use crate::buffer::SpikeBuffers;
use crate::error::{ParameterError, ReceptorError, SolverError};
use crate::properties::{check_non_negative, check_positive, update_scalar, PropertyMap};
use crate::solver::{AdaptiveRk45, OdeSolver};
use super::grid_dynamics::{
    impl_two_channel_input, refractory_steps, validate_resolution, CurrentVoltage,
    GaussianFactor, GaussianParameters, GridDynamics, IsSpiking, LastFiringTime, Timestep,
};
use super::recordables::RecordablesMap;


/// A Hodgkin-Huxley neuron with alpha shaped excitatory and inhibitory
/// post-synaptic currents
#[derive(Debug, Clone, NeuronBase)]
pub struct HhPscAlpha<S: OdeSolver = AdaptiveRk45> {
    /// User-configurable physical constants
    pub parameters: HhPscAlphaParameters,
    /// Mutable simulation state
    pub state: HhPscAlphaState,
    /// Per-channel incoming event accumulation
    pub buffers: SpikeBuffers,
    /// Numerical integration strategy for the membrane dynamics
    pub solver: S,
    /// Refractory period in whole steps, derived at calibration
    refractory_steps: usize,
    /// Calibrated grid step (ms)
    pub dt: f32,
    /// Whether the neuron fired during the last step
    pub is_spiking: bool,
    /// Last step the neuron has spiked
    pub last_firing_time: Option<usize>,
    /// Parameters used in generating noise
    pub gaussian_params: GaussianParameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HhPscAlphaParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Sodium peak conductance (nS)
    pub g_na: f32,
    /// Potassium peak conductance (nS)
    pub g_k: f32,
    /// Leak conductance (nS)
    pub g_l: f32,
    /// Sodium reversal potential (mV)
    pub e_na: f32,
    /// Potassium reversal potential (mV)
    pub e_k: f32,
    /// Leak reversal potential (mV)
    pub e_l: f32,
    /// Excitatory synaptic time constant (ms)
    pub tau_syn_ex: f32,
    /// Inhibitory synaptic time constant (ms)
    pub tau_syn_in: f32,
    /// Spike counting dead time (ms)
    pub t_ref: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for HhPscAlphaParameters {
    fn default() -> Self {
        HhPscAlphaParameters {
            c_m: 100., // membrane capacitance (pF)
            g_na: 12000., // sodium conductance (nS)
            g_k: 3600., // potassium conductance (nS)
            g_l: 30., // leak conductance (nS)
            e_na: 50., // sodium reversal potential (mV)
            e_k: -77., // potassium reversal potential (mV)
            e_l: -54.402, // leak reversal potential (mV)
            tau_syn_ex: 0.2, // excitatory synaptic time constant (ms)
            tau_syn_in: 2., // inhibitory synaptic time constant (ms)
            t_ref: 2., // spike counting dead time (ms)
            i_e: 0., // external current (pA)
        }
    }
}

impl HhPscAlphaParameters {
    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_non_negative(self.g_na, "g_Na")?;
        check_non_negative(self.g_k, "g_K")?;
        check_positive(self.g_l, "g_L")?;
        check_positive(self.tau_syn_ex, "tau_syn_ex")?;
        check_positive(self.tau_syn_in, "tau_syn_in")?;
        check_non_negative(self.t_ref, "t_ref")?;

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "g_Na", &mut self.g_na)?;
        update_scalar(props, "g_K", &mut self.g_k)?;
        update_scalar(props, "g_L", &mut self.g_l)?;
        update_scalar(props, "E_Na", &mut self.e_na)?;
        update_scalar(props, "E_K", &mut self.e_k)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "tau_syn_ex", &mut self.tau_syn_ex)?;
        update_scalar(props, "tau_syn_in", &mut self.tau_syn_in)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("g_Na", self.g_na);
        props.insert_scalar("g_K", self.g_k);
        props.insert_scalar("g_L", self.g_l);
        props.insert_scalar("E_Na", self.e_na);
        props.insert_scalar("E_K", self.e_k);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("tau_syn_ex", self.tau_syn_ex);
        props.insert_scalar("tau_syn_in", self.tau_syn_in);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HhPscAlphaState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Sodium activation gate
    pub m: f32,
    /// Sodium inactivation gate
    pub h: f32,
    /// Potassium activation gate
    pub n: f32,
    /// Rise component of the excitatory alpha current
    pub di_ex: f32,
    /// Excitatory synaptic current (pA)
    pub i_ex: f32,
    /// Rise component of the inhibitory alpha current
    pub di_in: f32,
    /// Inhibitory synaptic current (pA)
    pub i_in: f32,
    /// Remaining dead time steps for spike counting
    pub refractory_steps_left: usize,
}

impl HhPscAlphaState {
    /// Starts at the resting potential with the gates at their steady
    /// state values
    pub fn new() -> Self {
        let v_rest = -65.;

        HhPscAlphaState {
            v_m: v_rest,
            m: alpha_m(v_rest) / (alpha_m(v_rest) + beta_m(v_rest)),
            h: alpha_h(v_rest) / (alpha_h(v_rest) + beta_h(v_rest)),
            n: alpha_n(v_rest) / (alpha_n(v_rest) + beta_n(v_rest)),
            di_ex: 0.,
            i_ex: 0.,
            di_in: 0.,
            i_in: 0.,
            refractory_steps_left: 0,
        }
    }
}

impl Default for HhPscAlphaState {
    fn default() -> Self {
        HhPscAlphaState::new()
    }
}

// channel gating rate functions (1/ms), voltages in mV

fn alpha_n(v: f32) -> f32 {
    let x = v + 55.;

    if x.abs() < 1e-4 {
        0.1
    } else {
        0.01 * x / (1. - (-x / 10.).exp())
    }
}

fn beta_n(v: f32) -> f32 {
    0.125 * (-(v + 65.) / 80.).exp()
}

fn alpha_m(v: f32) -> f32 {
    let x = v + 40.;

    if x.abs() < 1e-4 {
        1.
    } else {
        0.1 * x / (1. - (-x / 10.).exp())
    }
}

fn beta_m(v: f32) -> f32 {
    4. * (-(v + 65.) / 18.).exp()
}

fn alpha_h(v: f32) -> f32 {
    0.07 * (-(v + 65.) / 20.).exp()
}

fn beta_h(v: f32) -> f32 {
    1. / (1. + (-(v + 35.) / 10.).exp())
}

/// Derivative of the full membrane, gating, and synaptic system
fn hh_derivatives(
    parameters: &HhPscAlphaParameters,
    input_current: f32,
    y: &Array1<f32>,
    dydt: &mut Array1<f32>,
) {
    let v = y[0];
    let m = y[1];
    let h = y[2];
    let n = y[3];
    let di_ex = y[4];
    let i_ex = y[5];
    let di_in = y[6];
    let i_in = y[7];

    let i_na = parameters.g_na * m.powi(3) * h * (v - parameters.e_na);
    let i_k = parameters.g_k * n.powi(4) * (v - parameters.e_k);
    let i_l = parameters.g_l * (v - parameters.e_l);

    dydt[0] = (-i_na - i_k - i_l + parameters.i_e + input_current + i_ex + i_in)
        / parameters.c_m;
    dydt[1] = alpha_m(v) * (1. - m) - beta_m(v) * m;
    dydt[2] = alpha_h(v) * (1. - h) - beta_h(v) * h;
    dydt[3] = alpha_n(v) * (1. - n) - beta_n(v) * n;
    dydt[4] = -di_ex / parameters.tau_syn_ex;
    dydt[5] = di_ex - i_ex / parameters.tau_syn_ex;
    dydt[6] = -di_in / parameters.tau_syn_in;
    dydt[7] = di_in - i_in / parameters.tau_syn_in;
}

impl Default for HhPscAlpha<AdaptiveRk45> {
    fn default() -> Self {
        HhPscAlpha::new(AdaptiveRk45::default())
    }
}

impl<S: OdeSolver> HhPscAlpha<S> {
    /// Creates a model at rest backed by the given integration strategy
    pub fn new(solver: S) -> Self {
        HhPscAlpha {
            parameters: HhPscAlphaParameters::default(),
            state: HhPscAlphaState::new(),
            buffers: SpikeBuffers::default(),
            solver,
            refractory_steps: 20,
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
            last_firing_time: None,
            gaussian_params: GaussianParameters::default(),
        }
    }

    /// Counts a spike when the potential crosses 0 mV from below outside
    /// the dead time, there is no reset rule
    fn handle_spiking(&mut self, v_old: f32, step: usize) -> bool {
        let mut is_spiking = false;

        if self.state.refractory_steps_left > 0 {
            self.state.refractory_steps_left -= 1;
        } else if v_old < 0. && self.state.v_m >= 0. {
            is_spiking = !is_spiking;
            self.state.refractory_steps_left = self.refractory_steps;
            self.last_firing_time = Some(step);
        }

        self.is_spiking = is_spiking;

        is_spiking
    }

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &HhPscAlpha<S>| cell.state.v_m);
        map.insert("Act_m", |cell: &HhPscAlpha<S>| cell.state.m);
        map.insert("Inact_h", |cell: &HhPscAlpha<S>| cell.state.h);
        map.insert("Act_n", |cell: &HhPscAlpha<S>| cell.state.n);
        map.insert("I_syn_ex", |cell: &HhPscAlpha<S>| cell.state.i_ex);
        map.insert("I_syn_in", |cell: &HhPscAlpha<S>| cell.state.i_in);

        map
    }
}

impl<S: OdeSolver> GridDynamics for HhPscAlpha<S> {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        self.dt = resolution;
        self.refractory_steps = refractory_steps(self.parameters.t_ref, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let spikes_ex = self.buffers.excitatory.consume();
        let spikes_in = self.buffers.inhibitory.consume();
        let stimulus = self.buffers.currents.consume();

        let mut y = Array1::from(vec![
            self.state.v_m,
            self.state.m,
            self.state.h,
            self.state.n,
            self.state.di_ex,
            self.state.i_ex,
            self.state.di_in,
            self.state.i_in,
        ]);

        let parameters = &self.parameters;
        let t = step as f32 * self.dt;
        self.solver.advance(
            |_t, y, dydt| hh_derivatives(parameters, stimulus, y, dydt),
            &mut y,
            t,
            self.dt,
        )?;

        let v_old = self.state.v_m;

        self.state.v_m = y[0];
        self.state.m = y[1];
        self.state.h = y[2];
        self.state.n = y[3];
        self.state.di_ex = y[4];
        self.state.i_ex = y[5];
        self.state.di_in = y[6];
        self.state.i_in = y[7];

        // incoming spikes jump the current rise components at a unit-peak
        // normalization per weight
        self.state.di_ex +=
            spikes_ex * std::f32::consts::E / self.parameters.tau_syn_ex;
        self.state.di_in +=
            spikes_in * std::f32::consts::E / self.parameters.tau_syn_in;

        Ok(self.handle_spiking(v_old, step))
    }

    impl_two_channel_input!();

    fn get_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.parameters.export(&mut props);

        props
    }

    fn set_properties(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        let mut candidate = self.parameters.clone();
        candidate.apply(props)?;
        candidate.validate()?;

        self.parameters = candidate;

        self.calibrate(self.dt)
    }
}
