//! An adaptive exponential integrate and fire model with alpha shaped
//! conductances, integrated numerically each grid step through a pluggable
//! [`OdeSolver`] since the exponential spike upswing has no closed form.

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


/// Largest argument fed to the exponential spike term, keeps the
/// right-hand side finite during the upswing
const MAX_EXP_ARG: f32 = 10.;

/// An adaptive exponential integrate and fire neuron with alpha shaped
/// excitatory and inhibitory conductances
#[derive(Debug, Clone, NeuronBase)]
pub struct AeifCondAlpha<S: OdeSolver = AdaptiveRk45> {
    /// User-configurable physical constants
    pub parameters: AeifCondAlphaParameters,
    /// Mutable simulation state
    pub state: AeifCondAlphaState,
    /// Per-channel incoming event accumulation
    pub buffers: SpikeBuffers,
    /// Numerical integration strategy for the subthreshold dynamics
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
pub struct AeifCondAlphaParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Leak conductance (nS)
    pub g_l: f32,
    /// Resting potential (mV)
    pub e_l: f32,
    /// Excitatory reversal potential (mV)
    pub e_ex: f32,
    /// Inhibitory reversal potential (mV)
    pub e_in: f32,
    /// Reset potential (mV)
    pub v_reset: f32,
    /// Exponential threshold potential (mV)
    pub v_th: f32,
    /// Spike detection potential (mV)
    pub v_peak: f32,
    /// Slope of the exponential spike term (mV), zero disables the term
    pub delta_t: f32,
    /// Adaptation time constant (ms)
    pub tau_w: f32,
    /// Subthreshold adaptation conductance (nS)
    pub a: f32,
    /// Spike triggered adaptation increment (pA)
    pub b: f32,
    /// Refractory period (ms)
    pub t_ref: f32,
    /// Excitatory synaptic rise time (ms)
    pub tau_syn_ex: f32,
    /// Inhibitory synaptic rise time (ms)
    pub tau_syn_in: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for AeifCondAlphaParameters {
    fn default() -> Self {
        AeifCondAlphaParameters {
            c_m: 281., // membrane capacitance (pF)
            g_l: 30., // leak conductance (nS)
            e_l: -70.6, // resting potential (mV)
            e_ex: 0., // excitatory reversal potential (mV)
            e_in: -85., // inhibitory reversal potential (mV)
            v_reset: -60., // reset potential (mV)
            v_th: -50.4, // exponential threshold (mV)
            v_peak: 0., // spike detection potential (mV)
            delta_t: 2., // exponential slope (mV)
            tau_w: 144., // adaptation time constant (ms)
            a: 4., // subthreshold adaptation (nS)
            b: 80.5, // spike triggered adaptation (pA)
            t_ref: 0., // refractory period (ms)
            tau_syn_ex: 0.2, // excitatory synaptic rise time (ms)
            tau_syn_in: 2., // inhibitory synaptic rise time (ms)
            i_e: 0., // external current (pA)
        }
    }
}

impl AeifCondAlphaParameters {
    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.g_l, "g_L")?;
        check_positive(self.tau_w, "tau_w")?;
        check_positive(self.tau_syn_ex, "tau_syn_ex")?;
        check_positive(self.tau_syn_in, "tau_syn_in")?;
        check_non_negative(self.delta_t, "Delta_T")?;
        check_non_negative(self.t_ref, "t_ref")?;

        if self.v_peak <= self.v_reset {
            return Err(ParameterError::ThresholdBelowReset);
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "g_L", &mut self.g_l)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "E_ex", &mut self.e_ex)?;
        update_scalar(props, "E_in", &mut self.e_in)?;
        update_scalar(props, "V_reset", &mut self.v_reset)?;
        update_scalar(props, "V_th", &mut self.v_th)?;
        update_scalar(props, "V_peak", &mut self.v_peak)?;
        update_scalar(props, "Delta_T", &mut self.delta_t)?;
        update_scalar(props, "tau_w", &mut self.tau_w)?;
        update_scalar(props, "a", &mut self.a)?;
        update_scalar(props, "b", &mut self.b)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "tau_syn_ex", &mut self.tau_syn_ex)?;
        update_scalar(props, "tau_syn_in", &mut self.tau_syn_in)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("g_L", self.g_l);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("E_ex", self.e_ex);
        props.insert_scalar("E_in", self.e_in);
        props.insert_scalar("V_reset", self.v_reset);
        props.insert_scalar("V_th", self.v_th);
        props.insert_scalar("V_peak", self.v_peak);
        props.insert_scalar("Delta_T", self.delta_t);
        props.insert_scalar("tau_w", self.tau_w);
        props.insert_scalar("a", self.a);
        props.insert_scalar("b", self.b);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("tau_syn_ex", self.tau_syn_ex);
        props.insert_scalar("tau_syn_in", self.tau_syn_in);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AeifCondAlphaState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Adaptation current (pA)
    pub w: f32,
    /// Rise component of the excitatory conductance
    pub dg_ex: f32,
    /// Excitatory conductance (nS)
    pub g_ex: f32,
    /// Rise component of the inhibitory conductance
    pub dg_in: f32,
    /// Inhibitory conductance (nS)
    pub g_in: f32,
    /// Remaining refractory steps, the potential is clamped while positive
    pub refractory_steps_left: usize,
}

impl AeifCondAlphaState {
    pub fn new(parameters: &AeifCondAlphaParameters) -> Self {
        AeifCondAlphaState {
            v_m: parameters.e_l,
            w: 0.,
            dg_ex: 0.,
            g_ex: 0.,
            dg_in: 0.,
            g_in: 0.,
            refractory_steps_left: 0,
        }
    }
}

/// Derivative of the subthreshold system, the voltage entry is clamped to
/// the detection potential so the exponential term stays bounded while a
/// spike is underway, and held at the reset potential while refractory so
/// the adaptation and conductance variables see the clamped voltage
fn aeif_derivatives(
    parameters: &AeifCondAlphaParameters,
    input_current: f32,
    refractory: bool,
    y: &Array1<f32>,
    dydt: &mut Array1<f32>,
) {
    let v = if refractory {
        parameters.v_reset
    } else {
        y[0].min(parameters.v_peak)
    };
    let w = y[1];
    let dg_ex = y[2];
    let g_ex = y[3];
    let dg_in = y[4];
    let g_in = y[5];

    let spike_term = if parameters.delta_t > 0. {
        let exp_arg = ((v - parameters.v_th) / parameters.delta_t).min(MAX_EXP_ARG);

        parameters.g_l * parameters.delta_t * exp_arg.exp()
    } else {
        0.
    };

    dydt[0] = if refractory {
        0.
    } else {
        (-parameters.g_l * (v - parameters.e_l) + spike_term
            - g_ex * (v - parameters.e_ex)
            - g_in * (v - parameters.e_in)
            - w
            + parameters.i_e
            + input_current)
            / parameters.c_m
    };
    dydt[1] = (parameters.a * (v - parameters.e_l) - w) / parameters.tau_w;
    dydt[2] = -dg_ex / parameters.tau_syn_ex;
    dydt[3] = dg_ex - g_ex / parameters.tau_syn_ex;
    dydt[4] = -dg_in / parameters.tau_syn_in;
    dydt[5] = dg_in - g_in / parameters.tau_syn_in;
}

impl Default for AeifCondAlpha<AdaptiveRk45> {
    fn default() -> Self {
        AeifCondAlpha::new(AdaptiveRk45::default())
    }
}

impl<S: OdeSolver> AeifCondAlpha<S> {
    /// Creates a model at rest backed by the given integration strategy
    pub fn new(solver: S) -> Self {
        let parameters = AeifCondAlphaParameters::default();
        let state = AeifCondAlphaState::new(&parameters);

        AeifCondAlpha {
            parameters,
            state,
            buffers: SpikeBuffers::default(),
            solver,
            refractory_steps: 0,
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
            last_firing_time: None,
            gaussian_params: GaussianParameters::default(),
        }
    }

    /// Determines whether the voltage reached the detection potential,
    /// resetting it and incrementing the adaptation current if so
    fn handle_spiking(&mut self, step: usize) -> bool {
        let mut is_spiking = false;

        if self.state.refractory_steps_left == 0
            && self.state.v_m >= self.parameters.v_peak
        {
            is_spiking = !is_spiking;
            self.state.v_m = self.parameters.v_reset;
            self.state.w += self.parameters.b;
            self.state.refractory_steps_left = self.refractory_steps;
            self.last_firing_time = Some(step);
        }

        self.is_spiking = is_spiking;

        is_spiking
    }

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &AeifCondAlpha<S>| cell.state.v_m);
        map.insert("w", |cell: &AeifCondAlpha<S>| cell.state.w);
        map.insert("g_ex", |cell: &AeifCondAlpha<S>| cell.state.g_ex);
        map.insert("g_in", |cell: &AeifCondAlpha<S>| cell.state.g_in);

        map
    }
}

impl<S: OdeSolver> GridDynamics for AeifCondAlpha<S> {
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
            self.state.w,
            self.state.dg_ex,
            self.state.g_ex,
            self.state.dg_in,
            self.state.g_in,
        ]);

        let refractory = self.state.refractory_steps_left > 0;
        let parameters = &self.parameters;
        let t = step as f32 * self.dt;
        self.solver.advance(
            |_t, y, dydt| aeif_derivatives(parameters, stimulus, refractory, y, dydt),
            &mut y,
            t,
            self.dt,
        )?;

        self.state.v_m = y[0];
        self.state.w = y[1];
        self.state.dg_ex = y[2];
        self.state.g_ex = y[3];
        self.state.dg_in = y[4];
        self.state.g_in = y[5];

        if refractory {
            // conductances and adaptation keep evolving while refractory
            self.state.refractory_steps_left -= 1;
            self.state.v_m = self.parameters.v_reset;
        }

        // incoming spikes jump the conductance rise components at a
        // unit-peak normalization per weight
        self.state.dg_ex +=
            spikes_ex * std::f32::consts::E / self.parameters.tau_syn_ex;
        self.state.dg_in +=
            -spikes_in * std::f32::consts::E / self.parameters.tau_syn_in;

        Ok(self.handle_spiking(step))
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
