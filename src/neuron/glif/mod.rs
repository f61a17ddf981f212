//! A generalized leaky integrate and fire model with exponential synapses,
//! after-spike currents, a fractional voltage reset rule, and a spike
//! triggered adaptive threshold component, all propagated exactly.

use neuron_base_traits::NeuronBase;
use crate::buffer::SpikeBuffers;
use crate::error::{ParameterError, ReceptorError, SolverError};
use crate::properties::{
    check_non_negative, check_positive, update_scalar, update_vector, PropertyMap,
};
use super::grid_dynamics::{
    impl_two_channel_input, propagator_32, propagator_constant_current,
    propagator_membrane_decay, refractory_steps, validate_resolution, CurrentVoltage,
    GaussianFactor, GaussianParameters, GridDynamics, IsSpiking, LastFiringTime, Timestep,
};
use super::recordables::RecordablesMap;


/// A generalized leaky integrate and fire neuron with exponentially
/// decaying post-synaptic currents and after-spike currents
#[derive(Debug, Clone, NeuronBase)]
pub struct GlifPscExp {
    /// User-configurable physical constants
    pub parameters: GlifPscExpParameters,
    /// Mutable simulation state
    pub state: GlifPscExpState,
    /// Coefficients derived at calibration, read-only between calibrations
    propagators: GlifPscExpPropagators,
    /// Per-channel incoming event accumulation
    pub buffers: SpikeBuffers,
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
pub struct GlifPscExpParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Leak conductance (nS)
    pub g_l: f32,
    /// Resting potential (mV)
    pub e_l: f32,
    /// Refractory period (ms)
    pub t_ref: f32,
    /// Instantaneous component of the spike threshold (mV)
    pub th_inf: f32,
    /// Fraction of the distance above rest the voltage keeps after a spike,
    /// must be within `[0, 1]`
    pub v_reset_fraction: f32,
    /// Amount subtracted from the voltage after a spike (mV)
    pub v_reset_delta: f32,
    /// Amount added to the adaptive threshold component per spike (mV)
    pub th_spike_add: f32,
    /// Decay time constant of the adaptive threshold component (ms)
    pub th_spike_decay: f32,
    /// Amplitudes the after-spike currents are set to on a spike (pA)
    pub asc_amps: Vec<f32>,
    /// Decay rates of the after-spike currents (1/ms), must have one entry
    /// per amplitude
    pub asc_decays: Vec<f32>,
    /// Excitatory synaptic time constant (ms)
    pub tau_syn_ex: f32,
    /// Inhibitory synaptic time constant (ms)
    pub tau_syn_in: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for GlifPscExpParameters {
    fn default() -> Self {
        GlifPscExpParameters {
            c_m: 58.72, // membrane capacitance (pF)
            g_l: 9.43, // leak conductance (nS)
            e_l: -78.85, // resting potential (mV)
            t_ref: 3.75, // refractory period (ms)
            th_inf: -51.68, // instantaneous threshold (mV)
            v_reset_fraction: 0.2, // voltage reset fraction
            v_reset_delta: 5., // voltage reset subtraction (mV)
            th_spike_add: 0.37, // threshold jump per spike (mV)
            th_spike_decay: 30., // threshold decay time constant (ms)
            asc_amps: vec![-9.18, -198.94], // after-spike current amplitudes (pA)
            asc_decays: vec![0.003, 0.1], // after-spike current decay rates (1/ms)
            tau_syn_ex: 2., // excitatory synaptic time constant (ms)
            tau_syn_in: 2., // inhibitory synaptic time constant (ms)
            i_e: 0., // external current (pA)
        }
    }
}

impl GlifPscExpParameters {
    /// Membrane time constant (ms) implied by the capacitance and leak
    pub fn tau_m(&self) -> f32 {
        self.c_m / self.g_l
    }

    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.g_l, "g_L")?;
        check_non_negative(self.t_ref, "t_ref")?;
        check_positive(self.th_spike_decay, "th_spike_decay")?;
        check_positive(self.tau_syn_ex, "tau_syn_ex")?;
        check_positive(self.tau_syn_in, "tau_syn_in")?;

        if !(0. ..=1.).contains(&self.v_reset_fraction) {
            return Err(ParameterError::ResetFractionOutOfRange);
        }

        if self.asc_amps.len() != self.asc_decays.len() {
            return Err(ParameterError::MismatchedVectorLength("asc_decays"));
        }

        for decay in self.asc_decays.iter() {
            check_positive(*decay, "asc_decays")?;
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "g_L", &mut self.g_l)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "th_inf", &mut self.th_inf)?;
        update_scalar(props, "V_reset_fraction", &mut self.v_reset_fraction)?;
        update_scalar(props, "V_reset_delta", &mut self.v_reset_delta)?;
        update_scalar(props, "th_spike_add", &mut self.th_spike_add)?;
        update_scalar(props, "th_spike_decay", &mut self.th_spike_decay)?;
        update_vector(props, "asc_amps", &mut self.asc_amps)?;
        update_vector(props, "asc_decays", &mut self.asc_decays)?;
        update_scalar(props, "tau_syn_ex", &mut self.tau_syn_ex)?;
        update_scalar(props, "tau_syn_in", &mut self.tau_syn_in)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("g_L", self.g_l);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("th_inf", self.th_inf);
        props.insert_scalar("V_reset_fraction", self.v_reset_fraction);
        props.insert_scalar("V_reset_delta", self.v_reset_delta);
        props.insert_scalar("th_spike_add", self.th_spike_add);
        props.insert_scalar("th_spike_decay", self.th_spike_decay);
        props.insert_vector("asc_amps", self.asc_amps.clone());
        props.insert_vector("asc_decays", self.asc_decays.clone());
        props.insert_scalar("tau_syn_ex", self.tau_syn_ex);
        props.insert_scalar("tau_syn_in", self.tau_syn_in);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlifPscExpState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Spike triggered component of the threshold (mV), decays toward zero
    pub th_s: f32,
    /// After-spike currents (pA)
    pub asc: Vec<f32>,
    /// Excitatory synaptic current (pA)
    pub i_syn_ex: f32,
    /// Inhibitory synaptic current (pA)
    pub i_syn_in: f32,
    /// Remaining refractory steps, the potential is held while positive
    pub refractory_steps_left: usize,
}

impl GlifPscExpState {
    pub fn new(parameters: &GlifPscExpParameters) -> Self {
        GlifPscExpState {
            v_m: parameters.e_l,
            th_s: 0.,
            asc: vec![0.; parameters.asc_amps.len()],
            i_syn_ex: 0.,
            i_syn_in: 0.,
            refractory_steps_left: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GlifPscExpPropagators {
    /// Membrane decay over one step
    p33: f32,
    /// Charge transfer from a constant current over one step
    p30: f32,
    /// Excitatory synaptic decay over one step
    p11_ex: f32,
    /// Inhibitory synaptic decay over one step
    p11_in: f32,
    /// Charge transfer from the excitatory current onto the membrane
    p21_ex: f32,
    /// Charge transfer from the inhibitory current onto the membrane
    p21_in: f32,
    /// Per-current after-spike decay over one step
    asc_decay: Vec<f32>,
    /// Per-current charge transfer onto the membrane over one step
    asc_charge: Vec<f32>,
    /// Decay of the spike triggered threshold component over one step
    th_decay: f32,
    /// Refractory period in whole steps
    refractory_steps: usize,
}

impl GlifPscExpPropagators {
    fn calibrate(parameters: &GlifPscExpParameters, h: f32) -> Self {
        let tau_m = parameters.tau_m();

        let asc_decay = parameters.asc_decays.iter()
            .map(|rate| (-rate * h).exp())
            .collect();
        let asc_charge = parameters.asc_decays.iter()
            .map(|rate| propagator_32(1. / rate, tau_m, parameters.c_m, h))
            .collect();

        GlifPscExpPropagators {
            p33: propagator_membrane_decay(tau_m, h),
            p30: propagator_constant_current(tau_m, parameters.c_m, h),
            p11_ex: (-h / parameters.tau_syn_ex).exp(),
            p11_in: (-h / parameters.tau_syn_in).exp(),
            p21_ex: propagator_32(parameters.tau_syn_ex, tau_m, parameters.c_m, h),
            p21_in: propagator_32(parameters.tau_syn_in, tau_m, parameters.c_m, h),
            asc_decay,
            asc_charge,
            th_decay: (-h / parameters.th_spike_decay).exp(),
            refractory_steps: refractory_steps(parameters.t_ref, h),
        }
    }
}

impl Default for GlifPscExp {
    fn default() -> Self {
        let parameters = GlifPscExpParameters::default();
        let state = GlifPscExpState::new(&parameters);
        let propagators = GlifPscExpPropagators::calibrate(&parameters, 0.1);

        GlifPscExp {
            parameters,
            state,
            propagators,
            buffers: SpikeBuffers::default(),
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
            last_firing_time: None,
            gaussian_params: GaussianParameters::default(),
        }
    }
}

impl GlifPscExp {
    /// Spike threshold (mV) at the current state
    pub fn threshold(&self) -> f32 {
        self.parameters.th_inf + self.state.th_s
    }

    /// Determines whether the neuron crossed its adaptive threshold,
    /// applying the fractional reset rule and loading the after-spike
    /// currents if so
    fn handle_spiking(&mut self, step: usize) -> bool {
        let mut is_spiking = false;

        if self.state.refractory_steps_left == 0 && self.state.v_m >= self.threshold() {
            is_spiking = !is_spiking;

            self.state.v_m = self.parameters.e_l
                + self.parameters.v_reset_fraction * (self.state.v_m - self.parameters.e_l)
                - self.parameters.v_reset_delta;
            self.state.th_s += self.parameters.th_spike_add;

            for (current, amp) in self.state.asc.iter_mut().zip(self.parameters.asc_amps.iter()) {
                *current += amp;
            }

            self.state.refractory_steps_left = self.propagators.refractory_steps;
            self.last_firing_time = Some(step);
        }

        self.is_spiking = is_spiking;

        is_spiking
    }

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &GlifPscExp| cell.state.v_m);
        map.insert("threshold", |cell: &GlifPscExp| cell.threshold());
        map.insert("ASCurrents_sum", |cell: &GlifPscExp| cell.state.asc.iter().sum());
        map.insert("I_syn_ex", |cell: &GlifPscExp| cell.state.i_syn_ex);
        map.insert("I_syn_in", |cell: &GlifPscExp| cell.state.i_syn_in);

        map
    }
}

impl GridDynamics for GlifPscExp {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        let n_currents = self.parameters.asc_amps.len();
        if self.state.asc.len() != n_currents {
            self.state.asc.resize(n_currents, 0.);
        }

        self.dt = resolution;
        self.propagators = GlifPscExpPropagators::calibrate(&self.parameters, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let spikes_ex = self.buffers.excitatory.consume();
        let spikes_in = self.buffers.inhibitory.consume();
        let stimulus = self.buffers.currents.consume();

        let p = &self.propagators;

        if self.state.refractory_steps_left > 0 {
            // the potential holds at its reset value while refractory
            self.state.refractory_steps_left -= 1;
        } else {
            let input_current = self.parameters.i_e + stimulus;

            let mut v_m = self.parameters.e_l
                + p.p33 * (self.state.v_m - self.parameters.e_l)
                + p.p30 * input_current
                + p.p21_ex * self.state.i_syn_ex
                + p.p21_in * self.state.i_syn_in;

            for (current, charge) in self.state.asc.iter().zip(p.asc_charge.iter()) {
                v_m += charge * current;
            }

            self.state.v_m = v_m;
        }

        // synaptic, after-spike, and threshold variables evolve during
        // refractoriness as well
        self.state.i_syn_ex = p.p11_ex * self.state.i_syn_ex + spikes_ex;
        self.state.i_syn_in = p.p11_in * self.state.i_syn_in + spikes_in;

        for (current, decay) in self.state.asc.iter_mut().zip(p.asc_decay.iter()) {
            *current *= decay;
        }

        self.state.th_s *= p.th_decay;

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
