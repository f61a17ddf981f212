//! Exactly integrated integrate and fire models that implement
//! [`GridDynamics`] through precomputed propagator matrices, covering
//! delta, exponential, and alpha shaped post-synaptic currents.

use neuron_base_traits::NeuronBase;
use crate::buffer::SpikeBuffers;
use crate::error::{ParameterError, ReceptorError, SolverError};
use crate::properties::{check_non_negative, check_positive, update_scalar, PropertyMap};
use super::grid_dynamics::{
    impl_two_channel_input, propagator_31, propagator_32, propagator_constant_current,
    propagator_membrane_decay, refractory_steps, validate_resolution, CurrentVoltage,
    GaussianFactor, GaussianParameters, GridDynamics, IsSpiking, LastFiringTime, Timestep,
};
use super::recordables::RecordablesMap;


macro_rules! impl_default_handle_spiking {
    () => {
        /// Determines whether the neuron crossed threshold and resets the
        /// voltage if so, also loads the refractory countdown
        fn handle_spiking(&mut self, step: usize) -> bool {
            let mut is_spiking = false;

            if self.state.refractory_steps_left == 0
                && self.state.v_m >= self.parameters.v_th
            {
                is_spiking = !is_spiking;
                self.state.v_m = self.parameters.v_reset;
                self.state.refractory_steps_left = self.propagators.refractory_steps;
                self.last_firing_time = Some(step);
            }

            self.is_spiking = is_spiking;

            is_spiking
        }
    }
}

macro_rules! impl_default_set_properties {
    () => {
        fn set_properties(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
            let mut candidate = self.parameters.clone();
            candidate.apply(props)?;
            candidate.validate()?;

            // state is kept relative to the resting potential
            let delta_e_l = candidate.e_l - self.parameters.e_l;
            self.parameters = candidate;
            self.state.v_m += delta_e_l;

            self.calibrate(self.dt)
        }
    }
}

/// An integrate and fire neuron with delta shaped post-synaptic currents,
/// incoming spike weights jump the membrane potential directly (mV)
#[derive(Debug, Clone, NeuronBase)]
pub struct IafPscDelta {
    /// User-configurable physical constants
    pub parameters: IafPscDeltaParameters,
    /// Mutable simulation state
    pub state: IafPscDeltaState,
    /// Coefficients derived at calibration, read-only between calibrations
    propagators: IafPscDeltaPropagators,
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
pub struct IafPscDeltaParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Membrane time constant (ms), may be infinite for a perfect
    /// integrator membrane
    pub tau_m: f32,
    /// Refractory period (ms)
    pub t_ref: f32,
    /// Resting potential (mV)
    pub e_l: f32,
    /// Reset potential (mV)
    pub v_reset: f32,
    /// Spike threshold (mV)
    pub v_th: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for IafPscDeltaParameters {
    fn default() -> Self {
        IafPscDeltaParameters {
            c_m: 250., // membrane capacitance (pF)
            tau_m: 10., // membrane time constant (ms)
            t_ref: 2., // refractory period (ms)
            e_l: -70., // resting potential (mV)
            v_reset: -70., // reset potential (mV)
            v_th: -55., // spike threshold (mV)
            i_e: 0., // external current (pA)
        }
    }
}

impl IafPscDeltaParameters {
    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.tau_m, "tau_m")?;
        check_non_negative(self.t_ref, "t_ref")?;

        if self.v_th <= self.v_reset {
            return Err(ParameterError::ThresholdBelowReset);
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "tau_m", &mut self.tau_m)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "V_reset", &mut self.v_reset)?;
        update_scalar(props, "V_th", &mut self.v_th)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("tau_m", self.tau_m);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("V_reset", self.v_reset);
        props.insert_scalar("V_th", self.v_th);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IafPscDeltaState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Remaining refractory steps, the potential is clamped while positive
    pub refractory_steps_left: usize,
}

impl IafPscDeltaState {
    pub fn new(parameters: &IafPscDeltaParameters) -> Self {
        IafPscDeltaState {
            v_m: parameters.e_l,
            refractory_steps_left: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IafPscDeltaPropagators {
    /// Membrane decay over one step
    p33: f32,
    /// Charge transfer from a constant current over one step
    p30: f32,
    /// Refractory period in whole steps
    refractory_steps: usize,
}

impl IafPscDeltaPropagators {
    fn calibrate(parameters: &IafPscDeltaParameters, h: f32) -> Self {
        IafPscDeltaPropagators {
            p33: propagator_membrane_decay(parameters.tau_m, h),
            p30: propagator_constant_current(parameters.tau_m, parameters.c_m, h),
            refractory_steps: refractory_steps(parameters.t_ref, h),
        }
    }
}

impl Default for IafPscDelta {
    fn default() -> Self {
        let parameters = IafPscDeltaParameters::default();
        let state = IafPscDeltaState::new(&parameters);
        let propagators = IafPscDeltaPropagators::calibrate(&parameters, 0.1);

        IafPscDelta {
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

impl IafPscDelta {
    impl_default_handle_spiking!();

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &IafPscDelta| cell.state.v_m);

        map
    }
}

impl GridDynamics for IafPscDelta {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        self.dt = resolution;
        self.propagators = IafPscDeltaPropagators::calibrate(&self.parameters, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let spikes_ex = self.buffers.excitatory.consume();
        let spikes_in = self.buffers.inhibitory.consume();
        let stimulus = self.buffers.currents.consume();

        if self.state.refractory_steps_left > 0 {
            // input arriving while refractory is discarded
            self.state.refractory_steps_left -= 1;
            self.state.v_m = self.parameters.v_reset;
        } else {
            let p = &self.propagators;
            let input_current = self.parameters.i_e + stimulus;

            self.state.v_m = self.parameters.e_l
                + p.p33 * (self.state.v_m - self.parameters.e_l)
                + p.p30 * input_current
                + spikes_ex + spikes_in;
        }

        Ok(self.handle_spiking(step))
    }

    impl_two_channel_input!();

    fn get_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.parameters.export(&mut props);

        props
    }

    impl_default_set_properties!();
}

/// An integrate and fire neuron with exponentially decaying post-synaptic
/// currents, incoming spike weights jump the synaptic current (pA)
#[derive(Debug, Clone, NeuronBase)]
pub struct IafPscExp {
    /// User-configurable physical constants
    pub parameters: IafPscExpParameters,
    /// Mutable simulation state
    pub state: IafPscExpState,
    /// Coefficients derived at calibration, read-only between calibrations
    propagators: IafPscExpPropagators,
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
pub struct IafPscExpParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Membrane time constant (ms)
    pub tau_m: f32,
    /// Excitatory synaptic time constant (ms)
    pub tau_syn_ex: f32,
    /// Inhibitory synaptic time constant (ms)
    pub tau_syn_in: f32,
    /// Refractory period (ms)
    pub t_ref: f32,
    /// Resting potential (mV)
    pub e_l: f32,
    /// Reset potential (mV)
    pub v_reset: f32,
    /// Spike threshold (mV)
    pub v_th: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for IafPscExpParameters {
    fn default() -> Self {
        IafPscExpParameters {
            c_m: 250., // membrane capacitance (pF)
            tau_m: 10., // membrane time constant (ms)
            tau_syn_ex: 2., // excitatory synaptic time constant (ms)
            tau_syn_in: 2., // inhibitory synaptic time constant (ms)
            t_ref: 2., // refractory period (ms)
            e_l: -70., // resting potential (mV)
            v_reset: -70., // reset potential (mV)
            v_th: -55., // spike threshold (mV)
            i_e: 0., // external current (pA)
        }
    }
}

impl IafPscExpParameters {
    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.tau_m, "tau_m")?;
        check_positive(self.tau_syn_ex, "tau_syn_ex")?;
        check_positive(self.tau_syn_in, "tau_syn_in")?;
        check_non_negative(self.t_ref, "t_ref")?;

        if self.v_th <= self.v_reset {
            return Err(ParameterError::ThresholdBelowReset);
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "tau_m", &mut self.tau_m)?;
        update_scalar(props, "tau_syn_ex", &mut self.tau_syn_ex)?;
        update_scalar(props, "tau_syn_in", &mut self.tau_syn_in)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "V_reset", &mut self.v_reset)?;
        update_scalar(props, "V_th", &mut self.v_th)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("tau_m", self.tau_m);
        props.insert_scalar("tau_syn_ex", self.tau_syn_ex);
        props.insert_scalar("tau_syn_in", self.tau_syn_in);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("V_reset", self.v_reset);
        props.insert_scalar("V_th", self.v_th);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IafPscExpState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Excitatory synaptic current (pA)
    pub i_syn_ex: f32,
    /// Inhibitory synaptic current (pA)
    pub i_syn_in: f32,
    /// Remaining refractory steps, the potential is clamped while positive
    pub refractory_steps_left: usize,
}

impl IafPscExpState {
    pub fn new(parameters: &IafPscExpParameters) -> Self {
        IafPscExpState {
            v_m: parameters.e_l,
            i_syn_ex: 0.,
            i_syn_in: 0.,
            refractory_steps_left: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IafPscExpPropagators {
    /// Excitatory synaptic decay over one step
    p11_ex: f32,
    /// Inhibitory synaptic decay over one step
    p11_in: f32,
    /// Charge transfer from the excitatory current onto the membrane
    p21_ex: f32,
    /// Charge transfer from the inhibitory current onto the membrane
    p21_in: f32,
    /// Membrane decay over one step
    p33: f32,
    /// Charge transfer from a constant current over one step
    p30: f32,
    /// Refractory period in whole steps
    refractory_steps: usize,
}

impl IafPscExpPropagators {
    fn calibrate(parameters: &IafPscExpParameters, h: f32) -> Self {
        IafPscExpPropagators {
            p11_ex: (-h / parameters.tau_syn_ex).exp(),
            p11_in: (-h / parameters.tau_syn_in).exp(),
            p21_ex: propagator_32(parameters.tau_syn_ex, parameters.tau_m, parameters.c_m, h),
            p21_in: propagator_32(parameters.tau_syn_in, parameters.tau_m, parameters.c_m, h),
            p33: propagator_membrane_decay(parameters.tau_m, h),
            p30: propagator_constant_current(parameters.tau_m, parameters.c_m, h),
            refractory_steps: refractory_steps(parameters.t_ref, h),
        }
    }
}

impl Default for IafPscExp {
    fn default() -> Self {
        let parameters = IafPscExpParameters::default();
        let state = IafPscExpState::new(&parameters);
        let propagators = IafPscExpPropagators::calibrate(&parameters, 0.1);

        IafPscExp {
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

impl IafPscExp {
    impl_default_handle_spiking!();

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &IafPscExp| cell.state.v_m);
        map.insert("I_syn_ex", |cell: &IafPscExp| cell.state.i_syn_ex);
        map.insert("I_syn_in", |cell: &IafPscExp| cell.state.i_syn_in);

        map
    }
}

impl GridDynamics for IafPscExp {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        self.dt = resolution;
        self.propagators = IafPscExpPropagators::calibrate(&self.parameters, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let spikes_ex = self.buffers.excitatory.consume();
        let spikes_in = self.buffers.inhibitory.consume();
        let stimulus = self.buffers.currents.consume();

        let p = &self.propagators;

        if self.state.refractory_steps_left > 0 {
            self.state.refractory_steps_left -= 1;
            self.state.v_m = self.parameters.v_reset;
        } else {
            let input_current = self.parameters.i_e + stimulus;

            self.state.v_m = self.parameters.e_l
                + p.p33 * (self.state.v_m - self.parameters.e_l)
                + p.p30 * input_current
                + p.p21_ex * self.state.i_syn_ex
                + p.p21_in * self.state.i_syn_in;
        }

        // synaptic currents decay during refractoriness as well, spikes
        // arriving this step only contribute from the next step on
        self.state.i_syn_ex = p.p11_ex * self.state.i_syn_ex + spikes_ex;
        self.state.i_syn_in = p.p11_in * self.state.i_syn_in + spikes_in;

        Ok(self.handle_spiking(step))
    }

    impl_two_channel_input!();

    fn get_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.parameters.export(&mut props);

        props
    }

    impl_default_set_properties!();
}

/// An integrate and fire neuron with alpha shaped post-synaptic currents
/// normalized to a unit peak, incoming spike weights set the peak current
/// amplitude (pA)
#[derive(Debug, Clone, NeuronBase)]
pub struct IafPscAlpha {
    /// User-configurable physical constants
    pub parameters: IafPscAlphaParameters,
    /// Mutable simulation state
    pub state: IafPscAlphaState,
    /// Coefficients derived at calibration, read-only between calibrations
    propagators: IafPscAlphaPropagators,
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
pub struct IafPscAlphaParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Membrane time constant (ms)
    pub tau_m: f32,
    /// Excitatory synaptic time constant (ms)
    pub tau_syn_ex: f32,
    /// Inhibitory synaptic time constant (ms)
    pub tau_syn_in: f32,
    /// Refractory period (ms)
    pub t_ref: f32,
    /// Resting potential (mV)
    pub e_l: f32,
    /// Reset potential (mV)
    pub v_reset: f32,
    /// Spike threshold (mV)
    pub v_th: f32,
    /// Constant external current (pA)
    pub i_e: f32,
}

impl Default for IafPscAlphaParameters {
    fn default() -> Self {
        IafPscAlphaParameters {
            c_m: 250., // membrane capacitance (pF)
            tau_m: 10., // membrane time constant (ms)
            tau_syn_ex: 2., // excitatory synaptic time constant (ms)
            tau_syn_in: 2., // inhibitory synaptic time constant (ms)
            t_ref: 2., // refractory period (ms)
            e_l: -70., // resting potential (mV)
            v_reset: -70., // reset potential (mV)
            v_th: -55., // spike threshold (mV)
            i_e: 0., // external current (pA)
        }
    }
}

impl IafPscAlphaParameters {
    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.tau_m, "tau_m")?;
        check_positive(self.tau_syn_ex, "tau_syn_ex")?;
        check_positive(self.tau_syn_in, "tau_syn_in")?;
        check_non_negative(self.t_ref, "t_ref")?;

        if self.v_th <= self.v_reset {
            return Err(ParameterError::ThresholdBelowReset);
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "tau_m", &mut self.tau_m)?;
        update_scalar(props, "tau_syn_ex", &mut self.tau_syn_ex)?;
        update_scalar(props, "tau_syn_in", &mut self.tau_syn_in)?;
        update_scalar(props, "t_ref", &mut self.t_ref)?;
        update_scalar(props, "E_L", &mut self.e_l)?;
        update_scalar(props, "V_reset", &mut self.v_reset)?;
        update_scalar(props, "V_th", &mut self.v_th)?;
        update_scalar(props, "I_e", &mut self.i_e)?;

        Ok(())
    }

    fn export(&self, props: &mut PropertyMap) {
        props.insert_scalar("C_m", self.c_m);
        props.insert_scalar("tau_m", self.tau_m);
        props.insert_scalar("tau_syn_ex", self.tau_syn_ex);
        props.insert_scalar("tau_syn_in", self.tau_syn_in);
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("V_reset", self.v_reset);
        props.insert_scalar("V_th", self.v_th);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IafPscAlphaState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Rise component of the excitatory alpha current
    pub y1_ex: f32,
    /// Excitatory synaptic current (pA)
    pub y2_ex: f32,
    /// Rise component of the inhibitory alpha current
    pub y1_in: f32,
    /// Inhibitory synaptic current (pA)
    pub y2_in: f32,
    /// Remaining refractory steps, the potential is clamped while positive
    pub refractory_steps_left: usize,
}

impl IafPscAlphaState {
    pub fn new(parameters: &IafPscAlphaParameters) -> Self {
        IafPscAlphaState {
            v_m: parameters.e_l,
            y1_ex: 0.,
            y2_ex: 0.,
            y1_in: 0.,
            y2_in: 0.,
            refractory_steps_left: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IafPscAlphaPropagators {
    /// Excitatory synaptic decay over one step
    p11_ex: f32,
    /// Excitatory rise-to-current transfer over one step
    p21_ex: f32,
    /// Inhibitory synaptic decay over one step
    p11_in: f32,
    /// Inhibitory rise-to-current transfer over one step
    p21_in: f32,
    /// Charge transfer from the excitatory rise component onto the membrane
    p31_ex: f32,
    /// Charge transfer from the excitatory current onto the membrane
    p32_ex: f32,
    /// Charge transfer from the inhibitory rise component onto the membrane
    p31_in: f32,
    /// Charge transfer from the inhibitory current onto the membrane
    p32_in: f32,
    /// Membrane decay over one step
    p33: f32,
    /// Charge transfer from a constant current over one step
    p30: f32,
    /// Unit-peak normalization of the excitatory alpha kernel
    psc_initial_ex: f32,
    /// Unit-peak normalization of the inhibitory alpha kernel
    psc_initial_in: f32,
    /// Refractory period in whole steps
    refractory_steps: usize,
}

impl IafPscAlphaPropagators {
    fn calibrate(parameters: &IafPscAlphaParameters, h: f32) -> Self {
        let p11_ex = (-h / parameters.tau_syn_ex).exp();
        let p11_in = (-h / parameters.tau_syn_in).exp();

        IafPscAlphaPropagators {
            p11_ex,
            p21_ex: h * p11_ex,
            p11_in,
            p21_in: h * p11_in,
            p31_ex: propagator_31(parameters.tau_syn_ex, parameters.tau_m, parameters.c_m, h),
            p32_ex: propagator_32(parameters.tau_syn_ex, parameters.tau_m, parameters.c_m, h),
            p31_in: propagator_31(parameters.tau_syn_in, parameters.tau_m, parameters.c_m, h),
            p32_in: propagator_32(parameters.tau_syn_in, parameters.tau_m, parameters.c_m, h),
            p33: propagator_membrane_decay(parameters.tau_m, h),
            p30: propagator_constant_current(parameters.tau_m, parameters.c_m, h),
            psc_initial_ex: std::f32::consts::E / parameters.tau_syn_ex,
            psc_initial_in: std::f32::consts::E / parameters.tau_syn_in,
            refractory_steps: refractory_steps(parameters.t_ref, h),
        }
    }
}

impl Default for IafPscAlpha {
    fn default() -> Self {
        let parameters = IafPscAlphaParameters::default();
        let state = IafPscAlphaState::new(&parameters);
        let propagators = IafPscAlphaPropagators::calibrate(&parameters, 0.1);

        IafPscAlpha {
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

impl IafPscAlpha {
    impl_default_handle_spiking!();

    /// Returns the recordable quantities of the model
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &IafPscAlpha| cell.state.v_m);
        map.insert("I_syn_ex", |cell: &IafPscAlpha| cell.state.y2_ex);
        map.insert("I_syn_in", |cell: &IafPscAlpha| cell.state.y2_in);

        map
    }
}

impl GridDynamics for IafPscAlpha {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        self.dt = resolution;
        self.propagators = IafPscAlphaPropagators::calibrate(&self.parameters, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let spikes_ex = self.buffers.excitatory.consume();
        let spikes_in = self.buffers.inhibitory.consume();
        let stimulus = self.buffers.currents.consume();

        let p = &self.propagators;

        if self.state.refractory_steps_left > 0 {
            self.state.refractory_steps_left -= 1;
            self.state.v_m = self.parameters.v_reset;
        } else {
            let input_current = self.parameters.i_e + stimulus;

            self.state.v_m = self.parameters.e_l
                + p.p33 * (self.state.v_m - self.parameters.e_l)
                + p.p30 * input_current
                + p.p31_ex * self.state.y1_ex + p.p32_ex * self.state.y2_ex
                + p.p31_in * self.state.y1_in + p.p32_in * self.state.y2_in;
        }

        // alpha kernels evolve during refractoriness as well, the current
        // component is advanced before the rise component that feeds it
        self.state.y2_ex = p.p21_ex * self.state.y1_ex + p.p11_ex * self.state.y2_ex;
        self.state.y1_ex = p.p11_ex * self.state.y1_ex + p.psc_initial_ex * spikes_ex;
        self.state.y2_in = p.p21_in * self.state.y1_in + p.p11_in * self.state.y2_in;
        self.state.y1_in = p.p11_in * self.state.y1_in + p.psc_initial_in * spikes_in;

        Ok(self.handle_spiking(step))
    }

    impl_two_channel_input!();

    fn get_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.parameters.export(&mut props);

        props
    }

    impl_default_set_properties!();
}
