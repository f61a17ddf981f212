//! An exactly integrated integrate and fire model with an arbitrary number
//! of alpha shaped synaptic ports, each with its own time constant and its
//! own incoming event buffer.

use neuron_base_traits::NeuronBase;
use crate::buffer::RingBuffer;
use crate::error::{ParameterError, ReceptorError, SolverError};
use crate::properties::{
    check_non_negative, check_positive, update_scalar, update_vector, PropertyMap,
};
use super::grid_dynamics::{
    propagator_31, propagator_32, propagator_constant_current, propagator_membrane_decay,
    refractory_steps, validate_resolution, CurrentVoltage, GaussianFactor, GaussianParameters,
    GridDynamics, IsSpiking, LastFiringTime, Timestep,
};
use super::recordables::RecordablesMap;


/// An integrate and fire neuron with one alpha shaped synaptic channel per
/// receptor port, ports are addressed starting at `1`
#[derive(Debug, Clone, NeuronBase)]
pub struct IafPscAlphaMultisynapse {
    /// User-configurable physical constants
    pub parameters: IafPscAlphaMultisynapseParameters,
    /// Mutable simulation state
    pub state: IafPscAlphaMultisynapseState,
    /// Coefficients derived at calibration, read-only between calibrations
    propagators: IafPscAlphaMultisynapsePropagators,
    /// Per-receptor incoming event accumulation
    pub buffers: MultisynapseBuffers,
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
pub struct IafPscAlphaMultisynapseParameters {
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Membrane time constant (ms)
    pub tau_m: f32,
    /// Per-receptor synaptic time constants (ms), the length determines the
    /// number of receptor ports
    pub tau_syn: Vec<f32>,
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

impl Default for IafPscAlphaMultisynapseParameters {
    fn default() -> Self {
        IafPscAlphaMultisynapseParameters {
            c_m: 250., // membrane capacitance (pF)
            tau_m: 10., // membrane time constant (ms)
            tau_syn: vec![2.], // synaptic time constants (ms)
            t_ref: 2., // refractory period (ms)
            e_l: -70., // resting potential (mV)
            v_reset: -70., // reset potential (mV)
            v_th: -55., // spike threshold (mV)
            i_e: 0., // external current (pA)
        }
    }
}

impl IafPscAlphaMultisynapseParameters {
    /// Number of receptor ports the current time constants define
    pub fn n_receptors(&self) -> usize {
        self.tau_syn.len()
    }

    /// Checks every documented constraint, leaving the parameters untouched
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.c_m, "C_m")?;
        check_positive(self.tau_m, "tau_m")?;
        check_non_negative(self.t_ref, "t_ref")?;

        for tau in self.tau_syn.iter() {
            check_positive(*tau, "tau_syn")?;
        }

        if self.v_th <= self.v_reset {
            return Err(ParameterError::ThresholdBelowReset);
        }

        Ok(())
    }

    fn apply(&mut self, props: &PropertyMap) -> Result<(), ParameterError> {
        update_scalar(props, "C_m", &mut self.c_m)?;
        update_scalar(props, "tau_m", &mut self.tau_m)?;
        update_vector(props, "tau_syn", &mut self.tau_syn)?;
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
        props.insert_vector("tau_syn", self.tau_syn.clone());
        props.insert_scalar("t_ref", self.t_ref);
        props.insert_scalar("E_L", self.e_l);
        props.insert_scalar("V_reset", self.v_reset);
        props.insert_scalar("V_th", self.v_th);
        props.insert_scalar("I_e", self.i_e);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IafPscAlphaMultisynapseState {
    /// Membrane potential (mV)
    pub v_m: f32,
    /// Per-receptor rise components of the alpha currents
    pub y1: Vec<f32>,
    /// Per-receptor synaptic currents (pA)
    pub y2: Vec<f32>,
    /// Remaining refractory steps, the potential is clamped while positive
    pub refractory_steps_left: usize,
}

impl IafPscAlphaMultisynapseState {
    pub fn new(parameters: &IafPscAlphaMultisynapseParameters) -> Self {
        IafPscAlphaMultisynapseState {
            v_m: parameters.e_l,
            y1: vec![0.; parameters.n_receptors()],
            y2: vec![0.; parameters.n_receptors()],
            refractory_steps_left: 0,
        }
    }

    /// Resizes the per-receptor variables to the given receptor count,
    /// existing entries keep their values and new entries start at zero
    fn resize(&mut self, n_receptors: usize) {
        self.y1.resize(n_receptors, 0.);
        self.y2.resize(n_receptors, 0.);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IafPscAlphaMultisynapsePropagators {
    /// Per-receptor synaptic decay over one step
    p11: Vec<f32>,
    /// Per-receptor rise-to-current transfer over one step
    p21: Vec<f32>,
    /// Per-receptor charge transfer from the rise component onto the membrane
    p31: Vec<f32>,
    /// Per-receptor charge transfer from the current onto the membrane
    p32: Vec<f32>,
    /// Membrane decay over one step
    p33: f32,
    /// Charge transfer from a constant current over one step
    p30: f32,
    /// Per-receptor unit-peak normalization of the alpha kernel
    psc_initial: Vec<f32>,
    /// Refractory period in whole steps
    refractory_steps: usize,
}

impl IafPscAlphaMultisynapsePropagators {
    fn calibrate(parameters: &IafPscAlphaMultisynapseParameters, h: f32) -> Self {
        let p11: Vec<f32> = parameters.tau_syn.iter()
            .map(|tau| (-h / tau).exp())
            .collect();
        let p21 = p11.iter()
            .map(|decay| h * decay)
            .collect();
        let p31 = parameters.tau_syn.iter()
            .map(|tau| propagator_31(*tau, parameters.tau_m, parameters.c_m, h))
            .collect();
        let p32 = parameters.tau_syn.iter()
            .map(|tau| propagator_32(*tau, parameters.tau_m, parameters.c_m, h))
            .collect();
        let psc_initial = parameters.tau_syn.iter()
            .map(|tau| std::f32::consts::E / tau)
            .collect();

        IafPscAlphaMultisynapsePropagators {
            p11,
            p21,
            p31,
            p32,
            p33: propagator_membrane_decay(parameters.tau_m, h),
            p30: propagator_constant_current(parameters.tau_m, parameters.c_m, h),
            psc_initial,
            refractory_steps: refractory_steps(parameters.t_ref, h),
        }
    }
}

/// One spike buffer per receptor port plus a staging buffer for injected
/// currents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultisynapseBuffers {
    /// Accumulated spike weights, one buffer per receptor port
    pub spikes: Vec<RingBuffer>,
    /// Staged external current amplitudes (pA)
    pub currents: RingBuffer,
}

impl MultisynapseBuffers {
    pub fn new(n_receptors: usize) -> Self {
        MultisynapseBuffers {
            spikes: vec![RingBuffer::default(); n_receptors],
            currents: RingBuffer::default(),
        }
    }

    /// Resizes to the given receptor count, buffers for surviving ports
    /// keep their staged events
    fn resize(&mut self, n_receptors: usize) {
        self.spikes.resize(n_receptors, RingBuffer::default());
    }
}

impl Default for IafPscAlphaMultisynapse {
    fn default() -> Self {
        let parameters = IafPscAlphaMultisynapseParameters::default();
        let state = IafPscAlphaMultisynapseState::new(&parameters);
        let propagators = IafPscAlphaMultisynapsePropagators::calibrate(&parameters, 0.1);
        let buffers = MultisynapseBuffers::new(parameters.n_receptors());

        IafPscAlphaMultisynapse {
            parameters,
            state,
            propagators,
            buffers,
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
            last_firing_time: None,
            gaussian_params: GaussianParameters::default(),
        }
    }
}

impl IafPscAlphaMultisynapse {
    /// Creates a model with one receptor port per given synaptic time
    /// constant (ms)
    pub fn with_receptors(tau_syn: Vec<f32>) -> Result<Self, ParameterError> {
        let parameters = IafPscAlphaMultisynapseParameters {
            tau_syn,
            ..IafPscAlphaMultisynapseParameters::default()
        };
        parameters.validate()?;

        let state = IafPscAlphaMultisynapseState::new(&parameters);
        let propagators = IafPscAlphaMultisynapsePropagators::calibrate(&parameters, 0.1);
        let buffers = MultisynapseBuffers::new(parameters.n_receptors());

        Ok(IafPscAlphaMultisynapse {
            parameters,
            state,
            propagators,
            buffers,
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
            last_firing_time: None,
            gaussian_params: GaussianParameters::default(),
        })
    }

    /// Number of receptor ports the model currently exposes
    pub fn n_receptors(&self) -> usize {
        self.parameters.n_receptors()
    }

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

    /// Returns the recordable quantities of the model, the membrane
    /// potential only since the receptor count varies per instance
    pub fn recordables() -> RecordablesMap<Self> {
        let mut map = RecordablesMap::new();
        map.insert("V_m", |cell: &IafPscAlphaMultisynapse| cell.state.v_m);

        map
    }
}

impl GridDynamics for IafPscAlphaMultisynapse {
    fn calibrate(&mut self, resolution: f32) -> Result<(), ParameterError> {
        validate_resolution(resolution)?;
        self.parameters.validate()?;

        let n_receptors = self.parameters.n_receptors();
        if self.state.y1.len() != n_receptors {
            self.state.resize(n_receptors);
            self.buffers.resize(n_receptors);
        }

        self.dt = resolution;
        self.propagators =
            IafPscAlphaMultisynapsePropagators::calibrate(&self.parameters, resolution);

        Ok(())
    }

    fn advance_step(&mut self, step: usize) -> Result<bool, SolverError> {
        let stimulus = self.buffers.currents.consume();

        let p = &self.propagators;

        if self.state.refractory_steps_left > 0 {
            self.state.refractory_steps_left -= 1;
            self.state.v_m = self.parameters.v_reset;
        } else {
            let input_current = self.parameters.i_e + stimulus;

            let mut v_m = self.parameters.e_l
                + p.p33 * (self.state.v_m - self.parameters.e_l)
                + p.p30 * input_current;

            for receptor in 0..self.state.y1.len() {
                v_m += p.p31[receptor] * self.state.y1[receptor]
                    + p.p32[receptor] * self.state.y2[receptor];
            }

            self.state.v_m = v_m;
        }

        // alpha kernels evolve during refractoriness as well, the current
        // component is advanced before the rise component that feeds it
        for receptor in 0..self.state.y1.len() {
            let spikes = self.buffers.spikes[receptor].consume();

            self.state.y2[receptor] = p.p21[receptor] * self.state.y1[receptor]
                + p.p11[receptor] * self.state.y2[receptor];
            self.state.y1[receptor] = p.p11[receptor] * self.state.y1[receptor]
                + p.psc_initial[receptor] * spikes;
        }

        Ok(self.handle_spiking(step))
    }

    fn check_receptor(&self, port: usize) -> Result<(), ReceptorError> {
        let n_receptors = self.parameters.n_receptors();

        if port == 0 || port > n_receptors {
            Err(ReceptorError::UnknownReceptor { port, n_receptors })
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
        self.buffers.spikes[port - 1].add(delay_steps, weight);

        Ok(())
    }

    fn inject_current(&mut self, delay_steps: usize, amplitude: f32) {
        self.buffers.currents.add(delay_steps, amplitude);
    }

    fn get_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.parameters.export(&mut props);

        props
    }

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
