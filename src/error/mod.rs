use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for parameter and calibration validation failures, raised
/// before any state is mutated so the previous configuration stays intact
#[derive(Clone, PartialEq)]
pub enum ParameterError {
    /// A value that must be strictly positive was zero or negative,
    /// carries the offending field name
    NonPositive(&'static str),
    /// A value that must be non-negative was negative,
    /// carries the offending field name
    Negative(&'static str),
    /// Spike threshold was at or below the reset potential
    ThresholdBelowReset,
    /// Per-receptor vectors disagree in length,
    /// carries the offending field name
    MismatchedVectorLength(&'static str),
    /// A property was supplied with the wrong kind of value,
    /// carries the offending field name
    WrongPropertyKind(&'static str),
    /// Reset rule fraction was outside of `[0, 1]`
    ResetFractionOutOfRange,
    /// Simulation resolution was not a positive multiple of the minimum step
    InvalidResolution,
}

impl Display for ParameterError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParameterError::NonPositive(name) =>
                write!(f, "Parameter '{}' must be strictly positive", name),
            ParameterError::Negative(name) =>
                write!(f, "Parameter '{}' must be non-negative", name),
            ParameterError::ThresholdBelowReset =>
                write!(f, "Spike threshold must be above the reset potential"),
            ParameterError::MismatchedVectorLength(name) =>
                write!(f, "Parameter '{}' must have one entry per receptor", name),
            ParameterError::WrongPropertyKind(name) =>
                write!(f, "Parameter '{}' was given the wrong kind of value", name),
            ParameterError::ResetFractionOutOfRange =>
                write!(f, "Voltage reset fraction must be within [0, 1]"),
            ParameterError::InvalidResolution =>
                write!(f, "Resolution must be a positive multiple of the minimum step"),
        }
    }
}

impl Debug for ParameterError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for invalid input delivery targets
#[derive(Clone, PartialEq)]
pub enum ReceptorError {
    /// Receptor port is outside the valid range for the model,
    /// existing connections are unaffected
    UnknownReceptor {
        /// Port the delivery was addressed to
        port: usize,
        /// Number of receptor ports the model exposes
        n_receptors: usize,
    },
}

impl Display for ReceptorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ReceptorError::UnknownReceptor { port, n_receptors } =>
                write!(
                    f,
                    "Unknown receptor port {} (model has {} receptor port(s))",
                    port,
                    n_receptors,
                ),
        }
    }
}

impl Debug for ReceptorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for adaptive solver failures during an update step, fatal to
/// the run since continuing would propagate unconverged state
#[derive(Clone, PartialEq)]
pub enum SolverError {
    /// Solver could not satisfy its error tolerance without stepping below
    /// the configured minimum step size, carries the simulation time (ms)
    /// at which integration failed
    Divergence {
        /// Simulation time (ms) of the failed step
        time: f32,
    },
}

impl Display for SolverError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            SolverError::Divergence { time } =>
                write!(
                    f,
                    "Adaptive solver could not converge within the minimum step size at t = {} ms",
                    time,
                ),
        }
    }
}

impl Debug for SolverError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for wiring cells together
#[derive(Clone, PartialEq)]
pub enum PopulationError {
    /// A connection endpoint referenced a cell index outside the population
    CellOutOfBounds {
        /// Index the connection referenced
        index: usize,
        /// Number of cells in the population
        n_cells: usize,
    },
    /// Connection delay was below the one step minimum
    DelayTooShort,
}

impl Display for PopulationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PopulationError::CellOutOfBounds { index, n_cells } =>
                write!(
                    f,
                    "Cell index {} is out of bounds (population has {} cell(s))",
                    index,
                    n_cells,
                ),
            PopulationError::DelayTooShort =>
                write!(f, "Connection delay must be at least one grid step"),
        }
    }
}

impl Debug for PopulationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
#[derive(Clone, PartialEq)]
pub enum NeuronModelError {
    /// Errors related to parameter validation and calibration
    ParameterRelatedError(ParameterError),
    /// Errors related to input delivery
    ReceptorRelatedError(ReceptorError),
    /// Errors related to adaptive ODE solving
    SolverRelatedError(SolverError),
    /// Errors related to wiring cells together
    PopulationRelatedError(PopulationError),
}

impl Display for NeuronModelError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            NeuronModelError::ParameterRelatedError(err) => write!(f, "{}", err),
            NeuronModelError::ReceptorRelatedError(err) => write!(f, "{}", err),
            NeuronModelError::SolverRelatedError(err) => write!(f, "{}", err),
            NeuronModelError::PopulationRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for NeuronModelError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<ParameterError> for NeuronModelError {
    fn from(err: ParameterError) -> NeuronModelError {
        NeuronModelError::ParameterRelatedError(err)
    }
}

impl From<ReceptorError> for NeuronModelError {
    fn from(err: ReceptorError) -> NeuronModelError {
        NeuronModelError::ReceptorRelatedError(err)
    }
}

impl From<SolverError> for NeuronModelError {
    fn from(err: SolverError) -> NeuronModelError {
        NeuronModelError::SolverRelatedError(err)
    }
}

impl From<PopulationError> for NeuronModelError {
    fn from(err: PopulationError) -> NeuronModelError {
        NeuronModelError::PopulationRelatedError(err)
    }
}
