//! Embedded adaptive Runge-Kutta integration for models whose dynamics have
//! no closed-form propagator.
//!
//! Two interchangeable strategies sit behind [`OdeSolver`]: an adaptive
//! embedded Cash-Karp pair that subdivides each grid step until a configured
//! error tolerance holds, and a fixed-step classical Runge-Kutta fallback
//! with a caller-chosen number of substeps.

use ndarray::Array1;
use crate::error::SolverError;


/// Advances an ODE state vector across one grid step given the system's
/// right-hand side, never overshooting the end of the step
pub trait OdeSolver: Clone + Send + Sync {
    /// Integrates `y` from `t` to `t + span`, `rhs` maps `(t, y)` to the
    /// derivative vector, returns an error if the step cannot converge
    fn advance<F>(
        &self,
        rhs: F,
        y: &mut Array1<f32>,
        t: f32,
        span: f32,
    ) -> Result<(), SolverError>
    where
        F: Fn(f32, &Array1<f32>, &mut Array1<f32>);
}

/// An embedded Cash-Karp 4th/5th order pair with step-size adaptation
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveRk45 {
    /// Largest acceptable per-step error estimate
    pub tolerance: f32,
    /// Smallest internal step size (ms) before integration is considered
    /// divergent
    pub min_step: f32,
}

impl Default for AdaptiveRk45 {
    fn default() -> Self {
        AdaptiveRk45 {
            tolerance: 1e-3,
            min_step: 1e-4,
        }
    }
}

// Cash-Karp tableau
const B21: f32 = 1. / 5.;
const B31: f32 = 3. / 40.;
const B32: f32 = 9. / 40.;
const B41: f32 = 3. / 10.;
const B42: f32 = -9. / 10.;
const B43: f32 = 6. / 5.;
const B51: f32 = -11. / 54.;
const B52: f32 = 5. / 2.;
const B53: f32 = -70. / 27.;
const B54: f32 = 35. / 27.;
const B61: f32 = 1631. / 55296.;
const B62: f32 = 175. / 512.;
const B63: f32 = 575. / 13824.;
const B64: f32 = 44275. / 110592.;
const B65: f32 = 253. / 4096.;

const A2: f32 = 1. / 5.;
const A3: f32 = 3. / 10.;
const A4: f32 = 3. / 5.;
const A5: f32 = 1.;
const A6: f32 = 7. / 8.;

// 5th order solution weights
const C1: f32 = 37. / 378.;
const C3: f32 = 250. / 621.;
const C4: f32 = 125. / 594.;
const C6: f32 = 512. / 1771.;

// difference between the 5th and embedded 4th order weights
const E1: f32 = C1 - 2825. / 27648.;
const E3: f32 = C3 - 18575. / 48384.;
const E4: f32 = C4 - 13525. / 55296.;
const E5: f32 = -277. / 14336.;
const E6: f32 = C6 - 1. / 4.;

impl OdeSolver for AdaptiveRk45 {
    fn advance<F>(
        &self,
        rhs: F,
        y: &mut Array1<f32>,
        t: f32,
        span: f32,
    ) -> Result<(), SolverError>
    where
        F: Fn(f32, &Array1<f32>, &mut Array1<f32>),
    {
        let t_end = t + span;
        let mut t_now = t;
        let mut h = span;

        let mut k1 = Array1::zeros(y.len());
        let mut k2 = Array1::zeros(y.len());
        let mut k3 = Array1::zeros(y.len());
        let mut k4 = Array1::zeros(y.len());
        let mut k5 = Array1::zeros(y.len());
        let mut k6 = Array1::zeros(y.len());

        while t_now < t_end {
            h = h.min(t_end - t_now);

            rhs(t_now, y, &mut k1);

            let stage = &*y + &(&k1 * (B21 * h));
            rhs(t_now + A2 * h, &stage, &mut k2);

            let stage = &*y + &(&k1 * (B31 * h)) + &(&k2 * (B32 * h));
            rhs(t_now + A3 * h, &stage, &mut k3);

            let stage = &*y + &(&k1 * (B41 * h)) + &(&k2 * (B42 * h)) + &(&k3 * (B43 * h));
            rhs(t_now + A4 * h, &stage, &mut k4);

            let stage = &*y + &(&k1 * (B51 * h)) + &(&k2 * (B52 * h))
                + &(&k3 * (B53 * h)) + &(&k4 * (B54 * h));
            rhs(t_now + A5 * h, &stage, &mut k5);

            let stage = &*y + &(&k1 * (B61 * h)) + &(&k2 * (B62 * h))
                + &(&k3 * (B63 * h)) + &(&k4 * (B64 * h)) + &(&k5 * (B65 * h));
            rhs(t_now + A6 * h, &stage, &mut k6);

            let error_estimate = &(&k1 * E1) + &(&k3 * E3) + &(&k4 * E4)
                + &(&k5 * E5) + &(&k6 * E6);
            let error = error_estimate.iter()
                .fold(0., |max: f32, value| max.max((value * h).abs()));

            if error <= self.tolerance {
                *y = &*y + &(&k1 * (C1 * h)) + &(&k3 * (C3 * h))
                    + &(&k4 * (C4 * h)) + &(&k6 * (C6 * h));
                t_now += h;

                let growth = if error == 0. {
                    5.
                } else {
                    (0.9 * (self.tolerance / error).powf(0.2)).min(5.)
                };
                h *= growth;
            } else {
                h *= (0.9 * (self.tolerance / error).powf(0.25)).max(0.1);

                if h < self.min_step {
                    return Err(SolverError::Divergence { time: t_now });
                }
            }
        }

        Ok(())
    }
}

/// A classical 4th order Runge-Kutta integrator with a fixed number of
/// substeps per grid step
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepRk4 {
    /// Number of equal substeps each grid step is divided into
    pub substeps: usize,
}

impl Default for FixedStepRk4 {
    fn default() -> Self {
        FixedStepRk4 { substeps: 1 }
    }
}

impl OdeSolver for FixedStepRk4 {
    fn advance<F>(
        &self,
        rhs: F,
        y: &mut Array1<f32>,
        t: f32,
        span: f32,
    ) -> Result<(), SolverError>
    where
        F: Fn(f32, &Array1<f32>, &mut Array1<f32>),
    {
        let substeps = self.substeps.max(1);
        let h = span / substeps as f32;

        let mut k1 = Array1::zeros(y.len());
        let mut k2 = Array1::zeros(y.len());
        let mut k3 = Array1::zeros(y.len());
        let mut k4 = Array1::zeros(y.len());

        for i in 0..substeps {
            let t_now = t + i as f32 * h;

            rhs(t_now, y, &mut k1);

            let stage = &*y + &(&k1 * (h / 2.));
            rhs(t_now + h / 2., &stage, &mut k2);

            let stage = &*y + &(&k2 * (h / 2.));
            rhs(t_now + h / 2., &stage, &mut k3);

            let stage = &*y + &(&k3 * h);
            rhs(t_now + h, &stage, &mut k4);

            let weighted = &k1 + &(&k2 * 2.) + &(&k3 * 2.) + &k4;
            *y = &*y + &(&weighted * (h / 6.));
        }

        Ok(())
    }
}
