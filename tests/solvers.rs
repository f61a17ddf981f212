#[cfg(test)]
mod tests {
    use ndarray::{array, Array1};
    use point_neuron_models::{
        error::{NeuronModelError, SolverError},
        neuron::{adex::AeifCondAlpha, run_static_input, GridDynamics},
        solver::{AdaptiveRk45, FixedStepRk4, OdeSolver},
    };

    #[test]
    pub fn test_adaptive_solver_matches_exponential_decay() -> Result<(), SolverError> {
        let solver = AdaptiveRk45::default();
        let mut y = array![1.0_f32];

        solver.advance(
            |_t, y, dydt| dydt[0] = -y[0],
            &mut y,
            0.,
            1.,
        )?;

        assert!((y[0] - (-1.0_f32).exp()).abs() < 1e-3);

        Ok(())
    }

    #[test]
    pub fn test_fixed_step_solver_matches_exponential_decay() -> Result<(), SolverError> {
        let solver = FixedStepRk4 { substeps: 10 };
        let mut y = array![1.0_f32];

        solver.advance(
            |_t, y, dydt| dydt[0] = -y[0],
            &mut y,
            0.,
            1.,
        )?;

        assert!((y[0] - (-1.0_f32).exp()).abs() < 1e-4);

        Ok(())
    }

    #[test]
    pub fn test_adaptive_solver_tracks_an_oscillator() -> Result<(), SolverError> {
        let solver = AdaptiveRk45::default();
        let mut y = array![1.0_f32, 0.0];

        let rhs = |_t: f32, y: &Array1<f32>, dydt: &mut Array1<f32>| {
            dydt[0] = y[1];
            dydt[1] = -y[0];
        };

        // integrate the unit oscillator across many short spans the way a
        // grid stepped model would
        for step in 0..100 {
            solver.advance(rhs, &mut y, step as f32 * 0.1, 0.1)?;
        }

        assert!((y[0] - (10.0_f32).cos()).abs() < 1e-2);
        assert!((y[1] + (10.0_f32).sin()).abs() < 1e-2);

        Ok(())
    }

    #[test]
    pub fn test_adaptive_solver_reports_divergence() {
        let solver = AdaptiveRk45 {
            tolerance: 1e-3,
            min_step: 0.5,
        };
        let mut y = array![0.0_f32];

        // a right-hand side oscillating far faster than the minimum step
        // can never satisfy the tolerance
        let result = solver.advance(
            |t, _y, dydt| dydt[0] = 1e9 * (1e3 * t).sin(),
            &mut y,
            0.,
            1.,
        );

        assert_eq!(result, Err(SolverError::Divergence { time: 0. }));
    }

    #[test]
    pub fn test_unconverged_model_update_surfaces_the_error() -> Result<(), NeuronModelError> {
        let mut cell = AeifCondAlpha::new(AdaptiveRk45 {
            tolerance: 1e-12,
            min_step: 0.09,
        });
        cell.calibrate(0.1)?;

        let result = run_static_input(&mut cell, 1e5, false, 10);

        assert!(matches!(result, Err(SolverError::Divergence { .. })));

        Ok(())
    }

    #[test]
    pub fn test_fixed_step_solver_never_reports_divergence() -> Result<(), NeuronModelError> {
        let mut cell = AeifCondAlpha::new(FixedStepRk4 { substeps: 10 });
        cell.calibrate(0.1)?;

        let voltages = run_static_input(&mut cell, 1000., false, 1000)?;
        assert_eq!(voltages.len(), 1000);

        Ok(())
    }
}
