#[cfg(test)]
mod tests {
    use point_neuron_models::{
        error::NeuronModelError,
        distribution::limited_distr,
        neuron::{
            integrate_and_fire::IafPscAlpha,
            run_static_input, run_static_input_with_logger,
            GaussianFactor, GridDynamics, StateLogger,
        },
    };

    #[test]
    pub fn test_logger_samples_on_the_configured_interval() -> Result<(), NeuronModelError> {
        let mut cell = IafPscAlpha::default();
        cell.calibrate(0.1)?;

        let mut logger = StateLogger::new(IafPscAlpha::recordables(), 2);
        run_static_input_with_logger(&mut cell, &mut logger, 300., false, 10)?;

        let voltages = logger.series("V_m").unwrap();
        assert_eq!(voltages.len(), 5);
        assert!(logger.series("I_syn_ex").is_some());
        assert!(logger.series("no_such_recordable").is_none());

        Ok(())
    }

    #[test]
    pub fn test_recordables_read_live_state() -> Result<(), NeuronModelError> {
        let mut cell = IafPscAlpha::default();
        cell.calibrate(0.1)?;
        run_static_input(&mut cell, 300., false, 100)?;

        let map = IafPscAlpha::recordables();
        let accessor = map.get("V_m").unwrap();

        assert_eq!(accessor(&cell), cell.state.v_m);
        assert!(map.names().contains(&"V_m"));

        Ok(())
    }

    #[test]
    pub fn test_zero_std_noise_factor_is_the_mean() {
        let cell = IafPscAlpha::default();

        // default noise parameters have no spread
        assert_eq!(cell.get_gaussian_factor(), 1.);
        assert_eq!(limited_distr(3., 0., 0., 10.), 3.);
    }

    #[test]
    pub fn test_degenerate_spread_falls_back_to_the_mean() {
        assert_eq!(limited_distr(3., -1., 0., 10.), 3.);
        assert_eq!(limited_distr(3., f32::NAN, 0., 10.), 3.);
    }

    #[test]
    pub fn test_noise_factor_respects_the_cutoffs() {
        let mut cell = IafPscAlpha::default();
        cell.gaussian_params.std = 5.;

        for _ in 0..100 {
            let factor = cell.get_gaussian_factor();
            assert!(factor >= cell.gaussian_params.min);
            assert!(factor <= cell.gaussian_params.max);
        }
    }
}
