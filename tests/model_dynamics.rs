#[cfg(test)]
mod tests {
    use point_neuron_models::{
        error::NeuronModelError,
        neuron::{
            adex::AeifCondAlpha,
            glif::GlifPscExp,
            hodgkin_huxley::HhPscAlpha,
            GridDynamics,
        },
    };

    fn spike_steps<T: GridDynamics>(
        cell: &mut T,
        input: f32,
        steps: usize,
    ) -> Result<Vec<usize>, NeuronModelError> {
        let mut fired = vec![];

        for step in 0..steps {
            cell.inject_current(0, input);
            if cell.advance_step(step)? {
                fired.push(step);
            }
        }

        Ok(fired)
    }

    #[test]
    pub fn test_hodgkin_huxley_fires_repetitively_under_drive() -> Result<(), NeuronModelError> {
        let mut cell = HhPscAlpha::default();
        cell.calibrate(0.1)?;

        // 200 ms of drive well above the onset of repetitive firing, which
        // sits near 620 pA at these conductance scalings
        let fired = spike_steps(&mut cell, 1000., 2000)?;

        assert!(fired.len() >= 5, "only {} spikes", fired.len());
        assert!(fired.len() <= 50, "{} spikes", fired.len());
        assert!(cell.state.v_m > -100. && cell.state.v_m < 60.);

        // gating variables stay within their physical range
        assert!(cell.state.m >= 0. && cell.state.m <= 1.);
        assert!(cell.state.h >= 0. && cell.state.h <= 1.);
        assert!(cell.state.n >= 0. && cell.state.n <= 1.);

        Ok(())
    }

    #[test]
    pub fn test_hodgkin_huxley_subthreshold_drive_is_silent() -> Result<(), NeuronModelError> {
        let mut cell = HhPscAlpha::default();
        cell.calibrate(0.1)?;

        let fired = spike_steps(&mut cell, 100., 2000)?;

        assert!(fired.is_empty());

        Ok(())
    }

    #[test]
    pub fn test_adex_adaptation_stretches_interspike_intervals() -> Result<(), NeuronModelError> {
        let mut cell = AeifCondAlpha::default();
        cell.parameters.i_e = 800.;
        cell.calibrate(0.1)?;

        let fired = spike_steps(&mut cell, 0., 10000)?;

        assert!(fired.len() >= 3, "only {} spikes", fired.len());

        let intervals: Vec<usize> = fired.windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect();
        assert!(
            intervals[intervals.len() - 1] > intervals[0],
            "adaptation did not slow firing: {:?}",
            intervals,
        );

        // the adaptation current accumulated across the spikes
        assert!(cell.state.w > 0.);

        Ok(())
    }

    #[test]
    pub fn test_adex_refractory_voltage_is_held_inside_the_step() -> Result<(), NeuronModelError> {
        let mut cell = AeifCondAlpha::default();
        cell.parameters.t_ref = 2.;
        cell.parameters.i_e = 800.;
        cell.calibrate(0.1)?;

        let mut step = 0;
        loop {
            let fired = cell.advance_step(step)?;
            step += 1;
            if fired {
                break;
            }
            assert!(step < 20000, "never fired");
        }

        let mut twin = cell.clone();

        // heavy drive during the refractory period must not leak into the
        // adaptation current through the clamped voltage
        for _ in 0..20 {
            cell.inject_current(0, 1e4);
            cell.advance_step(step)?;
            twin.advance_step(step)?;

            assert_eq!(cell.state.v_m, cell.parameters.v_reset);
            assert!((cell.state.w - twin.state.w).abs() < 1e-3);
            step += 1;
        }

        Ok(())
    }

    #[test]
    pub fn test_glif_threshold_adapts_and_resets_fractionally() -> Result<(), NeuronModelError> {
        let mut cell = GlifPscExp::default();
        cell.parameters.asc_amps = vec![];
        cell.parameters.asc_decays = vec![];
        cell.calibrate(0.1)?;

        let mut fired_step = None;
        for step in 0..5000 {
            cell.inject_current(0, 400.);
            if cell.advance_step(step)? {
                fired_step = Some(step);
                break;
            }
        }

        assert!(fired_step.is_some());

        // fractional reset lands between a full reset to rest and no reset
        let e_l = cell.parameters.e_l;
        assert!(cell.state.v_m > e_l - cell.parameters.v_reset_delta - 0.1);
        assert!(cell.state.v_m < cell.parameters.th_inf);

        // the spike component raised the threshold and decays afterwards
        let threshold_after_spike = cell.threshold();
        assert!(threshold_after_spike > cell.parameters.th_inf);

        Ok(())
    }

    #[test]
    pub fn test_glif_after_spike_currents_load_on_spike() -> Result<(), NeuronModelError> {
        let mut cell = GlifPscExp::default();
        cell.calibrate(0.1)?;

        let fired = spike_steps(&mut cell, 400., 5000)?;

        assert!(!fired.is_empty());
        // default amplitudes are hyperpolarizing
        assert!(cell.state.asc.iter().sum::<f32>() < 0.);

        Ok(())
    }
}
