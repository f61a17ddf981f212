#[cfg(test)]
mod tests {
    use point_neuron_models::{
        error::{NeuronModelError, ParameterError},
        properties::PropertyMap,
        neuron::{
            glif::GlifPscExp,
            integrate_and_fire::{IafPscAlpha, IafPscExp},
            multisynapse::IafPscAlphaMultisynapse,
            GridDynamics,
        },
    };

    #[test]
    pub fn test_get_then_set_is_a_no_op() -> Result<(), NeuronModelError> {
        let mut cell = IafPscExp::default();
        cell.calibrate(0.1)?;

        let parameters_before = cell.parameters.clone();
        let v_m_before = cell.state.v_m;

        let props = cell.get_properties();
        cell.set_properties(&props)?;

        assert_eq!(cell.parameters, parameters_before);
        assert_eq!(cell.state.v_m, v_m_before);

        Ok(())
    }

    #[test]
    pub fn test_invalid_capacitance_leaves_parameters_untouched() {
        let mut cell = IafPscAlpha::default();
        let parameters_before = cell.parameters.clone();

        let mut props = PropertyMap::new();
        props.insert_scalar("C_m", -1.);

        let result = cell.set_properties(&props);

        assert_eq!(result, Err(ParameterError::NonPositive("C_m")));
        assert_eq!(cell.parameters, parameters_before);
    }

    #[test]
    pub fn test_threshold_below_reset_is_rejected() {
        let mut cell = IafPscExp::default();

        let mut props = PropertyMap::new();
        props.insert_scalar("V_th", -80.);

        assert_eq!(
            cell.set_properties(&props),
            Err(ParameterError::ThresholdBelowReset),
        );
    }

    #[test]
    pub fn test_resting_potential_change_shifts_the_membrane() -> Result<(), NeuronModelError> {
        let mut cell = IafPscExp::default();
        cell.calibrate(0.1)?;

        let v_m_before = cell.state.v_m;

        let mut props = PropertyMap::new();
        props.insert_scalar("E_L", cell.parameters.e_l + 10.);
        cell.set_properties(&props)?;

        assert!((cell.state.v_m - (v_m_before + 10.)).abs() < 1e-4);

        Ok(())
    }

    #[test]
    pub fn test_wrong_property_kind_is_rejected() {
        let mut cell = IafPscExp::default();

        let mut props = PropertyMap::new();
        props.insert_vector("C_m", vec![250.]);

        assert_eq!(
            cell.set_properties(&props),
            Err(ParameterError::WrongPropertyKind("C_m")),
        );
    }

    #[test]
    pub fn test_unknown_keys_are_ignored() -> Result<(), NeuronModelError> {
        let mut cell = IafPscExp::default();

        let mut props = PropertyMap::new();
        props.insert_scalar("no_such_parameter", 1.);
        cell.set_properties(&props)?;

        Ok(())
    }

    #[test]
    pub fn test_glif_reset_fraction_bounds() {
        let mut cell = GlifPscExp::default();

        let mut props = PropertyMap::new();
        props.insert_scalar("V_reset_fraction", 1.5);

        assert_eq!(
            cell.set_properties(&props),
            Err(ParameterError::ResetFractionOutOfRange),
        );
    }

    #[test]
    pub fn test_glif_after_spike_current_vectors_must_agree() {
        let mut cell = GlifPscExp::default();

        let mut props = PropertyMap::new();
        props.insert_vector("asc_amps", vec![-10.]);

        assert_eq!(
            cell.set_properties(&props),
            Err(ParameterError::MismatchedVectorLength("asc_decays")),
        );
    }

    #[test]
    pub fn test_multisynapse_time_constants_resize_state() -> Result<(), NeuronModelError> {
        let mut cell = IafPscAlphaMultisynapse::with_receptors(vec![2., 5.])?;
        cell.calibrate(0.1)?;

        cell.receive_spike(0, 1, 10.)?;
        for step in 0..5 {
            cell.advance_step(step)?;
        }

        let y2_before = cell.state.y2[0];
        assert!(y2_before > 0.);

        let mut props = PropertyMap::new();
        props.insert_vector("tau_syn", vec![2., 5., 10.]);
        cell.set_properties(&props)?;

        // surviving receptors keep their state, the new one starts at zero
        assert_eq!(cell.n_receptors(), 3);
        assert_eq!(cell.state.y2.len(), 3);
        assert_eq!(cell.state.y2[0], y2_before);
        assert_eq!(cell.state.y2[2], 0.);

        Ok(())
    }

    #[test]
    pub fn test_invalid_resolution_is_rejected() {
        let mut cell = IafPscExp::default();

        assert_eq!(
            cell.calibrate(0.0005),
            Err(ParameterError::InvalidResolution),
        );
        assert_eq!(
            cell.calibrate(-0.1),
            Err(ParameterError::InvalidResolution),
        );
    }
}
