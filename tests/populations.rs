#[cfg(test)]
mod tests {
    use point_neuron_models::{
        error::{NeuronModelError, PopulationError, ReceptorError},
        neuron::{
            integrate_and_fire::IafPscDelta,
            multisynapse::IafPscAlphaMultisynapse,
            Connection, GridDynamics, Population,
        },
    };

    #[test]
    pub fn test_two_channel_models_only_expose_port_zero() {
        let mut cell = IafPscDelta::default();

        assert!(cell.check_receptor(0).is_ok());
        assert_eq!(
            cell.check_receptor(1),
            Err(ReceptorError::UnknownReceptor { port: 1, n_receptors: 1 }),
        );
        assert_eq!(
            cell.receive_spike(0, 3, 1.),
            Err(ReceptorError::UnknownReceptor { port: 3, n_receptors: 1 }),
        );
    }

    #[test]
    pub fn test_multisynapse_ports_start_at_one() -> Result<(), NeuronModelError> {
        let cell = IafPscAlphaMultisynapse::with_receptors(vec![2., 5.])?;

        assert_eq!(
            cell.check_receptor(0),
            Err(ReceptorError::UnknownReceptor { port: 0, n_receptors: 2 }),
        );
        assert!(cell.check_receptor(1).is_ok());
        assert!(cell.check_receptor(2).is_ok());
        assert_eq!(
            cell.check_receptor(3),
            Err(ReceptorError::UnknownReceptor { port: 3, n_receptors: 2 }),
        );

        Ok(())
    }

    #[test]
    pub fn test_connect_validates_endpoints_and_delay() -> Result<(), NeuronModelError> {
        let mut population = Population::new(vec![
            IafPscDelta::default(),
            IafPscDelta::default(),
        ]);

        let result = population.connect(Connection {
            source: 0,
            target: 5,
            port: 0,
            weight: 1.,
            delay_steps: 1,
        });
        assert_eq!(
            result,
            Err(NeuronModelError::PopulationRelatedError(
                PopulationError::CellOutOfBounds { index: 5, n_cells: 2 },
            )),
        );

        let result = population.connect(Connection {
            source: 0,
            target: 1,
            port: 0,
            weight: 1.,
            delay_steps: 0,
        });
        assert_eq!(
            result,
            Err(NeuronModelError::PopulationRelatedError(
                PopulationError::DelayTooShort,
            )),
        );

        let result = population.connect(Connection {
            source: 0,
            target: 1,
            port: 2,
            weight: 1.,
            delay_steps: 1,
        });
        assert_eq!(
            result,
            Err(NeuronModelError::ReceptorRelatedError(
                ReceptorError::UnknownReceptor { port: 2, n_receptors: 1 },
            )),
        );

        population.connect(Connection {
            source: 0,
            target: 1,
            port: 0,
            weight: 1.,
            delay_steps: 1,
        })?;
        assert_eq!(population.connections().len(), 1);

        Ok(())
    }

    #[test]
    pub fn test_spikes_are_delivered_after_the_configured_delay() -> Result<(), NeuronModelError> {
        let mut driver = IafPscDelta::default();
        driver.parameters.tau_m = f32::INFINITY;
        driver.parameters.i_e = 376.; // fires on the hundredth step

        let follower = IafPscDelta::default();

        let mut population = Population::new(vec![driver, follower]);
        population.calibrate(0.1)?;
        population.connect(Connection {
            source: 0,
            target: 1,
            port: 0,
            weight: 5.,
            delay_steps: 10,
        })?;

        // run up to the step just before delivery, the follower is at rest
        population.run_steps(109)?;
        assert_eq!(population.spikes_of(0), vec![99]);
        let e_l = population.cells[1].parameters.e_l;
        assert!((population.cells[1].state.v_m - e_l).abs() < 1e-4);

        // the delivery step jumps the follower by the connection weight
        population.run_step()?;
        assert!((population.cells[1].state.v_m - (e_l + 5.)).abs() < 1e-3);

        Ok(())
    }

    #[test]
    pub fn test_empty_population_runs() -> Result<(), NeuronModelError> {
        let mut population: Population<IafPscDelta> = Population::new(vec![]);
        population.calibrate(0.1)?;
        population.run_steps(1000)?;

        assert!(population.is_empty());
        assert!(population.spike_events.is_empty());

        Ok(())
    }
}
