//! # Validator Runtime Flow
//!
//! The complete client (clock, resolver, dispatcher, router, signer) wired
//! by the runtime against the in-process task source.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{attester_duty, keys, task_source, wall_clock, T0};
    use shared_types::shutdown_channel;
    use std::sync::Arc;
    use std::time::Duration;
    use sv_04_duty_dispatcher::{DispatcherState, SlotReport};
    use validator_runtime::dev::in_process_source;
    use validator_runtime::{BeaconConnection, ValidatorConfig, ValidatorRuntime};

    fn config() -> ValidatorConfig {
        let mut config = ValidatorConfig::default();
        config.stream.reconnect_delay = None;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_attester_duty_produces_one_partial_attestation() {
        let keys = keys();
        let own = keys.public_keys()[0];
        let other = keys.public_keys()[1];
        let (source_handle, source_shutdown) = shutdown_channel();
        let source = task_source(
            vec![
                attester_duty(own, 0, vec![1, 0], 1),
                attester_duty(other, 1, vec![1, 0], 9),
            ],
            source_shutdown,
        );

        let mut running =
            ValidatorRuntime::new(config(), BeaconConnection::in_process(source.clone()), keys)
                .unwrap()
                .with_wall_clock(wall_clock())
                .start();

        let report = running.next_report().await.unwrap();
        assert_eq!(
            report,
            SlotReport {
                slot: 1,
                spawned: 1,
                succeeded: 1,
                failed: 0,
                aborted: 0,
                skipped: 0,
            }
        );

        let attestations = source.attestations();
        assert_eq!(attestations.len(), 1);
        assert_eq!(attestations[0].data.slot, 1);
        // Committee [1, 0], own index 0 at position 1.
        assert_eq!(attestations[0].aggregation_bits, vec![0b110]);

        running.shutdown().await.unwrap();
        source_handle.trigger();
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregation_duty_is_reported_as_skipped() {
        let keys = keys();
        let own = keys.public_keys()[0];
        let (source_handle, source_shutdown) = shutdown_channel();
        let mut duty = attester_duty(own, 0, vec![0, 1], 1);
        duty.aggregator = true;
        let source = task_source(vec![duty], source_shutdown);

        let mut running =
            ValidatorRuntime::new(config(), BeaconConnection::in_process(source.clone()), keys)
                .unwrap()
                .with_wall_clock(wall_clock())
                .start();

        let report = running.next_report().await.unwrap();
        assert_eq!(report.slot, 1);
        assert_eq!(report.spawned, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.is_complete());
        assert_eq!(source.attestations().len(), 1);

        running.shutdown().await.unwrap();
        source_handle.trigger();
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_from_committee_fails_only_that_task() {
        let keys = keys();
        let own = keys.public_keys()[0];
        let (source_handle, source_shutdown) = shutdown_channel();
        let source = task_source(vec![attester_duty(own, 0, vec![5, 6], 1)], source_shutdown);

        let mut running =
            ValidatorRuntime::new(config(), BeaconConnection::in_process(source.clone()), keys)
                .unwrap()
                .with_wall_clock(wall_clock())
                .start();

        let report = running.next_report().await.unwrap();
        assert_eq!((report.slot, report.failed), (1, 1));
        assert!(source.attestations().is_empty());
        assert_ne!(*running.state().borrow(), DispatcherState::Stopped);

        running.shutdown().await.unwrap();
        source_handle.trigger();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_slot_aborts_waiting_role() {
        let keys = keys();
        // Tasks are only ever addressed to the first key; the second key's
        // attester task waits for a task that never comes.
        let waiting = keys.public_keys()[1];
        let (source_handle, source_shutdown) = shutdown_channel();
        let source =
            task_source(vec![attester_duty(waiting, 1, vec![0, 1], 1)], source_shutdown);

        let running =
            ValidatorRuntime::new(config(), BeaconConnection::in_process(source.clone()), keys)
                .unwrap()
                .with_wall_clock(wall_clock())
                .start();
        let state = running.state();

        // Slot 1 starts 11s in; stop 4s into it.
        tokio::time::sleep(Duration::from_secs(15)).await;
        let reports = tokio::time::timeout(Duration::from_secs(1), running.shutdown())
            .await
            .expect("shutdown must complete promptly")
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!((reports[0].slot, reports[0].aborted), (1, 1));
        assert!(source.attestations().is_empty());
        assert_eq!(*state.borrow(), DispatcherState::Stopped);
        source_handle.trigger();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dev_source_streams_for_interop_keys() {
        let keys = keys();
        let mut config = config();
        config.dev.genesis_time = Some(T0);
        let (source_handle, source_shutdown) = shutdown_channel();
        let source = Arc::new(in_process_source(
            &config,
            keys.public_keys(),
            wall_clock(),
            source_shutdown,
        ));

        let mut running =
            ValidatorRuntime::new(config, BeaconConnection::in_process(source.clone()), keys)
                .unwrap()
                .with_wall_clock(wall_clock())
                .start();

        // Key 0 attests at offset 0 of every epoch; slot 32 is the first.
        loop {
            let report = running.next_report().await.unwrap();
            if report.slot == 32 {
                assert_eq!(report.succeeded, 1);
                break;
            }
        }
        assert_eq!(source.attestations().len(), 1);

        running.shutdown().await.unwrap();
        source_handle.trigger();
    }
}
