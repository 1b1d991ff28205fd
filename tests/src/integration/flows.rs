//! # Task Flow
//!
//! The stream client, the task router and the partial signer against the
//! in-process task source, without the dispatcher.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{attester_duty, keys, task_source};
    use shared_crypto::{BlsPublicKey, BlsSignature};
    use shared_types::{shutdown_channel, SlotScope, StreamTopic, TaskPayload};
    use std::time::Duration;
    use sv_02_task_stream::{TaskEvent, TaskStreamClient};
    use sv_03_partial_signer::domain::attestation_signing_root;
    use sv_03_partial_signer::{PartialSigner, SignerError};
    use sv_04_duty_dispatcher::{RouterConfig, TaskRouter};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_stream_yields_synthetic_tasks_for_first_key() {
        let keys = keys();
        let (handle, shutdown) = shutdown_channel();
        let source = task_source(Vec::new(), shutdown.clone());
        let client = TaskStreamClient::new(source.clone(), keys.clone());

        let mut receiver = client.next_task(shutdown).await.unwrap();
        for expected in 1..=2 {
            match receiver.recv().await {
                TaskEvent::Task(task) => {
                    assert_eq!(task.slot(), expected);
                    assert_eq!(task.public_key, keys.public_keys()[0]);
                    assert_eq!(task.topic, StreamTopic::SignAttestation);
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        handle.trigger();
        let closed = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .expect("stream must close on shutdown");
        assert_eq!(closed, TaskEvent::Closed);
        assert_eq!(source.stream_requests()[0].public_keys, keys.public_keys());
    }

    #[tokio::test(start_paused = true)]
    async fn test_routed_task_is_partially_signed_and_submitted() {
        let keys = keys();
        let own = keys.public_keys()[0];
        let (handle, shutdown) = shutdown_channel();
        let source = task_source(vec![attester_duty(own, 0, vec![4, 0, 7], 2)], shutdown.clone());

        let client = TaskStreamClient::new(source.clone(), keys.clone());
        let (router, router_handle) = TaskRouter::new(client, RouterConfig::default());
        let routing = tokio::spawn(router.run(shutdown.clone()));
        let signer = PartialSigner::new(source.clone(), keys.clone(), Default::default());

        let task = router_handle
            .claim(own, StreamTopic::SignAttestation, 2)
            .await
            .unwrap();
        let TaskPayload::Attestation(data) = task.payload else {
            panic!("attestation task expected");
        };
        let scope = SlotScope::new(2, Instant::now() + Duration::from_secs(12), shutdown);
        signer
            .sign_partial_attestation(&data, &own, &scope)
            .await
            .unwrap();

        let submitted = source.attestations();
        assert_eq!(submitted.len(), 1);
        // Committee of three, own position 1: bits 010 plus the length bit.
        assert_eq!(submitted[0].aggregation_bits, vec![0b1010]);
        assert_eq!(submitted[0].data.slot, 2);

        let root = attestation_signing_root(&data, &[0u8; 32]).unwrap();
        let signature: [u8; 96] = submitted[0].signature.as_bytes().try_into().unwrap();
        let public = BlsPublicKey::from_bytes(own.as_bytes()).unwrap();
        assert!(public.verify(&root, &BlsSignature::from_bytes(&signature).unwrap()));

        handle.trigger();
        routing.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_committee_position_submits_nothing() {
        let keys = keys();
        let own = keys.public_keys()[0];
        let (_handle, shutdown) = shutdown_channel();
        let source = task_source(vec![attester_duty(own, 0, vec![5, 6], 1)], shutdown.clone());
        let signer = PartialSigner::new(source.clone(), keys, Default::default());

        let data = shared_types::AttestationData {
            slot: 1,
            ..Default::default()
        };
        let scope = SlotScope::new(1, Instant::now() + Duration::from_secs(12), shutdown);
        let err = signer
            .sign_partial_attestation(&data, &own, &scope)
            .await
            .unwrap_err();

        assert!(matches!(err, SignerError::PositionNotFound { validator_index: 0, .. }));
        assert!(source.attestations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_router_stops_when_source_shuts_down() {
        let keys = keys();
        let (_handle, shutdown) = shutdown_channel();
        let (source_handle, source_shutdown) = shutdown_channel();
        let source = task_source(Vec::new(), source_shutdown);

        let client = TaskStreamClient::new(source, keys.clone());
        let (router, router_handle) = TaskRouter::new(client, RouterConfig::default());
        let routing = tokio::spawn(router.run(shutdown));

        tokio::time::sleep(Duration::from_secs(5)).await;
        source_handle.trigger();

        // Reconnection is off: the closed stream ends the router and every
        // parked claim fails.
        routing.await.unwrap().unwrap();
        let claim = router_handle
            .claim(keys.public_keys()[0], StreamTopic::SignAttestation, 1)
            .await;
        assert!(claim.is_err());
    }
}
