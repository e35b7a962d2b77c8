// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for device construction, dispatch and callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use knx_devices::dpt::{Codec, StringCodec, ValueType};
use knx_devices::subscription::DeviceCallback;
use knx_devices::{
    Client, ClientConfig, ConfigError, Device, DeviceEvent, Error, GroupAddress, Notification,
    NotificationConfig, Payload, Scene, SceneConfig, Sensor, SensorConfig, Telegram,
};
use parking_lot::Mutex;

fn ga(address: &str) -> GroupAddress {
    address.parse().unwrap()
}

fn client() -> Client {
    Client::new(&ClientConfig::default()).0
}

// ============================================================================
// Identity
// ============================================================================

mod identity {
    use super::*;

    #[test]
    fn name_only_sets_unique_id() {
        let client = client();
        let device = Notification::new(
            &client,
            None,
            NotificationConfig::new(ga("1/2/3")).with_name("Hallway"),
        )
        .unwrap();
        assert_eq!(device.unique_id(), "Hallway");
        assert_eq!(device.name(), "Hallway");
    }

    #[test]
    fn unique_id_only_sets_name() {
        let client = client();
        let device = Scene::new(
            &client,
            Some("scene.evening".to_string()),
            SceneConfig::new(ga("1/0/1"), 3),
        )
        .unwrap();
        assert_eq!(device.name(), "scene.evening");
        assert_eq!(device.unique_id(), "scene.evening");
    }

    #[test]
    fn neither_fails() {
        let client = client();
        let err = Sensor::new(
            &client,
            None,
            SensorConfig::new(ga("6/2/1"), ValueType::Humidity),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingIdentity)));
        assert!(client.devices().is_empty());
    }

    #[test]
    fn identical_configuration_is_equal() {
        let client = client();
        let config = SensorConfig::new(ga("6/2/1"), ValueType::Humidity);
        let a = Sensor::new(&client, Some("s".to_string()), config.clone()).unwrap();
        let b = Sensor::new(&client, Some("s".to_string()), config.clone()).unwrap();
        let renamed = Sensor::new(&client, Some("s".to_string()), config.with_name("t")).unwrap();
        assert_eq!(*a, *b);
        assert_ne!(*a, *renamed);
    }
}

// ============================================================================
// Addressing
// ============================================================================

mod addressing {
    use super::*;

    #[test]
    fn has_group_address_covers_command_and_state() {
        let client = client();
        let display = Notification::new(
            &client,
            Some("display".to_string()),
            NotificationConfig::new(ga("1/2/3")).with_group_address_state(ga("1/2/4")),
        )
        .unwrap();
        let sensor = Sensor::new(
            &client,
            Some("sensor".to_string()),
            SensorConfig::new(ga("6/2/1"), ValueType::Temperature),
        )
        .unwrap();

        assert!(display.has_group_address(ga("1/2/3")));
        assert!(display.has_group_address(ga("1/2/4")));
        assert!(!display.has_group_address(ga("6/2/1")));
        assert!(sensor.has_group_address(ga("6/2/1")));
        assert!(!sensor.has_group_address(ga("1/2/3")));
    }

    #[test]
    fn registry_lookup_by_address_and_kind() {
        let client = client();
        Notification::new(
            &client,
            Some("display".to_string()),
            NotificationConfig::new(ga("1/2/3")),
        )
        .unwrap();
        Sensor::new(
            &client,
            Some("inside".to_string()),
            SensorConfig::new(ga("1/2/3"), ValueType::Percent),
        )
        .unwrap();

        assert_eq!(client.devices().devices_by_group_address(ga("1/2/3")).len(), 2);
        assert_eq!(client.devices().of_kind::<Sensor>().len(), 1);
        assert_eq!(client.devices().of_kind::<Scene>().len(), 0);
        assert!(client.devices().contains("display"));
    }
}

// ============================================================================
// Variants
// ============================================================================

mod variants {
    use super::*;

    #[tokio::test]
    async fn notification_truncates_to_fourteen_characters() {
        let (client, mut outgoing) = Client::new(&ClientConfig::default());
        let display = Notification::new(
            &client,
            Some("display".to_string()),
            NotificationConfig::new(ga("1/2/3")),
        )
        .unwrap();

        display.set("Washing machine finished").await.unwrap();

        let telegram = outgoing.recv().await.unwrap();
        let message = StringCodec.decode(telegram.payload().unwrap()).unwrap();
        assert_eq!(message, "Washing machin");
        assert_eq!(message.len(), Notification::MAX_MESSAGE_LENGTH);
    }

    #[tokio::test]
    async fn scene_action_matches_run() {
        let (client, mut outgoing) = Client::new(&ClientConfig::default());
        let scene =
            Scene::new(&client, Some("scene".to_string()), SceneConfig::new(ga("1/0/1"), 64))
                .unwrap();

        scene.run().await.unwrap();
        scene.do_action("run").await.unwrap();
        scene.do_action("spin").await.unwrap();

        let first = outgoing.recv().await.unwrap();
        let second = outgoing.recv().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.payload(), Some(&Payload::Array(vec![63])));
        assert!(outgoing.try_recv().is_err());
    }

    #[tokio::test]
    async fn sensor_response_matches_write() {
        let client = client();
        let config = SensorConfig::new(ga("6/2/1"), ValueType::Temperature);
        let by_write = Sensor::new(&client, Some("a".to_string()), config.clone()).unwrap();
        let by_response = Sensor::new(&client, Some("b".to_string()), config).unwrap();
        let payload = Payload::Array(vec![0x0C, 0x1A]);

        by_write
            .process(&Telegram::write(ga("6/2/1"), payload.clone()))
            .await
            .unwrap();
        by_response
            .process(&Telegram::response(ga("6/2/1"), payload))
            .await
            .unwrap();

        assert_eq!(by_write.resolve_state(), Some(21.0));
        assert_eq!(by_response.resolve_state(), Some(21.0));
    }

    #[test]
    fn from_config_for_every_variant() {
        let client = client();
        Notification::from_config(
            &client,
            None,
            &serde_json::json!({"name": "display", "group_address": "1/2/3"}),
        )
        .unwrap();
        Scene::from_config(
            &client,
            None,
            &serde_json::json!({"name": "scene", "group_address": "1/0/1", "scene_number": 2}),
        )
        .unwrap();
        Sensor::from_config(
            &client,
            None,
            &serde_json::json!({
                "name": "sensor",
                "group_address_state": "6/2/1",
                "value_type": "power",
                "sync_state": false,
            }),
        )
        .unwrap();

        let kinds: Vec<_> = client.devices().iter().map(|device| device.kind()).collect();
        assert_eq!(kinds, ["Notification", "Scene", "Sensor"]);
    }
}

// ============================================================================
// Callbacks
// ============================================================================

mod callbacks {
    use super::*;

    fn sensor(client: &Client) -> Arc<Sensor> {
        Sensor::new(
            client,
            Some("outside".to_string()),
            SensorConfig::new(ga("6/2/1"), ValueType::Temperature),
        )
        .unwrap()
    }

    async fn write_temperature(client: &Client, raw: [u8; 2]) {
        client
            .process_incoming(Telegram::write(ga("6/2/1"), Payload::Array(raw.to_vec())))
            .await;
    }

    #[tokio::test]
    async fn callbacks_run_once_in_registration_order() {
        let client = client();
        let sensor = sensor(&client);
        let calls = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second"] {
            let calls = Arc::clone(&calls);
            sensor.on_device_updated(move |_| {
                calls.lock().push(label);
                Ok(())
            });
        }

        write_temperature(&client, [0x0C, 0x1A]).await;
        assert_eq!(*calls.lock(), ["first", "second"]);

        // Same value again does not count as an update
        write_temperature(&client, [0x0C, 0x1A]).await;
        assert_eq!(calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn construction_callback_sees_first_update() {
        let client = client();
        let reached = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reached);
        let callback: DeviceCallback = Arc::new(move |device: &dyn Device| {
            assert_eq!(device.unique_id(), "outside");
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let sensor = Sensor::new_with_callback(
            &client,
            Some("outside".to_string()),
            SensorConfig::new(ga("6/2/1"), ValueType::Temperature),
            Some(callback),
        )
        .unwrap();
        // Own callback plus the registry's event forwarder
        assert_eq!(sensor.core().callbacks().callback_count(), 2);

        write_temperature(&client, [0x0C, 0x1A]).await;
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_callback_does_not_stop_others() {
        let client = client();
        let sensor = sensor(&client);
        let reached = Arc::new(AtomicUsize::new(0));

        sensor.on_device_updated(|_| Err("display offline".into()));
        let counter = Arc::clone(&reached);
        sensor.on_device_updated(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        write_temperature(&client, [0x0C, 0x1A]).await;
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_callback_is_not_called() {
        let client = client();
        let sensor = sensor(&client);
        let reached = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&reached);
        let id = sensor.on_device_updated(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(sensor.unregister_device_updated_cb(id));

        write_temperature(&client, [0x0C, 0x1A]).await;
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn registry_publishes_lifecycle_and_updates() {
        let client = client();
        let mut events = client.devices().subscribe();
        let sensor = sensor(&client);

        let added = events.recv().await.unwrap();
        assert_eq!(added, DeviceEvent::added("outside"));
        assert!(added.is_lifecycle());

        write_temperature(&client, [0x0C, 0x1A]).await;
        let updated = events.recv().await.unwrap();
        assert_eq!(updated.unique_id(), sensor.unique_id());
        assert!(updated.updated_at().is_some());
    }
}
