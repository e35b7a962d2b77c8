// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device abstraction shared by all variants.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ConfigError, Result};
use crate::remote_value::ValueBinding;
use crate::subscription::{CallbackRegistry, CallbackResult, DeviceCallback, SubscriptionId};
use crate::types::{GroupAddress, Telegram, TelegramType};

/// Iterator over the value bindings of a device.
pub type RemoteValues<'a> = Box<dyn Iterator<Item = &'a dyn ValueBinding> + Send + 'a>;

/// Identity and subscribers common to every device.
pub struct DeviceCore {
    unique_id: String,
    name: String,
    callbacks: CallbackRegistry,
}

impl DeviceCore {
    /// Creates the identity of a device.
    ///
    /// A missing `name` defaults to `unique_id` and vice versa.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingIdentity` if both are `None`.
    pub fn new(
        unique_id: Option<String>,
        name: Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let (unique_id, name) = match (unique_id, name) {
            (Some(unique_id), Some(name)) => (unique_id, name),
            (Some(unique_id), None) => (unique_id.clone(), unique_id),
            (None, Some(name)) => (name.clone(), name),
            (None, None) => return Err(ConfigError::MissingIdentity),
        };

        Ok(Self {
            unique_id,
            name,
            callbacks: CallbackRegistry::new(),
        })
    }

    /// Returns the stable identity key.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Returns the human readable label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device-updated callbacks.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}

impl PartialEq for DeviceCore {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id == other.unique_id && self.name == other.name
    }
}

impl fmt::Debug for DeviceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCore")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

/// Conversions from a concrete device to its trait objects.
///
/// Implemented for every [`Device`]; there is no need to implement it by hand.
pub trait AsDevice {
    /// Returns `self` as a device trait object.
    fn as_device(&self) -> &dyn Device;

    /// Converts a shared device into `Any`, for downcasting to the variant.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Device + 'static> AsDevice for T {
    fn as_device(&self) -> &dyn Device {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A device on the bus.
///
/// Variants supply their identity through [`core`](Self::core) and their
/// value bindings through [`remote_values`](Self::remote_values); telegram
/// dispatch, state sync and update notification are provided on top of that.
/// Variants override the `process_group_*` hooks to react to telegrams and
/// [`do_action`](Self::do_action) to accept free-text commands.
#[async_trait]
pub trait Device: AsDevice + fmt::Debug + fmt::Display + Send + Sync {
    /// Returns the identity and subscribers of the device.
    fn core(&self) -> &DeviceCore;

    /// Returns the value bindings, always in the same order.
    fn remote_values(&self) -> RemoteValues<'_>;

    /// Returns the variant name.
    fn kind(&self) -> &'static str;

    /// Returns the stable identity key.
    fn unique_id(&self) -> &str {
        self.core().unique_id()
    }

    /// Returns the human readable label.
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Registers a callback invoked after every state change.
    fn register_device_updated_cb(&self, callback: DeviceCallback) -> SubscriptionId {
        self.core().callbacks().register(callback)
    }

    /// Registers a closure invoked after every state change.
    fn on_device_updated<F>(&self, callback: F) -> SubscriptionId
    where
        Self: Sized,
        F: Fn(&dyn Device) -> CallbackResult + Send + Sync + 'static,
    {
        self.core().callbacks().on_device_updated(callback)
    }

    /// Unregisters a callback.
    ///
    /// Returns `true` if the callback was registered.
    fn unregister_device_updated_cb(&self, id: SubscriptionId) -> bool {
        self.core().callbacks().unsubscribe(id)
    }

    /// Notifies every subscriber, in registration order, that the device
    /// changed.
    fn after_update(&self) {
        let failures = self.core().callbacks().dispatch(self.as_device());
        if failures > 0 {
            tracing::debug!(device = %self.name(), failures, "Device update dispatched with failures");
        }
    }

    /// Requests the state of every synced value binding.
    ///
    /// With `wait_for_result`, waits for each response in turn and notifies
    /// subscribers when a value changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a read cannot be queued or a response cannot be
    /// decoded. Bindings after the failing one are not read.
    async fn sync(&self, wait_for_result: bool) -> Result<()> {
        tracing::debug!(device = %self.name(), wait_for_result, "Syncing device state");
        for value in self.remote_values() {
            if !value.sync_state() {
                continue;
            }
            if value.read_state(wait_for_result).await?.is_changed() {
                self.after_update();
            }
        }
        Ok(())
    }

    /// Dispatches a telegram to the handler for its type.
    ///
    /// # Errors
    ///
    /// Returns the error of the handler.
    async fn process(&self, telegram: &Telegram) -> Result<()> {
        match telegram.telegram_type() {
            TelegramType::GroupWrite => self.process_group_write(telegram).await,
            TelegramType::GroupResponse => self.process_group_response(telegram).await,
            TelegramType::GroupRead => self.process_group_read(telegram).await,
        }
    }

    /// Handles a `GroupValueWrite`. Does nothing by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded.
    async fn process_group_write(&self, _telegram: &Telegram) -> Result<()> {
        Ok(())
    }

    /// Handles a `GroupValueResponse` the same way as a write by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded.
    async fn process_group_response(&self, telegram: &Telegram) -> Result<()> {
        self.process_group_write(telegram).await
    }

    /// Handles a `GroupValueRead`. Does nothing by default.
    ///
    /// # Errors
    ///
    /// Returns an error if answering the read fails.
    async fn process_group_read(&self, _telegram: &Telegram) -> Result<()> {
        Ok(())
    }

    /// Returns `true` if any value binding uses `group_address`.
    fn has_group_address(&self, group_address: GroupAddress) -> bool {
        self.remote_values()
            .any(|value| value.has_group_address(group_address))
    }

    /// Executes a free-text command.
    ///
    /// Devices without commands log the action and ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if a recognized command fails to execute.
    async fn do_action(&self, action: &str) -> Result<()> {
        tracing::info!(device = %self.name(), action, "Action not implemented for device");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::bus::{BusHandle, OutgoingTelegrams};
    use crate::config::ClientConfig;
    use crate::dpt::{SensorCodec, ValueType};
    use crate::remote_value::RemoteValue;
    use crate::types::Payload;

    /// Device with two bindings that records which hooks ran.
    #[derive(Debug)]
    struct Thermostat {
        core: DeviceCore,
        current: RemoteValue<SensorCodec>,
        target: RemoteValue<SensorCodec>,
        writes: AtomicU32,
        reads: AtomicU32,
    }

    impl Thermostat {
        fn new(bus: &BusHandle) -> Self {
            let codec = SensorCodec::new(ValueType::Temperature);
            Self {
                core: DeviceCore::new(Some("thermostat".to_string()), None).unwrap(),
                current: RemoteValue::new(bus.clone(), codec, "thermostat", "Current")
                    .with_group_address_state(Some(ga("1/0/1"))),
                target: RemoteValue::new(bus.clone(), codec, "thermostat", "Target")
                    .with_group_address(Some(ga("1/0/2")))
                    .with_group_address_state(Some(ga("1/0/3")))
                    .with_sync_state(false),
                writes: AtomicU32::new(0),
                reads: AtomicU32::new(0),
            }
        }
    }

    impl fmt::Display for Thermostat {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "<Thermostat name=\"{}\" />", self.name())
        }
    }

    #[async_trait]
    impl Device for Thermostat {
        fn core(&self) -> &DeviceCore {
            &self.core
        }

        fn remote_values(&self) -> RemoteValues<'_> {
            Box::new([&self.current as &dyn ValueBinding, &self.target].into_iter())
        }

        fn kind(&self) -> &'static str {
            "Thermostat"
        }

        async fn process_group_write(&self, telegram: &Telegram) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            for value in self.remote_values() {
                if value.process(telegram).await?.is_changed() {
                    self.after_update();
                }
            }
            Ok(())
        }

        async fn process_group_read(&self, _telegram: &Telegram) -> Result<()> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn ga(address: &str) -> GroupAddress {
        address.parse().unwrap()
    }

    fn bus() -> (BusHandle, OutgoingTelegrams) {
        BusHandle::new(&ClientConfig::default().with_read_timeout(Duration::from_millis(100)))
    }

    #[test]
    fn core_defaults_name_from_unique_id() {
        let core = DeviceCore::new(Some("id".to_string()), None).unwrap();
        assert_eq!(core.unique_id(), "id");
        assert_eq!(core.name(), "id");
    }

    #[test]
    fn core_defaults_unique_id_from_name() {
        let core = DeviceCore::new(None, Some("Kitchen".to_string())).unwrap();
        assert_eq!(core.unique_id(), "Kitchen");
        assert_eq!(core.name(), "Kitchen");
    }

    #[test]
    fn core_requires_identity() {
        assert_eq!(
            DeviceCore::new(None, None).unwrap_err(),
            ConfigError::MissingIdentity
        );
    }

    #[test]
    fn core_error_propagates_as_config_error() {
        fn build() -> Result<DeviceCore> {
            Ok(DeviceCore::new(None, None)?)
        }

        assert!(matches!(
            build(),
            Err(crate::error::Error::Config(ConfigError::MissingIdentity))
        ));
    }

    #[test]
    fn core_equality_ignores_callbacks() {
        let a = DeviceCore::new(Some("id".to_string()), Some("name".to_string())).unwrap();
        let b = DeviceCore::new(Some("id".to_string()), Some("name".to_string())).unwrap();
        b.callbacks().on_device_updated(|_| Ok(()));
        assert_eq!(a, b);

        let c = DeviceCore::new(Some("id".to_string()), Some("other".to_string())).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn has_group_address_covers_all_bindings() {
        let (bus, _rx) = bus();
        let device = Thermostat::new(&bus);

        assert!(device.has_group_address(ga("1/0/1")));
        assert!(device.has_group_address(ga("1/0/2")));
        assert!(device.has_group_address(ga("1/0/3")));
        assert!(!device.has_group_address(ga("1/0/4")));
    }

    #[tokio::test]
    async fn process_dispatches_by_telegram_type() {
        let (bus, _rx) = bus();
        let device = Thermostat::new(&bus);
        let payload = Payload::Array(vec![0x0C, 0x1A]);

        device
            .process(&Telegram::write(ga("1/0/1"), payload.clone()))
            .await
            .unwrap();
        device
            .process(&Telegram::response(ga("1/0/1"), payload))
            .await
            .unwrap();
        device.process(&Telegram::read(ga("1/0/1"))).await.unwrap();

        // Responses take the write path
        assert_eq!(device.writes.load(Ordering::SeqCst), 2);
        assert_eq!(device.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn after_update_passes_device_to_subscribers() {
        let (bus, _rx) = bus();
        let device = Thermostat::new(&bus);
        let seen = Arc::new(parking_lot::RwLock::new(Vec::new()));
        let seen_clone = seen.clone();

        device.on_device_updated(move |device| {
            seen_clone.write().push(device.to_string());
            Ok(())
        });
        device
            .process(&Telegram::write(ga("1/0/1"), Payload::Array(vec![0x0C, 0x1A])))
            .await
            .unwrap();

        assert_eq!(
            *seen.read(),
            vec!["<Thermostat name=\"thermostat\" />".to_string()]
        );
    }

    #[tokio::test]
    async fn unregistered_callback_is_not_called() {
        let (bus, _rx) = bus();
        let device = Thermostat::new(&bus);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let callback: DeviceCallback = Arc::new(move |_: &dyn Device| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let id = device.register_device_updated_cb(callback);
        assert!(device.unregister_device_updated_cb(id));

        device.after_update();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sync_reads_synced_bindings_in_order() {
        let (bus, mut rx) = bus();
        let device = Thermostat::new(&bus);

        device.sync(false).await.unwrap();

        assert_eq!(rx.recv().await, Some(Telegram::read(ga("1/0/1"))));
        // Target does not take part in sync
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn sync_with_result_notifies_on_change() {
        let (bus, mut rx) = bus();
        let device = Thermostat::new(&bus);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        device.on_device_updated(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let responder = bus.clone();
        tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            responder.publish_incoming(&Telegram::response(
                request.group_address(),
                Payload::Array(vec![0x0C, 0x1A]),
            ));
        });

        device.sync(true).await.unwrap();
        assert_eq!(device.current.value(), Some(21.0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_do_action_is_a_no_op() {
        let (bus, mut rx) = bus();
        let device = Thermostat::new(&bus);

        device.do_action("anything").await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn into_any_downcasts_to_variant() {
        let (bus, _rx) = bus();
        let device: Arc<dyn Device> = Arc::new(Thermostat::new(&bus));
        assert!(device.into_any().downcast::<Thermostat>().is_ok());
    }
}
