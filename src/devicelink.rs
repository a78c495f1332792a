use std::future::Future;
use std::time::{Duration, Instant};

use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::runtime::{Builder, Runtime};
use tokio::time::error::Elapsed;
use uuid::Uuid;

use crate::error::Error;

pub trait DeviceLink {
    fn write(&mut self, frame: &[u8]) -> Result<(), Error>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkOptions {
    pub device_name: String,
    pub characteristic: Uuid,
    pub scan_timeout: Duration,
    pub write_timeout: Duration,
}

/// A connected BLE light controller.
///
/// btleplug is async only, so the link owns a small runtime and blocks on it
/// for every call. At most one write is in flight at any time.
pub struct BleLink {
    runtime: Runtime,
    peripheral: Peripheral,
    characteristic: Characteristic,
    write_timeout: Duration,
}

impl BleLink {
    pub fn connect(options: &LinkOptions) -> Result<BleLink, Error> {
        let runtime = runtime()?;

        let (peripheral, characteristic) = runtime.block_on(async {
            let adapter = BleLink::adapter().await?;
            let peripheral =
                BleLink::discover(&adapter, &options.device_name, options.scan_timeout).await?;
            let characteristic = BleLink::open(&peripheral, options.characteristic).await?;
            Ok::<_, Error>((peripheral, characteristic))
        })?;

        Ok(BleLink {
            runtime,
            peripheral,
            characteristic,
            write_timeout: options.write_timeout,
        })
    }

    async fn adapter() -> Result<Adapter, Error> {
        let manager = Manager::new()
            .await
            .map_err(|err| Error::AdapterUnavailable(err.to_string()))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|err| Error::AdapterUnavailable(err.to_string()))?;

        adapters
            .into_iter()
            .next()
            .ok_or_else(|| Error::AdapterUnavailable("no Bluetooth adapter found".to_string()))
    }

    /// Scans until a peripheral advertising `name` shows up or `timeout` passes.
    async fn discover(adapter: &Adapter, name: &str, timeout: Duration) -> Result<Peripheral, Error> {
        if let Err(err) = adapter.start_scan(ScanFilter::default()).await {
            return Err(Error::AdapterUnavailable(format!("Failed to start scan: {err}")));
        }
        log::info!("Scanning for {name}");

        let deadline = Instant::now() + timeout;
        let found = loop {
            if let Some(peripheral) = BleLink::find_by_name(adapter, name).await {
                break Some(peripheral);
            }
            if Instant::now() >= deadline {
                break None;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        };

        if let Err(err) = adapter.stop_scan().await {
            log::warn!("Failed to stop scan: {err}");
        }

        found.ok_or_else(|| {
            Error::DeviceNotFound(format!("no device named {name} within {timeout:?}"))
        })
    }

    async fn find_by_name(adapter: &Adapter, name: &str) -> Option<Peripheral> {
        let peripherals = match adapter.peripherals().await {
            Ok(peripherals) => peripherals,
            Err(err) => {
                log::warn!("Failed to list peripherals: {err}");
                return None;
            }
        };

        for peripheral in peripherals {
            let local_name = match peripheral.properties().await {
                Ok(Some(properties)) => properties.local_name,
                _ => None,
            };
            if local_name.as_deref() == Some(name) {
                return Some(peripheral);
            }
        }
        None
    }

    async fn open(peripheral: &Peripheral, uuid: Uuid) -> Result<Characteristic, Error> {
        let address = peripheral.address();
        if let Err(err) = peripheral.connect().await {
            return Err(Error::DeviceNotFound(format!(
                "Failed to connect to {address}: {err}"
            )));
        }
        log::info!("Connected to {address}");

        if let Err(err) = peripheral.discover_services().await {
            return Err(Error::DeviceNotFound(format!(
                "Failed to discover services on {address}: {err}"
            )));
        }

        for service in peripheral.services() {
            log::debug!("Service: {}", service.uuid);
        }

        peripheral
            .characteristics()
            .into_iter()
            .find(|characteristic| characteristic.uuid == uuid)
            .ok_or_else(|| Error::DeviceNotFound(format!("{address} has no characteristic {uuid}")))
    }

    /// Tells a broken link apart from a single failed write.
    fn classify(&self, reason: String) -> Error {
        match run_bounded(&self.runtime, self.write_timeout, self.peripheral.is_connected()) {
            Ok(Ok(true)) => Error::SendFailure(reason),
            Ok(Ok(false)) | Ok(Err(_)) => Error::ConnectionLost(reason),
            Err(_) => Error::SendFailure(format!("{reason}, connection state unknown")),
        }
    }

    pub fn disconnect(&self) -> Result<(), Error> {
        match run_bounded(&self.runtime, self.write_timeout, self.peripheral.disconnect()) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(Error::SendFailure(format!("Failed to disconnect: {err}"))),
            Err(_) => Err(Error::SendFailure(format!(
                "Disconnect timed out after {:?}",
                self.write_timeout
            ))),
        }
    }
}

fn runtime() -> Result<Runtime, Error> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("ble")
        .enable_all()
        .build()
        .map_err(|err| Error::AdapterUnavailable(format!("no async runtime: {err}")))
}

/// Blocks the calling thread on `future` for at most `limit`.
///
/// The timer is created inside the runtime, so this works from threads that
/// are not runtime workers.
fn run_bounded<F: Future>(runtime: &Runtime, limit: Duration, future: F) -> Result<F::Output, Elapsed> {
    runtime.block_on(async { tokio::time::timeout(limit, future).await })
}

impl DeviceLink for BleLink {
    fn write(&mut self, frame: &[u8]) -> Result<(), Error> {
        let result = run_bounded(
            &self.runtime,
            self.write_timeout,
            self.peripheral
                .write(&self.characteristic, frame, WriteType::WithoutResponse),
        );

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(btleplug::Error::NotConnected)) => {
                Err(Error::ConnectionLost(self.peripheral.address().to_string()))
            }
            Ok(Err(err)) => Err(self.classify(err.to_string())),
            Err(_) => Err(self.classify(format!("timed out after {:?}", self.write_timeout))),
        }
    }
}

impl Drop for BleLink {
    fn drop(&mut self) {
        if let Err(err) = self.disconnect() {
            // Nothing left to do about it at this point.
            log::error!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn on_plain_thread<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
        thread::Builder::new()
            .name("Ambilight".to_string())
            .spawn(f)
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn bounded_call_returns_output() {
        let res = on_plain_thread(|| {
            let runtime = runtime().unwrap();
            run_bounded(&runtime, Duration::from_millis(500), async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                7
            })
        });
        assert_eq!(res.ok(), Some(7));
    }

    #[test]
    fn bounded_call_gives_up() {
        let start = Instant::now();
        let res = on_plain_thread(|| {
            let runtime = runtime().unwrap();
            run_bounded(&runtime, Duration::from_millis(20), std::future::pending::<()>())
        });
        assert!(res.is_err());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn runtime_is_reusable_after_timeout() {
        let (first, second) = on_plain_thread(|| {
            let runtime = runtime().unwrap();
            let first = run_bounded(&runtime, Duration::from_millis(10), std::future::pending::<u8>());
            let second = run_bounded(&runtime, Duration::from_millis(500), async { 3u8 });
            (first.is_err(), second.ok())
        });
        assert!(first);
        assert_eq!(second, Some(3));
    }
}
