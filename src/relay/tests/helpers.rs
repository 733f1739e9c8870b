//! Shared fakes for relay tests
//!
//! `Script` records every call the relay makes on the endpoint and lets a test
//! hold `produce` until it releases it, mimicking a slow downstream resource.

use crate::relay::api::{
    DeliveryFailure, Endpoint, EndpointError, EndpointFactory, EndpointResult, FailureSink,
    ProducerWrapper, RelayConfig,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout, Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsConnected(bool),
    Connect,
    Produce(char),
    Shutdown,
}

struct ScriptState {
    calls: Mutex<Vec<Call>>,
    connected: AtomicBool,
    gated: AtomicBool,
    gate: Semaphore,
    reject_values: Mutex<HashSet<char>>,
    failing_connects: AtomicUsize,
    disconnect_after_produce: AtomicBool,
    factory_calls: AtomicUsize,
    factory_fails: AtomicBool,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            reject_values: Mutex::new(HashSet::new()),
            failing_connects: AtomicUsize::new(0),
            disconnect_after_produce: AtomicBool::new(false),
            factory_calls: AtomicUsize::new(0),
            factory_fails: AtomicBool::new(false),
        }
    }
}

#[derive(Clone, Default)]
pub struct Script {
    inner: Arc<ScriptState>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every produce wait for an explicit `release`
    pub fn gated() -> Self {
        let script = Self::new();
        script.inner.gated.store(true, Ordering::SeqCst);
        script
    }

    pub fn factory(&self) -> ScriptedFactory {
        ScriptedFactory {
            script: self.clone(),
        }
    }

    /// Allow `count` more gated produce calls to complete
    pub fn release(&self, count: usize) {
        self.inner.gate.add_permits(count);
    }

    pub fn reject(&self, value: char) {
        self.inner.reject_values.lock().unwrap().insert(value);
    }

    pub fn fail_next_connects(&self, count: usize) {
        self.inner.failing_connects.store(count, Ordering::SeqCst);
    }

    pub fn disconnect_after_each_produce(&self) {
        self.inner
            .disconnect_after_produce
            .store(true, Ordering::SeqCst);
    }

    pub fn fail_factory(&self) {
        self.inner.factory_fails.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn produced(&self) -> Vec<char> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Produce(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    pub fn connects(&self) -> usize {
        self.count(&Call::Connect)
    }

    pub fn shutdowns(&self) -> usize {
        self.count(&Call::Shutdown)
    }

    pub fn factory_calls(&self) -> usize {
        self.inner.factory_calls.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` values reached the endpoint
    pub async fn wait_for_produced(&self, count: usize) -> Vec<char> {
        timeout(Duration::from_secs(2), async {
            while self.produced().len() < count {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {} produced values, got {:?}",
                count,
                self.produced()
            )
        });
        self.produced()
    }

    fn record(&self, call: Call) {
        self.inner.calls.lock().unwrap().push(call);
    }
}

pub struct ScriptedEndpoint {
    script: Script,
}

#[async_trait]
impl Endpoint<char> for ScriptedEndpoint {
    fn is_connected(&self) -> bool {
        let connected = self.script.inner.connected.load(Ordering::SeqCst);
        self.script.record(Call::IsConnected(connected));
        connected
    }

    async fn connect(&mut self) -> EndpointResult<()> {
        self.script.record(Call::Connect);
        let failing = &self.script.inner.failing_connects;
        if failing
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(EndpointError::Rejected {
                reason: "connection refused".to_string(),
            });
        }
        self.script.inner.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn produce(&mut self, value: char) -> EndpointResult<()> {
        if self.script.inner.gated.load(Ordering::SeqCst) {
            self.script
                .inner
                .gate
                .acquire()
                .await
                .expect("gate is never closed")
                .forget();
        }
        if self.script.inner.reject_values.lock().unwrap().contains(&value) {
            return Err(EndpointError::Rejected {
                reason: format!("value {:?} refused", value),
            });
        }
        self.script.record(Call::Produce(value));
        if self.script.inner.disconnect_after_produce.load(Ordering::SeqCst) {
            self.script.inner.connected.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn shutdown(&mut self) -> EndpointResult<()> {
        self.script.record(Call::Shutdown);
        self.script.inner.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

pub struct ScriptedFactory {
    script: Script,
}

impl EndpointFactory<char> for ScriptedFactory {
    fn get(&self, _identifier: &str) -> EndpointResult<Box<dyn Endpoint<char>>> {
        self.script.inner.factory_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.inner.factory_fails.load(Ordering::SeqCst) {
            return Err(EndpointError::Rejected {
                reason: "no endpoint available".to_string(),
            });
        }
        Ok(Box::new(ScriptedEndpoint {
            script: self.script.clone(),
        }))
    }
}

/// Sink that keeps every reported failure for inspection
#[derive(Default)]
pub struct CapturingSink {
    failures: Mutex<Vec<(u64, String)>>,
}

impl CapturingSink {
    pub fn failures(&self) -> Vec<(u64, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl FailureSink for CapturingSink {
    fn report(&self, failure: DeliveryFailure) {
        self.failures
            .lock()
            .unwrap()
            .push((failure.sequence, failure.error.to_string()));
    }
}

/// Wrapper over a scripted endpoint with a capturing sink
pub fn wrapper(config: RelayConfig, script: &Script) -> (Arc<ProducerWrapper<char>>, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::default());
    let wrapper = ProducerWrapper::new(config, script.factory())
        .expect("valid config")
        .with_failure_sink(sink.clone());
    (Arc::new(wrapper), sink)
}

/// Spawn the delivery loop on the test runtime
pub fn spawn_run(
    wrapper: &Arc<ProducerWrapper<char>>,
) -> tokio::task::JoinHandle<crate::relay::api::RelayResult<()>> {
    let wrapper = Arc::clone(wrapper);
    tokio::spawn(async move { wrapper.run().await })
}

/// Wait for a spawned task, failing the test if it hangs
pub async fn join<R>(handle: tokio::task::JoinHandle<R>) -> R {
    timeout(Duration::from_secs(2), handle)
        .await
        .expect("task should finish")
        .expect("task should not panic")
}
