//! Shared fakes for integration tests
//!
//! `RecordingEndpoint` logs every call into a shared list. When built with a
//! gate, each `produce` waits until the test calls `unblock_one`.

#![allow(dead_code)]

use async_trait::async_trait;
use keystream::relay::api::{
    Endpoint, EndpointFactory, EndpointResult, ProducerWrapper, RelayConfig,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout, Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Produce(char),
    Shutdown,
}

#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    gate: Option<Arc<Semaphore>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocking() -> Self {
        Self {
            events: Arc::default(),
            gate: Some(Arc::new(Semaphore::new(0))),
        }
    }

    pub fn unblock_one(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn produced(&self) -> Vec<char> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Produce(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    pub async fn wait_for_produced(&self, count: usize) {
        timeout(Duration::from_secs(2), async {
            while self.produced().len() < count {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("values should reach the endpoint");
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct RecordingEndpoint {
    recorder: Recorder,
    connected: bool,
}

#[async_trait]
impl Endpoint<char> for RecordingEndpoint {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> EndpointResult<()> {
        self.recorder.push(Event::Connect);
        self.connected = true;
        Ok(())
    }

    async fn produce(&mut self, value: char) -> EndpointResult<()> {
        if let Some(gate) = &self.recorder.gate {
            gate.acquire().await.expect("gate stays open").forget();
        }
        self.recorder.push(Event::Produce(value));
        Ok(())
    }

    async fn shutdown(&mut self) -> EndpointResult<()> {
        self.recorder.push(Event::Shutdown);
        self.connected = false;
        Ok(())
    }
}

impl EndpointFactory<char> for Recorder {
    fn get(&self, _identifier: &str) -> EndpointResult<Box<dyn Endpoint<char>>> {
        Ok(Box::new(RecordingEndpoint {
            recorder: self.clone(),
            connected: false,
        }))
    }
}

pub fn wrapper(capacity: usize, recorder: &Recorder) -> Arc<ProducerWrapper<char>> {
    Arc::new(
        ProducerWrapper::new(RelayConfig::new(capacity), recorder.clone())
            .expect("capacity is positive"),
    )
}

pub fn spawn_run(
    wrapper: &Arc<ProducerWrapper<char>>,
) -> tokio::task::JoinHandle<keystream::relay::api::RelayResult<()>> {
    let wrapper = Arc::clone(wrapper);
    tokio::spawn(async move { wrapper.run().await })
}
