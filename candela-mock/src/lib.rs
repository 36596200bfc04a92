//! candela-mock
//!
//! A scriptable [`CandleConnector`] for tests and demos. Behavior is chosen per
//! symbol (falling back to a default), can be changed at runtime through a
//! [`MockController`], and every call is recorded.
#![warn(missing_docs)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use candela_core::{CandelaError, Candle, CandleConnector, FetchRequest};

/// Instruction for how a fetch should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return these candles as-is.
    Return(Vec<Candle>),
    /// Fail with the provided error.
    Fail(CandelaError),
    /// Never resolve.
    Hang,
}

impl MockBehavior {
    /// Shorthand for "provider has nothing for this symbol".
    #[must_use]
    pub const fn empty() -> Self {
        Self::Return(Vec::new())
    }
}

#[derive(Debug)]
struct State {
    rules: HashMap<String, MockBehavior>,
    fallback: MockBehavior,
    requests: Vec<FetchRequest>,
}

/// Scripted connector.
#[derive(Debug)]
pub struct MockConnector {
    name: &'static str,
    delay: Duration,
    calls: AtomicUsize,
    state: Arc<Mutex<State>>,
}

/// Handle used by tests to drive a [`MockConnector`] from the outside.
#[derive(Debug, Clone)]
pub struct MockController {
    state: Arc<Mutex<State>>,
}

impl MockController {
    /// Set the behavior for one symbol.
    pub async fn set_behavior(&self, symbol: impl Into<String>, behavior: MockBehavior) {
        self.state.lock().await.rules.insert(symbol.into(), behavior);
    }

    /// Set the behavior for symbols without their own rule.
    pub async fn set_default(&self, behavior: MockBehavior) {
        self.state.lock().await.fallback = behavior;
    }

    /// Every request seen so far, in arrival order.
    pub async fn requests(&self) -> Vec<FetchRequest> {
        self.state.lock().await.requests.clone()
    }
}

impl MockConnector {
    /// Start scripting a connector reported as `name`.
    #[must_use]
    pub fn builder(name: &'static str) -> MockConnectorBuilder {
        MockConnectorBuilder {
            name,
            delay: Duration::ZERO,
            rules: HashMap::new(),
            fallback: MockBehavior::empty(),
        }
    }

    /// Connector that answers every symbol with an empty series, plus its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, MockController) {
        Self::builder(name).build_with_controller()
    }

    /// Number of `fetch` calls received, including ones still running.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Builder for [`MockConnector`].
#[derive(Debug)]
pub struct MockConnectorBuilder {
    name: &'static str,
    delay: Duration,
    rules: HashMap<String, MockBehavior>,
    fallback: MockBehavior,
}

impl MockConnectorBuilder {
    /// Sleep this long before answering.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer every symbol with `candles`.
    #[must_use]
    pub fn returns(mut self, candles: Vec<Candle>) -> Self {
        self.fallback = MockBehavior::Return(candles);
        self
    }

    /// Fail every symbol with `err`.
    #[must_use]
    pub fn fails(mut self, err: CandelaError) -> Self {
        self.fallback = MockBehavior::Fail(err);
        self
    }

    /// Never answer.
    #[must_use]
    pub fn hangs(mut self) -> Self {
        self.fallback = MockBehavior::Hang;
        self
    }

    /// Per-symbol override.
    #[must_use]
    pub fn rule(mut self, symbol: impl Into<String>, behavior: MockBehavior) -> Self {
        self.rules.insert(symbol.into(), behavior);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Arc<MockConnector> {
        self.build_with_controller().0
    }

    /// Finish building and keep a controller for runtime changes.
    #[must_use]
    pub fn build_with_controller(self) -> (Arc<MockConnector>, MockController) {
        let state = Arc::new(Mutex::new(State {
            rules: self.rules,
            fallback: self.fallback,
            requests: Vec::new(),
        }));
        let connector = Arc::new(MockConnector {
            name: self.name,
            delay: self.delay,
            calls: AtomicUsize::new(0),
            state: Arc::clone(&state),
        });
        (connector, MockController { state })
    }
}

#[async_trait]
impl CandleConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<Arc<[Candle]>, CandelaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard
                .rules
                .get(&req.symbol)
                .unwrap_or(&guard.fallback)
                .clone()
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match behavior {
            MockBehavior::Return(candles) => Ok(Arc::from(candles)),
            MockBehavior::Fail(err) => Err(err),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
