//! Scripted fakes for driving a full boot on the host
//!
//! Everything here is built around `Rc` handles so a test can keep a view
//! into a collaborator after handing ownership of it to the controller:
//! the clock is a shared `Cell`, the stores are shared `RefCell`s around the
//! in-crate memory stores, and the transport/link record what passed through
//! them into shared logs.
//!
//! [`SimDelay`] advances the shared clock instead of sleeping, so a
//! ten-minute provisioning window runs in microseconds of real time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hydroping_core::errors::{AssociationError, LinkError, StoreError, TransportError};
use hydroping_core::provision::{NetworkControl, ProvisioningLink, ProvisioningService};
use hydroping_core::sampler::MoistureProbe;
use hydroping_core::store::{ConfigStore, MemoryConfigStore, MemoryStateStore, StateStore};
use hydroping_core::time::{Delay, TimeSource, Timestamp};
use hydroping_core::uplink::{TelemetryResponse, TelemetryTransport};
use hydroping_core::{Configuration, PersistedState, ServiceResponse};

/// Clock readable through any number of cloned handles
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<Timestamp>>);

impl SimClock {
    pub fn new(start_ms: Timestamp) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn now_ms(&self) -> Timestamp {
        self.0.get()
    }
}

impl TimeSource for SimClock {
    fn now(&self) -> Timestamp {
        self.0.get()
    }
}

/// Delay that advances the shared clock instead of sleeping
#[derive(Clone)]
pub struct SimDelay(pub SimClock);

impl Delay for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        (self.0).0.set((self.0).0.get() + Timestamp::from(ms));
    }
}

/// Memory state store the test retains a handle to
#[derive(Clone, Default)]
pub struct SharedStateStore(Rc<RefCell<MemoryStateStore>>);

impl SharedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self(Rc::new(RefCell::new(MemoryStateStore::with_state(state))))
    }

    pub fn committed(&self) -> PersistedState {
        self.0.borrow_mut().load()
    }

    pub fn commit_count(&self) -> u32 {
        self.0.borrow().commit_count()
    }
}

impl StateStore for SharedStateStore {
    fn load(&mut self) -> PersistedState {
        self.0.borrow_mut().load()
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StoreError> {
        self.0.borrow_mut().save(state)
    }
}

/// Memory config store the test retains a handle to
#[derive(Clone, Default)]
pub struct SharedConfigStore(Rc<RefCell<MemoryConfigStore>>);

impl SharedConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Configuration) -> Self {
        Self(Rc::new(RefCell::new(MemoryConfigStore::with_config(config))))
    }

    pub fn committed(&self) -> Option<Configuration> {
        self.0.borrow_mut().load()
    }
}

impl ConfigStore for SharedConfigStore {
    fn load(&mut self) -> Option<Configuration> {
        self.0.borrow_mut().load()
    }

    fn save(&mut self, config: &Configuration) -> Result<(), StoreError> {
        self.0.borrow_mut().save(config)
    }

    fn update_token(&mut self, token: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().update_token(token)
    }
}

/// Probe returning a fixed raw level, counting reads through a shared cell
pub struct CountingProbe {
    reading: u32,
    reads: Rc<Cell<u32>>,
}

impl CountingProbe {
    pub fn new(reading: u32) -> (Self, Rc<Cell<u32>>) {
        let reads = Rc::new(Cell::new(0));
        (
            Self {
                reading,
                reads: Rc::clone(&reads),
            },
            reads,
        )
    }
}

impl MoistureProbe for CountingProbe {
    fn read_raw(&mut self) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.reading
    }
}

/// Network that accepts or refuses every association, counting attempts
pub struct ScriptedNetwork {
    accept: bool,
    attempts: Rc<Cell<u32>>,
}

impl ScriptedNetwork {
    pub fn new(accept: bool) -> (Self, Rc<Cell<u32>>) {
        let attempts = Rc::new(Cell::new(0));
        (
            Self {
                accept,
                attempts: Rc::clone(&attempts),
            },
            attempts,
        )
    }
}

impl NetworkControl for ScriptedNetwork {
    fn associate(&mut self, _ssid: &str, _password: &str) -> Result<(), AssociationError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.accept {
            Ok(())
        } else {
            Err(AssociationError::Timeout)
        }
    }
}

/// Transport replying with one canned response, logging every post
pub struct RecordingTransport {
    status: u16,
    body: &'static str,
    posts: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: &'static str) -> (Self, Rc<RefCell<Vec<(String, Vec<u8>)>>>) {
        let posts = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                status,
                body,
                posts: Rc::clone(&posts),
            },
            posts,
        )
    }
}

impl TelemetryTransport for RecordingTransport {
    fn post(&mut self, bearer_token: &str, payload: &[u8]) -> Result<TelemetryResponse, TransportError> {
        self.posts
            .borrow_mut()
            .push((bearer_token.to_string(), payload.to_vec()));
        Ok(TelemetryResponse {
            status: self.status,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

/// A request the scripted link delivers once its due time passes
pub enum Request {
    Info,
    Connect(&'static str),
}

#[derive(Clone, Default)]
pub struct LinkLog {
    pub responses: Rc<RefCell<Vec<ServiceResponse>>>,
    pub opened: Rc<Cell<bool>>,
    pub closed: Rc<Cell<bool>>,
}

/// Link replaying a timed request script into the service
///
/// `pump` delivers, in order, every scripted request whose due time has
/// passed, and records the handler responses for the test to inspect.
pub struct ScriptedLink {
    script: Vec<(Timestamp, Request)>,
    next: usize,
    log: LinkLog,
}

impl ScriptedLink {
    pub fn new(script: Vec<(Timestamp, Request)>) -> (Self, LinkLog) {
        let log = LinkLog::default();
        (
            Self {
                script,
                next: 0,
                log: log.clone(),
            },
            log,
        )
    }

    /// Link with no traffic at all, for timeout tests
    pub fn idle() -> (Self, LinkLog) {
        Self::new(Vec::new())
    }
}

impl ProvisioningLink for ScriptedLink {
    fn open(&mut self) -> Result<(), LinkError> {
        self.log.opened.set(true);
        Ok(())
    }

    fn close(&mut self) {
        self.log.closed.set(true);
    }

    fn pump<C: ConfigStore, N: NetworkControl>(
        &mut self,
        service: &mut ProvisioningService<'_, C, N>,
        now: Timestamp,
    ) {
        while let Some((due, request)) = self.script.get(self.next) {
            if *due > now {
                break;
            }

            let response = match request {
                Request::Info => service.handle_info(),
                Request::Connect(body) => service.handle_connect(body.as_bytes(), now),
            };
            self.log.responses.borrow_mut().push(response);
            self.next += 1;
        }
    }
}

/// The credential group used by the happy-path tests
pub fn test_config() -> Configuration {
    Configuration::new("home", "pw", "u1", "t1").unwrap()
}
