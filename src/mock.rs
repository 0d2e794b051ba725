//! Mock implementations for testing
//!
//! Provides a scripted SMC transport and a stub privileged writer so the
//! protocol, enumeration and service layers can be exercised without real
//! hardware or a running helper daemon.

use crate::error::SmcError;
use crate::helper::FanSpeedWriter;
use crate::smc::key::{four_cc, SmcKey};
use crate::smc::traits::{SmcConnector, SmcTransport};
use crate::smc::wire::{
    SmcKeyInfo, SmcParam, OP_READ_BYTES, OP_READ_KEY_INFO, OP_WRITE_BYTES, PAYLOAD_LEN,
};

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Kernel result the mock reports for a missing key or injected failure
const MOCK_FAILURE_CODE: i32 = 0x84;

/// One recorded transaction, for ordering and payload assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransaction {
    pub op: u8,
    pub key: String,
    /// Meaningful payload bytes (declared size) for write transactions
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone)]
struct MockRegister {
    data_type: u32,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct MockState {
    registers: Mutex<HashMap<u32, MockRegister>>,
    write_failures: Mutex<HashSet<u32>>,
    transactions: Mutex<Vec<MockTransaction>>,
    connect_count: Mutex<usize>,
    fail_connect: Mutex<bool>,
}

/// Scripted connector shared between the test and the channel under test
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<MockState>,
}

impl MockConnector {
    /// Create a connector with an empty register map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: script a register with its type tag and value bytes
    pub fn with_register(self, name: &str, tag: &[u8; 4], bytes: &[u8]) -> Self {
        self.set_register(name, tag, bytes);
        self
    }

    /// Builder: make every connect attempt fail (absent service)
    pub fn with_connect_failure(self) -> Self {
        *self.state.fail_connect.lock().unwrap() = true;
        self
    }

    /// Builder: make writes to `name` fail while reads keep working
    pub fn with_write_failure(self, name: &str) -> Self {
        let code = SmcKey::new(name).unwrap().code();
        self.state.write_failures.lock().unwrap().insert(code);
        self
    }

    /// Script or update a register after construction
    pub fn set_register(&self, name: &str, tag: &[u8; 4], bytes: &[u8]) {
        let code = SmcKey::new(name).unwrap().code();
        self.state.registers.lock().unwrap().insert(
            code,
            MockRegister {
                data_type: four_cc(tag),
                bytes: bytes.to_vec(),
            },
        );
    }

    /// Current value bytes of a register, if scripted or written
    pub fn register_bytes(&self, name: &str) -> Option<Vec<u8>> {
        let code = SmcKey::new(name).unwrap().code();
        self.state
            .registers
            .lock()
            .unwrap()
            .get(&code)
            .map(|r| r.bytes.clone())
    }

    /// How many times connect() succeeded or was attempted
    pub fn connect_count(&self) -> usize {
        *self.state.connect_count.lock().unwrap()
    }

    /// All transactions seen so far, in order
    pub fn transactions(&self) -> Vec<MockTransaction> {
        self.state.transactions.lock().unwrap().clone()
    }
}

impl SmcConnector for MockConnector {
    type Transport = MockTransport;

    fn connect(&self) -> Result<Self::Transport, SmcError> {
        *self.state.connect_count.lock().unwrap() += 1;
        if *self.state.fail_connect.lock().unwrap() {
            return Err(SmcError::ServiceUnavailable(
                "mock service absent".to_string(),
            ));
        }
        Ok(MockTransport {
            state: Arc::clone(&self.state),
        })
    }
}

/// Transport handing out scripted responses and recording every request
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    fn record(&self, input: &SmcParam) {
        let payload_len = (input.key_info.data_size as usize).min(PAYLOAD_LEN);
        self.state
            .transactions
            .lock()
            .unwrap()
            .push(MockTransaction {
                op: input.data8,
                key: SmcKey::from_code(input.key).name(),
                payload: if input.data8 == OP_WRITE_BYTES {
                    input.bytes[..payload_len].to_vec()
                } else {
                    Vec::new()
                },
            });
    }

    fn failure(&self, input: &SmcParam) -> SmcError {
        SmcError::TransactionFailed {
            key: SmcKey::from_code(input.key).name(),
            op: input.data8,
            code: MOCK_FAILURE_CODE,
        }
    }
}

impl SmcTransport for MockTransport {
    fn transact(&mut self, input: &SmcParam) -> Result<SmcParam, SmcError> {
        self.record(input);

        let mut registers = self.state.registers.lock().unwrap();
        let mut output = SmcParam::default();
        output.key = input.key;

        match input.data8 {
            OP_READ_KEY_INFO => {
                let register = registers.get(&input.key).ok_or_else(|| self.failure(input))?;
                output.key_info = SmcKeyInfo {
                    data_size: register.bytes.len() as u32,
                    data_type: register.data_type,
                    data_attributes: 0,
                };
            }
            OP_READ_BYTES => {
                let register = registers.get(&input.key).ok_or_else(|| self.failure(input))?;
                let len = register.bytes.len().min(PAYLOAD_LEN);
                output.bytes[..len].copy_from_slice(&register.bytes[..len]);
                output.key_info = input.key_info;
            }
            OP_WRITE_BYTES => {
                if self.state.write_failures.lock().unwrap().contains(&input.key) {
                    return Err(self.failure(input));
                }
                let register = registers.get_mut(&input.key).ok_or_else(|| self.failure(input))?;
                let len = (input.key_info.data_size as usize).min(PAYLOAD_LEN);
                register.bytes = input.bytes[..len].to_vec();
            }
            _ => return Err(self.failure(input)),
        }

        Ok(output)
    }
}

/// Stub for the privileged write path, recording requests
#[derive(Debug, Default)]
pub struct StubWriter {
    fail: bool,
    calls: Mutex<Vec<(usize, f64)>>,
}

impl StubWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: report failure for every write
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far as (fan index, rpm) pairs
    pub fn calls(&self) -> Vec<(usize, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl FanSpeedWriter for StubWriter {
    fn set_fan_speed(&self, index: usize, rpm: f64) -> bool {
        self.calls.lock().unwrap().push((index, rpm));
        !self.fail
    }
}
