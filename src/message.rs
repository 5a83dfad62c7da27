//! In-memory message envelope used to feed test inputs into the
//! messaging framework under test; never sent to the repository itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A single message: headers plus an optional payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    headers: HashMap<String, Value>,
    body: Option<Value>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn set_header(&mut self, name: &str, value: Value) {
        self.headers.insert(name.to_string(), value);
    }

    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }
}

/// A message exchange: the unit of work handed to the framework under
/// test, carrying the inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    exchange_id: String,
    in_message: Message,
}

impl Exchange {
    /// Create a blank exchange with an empty inbound message.
    pub fn new() -> Self {
        Self {
            exchange_id: Uuid::new_v4().to_string(),
            in_message: Message::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.exchange_id
    }

    pub fn in_message(&self) -> &Message {
        &self.in_message
    }

    pub fn in_message_mut(&mut self) -> &mut Message {
        &mut self.in_message
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
