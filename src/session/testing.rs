use std::sync::Mutex;

use crate::session::registry::ClientSink;

/// Records everything sent to it, in order.
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Drain the recorded messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut self.messages.lock().unwrap())
    }
}

impl ClientSink for RecordingSink {
    fn send(&self, text: String) {
        self.messages.lock().unwrap().push(text);
    }
}
