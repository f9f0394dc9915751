//! Transient, dismissible operator messages.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Bounded log of messages to surface and then drop. Nothing here is
/// fatal; every failure degrades to "show message, keep previous state."
#[derive(Debug)]
pub struct MessageLog {
    messages: Vec<Message>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            capacity,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Severity::Info, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Severity::Error, text.into());
    }

    fn push(&mut self, severity: Severity, text: String) {
        if self.capacity > 0 && self.messages.len() >= self.capacity {
            self.messages.remove(0);
        }
        self.messages.push(Message { severity, text });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(8)
    }
}
