//! In-memory mailbox.
//!
//! A [`FakeMailbox`] is a cloneable handle to shared state, so a test keeps
//! one handle for assertions while the connector and its sessions drive
//! another. Searches honor the sender, flags and date like a server would.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{MessageId, SearchQuery, SeenFilter};
use crate::error::{Error, Result};
use crate::port::{MailConnector, MailSession};

#[derive(Debug, Clone)]
struct StoredMessage {
    id: MessageId,
    from: String,
    raw: Vec<u8>,
    seen: bool,
    delivered: bool,
    sent_on: NaiveDate,
}

#[derive(Default)]
struct MailboxState {
    messages: Vec<StoredMessage>,
    next_uid: u32,
    flagged: Vec<MessageId>,
    fetched: Vec<MessageId>,
    failing_fetches: HashSet<MessageId>,
    failing_flags: HashSet<MessageId>,
    probe_failures: u32,
    connect_results: VecDeque<Result<()>>,
    connects: u32,
    closes: u32,
}

/// Shared handle to an in-memory mailbox.
#[derive(Clone, Default)]
pub struct FakeMailbox {
    inner: Arc<Mutex<MailboxState>>,
}

impl FakeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MailboxState> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn store(
        &self,
        from: &str,
        raw: Vec<u8>,
        sent_on: NaiveDate,
        seen: bool,
        delivered: bool,
    ) -> MessageId {
        let mut state = self.lock();
        state.next_uid += 1;
        let id = MessageId::new(state.next_uid);
        state.messages.push(StoredMessage {
            id,
            from: from.to_string(),
            raw,
            seen,
            delivered,
            sent_on,
        });
        id
    }

    /// Add an unread message. Ids increase with each call.
    pub fn deliver(&self, from: &str, raw: Vec<u8>, sent_on: NaiveDate) -> MessageId {
        self.store(from, raw, sent_on, false, false)
    }

    /// Add a message that was already read.
    pub fn deliver_seen(&self, from: &str, raw: Vec<u8>, sent_on: NaiveDate) -> MessageId {
        self.store(from, raw, sent_on, true, false)
    }

    /// Add a message an earlier session already handed to the bot.
    pub fn deliver_relayed(&self, from: &str, raw: Vec<u8>, sent_on: NaiveDate) -> MessageId {
        self.store(from, raw, sent_on, true, true)
    }

    pub fn is_seen(&self, id: MessageId) -> bool {
        self.lock()
            .messages
            .iter()
            .any(|m| m.id == id && m.seen)
    }

    pub fn is_delivered(&self, id: MessageId) -> bool {
        self.lock()
            .messages
            .iter()
            .any(|m| m.id == id && m.delivered)
    }

    /// Ids of all unread messages, oldest first.
    pub fn unseen(&self) -> Vec<MessageId> {
        self.lock()
            .messages
            .iter()
            .filter(|m| !m.seen)
            .map(|m| m.id)
            .collect()
    }

    /// Every successful `flag_seen` or `flag_delivered`, in call order.
    pub fn flagged(&self) -> Vec<MessageId> {
        self.lock().flagged.clone()
    }

    /// Every `fetch_body` call, in call order.
    pub fn fetched(&self) -> Vec<MessageId> {
        self.lock().fetched.clone()
    }

    /// Make every fetch of `id` fail.
    pub fn fail_fetch(&self, id: MessageId) {
        self.lock().failing_fetches.insert(id);
    }

    /// Make every flag or delivered mark of `id` fail.
    pub fn fail_flag(&self, id: MessageId) {
        self.lock().failing_flags.insert(id);
    }

    /// Make the next `n` probes fail, as if the connection dropped.
    pub fn fail_next_probes(&self, n: u32) {
        self.lock().probe_failures = n;
    }

    /// Results for upcoming `connect` calls; once drained, connects succeed.
    pub fn script_connects(&self, results: Vec<Result<()>>) {
        self.lock().connect_results = results.into();
    }

    pub fn connects(&self) -> u32 {
        self.lock().connects
    }

    pub fn closes(&self) -> u32 {
        self.lock().closes
    }

    fn flag(&self, id: MessageId, delivered: bool) -> Result<()> {
        let mut state = self.lock();
        if state.failing_flags.contains(&id) {
            return Err(Error::Mail(format!("store on message {id} failed")));
        }
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::Mail(format!("no message {id}")))?;
        message.seen = true;
        message.delivered |= delivered;
        state.flagged.push(id);
        Ok(())
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            mailbox: self.clone(),
            host: "imap.test".to_string(),
        }
    }

    /// A session without going through a connector.
    pub fn session(&self) -> FakeSession {
        FakeSession {
            mailbox: self.clone(),
        }
    }
}

/// Connector producing sessions on a [`FakeMailbox`].
pub struct FakeConnector {
    mailbox: FakeMailbox,
    host: String,
}

#[async_trait]
impl MailConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self) -> Result<FakeSession> {
        let scripted = {
            let mut state = self.mailbox.lock();
            state.connects += 1;
            state.connect_results.pop_front()
        };
        scripted.unwrap_or(Ok(()))?;
        Ok(self.mailbox.session())
    }

    fn host(&self) -> &str {
        &self.host
    }
}

/// Session on a [`FakeMailbox`].
pub struct FakeSession {
    mailbox: FakeMailbox,
}

#[async_trait]
impl MailSession for FakeSession {
    async fn probe(&mut self) -> Result<()> {
        let mut state = self.mailbox.lock();
        if state.probe_failures > 0 {
            state.probe_failures -= 1;
            return Err(Error::Mail("connection reset by peer".into()));
        }
        Ok(())
    }

    async fn search(&mut self, query: &SearchQuery) -> Result<Vec<MessageId>> {
        let state = self.mailbox.lock();
        let want_seen = query.seen == SeenFilter::Seen;
        let mut ids: Vec<MessageId> = state
            .messages
            .iter()
            .filter(|m| m.seen == want_seen)
            .filter(|m| !query.delivered || m.delivered)
            .filter(|m| m.from.eq_ignore_ascii_case(&query.from))
            .filter(|m| query.sent_on.map_or(true, |date| m.sent_on == date))
            .map(|m| m.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn fetch_body(&mut self, id: MessageId) -> Result<Vec<u8>> {
        let mut state = self.mailbox.lock();
        state.fetched.push(id);
        if state.failing_fetches.contains(&id) {
            return Err(Error::Mail(format!("fetch of message {id} failed")));
        }
        state
            .messages
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.raw.clone())
            .ok_or_else(|| Error::Mail(format!("no message {id}")))
    }

    async fn flag_seen(&mut self, id: MessageId) -> Result<()> {
        self.mailbox.flag(id, false)
    }

    async fn flag_delivered(&mut self, id: MessageId) -> Result<()> {
        self.mailbox.flag(id, true)
    }

    async fn close(&mut self) {
        self.mailbox.lock().closes += 1;
    }
}
