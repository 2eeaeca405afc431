use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// An authenticated client identity, resolved from a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub client_id: Uuid,
    pub client_name: String,
}

/// Past this many live sessions the oldest ones are evicted.
const MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Default)]
struct Registrations {
    sessions: HashMap<String, Session>,
    order: VecDeque<String>,
}

/// In-memory session provider. Stands in for the hosted identity platform:
/// issuing a token here is the whole "login", everything beyond that is out
/// of scope. The registry is bounded, so issuing tokens cannot grow the map
/// without limit.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    registrations: Arc<Mutex<Registrations>>,
    limit: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl SessionRegistry {
    fn with_limit(limit: usize) -> Self {
        Self {
            registrations: Arc::new(Mutex::new(Registrations::default())),
            limit,
        }
    }

    /// Issue a fresh token for a client and remember the session.
    pub fn register(&self, client_name: String) -> (String, Session) {
        let session = Session {
            client_id: Uuid::new_v4(),
            client_name,
        };
        let token = Uuid::new_v4().to_string();
        let mut registrations = self.registrations.lock().unwrap();
        while registrations.sessions.len() >= self.limit {
            match registrations.order.pop_front() {
                Some(oldest) => {
                    registrations.sessions.remove(&oldest);
                }
                None => break,
            }
        }
        registrations.order.push_back(token.clone());
        registrations
            .sessions
            .insert(token.clone(), session.clone());
        (token, session)
    }

    /// Look a token up; unknown tokens simply mean "no active session".
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let registrations = self.registrations.lock().unwrap();
        registrations.sessions.get(token).cloned()
    }
}
