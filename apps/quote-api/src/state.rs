//! # Application State
//!
//! Shared state handed to every handler, and the in-memory quote sessions.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quote Sessions                                    │
//! │                                                                         │
//! │  calculate-quote ──► insert() ──► HashMap<Uuid, StoredQuote>           │
//! │                          │            │                                 │
//! │                          │            ├── get()            (clone)      │
//! │                          │            └── with_session_mut (edit)       │
//! │                          │                                              │
//! │                          └── purge expired, evict oldest when full      │
//! │                                                                         │
//! │  One Mutex guards the map. Each edit runs entirely under the lock, so  │
//! │  edits to one quote never interleave.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use solar_catalog::CatalogStore;
use solar_core::{CustomerSummary, Quote, QuoteResult, SavingsEstimate, SystemConfiguration};
use tracing::debug;
use uuid::Uuid;

use crate::config::{CompanyProfile, SessionSettings};

// =============================================================================
// App State
// =============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub sessions: QuoteSessions,
    /// Configured branding for documents.
    pub company: Arc<CompanyProfile>,
}

impl AppState {
    pub fn new(catalog: CatalogStore, sessions: SessionSettings, company: CompanyProfile) -> Self {
        AppState {
            catalog: Arc::new(catalog),
            sessions: QuoteSessions::new(sessions),
            company: Arc::new(company),
        }
    }
}

// =============================================================================
// Stored Quote
// =============================================================================

/// A calculated quote kept for follow-up edits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuote {
    #[serde(rename = "sessionId")]
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer: CustomerSummary,
    pub system: SystemConfiguration,
    pub quote: Quote,
    pub savings: SavingsEstimate,
}

impl StoredQuote {
    pub fn new(result: QuoteResult, savings: SavingsEstimate) -> Self {
        let now = Utc::now();
        StoredQuote {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            customer: result.customer,
            system: result.system,
            quote: result.quote,
            savings,
        }
    }

    /// The quote as a document renderer expects it.
    pub fn to_result(&self) -> QuoteResult {
        QuoteResult {
            customer: self.customer.clone(),
            system: self.system.clone(),
            quote: self.quote.clone(),
        }
    }
}

// =============================================================================
// Session Map
// =============================================================================

/// Longest honoured TTL (ten years).
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// In-memory quote sessions with idle expiry and a size cap.
#[derive(Clone)]
pub struct QuoteSessions {
    inner: Arc<Mutex<HashMap<Uuid, StoredQuote>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl QuoteSessions {
    pub fn new(settings: SessionSettings) -> Self {
        let ttl_secs = settings.ttl_secs.min(MAX_TTL_SECS) as i64;
        QuoteSessions {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs),
            max_sessions: settings.max_sessions.max(1),
        }
    }

    /// Stores a quote, dropping expired sessions and then the oldest ones
    /// while the map is full.
    pub fn insert(&self, quote: StoredQuote) -> Uuid {
        let id = quote.id;
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        Self::purge_locked(&mut map, self.ttl);
        while map.len() >= self.max_sessions {
            let oldest = map
                .values()
                .min_by_key(|q| q.updated_at)
                .map(|q| q.id);
            match oldest {
                Some(oldest) => {
                    debug!(session = %oldest, "Evicting oldest quote session");
                    map.remove(&oldest);
                }
                None => break,
            }
        }

        map.insert(id, quote);
        id
    }

    /// A copy of a live session.
    pub fn get(&self, id: &Uuid) -> Option<StoredQuote> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Self::purge_locked(&mut map, self.ttl);
        map.get(id).cloned()
    }

    /// Runs `f` on a live session under the lock and bumps its `updated_at`.
    pub fn with_session_mut<R>(&self, id: &Uuid, f: impl FnOnce(&mut StoredQuote) -> R) -> Option<R> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Self::purge_locked(&mut map, self.ttl);

        let session = map.get_mut(id)?;
        let out = f(session);
        session.updated_at = Utc::now();
        Some(out)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops sessions idle for longer than the TTL. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Self::purge_locked(&mut map, self.ttl)
    }

    fn purge_locked(map: &mut HashMap<Uuid, StoredQuote>, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let before = map.len();
        map.retain(|_, q| q.updated_at > cutoff);
        before - map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_catalog::sample_catalog;
    use solar_core::{CustomerInput, Money, QuoteEngine};

    fn stored() -> StoredQuote {
        let engine = QuoteEngine::new(sample_catalog());
        let result = engine
            .calculate_system(&CustomerInput {
                customer_name: "Tran Thi B".into(),
                customer_phone: None,
                customer_address: None,
                monthly_bill: Money::from_dong(2_000_000),
                monthly_consumption: None,
                electricity_price: None,
                savings_percent: 60,
                morning_usage: 50,
                evening_usage: 50,
            })
            .unwrap();
        let savings = solar_core::estimate_savings(
            result.system.power_kw,
            result.customer.electricity_price,
            result.quote.total,
        );
        StoredQuote::new(result, savings)
    }

    fn settings(ttl_secs: u64, max_sessions: usize) -> SessionSettings {
        SessionSettings { ttl_secs, max_sessions }
    }

    #[test]
    fn test_insert_and_get() {
        let sessions = QuoteSessions::new(settings(60, 10));
        let id = sessions.insert(stored());

        let session = sessions.get(&id).unwrap();
        assert_eq!(session.customer.name, "Tran Thi B");
        assert!(sessions.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_oldest_session_is_evicted_when_full() {
        let sessions = QuoteSessions::new(settings(60, 2));

        let mut first = stored();
        first.updated_at = Utc::now() - Duration::seconds(30);
        let first_id = sessions.insert(first);
        let second_id = sessions.insert(stored());
        let third_id = sessions.insert(stored());

        assert_eq!(sessions.len(), 2);
        assert!(sessions.get(&first_id).is_none());
        assert!(sessions.get(&second_id).is_some());
        assert!(sessions.get(&third_id).is_some());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let sessions = QuoteSessions::new(settings(60, 10));

        let mut old = stored();
        old.updated_at = Utc::now() - Duration::seconds(120);
        let old_id = sessions.insert(old);
        // insert() purges before storing, so the stale entry is still there.
        assert_eq!(sessions.len(), 1);

        assert_eq!(sessions.purge_expired(), 1);
        assert!(sessions.get(&old_id).is_none());
    }

    #[test]
    fn test_with_session_mut_touches_session() {
        let sessions = QuoteSessions::new(settings(60, 10));
        let mut quote = stored();
        quote.updated_at = Utc::now() - Duration::seconds(10);
        let before = quote.updated_at;
        let id = sessions.insert(quote);

        let lines = sessions.with_session_mut(&id, |s| s.quote.items.len()).unwrap();
        assert!(lines > 0);
        assert!(sessions.get(&id).unwrap().updated_at > before);

        assert!(sessions.with_session_mut(&Uuid::new_v4(), |_| ()).is_none());
    }
}
