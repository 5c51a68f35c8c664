//! # In-Memory Persistence
//!
//! A single shared store implementing every repository trait, used by unit
//! tests and local development. All tables live behind one `RwLock`, so the
//! guarded quorum transition holds the same atomicity the SQL backend gets
//! from a single UPDATE statement: under a write guard nothing else can
//! observe or race the status flip.

mod catalog;
mod directory;
mod policy;

use crate::domain::entities::{
    Company, Giro, PreOrder, PreOrderApproval, Product, ProductApproval, Role, User,
};
use crate::domain::value_objects::GiroId;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) users: HashMap<i64, User>,
    pub(crate) roles: HashMap<i64, Role>,
    pub(crate) companies: HashMap<i64, Company>,
    pub(crate) giros: HashMap<i64, Giro>,
    pub(crate) products: HashMap<i64, Product>,
    pub(crate) pre_orders: HashMap<i64, PreOrder>,
    pub(crate) product_approvals: Vec<ProductApproval>,
    pub(crate) pre_order_approvals: Vec<PreOrderApproval>,
    pub(crate) policies: HashSet<(String, String, String)>,
    pub(crate) groupings: HashSet<(i64, String)>,
    next_id: i64,
}

impl Inner {
    pub(crate) fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Quorum check used by both claim paths.
    pub(crate) fn qualifying_users(&self, company_id: i64, role_id: i64) -> u64 {
        self.users
            .values()
            .filter(|u| u.company_id.value() == company_id && u.role_id.value() == role_id)
            .count() as u64
    }
}

/// Shared in-memory store implementing all repository traits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(crate) inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a giro lookup record. Giros have no write endpoint; tests
    /// and local setups seed them directly.
    pub async fn seed_giro(&self, code: impl Into<String>, company_name: impl Into<String>) {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let now = Utc::now();
        inner.giros.insert(
            id,
            Giro {
                id: GiroId::new(id),
                code: code.into(),
                company_name: company_name.into(),
                created_at: now,
                updated_at: now,
            },
        );
    }
}
