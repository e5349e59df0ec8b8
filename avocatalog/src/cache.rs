//! Cache en mémoire des enregistrements individuels
//!
//! Les enregistrements du legacy API sont gardés par identifiant, avec une
//! politique d'éviction explicite (TTL et/ou LRU) fournie à la construction.
//!
//! ```
//! use avocatalog::{CachePolicy, DetailedRecording, RecordingCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let cache = RecordingCache::new(
//!     CachePolicy::unbounded()
//!         .with_capacity(100)
//!         .with_time_to_live(Duration::from_secs(60)),
//! );
//! cache.insert("42".to_string(), Arc::new(DetailedRecording::default())).await;
//! assert!(cache.get("42").await.is_some());
//! assert_eq!(cache.stats().await.entry_count, 1);
//! # });
//! ```

use crate::models::DetailedRecording;
use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Bornes du cache, `None` désactive la borne correspondante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Nombre maximal d'entrées, évincées en LRU au-delà
    pub max_capacity: Option<u64>,
    /// Durée de vie d'une entrée depuis son insertion
    pub time_to_live: Option<Duration>,
}

impl CachePolicy {
    /// Aucune borne : le comportement d'un cache par requête
    pub fn unbounded() -> Self {
        Self {
            max_capacity: None,
            time_to_live: None,
        }
    }

    pub fn with_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        crate::settings::CacheSettings::default().policy()
    }
}

/// Cache des enregistrements indexés par identifiant
#[derive(Clone)]
pub struct RecordingCache {
    recordings: MokaCache<String, Arc<DetailedRecording>>,
    policy: CachePolicy,
}

impl RecordingCache {
    /// Crée un cache suivant la politique donnée
    pub fn new(policy: CachePolicy) -> Self {
        let mut builder = MokaCache::builder().eviction_policy(EvictionPolicy::lru());
        if let Some(capacity) = policy.max_capacity {
            builder = builder.max_capacity(capacity);
        }
        if let Some(ttl) = policy.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        Self {
            recordings: builder.build(),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Récupère un enregistrement depuis le cache
    pub async fn get(&self, id: &str) -> Option<Arc<DetailedRecording>> {
        self.recordings.get(id).await
    }

    /// Ajoute un enregistrement au cache
    pub async fn insert(&self, id: String, recording: Arc<DetailedRecording>) {
        self.recordings.insert(id, recording).await;
    }

    /// Invalide un enregistrement du cache
    pub async fn invalidate(&self, id: &str) {
        self.recordings.invalidate(id).await;
    }

    /// Vide le cache
    pub async fn clear(&self) {
        self.recordings.invalidate_all();
        self.recordings.run_pending_tasks().await;
    }

    /// Retourne des statistiques sur le cache
    pub async fn stats(&self) -> CacheStats {
        self.recordings.run_pending_tasks().await;

        CacheStats {
            entry_count: self.recordings.entry_count(),
            max_capacity: self.policy.max_capacity,
            time_to_live_secs: self.policy.time_to_live.map(|ttl| ttl.as_secs()),
        }
    }
}

impl Default for RecordingCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

/// Statistiques du cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct CacheStats {
    /// Nombre d'enregistrements en cache
    pub entry_count: u64,
    /// Capacité maximale (`null` si illimitée)
    pub max_capacity: Option<u64>,
    /// Durée de vie en secondes (`null` si illimitée)
    pub time_to_live_secs: Option<u64>,
}
