//! Identity-keyed override cache.
//!
//! Many authored sprites share one texture and ask for the same per-texture
//! material override. [`OverrideCache`] makes sure the template is cloned at
//! most once per base resource and hands back the same derived resource to
//! every later caller.
//!
//! The cache does not own the derived resources. It stores whatever handle the
//! [`OverrideAssets`] implementation returns and asks that implementation
//! whether a stored handle is still alive before reusing it. In a host with
//! hot reload the assets can be destroyed behind the cache's back; such stale
//! entries are replaced on the next request.
//!
//! # Entry lifecycle
//!
//! ```text
//! Absent --create--> Valid --external destroy--> Invalid --next request--> Valid
//! ```
//!
//! There is no removal in normal operation.

use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use log::debug;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failures of [`OverrideCache::get_or_create`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// The template to clone is missing or was destroyed.
    #[error("override template unavailable: {template}")]
    TemplateUnavailable { template: String },
}

impl OverrideError {
    pub fn template_unavailable(template: impl fmt::Debug) -> Self {
        Self::TemplateUnavailable {
            template: format!("{:?}", template),
        }
    }
}

/// Asset side of an override cache.
///
/// Implementors know how to build a derived resource from a base and a
/// template, and how to tell whether a previously built one still exists.
pub trait OverrideAssets {
    /// Identity of the source asset, e.g. a texture handle.
    type Base: Eq + Hash + Clone;
    /// Prototype cloned for every new override.
    type Template: fmt::Debug;
    /// Handle to a derived resource.
    type Derived: Clone;

    /// Whether `derived` still refers to a live resource.
    ///
    /// Hosts without out-of-band destruction can always return `true`.
    fn is_valid(&self, derived: &Self::Derived) -> bool;

    /// Clone `template` and customize the clone with `base`.
    fn create_override(
        &mut self,
        base: &Self::Base,
        template: &Self::Template,
    ) -> Result<Self::Derived, OverrideError>;
}

/// Counters describing how requests were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideStats {
    /// Requests answered from a valid entry.
    pub hits: u64,
    /// Entries created for a base seen for the first time.
    pub created: u64,
    /// Stale entries replaced with a fresh override.
    pub repaired: u64,
}

/// Mapping from base resource to its derived override.
#[derive(Debug, Clone)]
pub struct OverrideCache<B, D> {
    entries: FxHashMap<B, D>,
    validate_entries: bool,
    stats: OverrideStats,
}

impl<B, D> Default for OverrideCache<B, D> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            validate_entries: true,
            stats: OverrideStats::default(),
        }
    }
}

impl<B, D> OverrideCache<B, D>
where
    B: Eq + Hash + Clone,
    D: Clone,
{
    /// Create an empty cache that validates stored entries before reuse.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache. With `validate_entries == false` a present entry
    /// is always trusted, which is correct for hosts without hot reload.
    pub fn with_validation(validate_entries: bool) -> Self {
        Self {
            validate_entries,
            ..Self::default()
        }
    }

    /// Return the override for `base`, creating it from `template` if there is
    /// none yet or the stored one is no longer valid.
    pub fn get_or_create<A>(
        &mut self,
        assets: &mut A,
        base: &B,
        template: &A::Template,
    ) -> Result<D, OverrideError>
    where
        A: OverrideAssets<Base = B, Derived = D>,
    {
        let stale = match self.entries.get(base) {
            Some(existing) if !self.validate_entries || assets.is_valid(existing) => {
                self.stats.hits += 1;
                return Ok(existing.clone());
            }
            Some(_) => true,
            None => false,
        };

        let derived = assets.create_override(base, template)?;
        self.entries.insert(base.clone(), derived.clone());
        if stale {
            debug!("Replaced stale override entry");
            self.stats.repaired += 1;
        } else {
            self.stats.created += 1;
        }
        Ok(derived)
    }

    /// Stored entry for `base`, valid or not.
    pub fn get(&self, base: &B) -> Option<&D> {
        self.entries.get(base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validates_entries(&self) -> bool {
        self.validate_entries
    }

    pub fn stats(&self) -> OverrideStats {
        self.stats
    }
}

struct SharedState<A: OverrideAssets> {
    cache: OverrideCache<A::Base, A::Derived>,
    assets: A,
}

/// Override cache usable from several threads at once.
///
/// The cache and the assets sit behind a single mutex so the whole
/// lookup-or-create runs as one critical section. Two threads asking for the
/// same base therefore never both create an override.
pub struct SharedOverrideCache<A: OverrideAssets> {
    state: Mutex<SharedState<A>>,
}

impl<A: OverrideAssets> SharedOverrideCache<A> {
    pub fn new(assets: A, validate_entries: bool) -> Self {
        Self {
            state: Mutex::new(SharedState {
                cache: OverrideCache::with_validation(validate_entries),
                assets,
            }),
        }
    }

    /// Thread-safe [`OverrideCache::get_or_create`].
    pub fn get_or_create(
        &self,
        base: &A::Base,
        template: &A::Template,
    ) -> Result<A::Derived, OverrideError> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;
        state.cache.get_or_create(&mut state.assets, base, template)
    }

    /// Run `f` with exclusive access to the assets.
    pub fn with_assets<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard.assets)
    }

    pub fn stats(&self) -> OverrideStats {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cache
            .stats()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cache
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
