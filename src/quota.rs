//! Quota resolution for per-user totals
//!
//! A user's monthly quota is the largest numeric quota seen on any of their
//! events. Unlimited and unparsable values carry no quota. Users left with no
//! quota at all have no billing ceiling and are dropped from the per-user
//! table.

use crate::aggregation::UserTotal;
use crate::summary_types::UserSummary;
use crate::types::{PremiumRequest, UserId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-user table with quotas attached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaResolution {
    /// Users with a resolved quota, in the order of the input totals
    pub users: Vec<UserSummary>,
    /// Users dropped because no quota could be resolved
    pub unresolved_users: Vec<UserId>,
}

/// Resolves monthly quotas from raw events
pub struct QuotaResolver;

impl QuotaResolver {
    /// Largest numeric quota per user
    ///
    /// Users whose every event is unlimited or unparsable are absent.
    pub fn resolve_quotas(events: &[PremiumRequest]) -> BTreeMap<UserId, f64> {
        let mut quotas: BTreeMap<UserId, f64> = BTreeMap::new();
        for event in events {
            let Some(limit) = event.quota.as_limit() else {
                continue;
            };
            quotas
                .entry(event.user.clone())
                .and_modify(|current| *current = current.max(limit))
                .or_insert(limit);
        }
        debug!("Resolved quotas for {} users", quotas.len());
        quotas
    }

    /// Attach quotas to per-user totals, dropping users without one
    pub fn attach(totals: &[UserTotal], quotas: &BTreeMap<UserId, f64>) -> QuotaResolution {
        let mut resolution = QuotaResolution::default();
        for total in totals {
            match quotas.get(&total.user) {
                Some(&quota) => resolution.users.push(UserSummary {
                    user: total.user.clone(),
                    requests_used: total.requests_used,
                    total_monthly_quota: quota,
                }),
                None => resolution.unresolved_users.push(total.user.clone()),
            }
        }

        if !resolution.unresolved_users.is_empty() {
            warn!(
                "{} users have no resolvable monthly quota and are left out of per-user tables",
                resolution.unresolved_users.len()
            );
        }
        resolution
    }

    /// Resolve quotas from `events` and attach them to `totals`
    pub fn resolve(events: &[PremiumRequest], totals: &[UserTotal]) -> QuotaResolution {
        let quotas = Self::resolve_quotas(events);
        Self::attach(totals, &quotas)
    }
}
