// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role checks and row-visibility scoping.
//!
//! Scope derivation happens here and nowhere else. Visit listings, report
//! aggregation, and dashboard aggregation all consume the same
//! [`VisitScope`], so the three surfaces can never drift apart.

use fieldops_domain::{Claims, Role, VisitScope};
use fieldops_persistence::VisitFilters;

use crate::error::AuthError;

/// Checks that the caller holds one of the allowed roles.
///
/// # Errors
///
/// Returns [`AuthError::Unauthorized`] naming the attempted action and the
/// roles that would have been accepted.
pub fn authorize(claims: &Claims, action: &str, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<&str>>()
                .join(" or "),
        })
    }
}

/// Derives the implicit row-visibility restriction for the caller's role.
#[must_use]
pub const fn scope_for(claims: &Claims) -> VisitScope {
    match claims.role {
        Role::Admin => VisitScope::All,
        Role::Supervisor => VisitScope::Supervisor(claims.id),
        Role::Technician => VisitScope::Technician(claims.id),
    }
}

/// Strips filter fields the caller's role may not pin explicitly.
///
/// The scope already constrains rows; this prevents a non-ADMIN caller
/// from smuggling a broader restriction through the filter vocabulary.
#[must_use]
pub fn sanitize_filters(claims: &Claims, filters: &VisitFilters) -> VisitFilters {
    let mut sanitized: VisitFilters = filters.clone();
    match claims.role {
        Role::Admin => {}
        Role::Supervisor => {
            sanitized.supervisor_id = None;
        }
        Role::Technician => {
            sanitized.supervisor_id = None;
            sanitized.technician_id = None;
        }
    }
    sanitized
}
