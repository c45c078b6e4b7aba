// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! This module contains all read-only queries.
//!
//! ## Module Organization
//!
//! - `users` - User account queries
//! - `clients` - Client queries
//! - `visits` - Scoped visit listings and lookups
//! - `reports` - Scoped visit-report joins
//! - `dashboard` - Aggregate counts for the role dashboards
//! - `sessions` - Session token lookups
//!
//! Every visit-shaped query takes a [`VisitScope`] so the row-visibility
//! rule is applied in exactly one way across visits, reports, and dashboard
//! aggregates.
//!
//! [`VisitScope`]: fieldops_domain::VisitScope

pub mod clients;
pub mod dashboard;
pub mod reports;
pub mod sessions;
pub mod users;
pub mod visits;
