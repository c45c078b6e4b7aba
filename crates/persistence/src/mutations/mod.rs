// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for the persistence layer.
//!
//! This module contains all write operations.
//!
//! ## Module Organization
//!
//! - `users` - User account mutations
//! - `clients` - Client mutations
//! - `visits` - Visit creation and the transactional check-in/check-out
//! - `sessions` - Session creation and revocation

pub mod clients;
pub mod sessions;
pub mod users;
pub mod visits;
