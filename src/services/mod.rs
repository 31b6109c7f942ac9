// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote auth client and diagnostic workflows.

pub mod identity;
pub mod verification;

pub use identity::{AuthSession, IdentityClient, UserIdentity};
pub use verification::{VerificationPlan, VerificationReport};
