//! Anonymous player identity
//!
//! Sign-in happens once at startup. If it fails the session keeps playing
//! without an identity and leaderboard submission quietly stays off.

use std::fmt;

use rand::distr::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Length of a minted anonymous id
pub const IDENTITY_LEN: usize = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    Unavailable(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Unavailable(reason) => write!(f, "sign-in unavailable: {reason}"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Source of the anonymous player id
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_in(&self) -> Result<String, IdentityError>;
}

/// Mints a random alphanumeric id locally
#[derive(Debug, Clone)]
pub struct AnonymousIdentity {
    seed: u64,
}

impl AnonymousIdentity {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl IdentityProvider for AnonymousIdentity {
    async fn sign_in(&self) -> Result<String, IdentityError> {
        let rng = Pcg32::seed_from_u64(self.seed);
        let id: String = rng
            .sample_iter(&Alphanumeric)
            .take(IDENTITY_LEN)
            .map(char::from)
            .collect();
        log::info!("Signed in anonymously as {}", id);
        Ok(id)
    }
}

/// Always fails (offline play)
#[derive(Debug, Clone, Default)]
pub struct FailingIdentity;

impl IdentityProvider for FailingIdentity {
    async fn sign_in(&self) -> Result<String, IdentityError> {
        Err(IdentityError::Unavailable("offline".into()))
    }
}
