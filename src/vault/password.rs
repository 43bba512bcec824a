// TokenVault: Password resolution
//
// The effective password for saving and loading is resolved by one pure
// function with a fixed precedence: explicit argument, then the injected
// `PasswordSource`, then nothing. Empty values count as absent at both
// levels. The environment-backed source reads the variable on every call,
// so setting or clearing it takes effect on the next save or load.

use zeroize::Zeroizing;

use crate::config::PASSWORD_ENV_VAR;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Where a default password comes from when none is passed explicitly.
pub trait PasswordSource {
    /// The current default password, if any. Must not cache.
    fn password(&self) -> Option<Zeroizing<Vec<u8>>>;
}

// ─── Implementations ─────────────────────────────────────────────────────────

/// Reads a single environment variable (`TOKENVAULT_PASSWORD` by default).
#[derive(Debug, Clone)]
pub struct EnvPasswordSource {
    var: String,
}

impl EnvPasswordSource {
    pub fn new() -> Self {
        Self {
            var: PASSWORD_ENV_VAR.to_string(),
        }
    }

    /// Read a different variable (useful for test isolation).
    pub fn with_var(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvPasswordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordSource for EnvPasswordSource {
    fn password(&self) -> Option<Zeroizing<Vec<u8>>> {
        std::env::var_os(&self.var)
            .filter(|value| !value.is_empty())
            .map(|value| Zeroizing::new(value.into_encoded_bytes()))
    }
}

/// Never supplies a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPasswordSource;

impl PasswordSource for NoPasswordSource {
    fn password(&self) -> Option<Zeroizing<Vec<u8>>> {
        None
    }
}

/// Resolve the effective password: `explicit` > `source` > none.
pub fn resolve_password<S: PasswordSource + ?Sized>(
    explicit: Option<&[u8]>,
    source: &S,
) -> Option<Zeroizing<Vec<u8>>> {
    match explicit.filter(|password| !password.is_empty()) {
        Some(password) => Some(Zeroizing::new(password.to_vec())),
        None => source.password().filter(|password| !password.is_empty()),
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────
