//! Text-encoding collaborator (spec §6): an optional `(encoder, decoder)`
//! pair applied to string values crossing the wire/database boundary.
//! Out of scope as a *feature* (no codec implementations ship here, per
//! spec §1's "external collaborators" framing) but the seam is real, so
//! it's a narrow trait an embedder can plug into [`crate::Engine`].

use crate::error::Result;

pub trait TextCodec: Send + Sync {
    /// Applied to outbound string values before binding (`conv`'s string
    /// atoms, POST/PUT cell values).
    fn encode(&self, s: &str) -> Result<String>;
    /// Applied to inbound string cells after a row is scanned.
    fn decode(&self, s: &str) -> Result<String>;
}

/// No-op codec used when no recoding is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl TextCodec for Identity {
    fn encode(&self, s: &str) -> Result<String> {
        Ok(s.to_string())
    }

    fn decode(&self, s: &str) -> Result<String> {
        Ok(s.to_string())
    }
}
