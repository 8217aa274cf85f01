use anyhow::Result;
use base64ct::{Base64, Encoding};
use rand::{RngCore, rngs::OsRng};

/// Fresh 32-byte Ed25519 seed, standard base64.
#[must_use]
pub fn generate_secret() -> String {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    Base64::encode_string(&seed)
}

/// Print a new session secret.
/// # Errors
/// Never fails; returns `Result` to match the other actions.
pub fn execute() -> Result<()> {
    println!("{}", generate_secret());
    Ok(())
}
