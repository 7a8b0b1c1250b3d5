/// Seam between the account service and the concrete hash scheme, so the
/// service stays testable without paying for a real key-derivation run.
pub trait PasswordHasher: Send + Sync {
    /// # Errors
    /// Fails only when the underlying hash scheme cannot produce a digest.
    fn hash(&self, plain: &str) -> anyhow::Result<String>;

    fn verify(&self, plain: &str, hash: &str) -> bool;
}
