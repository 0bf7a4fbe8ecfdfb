use candid::Principal;

/// An authenticated caller. Only the principal is needed here; signing is the
/// transport's concern.
pub trait Identity: Send + Sync {
    fn principal(&self) -> Principal;
}

/// Identity with a fixed principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIdentity(pub Principal);

impl Identity for StaticIdentity {
    fn principal(&self) -> Principal {
        self.0
    }
}
