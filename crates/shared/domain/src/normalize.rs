//! Bidirectional mapping between application-facing enumeration tokens and
//! their persisted upper-case form.
//!
//! Both directions are total: an unknown token is upper-cased on the way in
//! and returned unchanged on the way out, so a write/read cycle reaches a
//! fixed point after a single write.

/// Fixed lookup table of `(application token, persisted token)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct TokenTable {
    pairs: &'static [(&'static str, &'static str)],
}

impl TokenTable {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    /// Persisted token for a known value, matched case-insensitively against
    /// either column of the table.
    pub fn lookup_stored(&self, token: &str) -> Option<&'static str> {
        let needle = token.trim().to_lowercase();
        self.pairs
            .iter()
            .find(|(app, stored)| app.to_lowercase() == needle || stored.to_lowercase() == needle)
            .map(|(_, stored)| *stored)
    }

    /// Application token for a persisted value (exact match).
    pub fn lookup_app(&self, stored: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(_, persisted)| *persisted == stored)
            .map(|(app, _)| *app)
    }

    /// Write path: canonical persisted token, or the input upper-cased.
    pub fn to_stored(&self, token: &str) -> String {
        self.lookup_stored(token)
            .map(str::to_string)
            .unwrap_or_else(|| token.trim().to_uppercase())
    }

    /// Read path: application token, or the input unchanged.
    pub fn to_app(&self, stored: &str) -> String {
        self.lookup_app(stored)
            .map(str::to_string)
            .unwrap_or_else(|| stored.to_string())
    }
}

/// Aid types: money, physical items, other.
pub const AID_TYPES: TokenTable = TokenTable::new(&[
    ("Financeira", "FINANCEIRA"),
    ("Itens", "ITENS"),
    ("Outro", "OUTRO"),
]);

/// Payment methods for financial donations.
pub const PAYMENT_METHODS: TokenTable = TokenTable::new(&[
    ("Pix", "PIX"),
    ("Dinheiro", "DINHEIRO"),
    ("Transferência", "TRANSFERENCIA"),
    ("Outro", "OUTRO"),
]);

/// Normalize an aid type for storage
pub fn aid_type_to_stored(token: &str) -> String {
    AID_TYPES.to_stored(token)
}

/// Denormalize a stored aid type
pub fn aid_type_to_app(stored: &str) -> String {
    AID_TYPES.to_app(stored)
}

/// Normalize a payment method for storage
pub fn payment_method_to_stored(token: &str) -> String {
    PAYMENT_METHODS.to_stored(token)
}

/// Denormalize a stored payment method
pub fn payment_method_to_app(stored: &str) -> String {
    PAYMENT_METHODS.to_app(stored)
}
