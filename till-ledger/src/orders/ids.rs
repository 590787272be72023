//! Identifier generator
//!
//! Identifiers are `prefix + 6 zero-padded digits` (`sale004217`,
//! `line000090`). The space per kind is flat (1,000,000 values), so every
//! candidate is probed against its namespace and regenerated on collision, up
//! to a fixed number of attempts.
//!
//! The probe is the [`IdNamespace`] trait. The store passes its open
//! transaction, so a probe sees rows written earlier in the same `create`.

use super::error::{LedgerError, LedgerResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::SqliteConnection;
use std::collections::HashSet;
use std::fmt;

/// Size of each namespace: `000000..=999999`
const ID_SPACE: u32 = 1_000_000;

/// Default probe bound
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

// ============================================================================
// IdKind
// ============================================================================

/// Namespace selector: one per table that owns generated identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Order,
    OrderLine,
    LineOption,
    AppliedDiscount,
    Staff,
    Category,
    Item,
    Modifier,
    CatalogOption,
    Discount,
}

impl IdKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Order => "sale",
            Self::OrderLine => "line",
            Self::LineOption => "lopt",
            Self::AppliedDiscount => "ldisc",
            Self::Staff => "staff",
            Self::Category => "category",
            Self::Item => "item",
            Self::Modifier => "modifier",
            Self::CatalogOption => "option",
            Self::Discount => "discount",
        }
    }

    pub const fn table(&self) -> &'static str {
        match self {
            Self::Order => "orders",
            Self::OrderLine => "order_lines",
            Self::LineOption => "order_line_options",
            Self::AppliedDiscount => "order_discounts",
            Self::Staff => "staff",
            Self::Category => "categories",
            Self::Item => "items",
            Self::Modifier => "modifiers",
            Self::CatalogOption => "options",
            Self::Discount => "discounts",
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::Order => "order_id",
            Self::OrderLine => "line_id",
            Self::LineOption => "line_option_id",
            Self::AppliedDiscount => "applied_discount_id",
            Self::Staff => "staff_id",
            Self::Category => "category_id",
            Self::Item => "item_id",
            Self::Modifier => "modifier_id",
            Self::CatalogOption => "option_id",
            Self::Discount => "discount_id",
        }
    }

    /// Render a number in this kind's format
    pub fn format(&self, n: u32) -> String {
        format!("{}{:06}", self.prefix(), n)
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

// ============================================================================
// Namespaces
// ============================================================================

/// Uniqueness probe for candidate identifiers
#[async_trait]
pub trait IdNamespace: Send {
    async fn contains(&mut self, kind: IdKind, candidate: &str) -> LedgerResult<bool>;
}

#[async_trait]
impl IdNamespace for SqliteConnection {
    async fn contains(&mut self, kind: IdKind, candidate: &str) -> LedgerResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            kind.table(),
            kind.column()
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(candidate)
            .fetch_one(&mut *self)
            .await?;
        Ok(exists)
    }
}

/// In-memory namespace; ignores `kind`
#[async_trait]
impl IdNamespace for HashSet<String> {
    async fn contains(&mut self, _kind: IdKind, candidate: &str) -> LedgerResult<bool> {
        Ok(HashSet::contains(self, candidate))
    }
}

// ============================================================================
// IdGenerator
// ============================================================================

/// Collision-checked identifier allocator
///
/// The RNG is seeded once per generator, not per call. It is locked only to
/// draw a number and never across a probe.
pub struct IdGenerator {
    rng: Mutex<StdRng>,
    max_attempts: u32,
}

impl IdGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Deterministic sequence of candidates
    pub fn with_seed(seed: u64, max_attempts: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn candidate(&self, kind: IdKind) -> String {
        let n = self.rng.lock().gen_range(0..ID_SPACE);
        kind.format(n)
    }

    /// Allocate an identifier not yet present in `namespace`
    ///
    /// Fails with `ExhaustedRetries` once `max_attempts` candidates collided.
    /// Probe failures propagate immediately.
    pub async fn generate<N>(&self, namespace: &mut N, kind: IdKind) -> LedgerResult<String>
    where
        N: IdNamespace + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate(kind);
            if !namespace.contains(kind, &candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(%kind, attempt, candidate = %candidate, "Identifier collision, retrying");
        }

        tracing::warn!(%kind, attempts = self.max_attempts, "Identifier space exhausted");
        Err(LedgerError::ExhaustedRetries {
            kind,
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Namespace that reports every candidate as taken
    struct Saturated {
        probes: u32,
    }

    #[async_trait]
    impl IdNamespace for Saturated {
        async fn contains(&mut self, _kind: IdKind, _candidate: &str) -> LedgerResult<bool> {
            self.probes += 1;
            Ok(true)
        }
    }

    #[test]
    fn test_format_is_prefix_plus_six_digits() {
        assert_eq!(IdKind::Order.format(42), "sale000042");
        assert_eq!(IdKind::LineOption.format(999_999), "lopt999999");
        assert_eq!(IdKind::CatalogOption.format(0), "option000000");
    }

    #[tokio::test]
    async fn test_generate_matches_format() {
        let generator = IdGenerator::default();
        let mut taken = HashSet::new();
        let id = generator.generate(&mut taken, IdKind::Order).await.unwrap();
        assert!(id.starts_with("sale"));
        let digits = &id["sale".len()..];
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_seeded_generators_agree() {
        let a = IdGenerator::with_seed(7, 10);
        let b = IdGenerator::with_seed(7, 10);
        let mut ns = HashSet::new();
        for _ in 0..5 {
            let x = a.generate(&mut ns, IdKind::OrderLine).await.unwrap();
            let y = b.generate(&mut ns, IdKind::OrderLine).await.unwrap();
            assert_eq!(x, y);
        }
    }

    #[tokio::test]
    async fn test_collision_is_retried() {
        let seeded = IdGenerator::with_seed(99, 10);
        let mut empty = HashSet::new();
        let first = seeded.generate(&mut empty, IdKind::Item).await.unwrap();

        // Same seed, first candidate already taken: the second draw is used
        let generator = IdGenerator::with_seed(99, 10);
        let mut taken: HashSet<String> = [first.clone()].into_iter().collect();
        let id = generator.generate(&mut taken, IdKind::Item).await.unwrap();
        assert_ne!(id, first);
    }

    #[tokio::test]
    async fn test_exhaustion_is_typed() {
        let generator = IdGenerator::with_seed(1, 100);
        let mut ns = Saturated { probes: 0 };
        let err = generator.generate(&mut ns, IdKind::Order).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ExhaustedRetries {
                kind: IdKind::Order,
                attempts: 100
            }
        ));
        assert_eq!(ns.probes, 100);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(IdGenerator::new(0).max_attempts(), 1);
    }
}
