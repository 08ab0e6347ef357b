use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::SizeCode;
use crate::storage::StorageError;

/// A single user-correctable input problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NameMissing,
    DescriptionMissing,
    DescriptionTooLong { max: usize },
    ImageMissing,
    PriceMissing(SizeCode),
    /// Present but not a positive amount with at most two decimals.
    PriceInvalid(SizeCode),
    SizeMissing,
    SizeUnknown(String),
    TableNumberMissing,
    QuantityNotPositive,
    /// Negative or beyond `u32` where zero is still allowed.
    QuantityInvalid,
    /// Price times quantity does not fit a stored amount.
    AmountTooLarge,
}

impl Violation {
    /// Machine-readable name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameMissing => "name",
            Self::DescriptionMissing | Self::DescriptionTooLong { .. } => "description",
            Self::ImageMissing => "image",
            Self::PriceMissing(size) | Self::PriceInvalid(size) => size.price_field(),
            Self::SizeMissing | Self::SizeUnknown(_) => "size",
            Self::TableNumberMissing => "table_number",
            Self::QuantityNotPositive | Self::QuantityInvalid | Self::AmountTooLarge => {
                "quantity"
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMissing => write!(f, "name is required"),
            Self::DescriptionMissing => write!(f, "description is required"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::ImageMissing => write!(f, "an image must be selected"),
            Self::PriceMissing(size) => write!(f, "price for size {size} is required"),
            Self::PriceInvalid(size) => {
                write!(f, "price for size {size} must be a positive amount")
            }
            Self::SizeMissing => write!(f, "a size must be selected"),
            Self::SizeUnknown(code) => write!(f, "unknown size '{code}'"),
            Self::TableNumberMissing => write!(f, "table number is required"),
            Self::QuantityNotPositive => write!(f, "quantity must be a positive integer"),
            Self::QuantityInvalid => write!(f, "quantity must not be negative"),
            Self::AmountTooLarge => write!(f, "order amount is too large"),
        }
    }
}

/// Every violation found in one validation pass, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.0.contains(violation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was violated, otherwise `DomainError::Validation`.
    pub fn into_result<T>(self, value: T) -> Result<T, DomainError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Failures reported by the document store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Outcome taxonomy shared by every catalog and order operation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(Violations),

    #[error("catalog management requires the admin role")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("catalog query failed: {0}")]
    QueryFailed(String),

    #[error("an order submission is already in flight")]
    SubmissionInFlight,

    #[error("order already submitted as {0}")]
    AlreadySubmitted(Uuid),
}

impl DomainError {
    /// Whether a manual retry of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::QueryFailed(_))
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            other => Self::Persistence(other.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(err.to_string())
    }
}
