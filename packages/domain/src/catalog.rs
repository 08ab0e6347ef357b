use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::error::{DomainError, Violation, Violations};
use crate::storage::{AssetRef, LocalImage, PickedImage};

/// Serving sizes offered for every pizza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCode {
    #[serde(rename = "P")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "G")]
    Large,
}

impl SizeCode {
    pub const ALL: [SizeCode; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn code(self) -> &'static str {
        match self {
            Self::Small => "P",
            Self::Medium => "M",
            Self::Large => "G",
        }
    }

    /// Name of the form field carrying this size's price.
    pub fn price_field(self) -> &'static str {
        match self {
            Self::Small => "price_P",
            Self::Medium => "price_M",
            Self::Large => "price_G",
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SizeCode {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "P" | "p" => Ok(Self::Small),
            "M" | "m" => Ok(Self::Medium),
            "G" | "g" => Ok(Self::Large),
            other => Err(Violation::SizeUnknown(other.to_string())),
        }
    }
}

/// A monetary amount in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);
    /// Largest storable amount: a signed 64-bit cents column.
    pub const MAX: Price = Price(i64::MAX as u64);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: u64) -> Self {
        Self(units * 100)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` when the product exceeds [`Price::MAX`].
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0
            .checked_mul(u64::from(quantity))
            .map(Self)
            .filter(|p| *p <= Self::MAX)
    }

    /// Parse a user-entered positive amount such as `42`, `42.5` or `42,50`.
    ///
    /// Returns `None` for zero, negative or malformed input, more than two
    /// fractional digits, or amounts above [`Price::MAX`].
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let (whole, frac) = match s.find(['.', ',']) {
            Some(i) => (&s[..i], &s[i + 1..]),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if s.len() != whole.len() && frac.is_empty() {
            return None;
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let units: u64 = whole.parse().ok()?;
        let frac_cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };
        let cents = units.checked_mul(100)?.checked_add(frac_cents)?;

        (cents > 0 && cents <= Self::MAX.0).then_some(Self(cents))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// One price per size tier. Every tier is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePrices {
    #[serde(rename = "P")]
    pub small: Price,
    #[serde(rename = "M")]
    pub medium: Price,
    #[serde(rename = "G")]
    pub large: Price,
}

impl SizePrices {
    pub fn get(&self, size: SizeCode) -> Price {
        match size {
            SizeCode::Small => self.small,
            SizeCode::Medium => self.medium,
            SizeCode::Large => self.large,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SizeCode, Price)> + '_ {
        SizeCode::ALL.into_iter().map(|size| (size, self.get(size)))
    }
}

/// The search key derived from a display name.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Exclusive upper bound of the key range holding every string that starts
/// with `prefix`. `None` means the range is unbounded above.
pub fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

/// A catalog record as written to the store, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogEntry {
    name: String,
    normalized_name: String,
    description: String,
    prices: SizePrices,
    image_ref: AssetRef,
    image_asset_path: String,
}

impl NewCatalogEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prices: SizePrices,
        image_ref: AssetRef,
    ) -> Self {
        let image_asset_path = image_ref.path().to_string();
        Self::restore(name, description, prices, image_ref, image_asset_path)
    }

    /// Rebuild a record read back from a store. The normalized name is always
    /// recomputed from `name`.
    pub fn restore(
        name: impl Into<String>,
        description: impl Into<String>,
        prices: SizePrices,
        image_ref: AssetRef,
        image_asset_path: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            normalized_name: normalize(&name),
            name,
            description: description.into(),
            prices,
            image_ref,
            image_asset_path: image_asset_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn prices(&self) -> &SizePrices {
        &self.prices
    }

    pub fn image_ref(&self) -> &AssetRef {
        &self.image_ref
    }

    pub fn image_asset_path(&self) -> &str {
        &self.image_asset_path
    }

    pub fn with_id(self, id: Uuid) -> CatalogEntry {
        CatalogEntry { id, record: self }
    }
}

/// A persisted menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    id: Uuid,
    record: NewCatalogEntry,
}

impl CatalogEntry {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn record(&self) -> &NewCatalogEntry {
        &self.record
    }

    pub fn into_record(self) -> NewCatalogEntry {
        self.record
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn normalized_name(&self) -> &str {
        self.record.normalized_name()
    }

    pub fn description(&self) -> &str {
        self.record.description()
    }

    pub fn prices(&self) -> &SizePrices {
        self.record.prices()
    }

    pub fn image_ref(&self) -> &AssetRef {
        self.record.image_ref()
    }

    pub fn image_asset_path(&self) -> &str {
        self.record.image_asset_path()
    }
}

/// Admin input for creating or editing a catalog entry.
#[derive(Debug, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub image: Option<LocalImage>,
    /// Raw price text per size as typed by the user.
    pub prices: BTreeMap<SizeCode, String>,
}

/// A draft that passed validation, ready for upload and write.
#[derive(Debug)]
pub struct ValidDraft<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: &'a LocalImage,
    pub prices: SizePrices,
}

impl ProductDraft {
    pub fn set_price(&mut self, size: SizeCode, value: impl Into<String>) {
        self.prices.insert(size, value.into());
    }

    /// A cancelled pick keeps whatever image was selected before.
    pub fn apply_pick(&mut self, picked: PickedImage) {
        if let PickedImage::Selected(image) = picked {
            self.image = Some(image);
        }
    }

    /// Check every field and report all violations at once.
    pub fn validate(&self, config: &CatalogConfig) -> Result<ValidDraft<'_>, DomainError> {
        let mut violations = Violations::new();

        let name = self.name.trim();
        if name.is_empty() {
            violations.push(Violation::NameMissing);
        }

        let description = self.description.trim();
        if description.is_empty() {
            violations.push(Violation::DescriptionMissing);
        } else if description.chars().count() > config.description_max_chars {
            violations.push(Violation::DescriptionTooLong {
                max: config.description_max_chars,
            });
        }

        if self.image.is_none() {
            violations.push(Violation::ImageMissing);
        }

        let mut parsed = [Price::ZERO; 3];
        for (slot, size) in parsed.iter_mut().zip(SizeCode::ALL) {
            match self.prices.get(&size).map(|raw| raw.trim()) {
                None | Some("") => violations.push(Violation::PriceMissing(size)),
                Some(raw) => match Price::parse(raw) {
                    Some(price) => *slot = price,
                    None => violations.push(Violation::PriceInvalid(size)),
                },
            }
        }

        let [small, medium, large] = parsed;
        match &self.image {
            Some(image) if violations.is_empty() => Ok(ValidDraft {
                name,
                description,
                image,
                prices: SizePrices {
                    small,
                    medium,
                    large,
                },
            }),
            _ => Err(DomainError::Validation(violations)),
        }
    }
}
