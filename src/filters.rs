use crate::models::{ListingType, Property};
use clap::ValueEnum;

/// Upper end of the price slider
pub const PRICE_CEILING: f64 = 1_000_000.0;
/// Price slider granularity
pub const PRICE_STEP: f64 = 1_000.0;

/// Listing-kind radio choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    #[default]
    All,
    Rent,
    Buy,
}

impl KindFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Rent => "For Rent",
            Self::Buy => "For Sale",
        }
    }

    fn accepts(self, listing_type: ListingType) -> bool {
        match self {
            Self::All => true,
            Self::Rent => listing_type == ListingType::Rent,
            Self::Buy => listing_type == ListingType::Buy,
        }
    }
}

/// Property-type selector. Rows carry no type column, so the match is
/// a word search over title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
}

impl PropertyType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Condo => "Condo",
            Self::Townhouse => "Townhouse",
        }
    }

    fn matches(self, property: &Property) -> bool {
        let needle = self.label().to_lowercase();
        let description = property.description.as_deref().unwrap_or_default();
        [property.title.as_str(), description]
            .iter()
            .flat_map(|text| text.split(|c: char| !c.is_alphanumeric()))
            .any(|word| word.to_lowercase() == needle)
    }
}

/// Dual-handle price slider, snapped to [`PRICE_STEP`] and clamped to
/// `0..=PRICE_CEILING`. A max handle at the ceiling means "no upper bound".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        let snap = |v: f64| ((v / PRICE_STEP).round() * PRICE_STEP).clamp(0.0, PRICE_CEILING);
        let (min, max) = (snap(min), snap(max));
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_unbounded_above(&self) -> bool {
        self.max >= PRICE_CEILING
    }

    fn contains(&self, price: f64) -> bool {
        price >= self.min && (self.is_unbounded_above() || price <= self.max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: PRICE_CEILING,
        }
    }
}

/// State of the filter panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub kind: KindFilter,
    pub location: String,
    pub price: PriceRange,
    pub property_type: Option<PropertyType>,
}

impl Filters {
    /// Whether `property` survives every active filter
    pub fn matches(&self, property: &Property) -> bool {
        self.kind.accepts(property.listing_type)
            && self.matches_location(property)
            && self.price.contains(property.price)
            && self.property_type.map_or(true, |t| t.matches(property))
    }

    fn matches_location(&self, property: &Property) -> bool {
        let needle = self.location.trim().to_lowercase();
        needle.is_empty()
            || property.address.to_lowercase().contains(&needle)
            || property.title.to_lowercase().contains(&needle)
    }

    /// Lazily yields matching records in input order
    pub fn apply<'a>(&'a self, records: &'a [Property]) -> impl Iterator<Item = &'a Property> + 'a {
        records.iter().filter(move |p| self.matches(p))
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}
