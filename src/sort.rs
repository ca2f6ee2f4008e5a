use crate::models::Property;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Listing order selected in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Any unrecognized key: keep input order
    Unsorted,
}

impl SortKey {
    /// Toolbar label
    pub fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::RatingDesc => "Highest Rated",
            Self::Unsorted => "Sort by",
        }
    }

    fn compare(self, a: &Property, b: &Property) -> Ordering {
        match self {
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::RatingDesc => b.rating.total_cmp(&a.rating),
            Self::Unsorted => Ordering::Equal,
        }
    }
}

/// Parsing never fails: unknown keys select [`SortKey::Unsorted`]
impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating-desc" => Self::RatingDesc,
            _ => Self::Unsorted,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::Unsorted => "none",
        })
    }
}

/// Ordered view over `records`. The input slice is left untouched and ties
/// keep their input order (`sort_by` is stable).
pub fn sort<'a, I>(records: I, key: SortKey) -> Vec<&'a Property>
where
    I: IntoIterator<Item = &'a Property>,
{
    let mut ordered: Vec<&Property> = records.into_iter().collect();
    ordered.sort_by(|a, b| key.compare(a, b));
    ordered
}
