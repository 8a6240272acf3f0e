//! House — a rental listing and its projections.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationErrors, Violation};
use crate::id::{AgentId, CategoryId, HouseId, UserId};

pub const TITLE_MIN_LEN: usize = 10;
pub const TITLE_MAX_LEN: usize = 50;
pub const ADDRESS_MIN_LEN: usize = 30;
pub const ADDRESS_MAX_LEN: usize = 150;
pub const DESCRIPTION_MIN_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const IMAGE_URL_MAX_LEN: usize = 200;

/// Upper bound for the monthly price, exclusive lower bound is zero.
pub const PRICE_MAX: f64 = 2000.0;

/// A rental listing. `renter_id` is present iff the house is rented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub title: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub price_per_month: f64,
    pub category_id: CategoryId,
    pub agent_id: AgentId,
    pub renter_id: Option<UserId>,
}

impl House {
    /// Whether the house currently has a renter.
    #[must_use]
    pub fn is_rented(&self) -> bool {
        self.renter_id.is_some()
    }
}

/// Input shape for creating or editing a house.
///
/// Edits are a full replace of every mutable field; the owning agent
/// and the renter are never changed through this shape.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseInput {
    pub title: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub price_per_month: f64,
    pub category_id: CategoryId,
}

impl HouseInput {
    /// Collect every validation violation in this input.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_length(&mut violations, "title", &self.title, TITLE_MIN_LEN, TITLE_MAX_LEN);
        check_length(
            &mut violations,
            "address",
            &self.address,
            ADDRESS_MIN_LEN,
            ADDRESS_MAX_LEN,
        );
        check_length(
            &mut violations,
            "description",
            &self.description,
            DESCRIPTION_MIN_LEN,
            DESCRIPTION_MAX_LEN,
        );
        check_length(&mut violations, "image_url", &self.image_url, 1, IMAGE_URL_MAX_LEN);
        if !(self.price_per_month > 0.0 && self.price_per_month <= PRICE_MAX) {
            violations.push(Violation::PriceOutOfRange {
                max: PRICE_MAX as u32,
            });
        }
        violations
    }

    /// Check the input, returning all violations at once on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated constraint.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

fn check_length(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len == 0 {
        violations.push(Violation::Required { field });
    } else if !(min..=max).contains(&len) {
        violations.push(Violation::Length { field, min, max });
    }
}

/// Listing-row projection shared by the browse, mine, and recent views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSummary {
    pub id: HouseId,
    pub title: String,
    pub address: String,
    pub image_url: String,
    pub price_per_month: f64,
    pub is_rented: bool,
}

impl From<&House> for HouseSummary {
    fn from(house: &House) -> Self {
        Self {
            id: house.id,
            title: house.title.clone(),
            address: house.address.clone(),
            image_url: house.image_url.clone(),
            price_per_month: house.price_per_month,
            is_rented: house.is_rented(),
        }
    }
}

/// Contact details of the agent who listed a house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContact {
    pub phone_number: String,
    /// Email recorded from the identity provider; `None` when the
    /// provider never supplied one.
    pub email: Option<String>,
}

/// Detail projection joining the category name and agent contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseDetails {
    pub id: HouseId,
    pub title: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub price_per_month: f64,
    pub is_rented: bool,
    pub category: String,
    pub agent: AgentContact,
}

/// Sort orders for the browse listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSorting {
    /// Most recently listed first (descending id).
    #[default]
    Newest,
    /// Ascending monthly price.
    Price,
    /// Unrented houses first, newest first within each group.
    NotRentedFirst,
}

/// Parameters for the browse listing query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HouseQuery {
    /// Exact, case-sensitive category-name filter. Blank means "all".
    pub category: Option<String>,
    /// Case-insensitive substring match over title, address, and
    /// description. Blank means "no search".
    pub search_term: Option<String>,
    pub sorting: HouseSorting,
    /// 1-based page number; values below 1 are treated as 1.
    pub page: u32,
    /// Page size; values below 1 are treated as 1.
    pub per_page: u32,
}

/// One page of the browse listing plus the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseQueryResult {
    pub houses: Vec<HouseSummary>,
    /// Size of the filtered set, independent of the requested page.
    pub total_count: u64,
}
