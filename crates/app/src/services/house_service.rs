//! House service — listing queries and the rent/leave lifecycle.

use lettings_domain::category::Category;
use lettings_domain::error::{
    ConflictError, LettingsError, NotFoundError, ValidationErrors, Violation,
};
use lettings_domain::house::{
    AgentContact, House, HouseDetails, HouseInput, HouseQuery, HouseQueryResult, HouseSorting,
    HouseSummary,
};
use lettings_domain::id::{AgentId, CategoryId, HouseId, UserId};

use crate::ports::{CategoryRepository, HouseRepository};

/// Application service for house listings.
///
/// The browse query (filter, sort, paginate) runs here, over the full
/// record set fetched from the repository, so a single implementation
/// of the semantics serves every storage backend.
pub struct HouseService<HR, CR> {
    houses: HR,
    categories: CR,
    strict_renting: bool,
}

impl<HR: HouseRepository, CR: CategoryRepository> HouseService<HR, CR> {
    /// Create a new service backed by the given repositories.
    ///
    /// Renting starts in faithful mode: a pre-check followed by a plain
    /// write, leaving the historical race window open.
    pub fn new(houses: HR, categories: CR) -> Self {
        Self {
            houses,
            categories,
            strict_renting: false,
        }
    }

    /// Switch renting to a conditional update that only succeeds while
    /// the house is vacant; losing the race becomes a typed conflict.
    #[must_use]
    pub fn with_strict_renting(mut self, strict: bool) -> Self {
        self.strict_renting = strict;
        self
    }

    /// The `n` most recently listed houses, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn recent(&self, n: usize) -> Result<Vec<HouseSummary>, LettingsError> {
        let mut records = self.houses.list().await?;
        records.sort_by(|a, b| b.house.id.cmp(&a.house.id));
        Ok(records
            .iter()
            .take(n)
            .map(|r| HouseSummary::from(&r.house))
            .collect())
    }

    /// All category reference rows.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn categories(&self) -> Result<Vec<Category>, LettingsError> {
        self.categories.list().await
    }

    /// Distinct category names, in listing order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn category_names(&self) -> Result<Vec<String>, LettingsError> {
        let mut names: Vec<String> = self
            .categories
            .list()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.dedup();
        Ok(names)
    }

    /// Whether a category row exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn category_exists(&self, id: CategoryId) -> Result<bool, LettingsError> {
        self.categories.exists(id).await
    }

    /// List a new house owned by `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::Validation`] when a field constraint is
    /// violated or the category does not exist, or a storage error.
    pub async fn create(
        &self,
        input: &HouseInput,
        agent_id: AgentId,
    ) -> Result<HouseId, LettingsError> {
        self.validate_input(input).await?;
        self.houses.insert(input, agent_id).await
    }

    /// The browse listing: filter, sort, and paginate.
    ///
    /// Filtering happens first; the total count is taken on the
    /// filtered set before the page window is applied, so pagination
    /// controls stay correct on every page.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn query(&self, query: &HouseQuery) -> Result<HouseQueryResult, LettingsError> {
        let mut records = self.houses.list().await?;

        if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
            records.retain(|r| r.category_name == category);
        }

        if let Some(term) = query.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
            let needle = term.to_lowercase();
            records.retain(|r| {
                r.house.title.to_lowercase().contains(&needle)
                    || r.house.address.to_lowercase().contains(&needle)
                    || r.house.description.to_lowercase().contains(&needle)
            });
        }

        let total_count = records.len() as u64;

        match query.sorting {
            HouseSorting::Price => records.sort_by(|a, b| {
                a.house
                    .price_per_month
                    .total_cmp(&b.house.price_per_month)
            }),
            HouseSorting::NotRentedFirst => records.sort_by(|a, b| {
                a.house
                    .is_rented()
                    .cmp(&b.house.is_rented())
                    .then(b.house.id.cmp(&a.house.id))
            }),
            HouseSorting::Newest => records.sort_by(|a, b| b.house.id.cmp(&a.house.id)),
        }

        let page = query.page.max(1) as usize;
        let per_page = query.per_page.max(1) as usize;
        let houses = records
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|r| HouseSummary::from(&r.house))
            .collect();

        Ok(HouseQueryResult {
            houses,
            total_count,
        })
    }

    /// Houses listed by the given agent.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn by_agent(&self, agent_id: AgentId) -> Result<Vec<HouseSummary>, LettingsError> {
        let houses = self.houses.by_agent(agent_id).await?;
        Ok(houses.iter().map(HouseSummary::from).collect())
    }

    /// Houses currently rented by the given user.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn by_renter(&self, renter: &UserId) -> Result<Vec<HouseSummary>, LettingsError> {
        let houses = self.houses.by_renter(renter).await?;
        Ok(houses.iter().map(HouseSummary::from).collect())
    }

    /// The detail projection joining category name and agent contact.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error from the repository.
    pub async fn details(&self, id: HouseId) -> Result<HouseDetails, LettingsError> {
        let house = self.get_house(id).await?;
        let category = self
            .categories
            .name(house.category_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Category",
                id: house.category_id.to_string(),
            })?;
        let owner = self.houses.owner(id).await?.ok_or_else(|| NotFoundError {
            entity: "House",
            id: id.to_string(),
        })?;

        Ok(HouseDetails {
            id: house.id,
            title: house.title,
            address: house.address,
            description: house.description,
            image_url: house.image_url,
            price_per_month: house.price_per_month,
            is_rented: house.renter_id.is_some(),
            category,
            agent: AgentContact {
                phone_number: owner.phone_number,
                email: owner.email,
            },
        })
    }

    /// Whether a house row exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn exists(&self, id: HouseId) -> Result<bool, LettingsError> {
        Ok(self.houses.get(id).await?.is_some())
    }

    /// Replace every mutable field of a house.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::Validation`] on field or category
    /// violations, [`LettingsError::NotFound`] when the house is
    /// missing, or a storage error.
    pub async fn edit(&self, id: HouseId, input: &HouseInput) -> Result<(), LettingsError> {
        self.validate_input(input).await?;
        if self.houses.update(id, input).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Whether the house was listed by an agent owned by `user_id`.
    /// A missing house owns nobody.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn owned_by(&self, id: HouseId, user_id: &UserId) -> Result<bool, LettingsError> {
        Ok(self
            .houses
            .owner(id)
            .await?
            .is_some_and(|owner| &owner.user_id == user_id))
    }

    /// The category a house belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error.
    pub async fn category_id(&self, id: HouseId) -> Result<CategoryId, LettingsError> {
        Ok(self.get_house(id).await?.category_id)
    }

    /// Delete a house.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error.
    pub async fn delete(&self, id: HouseId) -> Result<(), LettingsError> {
        if self.houses.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Whether the house currently has a renter.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error.
    pub async fn is_rented(&self, id: HouseId) -> Result<bool, LettingsError> {
        Ok(self.get_house(id).await?.is_rented())
    }

    /// Whether the house is currently rented by the given user.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error.
    pub async fn is_rented_by(
        &self,
        id: HouseId,
        user_id: &UserId,
    ) -> Result<bool, LettingsError> {
        Ok(self.get_house(id).await?.renter_id.as_ref() == Some(user_id))
    }

    /// Rent the house to `renter`. The house must currently be vacant.
    ///
    /// In faithful mode the vacancy check and the write are separate
    /// steps; concurrent calls can interleave between them. Strict mode
    /// folds both into one conditional update.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// [`LettingsError::Conflict`] when it is already rented, or a
    /// storage error.
    pub async fn rent(&self, id: HouseId, renter: &UserId) -> Result<(), LettingsError> {
        let house = self.get_house(id).await?;
        if self.strict_renting {
            if !self.houses.rent_if_vacant(id, renter).await? {
                return Err(ConflictError::HouseAlreadyRented.into());
            }
        } else {
            if house.is_rented() {
                return Err(ConflictError::HouseAlreadyRented.into());
            }
            self.houses.set_renter(id, Some(renter)).await?;
        }
        tracing::info!(house_id = %id, "house rented");
        Ok(())
    }

    /// Clear the renter unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when the house is missing,
    /// or a storage error.
    pub async fn leave(&self, id: HouseId) -> Result<(), LettingsError> {
        if self.houses.set_renter(id, None).await? {
            tracing::info!(house_id = %id, "house left");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    async fn get_house(&self, id: HouseId) -> Result<House, LettingsError> {
        self.houses.get(id).await?.ok_or_else(|| not_found(id))
    }

    async fn validate_input(&self, input: &HouseInput) -> Result<(), LettingsError> {
        let mut violations = input.violations();
        if !self.categories.exists(input.category_id).await? {
            violations.push(Violation::UnknownCategory(input.category_id));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations).into())
        }
    }
}

fn not_found(id: HouseId) -> LettingsError {
    NotFoundError {
        entity: "House",
        id: id.to_string(),
    }
    .into()
}
