//! Category — static reference data a house belongs to.

use serde::{Deserialize, Serialize};

use crate::id::CategoryId;

/// A house category such as "Cottage" or "Duplex".
///
/// Categories are seeded reference rows; names are unique and there is
/// no category CRUD surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
