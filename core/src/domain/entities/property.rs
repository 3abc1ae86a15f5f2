//! Property entity: a listed address with its owner, optional broker and
//! derived occupant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Postal address of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub neighborhood: String,
    pub number: i32,
    pub complement: Option<String>,
}

/// Property entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Unique identifier for the property
    pub id: Uuid,

    #[serde(flatten)]
    pub address: Address,

    /// Owner; the only user allowed to edit, delete or rent out the property
    pub owner_id: Uuid,

    /// Optional broker handling the listing
    pub broker_id: Option<Uuid>,

    /// Current tenant. Only the rental agreement engine writes this.
    pub occupant_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Creates a vacant property
    pub fn new(address: Address, owner_id: Uuid, broker_id: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            owner_id,
            broker_id,
            occupant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Whether a tenant currently occupies the property
    pub fn is_rented(&self) -> bool {
        self.occupant_id.is_some()
    }

    /// Replaces address and broker; the occupant is left untouched
    pub fn update_listing(&mut self, address: Address, broker_id: Option<Uuid>, now: DateTime<Utc>) {
        self.address = address;
        self.broker_id = broker_id;
        self.updated_at = now;
    }

    pub fn set_occupant(&mut self, occupant_id: Option<Uuid>, now: DateTime<Utc>) {
        self.occupant_id = occupant_id;
        self.updated_at = now;
    }
}
