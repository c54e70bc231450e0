//! Tank model: a monitored water tank and where it sits.

use serde::{Deserialize, Serialize};

use super::DocumentId;

/// A stored water tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: DocumentId,
    pub location: String,
    pub lat: f64,
    pub long: f64,
}

/// Request body for creating a new tank.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTank {
    pub location: String,
    pub lat: f64,
    pub long: f64,
}

impl NewTank {
    pub fn into_tank(self, id: DocumentId) -> Tank {
        Tank {
            id,
            location: self.location,
            lat: self.lat,
            long: self.long,
        }
    }
}

/// Request body for updating an existing tank. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TankPatch {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
}

impl TankPatch {
    /// True when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.lat.is_none() && self.long.is_none()
    }

    /// Merge the present fields into `tank`.
    pub fn apply(&self, tank: &mut Tank) {
        if let Some(location) = &self.location {
            tank.location = location.clone();
        }
        if let Some(lat) = self.lat {
            tank.lat = lat;
        }
        if let Some(long) = self.long {
            tank.long = long;
        }
    }
}
