use serde::{Deserialize, Serialize};

use crate::search::Searchable;
use crate::user::User;

pub type VehicleId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub license_plate: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Vehicle {
    pub fn new(
        id: impl Into<VehicleId>,
        vehicle_make: impl Into<String>,
        vehicle_model: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle_make: vehicle_make.into(),
            vehicle_model: vehicle_model.into(),
            license_plate: license_plate.into(),
            vin: None,
            users: Vec::new(),
        }
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.vehicle_make, self.vehicle_model)
    }
}

impl Searchable for Vehicle {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.vehicle_make.as_str(),
            self.vehicle_model.as_str(),
            self.license_plate.as_str(),
        ];
        if let Some(vin) = self.vin.as_deref() {
            fields.push(vin);
        }
        for user in &self.users {
            fields.extend(user.name.as_deref());
            fields.extend(user.first_name.as_deref());
        }
        fields
    }
}
