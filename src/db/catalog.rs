use anyhow::Result;
use tracing::info;

use super::{Database, Store, keys};
use crate::models::{Category, Material, new_id};

impl<S: Store> Database<S> {
    /// Materials of one user, in insertion order.
    pub async fn load_materials(&self, owner_email: &str) -> Result<Vec<Material>> {
        self.list_owned(keys::MATERIALS, owner_email).await
    }

    /// Store a new material under a fresh id and return it.
    pub async fn create_material(&self, mut material: Material) -> Result<Material> {
        material.id = new_id();
        self.append(keys::MATERIALS, material.clone()).await?;
        info!(id = %material.id, name = %material.name, "material created");

        Ok(material)
    }

    /// Overwrite the editable fields of an existing material. Quotes keep their copies.
    pub async fn update_material(&self, material: &Material) -> Result<Option<Material>> {
        self.update_owned(keys::MATERIALS, &material.owner_email, &material.id, |stored: &mut Material| {
            stored.name = material.name.clone();
            stored.category = material.category.clone();
            stored.unit = material.unit;
            stored.unit_price = material.unit_price;
        })
        .await
    }

    pub async fn delete_material(&self, owner_email: &str, id: &str) -> Result<bool> {
        let removed = self.delete_owned::<Material>(keys::MATERIALS, owner_email, id).await?;
        if removed {
            info!(id, "material deleted");
        }
        Ok(removed)
    }

    pub async fn load_categories(&self, owner_email: &str) -> Result<Vec<Category>> {
        self.list_owned(keys::CATEGORIES, owner_email).await
    }

    pub async fn create_category(&self, owner_email: &str, name: &str) -> Result<Category> {
        let category = Category {
            id: new_id(),
            name: name.trim().to_string(),
            owner_email: owner_email.to_string(),
        };
        self.append(keys::CATEGORIES, category.clone()).await?;
        info!(id = %category.id, name = %category.name, "category created");

        Ok(category)
    }

    /// Materials keep the category name they were saved with.
    pub async fn delete_category(&self, owner_email: &str, id: &str) -> Result<bool> {
        self.delete_owned::<Category>(keys::CATEGORIES, owner_email, id).await
    }
}
