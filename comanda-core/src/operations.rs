use crate::{
    Category, Client, Entity, Error, Executor, Identity, Order, OrderStatus, Product, Record,
    Result, StaffMember, StoreProfile,
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Result of resolving a store by its slug.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLookup {
    Active(StoreProfile),
    /// The store exists but was disabled by the platform administrator.
    Suspended(StoreProfile),
    NotFound,
}

impl StoreLookup {
    pub fn store(&self) -> Option<&StoreProfile> {
        match self {
            StoreLookup::Active(v) | StoreLookup::Suspended(v) => Some(v),
            StoreLookup::NotFound => None,
        }
    }
}

/// Url friendly form of a store name: lower case ascii letters and digits, anything else
/// replaced by a dash.
pub fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Copy of `orders` where the order `id` has the new status, the others are unchanged.
///
/// Used for the optimistic view of the caller while the status update is being written.
pub fn with_status(orders: &[Order], id: &str, status: &OrderStatus) -> Vec<Order> {
    orders
        .iter()
        .map(|order| {
            if order.id == id {
                Order {
                    status: status.clone(),
                    ..order.clone()
                }
            } else {
                order.clone()
            }
        })
        .collect()
}

impl<E: Executor + 'static> Client<E> {
    pub async fn load_store(&self, slug: &str) -> Result<StoreLookup> {
        let store = self
            .table(StoreProfile::TABLE)
            .filter_eq("slug", slug)
            .fetch_one_as::<StoreProfile>()
            .await?;
        Ok(match store {
            Some(store) if store.is_active => StoreLookup::Active(store),
            Some(store) => StoreLookup::Suspended(store),
            None => StoreLookup::NotFound,
        })
    }

    /// Most recently created first.
    pub async fn list_stores(&self) -> Result<Vec<StoreProfile>> {
        self.table(StoreProfile::TABLE)
            .order_by("createdAt", false)
            .fetch_all_as()
            .await
    }

    /// The slug is derived from the name when empty, the creation time is set when missing.
    pub async fn create_store(&self, store: &StoreProfile) -> Result<StoreProfile> {
        let mut store = store.clone();
        if store.slug.is_empty() {
            store.slug = slugify(&store.name);
        }
        if store.slug.is_empty() {
            return Err(Error::msg("A store needs either a slug or a name"));
        }
        if store.created_at == OffsetDateTime::UNIX_EPOCH {
            store.created_at = OffsetDateTime::now_utc();
        }
        let mut record = store.to_record();
        record.insert("settings", store.settings.to_string());
        let rows = self.table(StoreProfile::TABLE).insert([record]).await?;
        Ok(rows.first().map(StoreProfile::from_row).unwrap_or(store))
    }

    /// Rewrites the descriptive fields of an existing store.
    pub async fn update_store_profile(&self, store: &StoreProfile) -> Result<()> {
        let Some(id) = store.id else {
            return Err(Error::msg(format!(
                "Cannot update the store `{}` without an id",
                store.slug
            )));
        };
        let patch = Record::new()
            .set("name", &store.name)
            .set("slug", &store.slug)
            .set("address", &store.address)
            .set("whatsapp", &store.whatsapp)
            .set("logoUrl", &store.logo_url)
            .set("settings", store.settings.to_string());
        self.table(StoreProfile::TABLE)
            .filter_eq("id", id)
            .update(patch)
            .await
            .map(|_| ())
    }

    pub async fn set_store_active(&self, id: Uuid, active: bool) -> Result<()> {
        self.table(StoreProfile::TABLE)
            .filter_eq("id", id)
            .update(Record::new().set("isActive", active))
            .await
            .map(|_| ())
    }

    /// Settings are stored serialized.
    pub async fn save_store_settings(&self, id: Uuid, settings: &serde_json::Value) -> Result<()> {
        self.table(StoreProfile::TABLE)
            .filter_eq("id", id)
            .update(Record::new().set("settings", settings.to_string()))
            .await
            .map(|_| ())
    }

    pub async fn products(&self, store_id: Uuid) -> Result<Vec<Product>> {
        self.table(Product::TABLE)
            .filter_eq("store_id", store_id)
            .fetch_all_as()
            .await
    }

    /// Updates the product if its id exists, inserts it otherwise. A product without an id
    /// gets a generated one.
    pub async fn save_product(&self, product: &Product) -> Result<Product> {
        let mut product = product.clone();
        if product.id.is_empty() {
            product.id = Uuid::new_v4().simple().to_string();
        }
        let rows = self
            .table(Product::TABLE)
            .upsert([product.to_record()])
            .await?;
        Ok(rows.first().map(Product::from_row).unwrap_or(product))
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.table(Product::TABLE).filter_eq("id", id).delete().await
    }

    /// Category names of the store.
    pub async fn categories(&self, store_id: Uuid) -> Result<Vec<String>> {
        Ok(self
            .category_entries(store_id)
            .await?
            .into_iter()
            .map(|v| v.name)
            .collect())
    }

    pub async fn category_entries(&self, store_id: Uuid) -> Result<Vec<Category>> {
        self.table(Category::TABLE)
            .filter_eq("store_id", store_id)
            .fetch_all_as()
            .await
    }

    /// Fails when the name is blank or already used in the store.
    pub async fn add_category(&self, store_id: Uuid, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::msg("The category name cannot be blank"));
        }
        let category = Category {
            store_id: Some(store_id),
            name: name.to_string(),
            ..Default::default()
        };
        let rows = self
            .table(Category::TABLE)
            .insert([category.to_record()])
            .await?;
        Ok(rows.first().map(Category::from_row).unwrap_or(category))
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.table(Category::TABLE).filter_eq("id", id).delete().await
    }

    /// Latest `window` orders, most recent first. Without a store every store is included.
    pub async fn recent_orders(&self, store_id: Option<Uuid>, window: u32) -> Result<Vec<Order>> {
        self.table(Order::TABLE)
            .filter_eq("store_id", store_id)
            .order_by("id", false)
            .limit(window)
            .fetch_all_as()
            .await
    }

    /// Inserts a new order, the id is assigned by the store.
    pub async fn place_order(&self, order: &Order) -> Result<Order> {
        let mut order = order.clone();
        if order.created_at == OffsetDateTime::UNIX_EPOCH {
            order.created_at = OffsetDateTime::now_utc();
        }
        let mut record = order.to_record();
        record.remove("id");
        record.insert("items", order.items.to_string());
        let rows = self.table(Order::TABLE).insert([record]).await?;
        Ok(rows.first().map(Order::from_row).unwrap_or(order))
    }

    pub async fn update_order_status(&self, id: &str, status: &OrderStatus) -> Result<()> {
        self.table(Order::TABLE)
            .filter_eq("id", id)
            .update(Record::new().set("status", status.label()))
            .await
            .map(|_| ())
    }

    pub async fn staff(&self, store_id: Uuid) -> Result<Vec<Identity>> {
        self.table(Identity::TABLE)
            .filter_eq("store_id", store_id)
            .fetch_all_as()
            .await
    }

    pub async fn add_staff(&self, member: &StaffMember) -> Result<Identity> {
        if member.name.trim().is_empty() || member.password.is_empty() {
            return Err(Error::msg("A staff member needs a name and a password"));
        }
        let rows = self
            .table(StaffMember::TABLE)
            .insert([member.to_record()])
            .await?;
        Ok(rows
            .first()
            .map(Identity::from_row)
            .unwrap_or_else(|| Identity {
                id: member.id.map(|v| v.to_string()).unwrap_or_default(),
                name: member.name.clone(),
                role: member.role.clone(),
            }))
    }

    pub async fn delete_staff(&self, id: Uuid) -> Result<()> {
        self.table(StaffMember::TABLE)
            .filter_eq("id", id)
            .delete()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Pizzaria do Zé"), "pizzaria-do-z-");
        assert_eq!(slugify("  Bar 42 "), "bar-42");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn status_overlay() {
        let orders = vec![
            Order {
                id: "1".into(),
                status: OrderStatus::Preparing,
                ..Default::default()
            },
            Order {
                id: "2".into(),
                ..Default::default()
            },
        ];
        let overlay = with_status(&orders, "1", &OrderStatus::Ready);
        assert_eq!(overlay[0].status, OrderStatus::Ready);
        assert_eq!(overlay[1], orders[1]);
        assert_eq!(orders[0].status, OrderStatus::Preparing);
        assert_eq!(with_status(&orders, "9", &OrderStatus::Canceled), orders);
    }
}
