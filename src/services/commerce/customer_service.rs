use crate::{
    entities::commerce::{customer, Customer, CustomerModel},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Customer profiles. Users themselves live elsewhere and are referenced by id.
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn create(&self, input: CustomerInput) -> Result<CustomerModel, ServiceError> {
        input.validate()?;

        let customer = customer::ActiveModel {
            user_id: Set(input.user_id),
            phone: Set(input.phone),
            address: Set(input.address),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(customer_id = customer.id, "Created customer");
        Ok(customer)
    }

    pub async fn get(&self, id: i32) -> Result<CustomerModel, ServiceError> {
        Customer::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    /// Profiles attached to `user_id`. Usually one, but nothing enforces it.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CustomerModel>, ServiceError> {
        Ok(Customer::find()
            .filter(customer::Column::UserId.eq(user_id))
            .order_by_asc(customer::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Deletes the customer along with their carts and cart lines.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = Customer::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Customer", id));
        }
        info!(customer_id = id, "Deleted customer");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    pub user_id: i64,
    #[validate(length(max = 20))]
    pub phone: String,
    #[validate(length(max = 255))]
    pub address: String,
}
