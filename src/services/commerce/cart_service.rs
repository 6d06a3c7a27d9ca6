use crate::{
    catalog::{validation::validate_price, AnyProduct, ProductFields, ProductKind, ProductRef},
    entities::commerce::{
        cart, cart_product, cart_product_link, Cart, CartModel, CartProduct, CartProductLink,
        CartProductModel, Customer,
    },
    entities::{ContentType, ContentTypeModel},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Shopping cart service.
///
/// A cart's product collection is the set of lines linked to it through
/// `cart_product_links`. The stored `total_products` and `final_price` are
/// never updated as a side effect of adding or removing lines: callers either
/// write them with [`CartService::set_totals`] or ask for
/// [`CartService::recount_totals`].
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates an empty cart owned by `owner_id`.
    #[instrument(skip(self))]
    pub async fn create_cart(&self, owner_id: i32) -> Result<CartModel, ServiceError> {
        Customer::find_by_id(owner_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", owner_id))?;

        let cart = cart::ActiveModel {
            owner_id: Set(owner_id),
            total_products: Set(0),
            final_price: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(cart_id = cart.id, owner_id, "Created cart");
        Ok(cart)
    }

    pub async fn carts_for(&self, customer_id: i32) -> Result<Vec<CartModel>, ServiceError> {
        Ok(Cart::find()
            .filter(cart::Column::OwnerId.eq(customer_id))
            .order_by_asc(cart::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Adds a line for `input.product` to the cart's collection.
    ///
    /// The line price is the product's current price times the quantity,
    /// rounded to cents. Cart totals are left as they are.
    #[instrument(skip(self))]
    pub async fn add_product(
        &self,
        cart_id: i32,
        input: AddToCartInput,
    ) -> Result<CartProductModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        Cart::find_by_id(cart_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

        Customer::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", input.customer_id))?;

        let product = input
            .product
            .kind
            .find(&txn, input.product.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", input.product))?;

        let content_type = input.product.kind.content_type(&txn).await?;
        let final_price = (product.price() * Decimal::from(input.quantity)).round_dp(2);
        check_price("final_price", &final_price)?;

        let line = cart_product::ActiveModel {
            customer_id: Set(input.customer_id),
            cart_id: Set(cart_id),
            content_type_id: Set(content_type.id),
            object_id: Set(product.id()),
            quantity: Set(input.quantity),
            final_price: Set(final_price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        CartProductLink::insert(cart_product_link::ActiveModel {
            cart_id: Set(cart_id),
            cart_product_id: Set(line.id),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;

        info!(
            cart_id,
            cart_product_id = line.id,
            product = %input.product,
            quantity = input.quantity,
            "Added product to cart"
        );
        Ok(line)
    }

    /// Deletes a line of the cart. Cart totals are left as they are.
    #[instrument(skip(self))]
    pub async fn remove_product(
        &self,
        cart_id: i32,
        cart_product_id: i32,
    ) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let line = CartProduct::find_by_id(cart_product_id)
            .filter(cart_product::Column::CartId.eq(cart_id))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart product", cart_product_id))?;

        CartProductLink::delete_many()
            .filter(cart_product_link::Column::CartProductId.eq(line.id))
            .exec(&txn)
            .await?;
        line.delete(&txn).await?;

        txn.commit().await?;

        info!(cart_id, cart_product_id, "Removed product from cart");
        Ok(())
    }

    /// Loads the cart with its collection, each line resolved to its product.
    pub async fn get_cart(&self, cart_id: i32) -> Result<CartWithProducts, ServiceError> {
        let cart = self.get_cart_model(cart_id).await?;

        let lines = cart
            .find_related(CartProduct)
            .order_by_asc(cart_product::Column::Id)
            .all(&*self.db)
            .await?;

        let content_types: HashMap<i32, ContentTypeModel> = ContentType::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|ct| (ct.id, ct))
            .collect();

        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let kind = content_types
                .get(&line.content_type_id)
                .and_then(|ct| ProductKind::from_model(&ct.model));
            let product = resolve(&*self.db, kind, line.object_id).await?;
            resolved.push(CartLine { line, product });
        }

        Ok(CartWithProducts {
            cart,
            lines: resolved,
        })
    }

    pub async fn get_cart_model(&self, cart_id: i32) -> Result<CartModel, ServiceError> {
        Cart::find_by_id(cart_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))
    }

    /// Product a line points at, or `None` if that row no longer exists.
    pub async fn content_object(
        &self,
        cart_product_id: i32,
    ) -> Result<Option<AnyProduct>, ServiceError> {
        let line = CartProduct::find_by_id(cart_product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart product", cart_product_id))?;

        let kind = ContentType::find_by_id(line.content_type_id)
            .one(&*self.db)
            .await?
            .and_then(|ct| ProductKind::from_model(&ct.model));

        resolve(&*self.db, kind, line.object_id).await
    }

    /// Overwrites the stored totals with caller-computed values.
    #[instrument(skip(self))]
    pub async fn set_totals(
        &self,
        cart_id: i32,
        total_products: i32,
        final_price: Decimal,
    ) -> Result<CartModel, ServiceError> {
        if total_products < 0 {
            return Err(ServiceError::ValidationError(
                "total_products must not be negative".to_string(),
            ));
        }
        check_price("final_price", &final_price)?;

        let mut active: cart::ActiveModel = self.get_cart_model(cart_id).await?.into();
        active.total_products = Set(total_products);
        active.final_price = Set(final_price);
        Ok(active.update(&*self.db).await?)
    }

    /// Recomputes the totals from the cart's collection and stores them.
    #[instrument(skip(self))]
    pub async fn recount_totals(&self, cart_id: i32) -> Result<CartModel, ServiceError> {
        let txn = self.db.begin().await?;

        let cart = Cart::find_by_id(cart_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

        let lines = cart.find_related(CartProduct).all(&txn).await?;
        let total_products = lines
            .iter()
            .try_fold(0_i32, |total, line| total.checked_add(line.quantity))
            .ok_or_else(|| {
                ServiceError::ValidationError("total_products exceeds the supported range".into())
            })?;
        let final_price = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.final_price))
            .ok_or_else(|| {
                ServiceError::ValidationError("final_price exceeds the supported range".into())
            })?;
        check_price("final_price", &final_price)?;

        let mut active: cart::ActiveModel = cart.into();
        active.total_products = Set(total_products);
        active.final_price = Set(final_price);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(cart_id, total_products, %final_price, "Recounted cart totals");
        Ok(updated)
    }

    /// Deletes the cart, its lines and its collection links. The owner stays.
    #[instrument(skip(self))]
    pub async fn delete_cart(&self, cart_id: i32) -> Result<(), ServiceError> {
        let result = Cart::delete_by_id(cart_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Cart", cart_id));
        }
        info!(cart_id, "Deleted cart");
        Ok(())
    }
}

fn check_price(field: &str, price: &Decimal) -> Result<(), ServiceError> {
    validate_price(price).map_err(|e| ServiceError::ValidationError(format!("{}: {}", field, e)))
}

async fn resolve<C>(
    db: &C,
    kind: Option<ProductKind>,
    object_id: i32,
) -> Result<Option<AnyProduct>, ServiceError>
where
    C: ConnectionTrait,
{
    match kind {
        Some(kind) => Ok(kind.find(db, object_id).await?),
        None => Ok(None),
    }
}

/// Largest quantity a single cart line may carry.
pub const MAX_QUANTITY: i32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddToCartInput {
    pub customer_id: i32,
    pub product: ProductRef,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10000))]
    pub quantity: i32,
}

impl AddToCartInput {
    pub fn new(customer_id: i32, product: ProductRef, quantity: i32) -> Self {
        Self {
            customer_id,
            product,
            quantity,
        }
    }
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct CartWithProducts {
    pub cart: CartModel,
    pub lines: Vec<CartLine>,
}

/// A cart line with the product it points at, if that product still exists.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub line: CartProductModel,
    pub product: Option<AnyProduct>,
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.product {
            Some(product) => write!(f, "Product : {}", product.title()),
            None => write!(f, "Product : #{} (unavailable)", self.line.object_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::notebook;
    use rust_decimal_macros::dec;

    fn line() -> CartProductModel {
        CartProductModel {
            id: 1,
            customer_id: 1,
            cart_id: 1,
            content_type_id: 1,
            object_id: 7,
            quantity: 2,
            final_price: dec!(1998.00),
        }
    }

    #[test]
    fn line_displays_the_product_title() {
        let resolved = CartLine {
            line: line(),
            product: Some(notebook(7)),
        };
        assert_eq!(resolved.to_string(), "Product : Notebook 7");

        let dangling = CartLine {
            line: line(),
            product: None,
        };
        assert_eq!(dangling.to_string(), "Product : #7 (unavailable)");
    }

    #[test]
    fn quantity_defaults_to_one_and_is_bounded() {
        let input: AddToCartInput = serde_json::from_value(serde_json::json!({
            "customer_id": 1,
            "product": { "kind": "smartphone", "id": 3 }
        }))
        .unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.product, ProductRef::smartphone(3));
        assert!(input.validate().is_ok());

        let zero = AddToCartInput::new(1, ProductRef::notebook(1), 0);
        assert!(zero.validate().is_err());

        let huge = AddToCartInput::new(1, ProductRef::notebook(1), i32::MAX);
        assert!(huge.validate().is_err());
        assert!(AddToCartInput::new(1, ProductRef::notebook(1), MAX_QUANTITY)
            .validate()
            .is_ok());
    }
}
