use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Product, ProductFilter, ProductPayload, StockOperation, StockUpdatePayload, StringUuid,
};
use crate::error::{AppError, Result};
use crate::repository::{is_unique_violation, ProductRepository};
use crate::validation::{ValidatedProduct, ValidationError};

pub struct ProductService<P> {
    products: Arc<P>,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    pub async fn create(&self, payload: ProductPayload) -> Result<Product> {
        let validated = ValidatedProduct::from_payload(payload)?;
        let now = Utc::now();
        let product = Product {
            id: StringUuid::new_v4(),
            name: validated.name,
            description: validated.description,
            price: validated.price,
            category: validated.category,
            sku: validated.sku,
            stock: validated.stock,
            is_active: validated.is_active,
            created_at: now,
            updated_at: now,
        };
        match self.products.create(&product).await {
            Err(AppError::Database(err)) if is_unique_violation(&err) => Err(AppError::Conflict(
                "a product with this SKU already exists".into(),
            )),
            Err(err) => Err(err),
            Ok(()) => Ok(product),
        }
    }

    pub async fn get(&self, id: StringUuid) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("product not found".into()))
    }

    pub async fn list(
        &self,
        filter: ProductFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Product>, i64)> {
        let total = self.products.count(&filter).await?;
        let products = self.products.list(&filter, offset, limit).await?;
        Ok((products, total))
    }

    pub async fn update(&self, id: StringUuid, payload: ProductPayload) -> Result<Product> {
        let validated = ValidatedProduct::from_payload(payload)?;
        let mut product = self.get(id).await?;
        product.name = validated.name;
        product.description = validated.description;
        product.price = validated.price;
        product.category = validated.category;
        product.sku = validated.sku;
        product.stock = validated.stock;
        product.is_active = validated.is_active;
        product.updated_at = Utc::now();
        match self.products.update(&product).await {
            Err(AppError::Database(err)) if is_unique_violation(&err) => Err(AppError::Conflict(
                "a product with this SKU already exists".into(),
            )),
            Err(err) => Err(err),
            Ok(()) => Ok(product),
        }
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(AppError::NotFound("product not found".into()));
        }
        Ok(())
    }

    /// Applies a stock movement. Subtracting below zero clamps to zero
    /// rather than failing, so oversold stock never goes negative.
    pub async fn adjust_stock(
        &self,
        id: StringUuid,
        payload: StockUpdatePayload,
    ) -> Result<Product> {
        if payload.quantity < 0 {
            return Err(ValidationError::new("quantity", "must not be negative").into());
        }
        let mut product = self.get(id).await?;
        product.stock = match payload.operation {
            StockOperation::Add => product.stock.saturating_add(payload.quantity),
            StockOperation::Subtract => (product.stock - payload.quantity).max(0),
            StockOperation::Set => payload.quantity,
        };
        self.products.set_stock(id, product.stock).await?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::repository::product::MockProductRepository;
    use rust_decimal::Decimal;

    fn stored(id: StringUuid, stock: i64) -> Product {
        Product {
            id,
            name: "Widget".into(),
            description: String::new(),
            price: Decimal::new(1999, 2),
            category: Category::Product,
            sku: Some("W-1".into()),
            stock,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subtract_clamps_at_zero() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, 3))));
        repo.expect_set_stock()
            .withf(|_, stock| *stock == 0)
            .returning(|_, _| Ok(()));
        let service = ProductService::new(Arc::new(repo));

        let product = service
            .adjust_stock(
                StringUuid::new_v4(),
                StockUpdatePayload {
                    operation: StockOperation::Subtract,
                    quantity: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_add_and_set_stock() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, 5))));
        repo.expect_set_stock().returning(|_, _| Ok(()));
        let service = ProductService::new(Arc::new(repo));

        let added = service
            .adjust_stock(
                StringUuid::new_v4(),
                StockUpdatePayload {
                    operation: StockOperation::Add,
                    quantity: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(added.stock, 7);

        let set = service
            .adjust_stock(
                StringUuid::new_v4(),
                StockUpdatePayload {
                    operation: StockOperation::Set,
                    quantity: 42,
                },
            )
            .await
            .unwrap();
        assert_eq!(set.stock, 42);
    }

    #[tokio::test]
    async fn test_negative_quantity_is_rejected() {
        let service = ProductService::new(Arc::new(MockProductRepository::new()));
        let err = service
            .adjust_stock(
                StringUuid::new_v4(),
                StockUpdatePayload {
                    operation: StockOperation::Add,
                    quantity: -1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rounds_price() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().returning(|_| Ok(()));
        let service = ProductService::new(Arc::new(repo));

        let product = service
            .create(ProductPayload {
                name: "Widget".into(),
                description: None,
                price: 19.999,
                category: None,
                sku: None,
                stock: None,
                is_active: None,
            })
            .await
            .unwrap();
        assert_eq!(product.price, Decimal::new(2000, 2));
    }
}
