use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Sale, SaleFilter, SalePayload, SaleWithClient, StringUuid};
use crate::error::{AppError, Result};
use crate::repository::{ClientRepository, SaleRepository};
use crate::validation::ValidatedSale;

pub struct SaleService<S, C> {
    sales: Arc<S>,
    clients: Arc<C>,
}

impl<S: SaleRepository, C: ClientRepository> SaleService<S, C> {
    pub fn new(sales: Arc<S>, clients: Arc<C>) -> Self {
        Self { sales, clients }
    }

    async fn ensure_client_exists(&self, id: StringUuid) -> Result<()> {
        if self.clients.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("client not found".into()));
        }
        Ok(())
    }

    pub async fn create(&self, payload: SalePayload) -> Result<SaleWithClient> {
        let validated = ValidatedSale::from_payload(payload)?;
        self.ensure_client_exists(validated.client_id).await?;

        let now = Utc::now();
        let sale = Sale {
            id: StringUuid::new_v4(),
            client_id: validated.client_id,
            amount: validated.amount,
            description: validated.description,
            date: validated.date,
            status: validated.status,
            created_at: now,
            updated_at: now,
        };
        self.sales.create(&sale).await?;
        self.get(sale.id).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<SaleWithClient> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("sale not found".into()))
    }

    pub async fn list(
        &self,
        filter: SaleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<SaleWithClient>, i64)> {
        let total = self.sales.count(&filter).await?;
        let sales = self.sales.list(&filter, offset, limit).await?;
        Ok((sales, total))
    }

    pub async fn update(&self, id: StringUuid, payload: SalePayload) -> Result<SaleWithClient> {
        let validated = ValidatedSale::from_payload(payload)?;
        self.ensure_client_exists(validated.client_id).await?;
        let existing = self.get(id).await?;

        let sale = Sale {
            id,
            client_id: validated.client_id,
            amount: validated.amount,
            description: validated.description,
            date: validated.date,
            status: validated.status,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.sales.update(&sale).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        if !self.sales.delete(id).await? {
            return Err(AppError::NotFound("sale not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, SaleStatus};
    use crate::repository::client::MockClientRepository;
    use crate::repository::sale::MockSaleRepository;
    use rust_decimal::Decimal;

    fn client(id: StringUuid) -> Client {
        Client {
            id,
            name: "Acme".into(),
            email: None,
            phone: None,
            industry: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn joined(sale: &Sale) -> SaleWithClient {
        SaleWithClient {
            id: sale.id,
            client_id: sale.client_id,
            amount: sale.amount,
            description: sale.description.clone(),
            date: sale.date,
            status: sale.status,
            created_at: sale.created_at,
            updated_at: sale.updated_at,
            client_name: Some("Acme".into()),
            client_email: None,
        }
    }

    fn payload(client_id: StringUuid, amount: f64) -> SalePayload {
        SalePayload {
            client_id: client_id.to_string(),
            amount,
            description: Some("consulting".into()),
            date: "2024-06-01".into(),
            status: Some("paid".into()),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_client() {
        let mut clients = MockClientRepository::new();
        clients.expect_find_by_id().returning(|_| Ok(None));
        let service = SaleService::new(Arc::new(MockSaleRepository::new()), Arc::new(clients));

        let err = service
            .create(payload(StringUuid::new_v4(), 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rounds_amount_and_embeds_client() {
        let client_id = StringUuid::new_v4();
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |id| Ok(Some(client(id))));

        let mut sales = MockSaleRepository::new();
        sales.expect_create().returning(move |sale| {
            assert_eq!(sale.amount, Decimal::new(10000, 2)); // 99.995 -> 100.00
            Ok(())
        });
        sales.expect_find_by_id().returning(move |id| {
            let sale = Sale {
                id,
                client_id,
                amount: Decimal::new(10000, 2),
                description: "consulting".into(),
                date: Utc::now(),
                status: SaleStatus::Paid,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            Ok(Some(joined(&sale)))
        });

        let service = SaleService::new(Arc::new(sales), Arc::new(clients));
        let sale = service.create(payload(client_id, 99.995)).await.unwrap();
        assert_eq!(sale.amount, Decimal::new(10000, 2));
        assert_eq!(sale.client_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_amount() {
        let service = SaleService::new(
            Arc::new(MockSaleRepository::new()),
            Arc::new(MockClientRepository::new()),
        );
        let err = service
            .create(payload(StringUuid::new_v4(), -5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut sales = MockSaleRepository::new();
        sales.expect_delete().returning(|_| Ok(false));
        let service = SaleService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));

        let err = service.delete(StringUuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
