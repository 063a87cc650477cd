use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Client, ClientFilter, ClientPayload, StringUuid};
use crate::error::{AppError, Result};
use crate::repository::ClientRepository;
use crate::validation::ValidatedClient;

pub struct ClientService<C> {
    clients: Arc<C>,
}

impl<C: ClientRepository> ClientService<C> {
    pub fn new(clients: Arc<C>) -> Self {
        Self { clients }
    }

    pub async fn create(&self, payload: ClientPayload) -> Result<Client> {
        let validated = ValidatedClient::from_payload(payload)?;
        let now = Utc::now();
        let client = Client {
            id: StringUuid::new_v4(),
            name: validated.name,
            email: validated.email,
            phone: validated.phone,
            industry: validated.industry,
            notes: validated.notes,
            created_at: now,
            updated_at: now,
        };
        self.clients.create(&client).await?;
        Ok(client)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Client> {
        self.clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("client not found".into()))
    }

    pub async fn list(
        &self,
        filter: ClientFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Client>, i64)> {
        let total = self.clients.count(&filter).await?;
        let clients = self.clients.list(&filter, offset, limit).await?;
        Ok((clients, total))
    }

    pub async fn update(&self, id: StringUuid, payload: ClientPayload) -> Result<Client> {
        let validated = ValidatedClient::from_payload(payload)?;
        let mut client = self.get(id).await?;
        client.name = validated.name;
        client.email = validated.email;
        client.phone = validated.phone;
        client.industry = validated.industry;
        client.notes = validated.notes;
        client.updated_at = Utc::now();
        self.clients.update(&client).await?;
        Ok(client)
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        if !self.clients.delete(id).await? {
            return Err(AppError::NotFound("client not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::client::MockClientRepository;
    use mockall::predicate::eq;

    fn payload(name: &str) -> ClientPayload {
        ClientPayload {
            name: name.into(),
            email: None,
            phone: None,
            industry: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_sanitizes_name() {
        let mut repo = MockClientRepository::new();
        repo.expect_create()
            .withf(|c: &Client| c.name == "Acme Corp")
            .returning(|_| Ok(()));
        let service = ClientService::new(Arc::new(repo));

        let client = service.create(payload("  <b>Acme</b> Corp ")).await.unwrap();
        assert_eq!(client.name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_name() {
        let service = ClientService::new(Arc::new(MockClientRepository::new()));
        let err = service.create(payload("A")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let id = StringUuid::new_v4();
        let mut repo = MockClientRepository::new();
        repo.expect_find_by_id().with(eq(id)).returning(|_| Ok(None));
        let service = ClientService::new(Arc::new(repo));

        let err = service.get(id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repo = MockClientRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        let service = ClientService::new(Arc::new(repo));

        let err = service.delete(StringUuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let id = StringUuid::new_v4();
        let created = Utc::now() - chrono::Duration::days(30);
        let mut repo = MockClientRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            Ok(Some(Client {
                id,
                name: "Old Name".into(),
                email: None,
                phone: None,
                industry: None,
                notes: String::new(),
                created_at: created,
                updated_at: created,
            }))
        });
        repo.expect_update().returning(|_| Ok(()));
        let service = ClientService::new(Arc::new(repo));

        let client = service.update(id, payload("New Name")).await.unwrap();
        assert_eq!(client.name, "New Name");
        assert!(client.updated_at > client.created_at);
    }
}
