use anyhow::{Context, Result};

use super::cases::LOGS_WITH_NAMES_SQL;
use super::SqliteStore;
use crate::model::{
    Contact, ContactDetail, ContactFilter, ContactSummary, ContactUpdate, Id, NewContact,
};
use crate::store::db::{like_pattern, Conditions, SqlParam, UpdateSet};
use crate::store::traits::{CaseContactStore, ContactStore};

#[async_trait::async_trait]
impl ContactStore for SqliteStore {
    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactSummary>> {
        let mut sql = r#"
            SELECT
                c.*,
                COUNT(DISTINCT cc.case_id) AS case_count
            FROM contacts c
            LEFT JOIN case_contacts cc ON c.id = cc.contact_id
        "#
        .to_string();

        let mut conditions = Conditions::new();
        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            conditions.push(
                "(c.name LIKE ? OR c.email LIKE ? OR c.phone LIKE ?)",
                [
                    SqlParam::from(&pattern),
                    SqlParam::from(&pattern),
                    SqlParam::from(pattern),
                ],
            );
        }
        let params = conditions.apply(&mut sql);
        sql.push_str(" GROUP BY c.id ORDER BY c.name, c.id");

        self.db
            .query(&sql, &params)
            .await
            .context("Failed to list contacts")
    }

    async fn get_contact(&self, id: Id) -> Result<Option<Contact>> {
        self.db
            .get("SELECT * FROM contacts WHERE id = ?", &[id.into()])
            .await
            .context("Failed to fetch contact")
    }

    async fn contact_exists(&self, id: Id) -> Result<bool> {
        self.db
            .exists("SELECT id FROM contacts WHERE id = ?", &[id.into()])
            .await
            .context("Failed to check contact")
    }

    async fn create_contact(&self, new_contact: &NewContact) -> Result<Contact> {
        let result = self
            .db
            .run(
                "INSERT INTO contacts (name, email, phone, address, notes) VALUES (?, ?, ?, ?, ?)",
                &[
                    new_contact.name.trim().into(),
                    new_contact.email.as_deref().into(),
                    new_contact.phone.as_deref().into(),
                    new_contact.address.as_deref().into(),
                    new_contact.notes.as_deref().into(),
                ],
            )
            .await
            .context("Failed to create contact")?;

        self.get_contact(result.last_insert_rowid)
            .await?
            .context("Created contact disappeared")
    }

    async fn update_contact(&self, id: Id, update: &ContactUpdate) -> Result<Option<Contact>> {
        let mut set = UpdateSet::new();
        set.set_if("name", update.name.as_deref().map(str::trim))
            .set_if("email", update.email.clone())
            .set_if("phone", update.phone.clone())
            .set_if("address", update.address.clone())
            .set_if("notes", update.notes.clone());

        if !set.is_empty() {
            let (sql, params) = set.into_statement("contacts", id);
            self.db
                .run(&sql, &params)
                .await
                .context("Failed to update contact")?;
        }

        self.get_contact(id).await
    }

    async fn delete_contact(&self, id: Id) -> Result<bool> {
        let result = self
            .db
            .run("DELETE FROM contacts WHERE id = ?", &[id.into()])
            .await
            .context("Failed to delete contact")?;
        Ok(result.changes > 0)
    }

    async fn get_contact_detail(&self, id: Id) -> Result<Option<ContactDetail>> {
        let Some(contact) = self.get_contact(id).await? else {
            return Ok(None);
        };

        let roles = self.cross_case_roles(id).await?;
        let interactions = self
            .db
            .query(
                &format!("{} WHERE cl.contact_id = ? ORDER BY cl.contact_date DESC", LOGS_WITH_NAMES_SQL),
                &[id.into()],
            )
            .await
            .context("Failed to fetch contact interactions")?;

        Ok(Some(ContactDetail {
            contact,
            roles,
            interactions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::model::NewCaseContact;

    #[tokio::test]
    async fn test_list_contacts_with_search_and_case_count() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        let maria = store
            .create_contact(&NewContact {
                name: "Maria Johnson".to_string(),
                email: Some("maria@example.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        test_support::contact(&store, "Dr. Sarah").await;

        store
            .link_contact(
                case.id,
                &NewCaseContact {
                    contact_id: Some(maria.id),
                    role: "PARENT".to_string(),
                    role_notes: None,
                },
            )
            .await
            .unwrap();

        let all = store.list_contacts(&ContactFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].contact.name, "Dr. Sarah");
        assert_eq!(all[0].case_count, 0);
        assert_eq!(all[1].case_count, 1);

        let found = store
            .list_contacts(&ContactFilter {
                search: Some("example.com".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].contact.id, maria.id);
    }

    #[tokio::test]
    async fn test_update_contact_clears_nullable_field() {
        let store = test_support::store().await;
        let contact = store
            .create_contact(&NewContact {
                name: "Tom Reed".to_string(),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let update: ContactUpdate =
            serde_json::from_value(serde_json::json!({"phone": null, "email": "tom@example.com"})).unwrap();
        let updated = store.update_contact(contact.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Tom Reed");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.email.as_deref(), Some("tom@example.com"));
    }

    #[tokio::test]
    async fn test_delete_contact_cascades_links() {
        let store = test_support::store().await;
        let case = test_support::case(&store, "Johnson Family", None).await;
        let contact = test_support::contact(&store, "Maria Johnson").await;
        store
            .link_contact(
                case.id,
                &NewCaseContact {
                    contact_id: Some(contact.id),
                    role: "PARENT".to_string(),
                    role_notes: None,
                },
            )
            .await
            .unwrap();

        assert!(store.delete_contact(contact.id).await.unwrap());
        assert!(store.list_case_contacts(case.id).await.unwrap().is_empty());
        assert!(!store.delete_contact(contact.id).await.unwrap());
    }
}
