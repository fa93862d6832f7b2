use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use super::{Database, Store, keys};
use crate::error::QuoteError;
use crate::models::{Quote, QuoteDraft, new_id};

impl<S: Store> Database<S> {
    /// Quotes of one user, newest first. Quotes from the same day keep their saved order.
    /// Totals are always derived from the stored line items and percentages.
    pub async fn load_quotes(&self, owner_email: &str) -> Result<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self.list_owned(keys::QUOTES, owner_email).await?;
        quotes.iter_mut().for_each(Quote::recompute_totals);
        quotes.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        Ok(quotes)
    }

    pub async fn get_quote(&self, owner_email: &str, id: &str) -> Result<Option<Quote>> {
        let quote: Option<Quote> = self.find_owned(keys::QUOTES, owner_email, id).await?;
        Ok(quote.map(|mut quote| {
            quote.recompute_totals();
            quote
        }))
    }

    /// Persist a draft. A new draft gets a fresh id and today's date; an edited one
    /// keeps its id, owner and creation date. Totals are stored as computed now.
    pub async fn save_quote(
        &self,
        owner_email: &str,
        draft: &QuoteDraft,
        today: NaiveDate,
    ) -> Result<Quote, QuoteError> {
        draft.validate()?;

        let Some(id) = &draft.id else {
            let quote = draft.to_quote(new_id(), today, owner_email);
            self.append(keys::QUOTES, quote.clone()).await?;
            info!(id = %quote.id, total = quote.totals.general_total, "quote created");
            return Ok(quote);
        };

        let updated = self
            .update_owned(keys::QUOTES, owner_email, id, |stored: &mut Quote| {
                *stored = draft.to_quote(stored.id.clone(), stored.created_on, &stored.owner_email);
            })
            .await?;

        match updated {
            Some(quote) => {
                info!(id = %quote.id, total = quote.totals.general_total, "quote updated");
                Ok(quote)
            }
            None => Err(QuoteError::NotFound(id.clone())),
        }
    }

    pub async fn delete_quote(&self, owner_email: &str, id: &str) -> Result<bool> {
        let removed = self.delete_owned::<Quote>(keys::QUOTES, owner_email, id).await?;
        if removed {
            info!(id, "quote deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::db::{Store, keys, memory_db};
    use crate::error::{QuoteError, ValidationError};
    use crate::models::{Material, QuoteDraft, Unit};

    const OWNER: &str = "marceneiro@example.com";

    fn catalog() -> Vec<Material> {
        vec![Material {
            id: "mdf".to_string(),
            name: "MDF 15mm".to_string(),
            category: "Chapas".to_string(),
            unit: Unit::SquareMeter,
            unit_price: 10.0,
            owner_email: OWNER.to_string(),
        }]
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn draft(title: &str) -> QuoteDraft {
        let mut draft = QuoteDraft::new();
        draft.title = title.to_string();
        draft.margin_input = "20".to_string();
        draft.add_line_item(&catalog(), Some("mdf"), "2").unwrap();
        draft
    }

    #[tokio::test]
    async fn save_then_get_returns_the_same_quote() {
        let db = memory_db();
        let saved = db.save_quote(OWNER, &draft("Cozinha"), day(10)).await.unwrap();

        assert_eq!(saved.created_on, day(10));
        assert_eq!(saved.totals.general_total, 24.0);
        let loaded = db.get_quote(OWNER, &saved.id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn editing_keeps_id_and_creation_date() {
        let db = memory_db();
        let saved = db.save_quote(OWNER, &draft("Cozinha"), day(10)).await.unwrap();

        let mut edit = QuoteDraft::from_quote(&saved);
        edit.title = "Cozinha planejada".to_string();
        edit.margin_input = "50".to_string();
        let updated = db.save_quote(OWNER, &edit, day(20)).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_on, day(10));
        assert_eq!(updated.title, "Cozinha planejada");
        assert_eq!(updated.totals.general_total, 30.0);
        assert_eq!(db.load_quotes(OWNER).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn editing_a_deleted_quote_is_not_found() {
        let db = memory_db();
        let saved = db.save_quote(OWNER, &draft("Cozinha"), day(10)).await.unwrap();
        let edit = QuoteDraft::from_quote(&saved);
        db.delete_quote(OWNER, &saved.id).await.unwrap();

        let err = db.save_quote(OWNER, &edit, day(11)).await.unwrap_err();
        assert!(matches!(err, QuoteError::NotFound(id) if id == saved.id));
    }

    #[tokio::test]
    async fn incomplete_drafts_write_nothing() {
        let db = memory_db();
        let err = db.save_quote(OWNER, &QuoteDraft::new(), day(10)).await.unwrap_err();

        assert!(matches!(err, QuoteError::Validation(ValidationError::IncompleteQuote)));
        assert!(db.load_quotes(OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quotes_are_listed_newest_first_and_stable_within_a_day() {
        let db = memory_db();
        db.save_quote(OWNER, &draft("A"), day(1)).await.unwrap();
        db.save_quote(OWNER, &draft("B"), day(5)).await.unwrap();
        db.save_quote(OWNER, &draft("C"), day(5)).await.unwrap();

        let titles: Vec<String> = db
            .load_quotes(OWNER)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.title)
            .collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn quotes_are_private_to_their_owner() {
        let db = memory_db();
        let saved = db.save_quote(OWNER, &draft("Cozinha"), day(10)).await.unwrap();

        assert!(db.load_quotes("outro@example.com").await.unwrap().is_empty());
        assert!(!db.delete_quote("outro@example.com", &saved.id).await.unwrap());
        assert!(db.get_quote(OWNER, &saved.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_stored_totals_are_recomputed_on_load() {
        let db = memory_db();
        let stored = r#"[{
            "id": "q1",
            "title": "Estante",
            "date": "10/05/2024",
            "lineItems": [{"id": "l1", "materialId": "mdf", "name": "MDF 15mm", "unit": "m²",
                           "unitPrice": 10.0, "quantity": 2.0, "total": 20.0}],
            "marginPercent": 20,
            "ownerEmail": "marceneiro@example.com"
        }]"#;
        db.store.put(keys::QUOTES, stored).await.unwrap();

        let listed = db.load_quotes(OWNER).await.unwrap();
        assert_eq!(listed[0].totals.materials, 20.0);
        assert_eq!(listed[0].totals.general_total, 24.0);

        let quote = db.get_quote(OWNER, "q1").await.unwrap().unwrap();
        assert_eq!(quote.totals, quote.compute_totals());
        assert_eq!(quote.totals.installment_total, 24.0);
    }

    #[tokio::test]
    async fn saving_keeps_other_users_quotes_next_to_a_malformed_one() {
        let db = memory_db();
        let other = draft("Deck").to_quote("b1".to_string(), day(3), "b@example.com");
        let stored = format!(
            r#"[{}, {{"id": "b2", "title": "Mesa", "date": "May 10", "ownerEmail": "b@example.com"}}]"#,
            serde_json::to_string(&other).unwrap()
        );
        db.store.put(keys::QUOTES, &stored).await.unwrap();

        db.save_quote(OWNER, &draft("Cozinha"), day(10)).await.unwrap();

        let raw = db.store.get(keys::QUOTES).await.unwrap().unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1]["date"], "May 10");
        assert_eq!(db.load_quotes("b@example.com").await.unwrap(), vec![other]);
        assert_eq!(db.load_quotes(OWNER).await.unwrap().len(), 1);
    }
}
