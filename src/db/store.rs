use super::models::{AssessmentDoc, UserDoc};
use anyhow::{Context, Result};
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::info;

/// Data access layer over the users and assessments collections.
pub struct Store {
    users: Collection<UserDoc>,
    assessments: Collection<AssessmentDoc>,
}

impl Store {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection("users"),
            assessments: db.collection("assessments"),
        }
    }

    /// Look up a user by email.
    pub async fn find_user(&self, email: &str) -> Result<Option<UserDoc>> {
        self.users
            .find_one(doc! { "email": email }, None)
            .await
            .context("Failed to query user")
    }

    /// Fetch an existing user by email or create one. Creation is keyed
    /// on email, so repeated sign-ins stay idempotent.
    pub async fn find_or_create_user(
        &self,
        username: &str,
        email: &str,
        token: Option<&str>,
    ) -> Result<UserDoc> {
        if let Some(user) = self.find_user(email).await? {
            return Ok(user);
        }

        let mut user = UserDoc::new(
            username.to_string(),
            email.to_string(),
            token.map(str::to_string),
        );

        let result = self
            .users
            .insert_one(&user, None)
            .await
            .context("Failed to create user")?;

        user.id = result.inserted_id.as_object_id();

        info!("Created user {}", email);

        Ok(user)
    }

    /// All users, in insertion order.
    pub async fn list_users(&self) -> Result<Vec<UserDoc>> {
        let cursor = self
            .users
            .find(doc! {}, None)
            .await
            .context("Failed to list users")?;

        cursor.try_collect().await.context("Failed to read users")
    }

    /// All assessments referenced by a user, in the order the user's
    /// reference list records them.
    pub async fn assessments_for(&self, user: &UserDoc) -> Result<Vec<AssessmentDoc>> {
        if user.assessments.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .assessments
            .find(doc! { "_id": { "$in": &user.assessments } }, None)
            .await
            .context("Failed to query assessments")?;

        let mut found: Vec<AssessmentDoc> = cursor
            .try_collect()
            .await
            .context("Failed to read assessments")?;

        // Reorder to match the user's reference list
        let mut ordered = Vec::with_capacity(found.len());
        for id in &user.assessments {
            if let Some(pos) = found.iter().position(|a| a.id.as_ref() == Some(id)) {
                ordered.push(found.swap_remove(pos));
            }
        }

        Ok(ordered)
    }

    /// Insert an assessment and link it to the user.
    ///
    /// Two separate writes, matching the historical behavior: if the
    /// link write fails the assessment document is left orphaned rather
    /// than rolled back.
    pub async fn save_assessment(&self, user: &UserDoc, data: String) -> Result<AssessmentDoc> {
        let mut assessment = AssessmentDoc::new(data);

        let result = self
            .assessments
            .insert_one(&assessment, None)
            .await
            .context("Failed to insert assessment")?;

        assessment.id = result.inserted_id.as_object_id();

        let assessment_id = assessment
            .id
            .context("Assessment insert returned no object id")?;

        self.users
            .update_one(
                doc! { "email": &user.email },
                doc! {
                    "$push": { "assessments": assessment_id },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
                None,
            )
            .await
            .context("Failed to link assessment to user")?;

        info!("Saved assessment {} for {}", assessment_id.to_hex(), user.email);

        Ok(assessment)
    }

    /// Fetch one assessment by id. Ownership is the caller's concern.
    pub async fn fetch_assessment(&self, id: &ObjectId) -> Result<Option<AssessmentDoc>> {
        self.assessments
            .find_one(doc! { "_id": id }, None)
            .await
            .context("Failed to query assessment")
    }

    /// Delete an assessment and drop the user's reference to it.
    ///
    /// Same two-step shape as saving: the delete happens first and the
    /// unlink is not rolled back on failure.
    pub async fn delete_assessment(&self, user: &UserDoc, id: &ObjectId) -> Result<()> {
        self.assessments
            .delete_one(doc! { "_id": id }, None)
            .await
            .context("Failed to delete assessment")?;

        self.users
            .update_one(
                doc! { "email": &user.email },
                doc! {
                    "$pull": { "assessments": id },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
                None,
            )
            .await
            .context("Failed to unlink assessment from user")?;

        info!("Deleted assessment {} for {}", id.to_hex(), user.email);

        Ok(())
    }
}
