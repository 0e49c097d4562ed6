use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::testimonial,
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTestimonialInput {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[serde(default)]
    pub customer_location: Option<String>,
    #[validate(length(min = 1, message = "Testimonial text is required"))]
    pub testimonial_text: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTestimonialInput {
    pub customer_name: Option<String>,
    pub customer_location: Option<String>,
    pub testimonial_text: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

/// Admin-managed customer testimonials. Plain CRUD; the landing page only
/// ever sees the active ones.
#[derive(Clone)]
pub struct TestimonialService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl TestimonialService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<testimonial::Model>, ServiceError> {
        testimonial::Entity::find()
            .filter(testimonial::Column::IsActive.eq(true))
            .order_by_asc(testimonial::Column::DisplayOrder)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<testimonial::Model>, ServiceError> {
        testimonial::Entity::find()
            .order_by_asc(testimonial::Column::DisplayOrder)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get_testimonial(&self, id: Uuid) -> Result<testimonial::Model, ServiceError> {
        testimonial::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Testimonial {} not found", id)))
    }

    #[instrument(skip(self, input), fields(customer_name = %input.customer_name))]
    pub async fn create_testimonial(
        &self,
        input: CreateTestimonialInput,
    ) -> Result<testimonial::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = testimonial::ActiveModel {
            id: Set(id),
            customer_name: Set(input.customer_name),
            customer_location: Set(input.customer_location),
            testimonial_text: Set(input.testimonial_text),
            rating: Set(input.rating),
            is_verified: Set(input.is_verified),
            is_active: Set(input.is_active),
            display_order: Set(input.display_order),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::TestimonialCreated(id))
            .await;
        info!(testimonial_id = %id, "Testimonial created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_testimonial(
        &self,
        id: Uuid,
        input: UpdateTestimonialInput,
    ) -> Result<testimonial::Model, ServiceError> {
        input.validate()?;

        let existing = self.get_testimonial(id).await?;
        let mut active: testimonial::ActiveModel = existing.into();

        if let Some(customer_name) = input.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(customer_location) = input.customer_location {
            active.customer_location = Set(Some(customer_location));
        }
        if let Some(testimonial_text) = input.testimonial_text {
            active.testimonial_text = Set(testimonial_text);
        }
        if let Some(rating) = input.rating {
            active.rating = Set(rating);
        }
        if let Some(is_verified) = input.is_verified {
            active.is_verified = Set(is_verified);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::TestimonialUpdated(id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_testimonial(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_testimonial(id).await?;
        existing.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::TestimonialDeleted(id))
            .await;
        info!(testimonial_id = %id, "Testimonial deleted");
        Ok(())
    }
}
