//! Course operations and the average-cost hook

use super::model::{Course, CreateCourse};
use crate::config::ListingConfig;
use crate::core::entity::Document;
use crate::core::error::ApiResult;
use crate::core::filter::{Condition, Filter, FilterOp};
use crate::core::query::{ListQuery, Projection, QueryMap};
use crate::core::repository::{ListResult, Repository};
use crate::core::store::{AverageAggregation, DocumentStore, Populate};
use crate::entities::bootcamp::Bootcamp;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Parent bootcamp as attached to courses
fn bootcamp_summary() -> Populate {
    Populate::parent("bootcamp", Bootcamp::resource_name())
        .select(Projection::from_fields(["name", "description"]))
}

#[derive(Clone)]
pub struct CourseService {
    courses: Repository<Course>,
    bootcamps: Repository<Bootcamp>,
    listing: ListingConfig,
}

impl CourseService {
    pub fn new(store: Arc<dyn DocumentStore>, listing: ListingConfig) -> Self {
        Self {
            courses: Repository::new(store.clone()),
            bootcamps: Repository::new(store),
            listing,
        }
    }

    /// Paginated listing of all courses with their bootcamp's name and description
    pub async fn list(&self, params: &QueryMap) -> ApiResult<ListResult> {
        let query = ListQuery::from_query_map(params, &self.listing, Course::default_sort())
            .with_populate(bootcamp_summary());
        self.courses.list(&query).await
    }

    /// Paginated listing of one bootcamp's courses
    pub async fn list_for_bootcamp(
        &self,
        bootcamp: &Uuid,
        params: &QueryMap,
    ) -> ApiResult<ListResult> {
        let mut query = ListQuery::from_query_map(params, &self.listing, Course::default_sort());
        query.filter = query.filter.and(Condition::new(
            "bootcamp",
            FilterOp::Eq,
            bootcamp.to_string(),
        ));
        self.courses.list(&query).await
    }

    /// A course with its bootcamp's name and description
    pub async fn get(&self, id: &Uuid) -> ApiResult<Value> {
        self.courses.get_populated(id, &[bootcamp_summary()]).await
    }

    /// Add a course to an existing bootcamp
    pub async fn create(&self, bootcamp: &Uuid, payload: CreateCourse) -> ApiResult<Course> {
        let bootcamp = self.bootcamps.get(bootcamp).await?;
        payload.validate()?;

        let course = self.courses.create(payload.into_course(bootcamp.id)).await?;
        self.refresh_average_cost(&course.bootcamp).await;
        Ok(course)
    }

    pub async fn update(&self, id: &Uuid, patch: Value) -> ApiResult<Course> {
        let existing = self.courses.get(id).await?;
        let course = self.courses.update(&existing, patch).await?;

        if course.tuition != existing.tuition {
            self.refresh_average_cost(&course.bootcamp).await;
        }
        Ok(course)
    }

    pub async fn delete(&self, id: &Uuid) -> ApiResult<()> {
        let course = self.courses.get(id).await?;
        self.courses.delete(&course.id).await?;
        self.refresh_average_cost(&course.bootcamp).await;
        Ok(())
    }

    /// Mean tuition of a bootcamp's courses, `None` when it has none
    pub async fn average_cost(&self, bootcamp: &Uuid) -> ApiResult<Option<f64>> {
        let aggregation = AverageAggregation {
            match_filter: Filter::eq("bootcamp", bootcamp.to_string()),
            group_by: "bootcamp".to_string(),
            average_of: "tuition".to_string(),
        };
        let groups = self.courses.average(&aggregation).await?;
        Ok(groups.first().map(|group| group.average))
    }

    /// Recompute and store a bootcamp's `averageCost`
    ///
    /// Failures are logged and never fail the triggering request.
    pub async fn refresh_average_cost(&self, bootcamp: &Uuid) {
        tracing::debug!(bootcamp = %bootcamp, "calculating average cost");

        let result = async {
            let average = self.average_cost(bootcamp).await?;
            let mut changes = Map::new();
            changes.insert(
                "averageCost".to_string(),
                average.map(Value::from).unwrap_or(Value::Null),
            );
            self.bootcamps.set_fields(bootcamp, changes).await?;
            ApiResult::Ok(average)
        }
        .await;

        match result {
            Ok(average) => {
                tracing::info!(bootcamp = %bootcamp, average_cost = ?average, "updated average cost")
            }
            Err(e) => {
                tracing::warn!(bootcamp = %bootcamp, error = %e, "failed to update average cost")
            }
        }
    }
}
