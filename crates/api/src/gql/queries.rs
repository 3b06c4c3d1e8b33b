use async_graphql::{Context, Object, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use infra::academic_year;
use infra::dashboard::{build_dashboard, DashboardView, ResultSearch};
use infra::export::results_to_csv;
use infra::pagination::LimitOffset;
use infra::repos::{
    NotificationRepo, ProfileRepo, ResultFilter, ResultRepo, StudentRepo, StudentSearch,
};

use crate::gql::types::{Notification, ResultDashboard, Student, StudentPage, UserProfile};
use crate::state::AppState;

pub struct QueryRoot;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Run the primary narrowing query and the in-memory filter pipeline.
/// A failed fetch degrades to an empty dashboard instead of erroring.
async fn load_dashboard(state: &AppState, filter: ResultFilter, search: ResultSearch) -> DashboardView {
    let repo = ResultRepo::new(state.db.clone());
    let rows = match repo.list(&filter).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(error = %err, "competition result fetch failed");
            Vec::new()
        }
    };
    build_dashboard(rows, &search)
}

#[Object]
impl QueryRoot {
    /// Dashboard search: academic year / date range / club narrow the store
    /// query, keyword and the selected dropdowns narrow the fetched list.
    #[allow(clippy::too_many_arguments)]
    async fn competition_results(
        &self,
        ctx: &Context<'_>,
        academic_year: Option<i32>,
        club_name: Option<String>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        keyword: Option<String>,
        selected_club: Option<String>,
        selected_class: Option<String>,
        selected_student: Option<String>,
    ) -> Result<ResultDashboard> {
        let state = ctx.data::<AppState>()?;
        let filter = ResultFilter {
            club_name,
            academic_year,
            date_from,
            date_to,
        };
        let search = ResultSearch {
            keyword: blank_to_none(keyword),
            club: blank_to_none(selected_club),
            class_label: blank_to_none(selected_class),
            student: blank_to_none(selected_student),
        };
        let view = load_dashboard(state, filter, search).await;
        Ok(ResultDashboard {
            results: view.results.into_iter().map(Into::into).collect(),
            club_options: view.facets.clubs,
            class_options: view.facets.classes,
            student_options: view.facets.students,
        })
    }

    /// Same filters as `competitionResults`, rendered as the guidance-record
    /// CSV (UTF-8 with BOM).
    #[allow(clippy::too_many_arguments)]
    async fn results_csv(
        &self,
        ctx: &Context<'_>,
        academic_year: Option<i32>,
        club_name: Option<String>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        keyword: Option<String>,
        selected_club: Option<String>,
        selected_class: Option<String>,
        selected_student: Option<String>,
    ) -> Result<String> {
        let state = ctx.data::<AppState>()?;
        let filter = ResultFilter {
            club_name,
            academic_year,
            date_from,
            date_to,
        };
        let search = ResultSearch {
            keyword: blank_to_none(keyword),
            club: blank_to_none(selected_club),
            class_label: blank_to_none(selected_class),
            student: blank_to_none(selected_student),
        };
        let view = load_dashboard(state, filter, search).await;
        Ok(results_to_csv(&view.results))
    }

    /// Members of one club (either slot), kana order.
    async fn students(&self, ctx: &Context<'_>, club_name: String) -> Result<Vec<Student>> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let rows = repo.list_for_club(&club_name).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Whole-school paging search backing the assignment modal.
    async fn search_students(
        &self,
        ctx: &Context<'_>,
        grade_class_num: Option<String>,
        name: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<StudentPage> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let filter = StudentSearch {
            grade_class_num,
            name,
        };
        let page = LimitOffset::clamped(limit, offset);
        let (rows, total) = repo.search(filter, page).await?;
        Ok(StudentPage {
            students: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Every club name currently present in either membership slot.
    async fn club_names(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        let state = ctx.data::<AppState>()?;
        let repo = ProfileRepo::new(state.db.clone());
        Ok(repo.unique_club_names().await?)
    }

    /// The selectable academic years: current plus the five before it.
    async fn academic_years(&self) -> Vec<i32> {
        academic_year::available_years(Utc::now().date_naive())
    }

    async fn current_academic_year(&self) -> i32 {
        academic_year::academic_year_of(Utc::now().date_naive())
    }

    /// Adviser profile: assigned club and signboard-manager flag.
    async fn user_profile(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<Option<UserProfile>> {
        let state = ctx.data::<AppState>()?;
        let repo = ProfileRepo::new(state.db.clone());
        Ok(repo.get(user_id).await?.map(Into::into))
    }

    async fn unread_notifications(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
    ) -> Result<Vec<Notification>> {
        let state = ctx.data::<AppState>()?;
        let repo = NotificationRepo::new(state.db.clone());
        let rows = repo.unread_for_user(user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
