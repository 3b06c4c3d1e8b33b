use async_graphql::{Context, Error, Object, Result};
use uuid::Uuid;

use infra::payload::{IndividualEntry, IndividualPayload, ResultPayload, TeamPayload};
use infra::repos::notifications::signboard_request_message;
use infra::repos::{
    NewCompetitionResult, NewStudent, NotificationRepo, ProfileRepo, ResultRepo, StudentRepo,
};

use crate::gql::types::{
    AssignSummary, ChangeSummary, CompetitionResult, Division, RemoveSummary, SaveResultInput,
    Student, StudentInput,
};
use crate::state::AppState;

pub struct MutationRoot;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[Object]
impl MutationRoot {
    async fn create_student(&self, ctx: &Context<'_>, input: StudentInput) -> Result<Student> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let data = NewStudent::from(input).normalized()?;
        let row = repo.create(data).await?;
        Ok(row.into())
    }

    async fn update_student(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: StudentInput,
    ) -> Result<Student> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let data = NewStudent::from(input).normalized()?;
        let row = repo
            .update(id, data)
            .await?
            .ok_or_else(|| Error::new("student not found"))?;
        Ok(row.into())
    }

    async fn delete_student(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        Ok(repo.delete(id).await?)
    }

    /// Put the selected students into the club's first free slot; students
    /// already in the club or with both slots taken are skipped.
    async fn assign_students_to_club(
        &self,
        ctx: &Context<'_>,
        student_ids: Vec<Uuid>,
        target_club: String,
    ) -> Result<AssignSummary> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let summary = repo.assign_to_club(&student_ids, &target_club).await?;
        Ok(summary.into())
    }

    /// Remove the club from the selected students, promoting the secondary
    /// slot when the primary is vacated.
    async fn remove_students_from_club(
        &self,
        ctx: &Context<'_>,
        student_ids: Vec<Uuid>,
        target_club: String,
    ) -> Result<RemoveSummary> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let summary = repo.remove_from_club(&student_ids, &target_club).await?;
        Ok(summary.into())
    }

    /// Rewrite one club membership to another, in place.
    async fn change_students_club(
        &self,
        ctx: &Context<'_>,
        student_ids: Vec<Uuid>,
        from_club: String,
        to_club: String,
    ) -> Result<ChangeSummary> {
        let state = ctx.data::<AppState>()?;
        let repo = StudentRepo::new(state.db.clone());
        let summary = repo.change_club(&student_ids, &from_club, &to_club).await?;
        Ok(summary.into())
    }

    /// Store a competition result. Individual divisions fan out into one
    /// record per entry.
    async fn save_competition_result(
        &self,
        ctx: &Context<'_>,
        input: SaveResultInput,
    ) -> Result<Vec<CompetitionResult>> {
        let state = ctx.data::<AppState>()?;
        let repo = ResultRepo::new(state.db.clone());

        let club_name = input.club_name.trim().to_owned();
        if club_name.is_empty() {
            return Err(Error::new("club name must not be empty"));
        }
        let competition_name = blank_to_none(input.competition_name);
        let special_prizes = blank_to_none(input.special_prizes);

        let mut created = Vec::new();
        match input.division {
            Division::Team => {
                let members: Vec<String> = input
                    .members
                    .unwrap_or_default()
                    .into_iter()
                    .map(|m| m.trim().to_owned())
                    .filter(|m| !m.is_empty())
                    .collect();
                let payload = ResultPayload::Team(TeamPayload {
                    members,
                    score: blank_to_none(input.score),
                    rank: blank_to_none(input.rank),
                    opponent: blank_to_none(input.opponent),
                    round: blank_to_none(input.round),
                    ..Default::default()
                });
                let row = repo
                    .create(NewCompetitionResult {
                        profile_id: input.profile_id,
                        club_name,
                        competition_name,
                        payload,
                        special_prizes,
                        date: input.date,
                        end_date: input.end_date,
                    })
                    .await?;
                created.push(row.into());
            }
            Division::Individual => {
                let entries = input.entries.unwrap_or_default();
                if entries.is_empty() {
                    return Err(Error::new("individual results need at least one entry"));
                }
                for entry in entries {
                    let payload = ResultPayload::Individual(IndividualPayload {
                        entries: vec![IndividualEntry {
                            student_name: entry.student_name.trim().to_owned(),
                            result: blank_to_none(entry.result),
                            score: blank_to_none(entry.score),
                            rank: blank_to_none(entry.rank),
                            ..Default::default()
                        }],
                    });
                    let row = repo
                        .create(NewCompetitionResult {
                            profile_id: input.profile_id,
                            club_name: club_name.clone(),
                            competition_name: competition_name.clone(),
                            payload,
                            special_prizes: special_prizes.clone(),
                            date: input.date,
                            end_date: input.end_date,
                        })
                        .await?;
                    created.push(row.into());
                }
            }
        }
        Ok(created)
    }

    /// Notify every signboard manager and flag the result as requested.
    /// The two writes are independent; if the flag update fails the
    /// notifications stay delivered.
    async fn request_signboard(&self, ctx: &Context<'_>, result_id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let result_repo = ResultRepo::new(state.db.clone());
        let profile_repo = ProfileRepo::new(state.db.clone());
        let notification_repo = NotificationRepo::new(state.db.clone());

        let result = result_repo
            .get(result_id)
            .await?
            .ok_or_else(|| Error::new("competition result not found"))?;

        let managers = profile_repo.signboard_manager_ids().await?;
        if managers.is_empty() {
            return Ok(false);
        }

        let message = signboard_request_message(
            &result.club_name,
            result.competition_name.as_deref().unwrap_or(""),
        );
        notification_repo.create_many(&managers, &message).await?;
        result_repo.set_signboard_requested(result_id).await?;
        Ok(true)
    }

    async fn mark_notification_read(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let repo = NotificationRepo::new(state.db.clone());
        Ok(repo.mark_read(id, user_id).await?)
    }

    /// Point an adviser profile at the club it manages.
    async fn update_assigned_club(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        club_name: String,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let repo = ProfileRepo::new(state.db.clone());
        Ok(repo.update_assigned_club(user_id, &club_name).await?)
    }
}
