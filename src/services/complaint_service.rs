use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Complaint, ComplaintResponse, CreateComplaintRequest, UpdateStatusRequest, User};
use crate::services::access::{Action, ListScope};
use crate::services::auth_service::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Loads the complaint and checks `action` against the policy.
async fn authorized(
    state: &AppState,
    user: &AuthenticatedUser,
    id: &str,
    action: Action,
) -> Result<Complaint, AppError> {
    let complaint = state
        .complaints
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::complaint_not_found)?;

    if !state.policy.decide(user, action, &complaint).is_permitted() {
        log::warn!("🚫 {:?} on complaint {} denied for user {}", action, id, user.id);
        return Err(AppError::not_authorized());
    }

    Ok(complaint)
}

/// Replaces submitter ids with the submitters' public info.
async fn with_submitters(
    state: &AppState,
    complaints: Vec<Complaint>,
) -> Result<Vec<ComplaintResponse>, AppError> {
    let mut ids: Vec<String> = complaints.iter().map(|c| c.submitted_by.clone()).collect();
    ids.sort();
    ids.dedup();

    let users: HashMap<String, User> = state
        .users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id.to_hex(), u))
        .collect();

    Ok(complaints
        .into_iter()
        .map(|c| {
            let submitter = users.get(&c.submitted_by);
            ComplaintResponse::with_submitter(c, submitter)
        })
        .collect())
}

pub async fn create(
    state: &AppState,
    user: &AuthenticatedUser,
    request: &CreateComplaintRequest,
) -> Result<ComplaintResponse, AppError> {
    let fields = request.validate().map_err(AppError::Validation)?;
    let complaint = state.complaints.insert(Complaint::new(fields, &user.id)).await?;

    log::info!("✅ Complaint {} submitted by {} ({})", complaint.id.to_hex(), user.name, user.id);
    Ok(complaint.into())
}

pub async fn list(state: &AppState, user: &AuthenticatedUser) -> Result<Vec<ComplaintResponse>, AppError> {
    match state.policy.list_scope(user) {
        ListScope::All => {
            let complaints = state.complaints.find_all().await?;
            with_submitters(state, complaints).await
        }
        ListScope::SubmittedBy(user_id) => {
            let complaints = state.complaints.find_by_submitter(&user_id).await?;
            Ok(complaints.into_iter().map(ComplaintResponse::from).collect())
        }
    }
}

pub async fn get_by_id(
    state: &AppState,
    user: &AuthenticatedUser,
    id: &str,
) -> Result<ComplaintResponse, AppError> {
    let complaint = authorized(state, user, id, Action::View).await?;
    let submitter = state.users.find_by_id(&complaint.submitted_by).await?;
    Ok(ComplaintResponse::with_submitter(complaint, submitter.as_ref()))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthenticatedUser,
    id: &str,
    request: &UpdateStatusRequest,
) -> Result<ComplaintResponse, AppError> {
    if !state.policy.can_administer(user) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    let status = request.validate().map_err(AppError::Validation)?;

    authorized(state, user, id, Action::UpdateStatus).await?;

    // Last write wins on concurrent updates
    let updated = state
        .complaints
        .update_status(id, status)
        .await?
        .ok_or_else(AppError::complaint_not_found)?;

    log::info!("🔄 Complaint {} set to {} by {}", id, status, user.id);
    Ok(updated.into())
}

pub async fn delete(state: &AppState, user: &AuthenticatedUser, id: &str) -> Result<DeleteResponse, AppError> {
    authorized(state, user, id, Action::Delete).await?;

    if !state.complaints.delete(id).await? {
        return Err(AppError::complaint_not_found());
    }

    log::info!("🗑️ Complaint {} removed by {}", id, user.id);
    Ok(DeleteResponse {
        success: true,
        message: "Complaint removed".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplaintStatus, Role, SubmittedBy};
    use crate::state::test_state;

    async fn account(state: &AppState, username: &str, role: Role) -> AuthenticatedUser {
        let user = User::new(
            username,
            username,
            &format!("{}@example.com", username),
            "hash".into(),
            role,
        );
        let user = state.users.insert(user).await.unwrap();
        AuthenticatedUser {
            id: user.id.to_hex(),
            name: user.name,
            role,
        }
    }

    fn request(description: &str) -> CreateComplaintRequest {
        CreateComplaintRequest {
            name: Some("Jane".into()),
            email: Some("jane@example.com".into()),
            contact: Some("555-0100".into()),
            description: Some(description.into()),
        }
    }

    fn status(value: &str) -> UpdateStatusRequest {
        UpdateStatusRequest {
            status: Some(value.into()),
        }
    }

    #[tokio::test]
    async fn test_created_complaint_is_pending_and_owned() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;

        let created = create(&state, &jane, &request("Broken window")).await.unwrap();
        assert_eq!(created.status, ComplaintStatus::Pending);
        assert_eq!(created.submitted_by, SubmittedBy::Id(jane.id.clone()));
    }

    #[tokio::test]
    async fn test_invalid_create_stores_nothing() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;

        let mut bad = request("Broken window");
        bad.email = Some("jane".into());
        let err = create(&state, &jane, &bad).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref errors) if errors[0].field == "email"));
        assert!(state.complaints.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_scoped_by_role() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let john = account(&state, "john", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;

        create(&state, &jane, &request("one")).await.unwrap();
        create(&state, &jane, &request("two")).await.unwrap();
        create(&state, &john, &request("three")).await.unwrap();

        let mine = list(&state, &jane).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.submitted_by == SubmittedBy::Id(jane.id.clone())));

        let everything = list(&state, &admin).await.unwrap();
        assert_eq!(everything.len(), 3);
        assert!(everything
            .iter()
            .all(|c| matches!(c.submitted_by, SubmittedBy::User(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_visibility() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let john = account(&state, "john", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;
        let id = create(&state, &jane, &request("mine")).await.unwrap().id;

        let own = get_by_id(&state, &jane, &id).await.unwrap();
        match own.submitted_by {
            SubmittedBy::User(info) => assert_eq!(info.username, "jane"),
            other => panic!("submitter not joined: {:?}", other),
        }

        assert!(get_by_id(&state, &admin, &id).await.is_ok());
        assert!(matches!(
            get_by_id(&state, &john, &id).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            get_by_id(&state, &jane, "abc123").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_updates_status() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;
        let id = create(&state, &jane, &request("heater")).await.unwrap().id;

        let updated = update_status(&state, &admin, &id, &status("resolved")).await.unwrap();
        assert_eq!(updated.status, ComplaintStatus::Resolved);

        let stored = state.complaints.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, ComplaintStatus::Resolved);
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_record_unchanged() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;
        let id = create(&state, &jane, &request("heater")).await.unwrap().id;

        for bad in ["closed", "", "RESOLVED"] {
            let err = update_status(&state, &admin, &id, &status(bad)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        let stored = state.complaints.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_status_errors() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;
        let id = create(&state, &jane, &request("heater")).await.unwrap().id;

        assert!(matches!(
            update_status(&state, &jane, &id, &status("resolved")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            update_status(&state, &admin, "64b7f0c2a1b2c3d4e5f60718", &status("resolved")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let state = test_state();
        let jane = account(&state, "jane", Role::Student).await;
        let john = account(&state, "john", Role::Student).await;
        let admin = account(&state, "admin", Role::Admin).await;

        let first = create(&state, &jane, &request("one")).await.unwrap().id;
        let second = create(&state, &jane, &request("two")).await.unwrap().id;

        assert!(matches!(
            delete(&state, &john, &first).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(state.complaints.find_by_id(&first).await.unwrap().is_some());

        let removed = delete(&state, &jane, &first).await.unwrap();
        assert_eq!(removed.message, "Complaint removed");
        assert!(delete(&state, &admin, &second).await.is_ok());

        assert!(matches!(
            delete(&state, &admin, &first).await,
            Err(AppError::NotFound(_))
        ));
    }
}
