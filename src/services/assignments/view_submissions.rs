use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireSession;
use crate::models::submissions::responses::ViewSubmissionsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::AssignmentService;

pub async fn handle_view_submissions(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "作业不存在")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    // 只能查看自己布置的作业
    if assignment.teacher_id != user.id {
        tracing::info!(
            "Teacher {} denied access to assignment {} owned by {}",
            user.id,
            assignment.id,
            assignment.teacher_id
        );
        return Ok(redirect("/teacher/dashboard"));
    }

    match storage.list_submissions_with_students(assignment_id).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ViewSubmissionsResponse {
                assignment,
                submissions,
            },
            "获取提交列表成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取提交列表失败: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use std::sync::Arc;

    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::{Account, UserRole};
    use crate::models::users::requests::CreateAccountRequest;
    use crate::routes::configure_teacher_routes;
    use crate::session::{SessionStore, SessionUser};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn test_env() -> (Arc<dyn Storage>, SessionStore) {
        let storage = SeaOrmStorage::new_with_url(":memory:", 1, 5)
            .await
            .expect("in-memory storage");
        let sessions = SessionStore::with_settings("portal_session", 16, 60);
        (Arc::new(storage), sessions)
    }

    async fn create_teacher(storage: &Arc<dyn Storage>, username: &str) -> Account {
        storage
            .create_user(CreateAccountRequest {
                username: username.to_string(),
                password: "123".to_string(),
                role: UserRole::Teacher,
                display_name: username.to_string(),
                email: None,
            })
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_view_submissions_owner_only() {
        let (storage, sessions) = test_env().await;
        let owner = create_teacher(&storage, "t1").await;
        let other = create_teacher(&storage, "t2").await;
        let assignment = storage
            .create_assignment(NewAssignment {
                title: "第一次作业".to_string(),
                content: "写一个阶乘函数".to_string(),
                teacher_id: owner.id,
                due_date: None,
            })
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(sessions.clone()))
                .configure(configure_teacher_routes),
        )
        .await;

        // 别的教师访问时被重定向回自己的面板
        let other_session = sessions.create(SessionUser::from(&other)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/teacher/view_submissions/{}", assignment.id))
            .cookie(Cookie::new("portal_session", other_session))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/teacher/dashboard"
        );

        // 布置者本人可以查看
        let owner_session = sessions.create(SessionUser::from(&owner)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/teacher/view_submissions/{}", assignment.id))
            .cookie(Cookie::new("portal_session", owner_session))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
