//! 提交存储操作
//!
//! 写路径是 (assignment_id, student_id) 上的 upsert，依赖迁移里建立的唯一索引，
//! 避免"先查再插"的并发窗口产生重复提交行。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::submissions::{
    entities::Submission, requests::UpsertSubmissionRequest, responses::SubmissionListItem,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 提交/重交作业：同一 (assignment, student) 复用同一行
    pub async fn upsert_submission_impl(&self, req: UpsertSubmissionRequest) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            content: Set(req.content),
            submitted_at: Set(now),
            ..Default::default()
        };

        // 冲突时更新文本与时间戳；仅当带了新文件才覆盖文件列，已有评分保留
        let mut on_conflict = OnConflict::columns([Column::AssignmentId, Column::StudentId]);
        on_conflict.update_columns([Column::Content, Column::SubmittedAt]);

        if let Some(file) = req.file {
            model.file_path = Set(Some(file.file_path));
            model.file_name = Set(Some(file.file_name));
            on_conflict.update_columns([Column::FilePath, Column::FileName]);
        }

        let result = Submissions::insert(model)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("提交作业失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取某学生对某作业的提交
    pub async fn get_submission_for_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出某作业的全部提交，附学生信息
    pub async fn list_submissions_with_students_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>> {
        let submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        // 批量查询学生信息
        let student_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.student_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let students = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生信息失败: {e}")))?;

        let student_map: HashMap<i64, _> = students.into_iter().map(|u| (u.id, u)).collect();

        let items = submissions
            .into_iter()
            .map(|s| {
                let student = student_map.get(&s.student_id);
                SubmissionListItem {
                    student_username: student
                        .map(|u| u.username.clone())
                        .unwrap_or_else(|| "未知用户".to_string()),
                    student_display_name: student
                        .map(|u| u.display_name.clone())
                        .unwrap_or_default(),
                    submission: s.into_submission(),
                }
            })
            .collect();

        Ok(items)
    }
}
