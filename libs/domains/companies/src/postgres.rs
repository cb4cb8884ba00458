use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::{
    entity::{companies, users},
    error::{CompanyError, CompanyResult, UserError, UserResult},
    models::{
        Company, CompanyWithUsers, CreateCompany, NewUser, UpdateCompany, User, UserChanges,
        UserWithCompany,
    },
    repository::{CompanyRepository, UserRepository},
};

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

fn company_db_error(err: DbErr) -> CompanyError {
    CompanyError::Internal(format!("Database error: {}", err))
}

fn user_db_error(err: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", err))
}

fn company_with_users(
    company: companies::Model,
    mut members: Vec<users::Model>,
) -> CompanyWithUsers {
    members.sort_by_key(|u| u.id);
    CompanyWithUsers {
        company: company.into(),
        users: members.into_iter().map(User::from).collect(),
    }
}

fn user_with_company(user: users::Model, company: Option<companies::Model>) -> UserWithCompany {
    UserWithCompany {
        user: user.into(),
        company_legal_name: company.map(|c| c.legal_name).unwrap_or_default(),
    }
}

pub struct PgCompanyRepository {
    db: DatabaseConnection,
}

impl PgCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn create(&self, input: CreateCompany) -> CompanyResult<Company> {
        let model = companies::ActiveModel::from(input)
            .insert(&self.db)
            .await
            .map_err(company_db_error)?;

        tracing::info!(company_id = model.id, "Created company");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> CompanyResult<Option<CompanyWithUsers>> {
        let Some(company) = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(company_db_error)?
        else {
            return Ok(None);
        };

        let members = company
            .find_related(users::Entity)
            .all(&self.db)
            .await
            .map_err(company_db_error)?;

        Ok(Some(company_with_users(company, members)))
    }

    async fn list(&self) -> CompanyResult<Vec<CompanyWithUsers>> {
        let rows = companies::Entity::find()
            .order_by_asc(companies::Column::Id)
            .find_with_related(users::Entity)
            .all(&self.db)
            .await
            .map_err(company_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(company, members)| company_with_users(company, members))
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateCompany,
    ) -> CompanyResult<Option<CompanyWithUsers>> {
        let Some(existing) = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(company_db_error)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.tax_id = Set(input.tax_id);
        active.legal_name = Set(input.legal_name);
        active.trade_name = Set(input.trade_name);
        active.updated_at = Set(Utc::now().into());

        let company = active.update(&self.db).await.map_err(company_db_error)?;
        let members = company
            .find_related(users::Entity)
            .all(&self.db)
            .await
            .map_err(company_db_error)?;

        tracing::info!(company_id = id, "Updated company");
        Ok(Some(company_with_users(company, members)))
    }

    async fn delete(&self, id: i32) -> CompanyResult<bool> {
        let txn = self.db.begin().await.map_err(company_db_error)?;

        let exists = companies::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(company_db_error)?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let owned = users::Entity::find()
            .filter(users::Column::CompanyId.eq(id))
            .count(&txn)
            .await
            .map_err(company_db_error)?;
        if owned > 0 {
            return Err(CompanyError::HasUsers(id));
        }

        companies::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    CompanyError::HasUsers(id)
                } else {
                    company_db_error(e)
                }
            })?;
        txn.commit().await.map_err(company_db_error)?;

        tracing::info!(company_id = id, "Deleted company");
        Ok(true)
    }
}

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<UserWithCompany> {
        let company_id = input.company_id;
        let txn = self.db.begin().await.map_err(user_db_error)?;

        // Shared row lock keeps the company alive until commit
        let company = companies::Entity::find_by_id(company_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(user_db_error)?
            .ok_or(UserError::CompanyNotFound(company_id))?;

        let model = users::ActiveModel::from(input)
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    UserError::CompanyNotFound(company_id)
                } else {
                    user_db_error(e)
                }
            })?;
        txn.commit().await.map_err(user_db_error)?;

        tracing::info!(user_id = model.id, company_id, "Created user");
        Ok(user_with_company(model, Some(company)))
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<UserWithCompany>> {
        let row = users::Entity::find_by_id(id)
            .find_also_related(companies::Entity)
            .one(&self.db)
            .await
            .map_err(user_db_error)?;

        Ok(row.map(|(user, company)| user_with_company(user, company)))
    }

    async fn list(&self) -> UserResult<Vec<UserWithCompany>> {
        let rows = users::Entity::find()
            .find_also_related(companies::Entity)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(user_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(user, company)| user_with_company(user, company))
            .collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<Option<UserWithCompany>> {
        let txn = self.db.begin().await.map_err(user_db_error)?;

        let Some(existing) = users::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(user_db_error)?
        else {
            return Ok(None);
        };

        let company_id = changes.company_id.unwrap_or(existing.company_id);
        let company = companies::Entity::find_by_id(company_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(user_db_error)?
            .ok_or(UserError::CompanyNotFound(company_id))?;

        let mut active = existing.into_active_model();
        active.name = Set(changes.name);
        active.login = Set(changes.login);
        active.password_hash = Set(changes.password_hash);
        active.company_id = Set(company_id);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&txn).await.map_err(user_db_error)?;
        txn.commit().await.map_err(user_db_error)?;

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(user_with_company(model, Some(company))))
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(user_db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn company_exists(&self, company_id: i32) -> UserResult<bool> {
        let count = companies::Entity::find_by_id(company_id)
            .count(&self.db)
            .await
            .map_err(user_db_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn company_model(id: i32) -> companies::Model {
        let now = Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap());
        companies::Model {
            id,
            tax_id: "47960950000121".to_string(),
            legal_name: "Magazine Luiza S/A".to_string(),
            trade_name: "Magazine Luiza".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_company_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![company_model(12)]])
            .into_connection();
        let repo = PgCompanyRepository::new(db);

        let company = repo
            .create(CreateCompany {
                tax_id: "47960950000121".to_string(),
                legal_name: "Magazine Luiza S/A".to_string(),
                trade_name: "Magazine Luiza".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(company.id, 12);
        assert_eq!(company.legal_name, "Magazine Luiza S/A");
    }

    #[tokio::test]
    async fn test_get_missing_company_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<companies::Model>::new()])
            .into_connection();
        let repo = PgCompanyRepository::new(db);

        assert!(repo.get_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(!repo.delete(8).await.unwrap());
    }

    #[tokio::test]
    async fn test_database_errors_become_internal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgCompanyRepository::new(db);

        let result = repo.list().await;
        assert!(matches!(result, Err(CompanyError::Internal(_))));
    }
}
