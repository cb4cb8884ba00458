//! SeaORM entities for the `companies` and `users` tables.

use chrono::Utc;
use sea_orm::ActiveValue::Set;

use crate::models::{Company, CreateCompany, NewUser, User};

pub mod companies {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "companies")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub tax_id: String,
        pub legal_name: String,
        pub trade_name: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::users::Entity")]
        Users,
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Users.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub const TAG: &'static str = "companies";
    }
}

pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub login: String,
        #[sea_orm(column_type = "Text")]
        pub password_hash: String,
        pub company_id: i32,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::companies::Entity",
            from = "Column::CompanyId",
            to = "super::companies::Column::Id",
            on_update = "Cascade",
            on_delete = "Restrict"
        )]
        Company,
    }

    impl Related<super::companies::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Company.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub const TAG: &'static str = "users";
    }
}

impl From<companies::Model> for Company {
    fn from(model: companies::Model) -> Self {
        Self {
            id: model.id,
            tax_id: model.tax_id,
            legal_name: model.legal_name,
            trade_name: model.trade_name,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            login: model.login,
            password_hash: model.password_hash,
            company_id: model.company_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Ids come from the serial column, so they stay NotSet on insert
impl From<CreateCompany> for companies::ActiveModel {
    fn from(input: CreateCompany) -> Self {
        let now = Utc::now();

        companies::ActiveModel {
            tax_id: Set(input.tax_id),
            legal_name: Set(input.legal_name),
            trade_name: Set(input.trade_name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    }
}

impl From<NewUser> for users::ActiveModel {
    fn from(input: NewUser) -> Self {
        let now = Utc::now();

        users::ActiveModel {
            name: Set(input.name),
            login: Set(input.login),
            password_hash: Set(input.password_hash),
            company_id: Set(input.company_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    }
}
