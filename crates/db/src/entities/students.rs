//! `SeaORM` Entity for students table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub rfid_id: String,
    pub student_name: String,
    #[sea_orm(column_name = "class")]
    pub class_name: Option<String>,
    pub roll_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for libris_core::library::Student {
    fn from(model: Model) -> Self {
        Self {
            tag_id: model.rfid_id,
            name: model.student_name,
            class_name: model.class_name,
            roll_number: model.roll_number,
        }
    }
}
