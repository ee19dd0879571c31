use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
    // No updated_at: permissions are immutable after creation
    pub created_at: i64,
}

impl Model {
    /// Full permission identifier in `resource:action` form, computed on read.
    pub fn full_permission(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
