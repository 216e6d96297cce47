use async_graphql::SimpleObject;
use entity::{Employer, EmployerPatch, NewEmployer};
use platform_api::{ApiResult, require_non_blank, require_non_negative};
use platform_store::EmployerStore;

/// GraphQL view of [`Employer`]. Field names follow the public schema, not
/// the serde keys of the entity.
#[derive(Clone, Debug, PartialEq, Eq, SimpleObject)]
#[graphql(name = "Employer")]
pub struct EmployerNode {
    pub id: i32,
    #[graphql(name = "FirstName")]
    pub first_name: String,
    #[graphql(name = "LastName")]
    pub last_name: String,
    #[graphql(name = "Gender")]
    pub gender: String,
    #[graphql(name = "Position")]
    pub position: String,
    #[graphql(name = "Salary")]
    pub salary: i32,
}

impl From<Employer> for EmployerNode {
    fn from(model: Employer) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            gender: model.gender,
            position: model.position,
            salary: model.salary,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateArgs {
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub salary: i32,
}

impl CreateArgs {
    fn validate(self) -> ApiResult<NewEmployer> {
        require_non_blank("FirstName", &self.first_name)?;
        require_non_negative("Salary", self.salary)?;
        Ok(NewEmployer {
            first_name: self.first_name,
            last_name: self.last_name.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            salary: self.salary,
        })
    }
}

fn validate_patch(patch: EmployerPatch) -> ApiResult<EmployerPatch> {
    if let Some(first_name) = patch.first_name.as_deref() {
        require_non_blank("FirstName", first_name)?;
    }
    if let Some(salary) = patch.salary {
        require_non_negative("Salary", salary)?;
    }
    Ok(patch)
}

pub fn find(store: &EmployerStore, id: Option<i32>) -> ApiResult<Option<EmployerNode>> {
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(store.get(id)?.map(EmployerNode::from))
}

pub fn list(store: &EmployerStore) -> ApiResult<Vec<EmployerNode>> {
    Ok(store.list()?.into_iter().map(EmployerNode::from).collect())
}

pub fn create(store: &EmployerStore, args: CreateArgs) -> ApiResult<EmployerNode> {
    let input = args.validate()?;
    Ok(store.create(input)?.into())
}

/// Unknown ids yield a zero-valued employer rather than an error.
pub fn update(store: &EmployerStore, id: i32, patch: EmployerPatch) -> ApiResult<EmployerNode> {
    let patch = validate_patch(patch)?;
    Ok(store.update(id, patch)?.unwrap_or_default().into())
}

/// Unknown ids yield a zero-valued employer rather than an error.
pub fn delete(store: &EmployerStore, id: i32) -> ApiResult<EmployerNode> {
    Ok(store.delete(id)?.unwrap_or_default().into())
}
