mod employers;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema};
use entity::EmployerPatch;
use platform_api::ApiResult;
use platform_store::EmployerStore;
use tracing::instrument;

pub use employers::EmployerNode;
use employers::CreateArgs;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Shared state handed to every resolver.
#[derive(Clone)]
pub struct GraphqlData {
    pub store: Arc<EmployerStore>,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data.store)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object(name = "Query")]
impl QueryRoot {
    #[instrument(name = "graphql.employer", skip_all, fields(id = ?id))]
    async fn employer(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Employer id")] id: Option<i32>,
    ) -> async_graphql::Result<Option<EmployerNode>> {
        let store = store(ctx)?;
        resolved(employers::find(&store, id))
    }

    #[instrument(name = "graphql.list", skip_all)]
    async fn list(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployerNode>> {
        let store = store(ctx)?;
        resolved(employers::list(&store))
    }
}

#[Object(name = "Mutation")]
impl MutationRoot {
    #[instrument(name = "graphql.create", skip_all)]
    async fn create(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "FirstName")] first_name: String,
        #[graphql(name = "LastName")] last_name: Option<String>,
        #[graphql(name = "Gender")] gender: Option<String>,
        #[graphql(name = "Position")] position: Option<String>,
        #[graphql(name = "Salary")] salary: i32,
    ) -> async_graphql::Result<EmployerNode> {
        let store = store(ctx)?;
        let args = CreateArgs {
            first_name,
            last_name,
            gender,
            position,
            salary,
        };
        resolved(employers::create(&store, args))
    }

    #[instrument(name = "graphql.update", skip_all, fields(id = id))]
    async fn update(
        &self,
        ctx: &Context<'_>,
        id: i32,
        #[graphql(name = "FirstName")] first_name: Option<String>,
        #[graphql(name = "LastName")] last_name: Option<String>,
        #[graphql(name = "Gender")] gender: Option<String>,
        #[graphql(name = "Position")] position: Option<String>,
        #[graphql(name = "Salary")] salary: Option<i32>,
    ) -> async_graphql::Result<EmployerNode> {
        let store = store(ctx)?;
        let patch = EmployerPatch {
            first_name,
            last_name,
            gender,
            position,
            salary,
        };
        resolved(employers::update(&store, id, patch))
    }

    #[instrument(name = "graphql.delete", skip_all, fields(id = id))]
    async fn delete(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<EmployerNode> {
        let store = store(ctx)?;
        resolved(employers::delete(&store, id))
    }
}

fn store(ctx: &Context<'_>) -> async_graphql::Result<Arc<EmployerStore>> {
    ctx.data::<Arc<EmployerStore>>().cloned()
}

fn resolved<T>(result: ApiResult<T>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}
