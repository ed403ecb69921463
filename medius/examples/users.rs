//! User commands and queries dispatched through a logged pipeline.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p medius --example users
//! ```

use medius::{BoxError, Mediator, Request, RequestHandler, handler, stages::LoggingStage};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Request)]
#[request(response = String)]
struct CreateUserCommand {
    name: String,
    email: String,
}

#[derive(Debug, Request)]
#[request(response = String)]
struct GetUserQuery {
    id: u64,
}

#[derive(Debug, Request)]
#[request(response = ())]
struct DeleteUserCommand {
    id: u64,
}

#[handler(CreateUserCommand)]
#[derive(Default)]
struct CreateUserHandler;

impl RequestHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(&self, command: CreateUserCommand) -> Result<String, BoxError> {
        Ok(format!(
            "User {} created with email {}",
            command.name, command.email
        ))
    }
}

#[handler]
async fn get_user(query: GetUserQuery) -> Result<String, BoxError> {
    Ok(format!("Fetching user with id: {}", query.id))
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mediator = Mediator::global();
    mediator.register_pipeline(LoggingStage::named("users"));
    let report = mediator.discover_registered(module_path!()).await?;
    tracing::info!(bindings = ?report.registered, "handlers discovered");

    let created = mediator
        .send(CreateUserCommand {
            name: "faraj".into(),
            email: "farajshuaib@gmail.com".into(),
        })
        .await?;
    println!("{created}");

    let user = mediator.send(GetUserQuery { id: 1 }).await?;
    println!("{user}");

    if let Err(err) = mediator.send(DeleteUserCommand { id: 1 }).await {
        println!("{err}");
    }

    Ok(())
}
