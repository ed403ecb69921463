#![allow(dead_code)]

use medius::{BoxError, Request, RequestHandler, handler};

// ============================================================================
// Test Request Types
// ============================================================================

#[derive(Debug, Clone, Request)]
#[request(response = String)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
}

impl CreateUserCommand {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

#[derive(Debug, Clone, Request)]
#[request(response = String)]
pub struct GetUserQuery {
    pub id: u64,
}

/// Never bound to a handler.
#[derive(Debug, Clone, Request)]
#[request(response = ())]
pub struct DeleteUserCommand {
    pub id: u64,
}

// ============================================================================
// Test Handlers
// ============================================================================

#[handler(CreateUserCommand)]
#[derive(Debug, Default)]
pub struct CreateUserHandler;

impl RequestHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(&self, command: CreateUserCommand) -> Result<String, BoxError> {
        Ok(format!(
            "User {} created with email {}",
            command.name, command.email
        ))
    }
}

#[handler]
pub async fn get_user(query: GetUserQuery) -> Result<String, BoxError> {
    Ok(format!("Fetching user with id: {}", query.id))
}

pub fn faraj() -> CreateUserCommand {
    CreateUserCommand::new("faraj", "farajshuaib@gmail.com")
}
