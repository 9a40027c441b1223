use anyhow::Result;

use crate::{
    api::{
        auth::{LoginRequest, RegisterRequest},
        client::ApiClient,
        error::ApiError,
    },
    ui::{render, terminal::Terminal},
};

pub const LOGIN_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated { username: String },
    ExitWithGuidance,
}

/// Signs in and installs the issued credential. Prompts for whatever the
/// caller did not pass; an interactive password gets a few attempts.
pub async fn run_login(
    client: &ApiClient,
    terminal: &mut dyn Terminal,
    input: LoginInput,
) -> Result<AuthOutcome> {
    let Some(username) = given_or_prompt(terminal, input.username, "Username: ")? else {
        return cancelled(terminal);
    };

    let attempts = if input.password.is_some() {
        1
    } else {
        LOGIN_ATTEMPTS
    };
    let mut given_password = input.password;

    for attempt in 1..=attempts {
        let password = match given_password.take() {
            Some(password) => password,
            None => match terminal.prompt_secret("Password: ")? {
                Some(password) => password,
                None => return cancelled(terminal),
            },
        };

        match client
            .auth()
            .login(&LoginRequest::new(username.as_str(), password))
            .await
        {
            Ok(grant) => {
                client.sign_in(grant.credential)?;
                let username = grant.user.map(|user| user.username).unwrap_or(username);
                tracing::info!(username = %username, "signed in");
                terminal.print_line(&format!("Signed in as {username}."))?;
                return Ok(AuthOutcome::Authenticated { username });
            }
            Err(error @ (ApiError::Unauthorized | ApiError::Rejected { .. })) => {
                tracing::info!(code = error.code(), attempt, "login rejected");
                terminal.print_line(&format!(
                    "{} Attempts left: {}",
                    render::api_failure(&error),
                    attempts - attempt
                ))?;
            }
            Err(error) => {
                terminal.print_line(&render::api_failure(&error))?;
                return Ok(AuthOutcome::ExitWithGuidance);
            }
        }
    }

    terminal.print_line("Login failed. Check your username and password and run `agrolens login` again.")?;
    Ok(AuthOutcome::ExitWithGuidance)
}

/// Creates an account and leaves the new user signed in.
pub async fn run_register(
    client: &ApiClient,
    terminal: &mut dyn Terminal,
    input: RegisterInput,
) -> Result<AuthOutcome> {
    let Some(username) = given_or_prompt(terminal, input.username, "Username: ")? else {
        return cancelled(terminal);
    };

    let password = match input.password {
        Some(password) => password,
        None => {
            let Some(first) = terminal.prompt_secret("Password: ")? else {
                return cancelled(terminal);
            };
            let Some(repeated) = terminal.prompt_secret("Repeat password: ")? else {
                return cancelled(terminal);
            };
            if first != repeated {
                terminal.print_line("Passwords do not match. Nothing was registered.")?;
                return Ok(AuthOutcome::ExitWithGuidance);
            }
            first
        }
    };

    let request = RegisterRequest {
        email: input.email,
        phone: input.phone,
        location: input.location,
        ..RegisterRequest::new(username.as_str(), password.as_str())
    };

    let registration = match client.auth().register(&request).await {
        Ok(registration) => registration,
        Err(error) => {
            terminal.print_line(&render::api_failure(&error))?;
            return Ok(AuthOutcome::ExitWithGuidance);
        }
    };
    tracing::info!(user_id = registration.user.id, "account registered");
    if let Some(message) = &registration.message {
        terminal.print_line(message)?;
    }

    match registration.credential {
        Some(credential) => {
            client.sign_in(credential)?;
            terminal.print_line(&format!("Signed in as {}.", registration.user.username))?;
            Ok(AuthOutcome::Authenticated {
                username: registration.user.username,
            })
        }
        None => {
            run_login(
                client,
                terminal,
                LoginInput {
                    username: Some(username),
                    password: Some(password),
                },
            )
            .await
        }
    }
}

fn given_or_prompt(
    terminal: &mut dyn Terminal,
    given: Option<String>,
    prompt: &str,
) -> std::io::Result<Option<String>> {
    match given.map(|value| value.trim().to_owned()) {
        Some(value) if !value.is_empty() => Ok(Some(value)),
        _ => terminal.prompt_line(prompt),
    }
}

fn cancelled(terminal: &mut dyn Terminal) -> Result<AuthOutcome> {
    terminal.print_line("Input cancelled. Nothing changed.")?;
    Ok(AuthOutcome::ExitWithGuidance)
}
