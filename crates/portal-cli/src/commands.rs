//! Subcommand handlers.
//!
//! Each handler prints its result to stdout. Errors that mean the session
//! is no longer usable clear it and point the user at the sign-in URL.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use portal_core::api::{api_error, selection_month};
use portal_core::auth::{open_store, SessionStore};
use portal_core::models::VendorPlanSelectionCreate;
use portal_core::utils::{format_fee, format_meal_types, format_month, truncate_string};
use portal_core::validation::{validate_signup, SignupForm};
use portal_core::{ApiClient, Config, Session};

use crate::Command;

/// Column width for names in listings
const NAME_COLUMN_WIDTH: usize = 28;

pub(crate) async fn run(command: Command, config: &mut Config, backend_url: Option<&str>) -> Result<()> {
    // Commands that need neither the backend nor the session
    if let Command::ValidateSignup {
        name,
        email,
        password,
        confirm_password,
    } = command
    {
        return validate_signup_form(SignupForm {
            name,
            email,
            password,
            confirm_password,
        });
    }

    let store: Arc<dyn SessionStore> = open_store(config)?;
    let session = Session::new(store);

    if let Command::Status = command {
        print_status(&session);
        return Ok(());
    }

    let client = match backend_url {
        Some(url) => ApiClient::with_base_url(url, config, session.clone()),
        None => ApiClient::new(config, session.clone()),
    };

    // Signing out must work even when no backend is configured
    if let Command::Logout = command {
        return logout(&session, client).await;
    }
    let client = client?;

    let result = dispatch(command, &client, config).await;

    if let Err(ref e) = result {
        if api_error(e).is_some_and(|err| err.is_auth_failure()) {
            warn!(error = %e, "Session is no longer valid");
            client.session().clear();
            eprintln!("Your session has expired. Sign in again at:\n  {}", client.login_url());
        }
    }
    result
}

async fn dispatch(command: Command, client: &ApiClient, config: &mut Config) -> Result<()> {
    match command {
        Command::LoginUrl => {
            println!("{}", client.login_url());
        }
        Command::Login { token } => login(client, config, token).await?,
        Command::Whoami => {
            let user = client.who_am_i().await?;
            print_json(&serde_json::to_value(&user)?)?;
        }
        Command::Refresh => {
            client.refresh().await?;
            println!("Access token refreshed.");
        }
        Command::Request { method, path, body } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {}", method))?;
            let body: Option<Value> = body
                .map(|b| serde_json::from_str(&b).context("Request body is not valid JSON"))
                .transpose()?;
            let response = client.request(method, &path, body.as_ref(), None).await?;
            print_json(&response.into_json())?;
        }
        Command::Profile => {
            let profile = client.get_profile().await?;
            print_json(&profile)?;
        }
        Command::Dashboard { user_id } => dashboard(client, user_id).await?,
        Command::Vendors => {
            let vendors = client.food().vendors().await?;
            if vendors.is_empty() {
                println!("No vendors.");
            }
            for vendor in vendors {
                println!("{:>5}  {}", vendor.vendor_id, vendor.vendor_name);
            }
        }
        Command::Plans => {
            let plans = client.food().vendor_plans().await?;
            if plans.is_empty() {
                println!("No meal plans available.");
            }
            for plan in plans {
                println!(
                    "{:>5}  {:<width$}  {:<width$}  {:>8}  {}",
                    plan.vendor_plan_id,
                    truncate_string(&plan.plan_name, NAME_COLUMN_WIDTH),
                    truncate_string(&plan.vendor_name, NAME_COLUMN_WIDTH),
                    format_fee(plan.fee),
                    format_meal_types(&plan.meal_types),
                    width = NAME_COLUMN_WIDTH,
                );
            }
        }
        Command::MyPlan { user_id } => {
            let selection = client.food().selection_for_user(user_id).await?;
            println!("{} ({})", selection.vendor_plan_name, selection.vendor_name);
            println!("  Month: {}", format_month(selection.selected_month));
            println!("  Meals: {}", format_meal_types(&selection.meal_types));
            println!("  Fee:   {}", format_fee(selection.fee));
        }
        Command::SelectPlan {
            plan_id,
            user_id,
            month,
            year,
        } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let selection = VendorPlanSelectionCreate {
                vendor_plan_id: plan_id,
                user_id,
                selected_month: selection_month(&month, year)?,
            };
            let created = client.food().create_selection(&selection).await?;
            println!(
                "Selected plan {} for {} (selection {}).",
                created.vendor_plan_id,
                format_month(created.selected_month),
                created.vendor_plan_selection_id
            );
        }
        Command::Status | Command::Logout | Command::ValidateSignup { .. } => {
            unreachable!("handled before dispatch")
        }
    }
    Ok(())
}

async fn login(client: &ApiClient, config: &mut Config, token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            println!("Sign in at {} and paste the access token.", client.login_url());
            rpassword::prompt_password("Access token: ")?
        }
    };
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("No access token given");
    }

    let session = client.session();
    session.set_access_token(token)?;

    let user = match client.who_am_i().await {
        Ok(user) => user,
        Err(e) => {
            session.clear();
            return Err(e.context("Token was not accepted by the backend"));
        }
    };
    session.login_successful(&user)?;

    config.last_email = user.email.clone();
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    info!("Login successful");
    println!("Signed in as {}.", user.display_name());
    Ok(())
}

async fn logout(session: &Session, client: Result<ApiClient>) -> Result<()> {
    match client {
        Ok(client) => {
            let redirect = client.logout().await;
            println!("Signed out. Sign in again at:\n  {}", redirect.url);
        }
        Err(e) => {
            warn!(error = %e, "No backend available, clearing local session only");
            session.clear();
            println!("Signed out locally. The backend was not contacted: {:#}", e);
        }
    }
    Ok(())
}

async fn dashboard(client: &ApiClient, user_id: i64) -> Result<()> {
    let food = client.food();
    let (user, plan) = futures::join!(client.who_am_i(), food.selection_for_user(user_id));

    let user = user?;
    println!("{}", user.display_name());
    if let Some(ref email) = user.email {
        println!("  Email: {}", email);
    }
    let roles = user.role_names();
    if !roles.is_empty() {
        println!("  Roles: {}", roles.join(", "));
    }

    match plan {
        Ok(plan) => println!(
            "  Meal plan: {} by {}, {} ({})",
            plan.vendor_plan_name,
            plan.vendor_name,
            format_month(plan.selected_month),
            format_meal_types(&plan.meal_types)
        ),
        // A missing plan shouldn't hide the rest of the dashboard
        Err(e) if !api_error(&e).is_some_and(|err| err.is_auth_failure()) => {
            warn!(error = %e, "Failed to load meal plan");
            println!("  Meal plan: none");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn print_status(session: &Session) {
    if !session.is_logged_in() {
        println!("Not signed in.");
        return;
    }
    match session.current_user() {
        Some(user) => println!("Signed in as {}.", user.display_name()),
        None => println!("Signed in."),
    }
    if let Some(email) = session.user_email() {
        println!("  Email: {}", email);
    }
    let roles = session.user_roles();
    if !roles.is_empty() {
        println!("  Roles: {}", roles.join(", "));
    }
    let token = if session.access_token().is_some() { "present" } else { "missing" };
    println!("  Access token: {}", token);
}

fn validate_signup_form(form: SignupForm) -> Result<()> {
    match validate_signup(&form) {
        Ok(()) => {
            println!("All fields are valid.");
            Ok(())
        }
        Err(errors) => {
            for (field, message) in errors.iter() {
                println!("{}: {}", field, message);
            }
            Err(errors.into())
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    match value {
        Value::String(s) => println!("{}", s),
        Value::Null => {}
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}
