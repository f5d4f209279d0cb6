use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SESSION_COOKIE;
use crate::session::{self, Identity, IssuedSession, SessionState};
use crate::store;
use crate::store::user::NewUser;
use crate::utils::flash::{self, Flash};
use crate::utils::password::{hash_password, MIN_PASSWORD_LEN};
use crate::{AppState, Config};

pub const LANDING: &str = "/";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub gender: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    pub fields: &'static [&'static str],
    pub messages: Vec<Flash>,
}

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub user: Option<Identity>,
    pub messages: Vec<Flash>,
}

const LOGIN_FIELDS: &[&str] = &["username", "password"];
const SIGNUP_FIELDS: &[&str] = &[
    "user_id",
    "name",
    "phone",
    "date_of_birth",
    "email",
    "gender",
    "street",
    "area",
    "city",
    "password",
    "password_confirmation",
];

fn session_cookie(config: &Config, issued: &IssuedSession) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::hours(config.session_ttl_hours))
        .build()
}

fn form_page(jar: CookieJar, form: &'static str, fields: &'static [&'static str]) -> Response {
    let (jar, messages) = flash::take(jar);
    (
        jar,
        Json(FormPage {
            form,
            fields,
            messages,
        }),
    )
        .into_response()
}

/// Landing page: who is signed in, plus any pending status messages
pub async fn landing(session: SessionState, jar: CookieJar) -> Response {
    let (jar, messages) = flash::take(jar);
    (
        jar,
        Json(LandingResponse {
            user: session.identity().cloned(),
            messages,
        }),
    )
        .into_response()
}

/// Login form; signed-in users go straight to the landing page
pub async fn login_page(session: SessionState, jar: CookieJar) -> Response {
    if session.is_authenticated() {
        return Redirect::to(LANDING).into_response();
    }
    form_page(jar, "login", LOGIN_FIELDS)
}

/// Log in with a user id or email and password
pub async fn login(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if session.is_authenticated() {
        return Ok(Redirect::to(LANDING).into_response());
    }

    state.login_throttle.check(&form.username)?;

    let identity = match session::authenticate(&state.db, &form.username, &form.password).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(identifier = %form.username.trim(), "Login failed");
            return Err(e);
        }
    };

    let issued = session::establish_session(&state.db, &state.config, &identity).await?;
    let jar = jar.add(session_cookie(&state.config, &issued));
    let jar = flash::push(jar, Flash::success(format!("Welcome back, {}!", identity.name)));

    Ok((jar, Redirect::to(LANDING)).into_response())
}

/// Signup form; signed-in users go straight to the landing page
pub async fn signup_page(session: SessionState, jar: CookieJar) -> Response {
    if session.is_authenticated() {
        return Redirect::to(LANDING).into_response();
    }
    form_page(jar, "signup", SIGNUP_FIELDS)
}

/// Register a new account and log it in
pub async fn signup(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if session.is_authenticated() {
        return Ok(Redirect::to(LANDING).into_response());
    }

    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if form.password != form.password_confirmation {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let user = store::user::insert(
        &state.db,
        NewUser {
            user_id: form.user_id,
            name: form.name,
            phone: form.phone,
            date_of_birth: form.date_of_birth,
            email: form.email,
            gender: form.gender,
            street: form.street,
            area: form.area,
            city: form.city,
            is_admin: false,
            verification_status: "Pending".to_string(),
            password_hash,
        },
    )
    .await?;

    let identity = Identity::from(user);
    let issued = session::establish_session(&state.db, &state.config, &identity).await?;
    let jar = jar.add(session_cookie(&state.config, &issued));
    let jar = flash::push(jar, Flash::success("Account created successfully!"));

    Ok((jar, Redirect::to(LANDING)).into_response())
}

/// End the current session, if any
pub async fn logout(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
) -> AppResult<Response> {
    if let SessionState::Authenticated(ctx) = session {
        session::end_session(&state.db, ctx.session_id).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let jar = flash::push(jar, Flash::info("You are logged out."));

    Ok((jar, Redirect::to(LANDING)).into_response())
}
